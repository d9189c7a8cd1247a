//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: error and diagnostic types, token cursor helpers, and the
//! entry point producing a [`HeaderUnit`].
//!
//! # Parser Architecture
//!
//! Recursive descent over the token stream, split across `impl Parser`
//! blocks:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: typedefs, enums, records, and function declarations
//!
//! A malformed header is a build-time failure for the whole run, so there is
//! no error recovery beyond skipping unrecognized top-level constructs (which
//! produces a warning [`Diagnostic`]).

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, MacroDef, Token};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Error)]
#[error("Parse error at line {}, column {}: {message}", location.line, location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Non-fatal message produced while parsing a header. Fatal problems are
/// [`ParseError`]s and abort the parse instead.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub location: SourceLocation,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "warning: line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

/// Recursive descent parser for the C subset SDL's public headers use
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) macros: Vec<MacroDef>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        let macros = lexer.take_macros();
        Ok(Self {
            tokens,
            position: 0,
            macros,
            diagnostics: Vec::new(),
        })
    }

    /// Parse an entire header into its top-level declarations.
    ///
    /// Macros captured by the lexer are appended after the syntactic
    /// declarations, preserving their own source order.
    pub fn parse_header(&mut self, file: &str) -> Result<HeaderUnit, ParseError> {
        let mut unit = HeaderUnit::new(file);

        while !self.is_at_end() {
            if let Some(decl) = self.parse_top_level_declaration()? {
                unit.decls.push(decl);
            }
        }

        for def in std::mem::take(&mut self.macros) {
            unit.decls.push(Declaration::Macro(MacroDecl {
                name: def.name,
                params: def.params,
                value: def.value,
                location: def.location,
            }));
        }

        Ok(unit)
    }

    /// Diagnostics accumulated while parsing, in source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.diagnostics.push(Diagnostic {
            message: message.into(),
            location,
        });
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if std::mem::discriminant(&self.peek_token())
            == std::mem::discriminant(token)
        {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.peek_token())
            == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position - 1]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(
        &mut self,
        token: &Token,
        message: &str,
    ) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                format!("{}, found {}", message, self.peek()),
                self.current_location(),
            ))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::new(
                format!("Expected identifier, found {}", self.peek()),
                self.current_location(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enum_typedef() {
        let source = r#"
            typedef enum SDL_Thing
            {
                SDL_THING_A = 0,
                SDL_THING_B,
                SDL_THING_C = 0x10
            } SDL_Thing;
        "#;
        let mut parser = Parser::new(source).unwrap();
        let unit = parser.parse_header("SDL_thing.h").unwrap();

        assert_eq!(unit.decls.len(), 1);
        match &unit.decls[0] {
            Declaration::Enum(decl) => {
                assert_eq!(decl.name, "SDL_Thing");
                assert_eq!(decl.items.len(), 3);
                assert_eq!(decl.items[0].computed, Some(0));
                assert_eq!(decl.items[1].computed, Some(1));
                assert_eq!(decl.items[2].computed, Some(0x10));
            }
            other => panic!("Expected enum declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_struct_typedef() {
        let source = r#"
            typedef struct SDL_Point
            {
                int x;
                int y;
            } SDL_Point;
        "#;
        let mut parser = Parser::new(source).unwrap();
        let unit = parser.parse_header("SDL_rect.h").unwrap();

        match &unit.decls[0] {
            Declaration::Record(decl) => {
                assert_eq!(decl.name, "SDL_Point");
                assert_eq!(decl.kind, RecordKind::Struct);
                assert_eq!(decl.fields.len(), 2);
            }
            other => panic!("Expected record declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_opaque_typedef() {
        let source = "typedef struct SDL_Window SDL_Window;";
        let mut parser = Parser::new(source).unwrap();
        let unit = parser.parse_header("SDL_video.h").unwrap();

        match &unit.decls[0] {
            Declaration::Typedef(decl) => {
                assert_eq!(decl.name, "SDL_Window");
                assert!(matches!(decl.body, TypedefBody::OpaqueRecord));
            }
            other => panic!("Expected typedef declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_declaration() {
        let source =
            "extern SDL_DECLSPEC SDL_Window * SDLCALL SDL_CreateWindow(const char *title, int w, int h, SDL_WindowFlags flags);";
        let mut parser = Parser::new(source).unwrap();
        let unit = parser.parse_header("SDL_video.h").unwrap();

        match &unit.decls[0] {
            Declaration::Function(decl) => {
                assert_eq!(decl.name, "SDL_CreateWindow");
                assert_eq!(decl.sig.params.len(), 4);
                assert!(decl.sig.params[0].ty.is_const_char_pointer());
                assert!(matches!(
                    decl.sig.return_type,
                    CType::Pointer { .. }
                ));
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }
}
