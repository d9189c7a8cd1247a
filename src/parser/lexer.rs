//! Lexer (tokenizer) for C header source
//!
//! Converts raw header text into a flat [`Token`] stream consumed by the
//! parser. `#define` directives are captured as [`MacroDef`]s on the side;
//! every other preprocessor directive is skipped line-wise (honoring `\`
//! continuations), since SDL's public headers only use conditionals around
//! includes and `extern "C"` wrappers.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals. Integer and float literals keep their raw source spelling so
    // hex values and suffixes survive into the emitted bindings.
    IntLiteral(i64, String, SourceLocation),
    FloatLiteral(f64, String, SourceLocation),
    CharLiteral(i64, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Typedef(SourceLocation),
    Enum(SourceLocation),
    Struct(SourceLocation),
    Union(SourceLocation),
    Const(SourceLocation),
    Volatile(SourceLocation),
    Extern(SourceLocation),
    Static(SourceLocation),
    Inline(SourceLocation),
    Unsigned(SourceLocation),
    Signed(SourceLocation),
    Void(SourceLocation),
    Bool(SourceLocation),
    Char(SourceLocation),
    Short(SourceLocation),
    Int(SourceLocation),
    Long(SourceLocation),
    Float(SourceLocation),
    Double(SourceLocation),

    // Operators
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %
    Amp(SourceLocation),     // &
    Pipe(SourceLocation),    // |
    Caret(SourceLocation),   // ^
    Tilde(SourceLocation),   // ~
    Bang(SourceLocation),    // !
    LtLt(SourceLocation),    // <<
    GtGt(SourceLocation),    // >>
    Lt(SourceLocation),      // <
    Gt(SourceLocation),      // >
    Eq(SourceLocation),      // =
    Question(SourceLocation), // ?
    Colon(SourceLocation),   // :

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,
    Dot(SourceLocation),       // .
    Ellipsis(SourceLocation),  // ...

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, _, loc)
            | Token::FloatLiteral(_, _, loc)
            | Token::CharLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Typedef(loc)
            | Token::Enum(loc)
            | Token::Struct(loc)
            | Token::Union(loc)
            | Token::Const(loc)
            | Token::Volatile(loc)
            | Token::Extern(loc)
            | Token::Static(loc)
            | Token::Inline(loc)
            | Token::Unsigned(loc)
            | Token::Signed(loc)
            | Token::Void(loc)
            | Token::Bool(loc)
            | Token::Char(loc)
            | Token::Short(loc)
            | Token::Int(loc)
            | Token::Long(loc)
            | Token::Float(loc)
            | Token::Double(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::Amp(loc)
            | Token::Pipe(loc)
            | Token::Caret(loc)
            | Token::Tilde(loc)
            | Token::Bang(loc)
            | Token::LtLt(loc)
            | Token::GtGt(loc)
            | Token::Lt(loc)
            | Token::Gt(loc)
            | Token::Eq(loc)
            | Token::Question(loc)
            | Token::Colon(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Dot(loc)
            | Token::Ellipsis(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(_, raw, _) => write!(f, "int literal {}", raw),
            Token::FloatLiteral(_, raw, _) => write!(f, "float literal {}", raw),
            Token::CharLiteral(c, _) => write!(f, "char literal {}", c),
            Token::StringLiteral(s, _) => write!(f, "string literal \"{}\"", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Typedef(_) => write!(f, "'typedef'"),
            Token::Enum(_) => write!(f, "'enum'"),
            Token::Struct(_) => write!(f, "'struct'"),
            Token::Union(_) => write!(f, "'union'"),
            Token::Const(_) => write!(f, "'const'"),
            Token::Volatile(_) => write!(f, "'volatile'"),
            Token::Extern(_) => write!(f, "'extern'"),
            Token::Static(_) => write!(f, "'static'"),
            Token::Inline(_) => write!(f, "'inline'"),
            Token::Unsigned(_) => write!(f, "'unsigned'"),
            Token::Signed(_) => write!(f, "'signed'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::Bool(_) => write!(f, "'bool'"),
            Token::Char(_) => write!(f, "'char'"),
            Token::Short(_) => write!(f, "'short'"),
            Token::Int(_) => write!(f, "'int'"),
            Token::Long(_) => write!(f, "'long'"),
            Token::Float(_) => write!(f, "'float'"),
            Token::Double(_) => write!(f, "'double'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::Amp(_) => write!(f, "'&'"),
            Token::Pipe(_) => write!(f, "'|'"),
            Token::Caret(_) => write!(f, "'^'"),
            Token::Tilde(_) => write!(f, "'~'"),
            Token::Bang(_) => write!(f, "'!'"),
            Token::LtLt(_) => write!(f, "'<<'"),
            Token::GtGt(_) => write!(f, "'>>'"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::Question(_) => write!(f, "'?'"),
            Token::Colon(_) => write!(f, "':'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::Ellipsis(_) => write!(f, "'...'"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// A `#define` captured while tokenizing
#[derive(Debug, Clone)]
pub struct MacroDef {
    pub name: String,
    pub params: Option<Vec<String>>,
    pub value: String,
    pub location: SourceLocation,
}

/// Lexer error type
#[derive(Debug, Error)]
#[error("Lexer error at line {}, column {}: {message}", location.line, location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl LexError {
    fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Lexer for C header source
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    macros: Vec<MacroDef>,
}

impl Lexer {
    /// Create a new lexer for the given header text.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            macros: Vec::new(),
        }
    }

    /// Tokenize the entire input, capturing `#define`s on the side.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            if self.peek() == Some('#') {
                self.preprocessor_directive()?;
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Macros captured during [`tokenize`](Self::tokenize), in source order.
    pub fn take_macros(&mut self) -> Vec<MacroDef> {
        std::mem::take(&mut self.macros)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| {
            LexError::new("Unexpected end of file", loc)
        })?;

        match ch {
            '"' => self.string_literal(),
            '\'' => self.char_literal(),
            '0'..='9' => self.number_literal(ch),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch),

            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '%' => Ok(Token::Percent(loc)),
            '&' => Ok(Token::Amp(loc)),
            '|' => Ok(Token::Pipe(loc)),
            '^' => Ok(Token::Caret(loc)),
            '~' => Ok(Token::Tilde(loc)),
            '!' => Ok(Token::Bang(loc)),
            '<' => {
                if self.peek() == Some('<') {
                    self.advance();
                    Ok(Token::LtLt(loc))
                } else {
                    Ok(Token::Lt(loc))
                }
            }
            '>' => {
                if self.peek() == Some('>') {
                    self.advance();
                    Ok(Token::GtGt(loc))
                } else {
                    Ok(Token::Gt(loc))
                }
            }
            '=' => Ok(Token::Eq(loc)),
            '?' => Ok(Token::Question(loc)),
            ':' => Ok(Token::Colon(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),
            '[' => Ok(Token::LBracket(loc)),
            ']' => Ok(Token::RBracket(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    Ok(Token::Ellipsis(loc))
                } else {
                    Ok(Token::Dot(loc))
                }
            }

            _ => Err(LexError::new(
                format!("Unexpected character: '{}'", ch),
                loc,
            )),
        }
    }

    /// Parse string literal
    fn string_literal(&mut self) -> Result<Token, LexError> {
        let loc = SourceLocation::new(self.line, self.column - 1);
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == '"' {
                self.advance(); // consume closing quote
                return Ok(Token::StringLiteral(string, loc));
            }

            if ch == '\\' {
                self.advance();
                let escaped = self.advance().ok_or_else(|| {
                    LexError::new(
                        "Unexpected end of file in string literal",
                        self.current_location(),
                    )
                })?;
                // Keep the escape as written; the emitter re-quotes the raw
                // string into Rust source, which shares C escape syntax.
                string.push('\\');
                string.push(escaped);
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Err(LexError::new("Unterminated string literal", loc))
    }

    /// Parse character literal
    fn char_literal(&mut self) -> Result<Token, LexError> {
        let loc = SourceLocation::new(self.line, self.column - 1);

        let ch = self.advance().ok_or_else(|| {
            LexError::new(
                "Unexpected end of file in character literal",
                self.current_location(),
            )
        })?;

        let value = if ch == '\\' {
            let escaped = self.advance().ok_or_else(|| {
                LexError::new(
                    "Unexpected end of file in character literal",
                    self.current_location(),
                )
            })?;

            match escaped {
                'n' => '\n' as i64,
                't' => '\t' as i64,
                'r' => '\r' as i64,
                '\\' => '\\' as i64,
                '\'' => '\'' as i64,
                '0' => 0,
                'x' => {
                    let hex1 = self.advance().ok_or_else(|| {
                        LexError::new(
                            "Incomplete hex escape sequence",
                            self.current_location(),
                        )
                    })?;
                    let hex2 = self.advance().ok_or_else(|| {
                        LexError::new(
                            "Incomplete hex escape sequence",
                            self.current_location(),
                        )
                    })?;

                    let hex_str = format!("{}{}", hex1, hex2);
                    u8::from_str_radix(&hex_str, 16).map(i64::from).map_err(
                        |_| {
                            LexError::new(
                                format!(
                                    "Invalid hex escape sequence: \\x{}",
                                    hex_str
                                ),
                                self.current_location(),
                            )
                        },
                    )?
                }
                _ => {
                    return Err(LexError::new(
                        format!("Unknown escape sequence: \\{}", escaped),
                        self.current_location(),
                    ));
                }
            }
        } else {
            ch as i64
        };

        if self.advance() != Some('\'') {
            return Err(LexError::new(
                "Expected closing quote in character literal",
                self.current_location(),
            ));
        }

        Ok(Token::CharLiteral(value, loc))
    }

    /// Parse a numeric literal: decimal, hex, octal, or float, with the C
    /// suffixes SDL headers use (`u`, `l`, `ul`, `ull`, `f`).
    fn number_literal(&mut self, first_digit: char) -> Result<Token, LexError> {
        let loc = SourceLocation::new(self.line, self.column - 1);
        let mut raw = String::new();
        raw.push(first_digit);

        let is_hex = first_digit == '0'
            && matches!(self.peek(), Some('x') | Some('X'));
        if is_hex {
            raw.push(self.advance().unwrap_or('x'));
            while let Some(ch) = self.peek() {
                if ch.is_ascii_hexdigit() {
                    raw.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }

            let digits = &raw[2..];
            let value = i64::from_str_radix(digits, 16)
                .or_else(|_| u64::from_str_radix(digits, 16).map(|v| v as i64))
                .map_err(|_| {
                    LexError::new(
                        format!("Invalid hex literal: {}", raw),
                        loc,
                    )
                })?;
            self.consume_int_suffix(&mut raw);
            return Ok(Token::IntLiteral(value, raw, loc));
        }

        let mut is_float = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                raw.push(ch);
                self.advance();
            } else if ch == '.' && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                raw.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E')
                && self
                    .peek_ahead(1)
                    .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+')
            {
                is_float = true;
                raw.push(ch);
                self.advance();
                if let Some(sign) = self.peek() {
                    if sign == '-' || sign == '+' {
                        raw.push(sign);
                        self.advance();
                    }
                }
            } else {
                break;
            }
        }

        if is_float || matches!(self.peek(), Some('f') | Some('F')) {
            let digits = raw.clone();
            if matches!(self.peek(), Some('f') | Some('F')) {
                raw.push(self.advance().unwrap_or('f'));
            }
            let value = digits.parse::<f64>().map_err(|_| {
                LexError::new(format!("Invalid float literal: {}", raw), loc)
            })?;
            return Ok(Token::FloatLiteral(value, raw, loc));
        }

        let value = if raw.len() > 1 && raw.starts_with('0') {
            // Octal
            i64::from_str_radix(&raw[1..], 8).map_err(|_| {
                LexError::new(format!("Invalid octal literal: {}", raw), loc)
            })?
        } else {
            raw.parse::<i64>().map_err(|_| {
                LexError::new(format!("Invalid integer literal: {}", raw), loc)
            })?
        };

        self.consume_int_suffix(&mut raw);
        Ok(Token::IntLiteral(value, raw, loc))
    }

    fn consume_int_suffix(&mut self, raw: &mut String) {
        while let Some(ch) = self.peek() {
            if matches!(ch, 'u' | 'U' | 'l' | 'L') {
                raw.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(
        &mut self,
        first_char: char,
    ) -> Result<Token, LexError> {
        let loc = SourceLocation::new(self.line, self.column - 1);
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let token = match ident.as_str() {
            "typedef" => Token::Typedef(loc),
            "enum" => Token::Enum(loc),
            "struct" => Token::Struct(loc),
            "union" => Token::Union(loc),
            "const" => Token::Const(loc),
            "volatile" => Token::Volatile(loc),
            "extern" => Token::Extern(loc),
            "static" => Token::Static(loc),
            "inline" | "__inline__" => Token::Inline(loc),
            "unsigned" => Token::Unsigned(loc),
            "signed" => Token::Signed(loc),
            "void" => Token::Void(loc),
            "bool" | "_Bool" => Token::Bool(loc),
            "char" => Token::Char(loc),
            "short" => Token::Short(loc),
            "int" => Token::Int(loc),
            "long" => Token::Long(loc),
            "float" => Token::Float(loc),
            "double" => Token::Double(loc),
            _ => Token::Ident(ident, loc),
        };

        Ok(token)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new("Unterminated block comment", start_loc))
    }

    /// Handle a preprocessor directive. `#define` is captured as a macro;
    /// everything else is skipped to end of line.
    fn preprocessor_directive(&mut self) -> Result<(), LexError> {
        let loc = self.current_location();
        self.advance(); // consume '#'

        while self.peek() == Some(' ') || self.peek() == Some('\t') {
            self.advance();
        }

        let mut directive = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphabetic() {
                directive.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if directive != "define" {
            self.skip_directive_line();
            return Ok(());
        }

        while self.peek() == Some(' ') || self.peek() == Some('\t') {
            self.advance();
        }

        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if name.is_empty() {
            return Err(LexError::new("Expected macro name after #define", loc));
        }

        // A '(' with no intervening space makes the macro function-like.
        let params = if self.peek() == Some('(') {
            self.advance();
            let mut params = Vec::new();
            let mut current = String::new();
            while let Some(ch) = self.peek() {
                self.advance();
                match ch {
                    ')' => break,
                    ',' => {
                        params.push(current.trim().to_string());
                        current.clear();
                    }
                    '\n' => {
                        return Err(LexError::new(
                            "Unterminated macro parameter list",
                            loc,
                        ));
                    }
                    _ => current.push(ch),
                }
            }
            if !current.trim().is_empty() {
                params.push(current.trim().to_string());
            }
            Some(params)
        } else {
            None
        };

        let value = self.directive_rest_of_line();
        self.macros.push(MacroDef {
            name,
            params,
            value,
            location: loc,
        });

        Ok(())
    }

    /// Collect the remainder of a directive line (following continuations)
    /// with comments stripped and runs of whitespace collapsed.
    fn directive_rest_of_line(&mut self) -> String {
        let mut value = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '\n' => {
                    self.advance();
                    break;
                }
                '\\' if self.peek_ahead(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                    value.push(' ');
                }
                '/' if self.peek_ahead(1) == Some('/') => {
                    self.skip_line_comment();
                    break;
                }
                '/' if self.peek_ahead(1) == Some('*') => {
                    // Best effort: an unterminated comment just ends the value
                    let _ = self.skip_block_comment();
                    value.push(' ');
                }
                _ => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        let mut collapsed = String::with_capacity(value.len());
        let mut last_space = false;
        for ch in value.trim().chars() {
            if ch.is_whitespace() {
                if !last_space {
                    collapsed.push(' ');
                }
                last_space = true;
            } else {
                collapsed.push(ch);
                last_space = false;
            }
        }
        collapsed
    }

    /// Skip a non-define directive, honoring `\` line continuations.
    fn skip_directive_line(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\\' && self.peek_ahead(1) == Some('\n') {
                self.advance();
                self.advance();
                continue;
            }
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        if self.position < self.input.len() {
            Some(self.input[self.position])
        } else {
            None
        }
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        let pos = self.position + n;
        if pos < self.input.len() {
            Some(self.input[pos])
        } else {
            None
        }
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        if self.position >= self.input.len() {
            return None;
        }

        let ch = self.input[self.position];
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
