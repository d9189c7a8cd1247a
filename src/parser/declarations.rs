//! Declaration parsing implementation
//!
//! This module handles parsing of top-level declarations in C headers:
//!
//! - Enum typedefs: `typedef enum [Name] { ... } Name;`
//! - Struct/union typedefs: `typedef struct [Name] { ... } Name;`
//! - Opaque handle typedefs: `typedef struct SDL_Window SDL_Window;`
//! - Alias typedefs: `typedef Uint32 SDL_WindowID;`
//! - Function-pointer typedefs: `typedef void (SDLCALL *Name)(params);`
//! - Function declarations: `extern SDL_DECLSPEC R SDLCALL SDL_Name(params);`
//!
//! # Grammar
//!
//! ```text
//! declaration ::= typedef_decl | function_decl | extern_c_open | ";"
//! typedef_decl ::= "typedef" (enum_def | record_def | fn_ptr | alias) ";"
//! function_decl ::= ["extern"] decoration* type decoration* name "(" params ")" ";"
//! type        ::= qualifier* base_type "*"*
//! ```
//!
//! Annotation macros that survive into the token stream (`SDL_DECLSPEC`,
//! `SDLCALL`, capability annotations, ...) are skipped by a lookup, including
//! any parenthesized arguments. All parsing methods are implemented as
//! `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use rustc_hash::FxHashMap;

/// Annotation/decoration macros that appear inside declarations and carry no
/// binding-level meaning.
fn is_decoration(name: &str) -> bool {
    matches!(
        name,
        "SDL_DECLSPEC"
            | "SDLCALL"
            | "SDL_MALLOC"
            | "SDL_ALLOC_SIZE"
            | "SDL_ALLOC_SIZE2"
            | "SDL_FORCE_INLINE"
            | "SDL_DEPRECATED"
            | "SDL_NODISCARD"
            | "SDL_NORETURN"
            | "SDL_ANALYZER_NORETURN"
            | "SDL_PRINTF_VARARG_FUNC"
            | "SDL_PRINTF_VARARG_FUNCV"
            | "SDL_WPRINTF_VARARG_FUNC"
            | "SDL_WPRINTF_VARARG_FUNCV"
            | "SDL_SCANF_VARARG_FUNC"
            | "SDL_SCANF_VARARG_FUNCV"
            | "SDL_PRINTF_FORMAT_STRING"
            | "SDL_SCANF_FORMAT_STRING"
            | "SDL_IN_BYTECAP"
            | "SDL_INOUT_Z_CAP"
            | "SDL_OUT_Z_CAP"
            | "SDL_OUT_CAP"
            | "SDL_OUT_BYTECAP"
            | "SDL_OUT_Z_BYTECAP"
            | "SDL_ACQUIRE"
            | "SDL_ACQUIRE_SHARED"
            | "SDL_RELEASE"
            | "SDL_RELEASE_SHARED"
            | "SDL_RELEASE_GENERIC"
            | "SDL_TRY_ACQUIRE"
            | "SDL_TRY_ACQUIRE_SHARED"
            | "SDL_GUARDED_BY"
            | "SDL_FALLTHROUGH"
            | "__attribute__"
            | "__declspec"
    )
}

impl Parser {
    /// Parse one top-level construct. Returns `None` for constructs that
    /// produce no declaration (stray semicolons, `extern "C"` wrappers, and
    /// skipped unrecognized input).
    pub(crate) fn parse_top_level_declaration(
        &mut self,
    ) -> Result<Option<Declaration>, ParseError> {
        // Stray semicolons and the closing brace of an `extern "C"` block
        if self.match_token(&Token::Semicolon(self.current_location())) {
            return Ok(None);
        }
        if self.match_token(&Token::RBrace(self.current_location())) {
            return Ok(None);
        }

        if self.check(&Token::Typedef(self.current_location())) {
            return self.parse_typedef().map(Some);
        }

        if self.check(&Token::Extern(self.current_location())) {
            // `extern "C" {` opens a linkage block; anything else introduces
            // an exported function declaration.
            if matches!(self.peek_ahead(1), Some(Token::StringLiteral(_, _))) {
                self.advance(); // 'extern'
                self.advance(); // "C"
                self.expect_lbrace("after extern \"C\"")?;
                return Ok(None);
            }

            self.advance(); // 'extern'
            return self.parse_function_declaration().map(Some);
        }

        // Inline helper functions and compile-time asserts are not part of
        // the binding surface. SDL_FORCE_INLINE expands to `static inline`.
        if self.check(&Token::Static(self.current_location()))
            || self.check(&Token::Inline(self.current_location()))
            || matches!(self.peek_token(), Token::Ident(name, _) if name == "SDL_FORCE_INLINE")
        {
            let loc = self.current_location();
            self.warn("Skipping static/inline definition", loc);
            self.skip_declaration();
            return Ok(None);
        }

        if self.starts_type() {
            return self.parse_function_declaration().map(Some);
        }

        let loc = self.current_location();
        self.warn(
            format!("Skipping unrecognized construct starting at {}", self.peek()),
            loc,
        );
        self.skip_declaration();
        Ok(None)
    }

    /// Parse a `typedef` declaration (enum, record, opaque, alias, or
    /// function pointer).
    pub(crate) fn parse_typedef(&mut self) -> Result<Declaration, ParseError> {
        self.expect_token(
            &Token::Typedef(self.current_location()),
            "Expected 'typedef'",
        )?;
        let loc = self.previous_location();

        if self.match_token(&Token::Enum(self.current_location())) {
            // Optional tag, then the definition body
            if matches!(self.peek_token(), Token::Ident(_, _)) {
                self.advance();
            }
            self.expect_lbrace("after enum introducer")?;
            let items = self.parse_enum_items()?;
            self.expect_rbrace("after enum items")?;
            let name = self.expect_identifier()?;
            self.expect_semicolon("after enum typedef")?;

            return Ok(Declaration::Enum(EnumDecl {
                name,
                items,
                location: loc,
            }));
        }

        let record_kind = if self.match_token(&Token::Struct(self.current_location())) {
            Some(RecordKind::Struct)
        } else if self.match_token(&Token::Union(self.current_location())) {
            Some(RecordKind::Union)
        } else {
            None
        };

        if let Some(kind) = record_kind {
            // Optional tag name
            let mut tag = String::new();
            if let Token::Ident(name, _) = self.peek_token() {
                tag = name;
                self.advance();
            }

            if self.check(&Token::LBrace(self.current_location())) {
                self.advance();
                let fields = self.parse_record_fields()?;
                self.expect_rbrace("after fields")?;
                let name = self.expect_identifier()?;
                self.expect_semicolon("after struct typedef")?;

                return Ok(Declaration::Record(RecordDecl {
                    name,
                    kind,
                    fields,
                    is_anonymous: false,
                    location: loc,
                }));
            }

            // `typedef struct Tag Name;` — a forward declaration, which is
            // how SDL spells its opaque handle types.
            let name = if matches!(self.peek_token(), Token::Ident(_, _)) {
                self.expect_identifier()?
            } else {
                tag
            };
            self.expect_semicolon("after opaque typedef")?;

            return Ok(Declaration::Typedef(TypedefDecl {
                name,
                body: TypedefBody::OpaqueRecord,
                location: loc,
            }));
        }

        // Alias or function-pointer typedef
        let base = self.parse_type()?;

        if self.check(&Token::LParen(self.current_location())) {
            let (name, sig) = self.parse_function_pointer_declarator(base)?;
            self.expect_semicolon("after function pointer typedef")?;

            return Ok(Declaration::Typedef(TypedefDecl {
                name,
                body: TypedefBody::FunctionPointer(sig),
                location: loc,
            }));
        }

        let name = self.expect_identifier()?;
        let ty = self.parse_array_dims(base)?;
        self.expect_semicolon("after typedef")?;

        Ok(Declaration::Typedef(TypedefDecl {
            name,
            body: TypedefBody::Alias(ty),
            location: loc,
        }))
    }

    /// Parse an exported function declaration (the `extern` keyword has
    /// already been consumed when present).
    pub(crate) fn parse_function_declaration(
        &mut self,
    ) -> Result<Declaration, ParseError> {
        self.skip_decorations();
        let return_type = self.parse_type()?;
        self.skip_decorations();
        let name = self.expect_identifier()?;
        let loc = self.previous_location();

        self.expect_lparen("after function name")?;
        let (params, variadic) = self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;
        self.skip_decorations();
        self.expect_semicolon("after function declaration")?;

        Ok(Declaration::Function(FunctionDecl {
            name,
            sig: FunctionSig {
                return_type,
                params,
                variadic,
            },
            location: loc,
        }))
    }

    /// Parse `( SDLCALL? * Name ) ( params )` after the return type.
    pub(crate) fn parse_function_pointer_declarator(
        &mut self,
        return_type: CType,
    ) -> Result<(String, FunctionSig), ParseError> {
        self.expect_lparen("before function pointer declarator")?;
        self.skip_decorations();
        self.expect_token(
            &Token::Star(self.current_location()),
            "Expected '*' in function pointer declarator",
        )?;
        let name = self.expect_identifier()?;
        self.expect_rparen("after function pointer name")?;

        self.expect_lparen("before function pointer parameters")?;
        let (params, variadic) = self.parse_parameter_list()?;
        self.expect_rparen("after function pointer parameters")?;

        Ok((
            name,
            FunctionSig {
                return_type,
                params,
                variadic,
            },
        ))
    }

    /// Parse parameter list: (type name, type name, ...)
    pub(crate) fn parse_parameter_list(
        &mut self,
    ) -> Result<(Vec<Param>, bool), ParseError> {
        let mut params = Vec::new();
        let mut variadic = false;

        if self.check(&Token::RParen(self.current_location())) {
            return Ok((params, variadic));
        }

        // Special case: (void) means no parameters in C
        if self.check(&Token::Void(self.current_location()))
            && matches!(self.peek_ahead(1), Some(Token::RParen(_)))
        {
            self.advance();
            return Ok((params, variadic));
        }

        loop {
            if self.match_token(&Token::Ellipsis(self.current_location())) {
                variadic = true;
                break;
            }

            self.skip_decorations();
            let base = self.parse_type()?;

            // Function-pointer parameter spelled inline rather than through
            // a callback typedef
            if self.check(&Token::LParen(self.current_location())) {
                let (name, sig) = self.parse_function_pointer_declarator(base)?;
                params.push(Param {
                    name,
                    ty: CType::FunctionPointer(Box::new(sig)),
                });
            } else {
                let name = if let Token::Ident(name, _) = self.peek_token() {
                    self.advance();
                    name
                } else {
                    format!("arg{}", params.len())
                };

                // Array parameters decay to pointers
                let mut ty = base;
                while self.match_token(&Token::LBracket(self.current_location())) {
                    if !self.check(&Token::RBracket(self.current_location())) {
                        self.parse_const_expr()?;
                    }
                    self.expect_token(
                        &Token::RBracket(self.current_location()),
                        "Expected ']' after array parameter",
                    )?;
                    ty = CType::pointer_to(ty, false);
                }

                params.push(Param { name, ty });
            }

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok((params, variadic))
    }

    /// Parse struct/union fields until the closing brace.
    pub(crate) fn parse_record_fields(&mut self) -> Result<Vec<FieldDecl>, ParseError> {
        let mut fields = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) {
            // Nested struct/union definition, usually anonymous (SDL_Event
            // style unions)
            let nested_kind = if self.check(&Token::Struct(self.current_location()))
                && matches!(self.peek_ahead(1), Some(Token::LBrace(_)))
                || self.check(&Token::Struct(self.current_location()))
                    && matches!(self.peek_ahead(1), Some(Token::Ident(_, _)))
                    && matches!(self.peek_ahead(2), Some(Token::LBrace(_)))
            {
                Some(RecordKind::Struct)
            } else if self.check(&Token::Union(self.current_location()))
                && (matches!(self.peek_ahead(1), Some(Token::LBrace(_)))
                    || matches!(self.peek_ahead(2), Some(Token::LBrace(_))))
            {
                Some(RecordKind::Union)
            } else {
                None
            };

            if let Some(kind) = nested_kind {
                let loc = self.current_location();
                self.advance(); // 'struct' / 'union'

                let mut tag = String::new();
                if let Token::Ident(name, _) = self.peek_token() {
                    tag = name;
                    self.advance();
                }

                self.expect_lbrace("after nested record introducer")?;
                let nested_fields = self.parse_record_fields()?;
                self.expect_rbrace("after nested record fields")?;

                let field_name = if let Token::Ident(name, _) = self.peek_token() {
                    self.advance();
                    name
                } else {
                    String::new()
                };
                self.expect_semicolon("after nested record field")?;

                let is_anonymous = tag.is_empty();
                fields.push(FieldDecl {
                    name: field_name,
                    kind: FieldKind::Record(RecordDecl {
                        name: tag,
                        kind,
                        fields: nested_fields,
                        is_anonymous,
                        location: loc,
                    }),
                    bits: None,
                    location: loc,
                });
                continue;
            }

            let base = self.parse_type()?;

            // Function-pointer field (interface structs like
            // SDL_StorageInterface)
            if self.check(&Token::LParen(self.current_location())) {
                let loc = self.current_location();
                let (name, sig) = self.parse_function_pointer_declarator(base)?;
                self.expect_semicolon("after function pointer field")?;
                fields.push(FieldDecl {
                    name,
                    kind: FieldKind::FunctionPointer(sig),
                    bits: None,
                    location: loc,
                });
                continue;
            }

            // One or more declarators sharing the base type: `int x, *y;`
            loop {
                let mut ty = base.clone();
                while self.match_token(&Token::Star(self.current_location())) {
                    ty = CType::pointer_to(ty, false);
                    self.match_token(&Token::Const(self.current_location()));
                }

                let loc = self.current_location();
                let name = self.expect_identifier()?;
                let ty = self.parse_array_dims(ty)?;

                let bits = if self.match_token(&Token::Colon(self.current_location())) {
                    let expr = self.parse_const_expr()?;
                    match eval_const_expr(&expr, &FxHashMap::default()) {
                        Some(width) => Some(width as u32),
                        None => {
                            return Err(ParseError::new(
                                "Bitfield width must be a constant integer",
                                self.current_location(),
                            ));
                        }
                    }
                } else {
                    None
                };

                fields.push(FieldDecl {
                    name,
                    kind: FieldKind::Plain(ty),
                    bits,
                    location: loc,
                });

                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
            self.expect_semicolon("after struct field")?;
        }

        Ok(fields)
    }

    /// Parse enumerators until the closing brace, computing each value
    /// (explicit or auto-incremented) where the expression resolves.
    pub(crate) fn parse_enum_items(&mut self) -> Result<Vec<EnumItem>, ParseError> {
        let mut items: Vec<EnumItem> = Vec::new();
        let mut env: FxHashMap<String, i64> = FxHashMap::default();
        let mut next_value: Option<i64> = Some(0);

        while !self.check(&Token::RBrace(self.current_location())) {
            let loc = self.current_location();
            let name = self.expect_identifier()?;

            let (expr, computed) =
                if self.match_token(&Token::Eq(self.current_location())) {
                    let expr = self.parse_const_expr()?;
                    let computed = eval_const_expr(&expr, &env);
                    (Some(expr), computed)
                } else {
                    (None, next_value)
                };

            if let Some(value) = computed {
                env.insert(name.clone(), value);
                next_value = value.checked_add(1);
            } else {
                next_value = None;
            }

            items.push(EnumItem {
                name,
                expr,
                computed,
                location: loc,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(items)
    }

    /// Parse type: qualifier* base_type [*]*
    ///
    /// Array dimensions are handled at the declarator site
    /// ([`parse_array_dims`](Self::parse_array_dims)), matching where they
    /// appear in C.
    pub(crate) fn parse_type(&mut self) -> Result<CType, ParseError> {
        let mut is_const = false;
        loop {
            if self.match_token(&Token::Const(self.current_location())) {
                is_const = true;
            } else if self.match_token(&Token::Volatile(self.current_location())) {
                // Qualifier with no binding-level meaning
            } else {
                break;
            }
        }

        let base = self.parse_base_type()?;

        // `char const *` spells the qualifier after the base
        if self.match_token(&Token::Const(self.current_location())) {
            is_const = true;
        }

        let mut ty = base;
        let mut pointee_const = is_const;
        while self.match_token(&Token::Star(self.current_location())) {
            ty = CType::pointer_to(ty, pointee_const);
            // `T * const` qualifies the pointer itself; irrelevant here
            pointee_const = self.match_token(&Token::Const(self.current_location()));
        }

        Ok(ty)
    }

    fn parse_base_type(&mut self) -> Result<CType, ParseError> {
        use PrimitiveKind::*;

        if self.match_token(&Token::Void(self.current_location())) {
            return Ok(CType::Primitive(Void));
        }
        if self.match_token(&Token::Bool(self.current_location())) {
            return Ok(CType::Primitive(Bool));
        }
        if self.match_token(&Token::Float(self.current_location())) {
            return Ok(CType::Primitive(Float));
        }
        if self.match_token(&Token::Double(self.current_location())) {
            return Ok(CType::Primitive(Double));
        }
        if self.match_token(&Token::Char(self.current_location())) {
            return Ok(CType::Primitive(Char));
        }

        if self.match_token(&Token::Unsigned(self.current_location())) {
            return Ok(CType::Primitive(self.parse_int_kind(false)?));
        }
        if self.match_token(&Token::Signed(self.current_location())) {
            return Ok(CType::Primitive(self.parse_int_kind(true)?));
        }
        if self.check(&Token::Short(self.current_location()))
            || self.check(&Token::Int(self.current_location()))
            || self.check(&Token::Long(self.current_location()))
        {
            return Ok(CType::Primitive(self.parse_int_kind(true)?));
        }

        // `struct Name` / `union Name` / `enum Name` in type position
        if self.match_token(&Token::Struct(self.current_location()))
            || self.match_token(&Token::Union(self.current_location()))
            || self.match_token(&Token::Enum(self.current_location()))
        {
            let name = self.expect_identifier()?;
            return Ok(CType::Named(name));
        }

        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            return Ok(CType::Named(name));
        }

        Err(ParseError::new(
            format!("Expected type, found {}", self.peek()),
            self.current_location(),
        ))
    }

    /// Parse the width spellings of an integer type after an optional
    /// `signed`/`unsigned` has been consumed.
    fn parse_int_kind(&mut self, signed: bool) -> Result<PrimitiveKind, ParseError> {
        use PrimitiveKind::*;

        if self.match_token(&Token::Char(self.current_location())) {
            return Ok(if signed { SignedChar } else { UnsignedChar });
        }
        if self.match_token(&Token::Short(self.current_location())) {
            self.match_token(&Token::Int(self.current_location()));
            return Ok(if signed { Short } else { UnsignedShort });
        }
        if self.match_token(&Token::Long(self.current_location())) {
            if self.match_token(&Token::Long(self.current_location())) {
                self.match_token(&Token::Int(self.current_location()));
                return Ok(if signed { LongLong } else { UnsignedLongLong });
            }
            if self.match_token(&Token::Double(self.current_location())) {
                return Ok(LongDouble);
            }
            self.match_token(&Token::Int(self.current_location()));
            return Ok(if signed { Long } else { UnsignedLong });
        }
        self.match_token(&Token::Int(self.current_location()));
        Ok(if signed { Int } else { UnsignedInt })
    }

    /// Append `[N]` dimensions to a declarator's type. Multi-dimensional
    /// arrays nest inner dimensions innermost.
    pub(crate) fn parse_array_dims(&mut self, base: CType) -> Result<CType, ParseError> {
        let mut dims = Vec::new();
        while self.match_token(&Token::LBracket(self.current_location())) {
            let expr = self.parse_const_expr()?;
            let size = eval_const_expr(&expr, &FxHashMap::default()).ok_or_else(|| {
                ParseError::new(
                    "Array size must be a constant integer",
                    self.current_location(),
                )
            })?;
            self.expect_token(
                &Token::RBracket(self.current_location()),
                "Expected ']' after array size",
            )?;
            dims.push(size as usize);
        }

        let mut ty = base;
        for size in dims.into_iter().rev() {
            ty = CType::array_of(ty, size);
        }
        Ok(ty)
    }

    /// True when the next token can open a type in a declaration.
    fn starts_type(&self) -> bool {
        matches!(
            self.peek_token(),
            Token::Void(_)
                | Token::Bool(_)
                | Token::Char(_)
                | Token::Short(_)
                | Token::Int(_)
                | Token::Long(_)
                | Token::Float(_)
                | Token::Double(_)
                | Token::Unsigned(_)
                | Token::Signed(_)
                | Token::Const(_)
                | Token::Struct(_)
                | Token::Union(_)
        )
    }

    /// Skip annotation macros (with any parenthesized arguments).
    pub(crate) fn skip_decorations(&mut self) {
        while let Token::Ident(name, _) = self.peek_token() {
            if !is_decoration(&name) {
                break;
            }
            self.advance();

            if self.match_token(&Token::LParen(self.current_location())) {
                let mut depth = 1usize;
                while depth > 0 && !self.is_at_end() {
                    match self.peek_token() {
                        Token::LParen(_) => depth += 1,
                        Token::RParen(_) => depth -= 1,
                        _ => {}
                    }
                    self.advance();
                }
            }
        }
    }

    /// Skip an unrecognized top-level construct: past the next ';' at brace
    /// depth zero, or past a balanced top-level brace block (function body),
    /// whichever ends it.
    pub(crate) fn skip_declaration(&mut self) {
        let mut depth = 0usize;
        let mut entered_block = false;
        while !self.is_at_end() {
            match self.peek_token() {
                Token::LBrace(_) => {
                    depth += 1;
                    entered_block = true;
                }
                Token::RBrace(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && entered_block {
                        self.advance();
                        // Optional trailing ';' after the block
                        self.match_token(&Token::Semicolon(self.current_location()));
                        return;
                    }
                }
                Token::Semicolon(_) if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ===== Constant expressions =====

    /// Parse a constant expression (enumerator values, array sizes).
    /// Precedence: `|` < `^` < `&` < `<< >>` < `+ -` < `*` < unary.
    pub(crate) fn parse_const_expr(&mut self) -> Result<ConstExpr, ParseError> {
        self.parse_bitor_expr()
    }

    fn parse_bitor_expr(&mut self) -> Result<ConstExpr, ParseError> {
        let mut lhs = self.parse_bitxor_expr()?;
        while self.match_token(&Token::Pipe(self.current_location())) {
            let rhs = self.parse_bitxor_expr()?;
            lhs = ConstExpr::Binary {
                op: BinaryOp::BitOr,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_bitxor_expr(&mut self) -> Result<ConstExpr, ParseError> {
        let mut lhs = self.parse_bitand_expr()?;
        while self.match_token(&Token::Caret(self.current_location())) {
            let rhs = self.parse_bitand_expr()?;
            lhs = ConstExpr::Binary {
                op: BinaryOp::BitXor,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_bitand_expr(&mut self) -> Result<ConstExpr, ParseError> {
        let mut lhs = self.parse_shift_expr()?;
        while self.match_token(&Token::Amp(self.current_location())) {
            let rhs = self.parse_shift_expr()?;
            lhs = ConstExpr::Binary {
                op: BinaryOp::BitAnd,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_shift_expr(&mut self) -> Result<ConstExpr, ParseError> {
        let mut lhs = self.parse_additive_expr()?;
        loop {
            let op = if self.match_token(&Token::LtLt(self.current_location())) {
                BinaryOp::Shl
            } else if self.match_token(&Token::GtGt(self.current_location())) {
                BinaryOp::Shr
            } else {
                break;
            };
            let rhs = self.parse_additive_expr()?;
            lhs = ConstExpr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_additive_expr(&mut self) -> Result<ConstExpr, ParseError> {
        let mut lhs = self.parse_multiplicative_expr()?;
        loop {
            let op = if self.match_token(&Token::Plus(self.current_location())) {
                BinaryOp::Add
            } else if self.match_token(&Token::Minus(self.current_location())) {
                BinaryOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_multiplicative_expr()?;
            lhs = ConstExpr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_multiplicative_expr(&mut self) -> Result<ConstExpr, ParseError> {
        let mut lhs = self.parse_unary_expr()?;
        while self.match_token(&Token::Star(self.current_location())) {
            let rhs = self.parse_unary_expr()?;
            lhs = ConstExpr::Binary {
                op: BinaryOp::Mul,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary_expr(&mut self) -> Result<ConstExpr, ParseError> {
        if self.match_token(&Token::Minus(self.current_location())) {
            let operand = self.parse_unary_expr()?;
            return Ok(ConstExpr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        if self.match_token(&Token::Tilde(self.current_location())) {
            let operand = self.parse_unary_expr()?;
            return Ok(ConstExpr::Unary {
                op: UnaryOp::BitNot,
                operand: Box::new(operand),
            });
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> Result<ConstExpr, ParseError> {
        if self.match_token(&Token::LParen(self.current_location())) {
            let inner = self.parse_const_expr()?;
            self.expect_rparen("after parenthesized expression")?;
            return Ok(ConstExpr::Paren(Box::new(inner)));
        }

        match self.peek_token() {
            Token::IntLiteral(value, raw, _) => {
                self.advance();
                Ok(ConstExpr::IntLiteral { value, raw })
            }
            Token::CharLiteral(value, _) => {
                self.advance();
                Ok(ConstExpr::IntLiteral {
                    value,
                    raw: value.to_string(),
                })
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(ConstExpr::Ident(name))
            }
            other => Err(ParseError::new(
                format!("Expected constant expression, found {}", other),
                self.current_location(),
            )),
        }
    }
}

/// Evaluate a constant expression against previously resolved names.
/// Returns `None` when the expression references anything outside `env`.
pub fn eval_const_expr(
    expr: &ConstExpr,
    env: &FxHashMap<String, i64>,
) -> Option<i64> {
    match expr {
        ConstExpr::IntLiteral { value, .. } => Some(*value),
        ConstExpr::Ident(name) => env.get(name).copied(),
        ConstExpr::Paren(inner) => eval_const_expr(inner, env),
        ConstExpr::Unary { op, operand } => {
            let value = eval_const_expr(operand, env)?;
            Some(match op {
                UnaryOp::Neg => value.wrapping_neg(),
                UnaryOp::BitNot => !value,
            })
        }
        ConstExpr::Binary { op, lhs, rhs } => {
            let lhs = eval_const_expr(lhs, env)?;
            let rhs = eval_const_expr(rhs, env)?;
            Some(match op {
                BinaryOp::BitOr => lhs | rhs,
                BinaryOp::BitAnd => lhs & rhs,
                BinaryOp::BitXor => lhs ^ rhs,
                BinaryOp::Shl => lhs.wrapping_shl(rhs as u32),
                BinaryOp::Shr => lhs.wrapping_shr(rhs as u32),
                BinaryOp::Add => lhs.wrapping_add(rhs),
                BinaryOp::Sub => lhs.wrapping_sub(rhs),
                BinaryOp::Mul => lhs.wrapping_mul(rhs),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> HeaderUnit {
        let mut parser = Parser::new(source).expect("lexing failed");
        parser.parse_header("test.h").expect("parsing failed")
    }

    #[test]
    fn test_enum_expression_values() {
        let unit = parse(
            r#"
            typedef enum SDL_Mode
            {
                SDL_MODE_NONE = 0,
                SDL_MODE_A = 1 << 4,
                SDL_MODE_B = SDL_MODE_A | 0x01,
                SDL_MODE_NEG = -1
            } SDL_Mode;
            "#,
        );

        let Declaration::Enum(decl) = &unit.decls[0] else {
            panic!("expected enum");
        };
        assert_eq!(decl.items[1].computed, Some(16));
        assert_eq!(decl.items[2].computed, Some(17));
        assert_eq!(decl.items[3].computed, Some(-1));
    }

    #[test]
    fn test_union_with_anonymous_struct() {
        let unit = parse(
            r#"
            typedef union SDL_Value
            {
                int i;
                float f;
                struct
                {
                    int lo;
                    int hi;
                } pair;
            } SDL_Value;
            "#,
        );

        let Declaration::Record(decl) = &unit.decls[0] else {
            panic!("expected record");
        };
        assert_eq!(decl.kind, RecordKind::Union);
        assert_eq!(decl.fields.len(), 3);
        match &decl.fields[2].kind {
            FieldKind::Record(nested) => {
                assert!(nested.is_anonymous);
                assert_eq!(nested.fields.len(), 2);
            }
            other => panic!("expected nested record, got {:?}", other),
        }
    }

    #[test]
    fn test_fixed_array_field() {
        let unit = parse(
            r#"
            typedef struct SDL_Guid
            {
                Uint8 data[16];
            } SDL_Guid;
            "#,
        );

        let Declaration::Record(decl) = &unit.decls[0] else {
            panic!("expected record");
        };
        match &decl.fields[0].kind {
            FieldKind::Plain(CType::Array { size, .. }) => assert_eq!(*size, 16),
            other => panic!("expected array field, got {:?}", other),
        }
    }

    #[test]
    fn test_function_pointer_typedef() {
        let unit = parse(
            "typedef void (SDLCALL *SDL_AudioStreamCallback)(void *userdata, SDL_AudioStream *stream, int additional_amount, int total_amount);",
        );

        let Declaration::Typedef(decl) = &unit.decls[0] else {
            panic!("expected typedef");
        };
        assert_eq!(decl.name, "SDL_AudioStreamCallback");
        match &decl.body {
            TypedefBody::FunctionPointer(sig) => {
                assert_eq!(sig.params.len(), 4);
                assert_eq!(sig.params[0].name, "userdata");
            }
            other => panic!("expected function pointer body, got {:?}", other),
        }
    }

    #[test]
    fn test_variadic_function() {
        let unit = parse(
            "extern SDL_DECLSPEC void SDLCALL SDL_Log(const char *fmt, ...) SDL_PRINTF_VARARG_FUNC(1);",
        );

        let Declaration::Function(decl) = &unit.decls[0] else {
            panic!("expected function");
        };
        assert!(decl.sig.variadic);
        assert_eq!(decl.sig.params.len(), 1);
    }

    #[test]
    fn test_extern_c_wrapper_skipped() {
        let unit = parse(
            r#"
            extern "C" {
            typedef struct SDL_Window SDL_Window;
            }
            "#,
        );

        assert_eq!(unit.decls.len(), 1);
        assert!(matches!(unit.decls[0], Declaration::Typedef(_)));
    }

    #[test]
    fn test_static_inline_skipped_with_warning() {
        let source = r#"
            static int helper(int x) { return x + 1; }
            typedef struct SDL_Point { int x; int y; } SDL_Point;
        "#;
        let mut parser = Parser::new(source).unwrap();
        let unit = parser.parse_header("test.h").unwrap();

        assert_eq!(unit.decls.len(), 1);
        assert_eq!(parser.diagnostics().len(), 1);
    }
}
