//! C header parser
//!
//! A small recursive descent parser for the subset of C that SDL's public
//! headers use at the top level. The pipeline is:
//!
//! 1. [`lexer`] — header text to a token stream, capturing `#define`s
//! 2. [`parse`] — the [`Parser`](parse::Parser) coordinator and diagnostics
//! 3. [`declarations`] — typedef/enum/record/function parsing into [`ast`]
//!
//! Function bodies are never parsed; anything that is not a declaration the
//! binding generator models is skipped with a warning diagnostic.

pub mod ast;
pub mod declarations;
pub mod lexer;
pub mod parse;
