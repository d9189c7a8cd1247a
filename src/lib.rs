//! # Introduction
//!
//! sdlgen reads the public SDL3 C headers and writes Rust FFI binding source
//! files. It is an offline batch tool: one run parses every bound header,
//! collects the declarations, and emits one file per declaration category
//! into a `generated/` directory.
//!
//! ## Generation pipeline
//!
//! ```text
//! include/SDL3/*.h → Lexer → Parser → HeaderUnit → Generator → *.rs
//! ```
//!
//! 1. [`discover`] — scans the umbrella `SDL3/SDL.h` for the ordered list of
//!    headers to bind.
//! 2. [`parser`] — tokenises each header and builds declaration-level ASTs:
//!    enums, structs/unions, typedefs, function declarations, and captured
//!    `#define`s.
//! 3. [`gen`] — collects declarations across headers, translates C spellings
//!    into Rust FFI spellings, and emits `enums.rs`, `constants.rs`,
//!    `handles.rs`, `structs.rs`, and `functions.rs`.
//!
//! Output is deterministic: collection follows header order, so two runs
//! over identical inputs produce byte-identical files.

pub mod discover;
pub mod gen;
pub mod parser;
