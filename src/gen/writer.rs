//! Indentation-aware source writer
//!
//! [`CodeWriter`] buffers one output file in memory and lands it on disk via
//! a temp file and rename, so a failed run never leaves a truncated file
//! behind.
//! Indentation is four spaces per level, managed with `push_block`/
//! `pop_block` around brace-delimited items.

use std::fs;
use std::path::{Path, PathBuf};

use crate::gen::GenError;

const INDENT: &str = "    ";

/// Every generated file opens with this banner.
const BANNER: &str = "\
//! Machine generated. Do not edit by hand.
#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals, dead_code)]
";

pub struct CodeWriter {
    path: PathBuf,
    buffer: String,
    indent: usize,
}

impl CodeWriter {
    /// Create a writer for `<dir>/<file_name>` and emit the banner plus the
    /// given `use` imports.
    pub fn new(dir: &Path, file_name: &str, imports: &[&str]) -> Self {
        let mut writer = Self {
            path: dir.join(file_name),
            buffer: String::new(),
            indent: 0,
        };
        writer.buffer.push_str(BANNER);
        if !imports.is_empty() {
            writer.blank_line();
            for import in imports {
                writer.write_line(&format!("use {import};"));
            }
        }
        writer
    }

    /// Write one line at the current indent level.
    pub fn write_line(&mut self, line: &str) {
        if line.is_empty() {
            self.blank_line();
            return;
        }
        for _ in 0..self.indent {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    /// Write an empty line, collapsing runs of blanks to one.
    pub fn blank_line(&mut self) {
        if !self.buffer.ends_with("\n\n") {
            self.buffer.push('\n');
        }
    }

    /// Open a brace block: writes `header {` and indents.
    pub fn push_block(&mut self, header: &str) {
        self.write_line(&format!("{header} {{"));
        self.indent += 1;
    }

    /// Close the innermost brace block.
    pub fn pop_block(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.write_line("}");
    }

    /// Flush the buffered file to disk. The content goes through a sibling
    /// temp file and a rename, so an I/O failure mid-write cannot leave a
    /// truncated output file.
    pub fn finish(self) -> Result<(), GenError> {
        let tmp = self.path.with_extension("rs.tmp");
        fs::write(&tmp, self.buffer).map_err(|source| GenError::Write {
            path: self.path.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| GenError::Write {
            path: self.path,
            source,
        })
    }

    #[cfg(test)]
    pub(crate) fn contents(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_indentation() {
        let mut w = CodeWriter::new(Path::new("/tmp"), "out.rs", &[]);
        w.push_block("pub struct Foo");
        w.write_line("pub x: i32,");
        w.push_block("impl Bar");
        w.write_line("const N: i32 = 1;");
        w.pop_block();
        w.pop_block();

        let text = w.contents();
        assert!(text.starts_with("//! Machine generated"));
        assert!(text.contains("pub struct Foo {\n    pub x: i32,\n"));
        assert!(text.contains("    impl Bar {\n        const N: i32 = 1;\n    }\n"));
    }

    #[test]
    fn test_finish_renames_over_temp_file() {
        let dir = std::env::temp_dir().join(format!(
            "sdlgen-writer-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        fs::create_dir_all(&dir).unwrap();

        let mut w = CodeWriter::new(&dir, "out.rs", &[]);
        w.write_line("pub const A: u32 = 1;");
        w.finish().unwrap();

        let text = fs::read_to_string(dir.join("out.rs")).unwrap();
        assert!(text.contains("pub const A: u32 = 1;"));
        assert!(!dir.join("out.rs.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_imports_and_blank_collapse() {
        let mut w = CodeWriter::new(Path::new("/tmp"), "out.rs", &["core::ffi::c_void"]);
        w.blank_line();
        w.blank_line();
        w.write_line("pub const A: u32 = 1;");

        let text = w.contents();
        assert!(text.contains("use core::ffi::c_void;\n\npub const A: u32 = 1;\n"));
    }
}
