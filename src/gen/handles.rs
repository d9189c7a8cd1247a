//! Handle emission
//!
//! Two shapes land in `handles.rs`:
//! - opaque struct typedefs (`typedef struct SDL_Window SDL_Window;`) become
//!   `#[repr(transparent)]` newtypes over a raw pointer, with `null()` and
//!   `is_null()` so call sites never touch the inner pointer directly
//! - primitive typedefs (`typedef Uint32 SDL_WindowID;`) become
//!   `#[repr(transparent)]` newtypes over the mapped integer, ordered and
//!   hashable like the integer itself

use crate::gen::names;
use crate::gen::writer::CodeWriter;
use crate::gen::{GenError, Generator};

impl Generator {
    pub(crate) fn emit_handles(&mut self) -> Result<(), GenError> {
        let mut writer = CodeWriter::new(
            &self.options.output_dir,
            "handles.rs",
            &["core::ffi::c_void"],
        );

        let integer_handles = std::mem::take(&mut self.integer_handles);
        for (name, ty) in &integer_handles {
            let inner = names::rust_type_name(ty);
            writer.blank_line();
            writer.write_line("#[repr(transparent)]");
            writer.write_line(
                "#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]",
            );
            writer.write_line(&format!("pub struct {name}(pub {inner});"));
            writer.blank_line();
            writer.push_block(&format!("impl {name}"));
            writer.write_line(&format!(
                "pub const fn raw(self) -> {inner} {{ self.0 }}"
            ));
            writer.pop_block();
        }
        self.integer_handles = integer_handles;

        let pointer_handles = std::mem::take(&mut self.pointer_handles);
        for name in &pointer_handles {
            writer.blank_line();
            writer.write_line("#[repr(transparent)]");
            writer.write_line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
            writer.write_line(&format!("pub struct {name}(pub *mut c_void);"));
            writer.blank_line();
            writer.push_block(&format!("impl {name}"));
            writer.write_line(&format!(
                "pub const fn null() -> {name} {{ {name}(core::ptr::null_mut()) }}"
            ));
            writer.write_line("pub fn is_null(self) -> bool { self.0.is_null() }");
            writer.pop_block();
        }
        self.pointer_handles = pointer_handles;

        writer.finish()
    }
}
