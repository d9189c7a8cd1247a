//! Function emission
//!
//! `functions.rs` carries three sections:
//! - callback typedefs as `pub type` aliases over
//!   `Option<unsafe extern "C" fn ...>`
//! - the `extern "C"` block with every bound entry point, signatures
//!   translated and handle pointers collapsed into their newtypes
//! - a `helpers` module with string-marshaling wrappers: `const char*`
//!   parameters take `&str` through a `CString`, and `char*` returns come
//!   back as `Option<String>` (the SDL-owned buffer is freed when the
//!   header transfers ownership)
//!
//! `SDL_free` is declared here explicitly: it lives in a header outside the
//! bound set but the ownership-transferring wrappers need it.

use crate::gen::names;
use crate::gen::writer::CodeWriter;
use crate::gen::{GenError, Generator};
use crate::parser::ast::{CType, FunctionDecl};

/// True when the return value is a C string the caller must copy out of.
/// The non-const spelling transfers ownership.
fn string_return(ty: &CType) -> Option<bool> {
    if ty.is_char_pointer() {
        Some(!ty.is_const_char_pointer())
    } else {
        None
    }
}

impl Generator {
    pub(crate) fn emit_functions(&mut self) -> Result<(), GenError> {
        let mut writer = CodeWriter::new(
            &self.options.output_dir,
            "functions.rs",
            &[
                "core::ffi::{c_char, c_void}",
                "crate::enums::*",
                "crate::handles::*",
                "crate::structs::*",
            ],
        );

        let callbacks = std::mem::take(&mut self.callbacks);
        writer.blank_line();
        for (name, sig) in &callbacks {
            writer.write_line(&format!(
                "pub type {name} = {};",
                self.function_pointer_type(sig)
            ));
        }
        self.callbacks = callbacks;

        let functions = std::mem::take(&mut self.functions);

        writer.blank_line();
        writer.push_block("extern \"C\"");
        writer.write_line("pub fn SDL_free(mem: *mut c_void);");
        for f in &functions {
            writer.write_line(&self.extern_signature(f));
        }
        writer.pop_block();

        let wrapped: Vec<&FunctionDecl> = functions
            .iter()
            .filter(|f| {
                string_return(&f.sig.return_type).is_some()
                    || f.sig.params.iter().any(|p| p.ty.is_const_char_pointer())
            })
            .collect();

        if !wrapped.is_empty() {
            writer.blank_line();
            writer.push_block("pub mod helpers");
            writer.write_line("use std::ffi::{CStr, CString};");
            writer.write_line("use super::*;");
            for f in &wrapped {
                self.write_wrapper(&mut writer, f);
            }
            writer.pop_block();
        }

        self.functions = functions;
        writer.finish()
    }

    fn extern_signature(&self, f: &FunctionDecl) -> String {
        let params: Vec<String> = f
            .sig
            .params
            .iter()
            .map(|p| {
                format!("{}: {}", names::param_name(&p.name), self.type_name(&p.ty))
            })
            .collect();
        match self.return_type_name(&f.sig.return_type) {
            Some(ret) => format!("pub fn {}({}) -> {};", f.name, params.join(", "), ret),
            None => format!("pub fn {}({});", f.name, params.join(", ")),
        }
    }

    fn write_wrapper(&mut self, writer: &mut CodeWriter, f: &FunctionDecl) {
        let returns_string = string_return(&f.sig.return_type);

        let mut params = Vec::new();
        for p in &f.sig.params {
            let name = names::param_name(&p.name);
            if p.ty.is_const_char_pointer() {
                params.push(format!("{name}: &str"));
            } else {
                params.push(format!("{name}: {}", self.type_name(&p.ty)));
            }
        }

        let ret = match returns_string {
            Some(_) => Some("Option<String>".to_string()),
            None => self.return_type_name(&f.sig.return_type),
        };
        let header = match &ret {
            Some(ret) => format!(
                "pub unsafe fn {}({}) -> {}",
                f.name,
                params.join(", "),
                ret
            ),
            None => format!("pub unsafe fn {}({})", f.name, params.join(", ")),
        };

        writer.blank_line();
        writer.push_block(&header);

        // Interior NULs cannot cross the boundary; they degrade to an empty
        // string rather than a panic.
        let mut args = Vec::new();
        for p in &f.sig.params {
            let name = names::param_name(&p.name);
            if p.ty.is_const_char_pointer() {
                writer.write_line(&format!(
                    "let {name} = CString::new({name}).unwrap_or_default();"
                ));
                args.push(format!("{name}.as_ptr()"));
            } else {
                args.push(name);
            }
        }

        let call = format!("super::{}({})", f.name, args.join(", "));
        match returns_string {
            Some(owned) => {
                writer.write_line(&format!("let ptr = {call};"));
                writer.push_block("if ptr.is_null()");
                writer.write_line("return None;");
                writer.pop_block();
                writer.write_line(
                    "let value = CStr::from_ptr(ptr).to_string_lossy().into_owned();",
                );
                if owned {
                    writer.write_line("SDL_free(ptr as *mut c_void);");
                }
                writer.write_line("Some(value)");
            }
            None => match ret {
                Some(_) => writer.write_line(&call),
                None => writer.write_line(&format!("{call};")),
            },
        }

        writer.pop_block();
    }
}
