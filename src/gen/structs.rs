//! Struct and union emission
//!
//! Records land in `structs.rs` as `#[repr(C)]` types deriving `Clone` and
//! `Copy`. C unions become Rust unions. Nested anonymous records (the
//! `SDL_Event` shape) are lifted to sibling types named `Parent_field`, the
//! field keeping the lifted type. Fixed-size C arrays stay inline as
//! `[T; N]`.

use crate::gen::names;
use crate::gen::writer::CodeWriter;
use crate::gen::{GenError, Generator};
use crate::parser::ast::{FieldKind, RecordDecl, RecordKind};

impl Generator {
    pub(crate) fn emit_structs(&mut self) -> Result<(), GenError> {
        let mut writer = CodeWriter::new(
            &self.options.output_dir,
            "structs.rs",
            &["core::ffi::{c_char, c_void}", "crate::enums::*", "crate::handles::*"],
        );

        let records = std::mem::take(&mut self.records);
        for record in &records {
            let name = record.name.clone();
            self.write_record(&mut writer, record, &name);
        }
        self.records = records;

        writer.finish()
    }

    fn write_record(&mut self, writer: &mut CodeWriter, record: &RecordDecl, name: &str) {
        let keyword = match record.kind {
            RecordKind::Struct => "struct",
            RecordKind::Union => "union",
        };

        // Lifted nested records are emitted after their parent so the file
        // reads top-down.
        let mut lifted: Vec<(String, &RecordDecl)> = Vec::new();

        writer.blank_line();
        writer.write_line("#[repr(C)]");
        writer.write_line("#[derive(Clone, Copy)]");
        writer.push_block(&format!("pub {keyword} {name}"));

        for field in &record.fields {
            let field_name = names::escape_keyword(&field.name);
            if field.bits.is_some() {
                self.warn(format!(
                    "{name}.{}: bitfield widths are not representable, field keeps its underlying type",
                    field.name
                ));
            }
            match &field.kind {
                FieldKind::Plain(ty) => {
                    writer.write_line(&format!(
                        "pub {field_name}: {},",
                        self.type_name(ty)
                    ));
                }
                FieldKind::FunctionPointer(sig) => {
                    writer.write_line(&format!(
                        "pub {field_name}: {},",
                        self.function_pointer_type(sig)
                    ));
                }
                FieldKind::Record(nested) => {
                    if field.name.is_empty() {
                        self.warn(format!(
                            "{name}: unnamed nested record dropped"
                        ));
                        continue;
                    }
                    let lifted_name = if nested.is_anonymous {
                        format!("{name}_{}", field.name)
                    } else {
                        nested.name.clone()
                    };
                    writer.write_line(&format!("pub {field_name}: {lifted_name},"));
                    lifted.push((lifted_name, nested));
                }
            }
        }

        writer.pop_block();

        for (lifted_name, nested) in lifted {
            self.write_record(writer, nested, &lifted_name);
        }
    }
}
