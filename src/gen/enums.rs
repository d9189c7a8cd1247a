//! Enum emission
//!
//! C enums land in `enums.rs` in one of two shapes:
//! - flag enums (`*Flags` names plus a known set) become `#[repr(transparent)]`
//!   newtypes over `u32` with associated constants and bitwise-op impls, with
//!   a `NONE = 0` constant inserted when the C enum has no zero member
//! - everything else becomes a fieldless Rust enum with an explicit `#[repr]`
//!
//! Range sentinels (`*_BEGIN_RANGE`, `*_COUNT`-style bookkeeping members) are
//! dropped. Prefix stripping must stay injective within one enum; a collision
//! aborts generation rather than silently merging members.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::gen::names;
use crate::gen::writer::CodeWriter;
use crate::gen::{strip_int_suffix, GenError, Generator};
use crate::parser::ast::{ConstExpr, EnumDecl, EnumItem, UnaryOp};

fn is_sentinel(member: &str) -> bool {
    member.ends_with("_BEGIN_RANGE")
        || member.ends_with("_END_RANGE")
        || member.ends_with("_RANGE_SIZE")
        || member.ends_with("_Force32")
        || member.ends_with("_RESERVED")
}

impl Generator {
    pub(crate) fn emit_enums(&mut self) -> Result<(), GenError> {
        let has_bitmask = self
            .enums
            .iter()
            .any(|e| names::is_bitmask_enum(&e.name));
        let imports: &[&str] = if has_bitmask {
            &["core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not}"]
        } else {
            &[]
        };
        let mut writer = CodeWriter::new(&self.options.output_dir, "enums.rs", imports);

        let enums = std::mem::take(&mut self.enums);
        for decl in &enums {
            if names::is_bitmask_enum(&decl.name) {
                self.write_bitmask_enum(&mut writer, decl)?;
            } else {
                self.write_plain_enum(&mut writer, decl)?;
            }
        }
        self.enums = enums;

        writer.finish()
    }

    /// Members that survive sentinel filtering, paired with their variant
    /// names. Fails on a variant-name collision.
    fn variant_names<'a>(
        &self,
        decl: &'a EnumDecl,
        prefix: &str,
    ) -> Result<Vec<(&'a EnumItem, String)>, GenError> {
        let mut used: FxHashMap<String, String> = FxHashMap::default();
        let mut out = Vec::new();

        for item in &decl.items {
            if is_sentinel(&item.name) {
                continue;
            }
            let variant = names::pretty_enum_name(&decl.name, &item.name, prefix);
            if variant == "Default" {
                continue;
            }
            if let Some(first) = used.get(&variant) {
                return Err(GenError::VariantCollision {
                    enum_name: decl.name.clone(),
                    first: first.clone(),
                    second: item.name.clone(),
                    variant,
                });
            }
            used.insert(variant.clone(), item.name.clone());
            out.push((item, variant));
        }

        Ok(out)
    }

    fn write_plain_enum(
        &mut self,
        writer: &mut CodeWriter,
        decl: &EnumDecl,
    ) -> Result<(), GenError> {
        let prefix = names::enum_name_prefix(&decl.name);
        let items = self.variant_names(decl, &prefix)?;
        let repr = names::enum_repr(&decl.name);

        writer.blank_line();
        writer.write_line(&format!("#[repr({repr})]"));
        writer.write_line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
        writer.push_block(&format!("pub enum {}", decl.name));

        // Rust enums reject duplicate discriminants, so alias members
        // (SDL_EVENT_DISPLAY_FIRST and friends) keep only their first
        // spelling.
        let mut seen_values: FxHashSet<i64> = FxHashSet::default();
        for (item, variant) in &items {
            let Some(value) = item.computed else {
                self.warn(format!(
                    "{}: member {} has an unresolvable value, skipped",
                    decl.name, item.name
                ));
                continue;
            };
            if !seen_values.insert(value) {
                continue;
            }
            let spelling = match &item.expr {
                Some(ConstExpr::IntLiteral { raw, .. }) => {
                    strip_int_suffix(raw).to_string()
                }
                _ => value.to_string(),
            };
            writer.write_line(&format!("{variant} = {spelling},"));
        }

        writer.pop_block();
        Ok(())
    }

    fn write_bitmask_enum(
        &mut self,
        writer: &mut CodeWriter,
        decl: &EnumDecl,
    ) -> Result<(), GenError> {
        let prefix = names::enum_name_prefix(&decl.name);
        let items = self.variant_names(decl, &prefix)?;
        let name = &decl.name;

        writer.blank_line();
        writer.write_line("#[repr(transparent)]");
        writer.write_line(
            "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]",
        );
        writer.write_line(&format!("pub struct {name}(pub u32);"));

        writer.blank_line();
        writer.push_block(&format!("impl {name}"));
        let has_none = items.iter().any(|(_, variant)| variant == "None");
        if !has_none {
            writer.write_line(&format!("pub const NONE: {name} = {name}(0);"));
        }
        for (item, variant) in &items {
            let Some(spelling) = self.bitmask_value(decl, item, &prefix) else {
                self.warn(format!(
                    "{}: member {} has an unresolvable value, skipped",
                    decl.name, item.name
                ));
                continue;
            };
            writer.write_line(&format!(
                "pub const {variant}: {name} = {name}({spelling});"
            ));
        }
        writer.pop_block();

        self.write_bitmask_ops(writer, name);
        Ok(())
    }

    /// Spelling for a bitmask constant: literals keep their source form,
    /// member references become `Self::X.0`, binary expressions recurse.
    fn bitmask_value(
        &self,
        decl: &EnumDecl,
        item: &EnumItem,
        prefix: &str,
    ) -> Option<String> {
        match &item.expr {
            None => item.computed.map(|v| v.to_string()),
            Some(expr) => self.render_bitmask_expr(decl, expr, prefix),
        }
    }

    fn render_bitmask_expr(
        &self,
        decl: &EnumDecl,
        expr: &ConstExpr,
        prefix: &str,
    ) -> Option<String> {
        match expr {
            ConstExpr::IntLiteral { raw, .. } => {
                Some(strip_int_suffix(raw).to_string())
            }
            ConstExpr::Ident(name) => {
                if decl.items.iter().any(|i| &i.name == name) {
                    let variant = names::pretty_enum_name(&decl.name, name, prefix);
                    Some(format!("Self::{variant}.0"))
                } else {
                    None
                }
            }
            ConstExpr::Unary { op, operand } => {
                let inner = self.render_bitmask_expr(decl, operand, prefix)?;
                let symbol = match op {
                    UnaryOp::Neg => "-",
                    // C bit complement spells `!` in Rust
                    UnaryOp::BitNot => "!",
                };
                Some(format!("{symbol}{inner}"))
            }
            ConstExpr::Binary { op, lhs, rhs } => {
                let lhs = self.render_bitmask_expr(decl, lhs, prefix)?;
                let rhs = self.render_bitmask_expr(decl, rhs, prefix)?;
                Some(format!("{lhs} {} {rhs}", op.symbol()))
            }
            ConstExpr::Paren(inner) => {
                let inner = self.render_bitmask_expr(decl, inner, prefix)?;
                Some(format!("({inner})"))
            }
        }
    }

    fn write_bitmask_ops(&self, writer: &mut CodeWriter, name: &str) {
        writer.blank_line();
        writer.push_block(&format!("impl BitOr for {name}"));
        writer.write_line("type Output = Self;");
        writer.write_line("fn bitor(self, rhs: Self) -> Self { Self(self.0 | rhs.0) }");
        writer.pop_block();

        writer.push_block(&format!("impl BitOrAssign for {name}"));
        writer.write_line("fn bitor_assign(&mut self, rhs: Self) { self.0 |= rhs.0; }");
        writer.pop_block();

        writer.push_block(&format!("impl BitAnd for {name}"));
        writer.write_line("type Output = Self;");
        writer.write_line("fn bitand(self, rhs: Self) -> Self { Self(self.0 & rhs.0) }");
        writer.pop_block();

        writer.push_block(&format!("impl BitAndAssign for {name}"));
        writer.write_line("fn bitand_assign(&mut self, rhs: Self) { self.0 &= rhs.0; }");
        writer.pop_block();

        writer.push_block(&format!("impl BitXor for {name}"));
        writer.write_line("type Output = Self;");
        writer.write_line("fn bitxor(self, rhs: Self) -> Self { Self(self.0 ^ rhs.0) }");
        writer.pop_block();

        writer.push_block(&format!("impl BitXorAssign for {name}"));
        writer.write_line("fn bitxor_assign(&mut self, rhs: Self) { self.0 ^= rhs.0; }");
        writer.pop_block();

        writer.push_block(&format!("impl Not for {name}"));
        writer.write_line("type Output = Self;");
        writer.write_line("fn not(self) -> Self { Self(!self.0) }");
        writer.pop_block();
    }
}
