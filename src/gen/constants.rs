//! Constant emission
//!
//! Object-like `#define`s become `pub const` items in `constants.rs`. The
//! constant's Rust type is inferred from the literal's C suffix, with a small
//! per-name override table for the constants whose inferred type would be
//! wrong (joystick axis range, keymod masks, version numbers). Quoted string
//! values become `&CStr` constants.
//!
//! Macros whose replacement text cannot be re-emitted as a Rust constant
//! expression (casts, calls into other macros) are skipped with a warning,
//! never an error: a new SDL release adding such a macro must not break the
//! run.

use crate::gen::writer::CodeWriter;
use crate::gen::{names, strip_int_suffix, GenError, Generator};
use crate::parser::ast::MacroDecl;

/// Filter applied at collection time. Most function-like utility macros are
/// already dropped by the parameter-list check; this catches include guards,
/// platform probes, and the object-like macros bound elsewhere.
pub(crate) fn is_ignored_macro(name: &str, value: &str) -> bool {
    if name.to_ascii_lowercase().ends_with("_h_") {
        return true;
    }
    if name.starts_with("SDL_PLATFORM_")
        || name.starts_with("SDL_WINDOWPOS_")
        || name.starts_with("SDL_HAPTIC_")
        || name.starts_with("SDL_PIXEL")
        || name.starts_with("SDL_ISPIXELFORMAT")
        || name.starts_with("SDL_COLORSPACE")
        || name.starts_with("SDL_ISCOLORSPACE_")
        || name.starts_with("SDL_MIN_")
        || name.starts_with("SDL_MAX_")
        || name.starts_with("SDL_PRI")
        || name.starts_with("SDL_ICONV_")
        || name.starts_with("SDL_iconv_")
    {
        return true;
    }
    if name.starts_with("SDL_PEN_") && name.ends_with("_MASK") {
        return true;
    }
    if value.starts_with("SDL_THREAD_ANNOTATION_ATTRIBUTE__") {
        return true;
    }
    matches!(
        name,
        "SDL_FALSE"
            | "SDL_TRUE"
            | "SDL_SIZE_MAX"
            | "SDL_INIT_EVERYTHING"
            | "SDL_OutOfMemory"
            | "SDL_Unsupported"
            | "SDL_BUTTON_LMASK"
            | "SDL_BUTTON_MMASK"
            | "SDL_BUTTON_RMASK"
            | "SDL_BUTTON_X1MASK"
            | "SDL_BUTTON_X2MASK"
            | "SDL_TOUCH_MOUSEID"
            | "SDL_MOUSE_TOUCHID"
            | "SDL_Colour"
            | "SDL_FColour"
            | "SDL_BeginThreadFunction"
            | "SDL_EndThreadFunction"
            | "VK_DEFINE_HANDLE"
            | "VK_DEFINE_NON_DISPATCHABLE_HANDLE"
            | "SDL_SCANCODE_MASK"
    )
}

/// The handful of constants whose suffix-driven type is wrong.
fn type_override(name: &str) -> Option<&'static str> {
    if name.starts_with("SDLK_") {
        return Some("u32");
    }
    if name.starts_with("SDL_KMOD_") {
        return Some("u16");
    }
    if name.starts_with("SDL_HAT_") {
        return Some("u32");
    }
    let ty = match name {
        "SDL_JOYSTICK_AXIS_MAX" | "SDL_JOYSTICK_AXIS_MIN" => "i32",
        "SDL_MIX_MAXVOLUME" => "i32",
        "SDL_TEXTEDITINGEVENT_TEXT_SIZE" | "SDL_TEXTINPUTEVENT_TEXT_SIZE" => "i32",
        "SDL_MAJOR_VERSION" | "SDL_MINOR_VERSION" | "SDL_MICRO_VERSION" => "i32",
        "SDL_PI_D" => "f64",
        "SDL_PI_F" => "f32",
        "SDL_NS_PER_SECOND" => "u64",
        "SDL_IPHONE_MAX_GFORCE" => "f32",
        _ => return None,
    };
    Some(ty)
}

/// A value the emitter can pass through as a Rust constant expression:
/// numbers, other constant names, and operators, but no casts and no macro
/// calls.
fn is_plain_expr(value: &str) -> bool {
    let mut prev = ' ';
    for ch in value.chars() {
        let ok = ch.is_ascii_alphanumeric()
            || matches!(ch, '_' | '(' | ')' | '|' | '&' | '^' | '~' | '<' | '>' | '+' | '-' | '*' | '.' | ' ');
        if !ok {
            return false;
        }
        // `NAME(` is a macro call, `)0x...` is a cast
        if ch == '(' && (prev.is_ascii_alphanumeric() || prev == '_') {
            return false;
        }
        if (ch.is_ascii_alphanumeric() || ch == '_') && prev == ')' {
            return false;
        }
        prev = ch;
    }
    true
}

/// Strip one or more layers of balanced outer parentheses.
fn strip_outer_parens(value: &str) -> &str {
    let mut current = value.trim();
    while current.starts_with('(') && current.ends_with(')') {
        let inner = &current[1..current.len() - 1];
        let mut depth = 0i32;
        let mut balanced = true;
        for ch in inner.chars() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth < 0 {
                        balanced = false;
                        break;
                    }
                }
                _ => {}
            }
        }
        if balanced && depth == 0 {
            current = inner.trim();
        } else {
            break;
        }
    }
    current
}

/// Remove C integer suffixes embedded inside an expression (`1u << 5`
/// becomes `1 << 5`). Only suffix letters directly after a digit and not
/// followed by another identifier character are touched.
fn strip_inline_suffixes(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if matches!(ch, 'u' | 'U' | 'l' | 'L')
            && i > 0
            && chars[i - 1].is_ascii_digit()
        {
            let mut end = i;
            while end < chars.len() && matches!(chars[end], 'u' | 'U' | 'l' | 'L') {
                end += 1;
            }
            if end >= chars.len() || !chars[end].is_ascii_alphanumeric() && chars[end] != '_' {
                i = end;
                continue;
            }
        }
        out.push(ch);
        i += 1;
    }
    out
}

enum ConstValue {
    Expr { ty: &'static str, spelling: String },
    CStr(String),
    Skip,
}

/// Infer the Rust type and spelling for one macro value, mirroring the C
/// suffix conventions SDL uses (`0x10u`, `128ULL`, `5.0f`).
fn classify(name: &str, value: &str) -> ConstValue {
    let value = strip_outer_parens(value);

    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        return ConstValue::CStr(format!("c{value}"));
    }

    // SDLK_* values built from scancodes keep the expression shape with the
    // scancode re-spelled as its Rust variant.
    if name.starts_with("SDLK_") {
        if let Some(rest) = value.strip_prefix("SDL_SCANCODE_TO_KEYCODE(") {
            let Some(scancode) = rest.strip_suffix(')') else {
                return ConstValue::Skip;
            };
            let variant =
                names::pretty_enum_name("SDL_Scancode", scancode.trim(), "SDL_SCANCODE");
            return ConstValue::Expr {
                ty: "u32",
                spelling: format!(
                    "SDL_Scancode::{variant} as u32 | SDLK_SCANCODE_MASK"
                ),
            };
        }
    }

    // Width-forcing wrapper macros carry a plain literal inside
    if let Some(rest) = value.strip_prefix("SDL_UINT64_C(") {
        if let Some(inner) = rest.strip_suffix(')') {
            return ConstValue::Expr {
                ty: "u64",
                spelling: inner.trim().to_string(),
            };
        }
    }
    if let Some(rest) = value.strip_prefix("SDL_SINT64_C(") {
        if let Some(inner) = rest.strip_suffix(')') {
            return ConstValue::Expr {
                ty: "i64",
                spelling: inner.trim().to_string(),
            };
        }
    }

    if !is_plain_expr(value) {
        return ConstValue::Skip;
    }

    let is_hex = value.starts_with("0x") || value.starts_with("0X");
    let upper = value.to_ascii_uppercase();

    let (ty, spelling): (&'static str, String) = if !is_hex
        && (upper.ends_with('F') && value.contains('.'))
    {
        ("f32", value[..value.len() - 1].to_string())
    } else if upper.ends_with("LL") && !upper.ends_with("ULL") {
        ("i64", strip_int_suffix(value).to_string())
    } else if upper.ends_with("ULL") || upper.ends_with("UL") {
        ("u64", strip_int_suffix(value).to_string())
    } else if upper.ends_with('U') {
        ("u32", strip_int_suffix(value).to_string())
    } else if is_hex || value.parse::<u32>().is_ok() {
        ("u32", value.to_string())
    } else if value.parse::<i64>().is_ok() {
        ("i32", value.to_string())
    } else if value.parse::<f64>().is_ok() {
        ("f64", value.to_string())
    } else if value.contains("<<") {
        ("u32", strip_inline_suffixes(value))
    } else if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && value.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
    {
        // Reference to another emitted constant
        ("u32", value.to_string())
    } else if value.contains('|') || value.contains('&') {
        ("u32", strip_inline_suffixes(value))
    } else {
        return ConstValue::Skip;
    };

    match type_override(name) {
        Some(forced) => ConstValue::Expr {
            ty: forced,
            spelling,
        },
        None => ConstValue::Expr { ty, spelling },
    }
}

impl Generator {
    pub(crate) fn emit_constants(&mut self) -> Result<(), GenError> {
        let macros = std::mem::take(&mut self.macros);

        let needs_cstr = macros
            .iter()
            .any(|m| matches!(classify(&m.name, m.value.trim()), ConstValue::CStr(_)));
        let imports: &[&str] = if needs_cstr {
            &["core::ffi::CStr"]
        } else {
            &[]
        };
        let mut writer =
            CodeWriter::new(&self.options.output_dir, "constants.rs", imports);
        writer.blank_line();

        for m in &macros {
            self.write_constant(&mut writer, m);
        }

        self.macros = macros;
        writer.finish()
    }

    fn write_constant(&mut self, writer: &mut CodeWriter, m: &MacroDecl) {
        match classify(&m.name, m.value.trim()) {
            ConstValue::Expr { ty, spelling } => {
                writer.write_line(&format!(
                    "pub const {}: {} = {};",
                    m.name, ty, spelling
                ));
            }
            ConstValue::CStr(spelling) => {
                writer.write_line(&format!(
                    "pub const {}: &CStr = {};",
                    m.name, spelling
                ));
            }
            ConstValue::Skip => {
                self.warn(format!(
                    "Constant {} has an unresolvable value ({}), skipped",
                    m.name, m.value
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(name: &str, value: &str) -> Option<(&'static str, String)> {
        match classify(name, value) {
            ConstValue::Expr { ty, spelling } => Some((ty, spelling)),
            _ => None,
        }
    }

    #[test]
    fn test_suffix_inference() {
        assert_eq!(expr("SDL_X", "0x00000020u"), Some(("u32", "0x00000020".to_string())));
        assert_eq!(expr("SDL_X", "128"), Some(("u32", "128".to_string())));
        assert_eq!(expr("SDL_X", "(1000000000LL)"), Some(("i64", "1000000000".to_string())));
        assert_eq!(expr("SDL_X", "18446744073709551615ULL"), Some(("u64", "18446744073709551615".to_string())));
        assert_eq!(expr("SDL_X", "5.0f"), Some(("f32", "5.0".to_string())));
        assert_eq!(expr("SDL_X", "(1u<<2)"), Some(("u32", "1<<2".to_string())));
    }

    #[test]
    fn test_hex_f_suffix_is_not_float() {
        assert_eq!(expr("SDL_X", "0x1F"), Some(("u32", "0x1F".to_string())));
    }

    #[test]
    fn test_string_value() {
        assert!(matches!(
            classify("SDL_PROP_X", "\"SDL.window.x\""),
            ConstValue::CStr(s) if s == "c\"SDL.window.x\""
        ));
    }

    #[test]
    fn test_type_overrides() {
        assert_eq!(expr("SDL_JOYSTICK_AXIS_MIN", "-32768"), Some(("i32", "-32768".to_string())));
        assert_eq!(expr("SDL_KMOD_LSHIFT", "0x0001u"), Some(("u16", "0x0001".to_string())));
    }

    #[test]
    fn test_keycode_from_scancode() {
        let (ty, spelling) =
            expr("SDLK_A", "SDL_SCANCODE_TO_KEYCODE(SDL_SCANCODE_A)").unwrap();
        assert_eq!(ty, "u32");
        assert_eq!(spelling, "SDL_Scancode::A as u32 | SDLK_SCANCODE_MASK");
    }

    #[test]
    fn test_casts_and_calls_skipped() {
        assert!(matches!(
            classify("SDL_X", "((Uint64)-1)"),
            ConstValue::Skip
        ));
        assert!(matches!(
            classify("SDL_X", "SDL_BUTTON_MASK(1)"),
            ConstValue::Skip
        ));
    }

    #[test]
    fn test_constant_reference() {
        assert_eq!(
            expr("SDL_HAT_RIGHTUP", "(SDL_HAT_RIGHT|SDL_HAT_UP)"),
            Some(("u32", "SDL_HAT_RIGHT|SDL_HAT_UP".to_string()))
        );
    }

    #[test]
    fn test_guard_macros_ignored() {
        assert!(is_ignored_macro("SDL_video_h_", ""));
        assert!(is_ignored_macro("SDL_PLATFORM_LINUX", "1"));
        assert!(!is_ignored_macro("SDL_ALPHA_OPAQUE", "255"));
    }
}
