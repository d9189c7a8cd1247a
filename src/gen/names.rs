//! Name and type translation
//!
//! Pure string transforms from C spellings to Rust FFI spellings. Everything
//! here is table-driven and total: unknown names pass through unchanged, and
//! no function in this module panics on any parser-producible input.
//!
//! Three layers:
//! - type names: C primitives and SDL's stdint aliases to Rust types
//!   ([`rust_type_name`], [`clean_name`])
//! - enum shapes: the common prefix shared by an enum's members
//!   ([`enum_name_prefix`]) and the member-to-variant transform
//!   ([`pretty_enum_name`])
//! - identifier hygiene: Rust keyword escapes and Hungarian-pointer cleanup
//!   ([`escape_keyword`], [`param_name`])

use crate::parser::ast::{CType, FunctionSig, PrimitiveKind};

/// Rust spelling of a C primitive in value position. `void` appears only
/// behind pointers or as a return type; both sites special-case it before
/// reaching this table.
pub fn primitive_name(kind: PrimitiveKind) -> &'static str {
    use PrimitiveKind::*;
    match kind {
        Void => "c_void",
        Bool => "bool",
        Char => "c_char",
        SignedChar => "i8",
        UnsignedChar => "u8",
        Short => "i16",
        UnsignedShort => "u16",
        Int => "i32",
        UnsignedInt => "u32",
        Long => "c_long",
        UnsignedLong => "c_ulong",
        LongLong => "i64",
        UnsignedLongLong => "u64",
        Float => "f32",
        Double => "f64",
        LongDouble => "f64",
    }
}

/// Translate a named C type to its Rust spelling. SDL's stdint aliases map
/// to Rust integer types; platform and Vulkan/EGL handle types map to raw
/// pointers or `u64` handles; everything else passes through untouched.
pub fn clean_name(name: &str) -> String {
    let mapped = match name {
        "Sint8" | "int8_t" => "i8",
        "Uint8" | "uint8_t" => "u8",
        "Sint16" | "int16_t" => "i16",
        "Uint16" | "uint16_t" => "u16",
        "Sint32" | "int32_t" => "i32",
        "Uint32" | "uint32_t" => "u32",
        "Sint64" | "int64_t" => "i64",
        "Uint64" | "uint64_t" => "u64",
        "char" => "c_char",
        "wchar_t" => "u32",
        "size_t" => "usize",
        "intptr_t" => "isize",
        "uintptr_t" => "usize",
        "bool" | "SDL_bool" => "bool",
        "float" => "f32",
        "double" => "f64",
        "SDL_FunctionPointer" => "Option<unsafe extern \"C\" fn()>",
        "SDL_Time" => "i64",
        "SDL_BlitMap" => "*mut c_void",
        "SDL_MetalView" => "*mut c_void",
        // EGL
        "SDL_EGLDisplay" | "SDL_EGLConfig" | "SDL_EGLSurface" => "*mut c_void",
        "SDL_EGLAttrib" => "isize",
        "SDL_EGLint" => "i32",
        // Vulkan handles: dispatchable are pointers, VkSurfaceKHR is a
        // 64-bit non-dispatchable handle
        "VkAllocationCallbacks" | "VkInstance" | "VkInstance_T" | "VkPhysicalDevice"
        | "VkPhysicalDevice_T" => "*mut c_void",
        "VkSurfaceKHR" | "VkSurfaceKHR_T" => "u64",
        // Windows interop
        "HWND" | "HDC" | "HINSTANCE" => "*mut c_void",
        "UINT" => "u32",
        "WPARAM" => "usize",
        "LPARAM" => "isize",
        // Lowercase legacy spelling
        "SDL_eventaction" => "SDL_EventAction",
        "SDL_iconv_t" => "SDL_iconv_data_t",
        other => {
            if other.starts_with("PFN") {
                return "*mut c_void".to_string();
            }
            other
        }
    };
    mapped.to_string()
}

/// Translate a parsed C type to its Rust spelling in value position.
pub fn rust_type_name(ty: &CType) -> String {
    match ty {
        CType::Primitive(kind) => primitive_name(*kind).to_string(),
        CType::Named(name) => clean_name(name),
        CType::Pointer { pointee, is_const } => {
            let qualifier = if *is_const { "*const" } else { "*mut" };
            let inner = match pointee.as_ref() {
                CType::Primitive(PrimitiveKind::Void) => "c_void".to_string(),
                other => rust_type_name(other),
            };
            // A pointer-to-pointer through a mapped handle type reads
            // `*mut *mut c_void`, which is what interop code expects.
            format!("{qualifier} {inner}")
        }
        CType::Array { element, size } => {
            format!("[{}; {}]", rust_type_name(element), size)
        }
        CType::FunctionPointer(sig) => function_pointer_type(sig),
    }
}

/// Translate a return type: `void` disappears rather than becoming `()`.
pub fn rust_return_type(ty: &CType) -> Option<String> {
    match ty {
        CType::Primitive(PrimitiveKind::Void) => None,
        other => Some(rust_type_name(other)),
    }
}

/// `Option<unsafe extern "C" fn(args) -> R>` for a callback signature.
pub fn function_pointer_type(sig: &FunctionSig) -> String {
    let mut args: Vec<String> = sig
        .params
        .iter()
        .map(|param| {
            format!(
                "{}: {}",
                param_name(&param.name),
                rust_type_name(&param.ty)
            )
        })
        .collect();
    if sig.variadic {
        args.push("...".to_string());
    }
    match rust_return_type(&sig.return_type) {
        Some(ret) => format!(
            "Option<unsafe extern \"C\" fn({}) -> {}>",
            args.join(", "),
            ret
        ),
        None => format!("Option<unsafe extern \"C\" fn({})>", args.join(", ")),
    }
}

/// The SCREAMING_SNAKE prefix an enum's members share. Irregular enums come
/// from a fixed table; the rest derive the prefix by splitting the type name
/// at uppercase boundaries, truncating at a trailing `Flag`/`Flags` part.
pub fn enum_name_prefix(type_name: &str) -> String {
    if let Some(known) = known_enum_prefix(type_name) {
        return known.to_string();
    }

    // Split each underscore segment at CamelCase boundaries, keeping
    // acronym runs together ("SDL_GPUTextureType" -> SDL, GPU, Texture,
    // Type).
    let mut parts: Vec<String> = Vec::new();
    for segment in type_name.split('_').filter(|s| !s.is_empty()) {
        let chars: Vec<char> = segment.chars().collect();
        let mut start = 0;
        for i in 1..chars.len() {
            let boundary = chars[i].is_ascii_uppercase()
                && (chars[i - 1].is_ascii_lowercase()
                    || (i + 1 < chars.len() && chars[i + 1].is_ascii_lowercase()));
            if boundary {
                parts.push(chars[start..i].iter().collect());
                start = i;
            }
        }
        parts.push(chars[start..].iter().collect());
    }

    if let Some(cut) = parts.iter().position(|p| p == "Flag" || p == "Flags") {
        parts.truncate(cut);
    }

    parts
        .iter()
        .map(|p| p.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn known_enum_prefix(type_name: &str) -> Option<&'static str> {
    let prefix = match type_name {
        "SDL_PropertyType" => "SDL_PROPERTY_TYPE",
        "SDL_Scancode" => "SDL_SCANCODE",
        "SDL_Keycode" => "SDLK",
        "SDL_Keymod" => "SDL_KMOD",
        "SDL_GamepadType" => "SDL_GAMEPAD_TYPE",
        "SDL_GamepadButton" => "SDL_GAMEPAD_BUTTON",
        "SDL_GamepadAxis" => "SDL_GAMEPAD_AXIS",
        "SDL_GamepadBindingType" => "SDL_GAMEPAD_BINDTYPE",
        "SDL_GamepadButtonLabel" => "SDL_GAMEPAD_BUTTON_LABEL",
        "SDL_InitFlags" => "SDL_INIT",
        "SDL_MessageBoxFlags" => "SDL_MESSAGEBOX",
        "SDL_MessageBoxColorType" => "SDL_MESSAGEBOX_COLOR",
        "SDL_JoystickType" => "SDL_JOYSTICK_TYPE",
        "SDL_JoystickConnectionState" => "SDL_JOYSTICK_CONNECTION",
        "SDL_SystemCursor" => "SDL_SYSTEM_CURSOR",
        "SDL_MouseWheelDirection" => "SDL_MOUSEWHEEL",
        "SDL_TouchDeviceType" => "SDL_TOUCH_DEVICE",
        "SDL_SystemTheme" => "SDL_SYSTEM_THEME",
        "SDL_DisplayOrientation" => "SDL_ORIENTATION",
        "SDL_WindowFlags" => "SDL_WINDOW",
        "SDL_LogCategory" => "SDL_LOG_CATEGORY",
        "SDL_LogPriority" => "SDL_LOG_PRIORITY",
        "SDL_PowerState" => "SDL_POWERSTATE",
        "SDL_SensorType" => "SDL_SENSOR",
        "SDL_FlashOperation" => "SDL_FLASH",
        "SDL_GLAttr" => "SDL_GL",
        "SDL_GLContextFlag" => "SDL_GL_CONTEXT",
        "SDL_GLContextReleaseFlag" => "SDL_GL_CONTEXT_RELEASE_BEHAVIOR",
        "SDL_GLContextResetNotification" => "SDL_GL_CONTEXT_RESET",
        "SDL_GLProfile" => "SDL_GL_CONTEXT_PROFILE",
        "SDL_HitTestResult" => "SDL_HITTEST",
        "SDL_EventType" => "SDL_EVENT",
        "SDL_HintPriority" => "SDL_HINT",
        "SDL_BlendMode" => "SDL_BLENDMODE",
        "SDL_BlendOperation" => "SDL_BLENDOPERATION",
        "SDL_BlendFactor" => "SDL_BLENDFACTOR",
        "SDL_PenAxis" => "SDL_PEN_AXIS",
        "SDL_PenSubtype" => "SDL_PEN_TYPE",
        "SDL_AudioFormat" => "SDL_AUDIO",
        "SDL_PixelType" => "SDL_PIXELTYPE",
        "SDL_BitmapOrder" => "SDL_BITMAPORDER",
        "SDL_PackedOrder" => "SDL_PACKEDORDER",
        "SDL_ArrayOrder" => "SDL_ARRAYORDER",
        "SDL_PackedLayout" => "SDL_PACKEDLAYOUT",
        "SDL_PixelFormat" => "SDL_PIXELFORMAT",
        "SDL_ColorType" => "SDL_COLOR_TYPE",
        "SDL_ColorRange" => "SDL_COLOR_RANGE",
        "SDL_ColorPrimaries" => "SDL_COLOR_PRIMARIES",
        "SDL_TransferCharacteristics" => "SDL_TRANSFER_CHARACTERISTICS",
        "SDL_MatrixCoefficients" => "SDL_MATRIX_COEFFICIENTS",
        "SDL_ChromaLocation" => "SDL_CHROMA_LOCATION",
        "SDL_Colorspace" => "SDL_COLORSPACE",
        "SDL_ScaleMode" => "SDL_SCALEMODE",
        "SDL_FlipMode" => "SDL_FLIP",
        "SDL_CameraPosition" => "SDL_CAMERA_POSITION",
        "SDL_IOStatus" => "SDL_IO_STATUS",
        "SDL_DateFormat" => "SDL_DATE_FORMAT",
        "SDL_TimeFormat" => "SDL_TIME_FORMAT",
        "SDL_AppResult" => "SDL_APP",
        _ => return None,
    };
    Some(prefix)
}

/// Members whose mechanical transform is unreadable get a fixed spelling.
fn known_value_name(member: &str) -> Option<&'static str> {
    let name = match member {
        "SDL_NUM_SCANCODES" => "NumScancodes",
        "SDL_MESSAGEBOX_BUTTON_RETURNKEY_DEFAULT" => "ReturnKeyDefault",
        "SDL_MESSAGEBOX_BUTTON_ESCAPEKEY_DEFAULT" => "EscapeKeyDefault",
        "SDL_ADDEVENT" => "AddEvent",
        "SDL_PEEKEVENT" => "PeekEvent",
        "SDL_GETEVENT" => "GetEvent",
        "SDL_PEN_NUM_AXES" => "NumAxes",
        _ => return None,
    };
    Some(name)
}

/// Acronym parts kept fully upper-cased.
fn preserves_caps(part: &str) -> bool {
    ["SDL", "GPU", "SDR", "HDR", "D3D11", "D3D12"]
        .iter()
        .any(|caps| caps.eq_ignore_ascii_case(part))
}

/// Parts whose mechanical re-casing loses a word boundary.
fn part_rename(part: &str) -> Option<&'static str> {
    let lower = part.to_ascii_lowercase();
    let renamed = match lower.as_str() {
        "lctrl" => "LeftControl",
        "lshift" => "LeftShift",
        "lalt" => "LeftAlt",
        "lgui" => "LeftGui",
        "rctrl" => "RightControl",
        "rshift" => "RightShift",
        "ralt" => "RightAlt",
        "rgui" => "RightGui",
        _ => return None,
    };
    Some(renamed)
}

/// Parts that already carry their canonical mixed casing; matched case
/// insensitively so `CAPSLOCK` and `CapsLock` agree.
fn canonical_part(part: &str) -> Option<&'static str> {
    const CANONICAL: &[&str] = &[
        "LeftBracket",
        "RightBracket",
        "Backslash",
        "NonusHash",
        "CapsLock",
        "PrintScreen",
        "ScrollLock",
        "PageUp",
        "PageDown",
        "NumLockClear",
        "VolumeUp",
        "VolumeDown",
        "AudioPrev",
        "AudioNext",
        "AudioStop",
        "AudioPlay",
        "AudioMute",
        "MediaSelect",
        "DisplaySwitch",
        "MultisampleBuffers",
        "MultisampleSamples",
        "OpenGL",
        "CaseInsensitive",
        "LeftParen",
        "RightParen",
        "PlusMinus",
    ];
    CANONICAL
        .iter()
        .find(|c| c.eq_ignore_ascii_case(part))
        .copied()
}

/// Transform one enum member into a Rust variant name: strip the shared
/// prefix, split on `_`, re-case each part, and guard identifiers that would
/// start with a digit (`SDLK_0` stays readable as `D0`; elsewhere a leading
/// `_` is used).
pub fn pretty_enum_name(enum_name: &str, member: &str, prefix: &str) -> String {
    let pretty = pretty_value_name(member, prefix);
    match pretty.chars().next() {
        Some(first) if first.is_ascii_digit() => {
            if enum_name == "SDL_Keycode" {
                format!("D{pretty}")
            } else {
                format!("_{pretty}")
            }
        }
        _ => pretty,
    }
}

fn pretty_value_name(member: &str, prefix: &str) -> String {
    if let Some(known) = known_value_name(member) {
        return known.to_string();
    }

    let Some(stripped) = member.strip_prefix(prefix) else {
        return member.to_string();
    };

    let mut out = String::new();
    for part in stripped.split('_').filter(|p| !p.is_empty()) {
        if preserves_caps(part) {
            out.push_str(part);
        } else if let Some(renamed) = part_rename(part) {
            out.push_str(renamed);
        } else if let Some(canonical) = canonical_part(part) {
            out.push_str(canonical);
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                for ch in chars {
                    out.push(ch.to_ascii_lowercase());
                }
            }
        }
    }

    if out.is_empty() {
        member.to_string()
    } else {
        out
    }
}

/// Escape field/parameter names that collide with Rust keywords.
pub fn escape_keyword(name: &str) -> String {
    let reserved = matches!(
        name,
        "as" | "box"
            | "break"
            | "const"
            | "continue"
            | "crate"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "priv"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
    );
    if reserved {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Normalize a parameter name: drops the Hungarian `p`/`pp` pointer prefix
/// (`pProps` becomes `props`) and escapes Rust keywords.
pub fn param_name(name: &str) -> String {
    let mut current = name.to_string();
    loop {
        let mut chars = current.chars();
        match (chars.next(), chars.next()) {
            (Some('p'), Some(second)) if second.is_ascii_uppercase() => {
                let rest: String = current.chars().skip(2).collect();
                current = format!("{}{}", second.to_ascii_lowercase(), rest);
            }
            _ => break,
        }
    }
    escape_keyword(&current)
}

/// Discriminant width for the handful of enums whose members exceed `i32`.
pub fn enum_repr(enum_name: &str) -> &'static str {
    match enum_name {
        "SDL_PixelFormat" | "SDL_AudioFormat" => "u32",
        _ => "i32",
    }
}

/// Flag enums become newtype bitmasks rather than Rust enums.
pub fn is_bitmask_enum(enum_name: &str) -> bool {
    enum_name.ends_with("Flags")
        || matches!(
            enum_name,
            "SDL_Keymod"
                | "SDL_InitFlags"
                | "SDL_GLProfile"
                | "SDL_GLContextFlag"
                | "SDL_GLContextReleaseFlag"
                | "SDL_GLContextResetNotification"
                | "SDL_BlendMode"
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Param;

    #[test]
    fn test_primitive_mapping_total() {
        use PrimitiveKind::*;
        for kind in [
            Void,
            Bool,
            Char,
            SignedChar,
            UnsignedChar,
            Short,
            UnsignedShort,
            Int,
            UnsignedInt,
            Long,
            UnsignedLong,
            LongLong,
            UnsignedLongLong,
            Float,
            Double,
            LongDouble,
        ] {
            assert!(!primitive_name(kind).is_empty());
        }
    }

    #[test]
    fn test_clean_name_aliases() {
        assert_eq!(clean_name("Uint32"), "u32");
        assert_eq!(clean_name("Sint16"), "i16");
        assert_eq!(clean_name("size_t"), "usize");
        assert_eq!(clean_name("VkSurfaceKHR"), "u64");
        assert_eq!(clean_name("PFNEGLGETPROCADDRESS"), "*mut c_void");
        assert_eq!(clean_name("SDL_Window"), "SDL_Window");
    }

    #[test]
    fn test_rust_type_name_pointers_and_arrays() {
        let const_str = CType::pointer_to(CType::Primitive(PrimitiveKind::Char), true);
        assert_eq!(rust_type_name(&const_str), "*const c_char");

        let window_ptr = CType::pointer_to(CType::Named("SDL_Window".to_string()), false);
        assert_eq!(rust_type_name(&window_ptr), "*mut SDL_Window");

        let arr = CType::array_of(CType::Named("Uint8".to_string()), 16);
        assert_eq!(rust_type_name(&arr), "[u8; 16]");
    }

    #[test]
    fn test_function_pointer_spelling() {
        let sig = FunctionSig {
            return_type: CType::Primitive(PrimitiveKind::Void),
            params: vec![Param {
                name: "userdata".to_string(),
                ty: CType::pointer_to(CType::Primitive(PrimitiveKind::Void), false),
            }],
            variadic: false,
        };
        assert_eq!(
            function_pointer_type(&sig),
            "Option<unsafe extern \"C\" fn(userdata: *mut c_void)>"
        );
    }

    #[test]
    fn test_enum_prefix_fallback() {
        assert_eq!(enum_name_prefix("SDL_ThreadPriority"), "SDL_THREAD_PRIORITY");
        assert_eq!(enum_name_prefix("SDL_FooFlags"), "SDL_FOO");
        // Known irregular prefixes beat the mechanical split
        assert_eq!(enum_name_prefix("SDL_Keycode"), "SDLK");
        assert_eq!(enum_name_prefix("SDL_EventType"), "SDL_EVENT");
    }

    #[test]
    fn test_pretty_enum_name() {
        assert_eq!(
            pretty_enum_name("SDL_EventType", "SDL_EVENT_KEY_DOWN", "SDL_EVENT"),
            "KeyDown"
        );
        assert_eq!(
            pretty_enum_name("SDL_Keymod", "SDL_KMOD_LCTRL", "SDL_KMOD"),
            "LeftControl"
        );
        assert_eq!(
            pretty_enum_name("SDL_Scancode", "SDL_SCANCODE_CAPSLOCK", "SDL_SCANCODE"),
            "CapsLock"
        );
        assert_eq!(
            pretty_enum_name("SDL_Scancode", "SDL_NUM_SCANCODES", "SDL_SCANCODE"),
            "NumScancodes"
        );
    }

    #[test]
    fn test_digit_guards() {
        assert_eq!(pretty_enum_name("SDL_Keycode", "SDLK_0", "SDLK"), "D0");
        assert_eq!(
            pretty_enum_name("SDL_PixelType", "SDL_PIXELTYPE_8", "SDL_PIXELTYPE"),
            "_8"
        );
    }

    #[test]
    fn test_param_name_cleanup() {
        assert_eq!(param_name("pProps"), "props");
        assert_eq!(param_name("pPState"), "state");
        assert_eq!(param_name("type"), "r#type");
        assert_eq!(param_name("window"), "window");
        // Not Hungarian: second char is lowercase
        assert_eq!(param_name("pixels"), "pixels");
    }
}
