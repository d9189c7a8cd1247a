//! Binding generation
//!
//! The [`Generator`] accumulates declarations from every parsed header
//! (collect phase), then emits one Rust source file per category (emit
//! phase). Collection order is header order, so two runs over the same
//! headers produce byte-identical output.
//!
//! Categories, one emitter module each:
//! - [`enums`] → `enums.rs`
//! - [`constants`] → `constants.rs`
//! - [`handles`] → `handles.rs`
//! - [`structs`] → `structs.rs`
//! - [`functions`] → `functions.rs`

pub mod constants;
pub mod enums;
pub mod functions;
pub mod handles;
pub mod names;
pub mod structs;
pub mod writer;

use std::fs;
use std::path::PathBuf;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::parser::ast::{
    CType, Declaration, EnumDecl, FunctionDecl, FunctionSig, HeaderUnit, MacroDecl,
    RecordDecl, TypedefBody,
};

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Enum {enum_name}: members {first} and {second} both map to variant {variant}")]
    VariantCollision {
        enum_name: String,
        first: String,
        second: String,
        variant: String,
    },
}

pub struct GenOptions {
    pub output_dir: PathBuf,
}

/// Typedefs handled elsewhere or mapped away entirely: callback aliases
/// emitted as function types, flag typedefs whose values are macros, and the
/// interop types the name tables already flatten.
fn is_ignored_handle(name: &str) -> bool {
    matches!(
        name,
        "SDL_bool"
            | "SDL_malloc_func"
            | "SDL_calloc_func"
            | "SDL_realloc_func"
            | "SDL_free_func"
            | "SDL_CompareCallback_r"
            | "SDL_iconv_t"
            | "SDL_iconv_data_t"
            | "SDL_WindowsMessageHook"
            | "SDL_LogOutputFunction"
            | "MSG"
            | "XEvent"
            | "SDL_X11EventHook"
            | "SDL_EGLDisplay"
            | "SDL_EGLConfig"
            | "SDL_EGLSurface"
            | "SDL_EGLAttrib"
            | "SDL_EGLint"
            | "SDL_HitTest"
            | "SDL_EventFilter"
            | "VkInstance"
            | "VkSurfaceKHR"
            | "VkInstance_T"
            | "VkSurfaceKHR_T"
            | "VkPhysicalDevice"
            | "VkAllocationCallbacks"
            | "SDL_vulkanInstance"
            | "SDL_vulkanSurface"
            | "SDL_MetalView"
            | "SDL_blit"
            | "SDL_BlitMap"
            | "SDL_EventAction"
            | "SDL_FunctionPointer"
            | "SDL_Time"
            | "SDL_ThreadFunction"
    )
}

/// Functions excluded from the bindings: GUID string helpers covered by the
/// struct API, and printf-style entry points whose sibling varargs form is
/// already skipped.
fn is_ignored_function(name: &str) -> bool {
    matches!(
        name,
        "SDL_LogMessageV"
            | "SDL_GUIDToString"
            | "SDL_GUIDFromString"
            | "SDL_SetPropertyWithCleanup"
            | "SDL_IOprintf"
            | "SDL_IOvprintf"
    )
}

pub struct Generator {
    options: GenOptions,

    enums: Vec<EnumDecl>,
    macros: Vec<MacroDecl>,
    records: Vec<RecordDecl>,
    pointer_handles: Vec<String>,
    integer_handles: Vec<(String, CType)>,
    callbacks: Vec<(String, FunctionSig)>,
    functions: Vec<FunctionDecl>,

    pointer_handle_set: FxHashSet<String>,
    seen: FxHashSet<String>,
    warnings: Vec<String>,
}

impl Generator {
    pub fn new(options: GenOptions) -> Self {
        Self {
            options,
            enums: Vec::new(),
            macros: Vec::new(),
            records: Vec::new(),
            pointer_handles: Vec::new(),
            integer_handles: Vec::new(),
            callbacks: Vec::new(),
            functions: Vec::new(),
            pointer_handle_set: FxHashSet::default(),
            seen: FxHashSet::default(),
            warnings: Vec::new(),
        }
    }

    /// Route one header's declarations into the per-category collections.
    /// Duplicate names across headers keep the first occurrence.
    pub fn collect(&mut self, unit: &HeaderUnit) {
        for decl in &unit.decls {
            match decl {
                Declaration::Enum(e) => {
                    if !e.name.is_empty() && self.seen.insert(e.name.clone()) {
                        self.enums.push(e.clone());
                    }
                }
                Declaration::Record(r) => {
                    if !r.name.is_empty()
                        && !r.name.ends_with("_T")
                        && self.seen.insert(r.name.clone())
                    {
                        self.records.push(r.clone());
                    }
                }
                Declaration::Typedef(t) => {
                    if is_ignored_handle(&t.name) || !self.seen.insert(t.name.clone()) {
                        continue;
                    }
                    match &t.body {
                        TypedefBody::OpaqueRecord => {
                            self.pointer_handle_set.insert(t.name.clone());
                            self.pointer_handles.push(t.name.clone());
                        }
                        TypedefBody::Alias(ty) => {
                            // `typedef struct State *SDL_GLContext;` style
                            // aliases are pointer handles too
                            if matches!(ty, CType::Pointer { .. }) {
                                self.pointer_handle_set.insert(t.name.clone());
                                self.pointer_handles.push(t.name.clone());
                            } else {
                                self.integer_handles.push((t.name.clone(), ty.clone()));
                            }
                        }
                        TypedefBody::FunctionPointer(sig) => {
                            // Every function-pointer typedef gets an alias,
                            // not just *Callback names: SDL_EventFilter and
                            // SDL_HitTest appear in bound signatures too.
                            self.callbacks.push((t.name.clone(), sig.clone()));
                        }
                    }
                }
                Declaration::Function(f) => {
                    if is_ignored_function(&f.name) || !self.seen.insert(f.name.clone()) {
                        continue;
                    }
                    let takes_va_list = f
                        .sig
                        .params
                        .iter()
                        .any(|p| matches!(&p.ty, CType::Named(n) if n == "va_list"));
                    if takes_va_list {
                        continue;
                    }
                    self.functions.push(f.clone());
                }
                Declaration::Macro(m) => {
                    if m.params.is_none()
                        && !m.value.is_empty()
                        && !constants::is_ignored_macro(&m.name, &m.value)
                        && self.seen.insert(m.name.clone())
                    {
                        self.macros.push(m.clone());
                    }
                }
            }
        }
    }

    /// Emit all five output files into the configured directory.
    pub fn generate(&mut self) -> Result<(), GenError> {
        fs::create_dir_all(&self.options.output_dir).map_err(|source| {
            GenError::CreateDir {
                path: self.options.output_dir.clone(),
                source,
            }
        })?;

        self.emit_enums()?;
        self.emit_constants()?;
        self.emit_handles()?;
        self.emit_structs()?;
        self.emit_functions()?;
        Ok(())
    }

    /// Warnings accumulated during emission, in emission order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Translate a C type in declaration position, collapsing a single
    /// pointer to an opaque handle into the handle newtype (the newtype
    /// already wraps the pointer).
    pub(crate) fn type_name(&self, ty: &CType) -> String {
        match ty {
            CType::Pointer { pointee, is_const } => {
                if let CType::Named(name) = pointee.as_ref() {
                    if self.pointer_handle_set.contains(name) {
                        return names::clean_name(name);
                    }
                }
                let qualifier = if *is_const { "*const" } else { "*mut" };
                let inner = match pointee.as_ref() {
                    CType::Primitive(crate::parser::ast::PrimitiveKind::Void) => {
                        "c_void".to_string()
                    }
                    other => self.type_name(other),
                };
                format!("{qualifier} {inner}")
            }
            CType::Array { element, size } => {
                format!("[{}; {}]", self.type_name(element), size)
            }
            CType::FunctionPointer(sig) => self.function_pointer_type(sig),
            other => names::rust_type_name(other),
        }
    }

    /// Return-position variant of [`type_name`](Self::type_name): `void`
    /// yields `None` so callers can omit the arrow.
    pub(crate) fn return_type_name(&self, ty: &CType) -> Option<String> {
        match ty {
            CType::Primitive(crate::parser::ast::PrimitiveKind::Void) => None,
            other => Some(self.type_name(other)),
        }
    }

    pub(crate) fn function_pointer_type(&self, sig: &FunctionSig) -> String {
        let mut args: Vec<String> = sig
            .params
            .iter()
            .map(|param| {
                format!(
                    "{}: {}",
                    names::param_name(&param.name),
                    self.type_name(&param.ty)
                )
            })
            .collect();
        if sig.variadic {
            args.push("...".to_string());
        }
        match self.return_type_name(&sig.return_type) {
            Some(ret) => format!(
                "Option<unsafe extern \"C\" fn({}) -> {}>",
                args.join(", "),
                ret
            ),
            None => format!("Option<unsafe extern \"C\" fn({})>", args.join(", ")),
        }
    }
}

/// Strip C integer suffixes (`u`, `U`, `l`, `L` combinations) from a literal
/// spelling so it can be re-emitted as a Rust literal.
pub(crate) fn strip_int_suffix(raw: &str) -> &str {
    raw.trim_end_matches(['u', 'U', 'l', 'L'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn collect_source(source: &str) -> Generator {
        let mut parser = Parser::new(source).expect("lexing failed");
        let unit = parser.parse_header("test.h").expect("parsing failed");
        let mut generator = Generator::new(GenOptions {
            output_dir: PathBuf::from("/tmp"),
        });
        generator.collect(&unit);
        generator
    }

    #[test]
    fn test_collect_routes_declarations() {
        let generator = collect_source(
            r#"
            typedef struct SDL_Window SDL_Window;
            typedef Uint32 SDL_WindowID;
            typedef enum SDL_Mode { SDL_MODE_A } SDL_Mode;
            typedef struct SDL_Point { int x; int y; } SDL_Point;
            typedef void (SDLCALL *SDL_EventCallback)(void *userdata);
            extern SDL_DECLSPEC void SDLCALL SDL_PumpEvents(void);
            "#,
        );

        assert_eq!(generator.pointer_handles, vec!["SDL_Window"]);
        assert_eq!(generator.integer_handles.len(), 1);
        assert_eq!(generator.enums.len(), 1);
        assert_eq!(generator.records.len(), 1);
        assert_eq!(generator.callbacks.len(), 1);
        assert_eq!(generator.functions.len(), 1);
    }

    #[test]
    fn test_collects_filter_shaped_callbacks() {
        let generator = collect_source(
            r#"
            typedef bool (SDLCALL *SDL_EventFilter)(void *userdata, SDL_Event *event);
            typedef SDL_HitTestResult (SDLCALL *SDL_HitTest)(SDL_Window *win, const SDL_Point *area, void *data);
            "#,
        );

        let names: Vec<&str> = generator
            .callbacks
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["SDL_EventFilter", "SDL_HitTest"]);
    }

    #[test]
    fn test_pointer_handle_collapse() {
        let generator = collect_source("typedef struct SDL_Window SDL_Window;");

        let ptr = CType::pointer_to(CType::Named("SDL_Window".to_string()), false);
        assert_eq!(generator.type_name(&ptr), "SDL_Window");

        // Double pointer keeps one level
        let ptr_ptr = CType::pointer_to(ptr, false);
        assert_eq!(generator.type_name(&ptr_ptr), "*mut SDL_Window");
    }

    #[test]
    fn test_va_list_functions_skipped() {
        let generator = collect_source(
            "extern SDL_DECLSPEC void SDLCALL SDL_LogMessageV2(int category, const char *fmt, va_list ap);",
        );
        assert!(generator.functions.is_empty());
    }

    #[test]
    fn test_strip_int_suffix() {
        assert_eq!(strip_int_suffix("0x8000u"), "0x8000");
        assert_eq!(strip_int_suffix("128ULL"), "128");
        assert_eq!(strip_int_suffix("42"), "42");
    }
}
