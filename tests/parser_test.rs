//! Parser integration tests over a realistic header excerpt.

use sdlgen::parser::ast::{
    CType, Declaration, FieldKind, PrimitiveKind, RecordKind, TypedefBody,
};
use sdlgen::parser::parse::Parser;

const HEADER: &str = r#"
#ifndef SDL_sample_h_
#define SDL_sample_h_

#include <SDL3/SDL_stdinc.h>

#define SDL_SAMPLE_MAX 128
#define SDL_SAMPLE_NAME "sample"

#ifdef __cplusplus
extern "C" {
#endif

typedef Uint32 SDL_SampleID;

typedef struct SDL_Sample SDL_Sample;

typedef enum SDL_SampleKind
{
    SDL_SAMPLE_KIND_AUDIO,
    SDL_SAMPLE_KIND_VIDEO = 0x10,
    SDL_SAMPLE_KIND_BOTH = SDL_SAMPLE_KIND_AUDIO | SDL_SAMPLE_KIND_VIDEO
} SDL_SampleKind;

typedef struct SDL_SampleSpec
{
    SDL_SampleKind kind;
    int channels;
    float gain;
    Uint8 label[32];
    union
    {
        int index;
        void *cookie;
    } source;
} SDL_SampleSpec;

typedef void (SDLCALL *SDL_SampleCallback)(void *userdata, SDL_Sample *sample);

extern SDL_DECLSPEC SDL_Sample * SDLCALL SDL_CreateSample(const char *name, const SDL_SampleSpec *spec);
extern SDL_DECLSPEC void SDLCALL SDL_DestroySample(SDL_Sample *sample);
extern SDL_DECLSPEC void SDLCALL SDL_LogSample(const char *fmt, ...);

SDL_FORCE_INLINE int SDL_SampleChannels(const SDL_SampleSpec *spec)
{
    return spec->channels;
}

#ifdef __cplusplus
}
#endif

#endif /* SDL_sample_h_ */
"#;

fn parse(source: &str) -> (sdlgen::parser::ast::HeaderUnit, Vec<String>) {
    let mut parser = Parser::new(source).expect("lexing failed");
    let unit = parser.parse_header("SDL_sample.h").expect("parsing failed");
    let warnings = parser
        .diagnostics()
        .iter()
        .map(|d| d.message.clone())
        .collect();
    (unit, warnings)
}

#[test]
fn test_full_header_declaration_mix() {
    let (unit, _) = parse(HEADER);

    let names: Vec<&str> = unit
        .decls
        .iter()
        .filter_map(|d| match d {
            Declaration::Typedef(t) => Some(t.name.as_str()),
            Declaration::Enum(e) => Some(e.name.as_str()),
            Declaration::Record(r) => Some(r.name.as_str()),
            Declaration::Function(f) => Some(f.name.as_str()),
            Declaration::Macro(m) => Some(m.name.as_str()),
        })
        .collect();

    assert_eq!(
        names,
        [
            "SDL_SampleID",
            "SDL_Sample",
            "SDL_SampleKind",
            "SDL_SampleSpec",
            "SDL_SampleCallback",
            "SDL_CreateSample",
            "SDL_DestroySample",
            "SDL_LogSample",
            "SDL_sample_h_",
            "SDL_SAMPLE_MAX",
            "SDL_SAMPLE_NAME",
        ]
    );
}

#[test]
fn test_enum_values_resolve_member_references() {
    let (unit, _) = parse(HEADER);

    let decl = unit
        .decls
        .iter()
        .find_map(|d| match d {
            Declaration::Enum(e) if e.name == "SDL_SampleKind" => Some(e),
            _ => None,
        })
        .expect("enum missing");

    assert_eq!(decl.items[0].computed, Some(0));
    assert_eq!(decl.items[1].computed, Some(0x10));
    assert_eq!(decl.items[2].computed, Some(0x10));
}

#[test]
fn test_struct_fields_arrays_and_nested_union() {
    let (unit, _) = parse(HEADER);

    let decl = unit
        .decls
        .iter()
        .find_map(|d| match d {
            Declaration::Record(r) if r.name == "SDL_SampleSpec" => Some(r),
            _ => None,
        })
        .expect("record missing");
    assert_eq!(decl.kind, RecordKind::Struct);
    assert_eq!(decl.fields.len(), 5);

    assert!(matches!(
        &decl.fields[3].kind,
        FieldKind::Plain(CType::Array { size: 32, .. })
    ));

    let FieldKind::Record(nested) = &decl.fields[4].kind else {
        panic!("expected nested record for source field");
    };
    assert_eq!(nested.kind, RecordKind::Union);
    assert!(nested.is_anonymous);
    assert_eq!(nested.fields.len(), 2);
}

#[test]
fn test_function_pointer_typedef() {
    let (unit, _) = parse(HEADER);

    let decl = unit
        .decls
        .iter()
        .find_map(|d| match d {
            Declaration::Typedef(t) if t.name == "SDL_SampleCallback" => Some(t),
            _ => None,
        })
        .expect("typedef missing");

    let TypedefBody::FunctionPointer(sig) = &decl.body else {
        panic!("expected function pointer body");
    };
    assert!(matches!(
        sig.return_type,
        CType::Primitive(PrimitiveKind::Void)
    ));
    assert_eq!(sig.params.len(), 2);
    assert_eq!(sig.params[0].name, "userdata");
}

#[test]
fn test_variadic_function() {
    let (unit, _) = parse(HEADER);

    let decl = unit
        .decls
        .iter()
        .find_map(|d| match d {
            Declaration::Function(f) if f.name == "SDL_LogSample" => Some(f),
            _ => None,
        })
        .expect("function missing");
    assert!(decl.sig.variadic);
    assert_eq!(decl.sig.params.len(), 1);
}

#[test]
fn test_inline_function_skipped_with_warning() {
    let (unit, warnings) = parse(HEADER);

    assert!(!unit.decls.iter().any(|d| matches!(
        d,
        Declaration::Function(f) if f.name == "SDL_SampleChannels"
    )));
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_include_guard_macros_still_captured() {
    // The lexer records every object-like define; filtering guard macros is
    // the generator's job, not the parser's.
    let (unit, _) = parse("#define SDL_video_h_\n#define SDL_ALPHA_OPAQUE 255\n");
    let macros: Vec<&str> = unit
        .decls
        .iter()
        .filter_map(|d| match d {
            Declaration::Macro(m) => Some(m.name.as_str()),
            _ => None,
        })
        .collect();
    assert!(macros.contains(&"SDL_ALPHA_OPAQUE"));
}
