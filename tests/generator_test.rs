//! End-to-end pipeline tests: parse a synthetic header, collect, emit, and
//! inspect the generated files.

use std::fs;
use std::path::PathBuf;

use sdlgen::gen::{GenError, GenOptions, Generator};
use sdlgen::parser::parse::Parser;

fn temp_output(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sdlgen-test-{}-{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn run_pipeline(source: &str, out: &PathBuf) -> Generator {
    let mut parser = Parser::new(source).expect("lexing failed");
    let unit = parser.parse_header("synthetic.h").expect("parsing failed");
    let mut generator = Generator::new(GenOptions {
        output_dir: out.clone(),
    });
    generator.collect(&unit);
    generator.generate().expect("generation failed");
    generator
}

const ROUND_TRIP_HEADER: &str = r#"
typedef struct SDL_Window SDL_Window;

typedef enum SDL_TestMode
{
    SDL_TEST_MODE_A = 0,
    SDL_TEST_MODE_B = 1
} SDL_TestMode;

typedef struct SDL_TestData
{
    Uint8 data[16];
    float scale;
} SDL_TestData;

extern SDL_DECLSPEC SDL_Window * SDLCALL SDL_CreateTestWindow(const char *title, int w, int h);
extern SDL_DECLSPEC const char * SDLCALL SDL_GetTestError(void);
"#;

#[test]
fn test_round_trip_enum_struct_function() {
    let out = temp_output("roundtrip");
    run_pipeline(ROUND_TRIP_HEADER, &out);

    let enums = fs::read_to_string(out.join("enums.rs")).unwrap();
    assert!(enums.contains("pub enum SDL_TestMode"));
    assert!(enums.contains("A = 0,"));
    assert!(enums.contains("B = 1,"));

    let structs = fs::read_to_string(out.join("structs.rs")).unwrap();
    assert!(structs.contains("#[repr(C)]"));
    assert!(structs.contains("pub struct SDL_TestData"));
    assert!(structs.contains("pub data: [u8; 16],"));
    assert!(structs.contains("pub scale: f32,"));

    let handles = fs::read_to_string(out.join("handles.rs")).unwrap();
    assert!(handles.contains("pub struct SDL_Window(pub *mut c_void);"));
    assert!(handles.contains("pub const fn null()"));

    let functions = fs::read_to_string(out.join("functions.rs")).unwrap();
    // Handle pointer collapses into the newtype; the title string stays raw
    // in the extern block and becomes &str in the wrapper
    assert!(functions.contains(
        "pub fn SDL_CreateTestWindow(title: *const c_char, w: i32, h: i32) -> SDL_Window;"
    ));
    assert!(functions
        .contains("pub unsafe fn SDL_CreateTestWindow(title: &str, w: i32, h: i32) -> SDL_Window"));
    assert!(functions.contains("CString::new(title)"));
    assert!(functions.contains("pub unsafe fn SDL_GetTestError() -> Option<String>"));

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn test_cross_header_types_are_defined_in_output() {
    let rect_header = r#"
        typedef struct SDL_Rect
        {
            int x;
            int y;
            int w;
            int h;
        } SDL_Rect;
    "#;
    let video_header = r#"
        typedef Uint32 SDL_DisplayID;
        typedef struct SDL_Window SDL_Window;
        typedef bool (SDLCALL *SDL_EventFilter)(void *userdata, SDL_Event *event);
        extern SDL_DECLSPEC bool SDLCALL SDL_GetDisplayBounds(SDL_DisplayID displayID, SDL_Rect *rect);
        extern SDL_DECLSPEC void SDLCALL SDL_SetEventFilter(SDL_EventFilter filter, void *userdata);
    "#;

    let out = temp_output("closure");
    let mut generator = Generator::new(GenOptions {
        output_dir: out.clone(),
    });
    for (name, source) in [("SDL_rect.h", rect_header), ("SDL_video.h", video_header)] {
        let mut parser = Parser::new(source).expect("lexing failed");
        let unit = parser.parse_header(name).expect("parsing failed");
        generator.collect(&unit);
    }
    generator.generate().expect("generation failed");

    // Every type the function signatures reference is defined in the output
    let structs = fs::read_to_string(out.join("structs.rs")).unwrap();
    assert!(structs.contains("pub struct SDL_Rect"));

    let functions = fs::read_to_string(out.join("functions.rs")).unwrap();
    assert!(functions.contains("rect: *mut SDL_Rect"));
    assert!(functions.contains(
        "pub type SDL_EventFilter = Option<unsafe extern \"C\" fn(userdata: *mut c_void, event: *mut SDL_Event) -> bool>;"
    ));
    assert!(functions.contains("filter: SDL_EventFilter"));

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn test_output_is_deterministic() {
    let out_a = temp_output("det-a");
    let out_b = temp_output("det-b");
    run_pipeline(ROUND_TRIP_HEADER, &out_a);
    run_pipeline(ROUND_TRIP_HEADER, &out_b);

    for file in [
        "enums.rs",
        "constants.rs",
        "handles.rs",
        "structs.rs",
        "functions.rs",
    ] {
        let a = fs::read_to_string(out_a.join(file)).unwrap();
        let b = fs::read_to_string(out_b.join(file)).unwrap();
        assert_eq!(a, b, "{file} differs between runs");
    }

    let _ = fs::remove_dir_all(&out_a);
    let _ = fs::remove_dir_all(&out_b);
}

#[test]
fn test_bitmask_enum_newtype() {
    let out = temp_output("bitmask");
    run_pipeline(
        r#"
        typedef enum SDL_TestFlags
        {
            SDL_TEST_READ = 0x01,
            SDL_TEST_WRITE = 0x02,
            SDL_TEST_BOTH = SDL_TEST_READ | SDL_TEST_WRITE
        } SDL_TestFlags;
        "#,
        &out,
    );

    let enums = fs::read_to_string(out.join("enums.rs")).unwrap();
    assert!(enums.contains("#[repr(transparent)]"));
    assert!(enums.contains("pub struct SDL_TestFlags(pub u32);"));
    assert!(enums.contains("pub const NONE: SDL_TestFlags = SDL_TestFlags(0);"));
    assert!(enums.contains("pub const Read: SDL_TestFlags = SDL_TestFlags(0x01);"));
    assert!(enums.contains("Self::Read.0 | Self::Write.0"));
    assert!(enums.contains("impl BitOr for SDL_TestFlags"));

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn test_variant_collision_is_an_error() {
    // Both members re-case to "Foo" after prefix stripping
    let source = r#"
        typedef enum SDL_TestThing
        {
            SDL_TEST_THING_FOO = 0,
            SDL_TEST_THING_Foo = 1
        } SDL_TestThing;
    "#;
    let out = temp_output("collision");
    let mut parser = Parser::new(source).unwrap();
    let unit = parser.parse_header("synthetic.h").unwrap();
    let mut generator = Generator::new(GenOptions {
        output_dir: out.clone(),
    });
    generator.collect(&unit);

    match generator.generate() {
        Err(GenError::VariantCollision {
            enum_name, variant, ..
        }) => {
            assert_eq!(enum_name, "SDL_TestThing");
            assert_eq!(variant, "Foo");
        }
        other => panic!("expected variant collision, got {:?}", other.err()),
    }

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn test_unresolvable_macro_warns_instead_of_failing() {
    let out = temp_output("macro");
    let generator = run_pipeline(
        r#"
        #define SDL_TEST_GOOD 42
        #define SDL_TEST_BAD ((Uint64)-1)
        "#,
        &out,
    );

    let constants = fs::read_to_string(out.join("constants.rs")).unwrap();
    assert!(constants.contains("pub const SDL_TEST_GOOD: u32 = 42;"));
    assert!(!constants.contains("SDL_TEST_BAD"));
    assert!(generator
        .warnings()
        .iter()
        .any(|w| w.contains("SDL_TEST_BAD")));

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn test_string_constants_are_cstr() {
    let out = temp_output("propstr");
    run_pipeline(
        r#"#define SDL_PROP_TEST_STRING "SDL.test.string""#,
        &out,
    );

    let constants = fs::read_to_string(out.join("constants.rs")).unwrap();
    assert!(constants.contains("use core::ffi::CStr;"));
    assert!(constants.contains("pub const SDL_PROP_TEST_STRING: &CStr = c\"SDL.test.string\";"));

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn test_event_union_lifting() {
    let out = temp_output("union");
    run_pipeline(
        r#"
        typedef union SDL_TestEvent
        {
            Uint32 type;
            struct
            {
                Sint32 x;
                Sint32 y;
            } motion;
        } SDL_TestEvent;
        "#,
        &out,
    );

    let structs = fs::read_to_string(out.join("structs.rs")).unwrap();
    assert!(structs.contains("pub union SDL_TestEvent"));
    assert!(structs.contains("pub r#type: u32,"));
    assert!(structs.contains("pub motion: SDL_TestEvent_motion,"));
    assert!(structs.contains("pub struct SDL_TestEvent_motion"));

    let _ = fs::remove_dir_all(&out);
}
