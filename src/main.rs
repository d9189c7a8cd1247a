// sdlgen: SDL3 header to Rust FFI binding generator

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;

use sdlgen::discover::discover_headers;
use sdlgen::gen::{GenOptions, Generator};
use sdlgen::parser::parse::Parser;

/// Generate Rust FFI bindings from the SDL3 public headers.
#[derive(ClapParser, Debug)]
#[command(name = "sdlgen", version, about)]
struct Cli {
    /// Include root containing the SDL3/ header directory
    include_dir: PathBuf,

    /// Where to place the generated/ directory (defaults to the current
    /// directory)
    output_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join("generated");

    let headers = match discover_headers(&cli.include_dir) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };
    for name in &headers.missing {
        eprintln!("Warning: header {} listed but not found, skipped", name);
    }

    let mut generator = Generator::new(GenOptions { output_dir });

    for path in &headers.files {
        let display = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        eprintln!("Parsing {}...", display);

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Error: failed to read {}: {}", path.display(), e);
                return ExitCode::from(1);
            }
        };

        let mut parser = match Parser::new(&source) {
            Ok(parser) => parser,
            Err(e) => {
                eprintln!("{}: {}", display, e);
                return ExitCode::from(255);
            }
        };

        let unit = match parser.parse_header(&display) {
            Ok(unit) => unit,
            Err(e) => {
                eprintln!("{}: {}", display, e);
                return ExitCode::from(255);
            }
        };

        for diagnostic in parser.diagnostics() {
            eprintln!("{}: {}", display, diagnostic);
        }

        generator.collect(&unit);
    }

    eprintln!("Generating bindings...");
    if let Err(e) = generator.generate() {
        eprintln!("Error: {}", e);
        return ExitCode::from(1);
    }
    for warning in generator.warnings() {
        eprintln!("Warning: {}", warning);
    }

    eprintln!("Done.");
    ExitCode::SUCCESS
}
