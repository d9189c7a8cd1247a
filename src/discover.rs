//! Header discovery
//!
//! Builds the ordered list of headers to parse by scanning the umbrella
//! header `SDL3/SDL.h` for one level of `#include <SDL3/...>` lines. Headers
//! that only provide runtime plumbing (allocators, atomics, threading, the
//! begin/close code shims) are filtered out, and the platform-API headers the
//! umbrella does not pull in are appended at the end.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;

/// Headers listed by the umbrella that the generator does not bind.
fn is_unbound(name: &str) -> bool {
    matches!(
        name,
        "SDL_assert.h"
            | "SDL_asyncio.h"
            | "SDL_atomic.h"
            | "SDL_begin_code.h"
            | "SDL_bits.h"
            | "SDL_close_code.h"
            | "SDL_copying.h"
            | "SDL_dialog.h"
            | "SDL_egl.h"
            | "SDL_endian.h"
            | "SDL_error.h"
            | "SDL_filesystem.h"
            | "SDL_gpu.h"
            | "SDL_hidapi.h"
            | "SDL_intrin.h"
            | "SDL_iostream.h"
            | "SDL_locale.h"
            | "SDL_main.h"
            | "SDL_main_impl.h"
            | "SDL_mutex.h"
            | "SDL_oldnames.h"
            | "SDL_platform_defines.h"
            | "SDL_process.h"
            | "SDL_render.h"
            | "SDL_revision.h"
            | "SDL_stdinc.h"
            | "SDL_storage.h"
            | "SDL_thread.h"
            | "SDL_time.h"
            | "SDL_tray.h"
            | "SDL_version.h"
    )
}

/// Headers the umbrella does not include but the bindings cover.
const EXTRA_HEADERS: &[&str] = &["SDL_vulkan.h", "SDL_metal.h"];

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("Umbrella header not found: {}", path.display())]
    UmbrellaNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The ordered header set to parse, plus any headers the umbrella listed
/// that were not found on disk.
#[derive(Debug)]
pub struct HeaderSet {
    pub files: Vec<PathBuf>,
    pub missing: Vec<String>,
}

/// Scan `<include_dir>/SDL3/SDL.h` for bound child headers and append the
/// extras. Include order is preserved so output is stable across runs.
pub fn discover_headers(include_dir: &Path) -> Result<HeaderSet, DiscoverError> {
    let sdl3_dir = include_dir.join("SDL3");
    let umbrella = sdl3_dir.join("SDL.h");
    if !umbrella.is_file() {
        return Err(DiscoverError::UmbrellaNotFound { path: umbrella });
    }

    let source = fs::read_to_string(&umbrella).map_err(|source| DiscoverError::Read {
        path: umbrella.clone(),
        source,
    })?;

    let mut names: Vec<String> = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for line in source.lines() {
        let Some(name) = parse_include_line(line) else {
            continue;
        };
        if is_unbound(name) {
            continue;
        }
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    for extra in EXTRA_HEADERS {
        if seen.insert((*extra).to_string()) {
            names.push((*extra).to_string());
        }
    }

    let mut files = Vec::new();
    let mut missing = Vec::new();
    for name in names {
        let path = sdl3_dir.join(&name);
        if path.is_file() {
            files.push(path);
        } else {
            missing.push(name);
        }
    }

    Ok(HeaderSet { files, missing })
}

/// Extract the header name from a `#include <SDL3/Name.h>` line, if the line
/// is one.
fn parse_include_line(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("include")?.trim_start();
    let rest = rest.strip_prefix('<')?;
    let inner = rest.strip_suffix('>')?;
    inner.strip_prefix("SDL3/")
}
