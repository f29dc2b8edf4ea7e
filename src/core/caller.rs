//! Caller location
//!
//! Two ways of locating the code that emitted a log entry:
//!
//! - [`CallSite`] is captured at the public API boundary through
//!   `#[track_caller]`. Every logging entry point forwards it, so no frame
//!   counting is involved.
//! - [`CallerResolver`] walks a captured backtrace outward and returns the
//!   first frame whose source file is not part of this crate. It is slower and
//!   depends on debug info, and it never fails: when nothing can be resolved
//!   it returns [`Caller::unknown`].

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;
use std::path::{Component, Path, PathBuf};

/// Root of this crate's sources, used to recognise library frames
const SOURCE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src");

/// Symbol prefix of this crate, used when a frame carries no file name
const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Symbol prefixes of the resolver's own frames
const RESOLVER_PREFIXES: [&str; 2] = [
    concat!(env!("CARGO_CRATE_NAME"), "::core::caller::CallerResolver::"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::caller::captured_frames"),
];

/// Runtime frames the library introduces around hooks: closure call shims
/// and the unwind guard
const RUNTIME_SHIM_PREFIXES: [&str; 5] = [
    "core::ops::function::",
    "core::panic::",
    "std::panicking::",
    "std::panic::",
    "__rust_try",
];

pub const UNKNOWN_FILE: &str = "unknown file";
pub const UNKNOWN_FUNCTION: &str = "unknown function";

/// Source position of a call into the logging API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    /// Capture the location of the caller of the enclosing `#[track_caller]` chain
    #[track_caller]
    pub fn capture() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
    pub function: String,
    /// Formatted frames from the resolved one outward, when requested
    pub stack: Option<String>,
}

impl Caller {
    /// Sentinel returned when no frame could be resolved
    pub fn unknown() -> Self {
        Self {
            file: UNKNOWN_FILE.to_string(),
            line: 0,
            function: UNKNOWN_FUNCTION.to_string(),
            stack: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.file == UNKNOWN_FILE && self.line == 0
    }

    fn from_frame(frame: &Frame) -> Self {
        Self {
            file: frame.file.clone().unwrap_or_else(|| UNKNOWN_FILE.to_string()),
            line: frame.line.unwrap_or(0),
            function: frame.function.clone(),
            stack: None,
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone)]
struct Frame {
    function: String,
    file: Option<String>,
    line: Option<u32>,
}

impl Frame {
    fn is_library(&self) -> bool {
        let symbol = self.function.trim_start_matches('<');
        if RUNTIME_SHIM_PREFIXES.iter().any(|p| symbol.starts_with(p)) {
            return true;
        }
        match self.file.as_deref() {
            Some(file) => is_library_file(file),
            None => self.function.starts_with(CRATE_PREFIX),
        }
    }

    fn is_resolver(&self) -> bool {
        let symbol = self.function.trim_start_matches('<');
        RESOLVER_PREFIXES.iter().any(|p| symbol.starts_with(p))
    }

    fn describe(&self) -> String {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("{}\n    at {}:{}", self.function, file, line),
            (Some(file), None) => format!("{}\n    at {}", self.function, file),
            _ => self.function.clone(),
        }
    }
}

/// Stack-walking caller lookup
pub struct CallerResolver;

impl CallerResolver {
    /// Find the nearest frame outside this crate
    ///
    /// `depth` counts frames above the call into `resolve` (1 = the direct
    /// caller). With `skip_internal` set, frames from this crate's own sources
    /// are skipped. If the walk runs off the end of the stack, the frame at
    /// `depth` is returned unfiltered, and if even that does not exist the
    /// result is [`Caller::unknown`].
    #[inline(never)]
    pub fn resolve(skip_internal: bool, depth: usize) -> Caller {
        match captured_frames() {
            Some(frames) => select(&frames, skip_internal, depth, false),
            None => Caller::unknown(),
        }
    }

    /// Like [`CallerResolver::resolve`], also recording the outward stack text
    #[inline(never)]
    pub fn resolve_with_stack(skip_internal: bool, depth: usize) -> Caller {
        match captured_frames() {
            Some(frames) => select(&frames, skip_internal, depth, true),
            None => Caller::unknown(),
        }
    }
}

/// Capture and parse the current stack
///
/// Debug info may still report this as a frame of its own above the public
/// resolver entry point; `select` accounts for that.
#[inline(always)]
fn captured_frames() -> Option<Vec<Frame>> {
    let backtrace = Backtrace::force_capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return None;
    }
    Some(parse_frames(&backtrace.to_string()))
}

fn select(frames: &[Frame], skip_internal: bool, depth: usize, stack_info: bool) -> Caller {
    // `depth` counts from the public resolver entry point: the last frame of
    // the first run of resolver frames. The capture helper, even when inlined,
    // can still appear as a frame of its own before it.
    let Some(first) = frames.iter().position(Frame::is_resolver) else {
        return Caller::unknown();
    };
    let origin = frames[first..]
        .iter()
        .position(|frame| !frame.is_resolver())
        .map_or(frames.len() - 1, |offset| first + offset - 1);
    let start = origin + depth.max(1);
    if start >= frames.len() {
        return Caller::unknown();
    }

    let found = if skip_internal {
        frames[start..]
            .iter()
            .position(|frame| !frame.is_library())
            .map_or(start, |offset| start + offset)
    } else {
        start
    };

    let mut caller = Caller::from_frame(&frames[found]);
    if stack_info {
        let text = frames[found..]
            .iter()
            .map(Frame::describe)
            .collect::<Vec<_>>()
            .join("\n");
        caller.stack = Some(text.strip_suffix('\n').unwrap_or(&text).to_string());
    }
    caller
}

fn is_library_file(file: &str) -> bool {
    let path = Path::new(file);
    let absolute = if path.is_relative() {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => return false,
        }
    } else {
        path.to_path_buf()
    };
    normalize(&absolute).starts_with(normalize(Path::new(SOURCE_ROOT)))
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Parse the textual form of a captured backtrace
///
/// Each symbol is printed as `N: name`, optionally followed by an
/// `at file:line:column` line. This is the `Display` output of
/// [`Backtrace`], whose format std does not guarantee. If it changes so that
/// no resolver frame is recognised, [`CallerResolver`] silently returns
/// [`Caller::unknown`].
fn parse_frames(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for raw in text.lines() {
        let line = raw.trim_start();
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (file, line_no) = split_location(location);
                frame.file = Some(file.to_string());
                frame.line = line_no;
            }
        } else if let Some((index, name)) = line.split_once(": ") {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                frames.push(Frame {
                    function: name.trim().to_string(),
                    file: None,
                    line: None,
                });
            }
        }
    }
    frames
}

/// Split `file:line:column` (column optional) into file and line
fn split_location(location: &str) -> (&str, Option<u32>) {
    let numeric = |s: &str| s.parse::<u32>().ok();
    if let Some((head, last)) = location.rsplit_once(':') {
        if let Some(last_no) = numeric(last) {
            if let Some((file, line)) = head.rsplit_once(':') {
                if let Some(line_no) = numeric(line) {
                    return (file, Some(line_no));
                }
            }
            return (head, Some(last_no));
        }
    }
    (location, None)
}
