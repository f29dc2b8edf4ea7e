//! # ploggy
//!
//! The dispatch core of a structured logging framework.
//!
//! A [`Logger`] owns an ordered set of levels, a list of [`Handler`]s and a
//! map of hooks. Each `log` call runs every hook, builds one [`Entry`] from
//! the hook fields plus the caller's own fields, and offers it to every
//! handler in registration order. A handler writes the entry only if its
//! level is at or above the handler's minimum.
//!
//! ## Features
//!
//! - **Ordered levels**: the default DEBUG..FATAL set or any custom list
//! - **Hooks**: per-call field producers (timestamp, call site, scope, ...)
//! - **Formatters**: plain message, human-readable text, and a compact JSON object
//! - **Sinks**: console, file, in-memory buffer or any `io::Write`
//! - **Caller resolution**: `#[track_caller]` call sites plus a stack walker
//!   that skips this crate's own frames
//!
//! ```
//! use ploggy::prelude::*;
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::json("billing");
//! logger.register(Arc::new(Handler::json_builder().sink(sink.clone()).build()));
//!
//! logger.error_with("charge failed", fields! { "amount" => 12.5 }).unwrap();
//! assert!(sink.contents().contains(r#""lvl":"error""#));
//! ```

pub mod core;
pub mod formatters;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::hooks;
    pub use crate::core::{
        Entry, FieldValue, Fields, Formatter, Handler, HandlerBuilder, Level, LevelRegistry,
        Logger, LoggerBuilder, LoggerError, LoggerMetrics, Rendering, Result, Sink,
        TimestampFormat,
    };
    pub use crate::fields;
    pub use crate::formatters::{JsonFormatter, PlainFormatter, TextFormatter};
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, WriterSink};
}

pub use crate::core::hooks;
pub use crate::core::{
    CallSite, Caller, CallerResolver, Entry, FieldValue, Fields, Formatter, Handler, Level,
    LevelRegistry, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Rendering,
    Result, Sink, TimestampFormat,
};
