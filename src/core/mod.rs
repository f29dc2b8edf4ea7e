//! Core logger types and traits

pub mod caller;
pub mod config;
pub mod entry;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod timestamp;
pub mod value;

pub use caller::{CallSite, Caller, CallerResolver, UNKNOWN_FILE, UNKNOWN_FUNCTION};
pub use config::{FormatKind, HandlerConfig, LoggerConfig, SinkConfig};
pub use entry::{Entry, EntryBuilder, MergeEntryBuilder};
pub use error::{LoggerError, Result};
pub use handler::{Formatter, Handler, HandlerBuilder, Rendering};
pub use hooks::{Hook, HookContext};
pub use level::{Level, LevelRegistry, DEFAULT_LEVEL_NAMES};
pub use logger::{
    exit_process, no_exit, ExitAction, LevelDispatch, Logger, LoggerBuilder, DEFAULT_SCOPE,
};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use timestamp::TimestampFormat;
pub use value::{FieldValue, Fields};
