//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Each one expands
//! to a logger call at the macro's own location, so call sites recorded by
//! the logger point at the macro invocation.
//!
//! # Examples
//!
//! ```
//! use ploggy::prelude::*;
//! use ploggy::info;
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//! ```

/// Build a [`Fields`](crate::core::Fields) map from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use ploggy::fields;
///
/// let fields = fields! { "user" => "alice", "attempts" => 3 };
/// assert_eq!(fields.len(), 2);
/// assert!(fields! {}.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::core::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::core::Fields::new()$(.with_field($key, $value))+
    };
}

/// Log a formatted message at an explicit [`Level`](crate::core::Level).
///
/// # Examples
///
/// ```
/// # use ploggy::prelude::*;
/// # let logger = Logger::new();
/// use ploggy::log;
/// log!(logger, Level::INFO, "Simple message").unwrap();
/// log!(logger, Level::ERROR, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(&$level, format!($($arg)+))
    };
}

/// Log a formatted message at the level called `name`.
///
/// Fails with `UnknownLevel` when the logger has no such level.
///
/// ```
/// # use ploggy::prelude::*;
/// use ploggy::log_named;
/// let logger = Logger::builder().level_names(["TRACE", "NOTICE"]).build();
/// log_named!(logger, "notice", "{} jobs queued", 4).unwrap();
/// assert!(log_named!(logger, "warn", "missing").is_err());
/// ```
#[macro_export]
macro_rules! log_named {
    ($logger:expr, $name:expr, $($arg:tt)+) => {
        $logger.log_named($name, format!($($arg)+), $crate::core::Fields::new())
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use ploggy::prelude::*;
/// # let logger = Logger::new();
/// use ploggy::debug;
/// debug!(logger, "Debug information").unwrap();
/// debug!(logger, "Counter value: {}", 10).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_named!($logger, "debug", $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_named!($logger, "info", $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use ploggy::prelude::*;
/// # let logger = Logger::new();
/// use ploggy::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5).unwrap();
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_named!($logger, "warn", $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_named!($logger, "error", $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// This triggers the logger's exit action when the logger exits on FATAL.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_named!($logger, "fatal", $($arg)+)
    };
}
