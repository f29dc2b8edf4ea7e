//! Formatter implementations

pub mod json;
pub mod plain;
pub mod text;

pub use json::{JsonEntryBuilder, JsonFormatter, RESERVED_FIELDS};
pub use plain::PlainFormatter;
pub use text::TextFormatter;

pub use crate::core::{Formatter, Rendering};
