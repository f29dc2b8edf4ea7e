//! Handlers: filtered, formatted output
//!
//! A [`Handler`] pairs a minimum level with a [`Formatter`] and a [`Sink`].
//! It only ever writes entries at or above its minimum level, and every write
//! is flushed before [`Handler::emit`] returns.

use super::entry::Entry;
use super::error::Result;
use super::level::Level;
use super::sink::Sink;
use crate::sinks::ConsoleSink;
use parking_lot::Mutex;

/// Output representation of one entry
#[derive(Debug, Clone, PartialEq)]
pub enum Rendering {
    Text(String),
    Structured(serde_json::Value),
}

impl Rendering {
    /// Render to the single string handed to a sink
    pub fn render(&self, pretty: bool) -> Result<String> {
        match self {
            Rendering::Text(text) => Ok(text.clone()),
            Rendering::Structured(value) if pretty => Ok(serde_json::to_string_pretty(value)?),
            Rendering::Structured(value) => Ok(serde_json::to_string(value)?),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Rendering::Text(text) => Some(text),
            Rendering::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Rendering::Structured(value) => Some(value),
            Rendering::Text(_) => None,
        }
    }
}

/// Turns an entry into its output representation; must be side-effect free
pub trait Formatter: Send + Sync {
    fn format(&self, entry: &Entry) -> Rendering;
    fn name(&self) -> &str;
}

pub struct Handler {
    name: String,
    min_level: Level,
    formatter: Box<dyn Formatter>,
    sink: Mutex<Box<dyn Sink>>,
    pretty: bool,
}

impl Handler {
    /// Handler at INFO writing to stderr
    pub fn new<F: Formatter + 'static>(formatter: F) -> Self {
        Self::builder(formatter).build()
    }

    pub fn builder<F: Formatter + 'static>(formatter: F) -> HandlerBuilder {
        HandlerBuilder::new(formatter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_level(&self) -> &Level {
        &self.min_level
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// True iff `level` is at or above this handler's minimum level
    #[inline]
    pub fn accepts(&self, level: &Level) -> bool {
        *level >= self.min_level
    }

    pub fn format(&self, entry: &Entry) -> Rendering {
        self.formatter.format(entry)
    }

    /// Format and write `entry` if accepted; returns whether it was written
    pub fn emit(&self, entry: &Entry) -> Result<bool> {
        if !self.accepts(entry.level()) {
            return Ok(false);
        }

        let rendered = self.format(entry).render(self.pretty)?;
        let mut sink = self.sink.lock();
        sink.write(&rendered)?;
        sink.flush()?;
        Ok(true)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("formatter", &self.formatter.name())
            .field("pretty", &self.pretty)
            .finish()
    }
}

/// Builder for constructing a Handler with a fluent API
///
/// # Example
/// ```
/// use ploggy::prelude::*;
///
/// let sink = MemorySink::new();
/// let handler = Handler::builder(PlainFormatter)
///     .min_level(Level::WARN)
///     .sink(sink.clone())
///     .build();
///
/// assert!(handler.accepts(&Level::ERROR));
/// assert!(!handler.accepts(&Level::INFO));
/// ```
pub struct HandlerBuilder {
    name: Option<String>,
    min_level: Level,
    formatter: Box<dyn Formatter>,
    sink: Option<Box<dyn Sink>>,
    pretty: bool,
}

impl HandlerBuilder {
    pub fn new<F: Formatter + 'static>(formatter: F) -> Self {
        Self {
            name: None,
            min_level: Level::INFO,
            formatter: Box::new(formatter),
            sink: None,
            pretty: false,
        }
    }

    /// Set the handler name (defaults to the formatter name)
    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Pretty-print structured renderings
    #[must_use = "builder methods return a new value"]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn build(self) -> Handler {
        let name = self
            .name
            .unwrap_or_else(|| self.formatter.name().to_string());
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(ConsoleSink::stderr()));
        Handler {
            name,
            min_level: self.min_level,
            formatter: self.formatter,
            sink: Mutex::new(sink),
            pretty: self.pretty,
        }
    }
}
