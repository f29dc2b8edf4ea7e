//! Main logger implementation
//!
//! A [`Logger`] runs its hooks, builds one [`Entry`] from the hook fields and
//! the caller's fields, and offers that entry to every registered handler in
//! registration order. If the entry's level is the logger's exit-on level, the
//! exit action runs after every handler has had its turn.

use super::{
    caller::CallSite,
    entry::{Entry, EntryBuilder, MergeEntryBuilder},
    error::{LoggerError, Result},
    handler::Handler,
    hooks::{Hook, HookContext},
    level::{Level, LevelRegistry},
    metrics::LoggerMetrics,
    value::{FieldValue, Fields},
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Scope reported by the scope hook when the logger has none
pub const DEFAULT_SCOPE: &str = "general";

/// Action run after dispatching an entry at the exit-on level
pub type ExitAction = Arc<dyn Fn(&Entry) + Send + Sync>;

/// Exit action that does nothing
pub fn no_exit() -> ExitAction {
    Arc::new(|_: &Entry| {})
}

/// Exit action that terminates the process with `code`
pub fn exit_process(code: i32) -> ExitAction {
    Arc::new(move |_: &Entry| std::process::exit(code))
}

pub struct Logger {
    levels: LevelRegistry,
    handlers: RwLock<Vec<Arc<Handler>>>,
    hooks: RwLock<BTreeMap<String, Hook>>,
    exit_on: Option<Level>,
    exit_action: ExitAction,
    scope: Option<String>,
    entry_builder: Arc<dyn EntryBuilder>,
    /// Metrics for observability (dispatched, emitted, filtered, failures)
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger with the default level set, no handlers, no hooks and no exit-on level
    #[must_use]
    pub fn new() -> Self {
        Self::with_levels(LevelRegistry::default())
    }

    #[must_use]
    pub fn with_levels(levels: LevelRegistry) -> Self {
        Self {
            levels,
            handlers: RwLock::new(Vec::new()),
            hooks: RwLock::new(BTreeMap::new()),
            exit_on: None,
            exit_action: no_exit(),
            scope: None,
            entry_builder: Arc::new(MergeEntryBuilder),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn levels(&self) -> &LevelRegistry {
        &self.levels
    }

    /// Look up a level by name, case-insensitively
    pub fn level(&self, name: &str) -> Result<Level> {
        self.levels
            .get(name)
            .cloned()
            .ok_or_else(|| LoggerError::unknown_level(name))
    }

    /// Bound entry point for the level called `name`
    ///
    /// # Example
    ///
    /// ```
    /// use ploggy::Logger;
    ///
    /// let logger = Logger::new();
    /// let warn = logger.dispatcher("warn").unwrap();
    /// warn.log("disk low").unwrap();
    /// assert!(logger.dispatcher("notice").is_err());
    /// ```
    pub fn dispatcher(&self, name: &str) -> Result<LevelDispatch<'_>> {
        Ok(LevelDispatch {
            logger: self,
            level: self.level(name)?,
        })
    }

    /// Append `handler` unless this exact handler is already registered
    ///
    /// Returns `true` if the handler was added.
    pub fn register(&self, handler: Arc<Handler>) -> bool {
        let mut handlers = self.handlers.write();
        if handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Remove `handler` (by identity); returns `true` if it was registered
    pub fn unregister(&self, handler: &Arc<Handler>) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|h| !Arc::ptr_eq(h, handler));
        handlers.len() != before
    }

    /// Registered handlers in dispatch order
    pub fn handlers(&self) -> Vec<Arc<Handler>> {
        self.handlers.read().clone()
    }

    /// Register or replace the hook producing the field `name`
    pub fn set_hook(&self, name: impl Into<String>, hook: Hook) -> Option<Hook> {
        self.hooks.write().insert(name.into(), hook)
    }

    pub fn remove_hook(&self, name: &str) -> Option<Hook> {
        self.hooks.write().remove(name)
    }

    /// Hook field names in execution order
    pub fn hook_names(&self) -> Vec<String> {
        self.hooks.read().keys().cloned().collect()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn exit_on(&self) -> Option<&Level> {
        self.exit_on.as_ref()
    }

    pub fn set_exit_on(&mut self, level: Option<Level>) {
        self.exit_on = level;
    }

    pub fn set_exit_action(&mut self, action: ExitAction) {
        self.exit_action = action;
    }

    pub fn set_scope(&mut self, scope: impl Into<String>) {
        self.scope = Some(scope.into());
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[track_caller]
    pub fn log(&self, level: &Level, message: impl Into<FieldValue>) -> Result<()> {
        self.dispatch(level.clone(), message.into(), Fields::new(), CallSite::capture())
    }

    /// Log with explicit fields; these override hook fields of the same name
    #[track_caller]
    pub fn log_with(
        &self,
        level: &Level,
        message: impl Into<FieldValue>,
        fields: Fields,
    ) -> Result<()> {
        self.dispatch(level.clone(), message.into(), fields, CallSite::capture())
    }

    /// Log at the level called `name`; fails with `UnknownLevel` if there is none
    #[track_caller]
    pub fn log_named(
        &self,
        name: &str,
        message: impl Into<FieldValue>,
        fields: Fields,
    ) -> Result<()> {
        let call_site = CallSite::capture();
        let level = self.level(name)?;
        self.dispatch(level, message.into(), fields, call_site)
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<FieldValue>) -> Result<()> {
        self.log_named("debug", message, Fields::new())
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<FieldValue>) -> Result<()> {
        self.log_named("info", message, Fields::new())
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<FieldValue>) -> Result<()> {
        self.log_named("warn", message, Fields::new())
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<FieldValue>) -> Result<()> {
        self.log_named("error", message, Fields::new())
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<FieldValue>) -> Result<()> {
        self.log_named("fatal", message, Fields::new())
    }

    #[track_caller]
    pub fn debug_with(&self, message: impl Into<FieldValue>, fields: Fields) -> Result<()> {
        self.log_named("debug", message, fields)
    }

    #[track_caller]
    pub fn info_with(&self, message: impl Into<FieldValue>, fields: Fields) -> Result<()> {
        self.log_named("info", message, fields)
    }

    #[track_caller]
    pub fn warn_with(&self, message: impl Into<FieldValue>, fields: Fields) -> Result<()> {
        self.log_named("warn", message, fields)
    }

    #[track_caller]
    pub fn error_with(&self, message: impl Into<FieldValue>, fields: Fields) -> Result<()> {
        self.log_named("error", message, fields)
    }

    #[track_caller]
    pub fn fatal_with(&self, message: impl Into<FieldValue>, fields: Fields) -> Result<()> {
        self.log_named("fatal", message, fields)
    }

    fn dispatch(
        &self,
        level: Level,
        message: FieldValue,
        fields: Fields,
        call_site: CallSite,
    ) -> Result<()> {
        let hook_fields = self.run_hooks(&level, call_site);
        let entry = self
            .entry_builder
            .build(level, message, hook_fields, fields, call_site);
        self.metrics.record_dispatched();

        // Snapshot so handlers and hooks may call back into the logger
        let handlers = self.handlers();
        let mut first_error = None;

        for handler in &handlers {
            let emit_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.emit(&entry)
            }));

            match emit_result {
                Ok(Ok(true)) => {
                    self.metrics.record_emitted();
                }
                Ok(Ok(false)) => {
                    self.metrics.record_filtered();
                }
                Ok(Err(e)) => {
                    self.metrics.record_write_failure();
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(panic_info) => {
                    self.metrics.record_write_failure();
                    eprintln!(
                        "[LOGGER CRITICAL] Handler '{}' panicked: {}. \
                         Other handlers continue to function.",
                        handler.name(),
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }

        if self.exit_on.as_ref() == Some(entry.level()) {
            self.metrics.record_exit();
            (self.exit_action)(&entry);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run every hook once, in name order
    fn run_hooks(&self, level: &Level, call_site: CallSite) -> Fields {
        let hooks: Vec<(String, Hook)> = self
            .hooks
            .read()
            .iter()
            .map(|(name, hook)| (name.clone(), Arc::clone(hook)))
            .collect();

        let ctx = HookContext::new(self, level, call_site);
        let mut fields = Fields::new();
        for (name, hook) in hooks {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| hook(&ctx)));
            let value = match result {
                Ok(value) => value,
                Err(panic_info) => {
                    self.metrics.record_hook_failure();
                    eprintln!(
                        "[LOGGER ERROR] Hook '{}' panicked: {}",
                        name,
                        panic_message(panic_info.as_ref())
                    );
                    FieldValue::Null
                }
            };
            fields.add_field(name, value);
        }
        fields
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("levels", &self.levels.names())
            .field("handlers", &self.handlers.read().len())
            .field("hooks", &self.hook_names())
            .field("exit_on", &self.exit_on)
            .field("scope", &self.scope)
            .finish()
    }
}

/// A logger bound to one level
#[derive(Clone)]
pub struct LevelDispatch<'a> {
    logger: &'a Logger,
    level: Level,
}

impl LevelDispatch<'_> {
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[track_caller]
    pub fn log(&self, message: impl Into<FieldValue>) -> Result<()> {
        self.logger.log(&self.level, message)
    }

    #[track_caller]
    pub fn log_with(&self, message: impl Into<FieldValue>, fields: Fields) -> Result<()> {
        self.logger.log_with(&self.level, message, fields)
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use ploggy::prelude::*;
///
/// let logger = Logger::builder()
///     .level_names(["TRACE", "DEBUG", "NOTICE"])
///     .handler(Handler::new(PlainFormatter))
///     .hook("service", hooks::constant("billing"))
///     .scope("billing")
///     .build();
///
/// assert!(logger.level("notice").is_ok());
/// assert!(logger.level("warn").is_err());
/// ```
pub struct LoggerBuilder {
    levels: LevelRegistry,
    handlers: Vec<Arc<Handler>>,
    hooks: BTreeMap<String, Hook>,
    exit_on: Option<Level>,
    exit_action: ExitAction,
    scope: Option<String>,
    entry_builder: Arc<dyn EntryBuilder>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            levels: LevelRegistry::default(),
            handlers: Vec::new(),
            hooks: BTreeMap::new(),
            exit_on: None,
            exit_action: no_exit(),
            scope: None,
            entry_builder: Arc::new(MergeEntryBuilder),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn levels(mut self, levels: LevelRegistry) -> Self {
        self.levels = levels;
        self
    }

    /// Use a custom level set; ordinals follow the order of `names`
    #[must_use = "builder methods return a new value"]
    pub fn level_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = LevelRegistry::new(names);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler(self, handler: Handler) -> Self {
        self.shared_handler(Arc::new(handler))
    }

    /// Register a handler the caller keeps a reference to
    #[must_use = "builder methods return a new value"]
    pub fn shared_handler(mut self, handler: Arc<Handler>) -> Self {
        if !self.handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            self.handlers.push(handler);
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hook(mut self, name: impl Into<String>, hook: Hook) -> Self {
        self.hooks.insert(name.into(), hook);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_on(mut self, level: Level) -> Self {
        self.exit_on = Some(level);
        self
    }

    /// Action run after dispatching an entry at the exit-on level
    ///
    /// Default is a no-op; see [`exit_process`] to terminate the process.
    #[must_use = "builder methods return a new value"]
    pub fn exit_action(mut self, action: ExitAction) -> Self {
        self.exit_action = action;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn entry_builder<B: EntryBuilder + 'static>(mut self, builder: B) -> Self {
        self.entry_builder = Arc::new(builder);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            levels: self.levels,
            handlers: RwLock::new(self.handlers),
            hooks: RwLock::new(self.hooks),
            exit_on: self.exit_on,
            exit_action: self.exit_action,
            scope: self.scope,
            entry_builder: self.entry_builder,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
