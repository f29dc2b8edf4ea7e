//! Hooks: per-call field producers
//!
//! A hook is run on every `log` call and its return value is stored under the
//! name it was registered with. Hooks receive a [`HookContext`] giving access
//! to the logger (for logger-level context such as its scope), the level
//! being logged and the call site of the public logging call.

use super::caller::{CallSite, CallerResolver};
use super::level::Level;
use super::logger::{Logger, DEFAULT_SCOPE};
use super::value::{FieldValue, Fields};
use chrono::Utc;
use std::sync::Arc;

pub type Hook = Arc<dyn Fn(&HookContext<'_>) -> FieldValue + Send + Sync>;

pub struct HookContext<'a> {
    logger: &'a Logger,
    level: &'a Level,
    call_site: CallSite,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(logger: &'a Logger, level: &'a Level, call_site: CallSite) -> Self {
        Self {
            logger,
            level,
            call_site,
        }
    }

    pub fn logger(&self) -> &Logger {
        self.logger
    }

    pub fn level(&self) -> &Level {
        self.level
    }

    pub fn call_site(&self) -> CallSite {
        self.call_site
    }
}

/// Wrap a closure as a [`Hook`]
pub fn from_fn<F>(f: F) -> Hook
where
    F: Fn(&HookContext<'_>) -> FieldValue + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Current UTC time
pub fn timestamp() -> Hook {
    from_fn(|_| FieldValue::Timestamp(Utc::now()))
}

/// `file:line` of the public logging call
pub fn call_site() -> Hook {
    from_fn(|ctx| FieldValue::String(ctx.call_site().to_string()))
}

/// The logger's scope, or `"general"` when it has none
pub fn scope() -> Hook {
    from_fn(|ctx| {
        FieldValue::String(ctx.logger().scope().unwrap_or(DEFAULT_SCOPE).to_string())
    })
}

/// `file:line` of the first frame outside this crate, found by walking the stack
pub fn resolved_line() -> Hook {
    from_fn(|_| FieldValue::String(CallerResolver::resolve(true, 1).to_string()))
}

/// File, line and function of the first frame outside this crate, optionally
/// with the outward stack text
pub fn resolved_caller(stack_info: bool) -> Hook {
    from_fn(move |_| {
        let caller = if stack_info {
            CallerResolver::resolve_with_stack(true, 1)
        } else {
            CallerResolver::resolve(true, 1)
        };
        Fields::new()
            .with_field("file", caller.file)
            .with_field("line", caller.line)
            .with_field("function", caller.function)
            .with_field("stack", caller.stack)
            .into()
    })
}

/// Always the same value
pub fn constant(value: impl Into<FieldValue>) -> Hook {
    let value = value.into();
    from_fn(move |_| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(hook: &Hook, logger: &Logger) -> FieldValue {
        let level = Level::INFO;
        let ctx = HookContext::new(logger, &level, CallSite::capture());
        hook(&ctx)
    }

    #[test]
    fn test_scope_hook_reads_logger() {
        let scoped = Logger::builder().scope("svc").build();
        assert_eq!(run(&scope(), &scoped), FieldValue::from("svc"));

        let unscoped = Logger::new();
        assert_eq!(run(&scope(), &unscoped), FieldValue::from("general"));
    }

    #[test]
    fn test_timestamp_hook() {
        let value = run(&timestamp(), &Logger::new());
        assert!(value.as_timestamp().is_some());
    }

    #[test]
    fn test_call_site_hook() {
        let value = run(&call_site(), &Logger::new());
        let text = value.as_str().expect("string value");
        assert!(text.contains("hooks.rs:"));
    }

    #[test]
    fn test_constant_hook() {
        let hook = constant(42);
        assert_eq!(run(&hook, &Logger::new()), FieldValue::Int(42));
        assert_eq!(run(&hook, &Logger::new()), FieldValue::Int(42));
    }
}
