//! JSON rendering
//!
//! The JSON pairing is a logger configured with three hooks (`timestamp`,
//! `line`, `scope`) and [`JsonEntryBuilder`], plus a handler using
//! [`JsonFormatter`]. Each entry renders as one object with short keys:
//!
//! ```text
//! {"lvl":"warn","line":"src/main.rs:10","msg":"disk low","p":{"pct":"91"},"sc":"svc","ts":"..."}
//! ```
//!
//! Every parameter key and value in `p` is stringified so the output shape
//! does not depend on the types callers pass.

use crate::core::{
    hooks, CallSite, Entry, EntryBuilder, FieldValue, Fields, Formatter, Handler, Level, Logger,
    LoggerBuilder, Rendering, TimestampFormat, DEFAULT_SCOPE,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field names with a dedicated key in the JSON rendering
pub const RESERVED_FIELDS: [&str; 4] = ["timestamp", "line", "scope", "params"];

/// Keeps the reserved fields and folds every other field into `params`
///
/// Values already inside an explicit `params` map take precedence over
/// loose fields of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEntryBuilder;

impl EntryBuilder for JsonEntryBuilder {
    fn build(
        &self,
        level: Level,
        message: FieldValue,
        mut hook_fields: Fields,
        fields: Fields,
        call_site: CallSite,
    ) -> Entry {
        hook_fields.merge(fields);

        let mut params: BTreeMap<String, FieldValue> = BTreeMap::new();
        let mut reserved = Fields::new();
        let mut explicit_params = None;
        for (key, value) in hook_fields {
            match key.as_str() {
                "params" => explicit_params = Some(value),
                k if RESERVED_FIELDS.contains(&k) => reserved.add_field(key, value),
                _ => {
                    params.insert(key, value);
                }
            }
        }
        match explicit_params {
            Some(FieldValue::Map(map)) => params.extend(map),
            Some(FieldValue::Null) | None => {}
            Some(other) => {
                params.insert("params".to_string(), other);
            }
        }
        reserved.add_field("params", params);

        Entry::new(level, message)
            .with_fields(reserved)
            .with_call_site(call_site)
    }
}

#[derive(Debug, Clone)]
pub struct JsonFormatter {
    timestamp_format: TimestampFormat,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            timestamp_format: TimestampFormat::Iso8601Micros,
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Stringified parameters: the `params` map plus any non-reserved field
    fn params(entry: &Entry) -> Map<String, Value> {
        let mut params = Map::new();
        for (key, value) in entry.fields() {
            if !RESERVED_FIELDS.contains(&key.as_str()) {
                params.insert(key.clone(), Value::String(value.to_string()));
            }
        }
        if let Some(FieldValue::Map(map)) = entry.field("params") {
            for (key, value) in map {
                params.insert(key.clone(), Value::String(value.to_string()));
            }
        }
        params
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &Entry) -> Rendering {
        let line = match entry.field("line") {
            Some(value) if !value.is_null() => value.to_string(),
            _ => entry.call_site().to_string(),
        };
        let scope = match entry.field("scope") {
            Some(value) if !value.is_null() => value.to_string(),
            _ => DEFAULT_SCOPE.to_string(),
        };
        let ts = entry
            .field("timestamp")
            .map(|value| self.timestamp_format.format_value(value))
            .unwrap_or_default();

        let mut object = Map::new();
        object.insert("lvl".to_string(), Value::String(entry.level().lowercase_name()));
        object.insert("line".to_string(), Value::String(line));
        object.insert("msg".to_string(), entry.message().to_json_value());
        object.insert("p".to_string(), Value::Object(Self::params(entry)));
        object.insert("sc".to_string(), Value::String(scope));
        object.insert("ts".to_string(), Value::String(ts));

        Rendering::Structured(Value::Object(object))
    }

    fn name(&self) -> &str {
        "json"
    }
}

impl Logger {
    /// Builder preconfigured with the JSON hooks, entry builder and `scope`
    pub fn json_builder(scope: impl Into<String>) -> LoggerBuilder {
        Logger::builder()
            .scope(scope)
            .hook("timestamp", hooks::timestamp())
            .hook("line", hooks::call_site())
            .hook("scope", hooks::scope())
            .entry_builder(JsonEntryBuilder)
    }

    /// JSON logger for `scope`, with no handlers registered
    ///
    /// # Example
    ///
    /// ```
    /// use ploggy::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let sink = MemorySink::new();
    /// let logger = Logger::json("svc");
    /// logger.register(Arc::new(Handler::json_builder().sink(sink.clone()).build()));
    ///
    /// logger.warn_with("disk low", fields! { "pct" => 91 }).unwrap();
    /// logger.info("fyi").unwrap();
    ///
    /// assert_eq!(sink.len(), 1);
    /// assert!(sink.contents().contains(r#""p":{"pct":"91"}"#));
    /// ```
    pub fn json(scope: impl Into<String>) -> Logger {
        Self::json_builder(scope).build()
    }
}

impl Handler {
    /// JSON handler builder: minimum level WARN, stderr sink
    pub fn json_builder() -> crate::core::HandlerBuilder {
        Handler::builder(JsonFormatter::new()).min_level(Level::WARN)
    }

    pub fn json() -> Handler {
        Self::json_builder().build()
    }
}
