//! Declarative logger configuration
//!
//! [`LoggerConfig`] describes a logger and its handlers as plain data so it
//! can be deserialized with serde from whatever format the application
//! already loads. Level names are resolved against the configured level set
//! when the logger is built.
//!
//! ```
//! use ploggy::core::LoggerConfig;
//! use ploggy::Logger;
//!
//! let config: LoggerConfig = serde_json::from_str(r#"{
//!     "json": true,
//!     "scope": "billing",
//!     "exit_on": "fatal",
//!     "handlers": [{ "format": "json", "min_level": "warn", "sink": { "type": "stdout" } }]
//! }"#).unwrap();
//!
//! let logger = Logger::from_config(&config).unwrap();
//! assert_eq!(logger.scope(), Some("billing"));
//! assert_eq!(logger.handlers().len(), 1);
//! ```

use super::{
    error::{LoggerError, Result},
    handler::Handler,
    level::{Level, LevelRegistry},
    logger::{Logger, LoggerBuilder},
    timestamp::TimestampFormat,
};
use crate::formatters::{JsonFormatter, PlainFormatter, TextFormatter};
use crate::sinks::{ConsoleSink, FileSink};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Plain,
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SinkConfig {
    #[default]
    Stderr,
    Stdout,
    File { path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub name: Option<String>,
    pub format: FormatKind,
    /// Minimum level name; defaults to WARN for JSON handlers and INFO otherwise
    pub min_level: Option<String>,
    pub sink: SinkConfig,
    pub pretty: bool,
    pub timestamp_format: Option<TimestampFormat>,
    pub colors: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Level names in ascending severity; the default set when absent
    pub levels: Option<Vec<String>>,
    /// Install the timestamp, line and scope hooks and the JSON entry builder
    pub json: bool,
    pub exit_on: Option<String>,
    pub scope: Option<String>,
    pub handlers: Vec<HandlerConfig>,
}

impl LoggerConfig {
    fn registry(&self) -> LevelRegistry {
        match &self.levels {
            Some(names) => LevelRegistry::new(names.iter().cloned()),
            None => LevelRegistry::default(),
        }
    }
}

fn resolve_level(levels: &LevelRegistry, name: &str, component: &str) -> Result<Level> {
    levels.get(name).cloned().ok_or_else(|| {
        LoggerError::config(component, format!("unknown level name '{}'", name))
    })
}

impl HandlerConfig {
    /// Build the handler, resolving `min_level` against `levels`
    pub fn build(&self, levels: &LevelRegistry) -> Result<Handler> {
        let min_level = match &self.min_level {
            Some(name) => resolve_level(levels, name, "handler")?,
            None if self.format == FormatKind::Json => Level::WARN,
            None => Level::INFO,
        };
        let timestamp_format = self.timestamp_format.clone().unwrap_or_default();

        let mut builder = match self.format {
            FormatKind::Plain => Handler::builder(PlainFormatter),
            FormatKind::Text => Handler::builder(
                TextFormatter::new()
                    .with_colors(self.colors)
                    .with_timestamp_format(timestamp_format),
            ),
            FormatKind::Json => Handler::builder(match &self.timestamp_format {
                Some(format) => JsonFormatter::new().with_timestamp_format(format.clone()),
                None => JsonFormatter::new(),
            }),
        };
        builder = builder.min_level(min_level).pretty(self.pretty);
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }

        let builder = match &self.sink {
            SinkConfig::Stderr => builder.sink(ConsoleSink::stderr()),
            SinkConfig::Stdout => builder.sink(ConsoleSink::stdout()),
            SinkConfig::File { path } => builder.sink(FileSink::new(path.clone())?),
        };
        Ok(builder.build())
    }
}

impl Logger {
    /// Build a logger from declarative configuration
    ///
    /// Fails with `InvalidConfiguration` when a level name is not in the
    /// configured level set, or with the sink's error when a file cannot be
    /// opened.
    pub fn from_config(config: &LoggerConfig) -> Result<Logger> {
        let levels = config.registry();
        if levels.is_empty() {
            return Err(LoggerError::config("logger", "level set is empty"));
        }

        let mut builder = match &config.scope {
            Some(scope) if config.json => Logger::json_builder(scope.clone()),
            None if config.json => Logger::json_builder(super::logger::DEFAULT_SCOPE),
            Some(scope) => LoggerBuilder::new().scope(scope.clone()),
            None => LoggerBuilder::new(),
        };

        if let Some(name) = &config.exit_on {
            builder = builder.exit_on(resolve_level(&levels, name, "exit_on")?);
        }
        for handler in &config.handlers {
            builder = builder.shared_handler(Arc::new(handler.build(&levels)?));
        }

        Ok(builder.levels(levels).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default_logger() {
        let config: LoggerConfig = serde_json::from_str("{}").unwrap();
        let logger = Logger::from_config(&config).unwrap();
        assert!(logger.handlers().is_empty());
        assert!(logger.hook_names().is_empty());
        assert_eq!(logger.levels().len(), 5);
    }

    #[test]
    fn test_json_config_installs_hooks() {
        let config: LoggerConfig =
            serde_json::from_str(r#"{"json": true, "handlers": [{"format": "json"}]}"#).unwrap();
        let logger = Logger::from_config(&config).unwrap();

        assert_eq!(logger.hook_names(), vec!["line", "scope", "timestamp"]);
        assert_eq!(logger.scope(), Some("general"));
        assert_eq!(logger.handlers()[0].min_level(), &Level::WARN);
    }

    #[test]
    fn test_custom_levels_resolve_case_insensitively() {
        let config: LoggerConfig = serde_json::from_str(
            r#"{
                "levels": ["TRACE", "DEBUG", "NOTICE"],
                "exit_on": "Notice",
                "handlers": [{"format": "text", "min_level": "debug"}]
            }"#,
        )
        .unwrap();
        let logger = Logger::from_config(&config).unwrap();

        assert_eq!(logger.exit_on().map(Level::name), Some("NOTICE"));
        assert_eq!(logger.handlers()[0].min_level().ordinal(), 1);
    }

    #[test]
    fn test_unknown_level_is_invalid_configuration() {
        let config = LoggerConfig {
            handlers: vec![HandlerConfig {
                min_level: Some("notice".to_string()),
                ..HandlerConfig::default()
            }],
            ..LoggerConfig::default()
        };
        let err = Logger::from_config(&config).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_empty_level_set_rejected() {
        let config = LoggerConfig {
            levels: Some(Vec::new()),
            ..LoggerConfig::default()
        };
        assert!(Logger::from_config(&config).is_err());
    }

    #[test]
    fn test_file_sink_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let config = LoggerConfig {
            handlers: vec![HandlerConfig {
                sink: SinkConfig::File { path: path.clone() },
                ..HandlerConfig::default()
            }],
            ..LoggerConfig::default()
        };

        let logger = Logger::from_config(&config).unwrap();
        logger.info("written to file").unwrap();
        drop(logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "written to file\n");
    }

    #[test]
    fn test_sink_config_serde_shape() {
        let sink: SinkConfig =
            serde_json::from_str(r#"{"type": "file", "path": "/tmp/x.log"}"#).unwrap();
        assert_eq!(
            sink,
            SinkConfig::File {
                path: PathBuf::from("/tmp/x.log")
            }
        );
    }
}
