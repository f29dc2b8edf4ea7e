//! Human-readable text formatter
//!
//! `[timestamp] [LEVEL] message key=value ...`; the timestamp part only
//! appears when the entry carries a `timestamp` field.

use crate::core::{Entry, FieldValue, Formatter, Rendering, TimestampFormat};

#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colour the level name (requires the `console` feature)
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the timestamp format
    ///
    /// # Examples
    ///
    /// ```
    /// use ploggy::formatters::TextFormatter;
    /// use ploggy::TimestampFormat;
    ///
    /// let formatter = TextFormatter::new()
    ///     .with_timestamp_format(TimestampFormat::Iso8601Micros);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    #[cfg(feature = "console")]
    fn level_label(&self, entry: &Entry) -> String {
        use colored::Colorize;

        let label = format!("{:5}", entry.level().name());
        match entry.level().color_code() {
            Some(color) if self.use_colors => label.color(color).to_string(),
            _ => label,
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_label(&self, entry: &Entry) -> String {
        format!("{:5}", entry.level().name())
    }
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &Entry) -> Rendering {
        let mut output = String::new();

        if let Some(FieldValue::Timestamp(ts)) = entry.field("timestamp") {
            output.push_str(&format!("[{}] ", self.timestamp_format.format(ts)));
        }
        output.push_str(&format!("[{}] {}", self.level_label(entry), entry.message()));

        let extra = entry
            .fields()
            .iter()
            .filter(|(k, _)| k.as_str() != "timestamp")
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>();
        if !extra.is_empty() {
            output.push(' ');
            output.push_str(&extra.join(" "));
        }

        Rendering::Text(output)
    }

    fn name(&self) -> &str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fields, Level};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_text_without_timestamp() {
        let entry = Entry::new(Level::WARN, "disk low")
            .with_fields(Fields::new().with_field("pct", 91).with_field("host", "a1"));
        let rendering = TextFormatter::new().format(&entry);
        assert_eq!(rendering.as_text(), Some("[WARN ] disk low host=a1 pct=91"));
    }

    #[test]
    fn test_text_with_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().unwrap();
        let entry = Entry::new(Level::ERROR, "failed")
            .with_fields(Fields::new().with_field("timestamp", ts));
        let rendering = TextFormatter::new()
            .with_custom_timestamp("%Y/%m/%d %H:%M")
            .format(&entry);
        assert_eq!(rendering.as_text(), Some("[2025/01/08 10:30] [ERROR] failed"));
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_colors_keep_message() {
        colored::control::set_override(true);
        let entry = Entry::new(Level::INFO, "colored");
        let rendering = TextFormatter::new().with_colors(true).format(&entry);
        let text = rendering.as_text().unwrap();
        assert!(text.contains("colored"));
        assert!(text.contains("\u{1b}["));
    }
}
