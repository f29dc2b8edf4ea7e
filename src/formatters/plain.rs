//! Plain formatter: the message, verbatim

use crate::core::{Entry, Formatter, Rendering};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn format(&self, entry: &Entry) -> Rendering {
        Rendering::Text(entry.message().to_string())
    }

    fn name(&self) -> &str {
        "plain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fields, Level};

    #[test]
    fn test_message_verbatim() {
        let entry = Entry::new(Level::INFO, "line one\nline two")
            .with_fields(Fields::new().with_field("ignored", 1));
        assert_eq!(
            PlainFormatter.format(&entry),
            Rendering::Text("line one\nline two".to_string())
        );
    }

    #[test]
    fn test_non_string_message() {
        let entry = Entry::new(Level::INFO, 42);
        assert_eq!(PlainFormatter.format(&entry).as_text(), Some("42"));
    }
}
