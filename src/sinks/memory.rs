//! In-memory sink
//!
//! Keeps every rendering in a shared buffer. Clones share the buffer, so a
//! test can hand one clone to a handler and read through the other.

use crate::core::{Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every rendering written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// All renderings joined with newlines
    pub fn contents(&self) -> String {
        self.lines.lock().join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&mut self, rendered: &str) -> Result<()> {
        self.lines.lock().push(rendered.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() -> Result<()> {
        let reader = MemorySink::new();
        let mut writer = reader.clone();

        writer.write("one")?;
        writer.write("two")?;

        assert_eq!(reader.lines(), vec!["one", "two"]);
        assert_eq!(reader.contents(), "one\ntwo");

        reader.clear();
        assert!(writer.is_empty());
        Ok(())
    }
}
