//! Sink over any `std::io::Write`

use crate::core::{Result, Sink};
use std::io::Write;

pub struct WriterSink<W: Write + Send> {
    writer: W,
    name: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            name: "writer".to_string(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&mut self, rendered: &str) -> Result<()> {
        self.writer.write_all(rendered.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_lines() -> Result<()> {
        let mut sink = WriterSink::new(Vec::new()).with_name("buffer");
        sink.write("a")?;
        sink.write("b")?;
        sink.flush()?;

        assert_eq!(sink.name(), "buffer");
        assert_eq!(sink.into_inner(), b"a\nb\n");
        Ok(())
    }
}
