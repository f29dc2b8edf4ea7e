//! Sink trait for log output destinations

use super::error::Result;

/// Destination for rendered entries
///
/// `write` receives one complete rendering without a trailing newline.
pub trait Sink: Send {
    fn write(&mut self, rendered: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
