//! Appender trait for log output destinations

use super::{error::Result, log_level::LogLevel};

pub trait Appender: Send + Sync {
    /// Write one rendered line, or a block of flushed lines joined by newlines
    fn write(&mut self, level: LogLevel, output: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
