//! Console appender implementation

use crate::core::{Appender, LogLevel, Result};
use std::io::Write;

/// Writes each line to stdout, falling back to stderr when stdout is unusable
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAppender;

impl ConsoleAppender {
    pub fn new() -> Self {
        Self
    }
}

impl Appender for ConsoleAppender {
    fn write(&mut self, _level: LogLevel, output: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        if writeln!(handle, "{}", output).is_err() {
            drop(handle);
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            writeln!(handle, "{}", output)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
