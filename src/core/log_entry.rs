//! Buffered log entry

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// A rendered line held back by a silent logger until the buffer is flushed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Strictly increasing across every namespace of a context
    pub sequence: u64,
    /// Monotonic milliseconds at the time of the call
    pub timestamp: f64,
    pub namespace: String,
    pub level: LogLevel,
    pub output: String,
}

impl LogEntry {
    pub fn new(
        sequence: u64,
        timestamp: f64,
        namespace: impl Into<String>,
        level: LogLevel,
        output: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            timestamp,
            namespace: namespace.into(),
            level,
            output: output.into(),
        }
    }
}
