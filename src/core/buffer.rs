//! Buffer for silent loggers
//!
//! Silent loggers do not write immediately; their rendered lines are kept in
//! one buffer shared by every namespace of a context. The buffer is bounded:
//! an append that would exceed the capacity first flushes everything held so
//! far, so nothing is ever dropped.

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::style::strip_ansi;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Default number of entries held before an automatic flush
pub const DEFAULT_MAX_BUFFER: usize = 10_000;

/// Maximum number of buffered entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferCapacity {
    Limited(usize),
    Unlimited,
}

impl BufferCapacity {
    /// A bounded capacity; zero is rejected
    pub fn limited(max: usize) -> Result<Self> {
        if max == 0 {
            return Err(LoggerError::config(
                "maxBuffer",
                "capacity must be a positive integer or unlimited",
            ));
        }
        Ok(BufferCapacity::Limited(max))
    }

    fn is_full(&self, len: usize) -> bool {
        match self {
            BufferCapacity::Limited(max) => len >= *max,
            BufferCapacity::Unlimited => false,
        }
    }

    fn is_exceeded(&self, len: usize) -> bool {
        match self {
            BufferCapacity::Limited(max) => len > *max,
            BufferCapacity::Unlimited => false,
        }
    }

    /// A buffer holds at least one entry
    fn at_least_one(self) -> Self {
        match self {
            BufferCapacity::Limited(0) => BufferCapacity::Limited(1),
            other => other,
        }
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        BufferCapacity::Limited(DEFAULT_MAX_BUFFER)
    }
}

impl FromStr for BufferCapacity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "infinity" | "inf" | "unlimited" => Ok(BufferCapacity::Unlimited),
            _ => {
                let max = trimmed.parse::<usize>().map_err(|_| {
                    LoggerError::config(
                        "maxBuffer",
                        format!("expected a positive integer or Infinity, got '{}'", s),
                    )
                })?;
                BufferCapacity::limited(max)
            }
        }
    }
}

impl fmt::Display for BufferCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferCapacity::Limited(max) => write!(f, "{}", max),
            BufferCapacity::Unlimited => write!(f, "Infinity"),
        }
    }
}

/// Ordering applied when flushing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushOrder {
    /// By timestamp, then sequence, then namespace
    #[default]
    Time,
    /// By namespace, then timestamp, then sequence
    Name,
}

impl FromStr for FlushOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" => Ok(FlushOrder::Time),
            "name" => Ok(FlushOrder::Name),
            _ => Err(format!("Invalid flush order: '{}'", s)),
        }
    }
}

impl FlushOrder {
    fn compare(self, a: &LogEntry, b: &LogEntry) -> Ordering {
        match self {
            FlushOrder::Time => a
                .timestamp
                .total_cmp(&b.timestamp)
                .then(a.sequence.cmp(&b.sequence))
                .then_with(|| a.namespace.cmp(&b.namespace)),
            FlushOrder::Name => a
                .namespace
                .cmp(&b.namespace)
                .then(a.timestamp.total_cmp(&b.timestamp))
                .then(a.sequence.cmp(&b.sequence)),
        }
    }
}

/// Options for a manual flush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushOptions {
    /// `None` uses the buffer's configured ordering
    pub order_by: Option<FlushOrder>,
    /// Keep styling escape codes
    pub colored: bool,
    /// Return the output instead of writing it
    pub return_output: bool,
}

impl Default for FlushOptions {
    fn default() -> Self {
        Self {
            order_by: None,
            colored: true,
            return_output: false,
        }
    }
}

impl FlushOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn order_by(mut self, order: FlushOrder) -> Self {
        self.order_by = Some(order);
        self
    }

    #[must_use]
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    #[must_use]
    pub fn return_output(mut self, return_output: bool) -> Self {
        self.return_output = return_output;
        self
    }
}

/// Bounded store of pending entries.
///
/// A `Limited(0)` capacity is raised to one entry.
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: Vec<LogEntry>,
    capacity: BufferCapacity,
    default_order: FlushOrder,
}

impl LogBuffer {
    pub fn new(capacity: BufferCapacity, default_order: FlushOrder) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.at_least_one(),
            default_order,
        }
    }

    pub fn capacity(&self) -> BufferCapacity {
        self.capacity
    }

    /// Change the capacity.
    ///
    /// Shrinking below the current length drains everything (default
    /// ordering, styling kept) and returns it for the caller to write.
    pub fn set_capacity(&mut self, capacity: BufferCapacity) -> Option<String> {
        self.capacity = capacity.at_least_one();
        if self.capacity.is_exceeded(self.entries.len()) {
            Some(self.drain(None, true))
        } else {
            None
        }
    }

    pub fn default_order(&self) -> FlushOrder {
        self.default_order
    }

    pub fn set_default_order(&mut self, order: FlushOrder) {
        self.default_order = order;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry.
    ///
    /// When the buffer is already at capacity its contents are drained first
    /// (default ordering, styling kept) and returned for the caller to write.
    pub fn push(&mut self, entry: LogEntry) -> Option<String> {
        let flushed = if self.capacity.is_full(self.entries.len()) {
            Some(self.drain(None, true))
        } else {
            None
        };
        self.entries.push(entry);
        flushed
    }

    /// Remove every entry and return them joined by newlines in `order`
    pub fn drain(&mut self, order: Option<FlushOrder>, colored: bool) -> String {
        if self.entries.is_empty() {
            return String::new();
        }

        let order = order.unwrap_or(self.default_order);
        let mut entries = std::mem::take(&mut self.entries);
        entries.sort_by(|a, b| order.compare(a, b));

        let joined = entries
            .iter()
            .map(|entry| entry.output.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if colored {
            joined
        } else {
            strip_ansi(&joined)
        }
    }

    /// Joined output of one namespace, in append order, without removing anything
    pub fn peek(&self, namespace: &str) -> String {
        self.entries
            .iter()
            .filter(|entry| entry.namespace == namespace)
            .map(|entry| entry.output.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;

    fn entry(sequence: u64, timestamp: f64, namespace: &str) -> LogEntry {
        LogEntry::new(
            sequence,
            timestamp,
            namespace,
            LogLevel::Log,
            format!("{}#{}", namespace, sequence),
        )
    }

    #[test]
    fn test_capacity_parsing() {
        assert_eq!("Infinity".parse::<BufferCapacity>().unwrap(), BufferCapacity::Unlimited);
        assert_eq!("25".parse::<BufferCapacity>().unwrap(), BufferCapacity::Limited(25));
        assert!("0".parse::<BufferCapacity>().is_err());
        assert!("lots".parse::<BufferCapacity>().is_err());
        assert!(BufferCapacity::limited(0).is_err());
        assert_eq!(BufferCapacity::default(), BufferCapacity::Limited(DEFAULT_MAX_BUFFER));
    }

    #[test]
    fn test_flush_order_parsing() {
        assert_eq!("NAME".parse::<FlushOrder>(), Ok(FlushOrder::Name));
        assert!("size".parse::<FlushOrder>().is_err());
        assert_eq!(serde_json::to_string(&FlushOrder::Time).unwrap(), "\"time\"");
    }

    #[test]
    fn test_time_order_breaks_ties_by_sequence_then_namespace() {
        let mut buffer = LogBuffer::default();
        buffer.push(entry(3, 5.0, "b"));
        buffer.push(entry(2, 5.0, "a"));
        buffer.push(entry(1, 9.0, "a"));
        buffer.push(entry(4, 1.0, "c"));

        let out = buffer.drain(Some(FlushOrder::Time), true);
        assert_eq!(out, "c#4\na#2\nb#3\na#1");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_name_order() {
        let mut buffer = LogBuffer::default();
        buffer.push(entry(1, 3.0, "b"));
        buffer.push(entry(2, 2.0, "a"));
        buffer.push(entry(3, 1.0, "b"));
        buffer.push(entry(4, 2.0, "a"));

        let out = buffer.drain(Some(FlushOrder::Name), true);
        assert_eq!(out, "a#2\na#4\nb#3\nb#1");
    }

    #[test]
    fn test_default_order_used_when_unspecified() {
        let mut buffer = LogBuffer::new(BufferCapacity::Unlimited, FlushOrder::Name);
        buffer.push(entry(1, 1.0, "z"));
        buffer.push(entry(2, 2.0, "a"));
        assert_eq!(buffer.drain(None, true), "a#2\nz#1");
    }

    #[test]
    fn test_auto_flush_at_capacity() {
        let mut buffer = LogBuffer::new(BufferCapacity::Limited(2), FlushOrder::Time);
        assert!(buffer.push(entry(1, 1.0, "a")).is_none());
        assert!(buffer.push(entry(2, 2.0, "a")).is_none());
        assert_eq!(buffer.len(), 2);

        let flushed = buffer.push(entry(3, 3.0, "a"));
        assert_eq!(flushed.as_deref(), Some("a#1\na#2"));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_shrinking_capacity_drains() {
        let mut buffer = LogBuffer::new(BufferCapacity::Unlimited, FlushOrder::Name);
        buffer.push(entry(1, 1.0, "b"));
        buffer.push(entry(2, 2.0, "a"));
        buffer.push(entry(3, 3.0, "b"));

        assert!(buffer.set_capacity(BufferCapacity::Limited(3)).is_none());
        assert_eq!(buffer.len(), 3);

        let flushed = buffer.set_capacity(BufferCapacity::Limited(2));
        assert_eq!(flushed.as_deref(), Some("a#2\nb#1\nb#3"));
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), BufferCapacity::Limited(2));
    }

    #[test]
    fn test_zero_capacity_holds_one_entry() {
        let mut buffer = LogBuffer::new(BufferCapacity::Limited(0), FlushOrder::Time);
        assert_eq!(buffer.capacity(), BufferCapacity::Limited(1));

        assert!(buffer.push(entry(1, 1.0, "a")).is_none());
        assert_eq!(buffer.push(entry(2, 2.0, "a")).as_deref(), Some("a#1"));

        assert!(buffer.set_capacity(BufferCapacity::Limited(0)).is_none());
        assert_eq!(buffer.capacity(), BufferCapacity::Limited(1));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_unlimited_never_auto_flushes() {
        let mut buffer = LogBuffer::new(BufferCapacity::Unlimited, FlushOrder::Time);
        for i in 0..50 {
            assert!(buffer.push(entry(i, i as f64, "n")).is_none());
        }
        assert_eq!(buffer.len(), 50);
    }

    #[test]
    fn test_drain_empty_is_noop() {
        let mut buffer = LogBuffer::default();
        assert_eq!(buffer.drain(None, false), "");
    }

    #[test]
    fn test_uncolored_drain_strips_escape_codes() {
        let mut buffer = LogBuffer::default();
        buffer.push(LogEntry::new(1, 1.0, "a", LogLevel::Log, "\u{1b}[35ma\u{1b}[0m hi"));
        assert_eq!(buffer.drain(None, false), "a hi");
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let mut buffer = LogBuffer::default();
        buffer.push(entry(1, 1.0, "a"));
        buffer.push(entry(2, 1.0, "b"));
        buffer.push(entry(3, 1.0, "a"));

        assert_eq!(buffer.peek("a"), "a#1\na#3");
        assert_eq!(buffer.peek("missing"), "");
        assert_eq!(buffer.len(), 3);
    }
}
