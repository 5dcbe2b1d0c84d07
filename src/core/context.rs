//! Shared logger state
//!
//! A [`LoggerContext`] owns everything loggers share: the namespace registry,
//! the enable/disable pattern sets, the silent-mode buffer with its sequence
//! counter, the clock and the sink that flushed output goes to.
//!
//! Most programs use [`LoggerContext::global()`], created empty on first use
//! and kept for the life of the process. Tests build their own context so
//! state never leaks between cases.

use super::appender::Appender;
use super::buffer::{BufferCapacity, FlushOptions, FlushOrder, LogBuffer};
use super::clock::{Clock, MonotonicClock};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::metrics::LoggerMetrics;
use super::pattern::{matches, WILDCARD};
use crate::appenders::ConsoleAppender;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Default)]
struct PatternSets {
    disabled: BTreeSet<String>,
    enabled: BTreeSet<String>,
}

pub struct LoggerContext {
    registry: RwLock<HashMap<String, Arc<Logger>>>,
    patterns: RwLock<PatternSets>,
    buffer: Mutex<LogBuffer>,
    sequence: AtomicU64,
    sink: Mutex<Box<dyn Appender>>,
    clock: Arc<dyn Clock>,
    metrics: LoggerMetrics,
}

impl LoggerContext {
    /// Empty context writing flushed output to the console
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(HashMap::new()),
            patterns: RwLock::new(PatternSets::default()),
            buffer: Mutex::new(LogBuffer::default()),
            sequence: AtomicU64::new(0),
            sink: Mutex::new(Box::new(ConsoleAppender::new())),
            clock: Arc::new(MonotonicClock),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Process-wide context
    pub fn global() -> Arc<LoggerContext> {
        static GLOBAL: OnceLock<Arc<LoggerContext>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| LoggerContext::new().shared()))
    }

    #[must_use]
    pub fn with_clock<C: Clock + 'static>(mut self, clock: Arc<C>) -> Self {
        self.clock = clock;
        self
    }

    /// Sink receiving flushed buffer output
    #[must_use]
    pub fn with_sink<A: Appender + 'static>(mut self, sink: A) -> Self {
        self.sink = Mutex::new(Box::new(sink));
        self
    }

    #[must_use]
    pub fn with_buffer(self, capacity: BufferCapacity, order: FlushOrder) -> Self {
        *self.buffer.lock() = LogBuffer::new(capacity, order);
        self
    }

    /// Wrap this context in an Arc for sharing across loggers
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Registered logger for `namespace`, if any
    pub fn logger(&self, namespace: &str) -> Option<Arc<Logger>> {
        self.registry.read().get(namespace).cloned()
    }

    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Return the logger registered under `namespace`, creating it with `create` if absent.
    ///
    /// The lookup and insert happen under one lock, so concurrent
    /// constructions of the same namespace agree on a single instance. The
    /// flag is `true` when an existing logger was returned.
    pub(crate) fn register<F>(&self, namespace: &str, create: F) -> (Arc<Logger>, bool)
    where
        F: FnOnce() -> Logger,
    {
        let mut registry = self.registry.write();
        if let Some(existing) = registry.get(namespace) {
            return (Arc::clone(existing), true);
        }
        let logger = Arc::new(create());
        registry.insert(namespace.to_string(), Arc::clone(&logger));
        (logger, false)
    }

    pub(crate) fn warn_duplicate(&self, namespace: &str) {
        self.metrics.record_duplicate_namespace();
        eprintln!(
            "[LOGGER WARNING] A logger named '{}' already exists; returning the existing instance.",
            namespace
        );
    }

    /// Disable namespaces matching `pattern`; `"*"` disables everything
    pub fn disable(&self, pattern: &str) {
        let mut patterns = self.patterns.write();
        if pattern == WILDCARD {
            patterns.enabled.clear();
            patterns.disabled.clear();
        } else {
            patterns.enabled.remove(pattern);
        }
        patterns.disabled.insert(pattern.to_string());
    }

    /// Enable namespaces matching `pattern`; `"*"` lifts every disable rule
    pub fn enable(&self, pattern: &str) {
        let mut patterns = self.patterns.write();
        if pattern == WILDCARD {
            patterns.disabled.clear();
            patterns.enabled.clear();
        } else {
            patterns.disabled.remove(pattern);
        }
        patterns.enabled.insert(pattern.to_string());
    }

    /// Pattern verdict for a namespace; `None` when no pattern applies
    pub fn namespace_rule(&self, namespace: &str) -> Option<bool> {
        let patterns = self.patterns.read();
        if patterns.disabled.contains(WILDCARD) {
            return Some(false);
        }
        if patterns.disabled.iter().any(|p| matches(p, namespace)) {
            return Some(false);
        }
        if patterns.enabled.iter().any(|p| matches(p, namespace)) {
            return Some(true);
        }
        None
    }

    pub(crate) fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Buffer an entry, flushing to the sink first if the buffer is full
    pub fn append(&self, entry: LogEntry) {
        let mut buffer = self.buffer.lock();
        if let Some(flushed) = buffer.push(entry) {
            self.metrics.record_auto_flush();
            self.write_to_sink(&flushed);
        }
        self.metrics.record_buffered();
    }

    /// Drain the buffer.
    ///
    /// Returns `Some(output)` when `return_output` is set; otherwise the
    /// output is written to the sink and `None` is returned. An empty buffer
    /// writes nothing.
    pub fn flush(&self, options: FlushOptions) -> Option<String> {
        let output = self.buffer.lock().drain(options.order_by, options.colored);
        if options.return_output {
            return Some(output);
        }
        if !output.is_empty() {
            self.write_to_sink(&output);
        }
        None
    }

    /// Buffered output of one namespace, leaving the buffer untouched
    pub fn peek(&self, namespace: &str) -> String {
        self.buffer.lock().peek(namespace)
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn buffer_capacity(&self) -> BufferCapacity {
        self.buffer.lock().capacity()
    }

    /// Change the buffer capacity; a buffer left above the new limit is flushed to the sink
    pub fn set_buffer_capacity(&self, capacity: BufferCapacity) {
        let mut buffer = self.buffer.lock();
        if let Some(flushed) = buffer.set_capacity(capacity) {
            self.metrics.record_auto_flush();
            self.write_to_sink(&flushed);
        }
    }

    pub fn set_flush_order(&self, order: FlushOrder) {
        self.buffer.lock().set_default_order(order);
    }

    fn write_to_sink(&self, output: &str) {
        let mut sink = self.sink.lock();
        if let Err(e) = sink.write(LogLevel::Log, output).and_then(|_| sink.flush()) {
            self.metrics.record_sink_error();
            eprintln!("[LOGGER ERROR] Sink '{}' failed during flush: {}", sink.name(), e);
        }
    }

    pub(crate) fn report_sink_error(&self, sink: &str, error: &dyn std::fmt::Display) {
        self.metrics.record_sink_error();
        eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink, error);
    }
}

impl Default for LoggerContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Disable namespaces matching `pattern` in the global context
pub fn disable(pattern: &str) {
    LoggerContext::global().disable(pattern);
}

/// Enable namespaces matching `pattern` in the global context
pub fn enable(pattern: &str) {
    LoggerContext::global().enable(pattern);
}

/// Flush the global buffer
pub fn flush(options: FlushOptions) -> Option<String> {
    LoggerContext::global().flush(options)
}

/// Buffered output of `namespace` in the global context
pub fn peek(namespace: &str) -> String {
    LoggerContext::global().peek(namespace)
}
