//! Logger metrics for observability
//!
//! Counters describing what happened to log calls in a context: written
//! immediately, buffered, treated as timer marks, suppressed, and how often the
//! buffer flushed itself or a sink failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every logger of a context
///
/// # Example
///
/// ```
/// use rust_console_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_suppressed();
///
/// assert_eq!(metrics.emitted(), 1);
/// assert_eq!(metrics.suppressed(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines written straight to a sink
    emitted: AtomicU64,

    /// Lines appended to the silent-mode buffer
    buffered: AtomicU64,

    /// Calls without a message that only reset the duration timer
    marks: AtomicU64,

    /// Calls dropped because the namespace or level was disabled
    suppressed: AtomicU64,

    /// Flushes triggered by the buffer reaching capacity
    auto_flushes: AtomicU64,

    /// Sink writes that returned an error
    sink_errors: AtomicU64,

    /// Constructions that reused an existing namespace
    duplicate_namespaces: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            buffered: AtomicU64::new(0),
            marks: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            auto_flushes: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            duplicate_namespaces: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn buffered(&self) -> u64 {
        self.buffered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn marks(&self) -> u64 {
        self.marks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn auto_flushes(&self) -> u64 {
        self.auto_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn duplicate_namespaces(&self) -> u64 {
        self.duplicate_namespaces.load(Ordering::Relaxed)
    }

    /// Record a line written to a sink; returns the previous count
    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_buffered(&self) -> u64 {
        self.buffered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_mark(&self) -> u64 {
        self.marks.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_auto_flush(&self) -> u64 {
        self.auto_flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_duplicate_namespace(&self) -> u64 {
        self.duplicate_namespaces.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.emitted.store(0, Ordering::Relaxed);
        self.buffered.store(0, Ordering::Relaxed);
        self.marks.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.auto_flushes.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.duplicate_namespaces.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            emitted: AtomicU64::new(self.emitted()),
            buffered: AtomicU64::new(self.buffered()),
            marks: AtomicU64::new(self.marks()),
            suppressed: AtomicU64::new(self.suppressed()),
            auto_flushes: AtomicU64::new(self.auto_flushes()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            duplicate_namespaces: AtomicU64::new(self.duplicate_namespaces()),
        }
    }
}
