//! Time sources
//!
//! Durations are measured against a monotonic millisecond clock; date markers
//! use the wall-clock date. Both come from a [`Clock`] so tests can drive time
//! by hand.

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::OnceLock;
use std::time::Instant;

pub trait Clock: Send + Sync {
    /// Monotonic milliseconds, fractional, from an arbitrary origin
    fn now_ms(&self) -> f64;

    /// Current wall-clock date
    fn date(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// `Instant`-based clock measured from the first use in the process
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

fn process_origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        process_origin().elapsed().as_nanos() as f64 / 1e6
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now_ms: Mutex<f64>,
    date: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Mutex::new(start_ms),
            date: Mutex::new(Local::now()),
        }
    }

    pub fn advance(&self, ms: f64) {
        *self.now_ms.lock() += ms;
    }

    pub fn set(&self, ms: f64) {
        *self.now_ms.lock() = ms;
    }

    pub fn set_date(&self, date: DateTime<Local>) {
        *self.date.lock() = date;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now_ms.lock()
    }

    fn date(&self) -> DateTime<Local> {
        *self.date.lock()
    }
}
