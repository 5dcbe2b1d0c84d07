//! Channel appender
//!
//! Forwards rendered lines over a `crossbeam-channel` so another thread can
//! consume them (a UI log pane, a test harness, a network forwarder).

use crate::core::{Appender, LogLevel, LoggerError, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};

pub struct ChannelAppender {
    sender: Sender<(LogLevel, String)>,
}

impl ChannelAppender {
    /// Unbounded channel; writes never block
    pub fn new() -> (Self, Receiver<(LogLevel, String)>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    /// Bounded channel; a write to a full channel fails instead of blocking
    pub fn with_capacity(capacity: usize) -> (Self, Receiver<(LogLevel, String)>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl Appender for ChannelAppender {
    fn write(&mut self, level: LogLevel, output: &str) -> Result<()> {
        match self.sender.try_send((level, output.to_string())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(LoggerError::writer("channel appender is full")),
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
        }
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "channel"
    }
}
