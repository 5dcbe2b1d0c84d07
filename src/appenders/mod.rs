//! Appender implementations

pub mod channel;
pub mod console;
pub mod memory;

pub use channel::ChannelAppender;
pub use console::ConsoleAppender;
pub use memory::MemoryAppender;

pub use crate::core::Appender;
