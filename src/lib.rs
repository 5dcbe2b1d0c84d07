//! # Rust Console Logger
//!
//! Namespaced console logging with compiled layouts, per-level styling and a
//! buffered silent mode.
//!
//! ## Features
//!
//! - **Compiled Layouts**: `{token}` layouts are parsed and compiled once per level
//! - **Profiling Durations**: every line can carry the time since the previous call
//! - **Namespace Selection**: `enable`/`disable` patterns and an environment variable
//! - **Silent Mode**: lines are buffered and flushed in time or namespace order
//!
//! ## Example
//!
//! ```
//! use rust_console_logger::prelude::*;
//!
//! let context = LoggerContext::new().shared();
//! let logger = Logger::builder("app:db")
//!     .context(context.clone())
//!     .enabled(true)
//!     .silent(true)
//!     .build()
//!     .unwrap();
//!
//! logger.info("connected to %s", &["primary".into()]);
//! let output = context.flush(FlushOptions::new().colored(false).return_output(true));
//! assert!(output.unwrap().contains("connected to primary"));
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ChannelAppender, ConsoleAppender, MemoryAppender};
    pub use crate::core::{
        Appender, BufferCapacity, CallSite, FlushOptions, FlushOrder, LevelConfig, LogEntry,
        LogLevel, LogValue, Logger, LoggerBuilder, LoggerContext, LoggerError, LoggerMetrics,
        RenderContext, Result, StyleSpec, TokenSource,
    };
}

pub use appenders::{ChannelAppender, ConsoleAppender, MemoryAppender};
pub use crate::core::context::{disable, enable, flush, peek};
pub use crate::core::{
    format_date, format_duration, format_duration_with, format_string, parse_layout, Appender,
    BufferCapacity, CallSite, Clock, FlushOptions, FlushOrder, LevelConfig, LogEntry, LogLevel,
    LogValue, Logger, LoggerBuilder, LoggerContext, LoggerError, LoggerMetrics, ManualClock,
    RenderContext, Result, StyleSpec, TokenSource, UnterminatedBrace,
};
