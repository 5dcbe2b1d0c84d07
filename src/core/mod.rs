//! Core logger types and traits

pub mod appender;
pub mod buffer;
pub mod clock;
pub mod compiler;
pub mod context;
pub mod date_format;
pub mod duration_format;
pub mod error;
pub mod layout;
pub mod log_entry;
pub mod log_level;
pub mod log_value;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod pattern;
pub mod style;
pub mod token;

pub use appender::Appender;
pub use buffer::{BufferCapacity, FlushOptions, FlushOrder, LogBuffer, DEFAULT_MAX_BUFFER};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use compiler::{compile_layout, CompileInput, CompiledLayout, RenderContext, RenderFn};
pub use context::LoggerContext;
pub use date_format::{format_date, DEFAULT_DATE_SPEC};
pub use duration_format::{format_duration, format_duration_with};
pub use error::{LoggerError, Result};
pub use layout::{parse_layout, parse_layout_with, TokenDescriptor, TokenKind, UnterminatedBrace};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use log_value::LogValue;
pub use logger::{FormatFn, LevelConfig, Logger, LoggerBuilder, DEFAULT_ENV_VAR, DEFAULT_LAYOUT};
pub use message::format_string;
pub use metrics::LoggerMetrics;
pub use pattern::EnvPatterns;
pub use style::{StyleSpec, Styler};
pub use token::{CallSite, CallSiteFn, TokenFn, TokenSource};
