//! Logging macros.
//!
//! Each macro takes a logger, a printf-style template and any number of
//! arguments, converting every argument with [`LogValue::from`](crate::LogValue).
//!
//! # Examples
//!
//! ```
//! use rust_console_logger::prelude::*;
//! use rust_console_logger::info;
//!
//! let logger = Logger::builder("docs:macros")
//!     .context(LoggerContext::new().shared())
//!     .appender(MemoryAppender::new())
//!     .build()
//!     .unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port %d", port);
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::builder("docs:log").context(LoggerContext::new().shared())
/// #     .appender(MemoryAppender::new()).build().unwrap();
/// use rust_console_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: %d", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log_at(
            $level,
            $template,
            &[$($crate::LogValue::from($arg)),*],
        )
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use rust_console_logger::prelude::*;
/// # let logger = Logger::builder("docs:info").context(LoggerContext::new().shared())
/// #     .appender(MemoryAppender::new()).build().unwrap();
/// use rust_console_logger::info;
/// info!(logger, "Items: %d of %d", 3, 10);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
