//! Token value sources and caller locations

use std::fmt;
use std::sync::Arc;

/// Computes a token value on every call from the previous/default value
pub type TokenFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Names with a value computed by the logger itself
pub const BUILTIN_TOKENS: [&str; 10] = [
    "name", "level", "label", "msg", "date", "duration", "elapsed", "file", "line", "column",
];

/// Built-in tokens that require a caller location lookup
pub const CALLER_TOKENS: [&str; 3] = ["file", "line", "column"];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TOKENS.contains(&name)
}

/// Where a token value comes from
#[derive(Clone)]
pub enum TokenSource {
    /// Fixed value, substituted into the layout once when it is compiled
    Literal(String),
    /// Function invoked on every log call
    Dynamic(TokenFn),
}

impl TokenSource {
    pub fn literal(value: impl Into<String>) -> Self {
        TokenSource::Literal(value.into())
    }

    /// Wrap a function receiving the built-in (or empty) value for the token.
    ///
    /// The function runs while the logger's timing lock is held, so it must
    /// not log through the same logger.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        TokenSource::Dynamic(Arc::new(f))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, TokenSource::Dynamic(_))
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            TokenSource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for TokenSource {
    fn from(value: &str) -> Self {
        TokenSource::literal(value)
    }
}

impl From<String> for TokenSource {
    fn from(value: String) -> Self {
        TokenSource::Literal(value)
    }
}

/// Source location of a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl From<&std::panic::Location<'_>> for CallSite {
    fn from(location: &std::panic::Location<'_>) -> Self {
        CallSite::new(location.file(), location.line(), location.column())
    }
}

/// Replacement caller lookup; receives the number of logger frames to skip
pub type CallSiteFn = Arc<dyn Fn(usize) -> Option<CallSite> + Send + Sync>;
