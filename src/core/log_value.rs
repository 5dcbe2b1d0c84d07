//! Dynamically typed log arguments
//!
//! Log calls accept a template and any number of loosely typed arguments.
//! `LogValue` carries each argument together with the stringification rules
//! used by the message formatter: strings pass through, scalars use their
//! natural form, objects and arrays are rendered as JSON.

use serde::Serialize;
use std::fmt;

/// Sentinel rendered in place of a value that cannot be serialized
pub const CIRCULAR: &str = "[Circular]";

/// Value type for log message templates and arguments
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LogValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Objects and arrays
    Json(serde_json::Value),
    /// An error value; `stack` carries the full cause chain when there is one
    Error {
        message: String,
        stack: Option<String>,
    },
    /// A value whose serialization failed (for example a self-referencing structure)
    Unserializable,
}

impl LogValue {
    /// Capture any serializable value.
    ///
    /// Scalars are normalized to their dedicated variants so that a serialized
    /// string still passes through unquoted. Serialization failure yields
    /// [`LogValue::Unserializable`], never an error.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self::from_json(json),
            Err(_) => LogValue::Unserializable,
        }
    }

    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => LogValue::Null,
            serde_json::Value::Bool(b) => LogValue::Bool(b),
            serde_json::Value::Number(n) => LogValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => LogValue::String(s),
            other => LogValue::Json(other),
        }
    }

    /// Capture an error, walking its `source()` chain into the stack text
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let message = err.to_string();
        let mut stack = None;
        let mut source = err.source();
        while let Some(cause) = source {
            let text = stack.get_or_insert_with(|| message.clone());
            text.push_str("\n    caused by: ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        LogValue::Error { message, stack }
    }

    pub fn error(message: impl Into<String>) -> Self {
        LogValue::Error {
            message: message.into(),
            stack: None,
        }
    }

    /// Empty, zero, false, null and undefined values mark a timer instead of logging
    pub fn is_falsy(&self) -> bool {
        match self {
            LogValue::Undefined | LogValue::Null => true,
            LogValue::Bool(b) => !*b,
            LogValue::Number(n) => *n == 0.0 || n.is_nan(),
            LogValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LogValue::Error { .. })
    }

    /// Numeric coercion used by the `%d` placeholder
    pub fn to_number(&self) -> f64 {
        match self {
            LogValue::Undefined => f64::NAN,
            LogValue::Null => 0.0,
            LogValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            LogValue::Number(n) => *n,
            LogValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    match trimmed {
                        "Infinity" | "+Infinity" => f64::INFINITY,
                        "-Infinity" => f64::NEG_INFINITY,
                        // Rust accepts "inf"/"nan" spellings that Number() rejects
                        t if t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
                            f64::NAN
                        }
                        t => t.parse().unwrap_or(f64::NAN),
                    }
                }
            }
            LogValue::Json(_) | LogValue::Error { .. } | LogValue::Unserializable => f64::NAN,
        }
    }

    /// JSON form used by the `%j` placeholder
    pub fn to_json_string(&self) -> String {
        match self {
            LogValue::Undefined => "undefined".to_string(),
            LogValue::Null => "null".to_string(),
            LogValue::Bool(b) => b.to_string(),
            LogValue::Number(n) if n.is_finite() => format_number(*n),
            LogValue::Number(_) => "null".to_string(),
            LogValue::String(s) => {
                serde_json::to_string(s).unwrap_or_else(|_| CIRCULAR.to_string())
            }
            LogValue::Json(value) => {
                serde_json::to_string(value).unwrap_or_else(|_| CIRCULAR.to_string())
            }
            LogValue::Error { .. } => "{}".to_string(),
            LogValue::Unserializable => CIRCULAR.to_string(),
        }
    }

    /// Text used when this value is the message of an error-level call
    pub fn error_text(&self) -> Option<&str> {
        match self {
            LogValue::Error { message, stack } => Some(stack.as_deref().unwrap_or(message)),
            _ => None,
        }
    }
}

/// Render a number the way a default number-to-string conversion does:
/// integers without a fractional part, exponent form outside `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Undefined => write!(f, "undefined"),
            LogValue::Null => write!(f, "null"),
            LogValue::Bool(b) => write!(f, "{}", b),
            LogValue::Number(n) => write!(f, "{}", format_number(*n)),
            LogValue::String(s) => write!(f, "{}", s),
            LogValue::Json(_) | LogValue::Unserializable => write!(f, "{}", self.to_json_string()),
            LogValue::Error { message, .. } => write!(f, "{}", message),
        }
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::String(s)
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::String(s.to_string())
    }
}

impl From<&String> for LogValue {
    fn from(s: &String) -> Self {
        LogValue::String(s.clone())
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogValue {
                fn from(n: $ty) -> Self {
                    LogValue::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<serde_json::Value> for LogValue {
    fn from(json: serde_json::Value) -> Self {
        LogValue::from_json(json)
    }
}

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LogValue::Null)
    }
}
