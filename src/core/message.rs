//! printf-style message interpolation
//!
//! Supported placeholders: `%s` (string form), `%d` (numeric coercion), `%j`
//! (JSON) and `%%` (a literal percent sign). Each placeholder except `%%`
//! consumes one argument; arguments left over are appended, space separated.

use super::log_value::LogValue;

/// Interpolate `args` into `template`.
///
/// A non-string template is stringified together with every argument and the
/// pieces are joined with single spaces.
///
/// # Examples
///
/// ```
/// use rust_console_logger::{format_string, LogValue};
///
/// let out = format_string(&"Hello %s!".into(), &["world".into()]);
/// assert_eq!(out, "Hello world!");
///
/// let out = format_string(&"Current %%avr is %d%".into(), &[LogValue::from(50)]);
/// assert_eq!(out, "Current %avr is 50%");
/// ```
pub fn format_string(template: &LogValue, args: &[LogValue]) -> String {
    let template = match template {
        LogValue::String(s) => s,
        other => {
            return std::iter::once(other)
                .chain(args.iter())
                .map(LogValue::to_string)
                .collect::<Vec<_>>()
                .join(" ");
        }
    };

    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut remaining = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(spec @ ('s' | 'd' | 'j')) => {
                chars.next();
                match remaining.next() {
                    Some(arg) => out.push_str(&substitute(spec, arg)),
                    None => {
                        out.push('%');
                        out.push(spec);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    for arg in remaining {
        out.push(' ');
        out.push_str(&arg.to_string());
    }

    out
}

fn substitute(spec: char, arg: &LogValue) -> String {
    match spec {
        'd' => LogValue::Number(arg.to_number()).to_string(),
        'j' => arg.to_json_string(),
        _ => arg.to_string(),
    }
}
