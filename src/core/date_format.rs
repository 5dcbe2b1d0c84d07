//! Date markers in layouts
//!
//! A layout may contain `%d` or `%d{spec}` markers. The spec uses a small
//! pattern vocabulary:
//!
//! | token  | output                      |
//! |--------|-----------------------------|
//! | `YYYY` | four digit year             |
//! | `YY`   | two digit year              |
//! | `MM`   | month `01`-`12`             |
//! | `DD`   | day of month `01`-`31`      |
//! | `HH`   | hour `00`-`23`              |
//! | `mm`   | minute `00`-`59`            |
//! | `ss`   | second `00`-`59`            |
//! | `sss`  | millisecond `000`-`999`     |
//! | `ts`   | Unix timestamp in seconds   |
//!
//! A bare `%d` is shorthand for `%d{YYYY-MM-DDTHH:mm:ss.sssZ}`. A `%d{` that is
//! not closed before the next `%d{` is copied through verbatim.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

/// Spec used for a bare `%d` marker
pub const DEFAULT_DATE_SPEC: &str = "YYYY-MM-DDTHH:mm:ss.sssZ";

const MARKER: &str = "%d";
const OPEN_MARKER: &str = "%d{";

/// Longer tokens come first so `sss` is never read as `ss` + `s`
const SPEC_TOKENS: [&str; 9] = ["YYYY", "sss", "YY", "MM", "DD", "HH", "mm", "ss", "ts"];

/// Replace every date marker in `pattern` with `date` rendered by its spec.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rust_console_logger::format_date;
///
/// let date = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(format_date("[%d{HH:mm}]", &date), "[10:30]");
/// ```
pub fn format_date<Tz: TimeZone>(pattern: &str, date: &DateTime<Tz>) -> String {
    scan_markers(pattern, |_, spec| render_spec(spec, date))
}

/// Wrap every date marker, verbatim, with `styler`.
///
/// Used at layout compile time so that the per-call work is only filling in
/// the date itself; the styling escape codes are already in place around the
/// marker.
pub fn style_date_tokens<F>(pattern: &str, styler: F) -> String
where
    F: Fn(&str) -> String,
{
    scan_markers(pattern, |raw, _| styler(raw))
}

/// Walk `pattern`, handing each well-formed marker (raw text and spec) to `on_marker`
fn scan_markers<F>(pattern: &str, mut on_marker: F) -> String
where
    F: FnMut(&str, &str) -> String,
{
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(pos) = rest.find(MARKER) {
        out.push_str(&rest[..pos]);
        let marker_start = &rest[pos..];
        let after = &marker_start[MARKER.len()..];

        if let Some(body) = after.strip_prefix('{') {
            let close = body.find('}');
            let next_open = body.find(OPEN_MARKER);
            match close {
                Some(end) if next_open.is_none_or(|next| end < next) => {
                    let raw = &marker_start[..MARKER.len() + 1 + end + 1];
                    out.push_str(&on_marker(raw, &body[..end]));
                    rest = &body[end + 1..];
                }
                _ => {
                    out.push_str(OPEN_MARKER);
                    rest = body;
                }
            }
        } else {
            out.push_str(&on_marker(MARKER, DEFAULT_DATE_SPEC));
            rest = after;
        }
    }

    out.push_str(rest);
    out
}

fn render_spec<Tz: TimeZone>(spec: &str, date: &DateTime<Tz>) -> String {
    let mut out = String::with_capacity(spec.len() + 8);
    let mut rest = spec;

    'outer: while let Some(c) = rest.chars().next() {
        for token in SPEC_TOKENS {
            if rest.starts_with(token) {
                out.push_str(&render_token(token, date));
                rest = &rest[token.len()..];
                continue 'outer;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn render_token<Tz: TimeZone>(token: &str, date: &DateTime<Tz>) -> String {
    match token {
        "YYYY" => format!("{:04}", date.year()),
        "YY" => format!("{:02}", date.year().rem_euclid(100)),
        "MM" => format!("{:02}", date.month()),
        "DD" => format!("{:02}", date.day()),
        "HH" => format!("{:02}", date.hour()),
        "mm" => format!("{:02}", date.minute()),
        "ss" => format!("{:02}", date.second()),
        // Leap-second nanos can exceed 999_999_999
        "sss" => format!("{:03}", (date.nanosecond() / 1_000_000).min(999)),
        "ts" => date.timestamp().to_string(),
        _ => token.to_string(),
    }
}
