//! Human-readable durations
//!
//! Converts a millisecond measurement into an auto-scaled string. Below one
//! minute the value is shown in the finest unit that keeps it at or above one
//! (`ns`, `µs`, `ms`, `s`) with up to three decimals, rounded half-up. From one
//! minute on it is broken into `d h m s` parts with seconds truncated.

const UNITS: [&str; 7] = ["ns", "µs", "ms", "s", "m", "h", "d"];

/// Thousandths of each sub-minute unit per millisecond
const SCALE: [f64; 4] = [1e9, 1e6, 1e3, 1.0];

/// Round-half-up offset, nudged to absorb binary representation error
const ROUND_EPSILON: f64 = 0.5 + 1e-12;

const MINUTE_MS: f64 = 60_000.0;
const HOUR_MS: f64 = 3_600_000.0;
const DAY_MS: f64 = 86_400_000.0;

/// Format a millisecond duration, trimming trailing fractional zeros.
///
/// ```
/// use rust_console_logger::format_duration;
///
/// assert_eq!(format_duration(1.5), "1.5ms");
/// assert_eq!(format_duration(0.000_25), "250ns");
/// assert_eq!(format_duration(3_723_000.0), "1h 2m 3s");
/// ```
pub fn format_duration(ms: f64) -> String {
    format_duration_with(ms, true)
}

/// Format a millisecond duration.
///
/// With `trim == false` sub-minute values always carry exactly three decimals
/// (`"1.500ms"`), which keeps columns aligned.
pub fn format_duration_with(ms: f64, trim: bool) -> String {
    // Negative or non-finite measurements are clock noise
    if !ms.is_finite() || ms <= 0.0 {
        return render_thousandths(0, 0, trim);
    }

    if ms < MINUTE_MS {
        format_sub_minute(ms, trim)
    } else {
        format_minutes_and_up(ms)
    }
}

fn format_sub_minute(ms: f64, trim: bool) -> String {
    let idx = if ms < 1e-3 {
        0
    } else if ms < 1.0 {
        1
    } else if ms < 1000.0 {
        2
    } else {
        3
    };

    let thousandths = (ms * SCALE[idx] + ROUND_EPSILON).floor() as u64;

    if idx < 3 && thousandths >= 1_000_000 {
        return render_thousandths(1_000, idx + 1, trim);
    }
    if idx == 3 && thousandths >= 60_000 {
        return "1m 0s".to_string();
    }

    render_thousandths(thousandths, idx, trim)
}

fn render_thousandths(thousandths: u64, unit: usize, trim: bool) -> String {
    let whole = thousandths / 1000;
    let frac = thousandths % 1000;

    if !trim {
        return format!("{}.{:03}{}", whole, frac, UNITS[unit]);
    }

    let mut text = format!("{}.{:03}", whole, frac);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text.push_str(UNITS[unit]);
    text
}

fn format_minutes_and_up(ms: f64) -> String {
    let mut days = (ms / DAY_MS).floor();
    let mut rest = ms - days * DAY_MS;
    let mut hours = (rest / HOUR_MS).floor();
    rest -= hours * HOUR_MS;
    let mut minutes = (rest / MINUTE_MS).floor();
    rest -= minutes * MINUTE_MS;
    // Truncated, never rounded: 1m 59.999s stays 1m 59s
    let mut seconds = (rest / 1000.0).floor();

    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        hours += 1.0;
    }
    if hours >= 24.0 {
        hours -= 24.0;
        days += 1.0;
    }

    let mut parts = Vec::with_capacity(4);
    if days > 0.0 {
        parts.push(format!("{}{}", days as u64, UNITS[6]));
    }
    if days > 0.0 || hours > 0.0 {
        parts.push(format!("{}{}", hours as u64, UNITS[5]));
    }
    if days > 0.0 || hours > 0.0 || minutes > 0.0 {
        parts.push(format!("{}{}", minutes as u64, UNITS[4]));
    }
    parts.push(format!("{}{}", seconds as u64, UNITS[3]));
    parts.join(" ")
}
