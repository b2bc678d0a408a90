use crate::error::{CaptionError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// `[HOURS:]MM:SS[.mmm]`, with `,` accepted as the fraction separator (SRT).
/// Trailing cue settings after whitespace are tolerated.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?([0-5]\d):([0-5]\d)(?:[.,](\d{1,3}))?(?:$|[ \t])")
        .expect("Invalid regex")
});

/// Decode a timestamp token into seconds, exact to the millisecond.
pub fn decode_timestamp(token: &str) -> Result<f64> {
    let token = token.trim();
    let malformed = || CaptionError::MalformedTimestamp(token.to_string());

    let caps = TIMESTAMP_RE.captures(token).ok_or_else(malformed)?;

    let hours: u64 = match caps.get(1) {
        Some(h) => h.as_str().parse().map_err(|_| malformed())?,
        None => 0,
    };
    let minutes: u64 = caps[2].parse().map_err(|_| malformed())?;
    let seconds: u64 = caps[3].parse().map_err(|_| malformed())?;
    let millis = caps.get(4).map(|m| fraction_to_millis(m.as_str())).unwrap_or(0);

    let total_ms = hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1000 + millis))
        .ok_or_else(malformed)?;

    Ok(total_ms as f64 / 1000.0)
}

/// "5" is 500ms, "05" is 50ms, "005" is 5ms.
fn fraction_to_millis(digits: &str) -> u64 {
    digits
        .chars()
        .chain(std::iter::repeat('0'))
        .take(3)
        .fold(0, |acc, c| acc * 10 + c.to_digit(10).unwrap_or(0) as u64)
}

/// Render seconds as `HH:MM:SS<sep>mmm`. Negative and non-finite input renders as zero.
pub fn format_timestamp(seconds: f64, separator: char) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let total_secs = total_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    let millis = total_ms % 1000;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, secs, separator, millis
    )
}
