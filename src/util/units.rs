//! Units formatting and input coercion utilities
//!
//! Provides clock formatting for the rest timer, lenient numeric parsing
//! for set entry, and human-readable durations.

use std::time::Duration;

/// Format whole seconds as a `MM:SS` clock
///
/// # Examples
/// ```
/// use mysetrun::util::units::format_clock;
///
/// assert_eq!(format_clock(60), "01:00");
/// assert_eq!(format_clock(5), "00:05");
/// assert_eq!(format_clock(300), "05:00");
/// ```
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Parse the leading numeric part of `input`, the way browsers parse a
/// number field: `"12kg"` is 12, `"abc"` is `None`.
///
/// # Examples
/// ```
/// use mysetrun::util::units::parse_leading_number;
///
/// assert_eq!(parse_leading_number("62.5"), Some(62.5));
/// assert_eq!(parse_leading_number(" 12kg"), Some(12.0));
/// assert_eq!(parse_leading_number("abc"), None);
/// ```
pub fn parse_leading_number(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '+' | '-' if seen_exp && trimmed[..i].ends_with(['e', 'E']) => {}
            '0'..='9' => {
                seen_digit = true;
                end = i + 1;
                continue;
            }
            '.' if !seen_dot && !seen_exp => seen_dot = true,
            'e' | 'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }
    // `end` stops at the last digit, dropping a dangling "e" or "."
    let candidate = &trimmed[..end];
    candidate
        .parse::<f64>()
        .ok()
        .or_else(|| {
            // "1e" style leftovers: retry without the exponent part
            candidate
                .split(['e', 'E'])
                .next()
                .and_then(|m| m.parse::<f64>().ok())
        })
        .filter(|v| v.is_finite())
}

/// Coerce free text into a number; anything unparsable becomes 0.
///
/// The second element reports whether the fallback kicked in.
pub fn coerce_number(input: &str) -> (f64, bool) {
    match parse_leading_number(input) {
        Some(v) => (v, false),
        None => (0.0, true),
    }
}

/// Coerce free text into a repetition count. Fractions truncate toward
/// zero; negative or unparsable input becomes 0.
pub fn coerce_count(input: &str) -> (u32, bool) {
    match parse_leading_number(input) {
        Some(v) if v >= 0.0 => (v.trunc().min(u32::MAX as f64) as u32, false),
        _ => (0, true),
    }
}

/// Format duration into human-readable string
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use mysetrun::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(Duration::from_secs(duration.as_secs())).to_string()
}

/// Parse a rest length such as `"90s"`, `"1m 30s"` or a bare number of
/// seconds.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use mysetrun::util::units::parse_duration;
///
/// assert_eq!(parse_duration("90").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("1m 30s").unwrap(), Duration::from_secs(90));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(input).map_err(|e| format!("Invalid duration '{}': {}", input, e))
}

/// Signed difference with an explicit `+` for gains
///
/// # Examples
/// ```
/// use mysetrun::util::units::format_delta;
///
/// assert_eq!(format_delta(2.5), "+2.5");
/// assert_eq!(format_delta(-5.0), "-5");
/// ```
pub fn format_delta(diff: f64) -> String {
    let body = crate::models::workout::trim_number(diff.abs());
    if diff < 0.0 {
        format!("-{}", body)
    } else {
        format!("+{}", body)
    }
}
