//! `mm:ss.cc` time text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FormatError;

/// Durations are whole milliseconds throughout the crate.
pub type Millis = u64;

static TIME_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2})\.(\d{2})$").expect("time pattern is valid"));

/// Parse `mm:ss.cc` into milliseconds. Seconds must be below 60.
pub fn parse(text: &str) -> Result<Millis, FormatError> {
    let caps = TIME_FORMAT
        .captures(text)
        .ok_or_else(|| FormatError::new(text))?;

    let field = |i: usize| -> Result<Millis, FormatError> {
        caps[i].parse::<Millis>().map_err(|_| FormatError::new(text))
    };
    let (minutes, seconds, centis) = (field(1)?, field(2)?, field(3)?);
    if seconds >= 60 {
        return Err(FormatError::new(text));
    }

    Ok(minutes * 60_000 + seconds * 1_000 + centis * 10)
}

/// Format milliseconds as `mm:ss.cc`. Minutes keep growing past 99.
pub fn format(ms: Millis) -> String {
    let total_secs = ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let centis = (ms % 1000) / 10;
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

/// Format an optional duration, using `-` for unset.
pub fn format_opt(ms: Option<Millis>) -> String {
    ms.map(format).unwrap_or_else(|| "-".to_string())
}

/// Parse a form field: blank means unset.
pub fn parse_opt(text: &str) -> Result<Option<Millis>, FormatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        parse(trimmed).map(Some)
    }
}
