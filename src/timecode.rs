use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::CaptionError;

// @module: Caption time code parsing and formatting

// @const: Time code anchored at the start of the text; trailing text is ignored
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2}),([0-9]{3})").expect("time code regex is valid")
});

/// Parse a `HH:MM:SS,mmm` time code into milliseconds.
///
/// Only the start of the text has to match, so `"00:00:01,000 X1:40"` parses.
/// Component ranges are not checked: `"25:99:99,999"` is accepted as written.
pub fn parse_timecode(text: &str) -> Result<u64, CaptionError> {
    let caps = TIMECODE_REGEX
        .captures(text)
        .ok_or_else(|| CaptionError::Format(text.to_string()))?;

    let field = |i: usize| -> Result<u64, CaptionError> {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .ok_or_else(|| CaptionError::Format(text.to_string()))
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let millis = field(4)?;

    Ok((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
}

/// Format milliseconds as a `HH:MM:SS,mmm` time code.
///
/// Sub-second precision is truncated. Hours grow past two digits for offsets
/// of 100 hours or more.
pub fn format_timecode(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = ms % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}
