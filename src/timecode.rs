use crate::error::{MatchForgeError, MfResult};
use serde::Serializer;

/// Parses `SS`, `MM:SS` or `HH:MM:SS` (fractional seconds allowed) into seconds.
pub fn parse_timestamp(text: &str) -> MfResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MatchForgeError::Timestamp("empty timestamp".to_string()));
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(MatchForgeError::Timestamp(format!(
            "too many fields in '{}'",
            trimmed
        )));
    }

    let mut seconds = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;
        let value: f64 = part
            .trim()
            .parse()
            .map_err(|_| MatchForgeError::Timestamp(format!("'{}' in '{}'", part, trimmed)))?;
        if !value.is_finite() || value < 0.0 {
            return Err(MatchForgeError::Timestamp(format!(
                "negative or non-finite field in '{}'",
                trimmed
            )));
        }
        // Only the seconds field may carry a fraction; minutes/seconds stay below 60.
        if !is_last && value.fract() != 0.0 {
            return Err(MatchForgeError::Timestamp(format!(
                "fractional hours/minutes in '{}'",
                trimmed
            )));
        }
        if i > 0 && value >= 60.0 {
            return Err(MatchForgeError::Timestamp(format!(
                "field out of range in '{}'",
                trimmed
            )));
        }
        seconds = seconds * 60.0 + value;
    }

    Ok(seconds)
}

/// Renders seconds as `HH:MM:SS`, truncating fractions.
pub fn format_hms(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

pub fn serialize_hms<S: Serializer>(seconds: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_hms(*seconds))
}
