/*!
 * Timestamp parsing for cue timing lines.
 *
 * Two layouts are accepted:
 * - `HH:MM:SS.mmm` (hours, minutes, seconds)
 * - `MM:SS.mmm` (minutes, seconds)
 *
 * Every field is read as a plain number, so `1:5.5` is as valid as
 * `00:01:05.500`. The result is an offset in seconds.
 */

use crate::errors::FormatError;

/// Parse a timestamp into an offset in seconds
pub fn parse(value: &str) -> Result<f64, FormatError> {
    let fields: Vec<&str> = value.split(':').collect();
    if !(2..=3).contains(&fields.len()) {
        return Err(FormatError::FieldCount {
            value: value.to_string(),
            fields: fields.len(),
        });
    }

    let numbers = fields
        .iter()
        .map(|field| parse_field(value, field))
        .collect::<Result<Vec<f64>, FormatError>>()?;

    // Weights from the least significant field up: seconds, minutes, hours
    let seconds: f64 = numbers
        .iter()
        .rev()
        .zip([1.0, 60.0, 3600.0])
        .map(|(number, weight)| number * weight)
        .sum();

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(FormatError::OutOfRange {
            value: value.to_string(),
            seconds,
        });
    }

    Ok(seconds)
}

fn parse_field(value: &str, field: &str) -> Result<f64, FormatError> {
    let trimmed = field.trim();
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(FormatError::InvalidField {
            value: value.to_string(),
            field: trimmed.to_string(),
        }),
    }
}

/// Format an offset in seconds as `HH:MM:SS.mmm`
pub fn format(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}
