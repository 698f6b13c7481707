use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};

/// Maximum length of the free-text notes field.
const NOTES_MAX_LEN: usize = 2000;

/// Validates a booking interval.
///
/// Upstream callers are expected to have rejected degenerate intervals
/// already; this re-checks defensively so a zero-length or inverted slot can
/// never reach the conflict detector.
pub fn validate_interval(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<()> {
    if end_time <= start_time {
        return Err(AppError::Validation(
            "Session end time must be after start time".to_string(),
        ));
    }

    Ok(())
}

/// Validates session notes.
pub fn validate_notes(notes: &str) -> Result<()> {
    if notes.len() > NOTES_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Notes must be at most {} characters",
            NOTES_MAX_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn inverted_and_zero_length_intervals_are_rejected() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap();
        assert!(validate_interval(t1, t0).is_err());
        assert!(validate_interval(t0, t0).is_err());
        assert!(validate_interval(t0, t1).is_ok());
    }

    #[test]
    fn oversized_notes_are_rejected() {
        assert!(validate_notes("bring headphones").is_ok());
        assert!(validate_notes(&"x".repeat(2001)).is_err());
    }
}
