//! Common validation utilities for event fields.

use chrono::{NaiveDate, Utc};
use validator::ValidationError;

lazy_static::lazy_static! {
    /// 24-hour HH:MM, e.g. "09:30" or "18:00".
    static ref TIME_FORMAT_REGEX: regex::Regex =
        regex::Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

/// Validates that an event start time is a HH:MM string.
pub fn validate_event_time(time: &str) -> Result<(), ValidationError> {
    if TIME_FORMAT_REGEX.is_match(time) {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_format");
        err.message = Some("Time must be in HH:MM format".into());
        Err(err)
    }
}

/// Validates that an event date is not in the past (UTC calendar date).
pub fn validate_event_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= Utc::now().date_naive() {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_past");
        err.message = Some("Event date cannot be in the past".into());
        Err(err)
    }
}

/// Validates that a seat count is positive.
pub fn validate_max_seats(max_seats: i32) -> Result<(), ValidationError> {
    if max_seats >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("max_seats_range");
        err.message = Some("max_seats must be at least 1".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_event_time_valid() {
        assert!(validate_event_time("00:00").is_ok());
        assert!(validate_event_time("09:30").is_ok());
        assert!(validate_event_time("18:05").is_ok());
        assert!(validate_event_time("23:59").is_ok());
    }

    #[test]
    fn test_validate_event_time_invalid() {
        assert!(validate_event_time("24:00").is_err());
        assert!(validate_event_time("9:30").is_err());
        assert!(validate_event_time("18:60").is_err());
        assert!(validate_event_time("siete").is_err());
        assert!(validate_event_time("").is_err());
        assert!(validate_event_time("18:00:00").is_err());
    }

    #[test]
    fn test_validate_event_date_today_ok() {
        assert!(validate_event_date(&Utc::now().date_naive()).is_ok());
    }

    #[test]
    fn test_validate_event_date_future_ok() {
        let next_week = Utc::now().date_naive() + Duration::days(7);
        assert!(validate_event_date(&next_week).is_ok());
    }

    #[test]
    fn test_validate_event_date_past_rejected() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        assert!(validate_event_date(&yesterday).is_err());
    }

    #[test]
    fn test_validate_max_seats() {
        assert!(validate_max_seats(1).is_ok());
        assert!(validate_max_seats(64).is_ok());
        assert!(validate_max_seats(0).is_err());
        assert!(validate_max_seats(-4).is_err());
    }
}
