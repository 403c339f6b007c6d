//! Cursor-based pagination utilities for event listings.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid date in cursor")]
    InvalidDate,
    #[error("Invalid ID in cursor")]
    InvalidId,
}

/// Encodes a listing cursor from an event date and id.
///
/// The cursor format is: base64(ISO_date:event_id). The composite cursor
/// keeps ordering stable across events that share a date.
pub fn encode_cursor(date: NaiveDate, id: Uuid) -> String {
    let raw = format!("{}:{}", date.format("%Y-%m-%d"), id);
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decodes a listing cursor into `(date, id)`.
pub fn decode_cursor(cursor: &str) -> Result<(NaiveDate, Uuid), CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;

    let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

    let (date_str, id_str) = s.split_once(':').ok_or(CursorError::InvalidFormat)?;

    let date =
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| CursorError::InvalidDate)?;
    let id = Uuid::parse_str(id_str).map_err(|_| CursorError::InvalidId)?;

    Ok((date, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_cursor_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        let id = Uuid::new_v4();

        let cursor = encode_cursor(date, id);
        let (decoded_date, decoded_id) = decode_cursor(&cursor).unwrap();

        assert_eq!(decoded_date, date);
        assert_eq!(decoded_id, id);
    }

    #[test]
    fn test_cursor_is_url_safe() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let cursor = encode_cursor(date, Uuid::new_v4());
        assert!(!cursor.contains('+'));
        assert!(!cursor.contains('/'));
        assert!(!cursor.contains('='));
    }

    #[test]
    fn test_decode_invalid_base64() {
        let result = decode_cursor("not-valid-base64!!!");
        assert!(matches!(result, Err(CursorError::InvalidEncoding)));
    }

    #[test]
    fn test_decode_missing_separator() {
        let cursor = URL_SAFE_NO_PAD.encode(b"20251102");
        assert!(matches!(
            decode_cursor(&cursor),
            Err(CursorError::InvalidFormat)
        ));
    }

    #[test]
    fn test_decode_invalid_date() {
        let cursor = URL_SAFE_NO_PAD.encode(format!("2025-13-99:{}", Uuid::new_v4()).as_bytes());
        assert!(matches!(
            decode_cursor(&cursor),
            Err(CursorError::InvalidDate)
        ));
    }

    #[test]
    fn test_decode_invalid_id() {
        let cursor = URL_SAFE_NO_PAD.encode(b"2025-11-02:not-a-uuid");
        assert!(matches!(decode_cursor(&cursor), Err(CursorError::InvalidId)));
    }
}
