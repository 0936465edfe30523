//! # Identifiers and Timestamps
//!
//! The only place in tally-core that reads the clock or a random source.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use uuid::Uuid;

/// New record identifier (UUID v4).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC timestamp, for `created_at` fields.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's calendar date (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Receipt number for a sale made at `at`: `REC-YYMM-XXXX`.
///
/// The suffix is four uppercase hex characters from a fresh UUID, so two
/// receipts in the same month rarely collide. They are for humans; records
/// are keyed by id.
pub fn receipt_number(at: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();
    format!("REC-{:02}{:02}-{}", at.year() % 100, at.month(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_id_is_uuid() {
        let id = new_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_id());
    }

    #[test]
    fn test_receipt_number_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 14, 0, 0).unwrap();
        let receipt = receipt_number(at);

        assert!(receipt.starts_with("REC-2603-"), "{}", receipt);
        let suffix = &receipt["REC-2603-".len()..];
        assert_eq!(suffix.len(), 4);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
