//! # Validation Module
//!
//! Input validation for ledger intents.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (TypeScript)                                    │
//! │  ├── Form checks (empty, length)                                       │
//! │  └── Stock pre-check via LedgerState::check_stock                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Ledger intent (Rust)                                         │
//! │  ├── THIS MODULE: shape of the input (names, amounts, counts)          │
//! │  └── Id lookups → CoreError::*NotFound                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Load-time migration                                          │
//! │  └── Stored records that break invariants are repaired or dropped      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock levels are not checked here: a sale trusts the
//! caller's pre-check and floors stock at zero.
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("customer name", "Ana Souza").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::{MAX_INSTALLMENTS, MAX_ITEM_QUANTITY, MAX_LINE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name (products, customers, suppliers).
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted free text (notes, descriptions, contacts).
pub const MAX_TEXT_LEN: usize = 1000;

/// Largest accepted single amount: 10 million in major units.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ```rust
/// use tally_core::validation::validate_name;
///
/// assert!(validate_name("supplier", "Atacado Central").is_ok());
/// assert!(validate_name("supplier", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates optional free text (notes, contact, description).
pub fn validate_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        }),
        _ => Ok(()),
    }
}

/// Trims optional text and turns blank strings into `None`.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock level set directly on a product.
///
/// Zero is allowed (sold out).
pub fn validate_stock_level(quantity: i64) -> ValidationResult<()> {
    if !(0..=MAX_ITEM_QUANTITY * 100).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY * 100,
        });
    }
    Ok(())
}

/// Validates a price or cost in cents.
///
/// ## Rules
/// - Zero is allowed (giveaways, donated stock)
/// - Must not be negative
/// - At most [`MAX_AMOUNT_CENTS`]
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }
    Ok(())
}

/// Validates an amount that must be strictly positive
/// (payments, loans, cash movements).
///
/// ```rust
/// use tally_core::validation::validate_positive_amount;
///
/// assert!(validate_positive_amount("amount", 100).is_ok());
/// assert!(validate_positive_amount("amount", 0).is_err());
/// ```
pub fn validate_positive_amount(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates an installment count (1 = single payment).
pub fn validate_installment_count(count: u32) -> ValidationResult<()> {
    if count == 0 || count > MAX_INSTALLMENTS {
        return Err(ValidationError::OutOfRange {
            field: "installment count".to_string(),
            min: 1,
            max: MAX_INSTALLMENTS as i64,
        });
    }
    Ok(())
}

/// Validates the number of lines on a sale or purchase.
pub fn validate_line_count(field: &str, count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }

    if count > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    Ok(())
}

/// Validates a percentage target in basis points: above 0%, at most 100%.
pub fn validate_target_bps(bps: u32) -> ValidationResult<()> {
    if bps == 0 || bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "target percentage".to_string(),
            min: 1,
            max: 10_000,
        });
    }
    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates that `end` is not before `start`.
pub fn validate_date_range(field: &str, start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::InvertedRange {
            field: field.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Denim jacket").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "  \t").is_err());
        assert!(validate_name("name", &"x".repeat(201)).is_err());
        assert!(validate_name("name", &"x".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_text_and_normalize() {
        assert!(validate_text("notes", None).is_ok());
        assert!(validate_text("notes", Some("paid half")).is_ok());
        assert!(validate_text("notes", Some(&"n".repeat(1001))).is_err());

        assert_eq!(normalize_text(Some("  hi ".into())), Some("hi".into()));
        assert_eq!(normalize_text(Some("   ".into())), None);
        assert_eq!(normalize_text(None), None);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_price_cents("price", 0).is_ok());
        assert!(validate_price_cents("price", -1).is_err());
        assert!(validate_positive_amount("amount", 1).is_ok());
        assert!(validate_positive_amount("amount", -100).is_err());
        assert!(validate_positive_amount("amount", MAX_AMOUNT_CENTS + 1).is_err());
    }

    #[test]
    fn test_validate_counts() {
        assert!(validate_installment_count(1).is_ok());
        assert!(validate_installment_count(MAX_INSTALLMENTS).is_ok());
        assert!(validate_installment_count(0).is_err());
        assert!(validate_line_count("items", 0).is_err());
        assert!(validate_line_count("items", 3).is_ok());
    }

    #[test]
    fn test_validate_target_and_dates() {
        assert!(validate_target_bps(3000).is_ok());
        assert!(validate_target_bps(0).is_err());
        assert!(validate_target_bps(10_001).is_err());

        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert!(validate_date_range("period", start, end).is_ok());
        assert!(validate_date_range("period", start, start).is_ok());
        assert!(validate_date_range("period", end, start).is_err());
    }
}
