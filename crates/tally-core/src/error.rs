//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Intent failures (not found, bad amount, stock) │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── RecordError      - Stored record could not be migrated            │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Persistence failures, wraps CoreError          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → presentation layer      │
//! │        RecordError → warn! log, record dropped (never surfaced)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger intent errors.
///
/// An intent that returns one of these has not changed any collection.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Sale id does not exist.
    ///
    /// ## When This Occurs
    /// - Registering a payment against a removed sale
    /// - UI holding a stale id after another intent removed the sale
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Loan id does not exist.
    #[error("Loan not found: {0}")]
    LoanNotFound(String),

    /// Purchase id does not exist.
    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),

    /// Cash movement id does not exist.
    #[error("Cash movement not found: {0}")]
    MovementNotFound(String),

    /// Reinvestment goal id does not exist.
    #[error("Reinvestment goal not found: {0}")]
    GoalNotFound(String),

    /// Customer id does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Requested quantity exceeds what is on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// New sale: 5 × "Denim jacket"
    ///      │
    ///      ▼
    /// check_stock(): on hand = 3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Denim jacket", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 units available"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Payment amount is invalid.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before an intent touches any collection.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A date range ends before it starts.
    #[error("{field}: end date {end} is before start date {start}")]
    InvertedRange {
        field: String,
        start: String,
        end: String,
    },

    /// Collection is empty where at least one entry is needed.
    #[error("{field} must contain at least one item")]
    Empty { field: String },

    /// Value is well-formed but not allowed in this context.
    #[error("{field}: {reason}")]
    NotAllowed { field: String, reason: String },
}

// =============================================================================
// Record Error
// =============================================================================

/// A stored record that could not be turned into a valid typed record.
///
/// The loader drops the record and logs this reason; the rest of the
/// collection is kept.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    /// The entry is not a JSON object.
    #[error("record is not an object")]
    NotAnObject,

    /// A field needed to identify the record is missing or blank.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field has the wrong shape and cannot be deserialized.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// The record deserialized but violates an invariant that cannot be
    /// repaired.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
