//! # tally-core: Ledger Engine for Tally
//!
//! This crate is the **heart** of Tally. It owns every rule that moves money
//! between the four ledgers (sales, purchases, cash movements, loans) and
//! keeps them consistent. There is no I/O here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation (browser UI)                    │   │
//! │  │   Dashboard ── Sales ── Cash ── Purchases ── Loans ── Goals    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ intents / aggregates                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             tally-db: LedgerSession + collection store          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │ payment  │ │  state   │ │     report       │  │   │
//! │  │   │  Money   │ │ Payment  │ │ Ledger-  │ │ profit, debts,   │  │   │
//! │  │   │  Rate    │ │ schedule │ │  State   │ │ goal progress    │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │   sale · loan · cash · purchase · goal · customer · inventory   │   │
//! │  │   migrate (stored JSON → typed records)                         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS OUTSIDE `ids`           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Product, Sale, Payment, Loan, CashMovement, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`payment`] - Payment allocation and installment schedules
//! - [`state`] - `LedgerState`, the in-memory collections every intent mutates
//! - [`report`] - Cross-ledger aggregates
//! - [`migrate`] - Load-time validation and back-fill of stored records
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: all amounts are cents; one tolerance, one place
//! 2. **Validate, then mutate**: an intent that fails leaves state untouched
//! 3. **Explicit Errors**: unknown ids are `NotFound`, never silent no-ops
//! 4. **Records are values**: no shared references between collections
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tally_core::{LedgerConfig, LedgerState, PaymentStatus};
//! use tally_core::loan::NewLoan;
//! use tally_core::payment::PaymentInput;
//!
//! let mut ledger = LedgerState::new(LedgerConfig::default());
//! let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//!
//! let loan = ledger
//!     .create_loan(NewLoan {
//!         customer_name: "Ana".to_string(),
//!         requested_cents: 100_000,
//!         loan_date: day,
//!         due_date: day + chrono::Duration::days(30),
//!         notes: None,
//!     })
//!     .unwrap();
//! assert_eq!(loan.total_cents, 120_000);
//!
//! let loan = ledger
//!     .register_loan_payment(&loan.id, PaymentInput::new(125_000, day))
//!     .unwrap();
//! assert_eq!(loan.payment.received_cents, 120_000);
//! assert_eq!(loan.payment.status, PaymentStatus::Paid);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cash;
pub mod config;
pub mod customer;
pub mod error;
pub mod goal;
pub mod ids;
pub mod inventory;
pub mod loan;
pub mod migrate;
pub mod money;
pub mod payment;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::LedgerConfig;
pub use error::{CoreError, CoreResult, RecordError, ValidationError};
pub use money::Money;
pub use state::{Collection, LedgerState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest shortfall that still counts as "paid": one cent.
///
/// Legacy records imported from float-based storage can be off by a cent
/// after rounding; this keeps them from showing "partial" forever.
pub const PAYMENT_TOLERANCE: Money = Money::from_cents(1);

/// Default loan interest, in basis points (2000 = 20%).
pub const DEFAULT_LOAN_INTEREST_BPS: u32 = 2000;

/// Days between consecutive installment due dates.
pub const INSTALLMENT_INTERVAL_DAYS: i64 = 30;

/// Products at or below this quantity (and above zero) are "low stock".
pub const LOW_STOCK_THRESHOLD: i64 = 3;

/// Maximum number of installments a sale can be split into.
pub const MAX_INSTALLMENTS: u32 = 24;

/// Maximum line items in a single sale or purchase.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// Guards against typos like 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 9999;
