//! # Payment Allocation
//!
//! The rules shared by sale and loan payments.
//!
//! ## Registering a Payment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Payment::record(entry)                              │
//! │                                                                         │
//! │  1. entries.push(entry)             ledger of receipts, as entered      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. received = min(Σ entries, total) never overshoots the total         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. status = derive_status(received, total)                             │
//! │           received settles total (1¢ tolerance) → Paid                  │
//! │           received > 0                          → Partial               │
//! │           otherwise                             → Pending               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  4. allocate_installments(received)                                     │
//! │           walk in order, mark paid while the remainder covers the       │
//! │           next one; stop at the first that is not covered               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no per-installment partial state: a payment of 250 against
//! three installments of 100 marks #1 and #2 paid and leaves #3 unpaid,
//! while the payment itself reads 250 received, status partial.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::ids::new_id;
use crate::money::Money;
use crate::types::{Installment, Payment, PaymentEntry, PaymentMethod, PaymentStatus};
use crate::validation::{normalize_text, validate_positive_amount, validate_text};

/// Note written on the entry synthesized for sales paid on the spot.
pub const PAID_AT_CREATION_NOTE: &str = "Paid at creation";

// =============================================================================
// Status Derivation
// =============================================================================

/// Derives a payment status from what was received against what is owed.
///
/// Pure: calling it twice with the same amounts gives the same answer.
///
/// ```rust
/// use tally_core::{Money, PaymentStatus};
/// use tally_core::payment::derive_status;
///
/// let total = Money::from_cents(30000);
/// assert_eq!(derive_status(Money::zero(), total), PaymentStatus::Pending);
/// assert_eq!(derive_status(Money::from_cents(10000), total), PaymentStatus::Partial);
/// assert_eq!(derive_status(Money::from_cents(29999), total), PaymentStatus::Paid);
/// ```
pub fn derive_status(received: Money, total: Money) -> PaymentStatus {
    if received.settles(total) {
        PaymentStatus::Paid
    } else if received.is_positive() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Payment Input
// =============================================================================

/// A receipt of money as the user enters it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub amount_cents: i64,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub note: Option<String>,
}

impl PaymentInput {
    pub fn new(amount_cents: i64, date: NaiveDate) -> Self {
        PaymentInput {
            amount_cents,
            date,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Checks the amount and note, then turns the input into a ledger entry.
    pub fn into_entry(self) -> CoreResult<PaymentEntry> {
        validate_positive_amount("payment amount", self.amount_cents)?;
        validate_text("payment note", self.note.as_deref())?;

        Ok(PaymentEntry {
            id: new_id(),
            amount_cents: self.amount_cents,
            date: self.date,
            note: normalize_text(self.note),
        })
    }
}

// =============================================================================
// Installment Schedule
// =============================================================================

/// Builds an equal-split installment schedule.
///
/// Returns an empty schedule for `count <= 1`. Installment `n` is due
/// `start + interval_days × n`; the rounding remainder goes on the last one,
/// so the amounts always sum to `total`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use tally_core::Money;
/// use tally_core::payment::schedule_installments;
///
/// let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let plan = schedule_installments(Money::from_cents(10000), 3, start, 30);
/// let amounts: Vec<i64> = plan.iter().map(|i| i.amount_cents).collect();
/// assert_eq!(amounts, vec![3333, 3333, 3334]);
/// assert_eq!(plan[0].due_date, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
/// ```
pub fn schedule_installments(
    total: Money,
    count: u32,
    start: NaiveDate,
    interval_days: i64,
) -> Vec<Installment> {
    if count <= 1 {
        return Vec::new();
    }

    total
        .split_even(count)
        .into_iter()
        .enumerate()
        .map(|(index, amount)| {
            let number = index as u32 + 1;
            Installment {
                number,
                amount_cents: amount.cents(),
                due_date: start + Duration::days(interval_days * number as i64),
                paid: false,
                paid_on: None,
            }
        })
        .collect()
}

/// Re-walks the schedule against the amount received so far.
///
/// Installments are covered strictly in order. The first one the remainder
/// cannot settle, and every one after it, is unpaid. Installments that were
/// already paid keep their `paid_on`; newly covered ones get `paid_on`.
pub fn allocate_installments(installments: &mut [Installment], received: Money, paid_on: NaiveDate) {
    let mut remaining = received;
    let mut covering = true;

    for installment in installments.iter_mut() {
        covering = covering && remaining.settles(installment.amount());

        if covering {
            remaining -= installment.amount();
            if !installment.paid {
                installment.paid = true;
                installment.paid_on = Some(paid_on);
            }
        } else {
            installment.paid = false;
            installment.paid_on = None;
        }
    }
}

// =============================================================================
// Payment Operations
// =============================================================================

impl Payment {
    /// A payment with nothing received yet.
    pub fn new(owner_id: &str, method: PaymentMethod, total: Money) -> Self {
        Payment {
            id: new_id(),
            owner_id: owner_id.to_string(),
            method,
            total_cents: total.cents(),
            received_cents: 0,
            installments: Vec::new(),
            entries: Vec::new(),
            status: derive_status(Money::zero(), total),
        }
    }

    /// A payment received in full on `date`, with one synthetic entry.
    pub fn paid_at_creation(
        owner_id: &str,
        method: PaymentMethod,
        total: Money,
        date: NaiveDate,
    ) -> Self {
        let mut payment = Payment::new(owner_id, method, total);
        payment.entries.push(PaymentEntry {
            id: new_id(),
            amount_cents: total.cents(),
            date,
            note: Some(PAID_AT_CREATION_NOTE.to_string()),
        });
        payment.sync();
        payment
    }

    /// Attaches an installment schedule and allocates what was received.
    pub fn with_installments(mut self, installments: Vec<Installment>) -> Self {
        self.installments = installments;
        self.sync();
        self
    }

    /// Appends a receipt and re-derives every dependent field.
    pub fn record(&mut self, entry: PaymentEntry) {
        self.entries.push(entry);
        self.sync();
    }

    /// Re-derives `received_cents`, `status` and the installment flags
    /// from the entries.
    ///
    /// Newly covered installments are stamped with the date of the most
    /// recent entry.
    pub fn sync(&mut self) {
        let total = self.total();
        let received = self.entered().clamp_non_negative().min(total.clamp_non_negative());
        self.received_cents = received.cents();
        self.status = derive_status(received, total);

        if let Some(paid_on) = self.entries.last().map(|entry| entry.date) {
            allocate_installments(&mut self.installments, received, paid_on);
        } else {
            for installment in self.installments.iter_mut() {
                installment.paid = false;
                installment.paid_on = None;
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(cents: i64, date: NaiveDate) -> PaymentEntry {
        PaymentInput::new(cents, date).into_entry().unwrap()
    }

    fn card_sale_payment(total: i64, count: u32) -> Payment {
        let schedule = schedule_installments(Money::from_cents(total), count, day(2026, 1, 1), 30);
        Payment::new("sale-1", PaymentMethod::Card, Money::from_cents(total)).with_installments(schedule)
    }

    #[test]
    fn test_derive_status_is_idempotent() {
        let total = Money::from_cents(5000);
        for received in [0, 1, 2500, 4998, 4999, 5000] {
            let once = derive_status(Money::from_cents(received), total);
            let twice = derive_status(Money::from_cents(received), total);
            assert_eq!(once, twice);
        }
        assert_eq!(derive_status(Money::from_cents(4998), total), PaymentStatus::Partial);
        assert_eq!(derive_status(Money::from_cents(4999), total), PaymentStatus::Paid);
    }

    #[test]
    fn test_single_installment_has_no_schedule() {
        assert!(schedule_installments(Money::from_cents(9000), 1, day(2026, 1, 1), 30).is_empty());
        assert!(schedule_installments(Money::from_cents(9000), 0, day(2026, 1, 1), 30).is_empty());
    }

    #[test]
    fn test_schedule_due_dates() {
        let plan = schedule_installments(Money::from_cents(30000), 3, day(2026, 1, 1), 30);
        let dues: Vec<NaiveDate> = plan.iter().map(|i| i.due_date).collect();
        assert_eq!(dues, vec![day(2026, 1, 31), day(2026, 3, 2), day(2026, 4, 1)]);
        assert_eq!(plan.iter().map(|i| i.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(plan.iter().all(|i| i.amount_cents == 10000 && !i.paid));
    }

    #[test]
    fn test_partial_payment_covers_installments_in_order() {
        let mut payment = card_sale_payment(30000, 3);
        payment.record(entry(25000, day(2026, 2, 1)));

        assert_eq!(payment.received_cents, 25000);
        assert_eq!(payment.status, PaymentStatus::Partial);
        let flags: Vec<bool> = payment.installments.iter().map(|i| i.paid).collect();
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(payment.installments[0].paid_on, Some(day(2026, 2, 1)));
        assert_eq!(payment.installments[2].paid_on, None);
    }

    #[test]
    fn test_later_payment_keeps_earlier_paid_dates() {
        let mut payment = card_sale_payment(30000, 3);
        payment.record(entry(10000, day(2026, 2, 1)));
        payment.record(entry(10000, day(2026, 3, 1)));

        assert_eq!(payment.installments[0].paid_on, Some(day(2026, 2, 1)));
        assert_eq!(payment.installments[1].paid_on, Some(day(2026, 3, 1)));
        assert!(!payment.installments[2].paid);
    }

    #[test]
    fn test_received_never_exceeds_total() {
        let mut payment = Payment::new("loan-1", PaymentMethod::Cash, Money::from_cents(120_000));
        payment.record(entry(100_000, day(2026, 1, 5)));
        payment.record(entry(50_000, day(2026, 1, 6)));

        assert_eq!(payment.received_cents, 120_000);
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.entered().cents(), 150_000);
        assert_eq!(payment.overpaid().cents(), 30_000);
        assert!(payment.outstanding().is_zero());
    }

    #[test]
    fn test_one_cent_short_still_paid() {
        let mut payment = card_sale_payment(10000, 3);
        payment.record(entry(9999, day(2026, 1, 2)));

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert!(payment.installments.iter().all(|i| i.paid));
    }

    #[test]
    fn test_paid_at_creation() {
        let payment = Payment::paid_at_creation(
            "sale-2",
            PaymentMethod::Cash,
            Money::from_cents(15000),
            day(2026, 1, 3),
        );
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.received_cents, 15000);
        assert_eq!(payment.entries.len(), 1);
        assert_eq!(payment.entries[0].note.as_deref(), Some(PAID_AT_CREATION_NOTE));
    }

    #[test]
    fn test_sync_after_entry_removed_resets_installments() {
        let mut payment = card_sale_payment(30000, 3);
        payment.record(entry(30000, day(2026, 2, 1)));
        assert!(payment.installments.iter().all(|i| i.paid));

        payment.entries.clear();
        payment.sync();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.installments.iter().all(|i| !i.paid && i.paid_on.is_none()));
    }

    #[test]
    fn test_payment_input_rejects_non_positive() {
        assert!(PaymentInput::new(0, day(2026, 1, 1)).into_entry().is_err());
        assert!(PaymentInput::new(-500, day(2026, 1, 1)).into_entry().is_err());

        let entry = PaymentInput::new(500, day(2026, 1, 1))
            .with_note("  first half ")
            .into_entry()
            .unwrap();
        assert_eq!(entry.note.as_deref(), Some("first half"));
    }
}
