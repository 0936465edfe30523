//! # Loan Lifecycle
//!
//! Short-term loans to customers. The interest rate is fixed from
//! [`crate::LedgerConfig`] when the loan is made and baked into the total:
//!
//! ```text
//! total = requested + requested × rate        (1000.00 at 20% → 1200.00)
//! ```
//!
//! Payments use the same allocation as sales (append entry, clamp, derive
//! status) against principal and interest jointly. Loans have no line
//! items, no stock effect and no installment schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ids::{new_id, now};
use crate::money::Money;
use crate::payment::PaymentInput;
use crate::state::{Collection, LedgerState};
use crate::types::{Loan, LoanStatus, Payment, PaymentMethod};
use crate::validation::{
    normalize_text, validate_date_range, validate_name, validate_positive_amount, validate_text,
};

/// Input for a new loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub customer_name: String,
    pub requested_cents: i64,
    #[ts(as = "String")]
    pub loan_date: NaiveDate,
    #[ts(as = "String")]
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl LedgerState {
    /// Records a loan at the configured interest rate.
    pub fn create_loan(&mut self, input: NewLoan) -> CoreResult<Loan> {
        validate_name("customer name", &input.customer_name)?;
        validate_positive_amount("requested amount", input.requested_cents)?;
        validate_date_range("loan period", input.loan_date, input.due_date)?;
        validate_text("notes", input.notes.as_deref())?;

        let rate = self.config.loan_interest();
        let requested = Money::from_cents(input.requested_cents);
        let total = requested + requested.apply_rate(rate);
        let id = new_id();

        let loan = Loan {
            payment: Payment::new(&id, PaymentMethod::Cash, total),
            id,
            customer_name: input.customer_name.trim().to_string(),
            requested_cents: requested.cents(),
            interest_rate_bps: rate.bps(),
            total_cents: total.cents(),
            loan_date: input.loan_date,
            due_date: input.due_date,
            status: LoanStatus::Pending,
            notes: normalize_text(input.notes),
            created_at: now(),
        };

        self.loans.insert(0, loan.clone());
        self.touch(Collection::Loans);
        Ok(loan)
    }

    /// Registers a repayment. The loan becomes `Paid` once its payment is.
    pub fn register_loan_payment(&mut self, loan_id: &str, input: PaymentInput) -> CoreResult<Loan> {
        let index = self.loan_index(loan_id)?;
        let entry = input.into_entry()?;

        let loan = &mut self.loans[index];
        loan.payment.record(entry);
        sync_loan_status(loan);

        let updated = loan.clone();
        self.touch(Collection::Loans);
        Ok(updated)
    }

    /// Registers the whole outstanding balance.
    pub fn settle_loan(&mut self, loan_id: &str, date: NaiveDate) -> CoreResult<Loan> {
        let index = self.loan_index(loan_id)?;
        let outstanding = self.loans[index].payment.outstanding();

        if !outstanding.exceeds_tolerance() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "loan is already paid".to_string(),
            });
        }

        self.register_loan_payment(loan_id, PaymentInput::new(outstanding.cents(), date))
    }

    pub fn remove_loan(&mut self, loan_id: &str) -> CoreResult<Loan> {
        let index = self.loan_index(loan_id)?;
        let removed = self.loans.remove(index);
        self.touch(Collection::Loans);
        Ok(removed)
    }

    /// Unpaid loans past their due date, oldest due date first.
    pub fn overdue_loans(&self, today: NaiveDate) -> Vec<&Loan> {
        let mut overdue: Vec<&Loan> = self.loans.iter().filter(|l| l.is_overdue(today)).collect();
        overdue.sort_by_key(|l| l.due_date);
        overdue
    }

    fn loan_index(&self, loan_id: &str) -> CoreResult<usize> {
        self.loans
            .iter()
            .position(|l| l.id == loan_id)
            .ok_or_else(|| CoreError::LoanNotFound(loan_id.to_string()))
    }
}

pub(crate) fn sync_loan_status(loan: &mut Loan) {
    loan.status = if loan.payment.is_paid() {
        LoanStatus::Paid
    } else {
        LoanStatus::Pending
    };
}
