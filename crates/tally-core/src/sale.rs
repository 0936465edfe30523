//! # Sale Lifecycle
//!
//! Creating sales, taking payments against them, and the edits the shop
//! makes afterwards.
//!
//! ## Creating a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale(NewSale)                                                   │
//! │                                                                         │
//! │  lines ──► resolve products ──► snapshot name + price                   │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                         total = Σ quantity × unit price                 │
//! │                                      │                                  │
//! │            ┌─────────────────────────┴──────────────────────┐           │
//! │            ▼                                                ▼           │
//! │   cash / instant transfer                          card / installments  │
//! │   received = total, Paid                           received = 0         │
//! │   entry "Paid at creation"                         Pending              │
//! │   sale Completed                                   sale Pending         │
//! │            └─────────────────────────┬──────────────────────┘           │
//! │                                      ▼                                  │
//! │            installment_count > 1 → equal-split schedule                 │
//! │            stock −= quantity (floored at 0)                             │
//! │            customer upserted (count + 1, spent + total)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is not checked here. The caller runs
//! [`LedgerState::check_stock`] before offering the sale.
//!
//! Sales never create cash movements; the shop records proceeds in the
//! cash ledger explicitly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ids::{new_id, now, receipt_number};
use crate::money::Money;
use crate::payment::{schedule_installments, PaymentInput};
use crate::state::{Collection, LedgerState};
use crate::types::{Payment, PaymentMethod, Sale, SaleItem, SaleStatus};
use crate::validation::{
    normalize_text, validate_installment_count, validate_line_count, validate_name,
    validate_price_cents, validate_quantity, validate_text,
};

// =============================================================================
// Inputs
// =============================================================================

/// One line of a sale as entered at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
    /// Overrides the catalog price for this sale (discounts).
    pub unit_price_cents: Option<i64>,
}

impl SaleLine {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        SaleLine {
            product_id: product_id.into(),
            quantity,
            unit_price_cents: None,
        }
    }
}

/// Input for a new sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub items: Vec<SaleLine>,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub installment_count: u32,
    pub notes: Option<String>,
}

/// Fields that may be edited on an existing sale.
///
/// Items and amounts are fixed once the sale exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetailsPatch {
    pub customer_contact: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

// =============================================================================
// Sale Intents
// =============================================================================

impl LedgerState {
    /// Records a sale.
    ///
    /// ## Side Effects
    /// - Sales: new sale at the front
    /// - Products: each referenced product's stock decremented (floored at 0)
    /// - Customers: buyer upserted by name
    ///
    /// ## Errors
    /// - `Validation` for bad names, quantities, counts or prices
    /// - `ProductNotFound` if a line references an unknown product
    ///
    /// Installments fall due every interval counting from the moment the
    /// sale is recorded, whatever date the sale itself carries.
    pub fn create_sale(&mut self, input: NewSale) -> CoreResult<Sale> {
        self.create_sale_at(input, now())
    }

    /// [`Self::create_sale`] with an explicit recording time.
    pub(crate) fn create_sale_at(
        &mut self,
        input: NewSale,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        validate_name("customer name", &input.customer_name)?;
        validate_text("customer contact", input.customer_contact.as_deref())?;
        validate_text("notes", input.notes.as_deref())?;
        validate_line_count("sale items", input.items.len())?;
        validate_installment_count(input.installment_count)?;

        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            validate_quantity(line.quantity)?;
            let product = self
                .product(&line.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;
            let unit_price_cents = line.unit_price_cents.unwrap_or(product.price_cents);
            validate_price_cents("unit price", unit_price_cents)?;

            items.push(SaleItem {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: line.quantity,
                unit_price_cents,
            });
        }

        let total: Money = items.iter().map(SaleItem::subtotal).sum();
        let id = new_id();

        let schedule = schedule_installments(
            total,
            input.installment_count,
            created_at.date_naive(),
            self.config.installment_interval_days,
        );
        let payment = if input.payment_method.settles_immediately() {
            Payment::paid_at_creation(&id, input.payment_method, total, input.sale_date)
        } else {
            Payment::new(&id, input.payment_method, total)
        };
        let payment = payment.with_installments(schedule);

        let status = if payment.is_paid() {
            SaleStatus::Completed
        } else {
            SaleStatus::Pending
        };

        let customer_name = input.customer_name.trim().to_string();
        let customer_contact = normalize_text(input.customer_contact);

        let sale = Sale {
            id,
            receipt_number: receipt_number(created_at),
            items,
            total_cents: total.cents(),
            customer_name,
            customer_contact,
            sale_date: input.sale_date,
            payment_method: input.payment_method,
            installment_count: input.installment_count,
            status,
            payment,
            notes: normalize_text(input.notes),
            created_at,
        };

        for item in &sale.items {
            self.adjust_stock(&item.product_id, -item.quantity);
        }
        self.upsert_customer(
            &sale.customer_name,
            sale.customer_contact.as_deref(),
            total,
            created_at,
        );
        self.sales.insert(0, sale.clone());

        self.touch(Collection::Sales);
        self.touch(Collection::Products);
        Ok(sale)
    }

    /// Registers a receipt against a sale.
    ///
    /// The entry is kept as entered; `received` is clamped to the total.
    /// The sale becomes `Completed` once its payment is paid. Cancelled
    /// sales take the payment but stay cancelled.
    pub fn register_sale_payment(&mut self, sale_id: &str, input: PaymentInput) -> CoreResult<Sale> {
        let index = self.sale_index(sale_id)?;
        let entry = input.into_entry()?;

        let sale = &mut self.sales[index];
        sale.payment.record(entry);
        sync_sale_status(sale);

        let updated = sale.clone();
        self.touch(Collection::Sales);
        Ok(updated)
    }

    /// Pays exactly what the next unpaid installment still needs.
    ///
    /// ## Errors
    /// - `SaleNotFound`
    /// - `InvalidPaymentAmount` when the sale has no unpaid installment
    pub fn pay_next_installment(&mut self, sale_id: &str, date: NaiveDate) -> CoreResult<Sale> {
        let index = self.sale_index(sale_id)?;
        let number = self.sales[index]
            .payment
            .next_unpaid_installment()
            .map(|inst| inst.number)
            .ok_or_else(|| CoreError::InvalidPaymentAmount {
                reason: "sale has no unpaid installment".to_string(),
            })?;
        self.pay_installment(sale_id, number, date)
    }

    /// Pays installment `number`.
    ///
    /// Receipts cover installments in order, so this registers whatever is
    /// still missing on every installment up to and including `number`.
    ///
    /// ## Errors
    /// - `SaleNotFound`
    /// - `InvalidPaymentAmount` when the sale has no such installment or it
    ///   is already paid
    pub fn pay_installment(&mut self, sale_id: &str, number: u32, date: NaiveDate) -> CoreResult<Sale> {
        let index = self.sale_index(sale_id)?;
        let payment = &self.sales[index].payment;

        let target = payment
            .installments
            .iter()
            .find(|inst| inst.number == number)
            .ok_or_else(|| CoreError::InvalidPaymentAmount {
                reason: format!("sale has no installment {}", number),
            })?;
        if target.paid {
            return Err(CoreError::InvalidPaymentAmount {
                reason: format!("installment {} is already paid", number),
            });
        }

        let through: Money = payment
            .installments
            .iter()
            .filter(|inst| inst.number <= number)
            .map(|inst| inst.amount())
            .sum();
        let needed = through - payment.received();

        let input = PaymentInput::new(needed.cents(), date)
            .with_note(format!("Installment {}", number));
        self.register_sale_payment(sale_id, input)
    }

    /// Registers the whole outstanding balance (the "mark as paid" action).
    ///
    /// ## Errors
    /// - `SaleNotFound`
    /// - `InvalidPaymentAmount` when nothing is owed
    pub fn settle_sale(&mut self, sale_id: &str, date: NaiveDate) -> CoreResult<Sale> {
        let index = self.sale_index(sale_id)?;
        let outstanding = self.sales[index].payment.outstanding();

        if !outstanding.exceeds_tolerance() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "sale is already paid".to_string(),
            });
        }

        self.register_sale_payment(sale_id, PaymentInput::new(outstanding.cents(), date))
    }

    /// Cancels a sale. Stock is not restored.
    pub fn cancel_sale(&mut self, sale_id: &str) -> CoreResult<Sale> {
        let index = self.sale_index(sale_id)?;

        let sale = &mut self.sales[index];
        sale.status = SaleStatus::Cancelled;

        let updated = sale.clone();
        self.touch(Collection::Sales);
        Ok(updated)
    }

    /// Edits contact and notes on a sale.
    pub fn update_sale_details(&mut self, sale_id: &str, patch: SaleDetailsPatch) -> CoreResult<Sale> {
        let index = self.sale_index(sale_id)?;

        if let Some(contact) = &patch.customer_contact {
            validate_text("customer contact", contact.as_deref())?;
        }
        if let Some(notes) = &patch.notes {
            validate_text("notes", notes.as_deref())?;
        }

        let sale = &mut self.sales[index];
        if let Some(contact) = patch.customer_contact {
            sale.customer_contact = normalize_text(contact);
        }
        if let Some(notes) = patch.notes {
            sale.notes = normalize_text(notes);
        }

        let updated = sale.clone();
        self.touch(Collection::Sales);
        Ok(updated)
    }

    /// Deletes a sale. Stock, customers and cash movements are untouched.
    pub fn remove_sale(&mut self, sale_id: &str) -> CoreResult<Sale> {
        let index = self.sale_index(sale_id)?;
        let removed = self.sales.remove(index);
        self.touch(Collection::Sales);
        Ok(removed)
    }

    fn sale_index(&self, sale_id: &str) -> CoreResult<usize> {
        self.sales
            .iter()
            .position(|s| s.id == sale_id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))
    }
}

/// Moves a non-cancelled sale between pending and completed to match its
/// payment.
pub(crate) fn sync_sale_status(sale: &mut Sale) {
    if sale.is_cancelled() {
        return;
    }
    sale.status = if sale.payment.is_paid() {
        SaleStatus::Completed
    } else {
        SaleStatus::Pending
    };
}

// =============================================================================
// Unit Tests
// =============================================================================
