//! # Record Migration
//!
//! Stored collections are JSON arrays written by older versions of the
//! shop as well as this one. Before they become typed records, every entry
//! goes through a per-kind migration that back-fills missing fields and
//! re-derives everything the engine derives itself.
//!
//! ## Load Pipeline
//! ```text
//!   payload (string)
//!        │  parse          not JSON / not an array ──► empty collection
//!        ▼                                             (discarded = true)
//!   [ entry, entry, ... ]
//!        │  per entry      not an object, missing id or name,
//!        ▼                 undeserializable ──► entry dropped, reason kept
//!   back-fill legacy fields (decimal amounts, flat sale shape, payment)
//!        │
//!        ▼
//!   serde → typed record → Payment::sync / status re-derivation
//! ```
//!
//! ## Legacy Shapes
//! - Amounts stored as decimals (`total: 150.5`) become `totalCents: 15050`.
//! - Sales without `items` carry one product at the top level
//!   (`productId`, `productName`, `quantity`, `unitPrice`).
//! - Sales and loans without a `payment` get one synthesized. Its
//!   installments fall due counting from the record's `createdAt`.
//! - Timestamps stored where a calendar date belongs keep only the date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::LedgerConfig;
use crate::error::RecordError;
use crate::ids::{new_id, now, receipt_number, today};
use crate::loan::sync_loan_status;
use crate::money::Money;
use crate::payment::schedule_installments;
use crate::sale::sync_sale_status;
use crate::state::{Collection, Collections};
use crate::types::{
    CashMovement, Customer, Loan, Payment, PaymentEntry, PaymentMethod, Product, Purchase, Rate,
    ReinvestmentGoal, Sale, SaleStatus,
};

/// Note on entries synthesized for balances that had no entry history.
pub const MIGRATED_BALANCE_NOTE: &str = "Balance carried over";

type Object = Map<String, Value>;

// =============================================================================
// Results
// =============================================================================

/// One stored entry that did not survive migration.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRecord {
    /// Position in the stored array.
    pub index: usize,
    /// The entry's id, when it had a readable one.
    pub id: Option<String>,
    pub error: RecordError,
}

/// A migrated collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub dropped: Vec<DroppedRecord>,
    /// The payload was not an array and was replaced by an empty collection.
    pub discarded: bool,
}

impl<T> Loaded<T> {
    fn discarded() -> Self {
        Loaded {
            records: Vec::new(),
            dropped: Vec::new(),
            discarded: true,
        }
    }

    /// Nothing was dropped or discarded.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && !self.discarded
    }
}

/// Everything the migration of a full ledger had to throw away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    pub dropped: Vec<(Collection, DroppedRecord)>,
    pub discarded: Vec<Collection>,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.discarded.is_empty()
    }

    fn absorb<T>(&mut self, collection: Collection, loaded: Loaded<T>) -> Vec<T> {
        if loaded.discarded {
            self.discarded.push(collection);
        }
        self.dropped
            .extend(loaded.dropped.into_iter().map(|d| (collection, d)));
        loaded.records
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Migrates every collection. `payload` returns the stored text for a
/// collection, or `None` if nothing was ever stored under it.
pub fn migrate_collections(
    config: &LedgerConfig,
    mut payload: impl FnMut(Collection) -> Option<String>,
) -> (Collections, MigrationReport) {
    let mut report = MigrationReport::default();
    let mut value = |collection: Collection| match payload(collection) {
        Some(text) => parse_payload(&text),
        None => Value::Array(Vec::new()),
    };

    let products = migrate_products(value(Collection::Products));
    let sales = migrate_sales(value(Collection::Sales), config);
    let loans = migrate_loans(value(Collection::Loans), config);
    let movements = migrate_movements(value(Collection::CashMovements));
    let purchases = migrate_purchases(value(Collection::Purchases));
    let goals = migrate_goals(value(Collection::ReinvestmentGoals));
    let customers = migrate_customers(value(Collection::Customers));

    let collections = Collections {
        products: report.absorb(Collection::Products, products),
        sales: report.absorb(Collection::Sales, sales),
        loans: report.absorb(Collection::Loans, loans),
        cash_movements: report.absorb(Collection::CashMovements, movements),
        purchases: report.absorb(Collection::Purchases, purchases),
        goals: report.absorb(Collection::ReinvestmentGoals, goals),
        customers: report.absorb(Collection::Customers, customers),
    };
    (collections, report)
}

/// Parses stored text. Anything that is not JSON becomes `Null`, which
/// migrates to a discarded collection.
pub fn parse_payload(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or(Value::Null)
}

pub fn migrate_products(value: Value) -> Loaded<Product> {
    migrate_each(value, migrate_product)
}

pub fn migrate_sales(value: Value, config: &LedgerConfig) -> Loaded<Sale> {
    migrate_each(value, |entry| migrate_sale(entry, config))
}

pub fn migrate_loans(value: Value, config: &LedgerConfig) -> Loaded<Loan> {
    migrate_each(value, |entry| migrate_loan(entry, config))
}

pub fn migrate_movements(value: Value) -> Loaded<CashMovement> {
    migrate_each(value, migrate_movement)
}

pub fn migrate_purchases(value: Value) -> Loaded<Purchase> {
    migrate_each(value, migrate_purchase)
}

/// Goals, with at most one left active (the first one stored).
pub fn migrate_goals(value: Value) -> Loaded<ReinvestmentGoal> {
    let mut loaded = migrate_each(value, migrate_goal);
    let mut seen_active = false;
    for goal in loaded.records.iter_mut().filter(|g| g.active) {
        if seen_active {
            goal.active = false;
        }
        seen_active = true;
    }
    loaded
}

pub fn migrate_customers(value: Value) -> Loaded<Customer> {
    migrate_each(value, migrate_customer)
}

fn migrate_each<T>(value: Value, mut migrate: impl FnMut(Object) -> Result<T, RecordError>) -> Loaded<T> {
    let Value::Array(entries) = value else {
        return Loaded::discarded();
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut dropped = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let id = entry.get("id").and_then(Value::as_str).map(str::to_string);
        let result = match entry {
            Value::Object(object) => migrate(object),
            _ => Err(RecordError::NotAnObject),
        };
        match result {
            Ok(record) => records.push(record),
            Err(error) => dropped.push(DroppedRecord { index, id, error }),
        }
    }

    Loaded {
        records,
        dropped,
        discarded: false,
    }
}

// =============================================================================
// Per-Kind Migrations
// =============================================================================

fn migrate_product(mut object: Object) -> Result<Product, RecordError> {
    require_text(&object, "id")?;
    require_text(&object, "name")?;
    fill_cents(&mut object, "costCents", "cost");
    fill_cents(&mut object, "priceCents", "price");
    fill_default(&mut object, "category", Value::from("misc"));
    fill_default(&mut object, "quantity", Value::from(0));
    fill_created_at(&mut object);
    date_only(&mut object, "acquiredOn");
    fill_default(&mut object, "acquiredOn", Value::from(today().to_string()));

    let mut product: Product = from_object(object)?;
    product.quantity = product.quantity.max(0);
    Ok(product)
}

fn migrate_sale(mut object: Object, config: &LedgerConfig) -> Result<Sale, RecordError> {
    let id = require_text(&object, "id")?;
    require_text(&object, "customerName")?;

    if !object.contains_key("items") {
        let line = legacy_sale_line(&mut object)?;
        object.insert("items".to_string(), Value::Array(vec![line]));
    }
    if let Some(Value::Array(items)) = object.get_mut("items") {
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            fill_cents(item, "unitPriceCents", "unitPrice");
            fill_default(item, "productName", Value::from(crate::state::UNKNOWN_PRODUCT));
        }
    }

    fill_cents(&mut object, "totalCents", "total");
    if !object.contains_key("totalCents") {
        let total = sum_lines(&object, "unitPriceCents");
        object.insert("totalCents".to_string(), Value::from(total));
    }
    fill_default(&mut object, "installmentCount", Value::from(1));
    fill_default(&mut object, "status", Value::from("pending"));
    fill_created_at(&mut object);
    date_only(&mut object, "saleDate");
    if !object.contains_key("receiptNumber") {
        object.insert("receiptNumber".to_string(), Value::from(receipt_number(now())));
    }

    let total = Money::from_cents(field::<i64>(&object, "totalCents")?);
    let method: PaymentMethod = field(&object, "paymentMethod")?;
    let sale_date: NaiveDate = field(&object, "saleDate")?;
    let created_at: DateTime<Utc> = field(&object, "createdAt")?;

    // A flat list of entries beside the sale predates the payment object
    let loose_entries = object.remove("paymentEntries");
    let payment = match object.remove("payment") {
        Some(Value::Object(stored)) => {
            let mut stored = stored;
            if let Some(entries) = loose_entries {
                fill_default(&mut stored, "entries", entries);
            }
            stored_payment(stored, &id, method, total, sale_date)?
        }
        Some(Value::Null) | None => {
            let status: SaleStatus = field(&object, "status")?;
            let count: u32 = field(&object, "installmentCount")?;
            let payment = if method.settles_immediately() || status == SaleStatus::Completed {
                Payment::paid_at_creation(&id, method, total, sale_date)
            } else {
                Payment::new(&id, method, total)
            };
            payment.with_installments(schedule_installments(
                total,
                count,
                created_at.date_naive(),
                config.installment_interval_days,
            ))
        }
        Some(other) => {
            return Err(RecordError::Invalid {
                field: "payment",
                reason: format!("expected an object, found {}", other),
            })
        }
    };
    object.insert("payment".to_string(), to_value(&payment)?);

    let mut sale: Sale = from_object(object)?;
    if sale.items.is_empty() {
        return Err(RecordError::Invalid {
            field: "items",
            reason: "a sale needs at least one item".to_string(),
        });
    }
    sale.installment_count = sale.installment_count.max(1);
    sync_sale_status(&mut sale);
    Ok(sale)
}

fn migrate_loan(mut object: Object, config: &LedgerConfig) -> Result<Loan, RecordError> {
    let id = require_text(&object, "id")?;
    require_text(&object, "customerName")?;

    fill_cents(&mut object, "requestedCents", "requested");
    fill_cents(&mut object, "totalCents", "total");
    fill_default(&mut object, "interestRateBps", Value::from(config.loan_interest_bps));
    if !object.contains_key("totalCents") {
        let requested = Money::from_cents(field::<i64>(&object, "requestedCents")?);
        let rate = Rate::from_bps(field::<u32>(&object, "interestRateBps")?);
        let total = requested + requested.apply_rate(rate);
        object.insert("totalCents".to_string(), Value::from(total.cents()));
    }
    fill_default(&mut object, "status", Value::from("pending"));
    fill_created_at(&mut object);
    date_only(&mut object, "loanDate");
    date_only(&mut object, "dueDate");

    let total = Money::from_cents(field::<i64>(&object, "totalCents")?);
    let loan_date: NaiveDate = field(&object, "loanDate")?;
    let payment = match object.remove("payment") {
        Some(Value::Object(stored)) => {
            stored_payment(stored, &id, PaymentMethod::Cash, total, loan_date)?
        }
        _ => Payment::new(&id, PaymentMethod::Cash, total),
    };
    object.insert("payment".to_string(), to_value(&payment)?);

    let mut loan: Loan = from_object(object)?;
    sync_loan_status(&mut loan);
    Ok(loan)
}

fn migrate_movement(mut object: Object) -> Result<CashMovement, RecordError> {
    require_text(&object, "id")?;
    require_text(&object, "description")?;
    fill_cents(&mut object, "amountCents", "amount");
    fill_created_at(&mut object);
    date_only(&mut object, "date");

    // Placeholders; both are re-derived from the type below
    fill_default(&mut object, "channel", Value::from("physical_cash"));
    fill_default(&mut object, "direction", Value::from("inflow"));

    let mut movement: CashMovement = from_object(object)?;
    movement.channel = movement.movement_type.channel();
    movement.direction = movement.movement_type.direction();
    movement.amount_cents = movement.amount_cents.abs();
    Ok(movement)
}

fn migrate_purchase(mut object: Object) -> Result<Purchase, RecordError> {
    require_text(&object, "id")?;
    require_text(&object, "supplier")?;
    if let Some(Value::Array(items)) = object.get_mut("items") {
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            fill_cents(item, "unitCostCents", "unitCost");
        }
    }
    fill_cents(&mut object, "totalCents", "total");
    if !object.contains_key("totalCents") {
        let total = sum_lines(&object, "unitCostCents");
        object.insert("totalCents".to_string(), Value::from(total));
    }
    fill_created_at(&mut object);
    date_only(&mut object, "purchaseDate");

    from_object(object)
}

fn migrate_goal(mut object: Object) -> Result<ReinvestmentGoal, RecordError> {
    require_text(&object, "id")?;
    if !object.contains_key("targetBps") {
        let percentage = object
            .get("targetPercentage")
            .and_then(Value::as_f64)
            .ok_or(RecordError::MissingField("targetBps"))?;
        let bps = Rate::from_percentage(percentage).bps();
        object.insert("targetBps".to_string(), Value::from(bps));
    }
    fill_default(&mut object, "active", Value::Bool(false));
    fill_created_at(&mut object);
    date_only(&mut object, "startsOn");
    date_only(&mut object, "endsOn");

    from_object(object)
}

fn migrate_customer(mut object: Object) -> Result<Customer, RecordError> {
    require_text(&object, "id")?;
    require_text(&object, "name")?;
    fill_cents(&mut object, "totalSpentCents", "totalSpent");
    fill_default(&mut object, "totalSpentCents", Value::from(0));
    fill_default(&mut object, "purchaseCount", Value::from(0));

    from_object(object)
}

// =============================================================================
// Helpers
// =============================================================================

/// Back-fills a stored payment from its owner and normalizes it.
fn stored_payment(
    mut stored: Object,
    owner_id: &str,
    method: PaymentMethod,
    total: Money,
    fallback_date: NaiveDate,
) -> Result<Payment, RecordError> {
    fill_default(&mut stored, "id", Value::from(new_id()));
    fill_default(&mut stored, "ownerId", Value::from(owner_id));
    fill_default(&mut stored, "method", to_value(&method)?);
    fill_cents(&mut stored, "receivedCents", "received");
    fill_default(&mut stored, "receivedCents", Value::from(0));
    fill_default(&mut stored, "status", Value::from("pending"));
    stored.insert("totalCents".to_string(), Value::from(total.cents()));
    if let Some(Value::Array(entries)) = stored.get_mut("entries") {
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            fill_cents(entry, "amountCents", "amount");
            fill_default(entry, "id", Value::from(new_id()));
            date_only(entry, "date");
        }
    }
    if let Some(Value::Array(installments)) = stored.get_mut("installments") {
        for installment in installments.iter_mut().filter_map(Value::as_object_mut) {
            fill_cents(installment, "amountCents", "amount");
            fill_default(installment, "paid", Value::Bool(false));
            date_only(installment, "dueDate");
            date_only(installment, "paidOn");
        }
    }

    let mut payment: Payment = from_object(stored)?;

    // Entries are the source of truth; a balance without them gets one
    if payment.entries.is_empty() {
        let carried = if payment.is_paid() {
            total
        } else {
            payment.received()
        };
        if carried.is_positive() {
            payment.entries.push(PaymentEntry {
                id: new_id(),
                amount_cents: carried.cents(),
                date: fallback_date,
                note: Some(MIGRATED_BALANCE_NOTE.to_string()),
            });
        }
    }
    payment.sync();
    Ok(payment)
}

/// Builds the single item of a legacy flat sale.
fn legacy_sale_line(object: &mut Object) -> Result<Value, RecordError> {
    let product_id = object
        .remove("productId")
        .filter(|v| v.as_str().map_or(false, |s| !s.trim().is_empty()))
        .ok_or(RecordError::MissingField("items"))?;

    let mut line = Object::new();
    line.insert("productId".to_string(), product_id);
    for key in ["productName", "quantity", "unitPriceCents", "unitPrice"] {
        if let Some(value) = object.remove(key) {
            line.insert(key.to_string(), value);
        }
    }
    fill_default(&mut line, "quantity", Value::from(1));
    Ok(Value::Object(line))
}

/// Σ quantity × `unit_key` over the entries of `items`.
fn sum_lines(object: &Object, unit_key: &str) -> i64 {
    object
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let quantity = item.get("quantity").and_then(Value::as_i64).unwrap_or(0);
                    let unit = item.get(unit_key).and_then(Value::as_i64).unwrap_or(0);
                    quantity * unit
                })
                .sum()
        })
        .unwrap_or(0)
}

fn require_text(object: &Object, key: &'static str) -> Result<String, RecordError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(RecordError::MissingField(key))
}

/// Inserts `value` when `key` is absent or null.
fn fill_default(object: &mut Object, key: &str, value: Value) {
    if object.get(key).map_or(true, Value::is_null) {
        object.insert(key.to_string(), value);
    }
}

/// Converts a decimal amount under `legacy_key` into integer cents under
/// `cents_key`, unless cents are already present.
fn fill_cents(object: &mut Object, cents_key: &str, legacy_key: &str) {
    if object.get(cents_key).map_or(false, |v| !v.is_null()) {
        return;
    }
    let cents = object
        .get(legacy_key)
        .and_then(Value::as_f64)
        .and_then(Money::from_decimal);
    if let Some(cents) = cents {
        object.insert(cents_key.to_string(), Value::from(cents.cents()));
    }
}

fn fill_created_at(object: &mut Object) {
    fill_default(object, "createdAt", Value::from(now().to_rfc3339()));
}

/// `2026-03-01T12:00:00Z` → `2026-03-01`.
fn date_only(object: &mut Object, key: &str) {
    if let Some(Value::String(text)) = object.get_mut(key) {
        if let Some((date, _)) = text.split_once('T') {
            *text = date.to_string();
        }
    }
}

fn field<T: DeserializeOwned>(object: &Object, key: &'static str) -> Result<T, RecordError> {
    let value = object.get(key).ok_or(RecordError::MissingField(key))?;
    serde_json::from_value(value.clone()).map_err(|e| RecordError::Invalid {
        field: key,
        reason: e.to_string(),
    })
}

fn from_object<T: DeserializeOwned>(object: Object) -> Result<T, RecordError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| RecordError::Malformed(e.to_string()))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, RecordError> {
    serde_json::to_value(value).map_err(|e| RecordError::Malformed(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::NewGoal;
    use crate::loan::tests::new_loan;
    use crate::payment::PaymentInput;
    use crate::sale::tests::{day, new_sale, stocked_ledger};
    use crate::sale::SaleLine;
    use crate::state::LedgerState;
    use crate::types::{Channel, LoanStatus, PaymentStatus};
    use serde_json::json;

    fn config() -> LedgerConfig {
        LedgerConfig::default()
    }

    fn reload(ledger: &LedgerState) -> (Collections, MigrationReport) {
        migrate_collections(ledger.config(), |collection| {
            ledger.collection_json(collection).ok()
        })
    }

    #[test]
    fn test_current_records_survive_a_reload_unchanged() {
        let (mut ledger, jacket, case) = stocked_ledger();
        let sale = ledger
            .create_sale(new_sale(
                vec![SaleLine::new(&jacket, 1), SaleLine::new(&case, 2)],
                "Ana",
                PaymentMethod::Installment,
                3,
                day(2026, 3, 1),
            ))
            .unwrap();
        ledger
            .register_sale_payment(&sale.id, PaymentInput::new(9000, day(2026, 3, 20)))
            .unwrap();
        let cancelled = ledger
            .create_sale(new_sale(
                vec![SaleLine::new(&case, 1)],
                "Bia",
                PaymentMethod::Cash,
                1,
                day(2026, 3, 2),
            ))
            .unwrap();
        ledger.cancel_sale(&cancelled.id).unwrap();
        let loan = ledger.create_loan(new_loan("Caio", 50_000)).unwrap();
        ledger
            .register_loan_payment(&loan.id, PaymentInput::new(10_000, day(2026, 2, 15)))
            .unwrap();
        ledger
            .create_goal(NewGoal {
                target_bps: 2500,
                starts_on: day(2026, 3, 1),
                ends_on: day(2026, 3, 31),
                active: true,
                notes: Some("spring".into()),
            })
            .unwrap();

        let (collections, report) = reload(&ledger);
        assert!(report.is_clean(), "{:?}", report);
        assert_eq!(collections, ledger.snapshot());
    }

    #[test]
    fn test_non_array_payload_is_discarded() {
        let loaded = migrate_products(json!({"products": []}));
        assert!(loaded.discarded);
        assert!(loaded.records.is_empty());

        let loaded = migrate_products(parse_payload("not json"));
        assert!(loaded.discarded);
    }

    #[test]
    fn test_missing_collection_is_empty_not_discarded() {
        let (collections, report) = migrate_collections(&config(), |_| None);
        assert!(report.is_clean());
        assert_eq!(collections, Collections::default());
    }

    #[test]
    fn test_bad_entries_are_dropped_individually() {
        let loaded = migrate_products(json!([
            {"id": "p1", "name": "Scarf", "category": "clothing", "costCents": 1000,
             "priceCents": 2500, "quantity": 4, "acquiredOn": "2026-01-05"},
            {"id": "p2", "category": "misc"},
            "garbage",
            {"id": "p3", "name": "Cable", "category": "spaceship"},
        ]));

        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].id, "p1");
        assert!(!loaded.discarded);
        assert_eq!(loaded.dropped.len(), 3);
        assert_eq!(loaded.dropped[0].index, 1);
        assert_eq!(loaded.dropped[0].error, RecordError::MissingField("name"));
        assert_eq!(loaded.dropped[1].error, RecordError::NotAnObject);
        assert_eq!(loaded.dropped[1].id, None);
        assert_eq!(loaded.dropped[2].id.as_deref(), Some("p3"));
        assert!(matches!(loaded.dropped[2].error, RecordError::Malformed(_)));
    }

    #[test]
    fn test_product_legacy_amounts_and_negative_stock() {
        let loaded = migrate_products(json!([
            {"id": "p1", "name": "Scarf", "cost": 10.5, "price": 25,
             "quantity": -2, "acquiredOn": "2026-01-05T10:00:00.000Z"}
        ]));
        let product = &loaded.records[0];
        assert_eq!(product.cost_cents, 1050);
        assert_eq!(product.price_cents, 2500);
        assert_eq!(product.quantity, 0);
        assert_eq!(product.acquired_on, day(2026, 1, 5));
    }

    #[test]
    fn test_legacy_flat_cash_sale() {
        let loaded = migrate_sales(
            json!([{
                "id": "s1",
                "customerName": "Ana",
                "productId": "p1",
                "productName": "Scarf",
                "quantity": 2,
                "unitPrice": 25.0,
                "saleDate": "2026-02-10",
                "paymentMethod": "cash",
                "status": "completed"
            }]),
            &config(),
        );
        assert!(loaded.is_clean(), "{:?}", loaded.dropped);

        let sale = &loaded.records[0];
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].unit_price_cents, 2500);
        assert_eq!(sale.total_cents, 5000);
        assert_eq!(sale.installment_count, 1);
        assert!(sale.receipt_number.starts_with("REC-"));
        assert_eq!(sale.payment.status, PaymentStatus::Paid);
        assert_eq!(sale.payment.received_cents, 5000);
        assert_eq!(sale.payment.entries.len(), 1);
        assert_eq!(sale.payment.owner_id, "s1");
        assert_eq!(sale.status, SaleStatus::Completed);
    }

    #[test]
    fn test_sale_without_payment_on_installments() {
        let loaded = migrate_sales(
            json!([{
                "id": "s2",
                "customerName": "Bruno",
                "items": [{"productId": "p1", "productName": "Scarf", "quantity": 1, "unitPriceCents": 9000}],
                "saleDate": "2026-02-10",
                "paymentMethod": "installment",
                "installmentCount": 3,
                "status": "pending",
                "createdAt": "2026-02-10T09:30:00Z"
            }]),
            &config(),
        );
        let sale = &loaded.records[0];
        assert_eq!(sale.total_cents, 9000);
        assert_eq!(sale.payment.status, PaymentStatus::Pending);
        assert!(sale.payment.entries.is_empty());
        assert_eq!(sale.payment.installments.len(), 3);
        assert_eq!(sale.payment.installments[0].due_date, day(2026, 3, 12));
        assert_eq!(sale.status, SaleStatus::Pending);
    }

    #[test]
    fn test_paid_payment_without_entries_gets_one() {
        let loaded = migrate_sales(
            json!([{
                "id": "s3",
                "customerName": "Caio",
                "items": [{"productId": "p1", "productName": "Scarf", "quantity": 1, "unitPriceCents": 4000}],
                "totalCents": 4000,
                "saleDate": "2026-02-10",
                "paymentMethod": "card",
                "status": "pending",
                "payment": {"receivedCents": 3999, "status": "paid"}
            }]),
            &config(),
        );
        let sale = &loaded.records[0];
        assert_eq!(sale.payment.entries.len(), 1);
        assert_eq!(sale.payment.entries[0].amount_cents, 4000);
        assert_eq!(sale.payment.received_cents, 4000);
        assert_eq!(sale.status, SaleStatus::Completed);
    }

    #[test]
    fn test_stale_received_is_rederived_from_entries() {
        let loaded = migrate_sales(
            json!([{
                "id": "s4",
                "customerName": "Dora",
                "items": [{"productId": "p1", "productName": "Scarf", "quantity": 1, "unitPriceCents": 10000}],
                "totalCents": 10000,
                "saleDate": "2026-02-10",
                "paymentMethod": "card",
                "status": "pending",
                "payment": {
                    "receivedCents": 0,
                    "status": "pending",
                    "entries": [
                        {"amount": 40.0, "date": "2026-02-11"},
                        {"amountCents": 6000, "date": "2026-02-12T08:00:00Z"}
                    ]
                }
            }]),
            &config(),
        );
        let sale = &loaded.records[0];
        assert_eq!(sale.payment.received_cents, 10000);
        assert_eq!(sale.payment.status, PaymentStatus::Paid);
        assert_eq!(sale.payment.entries[1].date, day(2026, 2, 12));
        assert_eq!(sale.status, SaleStatus::Completed);
    }

    #[test]
    fn test_cancelled_sale_stays_cancelled() {
        let loaded = migrate_sales(
            json!([{
                "id": "s5",
                "customerName": "Eva",
                "items": [{"productId": "p1", "productName": "Scarf", "quantity": 1, "unitPriceCents": 1000}],
                "saleDate": "2026-02-10",
                "paymentMethod": "cash",
                "status": "cancelled"
            }]),
            &config(),
        );
        assert_eq!(loaded.records[0].status, SaleStatus::Cancelled);
    }

    #[test]
    fn test_sale_without_product_is_dropped() {
        let loaded = migrate_sales(
            json!([{"id": "s6", "customerName": "Eva", "saleDate": "2026-02-10", "paymentMethod": "cash"}]),
            &config(),
        );
        assert_eq!(loaded.dropped[0].error, RecordError::MissingField("items"));
    }

    #[test]
    fn test_loan_without_payment() {
        let loaded = migrate_loans(
            json!([{
                "id": "l1",
                "customerName": "Diego",
                "requested": 1000.0,
                "loanDate": "2026-02-01",
                "dueDate": "2026-03-01",
                "status": "paid"
            }]),
            &config(),
        );
        let loan = &loaded.records[0];
        assert_eq!(loan.requested_cents, 100_000);
        assert_eq!(loan.total_cents, 120_000);
        assert_eq!(loan.interest_rate_bps, 2000);
        assert_eq!(loan.payment.status, PaymentStatus::Pending);
        // status follows the (synthesized) payment
        assert_eq!(loan.status, LoanStatus::Pending);
    }

    #[test]
    fn test_movement_channel_follows_type() {
        let loaded = migrate_movements(json!([{
            "id": "m1",
            "movementType": "expense_transfer",
            "channel": "physical_cash",
            "direction": "inflow",
            "description": "Internet",
            "amount": 99.9,
            "date": "2026-02-01"
        }]));
        let movement = &loaded.records[0];
        assert_eq!(movement.channel, Channel::Electronic);
        assert_eq!(movement.direction, crate::types::Direction::Outflow);
        assert_eq!(movement.amount_cents, 9990);
    }

    #[test]
    fn test_only_first_active_goal_stays_active() {
        let loaded = migrate_goals(json!([
            {"id": "g1", "targetPercentage": 30, "startsOn": "2026-03-01", "endsOn": "2026-03-31", "active": true},
            {"id": "g2", "targetBps": 2000, "startsOn": "2026-04-01", "endsOn": "2026-04-30", "active": true},
            {"id": "g3", "targetBps": 1000, "startsOn": "2026-05-01", "endsOn": "2026-05-31"}
        ]));
        let active: Vec<&str> = loaded
            .records
            .iter()
            .filter(|g| g.active)
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(active, vec!["g1"]);
        assert_eq!(loaded.records[0].target_bps, 3000);
        assert!(!loaded.records[2].active);
    }

    #[test]
    fn test_purchase_and_customer_back_fill() {
        let loaded = migrate_purchases(json!([{
            "id": "u1",
            "supplier": "Atacado",
            "items": [{"productName": "Bags", "quantity": 10, "unitCost": 0.5}],
            "purchaseDate": "2026-02-01",
            "paymentMethod": "instant_transfer"
        }]));
        assert_eq!(loaded.records[0].total_cents, 500);
        assert_eq!(loaded.records[0].items[0].product_id, None);

        let loaded = migrate_customers(json!([{"id": "c1", "name": "Ana", "totalSpent": 12.5}]));
        assert_eq!(loaded.records[0].total_spent_cents, 1250);
        assert_eq!(loaded.records[0].purchase_count, 0);

        let loaded = migrate_customers(json!([{"id": "c2", "name": "   "}]));
        assert_eq!(loaded.dropped[0].error, RecordError::MissingField("name"));
    }

    #[test]
    fn test_report_collects_drops_per_collection() {
        let (collections, report) = migrate_collections(&config(), |collection| match collection {
            Collection::Customers => Some(r#"[{"id": "c1"}, {"id": "c2", "name": "Ana"}]"#.to_string()),
            Collection::Loans => Some("{}".to_string()),
            _ => None,
        });
        assert_eq!(collections.customers.len(), 1);
        assert_eq!(report.discarded, vec![Collection::Loans]);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].0, Collection::Customers);
        assert!(!report.is_clean());

        let kept = report.clone();
        assert_eq!(kept, report);
        assert_eq!(kept.dropped[0].1.error, RecordError::MissingField("name"));
    }
}
