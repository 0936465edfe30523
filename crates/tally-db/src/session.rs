//! # Ledger Session
//!
//! The controller between the presentation layer and the engine: it owns
//! the in-memory [`LedgerState`], applies one intent at a time and writes
//! back the collections that intent touched.
//!
//! ## Intent Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  session.create_sale(input)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LedgerState::create_sale ── Err ──► DbError::Ledger (nothing written)  │
//! │       │ Ok                                                              │
//! │       ▼                                                                 │
//! │  take_dirty() → [Sales, Products, Customers]                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  save_collections (one transaction)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(sale)                                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! If the write fails the intent has still happened in memory; the changed
//! collections stay pending and go out with the next successful save (or
//! [`LedgerSession::flush`]).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tally_core::cash::NewMovement;
use tally_core::customer::CustomerPatch;
use tally_core::goal::NewGoal;
use tally_core::inventory::{NewProduct, ProductPatch};
use tally_core::loan::NewLoan;
use tally_core::payment::PaymentInput;
use tally_core::purchase::NewPurchase;
use tally_core::sale::{NewSale, SaleDetailsPatch};
use tally_core::{
    CashMovement, Collection, CoreResult, Customer, LedgerConfig, LedgerState, Loan, Product,
    Purchase, ReinvestmentGoal, Sale,
};
use tracing::{debug, error, info};

use crate::error::DbResult;
use crate::loader::{load_state, save_collections};
use crate::pool::Database;

/// A loaded ledger bound to its database.
pub struct LedgerSession {
    db: Database,
    state: LedgerState,
    /// Collections changed in memory but not yet written.
    pending: BTreeSet<Collection>,
}

impl LedgerSession {
    /// Loads the ledger stored in `db`.
    pub async fn open(db: Database, config: LedgerConfig) -> DbResult<Self> {
        let state = load_state(&db, config).await?;
        info!("Ledger session opened");
        Ok(LedgerSession {
            db,
            state,
            pending: BTreeSet::new(),
        })
    }

    /// Read access for queries and reports.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Collections waiting to be written after a failed save.
    pub fn pending(&self) -> Vec<Collection> {
        self.pending.iter().copied().collect()
    }

    /// Applies an intent and persists what it changed.
    pub async fn apply<T>(
        &mut self,
        intent: impl FnOnce(&mut LedgerState) -> CoreResult<T>,
    ) -> DbResult<T> {
        let result = intent(&mut self.state);
        self.pending.extend(self.state.take_dirty());
        let value = result?;
        self.flush().await?;
        Ok(value)
    }

    /// Writes every pending collection.
    pub async fn flush(&mut self) -> DbResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let collections = self.pending();
        match save_collections(&self.db, &self.state, &collections).await {
            Ok(()) => {
                debug!(?collections, "Collections saved");
                self.pending.clear();
                Ok(())
            }
            Err(e) => {
                error!(?collections, error = %e, "Failed to save collections");
                Err(e)
            }
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn add_product(&mut self, input: NewProduct) -> DbResult<Product> {
        let product = self.apply(|s| s.add_product(input)).await?;
        debug!(product_id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    pub async fn update_product(&mut self, id: &str, patch: ProductPatch) -> DbResult<Product> {
        let product = self.apply(|s| s.update_product(id, patch)).await?;
        debug!(product_id = %id, "Product updated");
        Ok(product)
    }

    pub async fn remove_product(&mut self, id: &str) -> DbResult<Product> {
        let product = self.apply(|s| s.remove_product(id)).await?;
        debug!(product_id = %id, "Product removed");
        Ok(product)
    }

    // =========================================================================
    // Sales
    // =========================================================================

    pub async fn create_sale(&mut self, input: NewSale) -> DbResult<Sale> {
        let sale = self.apply(|s| s.create_sale(input)).await?;
        debug!(
            sale_id = %sale.id,
            receipt = %sale.receipt_number,
            total_cents = sale.total_cents,
            "Sale created"
        );
        Ok(sale)
    }

    pub async fn register_sale_payment(
        &mut self,
        sale_id: &str,
        input: PaymentInput,
    ) -> DbResult<Sale> {
        let amount = input.amount_cents;
        let sale = self.apply(|s| s.register_sale_payment(sale_id, input)).await?;
        debug!(
            sale_id = %sale_id,
            amount_cents = amount,
            status = ?sale.payment.status,
            "Sale payment registered"
        );
        Ok(sale)
    }

    pub async fn pay_next_installment(&mut self, sale_id: &str, date: NaiveDate) -> DbResult<Sale> {
        let sale = self.apply(|s| s.pay_next_installment(sale_id, date)).await?;
        debug!(sale_id = %sale_id, "Installment paid");
        Ok(sale)
    }

    pub async fn pay_installment(
        &mut self,
        sale_id: &str,
        number: u32,
        date: NaiveDate,
    ) -> DbResult<Sale> {
        let sale = self.apply(|s| s.pay_installment(sale_id, number, date)).await?;
        debug!(sale_id = %sale_id, installment = number, "Installment paid");
        Ok(sale)
    }

    pub async fn settle_sale(&mut self, sale_id: &str, date: NaiveDate) -> DbResult<Sale> {
        let sale = self.apply(|s| s.settle_sale(sale_id, date)).await?;
        debug!(sale_id = %sale_id, "Sale settled");
        Ok(sale)
    }

    pub async fn cancel_sale(&mut self, sale_id: &str) -> DbResult<Sale> {
        let sale = self.apply(|s| s.cancel_sale(sale_id)).await?;
        debug!(sale_id = %sale_id, "Sale cancelled");
        Ok(sale)
    }

    pub async fn update_sale_details(
        &mut self,
        sale_id: &str,
        patch: SaleDetailsPatch,
    ) -> DbResult<Sale> {
        self.apply(|s| s.update_sale_details(sale_id, patch)).await
    }

    pub async fn remove_sale(&mut self, sale_id: &str) -> DbResult<Sale> {
        let sale = self.apply(|s| s.remove_sale(sale_id)).await?;
        debug!(sale_id = %sale_id, "Sale removed");
        Ok(sale)
    }

    // =========================================================================
    // Loans
    // =========================================================================

    pub async fn create_loan(&mut self, input: NewLoan) -> DbResult<Loan> {
        let loan = self.apply(|s| s.create_loan(input)).await?;
        debug!(
            loan_id = %loan.id,
            total_cents = loan.total_cents,
            "Loan created"
        );
        Ok(loan)
    }

    pub async fn register_loan_payment(
        &mut self,
        loan_id: &str,
        input: PaymentInput,
    ) -> DbResult<Loan> {
        let amount = input.amount_cents;
        let loan = self.apply(|s| s.register_loan_payment(loan_id, input)).await?;
        debug!(
            loan_id = %loan_id,
            amount_cents = amount,
            status = ?loan.status,
            "Loan payment registered"
        );
        Ok(loan)
    }

    pub async fn settle_loan(&mut self, loan_id: &str, date: NaiveDate) -> DbResult<Loan> {
        let loan = self.apply(|s| s.settle_loan(loan_id, date)).await?;
        debug!(loan_id = %loan_id, "Loan settled");
        Ok(loan)
    }

    pub async fn remove_loan(&mut self, loan_id: &str) -> DbResult<Loan> {
        let loan = self.apply(|s| s.remove_loan(loan_id)).await?;
        debug!(loan_id = %loan_id, "Loan removed");
        Ok(loan)
    }

    // =========================================================================
    // Cash
    // =========================================================================

    pub async fn record_movement(&mut self, input: NewMovement) -> DbResult<CashMovement> {
        let movement = self.apply(|s| s.record_movement(input)).await?;
        debug!(
            movement_id = %movement.id,
            movement_type = ?movement.movement_type,
            amount_cents = movement.amount_cents,
            "Cash movement recorded"
        );
        Ok(movement)
    }

    pub async fn remove_movement(&mut self, movement_id: &str) -> DbResult<CashMovement> {
        let movement = self.apply(|s| s.remove_movement(movement_id)).await?;
        debug!(movement_id = %movement_id, "Cash movement removed");
        Ok(movement)
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    pub async fn create_purchase(&mut self, input: NewPurchase) -> DbResult<Purchase> {
        let purchase = self.apply(|s| s.create_purchase(input)).await?;
        debug!(
            purchase_id = %purchase.id,
            total_cents = purchase.total_cents,
            "Purchase recorded"
        );
        Ok(purchase)
    }

    /// Removes a purchase with its linked cash movements.
    pub async fn remove_purchase(&mut self, purchase_id: &str) -> DbResult<Purchase> {
        let (purchase, cascaded) = self.apply(|s| s.remove_purchase(purchase_id)).await?;
        debug!(purchase_id = %purchase_id, movements = cascaded, "Purchase removed");
        Ok(purchase)
    }

    // =========================================================================
    // Goals
    // =========================================================================

    pub async fn create_goal(&mut self, input: NewGoal) -> DbResult<ReinvestmentGoal> {
        let goal = self.apply(|s| s.create_goal(input)).await?;
        debug!(goal_id = %goal.id, active = goal.active, "Goal created");
        Ok(goal)
    }

    pub async fn activate_goal(&mut self, goal_id: &str) -> DbResult<ReinvestmentGoal> {
        self.apply(|s| s.activate_goal(goal_id)).await
    }

    pub async fn deactivate_goal(&mut self, goal_id: &str) -> DbResult<ReinvestmentGoal> {
        self.apply(|s| s.deactivate_goal(goal_id)).await
    }

    pub async fn remove_goal(&mut self, goal_id: &str) -> DbResult<ReinvestmentGoal> {
        self.apply(|s| s.remove_goal(goal_id)).await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub async fn update_customer(&mut self, id: &str, patch: CustomerPatch) -> DbResult<Customer> {
        self.apply(|s| s.update_customer(id, patch)).await
    }

    pub async fn remove_customer(&mut self, id: &str) -> DbResult<Customer> {
        let customer = self.apply(|s| s.remove_customer(id)).await?;
        debug!(customer_id = %id, "Customer removed");
        Ok(customer)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::DbConfig;
    use tally_core::sale::SaleLine;
    use tally_core::{Category, CoreError, PaymentMethod, PaymentStatus, SaleStatus};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dress() -> NewProduct {
        NewProduct {
            name: "Linen dress".into(),
            description: None,
            category: Category::Clothing,
            cost_cents: 6000,
            price_cents: 12000,
            quantity: 4,
            supplier: Some("Atelier Sul".into()),
            acquired_on: day(2026, 1, 15),
            notes: None,
        }
    }

    fn installment_sale(product_id: &str) -> NewSale {
        NewSale {
            items: vec![SaleLine::new(product_id, 1)],
            customer_name: "Ana".into(),
            customer_contact: Some("99999-0000".into()),
            sale_date: day(2026, 3, 1),
            payment_method: PaymentMethod::Installment,
            installment_count: 3,
            notes: None,
        }
    }

    async fn session() -> LedgerSession {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        LedgerSession::open(db, LedgerConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_intents_are_persisted() {
        let mut session = session().await;
        let product = session.add_product(dress()).await.unwrap();
        let sale = session.create_sale(installment_sale(&product.id)).await.unwrap();
        session
            .register_sale_payment(&sale.id, PaymentInput::new(4000, day(2026, 3, 10)))
            .await
            .unwrap();
        assert!(session.pending().is_empty());

        let reopened = LedgerSession::open(session.database().clone(), LedgerConfig::default())
            .await
            .unwrap();
        let stored = reopened.state().sale(&sale.id).unwrap();
        assert_eq!(stored.payment.received_cents, 4000);
        assert_eq!(stored.payment.status, PaymentStatus::Partial);
        assert!(stored.payment.installments[0].paid);
        assert_eq!(reopened.state().product(&product.id).unwrap().quantity, 3);
        assert_eq!(reopened.state().customers().len(), 1);
        assert_eq!(reopened.state().snapshot(), session.state().snapshot());
    }

    #[tokio::test]
    async fn test_rejected_intent_writes_nothing() {
        let mut session = session().await;
        let result = session.create_sale(installment_sale("missing")).await;

        assert!(matches!(
            result,
            Err(DbError::Ledger(CoreError::ProductNotFound(_)))
        ));
        assert!(session.database().collections().keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_touched_collections_are_written() {
        let mut session = session().await;
        session
            .create_loan(NewLoan {
                customer_name: "Diego".into(),
                requested_cents: 50_000,
                loan_date: day(2026, 2, 1),
                due_date: day(2026, 3, 1),
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(
            session.database().collections().keys().await.unwrap(),
            vec!["loans".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_save_keeps_changes_pending() {
        let mut session = session().await;
        session.database().close().await;

        let result = session.add_product(dress()).await;
        assert!(result.is_err());
        assert!(!result.unwrap_err().is_ledger());
        assert_eq!(session.pending(), vec![Collection::Products]);
        assert_eq!(session.state().products().len(), 1);
    }

    #[tokio::test]
    async fn test_paid_installment_survives_reopen() {
        let mut session = session().await;
        let product = session.add_product(dress()).await.unwrap();
        let sale = session.create_sale(installment_sale(&product.id)).await.unwrap();
        session
            .pay_installment(&sale.id, 2, day(2026, 4, 1))
            .await
            .unwrap();

        let reopened = LedgerSession::open(session.database().clone(), LedgerConfig::default())
            .await
            .unwrap();
        let stored = reopened.state().sale(&sale.id).unwrap();
        assert_eq!(stored.payment.received_cents, 8000);
        let flags: Vec<bool> = stored.payment.installments.iter().map(|i| i.paid).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_cancel_and_purchase_cascade() {
        let mut session = session().await;
        let product = session.add_product(dress()).await.unwrap();
        let sale = session.create_sale(installment_sale(&product.id)).await.unwrap();
        let sale = session.cancel_sale(&sale.id).await.unwrap();
        assert_eq!(sale.status, SaleStatus::Cancelled);

        let purchase = session
            .create_purchase(NewPurchase {
                supplier: "Atelier Sul".into(),
                items: vec![tally_core::purchase::PurchaseLine {
                    product_id: Some(product.id.clone()),
                    product_name: None,
                    quantity: 2,
                    unit_cost_cents: 6000,
                }],
                purchase_date: day(2026, 3, 2),
                payment_method: PaymentMethod::InstantTransfer,
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(session.state().cash_movements().len(), 1);

        session.remove_purchase(&purchase.id).await.unwrap();
        let reopened = LedgerSession::open(session.database().clone(), LedgerConfig::default())
            .await
            .unwrap();
        assert!(reopened.state().cash_movements().is_empty());
        assert!(reopened.state().purchases().is_empty());
    }
}
