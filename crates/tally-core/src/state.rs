//! # Ledger State
//!
//! `LedgerState` owns every collection. Intents are methods on it, grouped
//! by ledger in their own modules (`sale`, `loan`, `cash`, ...).
//!
//! ## Intent Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   intent(input)                                                         │
//! │       │                                                                 │
//! │       ├── 1. validate input          ──► Err(Validation), no change     │
//! │       ├── 2. resolve ids             ──► Err(*NotFound), no change      │
//! │       ├── 3. build new records                                          │
//! │       ├── 4. apply to collections    (infallible from here on)          │
//! │       └── 5. mark touched collections dirty                             │
//! │                                                                         │
//! │   caller persists `take_dirty()` collections                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every fallible step happens before the first write, so a failed intent
//! never leaves a half-applied change behind.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::LedgerConfig;
use crate::types::{
    CashMovement, Customer, Loan, Product, Purchase, ReinvestmentGoal, Sale,
};

// =============================================================================
// Collection Keys
// =============================================================================

/// One named, independently persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Products,
    Sales,
    Loans,
    CashMovements,
    Purchases,
    ReinvestmentGoals,
    Customers,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Products,
        Collection::Sales,
        Collection::Loans,
        Collection::CashMovements,
        Collection::Purchases,
        Collection::ReinvestmentGoals,
        Collection::Customers,
    ];

    /// Storage key.
    pub const fn key(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Sales => "sales",
            Collection::Loans => "loans",
            Collection::CashMovements => "cashMovements",
            Collection::Purchases => "purchases",
            Collection::ReinvestmentGoals => "reinvestmentGoals",
            Collection::Customers => "customers",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Collection::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Collections
// =============================================================================

/// Plain bundle of every collection, newest record first.
///
/// Used to build a [`LedgerState`] from loaded records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub loans: Vec<Loan>,
    pub cash_movements: Vec<CashMovement>,
    pub purchases: Vec<Purchase>,
    pub goals: Vec<ReinvestmentGoal>,
    pub customers: Vec<Customer>,
}

// =============================================================================
// Ledger State
// =============================================================================

/// The application state: every collection plus the engine configuration.
///
/// ## Ownership
/// One `LedgerState` per session, owned by whoever applies intents
/// (`tally_db::LedgerSession`). No globals; records are plain values.
#[derive(Debug, Clone)]
pub struct LedgerState {
    pub(crate) config: LedgerConfig,
    pub(crate) products: Vec<Product>,
    pub(crate) sales: Vec<Sale>,
    pub(crate) loans: Vec<Loan>,
    pub(crate) cash_movements: Vec<CashMovement>,
    pub(crate) purchases: Vec<Purchase>,
    pub(crate) goals: Vec<ReinvestmentGoal>,
    pub(crate) customers: Vec<Customer>,
    dirty: BTreeSet<Collection>,
}

impl LedgerState {
    /// Empty ledger.
    pub fn new(config: LedgerConfig) -> Self {
        LedgerState::from_collections(config, Collections::default())
    }

    /// Ledger over already-loaded collections. Nothing starts dirty.
    pub fn from_collections(config: LedgerConfig, collections: Collections) -> Self {
        LedgerState {
            config,
            products: collections.products,
            sales: collections.sales,
            loans: collections.loans,
            cash_movements: collections.cash_movements,
            purchases: collections.purchases,
            goals: collections.goals,
            customers: collections.customers,
            dirty: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Collection access
    // -------------------------------------------------------------------------

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn cash_movements(&self) -> &[CashMovement] {
        &self.cash_movements
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn goals(&self) -> &[ReinvestmentGoal] {
        &self.goals
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn loan(&self, id: &str) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == id)
    }

    pub fn movement(&self, id: &str) -> Option<&CashMovement> {
        self.cash_movements.iter().find(|m| m.id == id)
    }

    pub fn purchase(&self, id: &str) -> Option<&Purchase> {
        self.purchases.iter().find(|p| p.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&ReinvestmentGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Product name for display, tolerating removed products.
    pub fn product_name(&self, id: &str) -> &str {
        self.product(id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PRODUCT)
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    pub(crate) fn touch(&mut self, collection: Collection) {
        self.dirty.insert(collection);
    }

    /// Collections changed since the last `take_dirty`, in key order.
    pub fn dirty(&self) -> Vec<Collection> {
        self.dirty.iter().copied().collect()
    }

    /// Returns and clears the changed collections.
    pub fn take_dirty(&mut self) -> Vec<Collection> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    /// Serializes one collection to its stored JSON array.
    pub fn collection_json(&self, collection: Collection) -> serde_json::Result<String> {
        match collection {
            Collection::Products => serde_json::to_string(&self.products),
            Collection::Sales => serde_json::to_string(&self.sales),
            Collection::Loans => serde_json::to_string(&self.loans),
            Collection::CashMovements => serde_json::to_string(&self.cash_movements),
            Collection::Purchases => serde_json::to_string(&self.purchases),
            Collection::ReinvestmentGoals => serde_json::to_string(&self.goals),
            Collection::Customers => serde_json::to_string(&self.customers),
        }
    }

    /// Clones every collection out.
    pub fn snapshot(&self) -> Collections {
        Collections {
            products: self.products.clone(),
            sales: self.sales.clone(),
            loans: self.loans.clone(),
            cash_movements: self.cash_movements.clone(),
            purchases: self.purchases.clone(),
            goals: self.goals.clone(),
            customers: self.customers.clone(),
        }
    }
}

/// Name shown for sale lines whose product no longer exists.
pub const UNKNOWN_PRODUCT: &str = "Unknown product";
