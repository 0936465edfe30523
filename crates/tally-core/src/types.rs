//! # Domain Types
//!
//! Records and enums shared by every ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │      Loan       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  category       │   │  receipt_number │   │  requested      │       │
//! │  │  cost / price   │   │  items[]        │   │  interest_rate  │       │
//! │  │  quantity ≥ 0   │   │  payment ───┐   │   │  payment ───┐   │       │
//! │  └─────────────────┘   └─────────────┼───┘   └─────────────┼───┘       │
//! │                                      ▼                     ▼           │
//! │                        ┌───────────────────────────────────────┐       │
//! │                        │ Payment: total, received, status      │       │
//! │                        │   installments[] · entries[]          │       │
//! │                        └───────────────────────────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CashMovement   │   │    Purchase     │   │ ReinvestmentGoal│       │
//! │  │  type → channel │◄──│  items[]        │   │  target (bps)   │       │
//! │  │       → direction│  │  total          │   │  period, active │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Customer (denormalized, upserted by each sale)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Shape
//! Records serialize with camelCase field names and snake_case enum values.
//! Amounts are stored as integer cents (`*_cents`), rates as basis points
//! (`*_bps`); accessor methods return [`Money`] and [`Rate`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2000 bps = 20% (default loan interest)
/// 3000 bps = 30% (a typical reinvestment target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    ///
    /// Negative or non-finite input yields zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return Rate(0);
        }
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Clothing,
    Electronics,
    Misc,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Clothing, Category::Electronics, Category::Misc];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Electronics => "Electronics",
            Category::Misc => "Miscellaneous",
        }
    }
}

/// How a customer pays for a sale (or how a purchase was paid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant electronic transfer (PIX-like).
    InstantTransfer,
    /// Physical cash.
    Cash,
    /// Card, settled later by the card operator.
    Card,
    /// Store credit paid in installments.
    Installment,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::InstantTransfer,
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Installment,
    ];

    /// Sales paid this way are received in full at creation.
    #[inline]
    pub const fn settles_immediately(&self) -> bool {
        matches!(self, PaymentMethod::InstantTransfer | PaymentMethod::Cash)
    }

    /// Cash channel money paid this way moves through.
    pub const fn channel(&self) -> Channel {
        match self {
            PaymentMethod::InstantTransfer => Channel::Electronic,
            _ => Channel::PhysicalCash,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::InstantTransfer => "Instant transfer",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Installment => "Installments",
        }
    }
}

/// Lifecycle of a sale.
///
/// ## State Machine
/// ```text
/// ┌─────────┐  payment reaches paid   ┌───────────┐
/// │ Pending │ ──────────────────────► │ Completed │
/// └────┬────┘                         └─────┬─────┘
///      │ cancel_sale()                      │ cancel_sale()
///      ▼                                    ▼
/// ┌──────────────────────────────────────────────┐
/// │ Cancelled (payments never move it back)      │
/// └──────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    Completed,
    Cancelled,
}

/// Derived status of an embedded payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing received yet.
    Pending,
    /// Something received, not enough to settle.
    Partial,
    /// Received settles the total (within one cent).
    Paid,
}

/// Lifecycle of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Pending,
    Paid,
}

/// One of the two cash-holding buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Bank account fed by instant transfers.
    Electronic,
    /// The physical drawer.
    PhysicalCash,
}

/// Whether a movement adds to or takes from a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inflow,
    Outflow,
}

/// Semantic subtype of a cash movement.
///
/// Each subtype fixes its channel and direction; a movement cannot carry
/// any other combination.
///
/// ```text
/// ┌────────────────────────────┬──────────────┬───────────┐
/// │ Type                       │ Channel      │ Direction │
/// ├────────────────────────────┼──────────────┼───────────┤
/// │ SaleProceedsTransfer       │ Electronic   │ Inflow    │
/// │ SaleProceedsCash           │ PhysicalCash │ Inflow    │
/// │ LoanRepaymentTransfer      │ Electronic   │ Inflow    │
/// │ LoanRepaymentCash          │ PhysicalCash │ Inflow    │
/// │ AdjustmentInTransfer       │ Electronic   │ Inflow    │
/// │ AdjustmentInCash           │ PhysicalCash │ Inflow    │
/// │ PurchaseOutflowTransfer    │ Electronic   │ Outflow   │
/// │ PurchaseOutflowCash        │ PhysicalCash │ Outflow   │
/// │ LoanDisbursementTransfer   │ Electronic   │ Outflow   │
/// │ LoanDisbursementCash       │ PhysicalCash │ Outflow   │
/// │ ExpenseTransfer            │ Electronic   │ Outflow   │
/// │ ExpenseCash                │ PhysicalCash │ Outflow   │
/// │ AdjustmentOutTransfer      │ Electronic   │ Outflow   │
/// │ AdjustmentOutCash          │ PhysicalCash │ Outflow   │
/// └────────────────────────────┴──────────────┴───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    SaleProceedsTransfer,
    SaleProceedsCash,
    LoanRepaymentTransfer,
    LoanRepaymentCash,
    AdjustmentInTransfer,
    AdjustmentInCash,
    PurchaseOutflowTransfer,
    PurchaseOutflowCash,
    LoanDisbursementTransfer,
    LoanDisbursementCash,
    ExpenseTransfer,
    ExpenseCash,
    AdjustmentOutTransfer,
    AdjustmentOutCash,
}

impl MovementType {
    pub const ALL: [MovementType; 14] = [
        MovementType::SaleProceedsTransfer,
        MovementType::SaleProceedsCash,
        MovementType::LoanRepaymentTransfer,
        MovementType::LoanRepaymentCash,
        MovementType::AdjustmentInTransfer,
        MovementType::AdjustmentInCash,
        MovementType::PurchaseOutflowTransfer,
        MovementType::PurchaseOutflowCash,
        MovementType::LoanDisbursementTransfer,
        MovementType::LoanDisbursementCash,
        MovementType::ExpenseTransfer,
        MovementType::ExpenseCash,
        MovementType::AdjustmentOutTransfer,
        MovementType::AdjustmentOutCash,
    ];

    pub const fn channel(&self) -> Channel {
        use MovementType::*;
        match self {
            SaleProceedsTransfer
            | LoanRepaymentTransfer
            | AdjustmentInTransfer
            | PurchaseOutflowTransfer
            | LoanDisbursementTransfer
            | ExpenseTransfer
            | AdjustmentOutTransfer => Channel::Electronic,
            SaleProceedsCash
            | LoanRepaymentCash
            | AdjustmentInCash
            | PurchaseOutflowCash
            | LoanDisbursementCash
            | ExpenseCash
            | AdjustmentOutCash => Channel::PhysicalCash,
        }
    }

    pub const fn direction(&self) -> Direction {
        use MovementType::*;
        match self {
            SaleProceedsTransfer | SaleProceedsCash | LoanRepaymentTransfer
            | LoanRepaymentCash | AdjustmentInTransfer | AdjustmentInCash => Direction::Inflow,
            _ => Direction::Outflow,
        }
    }

    /// The purchase outflow subtype for a payment method's channel.
    pub const fn purchase_outflow(method: PaymentMethod) -> Self {
        match method.channel() {
            Channel::Electronic => MovementType::PurchaseOutflowTransfer,
            Channel::PhysicalCash => MovementType::PurchaseOutflowCash,
        }
    }

    /// True for the subtypes a sale id may be linked to.
    pub const fn is_sale_proceeds(&self) -> bool {
        matches!(
            self,
            MovementType::SaleProceedsTransfer | MovementType::SaleProceedsCash
        )
    }

    pub fn label(&self) -> &'static str {
        use MovementType::*;
        match self {
            SaleProceedsTransfer => "Sale proceeds (transfer)",
            SaleProceedsCash => "Sale proceeds (cash)",
            LoanRepaymentTransfer => "Loan repayment (transfer)",
            LoanRepaymentCash => "Loan repayment (cash)",
            AdjustmentInTransfer => "Deposit / adjustment (transfer)",
            AdjustmentInCash => "Deposit / adjustment (cash)",
            PurchaseOutflowTransfer => "Restock purchase (transfer)",
            PurchaseOutflowCash => "Restock purchase (cash)",
            LoanDisbursementTransfer => "Loan handed out (transfer)",
            LoanDisbursementCash => "Loan handed out (cash)",
            ExpenseTransfer => "Expense (transfer)",
            ExpenseCash => "Expense (cash)",
            AdjustmentOutTransfer => "Withdrawal / adjustment (transfer)",
            AdjustmentOutCash => "Withdrawal / adjustment (cash)",
        }
    }
}

/// Optional reference from a cash movement to the record that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MovementLink {
    Sale(String),
    Purchase(String),
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on sales and receipts.
    pub name: String,

    pub description: Option<String>,

    pub category: Category,

    /// What the shop paid per unit, in cents.
    pub cost_cents: i64,

    /// Sale price per unit, in cents.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub quantity: i64,

    pub supplier: Option<String>,

    /// When the stock was acquired.
    #[ts(as = "String")]
    pub acquired_on: NaiveDate,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Profit on one unit at the current cost and price.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.price() - self.cost()
    }

    /// True when a sale of `quantity` units can be served from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    /// Stock is running out but not gone.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity > 0 && self.quantity <= threshold
    }

    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A line item on a sale.
///
/// ## Snapshot Pattern
/// Name and unit price are copied from the product when the sale is made.
/// Later edits to the product do not change past sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    /// Product this line refers to. May dangle after the product is removed.
    pub product_id: String,

    /// Product name at time of sale.
    pub product_name: String,

    pub quantity: i64,

    /// Unit price at time of sale, in cents.
    pub unit_price_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A completed checkout of one or more products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable receipt number (REC-YYMM-XXXX).
    pub receipt_number: String,

    pub items: Vec<SaleItem>,

    /// Sum of line subtotals at creation, in cents.
    ///
    /// Not re-derived afterwards.
    pub total_cents: i64,

    pub customer_name: String,

    pub customer_contact: Option<String>,

    #[ts(as = "String")]
    pub sale_date: NaiveDate,

    pub payment_method: PaymentMethod,

    /// 1 means a single payment, no installment schedule.
    pub installment_count: u32,

    pub status: SaleStatus,

    pub payment: Payment,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status == SaleStatus::Cancelled
    }

    /// What the customer still owes on this sale (zero once cancelled).
    pub fn outstanding(&self) -> Money {
        if self.is_cancelled() {
            return Money::zero();
        }
        self.payment.outstanding()
    }

    /// Total units across all lines.
    pub fn units(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Payment
// =============================================================================

/// The payment record embedded in a sale or loan.
///
/// ## Invariants
/// - `received_cents == min(Σ entries, total_cents)`
/// - `status` is always [`crate::payment::derive_status`] of the two amounts
/// - installment amounts sum to `total_cents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Id of the sale or loan that owns this payment.
    pub owner_id: String,

    pub method: PaymentMethod,

    /// Amount owed, in cents.
    pub total_cents: i64,

    /// Amount received so far, in cents. Never above `total_cents`.
    pub received_cents: i64,

    /// Installment schedule. Empty when paid in one go.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub installments: Vec<Installment>,

    /// Every receipt, in the order it was registered.
    #[serde(default)]
    pub entries: Vec<PaymentEntry>,

    pub status: PaymentStatus,
}

impl Payment {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn received(&self) -> Money {
        Money::from_cents(self.received_cents)
    }

    /// Sum of every entry, before clamping.
    pub fn entered(&self) -> Money {
        self.entries.iter().map(|entry| entry.amount()).sum()
    }

    /// Balance still owed. Never negative.
    pub fn outstanding(&self) -> Money {
        (self.total() - self.received()).clamp_non_negative()
    }

    /// How much the entries exceed the total. Zero unless overpaid.
    pub fn overpaid(&self) -> Money {
        (self.entered() - self.total()).clamp_non_negative()
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// First installment not yet covered.
    pub fn next_unpaid_installment(&self) -> Option<&Installment> {
        self.installments.iter().find(|inst| !inst.paid)
    }
}

/// One scheduled share of a sale's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// 1-based position in the schedule.
    pub number: u32,

    pub amount_cents: i64,

    #[ts(as = "String")]
    pub due_date: NaiveDate,

    pub paid: bool,

    /// Date of the payment that covered this installment.
    #[ts(as = "Option<String>")]
    pub paid_on: Option<NaiveDate>,
}

impl Installment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Unpaid and past its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.paid && self.due_date < today
    }
}

/// One actual receipt of money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Amount as entered, in cents (may exceed what was still owed).
    pub amount_cents: i64,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub note: Option<String>,
}

impl PaymentEntry {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Loan
// =============================================================================

/// A short-term loan to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub customer_name: String,

    /// Principal handed out, in cents.
    pub requested_cents: i64,

    /// Interest fixed when the loan was made, in basis points.
    pub interest_rate_bps: u32,

    /// Principal plus interest, in cents.
    pub total_cents: i64,

    #[ts(as = "String")]
    pub loan_date: NaiveDate,

    #[ts(as = "String")]
    pub due_date: NaiveDate,

    pub status: LoanStatus,

    pub payment: Payment,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Loan {
    #[inline]
    pub fn requested(&self) -> Money {
        Money::from_cents(self.requested_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn interest_rate(&self) -> Rate {
        Rate::from_bps(self.interest_rate_bps)
    }

    /// Interest baked into the total.
    #[inline]
    pub fn interest(&self) -> Money {
        self.total() - self.requested()
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.status == LoanStatus::Paid
    }

    /// Past its due date and not fully paid.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_paid() && self.due_date < today
    }
}

// =============================================================================
// Cash Movement
// =============================================================================

/// One entry in the two-channel cash register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashMovement {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub movement_type: MovementType,

    /// Always `movement_type.channel()`.
    pub channel: Channel,

    /// Always `movement_type.direction()`.
    pub direction: Direction,

    pub description: String,

    /// Amount in cents, always positive; `direction` gives the sign.
    pub amount_cents: i64,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub link: Option<MovementLink>,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CashMovement {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Amount with the direction applied (outflows negative).
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            Direction::Inflow => self.amount(),
            Direction::Outflow => Money::zero() - self.amount(),
        }
    }

    /// True when this movement was generated for the given purchase.
    pub fn is_linked_to_purchase(&self, purchase_id: &str) -> bool {
        matches!(&self.link, Some(MovementLink::Purchase(id)) if id == purchase_id)
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// A line item on a restocking purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    /// Catalog product, if the goods are cataloged.
    pub product_id: Option<String>,

    /// Free-text name (copied from the catalog when `product_id` is set).
    pub product_name: String,

    pub quantity: i64,

    pub unit_cost_cents: i64,
}

impl PurchaseItem {
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_cost().multiply_quantity(self.quantity)
    }
}

/// Goods bought from a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub supplier: String,

    pub items: Vec<PurchaseItem>,

    pub total_cents: i64,

    #[ts(as = "String")]
    pub purchase_date: NaiveDate,

    pub payment_method: PaymentMethod,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Reinvestment Goal
// =============================================================================

/// Share of period revenue the owner wants to spend on restocking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReinvestmentGoal {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Target share of revenue, in basis points (3000 = 30%).
    pub target_bps: u32,

    #[ts(as = "String")]
    pub starts_on: NaiveDate,

    #[ts(as = "String")]
    pub ends_on: NaiveDate,

    /// At most one goal is active at a time.
    pub active: bool,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ReinvestmentGoal {
    #[inline]
    pub fn target(&self) -> Rate {
        Rate::from_bps(self.target_bps)
    }

    /// Inclusive on both ends.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.starts_on && date <= self.ends_on
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer, upserted from sales by case-insensitive name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    pub contact: Option<String>,

    pub email: Option<String>,

    pub purchase_count: u32,

    pub total_spent_cents: i64,

    #[ts(as = "Option<String>")]
    pub last_purchase_at: Option<DateTime<Utc>>,
}

impl Customer {
    #[inline]
    pub fn total_spent(&self) -> Money {
        Money::from_cents(self.total_spent_cents)
    }

    /// Case-insensitive name match, ignoring surrounding whitespace.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
