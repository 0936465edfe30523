//! # Cross-Ledger Reports
//!
//! Read-only aggregates over sales, purchases, loans and cash. Every
//! function here is a pure scan of the current collections; nothing is
//! cached.
//!
//! ## What Feeds What
//! ```text
//! ┌────────────┐   non-cancelled    ┌────────────────────────────────────┐
//! │   Sales    │ ─────────────────► │ revenue, product profit, debts,    │
//! └────────────┘                    │ receivables, dashboard, reports    │
//! ┌────────────┐                    │                                    │
//! │   Loans    │ ─────────────────► │ projected + realized interest,     │
//! └────────────┘                    │ debts, pending                     │
//! ┌────────────┐                    │                                    │
//! │ Purchases  │ ─────────────────► │ total invested, goal progress      │
//! └────────────┘                    └────────────────────────────────────┘
//! ```
//!
//! ## Profit Rules
//! - Product profit per line: `(unit price − current product cost) × qty`.
//!   The cost is read from the catalog now, not snapshotted at sale time,
//!   so editing a cost price changes the profit of past sales.
//! - In the profit totals, a line whose product was removed is charged no
//!   cost, so its whole revenue is profit. Per-product and per-category
//!   rankings give such lines zero profit instead.
//! - Loan interest is recognized in proportion to how much of all loans
//!   (principal + interest) has been collected, across every loan at once.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cash::CashBalances;
use crate::money::Money;
use crate::state::LedgerState;
use crate::types::{Category, PaymentMethod, Product, ReinvestmentGoal, Sale, SaleItem};

/// Number of products on the dashboard ranking.
pub const DASHBOARD_TOP_PRODUCTS: usize = 5;

/// Number of rows in the sales report rankings.
pub const REPORT_TOP_ROWS: usize = 10;

// =============================================================================
// Report Types
// =============================================================================

/// Progress of a reinvestment goal over its period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    /// Non-cancelled sales dated inside the period.
    pub period_revenue_cents: i64,
    /// Revenue × target percentage.
    pub target_cents: i64,
    /// Purchases dated inside the period.
    pub reinvested_cents: i64,
    /// 0-100, capped.
    pub percent_realized: f64,
    pub achieved: bool,
    /// What is still missing to reach the target. Never negative.
    pub shortfall_cents: i64,
}

/// Everything one customer owes, across sales and loans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDebt {
    pub customer_name: String,
    pub sales_owed_cents: i64,
    pub loans_owed_cents: i64,
    pub total_owed_cents: i64,
}

/// Profit and margin across sales and loans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummary {
    /// Σ total of non-cancelled sales.
    pub sales_revenue_cents: i64,
    /// Σ (total − requested) over all loans.
    pub projected_interest_cents: i64,
    /// Sales revenue plus projected interest.
    pub revenue_cents: i64,
    pub product_profit_cents: i64,
    pub realized_interest_cents: i64,
    pub total_profit_cents: i64,
    /// total profit / revenue × 100, 0 without revenue.
    pub margin_percent: f64,
    /// Σ requested over all loans.
    pub total_lent_cents: i64,
    /// Received on non-cancelled sales plus received on loans.
    pub total_received_cents: i64,
    /// Still owed on non-cancelled sales plus on loans.
    pub total_pending_cents: i64,
}

/// A sale with money still to collect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub sale_id: String,
    pub receipt_number: String,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    /// Product names on the sale, comma separated.
    pub items_summary: String,
    pub outstanding_cents: i64,
    /// Number of the first unpaid installment.
    pub installment_number: Option<u32>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    /// Days past the due date (negative: days until it). 0 without a
    /// schedule.
    pub days_overdue: i64,
}

/// Sales, quantity and profit of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub revenue_cents: i64,
    pub profit_cents: i64,
    pub margin_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: Category,
    pub revenue_cents: i64,
    pub quantity: i64,
    pub profit_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MethodBreakdown {
    pub method: PaymentMethod,
    pub revenue_cents: i64,
    pub sale_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRanking {
    pub customer_name: String,
    pub contact: Option<String>,
    pub purchases: u32,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub revenue_cents: i64,
    pub sale_count: u32,
}

/// Sales count and value for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesWindow {
    pub revenue_cents: i64,
    pub sale_count: u32,
}

/// The home screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[ts(as = "String")]
    pub today: NaiveDate,
    pub today_sales: SalesWindow,
    /// Week starts on Sunday.
    pub week_sales: SalesWindow,
    pub month_sales: SalesWindow,
    pub profit: ProfitSummary,
    pub cash: CashBalances,
    pub top_products: Vec<ProductPerformance>,
    /// Last seven days, oldest first.
    pub daily_sales: Vec<DailySales>,
    pub product_count: u32,
    pub low_stock_count: u32,
    pub out_of_stock_count: u32,
    pub pending_sale_count: u32,
    pub open_loan_count: u32,
}

/// Sales over the last N days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    #[ts(as = "String")]
    pub from: NaiveDate,
    #[ts(as = "String")]
    pub to: NaiveDate,
    pub total_cents: i64,
    pub received_cents: i64,
    pub pending_cents: i64,
    pub profit_cents: i64,
    pub margin_percent: f64,
    pub sale_count: u32,
    pub average_ticket_cents: i64,
    pub by_category: Vec<CategoryBreakdown>,
    pub by_method: Vec<MethodBreakdown>,
    pub top_products: Vec<ProductPerformance>,
    pub top_customers: Vec<CustomerRanking>,
}

// =============================================================================
// Aggregations
// =============================================================================

impl LedgerState {
    /// Σ purchase totals, all time.
    pub fn total_invested(&self) -> Money {
        self.purchases.iter().map(|p| p.total()).sum()
    }

    /// Progress of a goal.
    ///
    /// ## Example
    /// ```text
    /// target 30%, period revenue 1000.00 → target 300.00
    /// purchases in period 150.00         → 50%, not achieved, 150.00 short
    /// ```
    pub fn goal_progress(&self, goal: &ReinvestmentGoal) -> GoalProgress {
        let revenue: Money = self
            .active_sales()
            .filter(|s| goal.covers(s.sale_date))
            .map(Sale::total)
            .sum();
        let target = revenue.apply_rate(goal.target());
        let reinvested: Money = self
            .purchases
            .iter()
            .filter(|p| goal.covers(p.purchase_date))
            .map(|p| p.total())
            .sum();

        let percent_realized = if target.is_positive() {
            reinvested.percent_of(target).min(100.0)
        } else {
            0.0
        };

        GoalProgress {
            goal_id: goal.id.clone(),
            period_revenue_cents: revenue.cents(),
            target_cents: target.cents(),
            reinvested_cents: reinvested.cents(),
            percent_realized,
            achieved: reinvested >= target,
            shortfall_cents: (target - reinvested).clamp_non_negative().cents(),
        }
    }

    /// Progress of the active goal, if there is one.
    pub fn active_goal_progress(&self) -> Option<GoalProgress> {
        self.active_goal().map(|goal| self.goal_progress(goal))
    }

    /// Debt per customer across unpaid sales and unpaid loans, largest
    /// first.
    ///
    /// Names are grouped case-insensitively; the first spelling seen is
    /// the one reported. Balances within the one-cent tolerance are
    /// ignored.
    pub fn customer_debts(&self) -> Vec<CustomerDebt> {
        let mut order: Vec<String> = Vec::new();
        let mut debts: HashMap<String, CustomerDebt> = HashMap::new();

        let mut add = |name: &str, sales: Money, loans: Money| {
            let key = name.trim().to_lowercase();
            let debt = debts.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                CustomerDebt {
                    customer_name: name.trim().to_string(),
                    sales_owed_cents: 0,
                    loans_owed_cents: 0,
                    total_owed_cents: 0,
                }
            });
            debt.sales_owed_cents += sales.cents();
            debt.loans_owed_cents += loans.cents();
            debt.total_owed_cents += (sales + loans).cents();
        };

        for sale in self.active_sales().filter(|s| !s.payment.is_paid()) {
            let owed = sale.payment.outstanding();
            if owed.exceeds_tolerance() {
                add(&sale.customer_name, owed, Money::zero());
            }
        }
        for loan in self.loans.iter().filter(|l| !l.is_paid()) {
            let owed = loan.payment.outstanding();
            if owed.exceeds_tolerance() {
                add(&loan.customer_name, Money::zero(), owed);
            }
        }

        let mut result: Vec<CustomerDebt> = order
            .into_iter()
            .filter_map(|key| debts.remove(&key))
            .collect();
        result.sort_by(|a, b| b.total_owed_cents.cmp(&a.total_owed_cents));
        result
    }

    /// Profit, margin and money still to collect, all time.
    pub fn profit_summary(&self) -> ProfitSummary {
        let sales_revenue: Money = self.active_sales().map(Sale::total).sum();
        let sales_received: Money = self.active_sales().map(|s| s.payment.received()).sum();
        let product_profit: Money = self
            .active_sales()
            .flat_map(|s| s.items.iter())
            .map(|item| self.booked_profit(item))
            .sum();

        let total_lent: Money = self.loans.iter().map(|l| l.requested()).sum();
        let loans_owed: Money = self.loans.iter().map(|l| l.total()).sum();
        let loans_received: Money = self.loans.iter().map(|l| l.payment.received()).sum();
        let projected_interest: Money = self.loans.iter().map(|l| l.interest()).sum();
        let realized_interest = projected_interest.scale(loans_received, loans_owed);

        let revenue = sales_revenue + projected_interest;
        let total_profit = product_profit + realized_interest;
        let total_received = sales_received + loans_received;

        ProfitSummary {
            sales_revenue_cents: sales_revenue.cents(),
            projected_interest_cents: projected_interest.cents(),
            revenue_cents: revenue.cents(),
            product_profit_cents: product_profit.cents(),
            realized_interest_cents: realized_interest.cents(),
            total_profit_cents: total_profit.cents(),
            margin_percent: total_profit.percent_of(revenue),
            total_lent_cents: total_lent.cents(),
            total_received_cents: total_received.cents(),
            total_pending_cents: (sales_revenue + loans_owed - total_received).cents(),
        }
    }

    /// Unpaid, non-cancelled sales, most overdue first.
    pub fn receivables(&self, today: NaiveDate) -> Vec<Receivable> {
        let mut receivables: Vec<Receivable> = self
            .active_sales()
            .filter(|s| !s.payment.is_paid())
            .filter(|s| s.payment.outstanding().is_positive())
            .map(|sale| {
                let next = sale.payment.next_unpaid_installment();
                let items_summary = sale
                    .items
                    .iter()
                    .map(|item| item.product_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");

                Receivable {
                    sale_id: sale.id.clone(),
                    receipt_number: sale.receipt_number.clone(),
                    customer_name: sale.customer_name.clone(),
                    customer_contact: sale.customer_contact.clone(),
                    items_summary,
                    outstanding_cents: sale.payment.outstanding().cents(),
                    installment_number: next.map(|i| i.number),
                    due_date: next.map(|i| i.due_date),
                    days_overdue: next
                        .map(|i| (today - i.due_date).num_days())
                        .unwrap_or(0),
                }
            })
            .collect();

        receivables.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
        receivables
    }

    /// Home screen aggregates as of `today`.
    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let week_start =
            today - Duration::days(today.weekday().num_days_from_sunday() as i64);
        let month_start = today.with_day(1).unwrap_or(today);

        let window = |from: NaiveDate| {
            self.active_sales()
                .filter(|s| s.sale_date >= from)
                .fold(SalesWindow::default(), |mut acc, s| {
                    acc.revenue_cents += s.total_cents;
                    acc.sale_count += 1;
                    acc
                })
        };

        let mut top_products = self.product_performance(self.active_sales());
        top_products.sort_by(|a, b| b.profit_cents.cmp(&a.profit_cents));
        top_products.truncate(DASHBOARD_TOP_PRODUCTS);

        let daily_sales = (0..7)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let (revenue, count) = self
                    .active_sales()
                    .filter(|s| s.sale_date == date)
                    .fold((0i64, 0u32), |(r, c), s| (r + s.total_cents, c + 1));
                DailySales {
                    date,
                    revenue_cents: revenue,
                    sale_count: count,
                }
            })
            .collect();

        Dashboard {
            today,
            today_sales: window(today),
            week_sales: window(week_start),
            month_sales: window(month_start),
            profit: self.profit_summary(),
            cash: self.cash_balances(),
            top_products,
            daily_sales,
            product_count: self.products.len() as u32,
            low_stock_count: self.low_stock_products().len() as u32,
            out_of_stock_count: self.out_of_stock_products().len() as u32,
            pending_sale_count: self
                .active_sales()
                .filter(|s| !s.payment.is_paid())
                .count() as u32,
            open_loan_count: self.loans.iter().filter(|l| !l.is_paid()).count() as u32,
        }
    }

    /// Sales report for the `days` days up to and including `today`.
    pub fn sales_report(&self, today: NaiveDate, days: u32) -> SalesReport {
        let from = today - Duration::days(days.saturating_sub(1) as i64);
        let in_period = || self.active_sales().filter(move |s| s.sale_date >= from);

        let total: Money = in_period().map(Sale::total).sum();
        let received: Money = in_period().map(|s| s.payment.received()).sum();
        let profit: Money = in_period()
            .flat_map(|s| s.items.iter())
            .map(|item| self.booked_profit(item))
            .sum();
        let sale_count = in_period().count() as u32;

        // By category (lines of removed products have no category)
        let mut by_category: Vec<CategoryBreakdown> = Vec::new();
        for item in in_period().flat_map(|s| s.items.iter()) {
            let Some(product) = self.product(&item.product_id) else {
                continue;
            };
            let profit = self.line_profit(item).unwrap_or_default();
            match by_category.iter_mut().find(|c| c.category == product.category) {
                Some(row) => {
                    row.revenue_cents += item.subtotal().cents();
                    row.quantity += item.quantity;
                    row.profit_cents += profit.cents();
                }
                None => by_category.push(CategoryBreakdown {
                    category: product.category,
                    revenue_cents: item.subtotal().cents(),
                    quantity: item.quantity,
                    profit_cents: profit.cents(),
                }),
            }
        }
        by_category.sort_by(|a, b| b.revenue_cents.cmp(&a.revenue_cents));

        let mut by_method: Vec<MethodBreakdown> = Vec::new();
        for sale in in_period() {
            match by_method.iter_mut().find(|m| m.method == sale.payment_method) {
                Some(row) => {
                    row.revenue_cents += sale.total_cents;
                    row.sale_count += 1;
                }
                None => by_method.push(MethodBreakdown {
                    method: sale.payment_method,
                    revenue_cents: sale.total_cents,
                    sale_count: 1,
                }),
            }
        }
        by_method.sort_by(|a, b| b.revenue_cents.cmp(&a.revenue_cents));

        let mut top_products = self.product_performance(in_period());
        top_products.sort_by(|a, b| b.revenue_cents.cmp(&a.revenue_cents));
        top_products.truncate(REPORT_TOP_ROWS);

        let mut top_customers: Vec<CustomerRanking> = Vec::new();
        for sale in in_period() {
            match top_customers
                .iter_mut()
                .find(|c| c.customer_name == sale.customer_name)
            {
                Some(row) => {
                    row.purchases += 1;
                    row.revenue_cents += sale.total_cents;
                }
                None => top_customers.push(CustomerRanking {
                    customer_name: sale.customer_name.clone(),
                    contact: sale.customer_contact.clone(),
                    purchases: 1,
                    revenue_cents: sale.total_cents,
                }),
            }
        }
        top_customers.sort_by(|a, b| b.revenue_cents.cmp(&a.revenue_cents));
        top_customers.truncate(REPORT_TOP_ROWS);

        SalesReport {
            from,
            to: today,
            total_cents: total.cents(),
            received_cents: received.cents(),
            pending_cents: (total - received).cents(),
            profit_cents: profit.cents(),
            margin_percent: profit.percent_of(total),
            sale_count,
            average_ticket_cents: average(total, sale_count).cents(),
            by_category,
            by_method,
            top_products,
            top_customers,
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn active_sales(&self) -> impl Iterator<Item = &Sale> + '_ {
        self.sales.iter().filter(|s| !s.is_cancelled())
    }

    /// Profit on one sale line at the current cost. `None` if the product
    /// no longer exists.
    fn line_profit(&self, item: &SaleItem) -> Option<Money> {
        self.product(&item.product_id)
            .map(|product| (item.unit_price() - product.cost()).multiply_quantity(item.quantity))
    }

    /// Profit on one sale line for the ledger totals. A removed product
    /// has no cost left to charge, so the whole line counts as profit.
    fn booked_profit(&self, item: &SaleItem) -> Money {
        let cost = self.product(&item.product_id).map(Product::cost).unwrap_or_default();
        (item.unit_price() - cost).multiply_quantity(item.quantity)
    }

    /// Per-product totals over the given sales, in first-seen order.
    fn product_performance<'a>(
        &'a self,
        sales: impl Iterator<Item = &'a Sale>,
    ) -> Vec<ProductPerformance> {
        let mut rows: Vec<ProductPerformance> = Vec::new();

        for item in sales.flat_map(|s| s.items.iter()) {
            let profit = self.line_profit(item).unwrap_or_default();
            match rows.iter_mut().find(|r| r.product_id == item.product_id) {
                Some(row) => {
                    row.quantity += item.quantity;
                    row.revenue_cents += item.subtotal().cents();
                    row.profit_cents += profit.cents();
                }
                None => rows.push(ProductPerformance {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    revenue_cents: item.subtotal().cents(),
                    profit_cents: profit.cents(),
                    margin_percent: 0.0,
                }),
            }
        }

        for row in rows.iter_mut() {
            row.margin_percent =
                Money::from_cents(row.profit_cents).percent_of(Money::from_cents(row.revenue_cents));
        }
        rows
    }
}

/// `total / count`, rounded to the nearest cent. Zero when `count` is zero.
fn average(total: Money, count: u32) -> Money {
    total.scale(Money::from_cents(1), Money::from_cents(count as i64))
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
    use crate::purchase::{NewPurchase, PurchaseLine};
    use crate::sale::tests::{day, new_sale, recorded_on, stocked_ledger};
    use crate::sale::SaleLine;

    fn cash_sale(
        ledger: &mut LedgerState,
        product: &str,
        qty: i64,
        customer: &str,
        date: NaiveDate,
    ) -> Sale {
        ledger
            .create_sale(new_sale(
                vec![SaleLine::new(product, qty)],
                customer,
                PaymentMethod::Cash,
                1,
                date,
            ))
            .unwrap()
    }

    fn supplies(total_cents: i64, date: NaiveDate) -> NewPurchase {
        NewPurchase {
            supplier: "Atacado".into(),
            items: vec![PurchaseLine {
                product_id: None,
                product_name: Some("Supplies".into()),
                quantity: 1,
                unit_cost_cents: total_cents,
            }],
            purchase_date: date,
            payment_method: PaymentMethod::Cash,
            notes: None,
        }
    }

    #[test]
    fn test_goal_progress_half_way() {
        let (mut ledger, jacket, case) = stocked_ledger();
        // 1000.00 of revenue in March: 6 jackets plus one discounted case
        cash_sale(&mut ledger, &jacket, 6, "Ana", day(2026, 3, 5));
        let mut discounted = new_sale(
            vec![SaleLine {
                product_id: case.clone(),
                quantity: 1,
                unit_price_cents: Some(10000),
            }],
            "Bia",
            PaymentMethod::Cash,
            1,
            day(2026, 3, 6),
        );
        discounted.notes = Some("promo".into());
        ledger.create_sale(discounted).unwrap();
        // Outside the period
        cash_sale(&mut ledger, &jacket, 1, "Ana", day(2026, 4, 1));

        ledger.create_purchase(supplies(15000, day(2026, 3, 20))).unwrap();
        ledger.create_purchase(supplies(99900, day(2026, 2, 28))).unwrap();

        let goal = ledger
            .create_goal(NewGoal {
                target_bps: 3000,
                starts_on: day(2026, 3, 1),
                ends_on: day(2026, 3, 31),
                active: true,
                notes: None,
            })
            .unwrap();

        let progress = ledger.goal_progress(&goal);
        assert_eq!(progress.period_revenue_cents, 100_000);
        assert_eq!(progress.target_cents, 30_000);
        assert_eq!(progress.reinvested_cents, 15_000);
        assert!((progress.percent_realized - 50.0).abs() < 1e-9);
        assert!(!progress.achieved);
        assert_eq!(progress.shortfall_cents, 15_000);
        assert_eq!(ledger.active_goal_progress(), Some(progress));
    }

    #[test]
    fn test_goal_progress_without_revenue() {
        let (mut ledger, _, _) = stocked_ledger();
        let goal = ledger
            .create_goal(NewGoal {
                target_bps: 3000,
                starts_on: day(2026, 3, 1),
                ends_on: day(2026, 3, 31),
                active: true,
                notes: None,
            })
            .unwrap();
        let progress = ledger.goal_progress(&goal);
        assert_eq!(progress.percent_realized, 0.0);
        assert_eq!(progress.shortfall_cents, 0);
    }

    #[test]
    fn test_percent_realized_is_capped() {
        let (mut ledger, jacket, _) = stocked_ledger();
        cash_sale(&mut ledger, &jacket, 1, "Ana", day(2026, 3, 5));
        ledger.create_purchase(supplies(100_000, day(2026, 3, 6))).unwrap();
        let goal = ledger
            .create_goal(NewGoal {
                target_bps: 1000,
                starts_on: day(2026, 3, 1),
                ends_on: day(2026, 3, 31),
                active: false,
                notes: None,
            })
            .unwrap();

        let progress = ledger.goal_progress(&goal);
        assert_eq!(progress.percent_realized, 100.0);
        assert!(progress.achieved);
        assert_eq!(progress.shortfall_cents, 0);
    }

    #[test]
    fn test_total_invested() {
        let (mut ledger, _, _) = stocked_ledger();
        ledger.create_purchase(supplies(1000, day(2026, 1, 1))).unwrap();
        ledger.create_purchase(supplies(2500, day(2026, 6, 1))).unwrap();
        assert_eq!(ledger.total_invested().cents(), 3500);
    }

    #[test]
    fn test_customer_debts_combine_sales_and_loans() {
        let (mut ledger, jacket, case) = stocked_ledger();
        ledger
            .create_sale(new_sale(
                vec![SaleLine::new(&jacket, 1)],
                "Ana",
                PaymentMethod::Card,
                1,
                day(2026, 3, 1),
            ))
            .unwrap();
        ledger
            .create_sale(new_sale(
                vec![SaleLine::new(&case, 1)],
                "Bruno",
                PaymentMethod::Installment,
                2,
                day(2026, 3, 1),
            ))
            .unwrap();
        let cancelled = ledger
            .create_sale(new_sale(
                vec![SaleLine::new(&jacket, 3)],
                "Carla",
                PaymentMethod::Card,
                1,
                day(2026, 3, 1),
            ))
            .unwrap();
        ledger.cancel_sale(&cancelled.id).unwrap();
        ledger.create_loan(new_loan("ana", 10_000)).unwrap();

        let debts = ledger.customer_debts();
        assert_eq!(debts.len(), 2);
        assert_eq!(debts[0].customer_name, "Ana");
        assert_eq!(debts[0].sales_owed_cents, 15_000);
        assert_eq!(debts[0].loans_owed_cents, 12_000);
        assert_eq!(debts[0].total_owed_cents, 27_000);
        assert_eq!(debts[1].customer_name, "Bruno");
        assert_eq!(debts[1].total_owed_cents, 3_500);
    }

    #[test]
    fn test_profit_summary() {
        let (mut ledger, jacket, _) = stocked_ledger();
        // jacket: price 150.00, cost 80.00
        cash_sale(&mut ledger, &jacket, 2, "Ana", day(2026, 3, 1));
        let cancelled = cash_sale(&mut ledger, &jacket, 5, "Bia", day(2026, 3, 1));
        ledger.cancel_sale(&cancelled.id).unwrap();

        // Two loans: 1200.00 and 600.00 owed, 900.00 collected overall
        let a = ledger.create_loan(new_loan("Caio", 100_000)).unwrap();
        let b = ledger.create_loan(new_loan("Dora", 50_000)).unwrap();
        ledger
            .register_loan_payment(&a.id, PaymentInput::new(60_000, day(2026, 3, 2)))
            .unwrap();
        ledger
            .register_loan_payment(&b.id, PaymentInput::new(30_000, day(2026, 3, 2)))
            .unwrap();

        let summary = ledger.profit_summary();
        assert_eq!(summary.sales_revenue_cents, 30_000);
        assert_eq!(summary.product_profit_cents, 14_000);
        assert_eq!(summary.projected_interest_cents, 30_000);
        // 30000 × 90000 / 180000
        assert_eq!(summary.realized_interest_cents, 15_000);
        assert_eq!(summary.total_profit_cents, 29_000);
        assert_eq!(summary.revenue_cents, 60_000);
        assert!((summary.margin_percent - 29_000.0 / 60_000.0 * 100.0).abs() < 1e-9);
        assert_eq!(summary.total_lent_cents, 150_000);
        assert_eq!(summary.total_received_cents, 30_000 + 90_000);
        assert_eq!(summary.total_pending_cents, 90_000);
    }

    #[test]
    fn test_profit_uses_current_cost() {
        let (mut ledger, jacket, case) = stocked_ledger();
        cash_sale(&mut ledger, &jacket, 1, "Ana", day(2026, 3, 1));
        cash_sale(&mut ledger, &case, 1, "Ana", day(2026, 3, 1));
        assert_eq!(ledger.profit_summary().product_profit_cents, 7_000 + 2_500);

        ledger
            .update_product(
                &jacket,
                crate::inventory::ProductPatch {
                    cost_cents: Some(10_000),
                    ..Default::default()
                },
            )
            .unwrap();
        ledger.remove_product(&case).unwrap();
        assert_eq!(ledger.profit_summary().product_profit_cents, 5_000 + 3_500);
    }

    #[test]
    fn test_removed_product_revenue_counts_as_profit() {
        let (mut ledger, jacket, _) = stocked_ledger();
        cash_sale(&mut ledger, &jacket, 1, "Ana", day(2026, 3, 1));
        ledger.remove_product(&jacket).unwrap();

        let summary = ledger.profit_summary();
        assert_eq!(summary.revenue_cents, 15_000);
        assert_eq!(summary.product_profit_cents, 15_000);
        assert_eq!(summary.margin_percent, 100.0);

        let report = ledger.sales_report(day(2026, 3, 1), 1);
        assert_eq!(report.profit_cents, 15_000);
        assert_eq!(report.top_products[0].profit_cents, 0);
    }

    #[test]
    fn test_empty_ledger_has_zero_margin() {
        let (ledger, _, _) = stocked_ledger();
        let summary = ledger.profit_summary();
        assert_eq!(summary.margin_percent, 0.0);
        assert_eq!(summary.realized_interest_cents, 0);
    }

    #[test]
    fn test_receivables_most_overdue_first() {
        let (mut ledger, jacket, case) = stocked_ledger();
        let early = ledger
            .create_sale_at(
                new_sale(
                    vec![SaleLine::new(&jacket, 1)],
                    "Ana",
                    PaymentMethod::Installment,
                    3,
                    day(2026, 1, 1),
                ),
                recorded_on(2026, 1, 1),
            )
            .unwrap();
        let late = ledger
            .create_sale_at(
                new_sale(
                    vec![SaleLine::new(&case, 2)],
                    "Bruno",
                    PaymentMethod::Installment,
                    2,
                    day(2026, 2, 1),
                ),
                recorded_on(2026, 2, 1),
            )
            .unwrap();
        let plain = ledger
            .create_sale(new_sale(
                vec![SaleLine::new(&case, 1)],
                "Caio",
                PaymentMethod::Card,
                1,
                day(2026, 2, 1),
            ))
            .unwrap();
        cash_sale(&mut ledger, &jacket, 1, "Dora", day(2026, 2, 1));

        let receivables = ledger.receivables(day(2026, 3, 5));
        let ids: Vec<&str> = receivables.iter().map(|r| r.sale_id.as_str()).collect();
        assert_eq!(ids, vec![early.id.as_str(), late.id.as_str(), plain.id.as_str()]);

        // first installment of `early` was due 2026-01-31
        assert_eq!(receivables[0].days_overdue, 33);
        assert_eq!(receivables[0].installment_number, Some(1));
        assert_eq!(receivables[0].items_summary, "Denim jacket");
        // `late` due 2026-03-03
        assert_eq!(receivables[1].days_overdue, 2);
        assert_eq!(receivables[2].days_overdue, 0);
        assert_eq!(receivables[2].due_date, None);
    }

    #[test]
    fn test_dashboard_windows() {
        let (mut ledger, jacket, case) = stocked_ledger();
        // 2026-03-11 is a Wednesday; week starts Sunday 2026-03-08
        let today = day(2026, 3, 11);
        cash_sale(&mut ledger, &jacket, 1, "Ana", today);
        cash_sale(&mut ledger, &case, 1, "Ana", day(2026, 3, 8));
        cash_sale(&mut ledger, &case, 2, "Ana", day(2026, 3, 2));
        cash_sale(&mut ledger, &case, 1, "Ana", day(2026, 2, 27));

        let dashboard = ledger.dashboard(today);
        assert_eq!(dashboard.today_sales, SalesWindow { revenue_cents: 15_000, sale_count: 1 });
        assert_eq!(dashboard.week_sales.sale_count, 2);
        assert_eq!(dashboard.week_sales.revenue_cents, 18_500);
        assert_eq!(dashboard.month_sales.sale_count, 3);
        assert_eq!(dashboard.daily_sales.len(), 7);
        assert_eq!(dashboard.daily_sales[6].date, today);
        assert_eq!(dashboard.daily_sales[6].revenue_cents, 15_000);
        assert_eq!(dashboard.daily_sales[0].date, day(2026, 3, 5));

        // 4 cases × 25.00 beat one jacket at 70.00
        assert_eq!(dashboard.top_products[0].product_name, "Phone case");
        assert_eq!(dashboard.top_products[0].quantity, 4);
        assert_eq!(dashboard.top_products[0].profit_cents, 10_000);
        assert_eq!(dashboard.top_products[1].product_name, "Denim jacket");
        assert_eq!(dashboard.product_count, 2);
    }

    #[test]
    fn test_sales_report() {
        let (mut ledger, jacket, case) = stocked_ledger();
        let today = day(2026, 3, 31);
        cash_sale(&mut ledger, &jacket, 2, "Ana", day(2026, 3, 20));
        ledger
            .create_sale(new_sale(
                vec![SaleLine::new(&case, 3)],
                "Bruno",
                PaymentMethod::Card,
                1,
                day(2026, 3, 25),
            ))
            .unwrap();
        cash_sale(&mut ledger, &case, 1, "Ana", day(2026, 3, 26));
        // Too old
        cash_sale(&mut ledger, &jacket, 1, "Caio", day(2026, 1, 1));

        let report = ledger.sales_report(today, 30);
        assert_eq!(report.from, day(2026, 3, 2));
        assert_eq!(report.sale_count, 3);
        assert_eq!(report.total_cents, 30_000 + 10_500 + 3_500);
        assert_eq!(report.received_cents, 30_000 + 3_500);
        assert_eq!(report.pending_cents, 10_500);
        assert_eq!(report.profit_cents, 14_000 + 4 * 2_500);
        assert_eq!(report.average_ticket_cents, 44_000 / 3 + 1);

        assert_eq!(report.by_category[0].category, Category::Clothing);
        assert_eq!(report.by_category[1].quantity, 4);
        assert_eq!(report.by_method[0].method, PaymentMethod::Cash);
        assert_eq!(report.by_method[0].sale_count, 2);
        assert_eq!(report.top_products[0].revenue_cents, 30_000);
        assert_eq!(report.top_customers[0].customer_name, "Ana");
        assert_eq!(report.top_customers[0].purchases, 2);
        assert_eq!(report.top_customers[0].revenue_cents, 33_500);
    }

    #[test]
    fn test_one_day_report_covers_only_today() {
        let (mut ledger, jacket, case) = stocked_ledger();
        cash_sale(&mut ledger, &jacket, 1, "Ana", day(2026, 3, 30));
        cash_sale(&mut ledger, &case, 1, "Bruno", day(2026, 3, 31));

        let report = ledger.sales_report(day(2026, 3, 31), 1);
        assert_eq!(report.from, day(2026, 3, 31));
        assert_eq!(report.sale_count, 1);
        assert_eq!(report.total_cents, 3_500);
    }
}
