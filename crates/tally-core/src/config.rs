//! # Ledger Configuration
//!
//! The tunable numbers the engine reads while applying intents.
//!
//! The engine never looks at the environment or the file system; tally-db
//! builds a `LedgerConfig` from its own configuration sources and hands it
//! to [`crate::LedgerState::new`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Rate;
use crate::{DEFAULT_LOAN_INTEREST_BPS, INSTALLMENT_INTERVAL_DAYS, LOW_STOCK_THRESHOLD};

/// Engine configuration.
///
/// The payment tolerance is not configurable: it is
/// [`crate::PAYMENT_TOLERANCE`] everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerConfig {
    /// Interest fixed on new loans, in basis points.
    /// e.g., 2000 = 20%
    pub loan_interest_bps: u32,

    /// Days between installment due dates.
    pub installment_interval_days: i64,

    /// Products at or below this quantity show as low stock.
    pub low_stock_threshold: i64,

    /// Currency symbol for display.
    pub currency_symbol: String,

    /// Shop name (printed on receipts).
    pub shop_name: String,
}

impl Default for LedgerConfig {
    /// ## Default Values
    /// - Loan interest: 20%
    /// - Installments: every 30 days
    /// - Low stock: 3 units or fewer
    /// - Currency: R$
    fn default() -> Self {
        LedgerConfig {
            loan_interest_bps: DEFAULT_LOAN_INTEREST_BPS,
            installment_interval_days: INSTALLMENT_INTERVAL_DAYS,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            currency_symbol: "R$".to_string(),
            shop_name: "Tally Shop".to_string(),
        }
    }
}

impl LedgerConfig {
    #[inline]
    pub fn loan_interest(&self) -> Rate {
        Rate::from_bps(self.loan_interest_bps)
    }

    /// Formats an amount with the currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{LedgerConfig, Money};
    ///
    /// let config = LedgerConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "R$ 12.34");
    /// assert_eq!(config.format_currency(Money::from_cents(-50)), "-R$ 0.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{} {}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.loan_interest().bps(), 2000);
        assert_eq!(config.installment_interval_days, 30);
        assert_eq!(config.low_stock_threshold, 3);
    }

    #[test]
    fn test_format_currency() {
        let config = LedgerConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(100)), "R$ 1.00");
        assert_eq!(config.format_currency(Money::zero()), "R$ 0.00");
        assert_eq!(config.format_currency(Money::from_cents(123456789)), "R$ 1234567.89");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: LedgerConfig = serde_json::from_str(r#"{"loanInterestBps": 1500}"#).unwrap();
        assert_eq!(config.loan_interest_bps, 1500);
        assert_eq!(config.low_stock_threshold, 3);
    }
}
