//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Three installments of 100.00 / 3:                                      │
//! │    33.333... + 33.333... + 33.333... = 99.99999999  ❌                  │
//! │    A fully paid sale would stay "partial" forever.                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10000 cents split 3 ways = 3333 + 3333 + 3334                        │
//! │    The remainder lands on the last installment, sums are exact.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Settlement Tolerance
//! Every "is this paid?" comparison in the crate goes through
//! [`Money::settles`], which allows a shortfall of [`PAYMENT_TOLERANCE`]
//! (one cent). Nothing else in the crate compares owed amounts directly.
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let line = price * 3;                // 32.97
//! assert_eq!(line.cents(), 3297);
//!
//! let parts = Money::from_cents(10000).split_even(3);
//! assert_eq!(parts.iter().map(|m| m.cents()).sum::<i64>(), 10000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;
use crate::PAYMENT_TOLERANCE;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: balances and shortfalls can go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serializes as a plain integer**: stored collections hold cents
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  SaleItem.unit_price × qty ──► Sale.total ──► Payment.total            │
/// │                                                   │                     │
/// │  PaymentEntry.amount ──Σ──► Payment.received ◄────┘ (clamped)          │
/// │                                                                         │
/// │  CashMovement.amount ──Σ per channel──► CashBalances                    │
/// │                                                                         │
/// │  Loan.requested × (1 + rate) ──► Loan.total                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(150, 0).cents(), 15000);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal amount in major units, rounding to the nearest cent.
    ///
    /// Only for importing records written by tools that stored floats.
    /// Engine arithmetic never goes through here.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the larger of `self` and zero.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let line_total = Money::from_cents(299).multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a rate (in basis points) and returns the resulting portion.
    ///
    /// Used for loan interest and reinvestment targets.
    /// Integer math: `(amount * bps + 5000) / 10000`, the +5000 rounds
    /// half away from zero for positive amounts.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::types::Rate;
    ///
    /// let principal = Money::from_cents(100_000);  // 1000.00
    /// let interest = principal.apply_rate(Rate::from_bps(2000)); // 20%
    /// assert_eq!(interest.cents(), 20_000);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // i128 so large balances times 10000 cannot overflow
        let portion = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(portion as i64)
    }

    /// Returns `self × numerator / denominator`, rounded to the nearest cent.
    ///
    /// Returns zero when `denominator` is zero or negative.
    pub fn scale(&self, numerator: Money, denominator: Money) -> Money {
        if denominator.0 <= 0 {
            return Money::zero();
        }
        let num = self.0 as i128 * numerator.0 as i128;
        let den = denominator.0 as i128;
        let rounded = if num >= 0 {
            (num + den / 2) / den
        } else {
            (num - den / 2) / den
        };
        Money::from_cents(rounded as i64)
    }

    /// Splits the amount into `parts` shares that sum exactly to `self`.
    ///
    /// Every share is the floor of the even split; the remainder is added to
    /// the last share.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let shares = Money::from_cents(10000).split_even(3);
    /// let cents: Vec<i64> = shares.iter().map(|m| m.cents()).collect();
    /// assert_eq!(cents, vec![3333, 3333, 3334]);
    /// ```
    pub fn split_even(&self, parts: u32) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let n = parts as i64;
        let base = self.0.div_euclid(n);
        let mut shares = vec![Money(base); parts as usize];
        if let Some(last) = shares.last_mut() {
            last.0 = self.0 - base * (n - 1);
        }
        shares
    }

    /// True when `self` is enough to settle `owed`, allowing the
    /// one-cent [`PAYMENT_TOLERANCE`].
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let owed = Money::from_cents(10000);
    /// assert!(Money::from_cents(10000).settles(owed));
    /// assert!(Money::from_cents(9999).settles(owed));
    /// assert!(!Money::from_cents(9998).settles(owed));
    /// ```
    #[inline]
    pub fn settles(&self, owed: Money) -> bool {
        self.0 >= owed.0 - PAYMENT_TOLERANCE.0
    }

    /// True when an outstanding balance is large enough to count as debt.
    #[inline]
    pub fn exceeds_tolerance(&self) -> bool {
        self.0 > PAYMENT_TOLERANCE.0
    }

    /// Returns `self / whole` as a percentage (for display only).
    ///
    /// Returns 0.0 when `whole` is zero.
    pub fn percent_of(&self, whole: Money) -> f64 {
        if whole.is_zero() {
            return 0.0;
        }
        self.0 as f64 / whole.0 as f64 * 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering, e.g. `-5.50`.
///
/// Currency symbols belong to `LedgerConfig::format_currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
