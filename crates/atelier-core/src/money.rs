//! # Money Module
//!
//! Provides the `Money` and `Percent` types for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The system this replaces kept every price and fee as a float and       │
//! │  summed them across months of sales. We keep integer cents instead:     │
//! │    a month of ledger sums is exact, and any rounding happens at one     │
//! │    explicit point (quantity × unit price, percentage fees).             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Physical quantities (stock levels, bill-of-materials amounts) stay `f64` —
//! the shop measures fractional metres and litres — but the moment a quantity
//! meets a price, the result is rounded to a cent and becomes `Money`.
//!
//! ## Usage
//! ```rust
//! use atelier_core::money::{Money, Percent};
//!
//! let price = Money::from_cents(10_00); // 10.00
//! let fee = Percent::from_bps(1200).of(price); // 12% -> 1.20
//! assert_eq!(fee.cents(), 120);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: payroll totals and net profit can go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies by a fractional quantity, rounding to the nearest cent.
    ///
    /// This is the ONE place where ledger arithmetic touches floating point:
    /// bill-of-materials quantities are fractional (0.5 m² of paper), so a
    /// material cost is `cost_per_unit.mul_qty(0.5)`. Half-cents round away
    /// from zero.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let per_unit = Money::from_cents(250); // 2.50
    /// assert_eq!(per_unit.mul_qty(0.5).cents(), 125);
    /// assert_eq!(per_unit.mul_qty(10.0).cents(), 2500);
    /// ```
    pub fn mul_qty(&self, qty: f64) -> Money {
        Money((self.0 as f64 * qty).round() as i64)
    }
}

/// Display implementation shows money in a human-readable format.
///
/// This is for logs and debugging. The frontend formats currency itself
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by integer (for sale quantities).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Ledger columns are summed constantly; make `.sum()` work directly.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1200 bps = 12% (e.g., a marketplace commission)
///
/// Marketplace fees, tax rates, loss tolerances and waste-penalty rates are
/// all percentages; storing them as integers keeps fee math exact up to the
/// single rounding at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a plain percent value (for convenience).
    pub fn from_percent(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
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
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Applies the percentage to a monetary amount.
    ///
    /// Integer math with rounding: `(amount * bps + 5000) / 10000`.
    /// Uses i128 to prevent overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::{Money, Percent};
    ///
    /// let amount = Money::from_cents(10_000); // 100.00
    /// assert_eq!(Percent::from_bps(1200).of(amount).cents(), 1200); // 12%
    /// ```
    pub fn of(&self, amount: Money) -> Money {
        let cents = (amount.cents() as i128 * self.0 as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Applies the percentage to a physical quantity.
    ///
    /// Used for loss tolerances: 5% of 30 m² consumed is 1.5 m² of allowed
    /// waste. Quantities stay fractional, so no rounding here.
    pub fn of_qty(&self, qty: f64) -> f64 {
        qty * self.0 as f64 / 10000.0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 75].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 425);
    }

    #[test]
    fn test_mul_qty_rounds_to_cent() {
        let per_unit = Money::from_cents(333);
        // 333 * 1.5 = 499.5 -> 500
        assert_eq!(per_unit.mul_qty(1.5).cents(), 500);
        assert_eq!(per_unit.mul_qty(0.0).cents(), 0);
    }

    #[test]
    fn test_percent_of_money() {
        let amount = Money::from_cents(10_000);
        assert_eq!(Percent::from_bps(1200).of(amount).cents(), 1200);
        // 100.00 at 4% = 4.00
        assert_eq!(Percent::from_bps(400).of(amount).cents(), 400);
        // rounding: 10.00 at 8.25% = 0.825 -> 0.83
        assert_eq!(Percent::from_bps(825).of(Money::from_cents(1000)).cents(), 83);
    }

    #[test]
    fn test_percent_of_qty() {
        // 5% of 30 units = 1.5 units of tolerated loss
        let tolerance = Percent::from_percent(5.0);
        assert!((tolerance.of_qty(30.0) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_from_percent() {
        assert_eq!(Percent::from_percent(12.0).bps(), 1200);
        assert_eq!(Percent::from_percent(8.25).bps(), 825);
        assert!(Percent::from_percent(0.0).is_zero());
    }
}
