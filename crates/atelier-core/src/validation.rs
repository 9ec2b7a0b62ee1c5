//! # Validation Module
//!
//! Input validation utilities for Atelier.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP route handler (Rust)                                    │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │                                                                         │
//! │  A validation failure always means: reject the request, change no      │
//! │  state. Soft warnings (stock shortages, negative payouts) are NOT      │
//! │  validation failures — they go back as data awaiting confirmation.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::{Money, Percent};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity display name (material, product, marketplace, user).
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use atelier_core::validation::validate_name;
///
/// assert!(validate_name("Kraft Paper 180g").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a login PIN.
///
/// ## Rules
/// - 4 to 8 digits, nothing else
///
/// The PIN is a terminal-sharing convenience, not a security mechanism, but
/// garbage input is still rejected at the door.
pub fn validate_pin(pin: &str) -> ValidationResult<()> {
    if pin.is_empty() {
        return Err(ValidationError::Required {
            field: "pin".to_string(),
        });
    }

    if pin.len() < 4 || pin.len() > 8 || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "pin".to_string(),
            reason: "must be 4 to 8 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a physical quantity (stock movement, log value, BOM line).
///
/// ## Rules
/// - Must be strictly positive
/// - Must be finite (NaN/infinity come from bad JSON, reject them)
pub fn validate_quantity(qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() || qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a sale line quantity (whole units).
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a monetary amount that must not be negative.
///
/// ## Rules
/// - Zero is allowed (free shipping, no labor cost)
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage rate.
///
/// ## Rules
/// - Must be between 0 and 10000 bps (0% to 100%)
pub fn validate_percent(field: &str, rate: Percent) -> ValidationResult<()> {
    if rate.bps() > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a payroll cutoff day.
///
/// ## Rules
/// - Must be a calendar day, 1 through 31. In short months a cutoff past the
///   month's end simply fires on the last run of the month.
pub fn validate_cutoff_day(day: u32) -> ValidationResult<()> {
    if day == 0 || day > 31 {
        return Err(ValidationError::OutOfRange {
            field: "cutoffDay".to_string(),
            min: 1,
            max: 31,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Kraft Paper 180g").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_pin() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("87654321").is_ok());

        assert!(validate_pin("").is_err());
        assert!(validate_pin("12").is_err());
        assert!(validate_pin("123456789").is_err());
        assert!(validate_pin("12a4").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0.5).is_ok());
        assert!(validate_quantity(30.0).is_ok());

        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_sale_quantity() {
        assert!(validate_sale_quantity(1).is_ok());
        assert!(validate_sale_quantity(0).is_err());
        assert!(validate_sale_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("price", Money::from_cents(0)).is_ok());
        assert!(validate_amount("price", Money::from_cents(1099)).is_ok());
        assert!(validate_amount("price", Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent("tax", Percent::from_bps(0)).is_ok());
        assert!(validate_percent("tax", Percent::from_bps(10_000)).is_ok());
        assert!(validate_percent("tax", Percent::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_validate_cutoff_day() {
        assert!(validate_cutoff_day(1).is_ok());
        assert!(validate_cutoff_day(31).is_ok());
        assert!(validate_cutoff_day(0).is_err());
        assert!(validate_cutoff_day(32).is_err());
    }
}
