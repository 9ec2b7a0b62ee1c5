//! # Error Types
//!
//! Domain-specific error types for atelier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  atelier-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  atelier-store errors (separate crate)                                 │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Frontend  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (names, IDs, amounts)
//! 3. Errors are enum variants, never String
//! 4. Soft conditions (stock shortages, negative payouts) are NOT errors —
//!    they are data returned to the caller for confirmation

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or missing entities.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Material ID doesn't exist in the catalog.
    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    /// Product ID doesn't exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Marketplace ID doesn't exist in the catalog.
    #[error("Marketplace not found: {0}")]
    MarketplaceNotFound(String),

    /// Sale ID doesn't exist in the ledger.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Inventory transaction ID doesn't exist in the log.
    #[error("Inventory transaction not found: {0}")]
    InventoryTransactionNotFound(String),

    /// Operational target ID doesn't exist.
    #[error("Operational target not found: {0}")]
    TargetNotFound(String),

    /// User ID doesn't exist.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Payroll transaction ID doesn't exist in the ledger.
    #[error("Payroll transaction not found: {0}")]
    PayrollTransactionNotFound(String),

    /// The user has no payroll configuration, so slips cannot be computed.
    #[error("User {0} has no payroll configuration")]
    NoPayrollConfig(String),

    /// The slip is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Confirming a slip that is already PAID
    /// - Confirming a transaction that is an advance, not a slip
    #[error("Payroll transaction {id} is {status}, cannot perform operation")]
    InvalidPayrollStatus { id: String, status: String },

    /// Deleting this user would leave the system with no users at all.
    #[error("Cannot delete the last remaining user")]
    LastUser,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed PIN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::MaterialNotFound("m-123".to_string());
        assert_eq!(err.to_string(), "Material not found: m-123");

        let err = CoreError::InvalidPayrollStatus {
            id: "slip-1".to_string(),
            status: "PAID".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Payroll transaction slip-1 is PAID, cannot perform operation"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
