//! # atelier-core: Pure Business Logic for Atelier
//!
//! This crate is the **heart** of Atelier. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atelier Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Dashboard ──► Sales ──► Inventory ──► Payroll ──► Reports   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  │    routes, shared state, AI insight client, slip scheduler     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ atelier-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │  stock  │ │  sales  │ │ payroll │ │   │
//! │  │   │ Material│ │  Money  │ │ deltas  │ │ quotes  │ │  slips  │ │   │
//! │  │   │  Sale   │ │ Percent │ │shortages│ │snapshots│ │penalties│ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 atelier-store (Persistence Layer)               │   │
//! │  │            one JSON document per collection, export/import      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Material, Product, Sale, User, etc.)
//! - [`money`] - Money and Percent types with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`stock`] - Stock ledger deltas, reversal, shortage projection
//! - [`sales`] - Quote arithmetic, frozen snapshots, stock effects
//! - [`payroll`] - Salary derivation, waste penalty, slip lifecycle
//! - [`reports`] - Monthly waterfall and chart series
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Time Is an Input**: No clock reads; `DateTime<Utc>` values come from callers
//! 4. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use atelier_core::money::{Money, Percent};
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(10_000); // 100.00
//!
//! // Apply a 12% marketplace commission
//! let commission = Percent::from_percent(12.0).of(price);
//! assert_eq!(commission.cents(), 1200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod payroll;
pub mod reports;
pub mod sales;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use atelier_core::Money` instead of
// `use atelier_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percent};
pub use types::*;
