//! # Domain Types
//!
//! Core domain types used throughout Atelier.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog                  Ledgers                  People               │
//! │  ┌─────────────────┐      ┌─────────────────┐      ┌─────────────────┐  │
//! │  │  Material       │      │  Sale           │      │  User           │  │
//! │  │  Product (BOM)  │      │  InventoryTxn   │      │  PayrollConfig  │  │
//! │  │  Marketplace    │      │  OperationalLog │      │  PayrollTxn     │  │
//! │  └─────────────────┘      │  Expense        │      └─────────────────┘  │
//! │                           └─────────────────┘                           │
//! │                                                                         │
//! │  Snapshot pattern: Sale freezes cost_snapshot + fee_snapshot at         │
//! │  creation; PayrollTransaction freezes its PayBreakdown on payment.      │
//! │  History stays truthful even when the catalog is edited later.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Structs serialize with camelCase field names and enums with
//! SCREAMING_SNAKE_CASE values, matching the JSON documents the store persists
//! and the frontend consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percent};

// =============================================================================
// Units & Roles
// =============================================================================

/// Physical unit a material is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    /// Discrete pieces.
    Un,
    /// Kilograms.
    Kg,
    /// Litres.
    L,
    /// Linear metres.
    M,
    /// Square metres.
    M2,
}

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
}

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Pix,
    Card,
    Cash,
}

// =============================================================================
// Catalog: Material / Product / Marketplace
// =============================================================================

/// A raw material held in stock.
///
/// Stock levels are `f64` because the shop measures fractional metres and
/// litres. `current_stock` MAY go negative: the ledger records reality, and a
/// projected shortage is a soft warning, never a hard stop.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Physical unit stock is counted in.
    pub unit: Unit,

    /// Acquisition cost per unit.
    pub cost_per_unit: Money,

    /// Current stock level (may be negative).
    pub current_stock: f64,

    /// Threshold below which shortage warnings fire.
    pub min_stock: f64,

    /// Tolerated production loss, as a share of theoretical consumption.
    pub loss_tolerance: Percent,
}

/// One line of a product's bill of materials.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    pub material_id: String,
    /// Quantity of the material consumed per finished unit.
    pub quantity: f64,
}

/// A finished product assembled from materials plus labor.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,

    /// Recipe: materials consumed per finished unit.
    /// Lines referencing a deleted material contribute zero cost.
    pub bill_of_materials: Vec<BomLine>,

    /// List price per unit.
    pub selling_price: Money,

    /// Labor cost per unit, added on top of material cost.
    pub labor_cost: Money,
}

/// A sales channel with its fee structure.
///
/// The fee waterfall for a sale total T is:
/// `fixed_fee + variable_fee(T) + ads_fee(T) + tax(T) + shipping_cost`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Marketplace {
    pub id: String,
    pub name: String,
    pub fixed_fee: Money,
    pub variable_fee: Percent,
    pub ads_fee: Percent,
    pub shipping_cost: Money,
    pub tax: Percent,
}

// =============================================================================
// Sales Ledger
// =============================================================================

/// Production status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Pending,
    InProduction,
    Completed,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

/// A line item in a sale.
/// Unit price is frozen at sale time (snapshot pattern).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    pub quantity: i64,
    /// Price per unit at time of sale (frozen).
    pub unit_price: Money,
}

impl SaleItem {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// A recorded sale.
///
/// `cost_snapshot` and `fee_snapshot` freeze the production cost and channel
/// fees at creation time; later catalog edits do not rewrite history. Both are
/// `Option` because records imported from before snapshots existed lack them —
/// consumers fall back to live recomputation (see `sales::cogs` / `sales::fees`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<SaleItem>,
    pub marketplace_id: String,
    /// Channel name at time of sale (frozen).
    pub marketplace_name: String,
    pub payment_method: PaymentMethod,
    pub customer_name: Option<String>,
    /// Gross amount charged (Σ line totals).
    pub total_amount: Money,
    /// Gross minus the full fee waterfall.
    pub net_revenue: Money,
    /// Production cost (materials + labor) frozen at creation.
    pub cost_snapshot: Option<Money>,
    /// Channel fees frozen at creation.
    pub fee_snapshot: Option<Money>,
    pub status: SaleStatus,
}

// =============================================================================
// Inventory Transaction Log
// =============================================================================

/// Direction of a manual stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryKind {
    /// Restock: stock goes up.
    Add,
    /// Waste/damage: stock goes down. Feeds the payroll waste penalty.
    Loss,
}

/// An immutable record of a manual stock movement.
///
/// `quantity` is always positive; the sign comes from `kind`. The material
/// name and acting user are frozen so the log keeps rendering after the
/// material or user is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub material_id: String,
    /// Material name at time of recording (frozen).
    pub material_name: String,
    #[serde(rename = "type")]
    pub kind: InventoryKind,
    /// Magnitude of the movement, always > 0.
    pub quantity: f64,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

// =============================================================================
// Operational Metrics
// =============================================================================

/// A productivity metric with a daily goal and a per-unit bonus rate.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OperationalTarget {
    pub id: String,
    /// Metric identity. Logs match targets by this name (soft reference:
    /// renaming a target orphans old logs, which then earn no bonus).
    pub metric_name: String,
    pub target_daily: f64,
    /// Bonus paid per unit of recorded value.
    pub unit_rate: Money,
}

/// One recorded unit of operational work.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OperationalLog {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub metric_name: String,
    /// Recorded quantity, always > 0.
    pub value: f64,
}

// =============================================================================
// Users & Payroll
// =============================================================================

/// How a user's base pay is derived.
///
/// The two variants carry different kinds of numbers (an amount vs. a rate),
/// so they are distinct variants instead of one overloaded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "salaryType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalaryBasis {
    /// Flat monthly salary.
    Fixed { monthly: Money },
    /// Share of the month's contribution margin.
    ProfitShare { percent: Percent },
}

/// Payroll parameters for one user.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayrollConfig {
    #[serde(flatten)]
    pub basis: SalaryBasis,

    /// Day of the month (1..=31) on which the salary slip becomes due.
    pub cutoff_day: u32,

    /// Share of excess-waste cost charged back to the user. Zero disables
    /// the penalty entirely.
    pub waste_penalty: Percent,
}

/// A system user. `payroll` is absent for users outside the payroll engine.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Login PIN, compared as plaintext. This is an access convenience for a
    /// single shared terminal, not a security boundary.
    pub pin: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payroll: Option<PayrollConfig>,
}

/// Kind of payroll ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollKind {
    /// Money given to the user ahead of the slip; deducted on confirmation.
    Advance,
    /// The monthly salary slip itself.
    SalarySlip,
}

/// Settlement status of a payroll entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    Pending,
    Paid,
}

/// Frozen decomposition of a confirmed salary payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayBreakdown {
    pub base: Money,
    pub bonus: Money,
    pub advances: Money,
    pub waste_penalty: Money,
}

/// One entry in the payroll ledger (an advance or a salary slip).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayrollTransaction {
    pub id: String,
    pub user_id: String,
    /// User name at time of recording (frozen).
    pub user_name: String,
    #[serde(rename = "type")]
    pub kind: PayrollKind,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub status: PayrollStatus,
    pub description: Option<String>,
    /// Set when a slip is confirmed; frozen forever after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PayBreakdown>,
}

// =============================================================================
// Expenses & System Config
// =============================================================================

/// Category name for expenses auto-created by salary confirmation.
pub const PAYROLL_EXPENSE_CATEGORY: &str = "PAYROLL";

/// A business expense outside the sales fee waterfall.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    /// Free-form category; `PAYROLL` entries are created by the payroll engine.
    pub category: String,
}

/// Shop-wide settings editable by admins.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    /// Notice shown to everyone on the dashboard.
    pub daily_message: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            daily_message: String::new(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
