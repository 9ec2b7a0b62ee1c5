//! # Sales Ledger
//!
//! Quote arithmetic, the frozen-snapshot sale builder, stock consumption and
//! restocking, and the single place where snapshot-vs-live cost resolution
//! happens.
//!
//! ## The Fee Waterfall
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For a sale of gross total T on a marketplace:                          │
//! │                                                                         │
//! │    fees = fixed_fee                                                     │
//! │         + variable_fee% of T                                            │
//! │         + ads_fee%      of T                                            │
//! │         + tax%          of T                                            │
//! │         + shipping_cost                                                 │
//! │                                                                         │
//! │    net_revenue = T − fees                                               │
//! │                                                                         │
//! │  Both fees and production cost are FROZEN onto the sale at creation     │
//! │  (cost_snapshot / fee_snapshot). Editing a marketplace or a recipe      │
//! │  afterwards never rewrites recorded history.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Resolution
//! Records imported from before snapshots existed lack them. `fees` and
//! `cogs` are the ONLY places that decide between the frozen value and a live
//! recomputation; payroll and reports both go through them so the fallback
//! policy cannot drift between consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::stock::apply_delta;
use crate::types::{
    Marketplace, Material, PaymentMethod, Product, Sale, SaleItem, SaleStatus,
};

// =============================================================================
// Quote Arithmetic
// =============================================================================

/// The full channel fee for a gross total on one marketplace.
pub fn fee_total(marketplace: &Marketplace, total: Money) -> Money {
    marketplace.fixed_fee
        + marketplace.variable_fee.of(total)
        + marketplace.ads_fee.of(total)
        + marketplace.tax.of(total)
        + marketplace.shipping_cost
}

/// Production cost of ONE unit of a product: bill-of-materials cost plus
/// labor. BOM lines referencing a deleted material contribute zero.
pub fn unit_cost(product: &Product, materials: &[Material]) -> Money {
    let material_cost: Money = product
        .bill_of_materials
        .iter()
        .filter_map(|line| {
            materials
                .iter()
                .find(|m| m.id == line.material_id)
                .map(|m| m.cost_per_unit.mul_qty(line.quantity))
        })
        .sum();

    material_cost + product.labor_cost
}

/// A priced-out sale before commitment.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub total_amount: Money,
    pub fees: Money,
    pub net_revenue: Money,
    pub cost: Money,
}

/// Prices out a set of sale items against a marketplace and the current
/// catalog. Items referencing a deleted product still contribute their line
/// total (the price is frozen on the item) but zero cost.
pub fn quote(
    items: &[SaleItem],
    marketplace: &Marketplace,
    products: &[Product],
    materials: &[Material],
) -> Quote {
    let total: Money = items.iter().map(SaleItem::line_total).sum();
    let fees = fee_total(marketplace, total);

    let cost: Money = items
        .iter()
        .filter_map(|item| {
            products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|p| unit_cost(p, materials) * item.quantity)
        })
        .sum();

    Quote {
        total_amount: total,
        fees,
        net_revenue: total - fees,
        cost,
    }
}

// =============================================================================
// Sale Builder
// =============================================================================

/// Builds a sale with frozen cost and fee snapshots, status `Pending`.
///
/// `id` and `date` come from the caller — this crate does no I/O and reads
/// no clock. Stock is NOT touched here; the caller deducts via
/// `consume_stock` inside the same transaction.
#[allow(clippy::too_many_arguments)]
pub fn build(
    id: String,
    date: DateTime<Utc>,
    items: Vec<SaleItem>,
    marketplace: &Marketplace,
    payment_method: PaymentMethod,
    customer_name: Option<String>,
    products: &[Product],
    materials: &[Material],
) -> Sale {
    let quoted = quote(&items, marketplace, products, materials);

    Sale {
        id,
        date,
        items,
        marketplace_id: marketplace.id.clone(),
        marketplace_name: marketplace.name.clone(),
        payment_method,
        customer_name,
        total_amount: quoted.total_amount,
        net_revenue: quoted.net_revenue,
        cost_snapshot: Some(quoted.cost),
        fee_snapshot: Some(quoted.fees),
        status: SaleStatus::Pending,
    }
}

// =============================================================================
// Stock Effects
// =============================================================================

/// Deducts the material consumption of the given items from stock, using the
/// current bill of materials. Dangling product or material references are
/// skipped.
pub fn consume_stock(materials: &mut [Material], products: &[Product], items: &[SaleItem]) {
    apply_stock_effect(materials, products, items, -1.0);
}

/// Returns the material consumption of a sale to stock.
///
/// Restocking uses the bill of materials in effect NOW, not at sale time:
/// the physical recipe governs what actually goes back on the shelf, while
/// the money side of the deleted sale stays frozen in its snapshots.
pub fn restock(materials: &mut [Material], products: &[Product], sale: &Sale) {
    apply_stock_effect(materials, products, &sale.items, 1.0);
}

fn apply_stock_effect(
    materials: &mut [Material],
    products: &[Product],
    items: &[SaleItem],
    sign: f64,
) {
    for item in items {
        let Some(product) = products.iter().find(|p| p.id == item.product_id) else {
            continue;
        };
        for line in &product.bill_of_materials {
            apply_delta(
                materials,
                &line.material_id,
                sign * line.quantity * item.quantity as f64,
            );
        }
    }
}

/// Overwrites a sale's production status. Any status can move to any other;
/// there is no transition graph.
pub fn set_status(sale: &mut Sale, status: SaleStatus) {
    sale.status = status;
}

// =============================================================================
// Snapshot Resolution
// =============================================================================

/// A monetary figure together with its provenance: frozen at sale time, or
/// recomputed from the current catalog because no snapshot exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "source", content = "amount", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolved {
    Snapshot(Money),
    Recomputed(Money),
}

impl Resolved {
    /// The monetary value regardless of provenance.
    #[inline]
    pub fn amount(&self) -> Money {
        match self {
            Resolved::Snapshot(m) | Resolved::Recomputed(m) => *m,
        }
    }
}

/// Channel fees for a sale. Falls back to `total − net`, which is exactly
/// what the fees were at sale time.
pub fn fees(sale: &Sale) -> Resolved {
    match sale.fee_snapshot {
        Some(frozen) => Resolved::Snapshot(frozen),
        None => Resolved::Recomputed(sale.total_amount - sale.net_revenue),
    }
}

/// Production cost for a sale. Falls back to recomputation from the CURRENT
/// catalog, so legacy records drift when recipes change — snapshotted
/// records never do.
pub fn cogs(sale: &Sale, products: &[Product], materials: &[Material]) -> Resolved {
    match sale.cost_snapshot {
        Some(frozen) => Resolved::Snapshot(frozen),
        None => {
            let live: Money = sale
                .items
                .iter()
                .filter_map(|item| {
                    products
                        .iter()
                        .find(|p| p.id == item.product_id)
                        .map(|p| unit_cost(p, materials) * item.quantity)
                })
                .sum();
            Resolved::Recomputed(live)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
