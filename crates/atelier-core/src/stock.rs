//! # Stock Ledger
//!
//! Pure stock-mutation logic: signed deltas on material stock levels,
//! reversal of recorded movements, and shortage projection.
//!
//! ## The One Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stock is a LEDGER, not a constraint.                                   │
//! │                                                                         │
//! │  • Levels may go negative — the number records reality, and reality     │
//! │    sometimes is "we used material we hadn't booked in yet".             │
//! │  • A projected shortage is a WARNING returned to the caller, who must   │
//! │    confirm before committing. It is never a hard error.                 │
//! │  • Deltas targeting a deleted material are silently dropped: history    │
//! │    may reference catalog entries that no longer exist.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{InventoryKind, InventoryTransaction, Material, Product, SaleItem};

// =============================================================================
// Deltas
// =============================================================================

/// Applies a signed stock delta to one material.
///
/// Returns `true` if a material was found and mutated, `false` if the id is
/// dangling (a no-op, not an error).
pub fn apply_delta(materials: &mut [Material], material_id: &str, delta: f64) -> bool {
    match materials.iter_mut().find(|m| m.id == material_id) {
        Some(material) => {
            material.current_stock += delta;
            true
        }
        None => false,
    }
}

/// The signed stock effect of an inventory transaction.
///
/// `Add` movements raised stock, `Loss` movements lowered it; the stored
/// quantity is always the positive magnitude.
pub fn signed_delta(txn: &InventoryTransaction) -> f64 {
    match txn.kind {
        InventoryKind::Add => txn.quantity,
        InventoryKind::Loss => -txn.quantity,
    }
}

/// Reverses the stock effect of a recorded inventory transaction.
///
/// Used when a log entry is deleted: the material (if it still exists) gets
/// the inverse of the original delta.
pub fn reverse(materials: &mut [Material], txn: &InventoryTransaction) -> bool {
    apply_delta(materials, &txn.material_id, -signed_delta(txn))
}

// =============================================================================
// Shortage Projection
// =============================================================================

/// A projected stock shortage, returned for user confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shortage {
    pub material_id: String,
    pub material_name: String,
    pub current_stock: f64,
    /// Stock level after the proposed consumption.
    pub projected_stock: f64,
    pub min_stock: f64,
}

/// Projects the stock impact of producing `quantity` units of a product.
///
/// Returns one `Shortage` per bill-of-materials line whose projected level
/// would fall below the material's minimum. Dangling BOM references are
/// skipped. An empty vec means the sale can commit without confirmation.
pub fn shortages(materials: &[Material], product: &Product, quantity: i64) -> Vec<Shortage> {
    let mut required = Vec::new();
    accumulate(&mut required, product, quantity);
    project(materials, required)
}

/// Projects the combined stock impact of a whole multi-line order.
///
/// Required quantities are aggregated per material across ALL lines before
/// projecting, so two lines sharing a material cannot each pass the minimum
/// individually while crossing it together. At most one `Shortage` per
/// material. Lines referencing a deleted product are skipped.
pub fn order_shortages(
    materials: &[Material],
    products: &[Product],
    items: &[SaleItem],
) -> Vec<Shortage> {
    let mut required: Vec<(String, f64)> = Vec::new();
    for item in items {
        let Some(product) = products.iter().find(|p| p.id == item.product_id) else {
            continue;
        };
        accumulate(&mut required, product, item.quantity);
    }
    project(materials, required)
}

fn accumulate(required: &mut Vec<(String, f64)>, product: &Product, quantity: i64) {
    for line in &product.bill_of_materials {
        let needed = line.quantity * quantity as f64;
        match required.iter_mut().find(|(id, _)| *id == line.material_id) {
            Some((_, total)) => *total += needed,
            None => required.push((line.material_id.clone(), needed)),
        }
    }
}

fn project(materials: &[Material], required: Vec<(String, f64)>) -> Vec<Shortage> {
    let mut warnings = Vec::new();

    for (material_id, needed) in required {
        let Some(material) = materials.iter().find(|m| m.id == material_id) else {
            continue;
        };

        let projected = material.current_stock - needed;
        if projected < material.min_stock {
            warnings.push(Shortage {
                material_id: material.id.clone(),
                material_name: material.name.clone(),
                current_stock: material.current_stock,
                projected_stock: projected,
                min_stock: material.min_stock,
            });
        }
    }

    warnings
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Money, Percent};
    use crate::types::{BomLine, Unit};
    use chrono::Utc;

    fn material(id: &str, stock: f64, min: f64) -> Material {
        Material {
            id: id.to_string(),
            name: format!("Material {id}"),
            unit: Unit::M2,
            cost_per_unit: Money::from_cents(200),
            current_stock: stock,
            min_stock: min,
            loss_tolerance: Percent::from_percent(5.0),
        }
    }

    fn txn(material_id: &str, kind: InventoryKind, qty: f64) -> InventoryTransaction {
        InventoryTransaction {
            id: "t1".to_string(),
            date: Utc::now(),
            material_id: material_id.to_string(),
            material_name: "Material".to_string(),
            kind,
            quantity: qty,
            user_id: None,
            user_name: None,
        }
    }

    #[test]
    fn test_apply_delta() {
        let mut materials = vec![material("m1", 10.0, 2.0)];

        assert!(apply_delta(&mut materials, "m1", 5.0));
        assert!((materials[0].current_stock - 15.0).abs() < f64::EPSILON);

        assert!(apply_delta(&mut materials, "m1", -20.0));
        // negative stock is allowed
        assert!((materials[0].current_stock - (-5.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_delta_dangling_id_is_noop() {
        let mut materials = vec![material("m1", 10.0, 2.0)];
        assert!(!apply_delta(&mut materials, "ghost", 5.0));
        assert!((materials[0].current_stock - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reverse_is_inverse_of_apply() {
        let mut materials = vec![material("m1", 10.0, 2.0)];

        let add = txn("m1", InventoryKind::Add, 4.0);
        apply_delta(&mut materials, "m1", signed_delta(&add));
        reverse(&mut materials, &add);
        assert!((materials[0].current_stock - 10.0).abs() < f64::EPSILON);

        let loss = txn("m1", InventoryKind::Loss, 3.5);
        apply_delta(&mut materials, "m1", signed_delta(&loss));
        reverse(&mut materials, &loss);
        assert!((materials[0].current_stock - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_signed_delta() {
        assert!((signed_delta(&txn("m1", InventoryKind::Add, 2.0)) - 2.0).abs() < f64::EPSILON);
        assert!((signed_delta(&txn("m1", InventoryKind::Loss, 2.0)) + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shortages() {
        let materials = vec![material("m1", 10.0, 2.0), material("m2", 100.0, 5.0)];
        let product = Product {
            id: "p1".to_string(),
            name: "Gift Box".to_string(),
            bill_of_materials: vec![
                BomLine {
                    material_id: "m1".to_string(),
                    quantity: 3.0,
                },
                BomLine {
                    material_id: "m2".to_string(),
                    quantity: 1.0,
                },
            ],
            selling_price: Money::from_cents(5000),
            labor_cost: Money::from_cents(500),
        };

        // 3 units consume 9.0 of m1 → projected 1.0 < min 2.0
        let warnings = shortages(&materials, &product, 3);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].material_id, "m1");
        assert!((warnings[0].projected_stock - 1.0).abs() < f64::EPSILON);

        // 1 unit leaves 7.0 of m1 → no warnings
        assert!(shortages(&materials, &product, 1).is_empty());
    }

    #[test]
    fn test_order_shortages_aggregates_shared_materials() {
        let materials = vec![material("m1", 10.0, 2.0)];
        let bom = |qty: f64| {
            vec![BomLine {
                material_id: "m1".to_string(),
                quantity: qty,
            }]
        };
        let products = vec![
            Product {
                id: "p1".to_string(),
                name: "Banner".to_string(),
                bill_of_materials: bom(3.0),
                selling_price: Money::from_cents(5000),
                labor_cost: Money::zero(),
            },
            Product {
                id: "p2".to_string(),
                name: "Poster".to_string(),
                bill_of_materials: bom(4.0),
                selling_price: Money::from_cents(3000),
                labor_cost: Money::zero(),
            },
        ];
        let item = |product_id: &str, qty: i64| SaleItem {
            product_id: product_id.to_string(),
            quantity: qty,
            unit_price: Money::from_cents(1000),
        };

        // each line alone stays above the minimum (10−6=4, 10−4=6, min 2)
        assert!(shortages(&materials, &products[0], 2).is_empty());
        assert!(shortages(&materials, &products[1], 1).is_empty());

        // together they drain the material to 0: one warning, not two
        let order = vec![item("p1", 2), item("p2", 1)];
        let warnings = order_shortages(&materials, &products, &order);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].material_id, "m1");
        assert!((warnings[0].projected_stock - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shortages_skips_dangling_bom_lines() {
        let materials = vec![material("m1", 10.0, 2.0)];
        let product = Product {
            id: "p1".to_string(),
            name: "Gift Box".to_string(),
            bill_of_materials: vec![BomLine {
                material_id: "ghost".to_string(),
                quantity: 100.0,
            }],
            selling_price: Money::from_cents(5000),
            labor_cost: Money::zero(),
        };

        assert!(shortages(&materials, &product, 10).is_empty());
    }
}
