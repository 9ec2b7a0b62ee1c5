//! # Payroll Engine
//!
//! Monthly salary derivation: base pay, operational bonus, advance deduction,
//! the waste penalty, and the slip lifecycle.
//!
//! ## The Payout Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  final = base + bonus − advances − waste_penalty                        │
//! │                                                                         │
//! │  base      FIXED: the configured monthly amount                         │
//! │            PROFIT_SHARE: percent of the month's contribution margin     │
//! │  bonus     Σ over targets: (month's logged value for the metric)        │
//! │            × unit rate                                                  │
//! │  advances  ALL pending advances for the user, regardless of month;      │
//! │            confirmation marks every one of them PAID, so an advance     │
//! │            is deducted exactly once                                     │
//! │  penalty   excess-waste cost allocated to the user (see below)         │
//! │                                                                         │
//! │  final MAY be negative (penalties exceeding pay). Confirming a          │
//! │  negative slip is the caller's decision — this module computes, the     │
//! │  API layer gates.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Waste Penalty
//! Per material, for the slip's month:
//! 1. theoretical consumption = Σ over the month's sales of
//!    BOM quantity × units sold (current recipes)
//! 2. allowed loss = theoretical × the material's loss tolerance
//! 3. excess = recorded LOSS total − allowed loss (only if positive)
//! 4. excess cost = excess × cost per unit
//! 5. the user pays: excess cost × (user's share of recorded losses)
//!    × their configured penalty percent
//!
//! Every charged line carries its full derivation so the user can audit
//! the deduction.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::sales::{cogs, fees};
use crate::types::{
    Expense, InventoryKind, InventoryTransaction, Material, OperationalLog, OperationalTarget,
    PayBreakdown, PayrollKind, PayrollStatus, PayrollTransaction, Product, Sale, SalaryBasis,
    User, PAYROLL_EXPENSE_CATEGORY,
};

// =============================================================================
// Month Reference
// =============================================================================

/// A calendar month used to bucket ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthRef {
    pub year: i32,
    /// 1 through 12.
    pub month: u32,
}

impl MonthRef {
    /// The month a timestamp falls in.
    pub fn of(date: DateTime<Utc>) -> Self {
        MonthRef {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whether a timestamp falls inside this month.
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

// =============================================================================
// Building Blocks
// =============================================================================

/// Operational bonus for a month: for each target, the sum of the month's
/// logged values under that metric name, times the target's unit rate.
///
/// Logs carry no user attribution, so the bonus is shared shop output for
/// the month, not per-person piecework. Logs whose metric name matches no
/// target earn nothing.
pub fn bonus_for_month(
    logs: &[OperationalLog],
    targets: &[OperationalTarget],
    month: MonthRef,
) -> Money {
    let month_logs: Vec<&OperationalLog> =
        logs.iter().filter(|l| month.contains(l.date)).collect();

    targets
        .iter()
        .map(|t| {
            let value: f64 = month_logs
                .iter()
                .filter(|l| l.metric_name == t.metric_name)
                .map(|l| l.value)
                .sum();
            t.unit_rate.mul_qty(value)
        })
        .sum()
}

/// Total of ALL pending advances for a user, regardless of when they were
/// taken. Confirmation clears them all, so nothing is counted twice.
pub fn pending_advances(transactions: &[PayrollTransaction], user_id: &str) -> Money {
    transactions
        .iter()
        .filter(|t| {
            t.user_id == user_id
                && t.kind == PayrollKind::Advance
                && t.status == PayrollStatus::Pending
        })
        .map(|t| t.amount)
        .sum()
}

/// Contribution margin for a month: Σ over the month's sales of
/// revenue − fees − cost of goods, using frozen snapshots where present.
pub fn contribution_margin(
    sales: &[Sale],
    products: &[Product],
    materials: &[Material],
    month: MonthRef,
) -> Money {
    sales
        .iter()
        .filter(|s| month.contains(s.date))
        .map(|s| s.total_amount - fees(s).amount() - cogs(s, products, materials).amount())
        .sum()
}

// =============================================================================
// Waste Penalty
// =============================================================================

/// One material's line in the waste-penalty audit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WastePenaltyLine {
    pub material_name: String,
    /// BOM-implied consumption from the month's sales.
    pub theoretical: f64,
    /// Loss quantity tolerated before penalties start.
    pub allowed_loss: f64,
    /// Total LOSS quantity recorded for the material this month.
    pub actual_total_loss: f64,
    pub excess_qty: f64,
    /// The user's own recorded losses of this material.
    pub user_loss_qty: f64,
    /// What the user is charged for this material.
    pub penalty: Money,
}

/// The full waste-penalty result for one user and month.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WastePenalty {
    pub total: Money,
    pub lines: Vec<WastePenaltyLine>,
}

impl WastePenalty {
    pub fn none() -> Self {
        WastePenalty {
            total: Money::zero(),
            lines: Vec::new(),
        }
    }
}

/// Computes the waste penalty for one user and month.
///
/// Returns zero with no lines when the user has no penalty percent
/// configured, when every material's loss stayed within tolerance, or when
/// the user recorded no losses of an over-tolerance material.
#[allow(clippy::too_many_arguments)]
pub fn waste_penalty(
    user: &User,
    sales: &[Sale],
    products: &[Product],
    materials: &[Material],
    inventory: &[InventoryTransaction],
    month: MonthRef,
) -> WastePenalty {
    let Some(config) = &user.payroll else {
        return WastePenalty::none();
    };
    if config.waste_penalty.is_zero() {
        return WastePenalty::none();
    }

    // theoretical consumption per material from the month's sales,
    // priced out with the current recipes
    let month_sales: Vec<&Sale> = sales.iter().filter(|s| month.contains(s.date)).collect();
    let theoretical_for = |material_id: &str| -> f64 {
        month_sales
            .iter()
            .flat_map(|s| &s.items)
            .filter_map(|item| {
                products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map(|p| (p, item.quantity))
            })
            .map(|(p, qty)| {
                p.bill_of_materials
                    .iter()
                    .filter(|line| line.material_id == material_id)
                    .map(|line| line.quantity * qty as f64)
                    .sum::<f64>()
            })
            .sum()
    };

    let month_losses: Vec<&InventoryTransaction> = inventory
        .iter()
        .filter(|t| t.kind == InventoryKind::Loss && month.contains(t.date))
        .collect();

    let mut total = Money::zero();
    let mut lines = Vec::new();

    for material in materials {
        let theoretical = theoretical_for(&material.id);
        let allowed_loss = material.loss_tolerance.of_qty(theoretical);

        let material_losses: Vec<&&InventoryTransaction> = month_losses
            .iter()
            .filter(|t| t.material_id == material.id)
            .collect();
        let actual_total_loss: f64 = material_losses.iter().map(|t| t.quantity).sum();

        if actual_total_loss <= allowed_loss {
            continue;
        }

        let excess_qty = actual_total_loss - allowed_loss;
        let excess_cost = material.cost_per_unit.mul_qty(excess_qty);

        let user_loss_qty: f64 = material_losses
            .iter()
            .filter(|t| t.user_id.as_deref() == Some(user.id.as_str()))
            .map(|t| t.quantity)
            .sum();

        if user_loss_qty <= 0.0 {
            continue;
        }

        let user_share = user_loss_qty / actual_total_loss;
        let penalty = config.waste_penalty.of(excess_cost.mul_qty(user_share));

        total += penalty;
        lines.push(WastePenaltyLine {
            material_name: material.name.clone(),
            theoretical,
            allowed_loss,
            actual_total_loss,
            excess_qty,
            user_loss_qty,
            penalty,
        });
    }

    WastePenalty { total, lines }
}

// =============================================================================
// Slip Computation
// =============================================================================

/// A fully derived salary slip, before confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SlipPreview {
    pub base: Money,
    pub bonus: Money,
    pub advances: Money,
    pub waste: WastePenalty,
    /// base + bonus − advances − penalty. May be negative.
    pub final_amount: Money,
}

/// Derives the payout for one user for the given month.
///
/// Errors when the user has no payroll configuration; everything else is
/// arithmetic over the ledgers.
#[allow(clippy::too_many_arguments)]
pub fn compute_slip(
    user: &User,
    transactions: &[PayrollTransaction],
    logs: &[OperationalLog],
    targets: &[OperationalTarget],
    sales: &[Sale],
    products: &[Product],
    materials: &[Material],
    inventory: &[InventoryTransaction],
    month: MonthRef,
) -> CoreResult<SlipPreview> {
    let config = user
        .payroll
        .as_ref()
        .ok_or_else(|| CoreError::NoPayrollConfig(user.id.clone()))?;

    let base = match config.basis {
        SalaryBasis::Fixed { monthly } => monthly,
        SalaryBasis::ProfitShare { percent } => {
            percent.of(contribution_margin(sales, products, materials, month))
        }
    };

    let bonus = bonus_for_month(logs, targets, month);
    let advances = pending_advances(transactions, &user.id);
    let waste = waste_penalty(user, sales, products, materials, inventory, month);
    let final_amount = base + bonus - advances - waste.total;

    Ok(SlipPreview {
        base,
        bonus,
        advances,
        waste,
        final_amount,
    })
}

/// Confirms a salary slip, in place, over the payroll and expense ledgers.
///
/// Atomically (the caller wraps this in its transaction boundary):
/// - the slip becomes PAID, its amount overwritten with the final payout and
///   the breakdown frozen into `details`;
/// - every pending advance of the user becomes PAID;
/// - one PAYROLL expense is appended for the final amount.
///
/// The negative-payout override is the caller's gate; by the time this runs
/// the decision has been made.
pub fn confirm_slip(
    transactions: &mut [PayrollTransaction],
    expenses: &mut Vec<Expense>,
    slip_id: &str,
    user: &User,
    preview: &SlipPreview,
    expense_id: String,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    let slip = transactions
        .iter_mut()
        .find(|t| t.id == slip_id)
        .ok_or_else(|| CoreError::PayrollTransactionNotFound(slip_id.to_string()))?;

    if slip.kind != PayrollKind::SalarySlip {
        return Err(CoreError::InvalidPayrollStatus {
            id: slip_id.to_string(),
            status: "ADVANCE".to_string(),
        });
    }
    if slip.status != PayrollStatus::Pending {
        return Err(CoreError::InvalidPayrollStatus {
            id: slip_id.to_string(),
            status: "PAID".to_string(),
        });
    }

    slip.status = PayrollStatus::Paid;
    slip.amount = preview.final_amount;
    slip.details = Some(PayBreakdown {
        base: preview.base,
        bonus: preview.bonus,
        advances: preview.advances,
        waste_penalty: preview.waste.total,
    });

    for txn in transactions.iter_mut() {
        if txn.user_id == user.id
            && txn.kind == PayrollKind::Advance
            && txn.status == PayrollStatus::Pending
        {
            txn.status = PayrollStatus::Paid;
        }
    }

    expenses.push(Expense {
        id: expense_id,
        description: format!("Salary - {}", user.name),
        amount: preview.final_amount,
        date: now,
        category: PAYROLL_EXPENSE_CATEGORY.to_string(),
    });

    Ok(())
}

// =============================================================================
// Slip Generation
// =============================================================================

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Generates the zero-amount PENDING slips that are due as of `today`.
///
/// A slip is due for a user when their cutoff day has arrived this month
/// (`today.day() >= cutoff_day`, so a run missed on the day itself still
/// fires later in the same month) and no slip exists yet for
/// (user, month, year). Re-running is always safe: at most one slip per user
/// per month, ever.
///
/// Returns the new slips to append; `next_id` supplies their identifiers.
pub fn generate_due_slips(
    users: &[User],
    transactions: &[PayrollTransaction],
    today: DateTime<Utc>,
    mut next_id: impl FnMut() -> String,
) -> Vec<PayrollTransaction> {
    let month = MonthRef::of(today);
    let mut due = Vec::new();

    for user in users {
        let Some(config) = &user.payroll else { continue };
        if today.day() < config.cutoff_day {
            continue;
        }

        let exists = transactions.iter().any(|t| {
            t.user_id == user.id && t.kind == PayrollKind::SalarySlip && month.contains(t.date)
        });
        if exists {
            continue;
        }

        due.push(PayrollTransaction {
            id: next_id(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            kind: PayrollKind::SalarySlip,
            amount: Money::zero(),
            date: today,
            status: PayrollStatus::Pending,
            description: Some(format!(
                "Salary for {}",
                MONTH_NAMES[(month.month - 1) as usize]
            )),
            details: None,
        });
    }

    due
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Percent;
    use crate::types::{BomLine, PaymentMethod, PayrollConfig, Role, SaleItem, SaleStatus, Unit};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn material(id: &str, cost_cents: i64, tolerance_pct: f64) -> Material {
        Material {
            id: id.to_string(),
            name: format!("Material {id}"),
            unit: Unit::M2,
            cost_per_unit: Money::from_cents(cost_cents),
            current_stock: 100.0,
            min_stock: 0.0,
            loss_tolerance: Percent::from_percent(tolerance_pct),
        }
    }

    fn product(id: &str, bom: Vec<(&str, f64)>, price_cents: i64, labor_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            bill_of_materials: bom
                .into_iter()
                .map(|(mid, qty)| BomLine {
                    material_id: mid.to_string(),
                    quantity: qty,
                })
                .collect(),
            selling_price: Money::from_cents(price_cents),
            labor_cost: Money::from_cents(labor_cents),
        }
    }

    fn sale(id: &str, d: DateTime<Utc>, product_id: &str, qty: i64, price_cents: i64) -> Sale {
        Sale {
            id: id.to_string(),
            date: d,
            items: vec![SaleItem {
                product_id: product_id.to_string(),
                quantity: qty,
                unit_price: Money::from_cents(price_cents),
            }],
            marketplace_id: "mp1".to_string(),
            marketplace_name: "Shopfront".to_string(),
            payment_method: PaymentMethod::Pix,
            customer_name: None,
            total_amount: Money::from_cents(price_cents * qty),
            net_revenue: Money::from_cents(price_cents * qty),
            cost_snapshot: None,
            fee_snapshot: None,
            status: SaleStatus::Completed,
        }
    }

    fn loss(id: &str, d: DateTime<Utc>, material_id: &str, qty: f64, user_id: &str) -> InventoryTransaction {
        InventoryTransaction {
            id: id.to_string(),
            date: d,
            material_id: material_id.to_string(),
            material_name: "Material".to_string(),
            kind: InventoryKind::Loss,
            quantity: qty,
            user_id: Some(user_id.to_string()),
            user_name: Some("User".to_string()),
        }
    }

    fn user(id: &str, basis: SalaryBasis, penalty_pct: f64) -> User {
        User {
            id: id.to_string(),
            name: format!("User {id}"),
            pin: "1234".to_string(),
            role: Role::Employee,
            payroll: Some(PayrollConfig {
                basis,
                cutoff_day: 5,
                waste_penalty: Percent::from_percent(penalty_pct),
            }),
        }
    }

    fn advance(id: &str, user_id: &str, cents: i64, status: PayrollStatus) -> PayrollTransaction {
        PayrollTransaction {
            id: id.to_string(),
            user_id: user_id.to_string(),
            user_name: "User".to_string(),
            kind: PayrollKind::Advance,
            amount: Money::from_cents(cents),
            date: date(2024, 3, 10),
            status,
            description: None,
            details: None,
        }
    }

    fn pending_slip(id: &str, user_id: &str, d: DateTime<Utc>) -> PayrollTransaction {
        PayrollTransaction {
            id: id.to_string(),
            user_id: user_id.to_string(),
            user_name: "User".to_string(),
            kind: PayrollKind::SalarySlip,
            amount: Money::zero(),
            date: d,
            status: PayrollStatus::Pending,
            description: None,
            details: None,
        }
    }

    const MARCH: MonthRef = MonthRef { year: 2024, month: 3 };

    #[test]
    fn test_bonus_for_month() {
        let targets = vec![OperationalTarget {
            id: "t1".to_string(),
            metric_name: "Boxes folded".to_string(),
            target_daily: 50.0,
            unit_rate: Money::from_cents(10),
        }];
        let logs = vec![
            OperationalLog {
                id: "l1".to_string(),
                date: date(2024, 3, 2),
                metric_name: "Boxes folded".to_string(),
                value: 120.0,
            },
            OperationalLog {
                id: "l2".to_string(),
                date: date(2024, 3, 9),
                metric_name: "Boxes folded".to_string(),
                value: 80.0,
            },
            // different month, ignored
            OperationalLog {
                id: "l3".to_string(),
                date: date(2024, 2, 9),
                metric_name: "Boxes folded".to_string(),
                value: 500.0,
            },
            // orphaned metric, earns nothing
            OperationalLog {
                id: "l4".to_string(),
                date: date(2024, 3, 9),
                metric_name: "Old metric".to_string(),
                value: 999.0,
            },
        ];

        // (120 + 80) × 0.10 = 20.00
        assert_eq!(bonus_for_month(&logs, &targets, MARCH).cents(), 2000);
    }

    #[test]
    fn test_pending_advances_ignores_month_and_paid() {
        let txns = vec![
            advance("a1", "u1", 5000, PayrollStatus::Pending),
            advance("a2", "u1", 5000, PayrollStatus::Paid),
            advance("a3", "u2", 7000, PayrollStatus::Pending),
        ];
        assert_eq!(pending_advances(&txns, "u1").cents(), 5000);
    }

    #[test]
    fn test_waste_penalty_worked_scenario() {
        // material at 2.00/unit, 5% tolerance; one product consuming 10/unit;
        // 3 units sold → theoretical 30, allowed 1.5; user loses 4.0 (all of it)
        // excess 2.5 × 2.00 = 5.00; share 1.0; 50% penalty → 2.50
        let materials = vec![material("m1", 200, 5.0)];
        let products = vec![product("p1", vec![("m1", 10.0)], 5000, 500)];
        let sales = vec![sale("s1", date(2024, 3, 10), "p1", 3, 5000)];
        let inventory = vec![loss("i1", date(2024, 3, 12), "m1", 4.0, "u1")];
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            50.0,
        );

        let result = waste_penalty(&u, &sales, &products, &materials, &inventory, MARCH);
        assert_eq!(result.total.cents(), 250);
        assert_eq!(result.lines.len(), 1);

        let line = &result.lines[0];
        assert!((line.theoretical - 30.0).abs() < 1e-9);
        assert!((line.allowed_loss - 1.5).abs() < 1e-9);
        assert!((line.excess_qty - 2.5).abs() < 1e-9);
        assert!((line.user_loss_qty - 4.0).abs() < 1e-9);
        assert_eq!(line.penalty.cents(), 250);
    }

    #[test]
    fn test_waste_penalty_zero_percent_disables() {
        let materials = vec![material("m1", 200, 5.0)];
        let products = vec![product("p1", vec![("m1", 10.0)], 5000, 500)];
        let sales = vec![sale("s1", date(2024, 3, 10), "p1", 3, 5000)];
        let inventory = vec![loss("i1", date(2024, 3, 12), "m1", 4.0, "u1")];
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            0.0,
        );

        let result = waste_penalty(&u, &sales, &products, &materials, &inventory, MARCH);
        assert!(result.total.is_zero());
        assert!(result.lines.is_empty());
    }

    #[test]
    fn test_waste_within_tolerance_no_penalty_line() {
        // theoretical 30, allowed 1.5, actual loss 1.0 → within tolerance
        let materials = vec![material("m1", 200, 5.0)];
        let products = vec![product("p1", vec![("m1", 10.0)], 5000, 500)];
        let sales = vec![sale("s1", date(2024, 3, 10), "p1", 3, 5000)];
        let inventory = vec![loss("i1", date(2024, 3, 12), "m1", 1.0, "u1")];
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            50.0,
        );

        let result = waste_penalty(&u, &sales, &products, &materials, &inventory, MARCH);
        assert!(result.total.is_zero());
        assert!(result.lines.is_empty());
    }

    #[test]
    fn test_waste_penalty_splits_by_share() {
        // two users each lose 2.0 of the same material; excess 2.5 total
        let materials = vec![material("m1", 200, 5.0)];
        let products = vec![product("p1", vec![("m1", 10.0)], 5000, 500)];
        let sales = vec![sale("s1", date(2024, 3, 10), "p1", 3, 5000)];
        let inventory = vec![
            loss("i1", date(2024, 3, 12), "m1", 2.0, "u1"),
            loss("i2", date(2024, 3, 13), "m1", 2.0, "u2"),
        ];
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            50.0,
        );

        // excess 2.5 × 2.00 = 5.00; u1's share 2/4 = 0.5 → 2.50 × 50% = 1.25
        let result = waste_penalty(&u, &sales, &products, &materials, &inventory, MARCH);
        assert_eq!(result.total.cents(), 125);
    }

    #[test]
    fn test_compute_slip_fixed_salary_scenario() {
        // base 1500.00 + bonus 20.00 − advance 100.00 − no penalty = 1420.00
        let materials = vec![material("m1", 200, 5.0)];
        let products = vec![product("p1", vec![("m1", 10.0)], 5000, 500)];
        let targets = vec![OperationalTarget {
            id: "t1".to_string(),
            metric_name: "Boxes folded".to_string(),
            target_daily: 50.0,
            unit_rate: Money::from_cents(10),
        }];
        let logs = vec![OperationalLog {
            id: "l1".to_string(),
            date: date(2024, 3, 2),
            metric_name: "Boxes folded".to_string(),
            value: 200.0,
        }];
        let txns = vec![advance("a1", "u1", 10_000, PayrollStatus::Pending)];
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            50.0,
        );

        let preview = compute_slip(&u, &txns, &logs, &targets, &[], &products, &materials, &[], MARCH)
            .unwrap();

        assert_eq!(preview.base.cents(), 150_000);
        assert_eq!(preview.bonus.cents(), 2000);
        assert_eq!(preview.advances.cents(), 10_000);
        assert!(preview.waste.total.is_zero());
        assert_eq!(preview.final_amount.cents(), 142_000);
    }

    #[test]
    fn test_compute_slip_profit_share() {
        // one sale: revenue 150.00, no fees (snapshot 0), cost snapshot 75.00
        // margin 75.00, 10% share → 7.50
        let mut s = sale("s1", date(2024, 3, 10), "p1", 3, 5000);
        s.cost_snapshot = Some(Money::from_cents(7500));
        s.fee_snapshot = Some(Money::zero());
        let u = user(
            "u1",
            SalaryBasis::ProfitShare {
                percent: Percent::from_percent(10.0),
            },
            0.0,
        );

        let preview =
            compute_slip(&u, &[], &[], &[], &[s], &[], &[], &[], MARCH).unwrap();
        assert_eq!(preview.base.cents(), 750);
    }

    #[test]
    fn test_compute_slip_requires_config() {
        let u = User {
            id: "u1".to_string(),
            name: "No Config".to_string(),
            pin: "1234".to_string(),
            role: Role::Employee,
            payroll: None,
        };
        let result = compute_slip(&u, &[], &[], &[], &[], &[], &[], &[], MARCH);
        assert!(matches!(result, Err(CoreError::NoPayrollConfig(_))));
    }

    #[test]
    fn test_confirm_slip_clears_advances_and_creates_expense() {
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            0.0,
        );
        let mut txns = vec![
            pending_slip("slip1", "u1", date(2024, 3, 5)),
            advance("a1", "u1", 10_000, PayrollStatus::Pending),
            advance("a2", "u1", 5000, PayrollStatus::Pending),
            advance("a3", "u2", 7000, PayrollStatus::Pending),
        ];
        let mut expenses = Vec::new();
        let preview = SlipPreview {
            base: Money::from_cents(150_000),
            bonus: Money::zero(),
            advances: Money::from_cents(15_000),
            waste: WastePenalty::none(),
            final_amount: Money::from_cents(135_000),
        };

        confirm_slip(
            &mut txns,
            &mut expenses,
            "slip1",
            &u,
            &preview,
            "e1".to_string(),
            date(2024, 3, 5),
        )
        .unwrap();

        let slip = txns.iter().find(|t| t.id == "slip1").unwrap();
        assert_eq!(slip.status, PayrollStatus::Paid);
        assert_eq!(slip.amount.cents(), 135_000);
        let details = slip.details.unwrap();
        assert_eq!(details.base.cents(), 150_000);
        assert_eq!(details.advances.cents(), 15_000);

        // every pending advance of u1 is now PAID; u2's is untouched
        assert!(txns
            .iter()
            .filter(|t| t.user_id == "u1" && t.kind == PayrollKind::Advance)
            .all(|t| t.status == PayrollStatus::Paid));
        assert_eq!(
            txns.iter().find(|t| t.id == "a3").unwrap().status,
            PayrollStatus::Pending
        );

        // exactly one PAYROLL expense for the final amount
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, PAYROLL_EXPENSE_CATEGORY);
        assert_eq!(expenses[0].amount.cents(), 135_000);
    }

    #[test]
    fn test_confirm_slip_rejects_paid_slip() {
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            0.0,
        );
        let mut slip = pending_slip("slip1", "u1", date(2024, 3, 5));
        slip.status = PayrollStatus::Paid;
        let mut txns = vec![slip];
        let mut expenses = Vec::new();
        let preview = SlipPreview {
            base: Money::zero(),
            bonus: Money::zero(),
            advances: Money::zero(),
            waste: WastePenalty::none(),
            final_amount: Money::zero(),
        };

        let result = confirm_slip(
            &mut txns,
            &mut expenses,
            "slip1",
            &u,
            &preview,
            "e1".to_string(),
            date(2024, 3, 5),
        );
        assert!(matches!(result, Err(CoreError::InvalidPayrollStatus { .. })));
        assert!(expenses.is_empty());
    }

    #[test]
    fn test_generate_due_slips_is_idempotent() {
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            0.0,
        );
        let today = date(2024, 3, 7); // cutoff day 5 already passed
        let mut counter = 0;
        let mut next_id = || {
            counter += 1;
            format!("gen-{counter}")
        };

        let first = generate_due_slips(&[u.clone()], &[], today, &mut next_id);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, PayrollKind::SalarySlip);
        assert_eq!(first[0].status, PayrollStatus::Pending);
        assert!(first[0].amount.is_zero());

        // with the slip recorded, a re-run generates nothing
        let second = generate_due_slips(&[u], &first, today, &mut next_id);
        assert!(second.is_empty());
    }

    #[test]
    fn test_generate_due_slips_respects_cutoff() {
        let u = user(
            "u1",
            SalaryBasis::Fixed {
                monthly: Money::from_cents(150_000),
            },
            0.0,
        );
        // day 3 < cutoff 5 → nothing due yet
        let none = generate_due_slips(&[u.clone()], &[], date(2024, 3, 3), || "x".to_string());
        assert!(none.is_empty());

        // a new month is a new slip, even with last month's slip on file
        let last_month = pending_slip("old", "u1", date(2024, 2, 5));
        let due = generate_due_slips(&[u], &[last_month], date(2024, 3, 5), || "y".to_string());
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn test_generate_due_slips_skips_users_without_config() {
        let plain = User {
            id: "u9".to_string(),
            name: "No Payroll".to_string(),
            pin: "1234".to_string(),
            role: Role::Admin,
            payroll: None,
        };
        let due = generate_due_slips(&[plain], &[], date(2024, 3, 31), || "z".to_string());
        assert!(due.is_empty());
    }
}
