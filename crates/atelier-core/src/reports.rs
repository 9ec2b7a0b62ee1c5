//! # Reporting Aggregator
//!
//! Monthly financial aggregation over the ledgers.
//!
//! ## The Waterfall
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gross revenue        Σ sale totals for the month                       │
//! │  − total fees         Σ per-sale fees (frozen snapshot where present)   │
//! │  − total COGS         Σ per-sale production cost (snapshot / live)      │
//! │  = contribution margin                                                  │
//! │  − total expenses     Σ the month's expenses (incl. PAYROLL entries)    │
//! │  = net profit                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every per-sale figure goes through `sales::fees` / `sales::cogs`, so the
//! snapshot-vs-live fallback policy is identical here and in payroll.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::payroll::MonthRef;
use crate::sales::{cogs, fees};
use crate::types::{Expense, Material, Product, Sale};

// =============================================================================
// Monthly Summary
// =============================================================================

/// The month's financial waterfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub gross_revenue: Money,
    pub total_fees: Money,
    pub total_cogs: Money,
    pub contribution_margin: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
}

/// Aggregates one month of sales and expenses into the waterfall.
pub fn monthly_summary(
    sales: &[Sale],
    expenses: &[Expense],
    products: &[Product],
    materials: &[Material],
    month: MonthRef,
) -> MonthlySummary {
    let month_sales: Vec<&Sale> = sales.iter().filter(|s| month.contains(s.date)).collect();

    let gross_revenue: Money = month_sales.iter().map(|s| s.total_amount).sum();
    let total_fees: Money = month_sales.iter().map(|s| fees(s).amount()).sum();
    let total_cogs: Money = month_sales
        .iter()
        .map(|s| cogs(s, products, materials).amount())
        .sum();
    let contribution_margin = gross_revenue - total_fees - total_cogs;

    let total_expenses: Money = expenses
        .iter()
        .filter(|e| month.contains(e.date))
        .map(|e| e.amount)
        .sum();

    MonthlySummary {
        gross_revenue,
        total_fees,
        total_cogs,
        contribution_margin,
        total_expenses,
        net_profit: contribution_margin - total_expenses,
    }
}

// =============================================================================
// Chart Series
// =============================================================================

/// One day's contribution (revenue − fees − COGS) for the daily chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// Day of the month, 1-based.
    pub day: u32,
    pub profit: Money,
}

/// Per-day contribution series for the month, one point per calendar day.
/// Expenses are monthly figures and do not appear at daily granularity.
pub fn daily_series(
    sales: &[Sale],
    products: &[Product],
    materials: &[Material],
    month: MonthRef,
) -> Vec<DailyPoint> {
    let month_sales: Vec<&Sale> = sales.iter().filter(|s| month.contains(s.date)).collect();

    (1..=days_in_month(month))
        .map(|day| {
            let profit = month_sales
                .iter()
                .filter(|s| s.date.day() == day)
                .map(|s| {
                    s.total_amount - fees(s).amount() - cogs(s, products, materials).amount()
                })
                .sum();
            DailyPoint { day, profit }
        })
        .collect()
}

/// One month's net profit for the year-comparison chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthPoint {
    /// Month of the year, 1 through 12.
    pub month: u32,
    pub net_profit: Money,
}

/// Net profit for every month of the given year.
pub fn yearly_comparison(
    sales: &[Sale],
    expenses: &[Expense],
    products: &[Product],
    materials: &[Material],
    year: i32,
) -> Vec<MonthPoint> {
    (1..=12)
        .map(|m| {
            let summary = monthly_summary(
                sales,
                expenses,
                products,
                materials,
                MonthRef { year, month: m },
            );
            MonthPoint {
                month: m,
                net_profit: summary.net_profit,
            }
        })
        .collect()
}

/// Product names fed into the AI insight context (the first few catalog
/// entries, like the dashboard shows).
pub fn top_product_names(products: &[Product], limit: usize) -> Vec<String> {
    products.iter().take(limit).map(|p| p.name.clone()).collect()
}

fn days_in_month(month: MonthRef) -> u32 {
    match month.month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            let leap = (month.year % 4 == 0 && month.year % 100 != 0) || month.year % 400 == 0;
            if leap {
                29
            } else {
                28
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
