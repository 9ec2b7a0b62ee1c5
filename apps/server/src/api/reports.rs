//! Reporting routes: the monthly waterfall with its chart series, the expense
//! ledger, and the AI business insight.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use atelier_core::money::Money;
use atelier_core::payroll::MonthRef;
use atelier_core::reports::{
    daily_series, monthly_summary, top_product_names, yearly_comparison, DailyPoint,
    MonthPoint, MonthlySummary,
};
use atelier_core::types::Expense;
use atelier_core::validation;

use crate::api::new_id;
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// 1 through 12; defaults to the current month.
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary: MonthlySummary,
    pub daily: Vec<DailyPoint>,
    pub yearly: Vec<MonthPoint>,
}

fn resolve_month(query: &SummaryQuery) -> Result<MonthRef, ApiError> {
    let now = chrono::Utc::now();
    let month = query.month.unwrap_or_else(|| now.month());
    let year = query.year.unwrap_or_else(|| now.year());
    if !(1..=12).contains(&month) {
        return Err(ApiError::validation("month must be between 1 and 12"));
    }
    Ok(MonthRef { year, month })
}

/// GET /api/reports/summary?month=3&year=2026
pub async fn summary(
    State(state): State<SharedState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let month = resolve_month(&query)?;
    debug!(year = month.year, month = month.month, "report summary");

    let response = state.read(|data| SummaryResponse {
        summary: monthly_summary(
            &data.sales,
            &data.expenses,
            &data.products,
            &data.materials,
            month,
        ),
        daily: daily_series(&data.sales, &data.products, &data.materials, month),
        yearly: yearly_comparison(
            &data.sales,
            &data.expenses,
            &data.products,
            &data.materials,
            month.year,
        ),
    });

    Ok(Json(response))
}

// =============================================================================
// AI Insight
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResponse {
    pub insight: String,
}

/// POST /api/reports/insight
///
/// Always 200: when the AI is unreachable the body carries the canned
/// fallback line instead of an error.
pub async fn insight(
    State(state): State<SharedState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<InsightResponse>, ApiError> {
    let month = resolve_month(&query)?;

    let context = state.read(|data| {
        let summary = monthly_summary(
            &data.sales,
            &data.expenses,
            &data.products,
            &data.materials,
            month,
        );
        json!({
            "month": month.month,
            "year": month.year,
            "grossRevenue": summary.gross_revenue,
            "totalFees": summary.total_fees,
            "totalCogs": summary.total_cogs,
            "contributionMargin": summary.contribution_margin,
            "totalExpenses": summary.total_expenses,
            "netProfit": summary.net_profit,
            "products": top_product_names(&data.products, 5),
        })
        .to_string()
    });

    let insight = state.insight.business_insight(&context).await;
    Ok(Json(InsightResponse { insight }))
}

// =============================================================================
// Expense Ledger
// =============================================================================

/// GET /api/expenses
pub async fn list_expenses(State(state): State<SharedState>) -> Json<Vec<Expense>> {
    Json(state.read(|data| data.expenses.clone()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub description: String,
    pub amount: Money,
    pub category: Option<String>,
}

/// POST /api/expenses
pub async fn add_expense(
    State(state): State<SharedState>,
    Json(req): Json<ExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    debug!(description = %req.description, amount = %req.amount, "add expense");
    validation::validate_name(&req.description)?;
    validation::validate_amount("amount", req.amount)?;

    let expense = Expense {
        id: new_id(),
        description: req.description.trim().to_string(),
        amount: req.amount,
        date: chrono::Utc::now(),
        category: req.category.unwrap_or_else(|| "GENERAL".to_string()),
    };

    let recorded = expense.clone();
    state.mutate(move |data| {
        data.expenses.push(expense);
        Ok(())
    })?;

    info!(id = %recorded.id, "expense recorded");
    Ok(Json(recorded))
}
