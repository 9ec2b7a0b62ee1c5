//! Payroll engine routes: config, advances, slip preview/confirmation, and
//! the idempotent slip-generation job.
//!
//! ## The Negative-Payout Gate
//! A slip whose final amount is negative (deductions exceeding pay) is not
//! confirmed on the first request: the handler answers 409 with the preview,
//! and the frontend re-submits with `allowNegative: true`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use atelier_core::money::Money;
use atelier_core::payroll::{
    compute_slip, confirm_slip, generate_due_slips, MonthRef, SlipPreview,
};
use atelier_core::types::{
    PayrollConfig, PayrollKind, PayrollStatus, PayrollTransaction,
};
use atelier_core::validation;
use atelier_core::CoreError;

use crate::api::new_id;
use crate::error::ApiError;
use crate::state::{AppState, SharedState};

/// GET /api/payroll/transactions
pub async fn list_transactions(State(state): State<SharedState>) -> Json<Vec<PayrollTransaction>> {
    Json(state.read(|data| data.payroll_transactions.clone()))
}

// =============================================================================
// Config & Advances
// =============================================================================

/// PUT /api/payroll/users/{id}/config
pub async fn update_config(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(config): Json<PayrollConfig>,
) -> Result<Json<PayrollConfig>, ApiError> {
    debug!(user_id = %id, "update payroll config");
    validation::validate_cutoff_day(config.cutoff_day)?;
    validation::validate_percent("wastePenalty", config.waste_penalty)?;

    let saved = state.mutate(move |data| {
        let user = data
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(CoreError::UserNotFound(id))?;
        user.payroll = Some(config.clone());
        Ok(config)
    })?;

    Ok(Json(saved))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    pub user_id: String,
    pub amount: Money,
}

/// POST /api/payroll/advances
pub async fn add_advance(
    State(state): State<SharedState>,
    Json(req): Json<AdvanceRequest>,
) -> Result<Json<PayrollTransaction>, ApiError> {
    debug!(user_id = %req.user_id, amount = %req.amount, "add advance");
    if req.amount.cents() <= 0 {
        return Err(ApiError::validation("amount must be positive"));
    }

    let advance = state.mutate(move |data| {
        let user = data
            .users
            .iter()
            .find(|u| u.id == req.user_id)
            .ok_or_else(|| CoreError::UserNotFound(req.user_id.clone()))?;

        let txn = PayrollTransaction {
            id: new_id(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            kind: PayrollKind::Advance,
            amount: req.amount,
            date: chrono::Utc::now(),
            status: PayrollStatus::Pending,
            description: Some("Advance".to_string()),
            details: None,
        };
        data.payroll_transactions.push(txn.clone());
        Ok(txn)
    })?;

    info!(id = %advance.id, user = %advance.user_name, "advance recorded");
    Ok(Json(advance))
}

// =============================================================================
// Slip Preview & Confirmation
// =============================================================================

fn preview_for_slip(
    data: &atelier_store::DataSet,
    slip_id: &str,
) -> Result<(PayrollTransaction, SlipPreview), ApiError> {
    let slip = data
        .payroll_transactions
        .iter()
        .find(|t| t.id == slip_id && t.kind == PayrollKind::SalarySlip)
        .ok_or_else(|| CoreError::PayrollTransactionNotFound(slip_id.to_string()))?
        .clone();

    let user = data
        .users
        .iter()
        .find(|u| u.id == slip.user_id)
        .ok_or_else(|| CoreError::UserNotFound(slip.user_id.clone()))?;

    // the slip's own date pins the month being paid out
    let preview = compute_slip(
        user,
        &data.payroll_transactions,
        &data.logs,
        &data.targets,
        &data.sales,
        &data.products,
        &data.materials,
        &data.inventory_history,
        MonthRef::of(slip.date),
    )?;

    Ok((slip, preview))
}

/// GET /api/payroll/slips/{id}/preview
pub async fn preview_slip(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SlipPreview>, ApiError> {
    debug!(slip_id = %id, "preview slip");
    let preview = state.read(|data| preview_for_slip(data, &id).map(|(_, p)| p))?;
    Ok(Json(preview))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    /// Set after the frontend has shown the negative-payout warning.
    #[serde(default)]
    pub allow_negative: bool,
}

/// The 409 payload asking the operator to confirm a negative payout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativeWarning {
    pub requires_confirmation: bool,
    pub preview: SlipPreview,
}

/// POST /api/payroll/slips/{id}/confirm
///
/// One atomic commit: slip → PAID with frozen breakdown, every pending
/// advance of the user → PAID, one PAYROLL expense appended.
pub async fn confirm(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Response, ApiError> {
    debug!(slip_id = %id, allow_negative = req.allow_negative, "confirm slip");

    let outcome = state.mutate(move |data| {
        let (slip, preview) = preview_for_slip(data, &id)?;

        if preview.final_amount.is_negative() && !req.allow_negative {
            return Ok(Err(preview));
        }

        let user = data
            .users
            .iter()
            .find(|u| u.id == slip.user_id)
            .ok_or_else(|| CoreError::UserNotFound(slip.user_id.clone()))?
            .clone();

        confirm_slip(
            &mut data.payroll_transactions,
            &mut data.expenses,
            &slip.id,
            &user,
            &preview,
            new_id(),
            chrono::Utc::now(),
        )?;

        info!(slip_id = %slip.id, user = %user.name, amount = %preview.final_amount, "slip confirmed");
        Ok(Ok(preview))
    })?;

    match outcome {
        Ok(preview) => Ok(Json(preview).into_response()),
        Err(preview) => Ok((
            StatusCode::CONFLICT,
            Json(NegativeWarning {
                requires_confirmation: true,
                preview,
            }),
        )
            .into_response()),
    }
}

// =============================================================================
// Slip Generation
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub created: usize,
}

/// Runs the idempotent slip-generation job: one PENDING zero-amount slip per
/// (user, month) whose cutoff day has arrived. Called at startup, by the
/// daily timer, and from the admin endpoint.
pub fn run_generation(state: &AppState) -> Result<usize, ApiError> {
    state.mutate(|data| {
        let due = generate_due_slips(
            &data.users,
            &data.payroll_transactions,
            chrono::Utc::now(),
            new_id,
        );
        let created = due.len();
        if created > 0 {
            info!(created, "salary slips generated");
        }
        data.payroll_transactions.extend(due);
        Ok(created)
    })
}

/// POST /api/payroll/generate
pub async fn generate(State(state): State<SharedState>) -> Result<Json<GenerateResponse>, ApiError> {
    let created = run_generation(&state)?;
    Ok(Json(GenerateResponse { created }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::state::AppState;
    use atelier_core::money::Percent;
    use atelier_core::types::SalaryBasis;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state(dir: &TempDir) -> SharedState {
        let store = atelier_store::Store::open(dir.path()).unwrap();
        let config = ServerConfig {
            http_port: 0,
            data_dir: dir.path().display().to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
        };
        Arc::new(AppState::new(store, config))
    }

    fn payroll_txn(id: &str, kind: PayrollKind, cents: i64) -> PayrollTransaction {
        PayrollTransaction {
            id: id.to_string(),
            user_id: "2".to_string(), // the seeded employee
            user_name: "Employee".to_string(),
            kind,
            amount: Money::from_cents(cents),
            date: chrono::Utc::now(),
            status: PayrollStatus::Pending,
            description: None,
            details: None,
        }
    }

    /// Base 100.00, pending advance 250.00: the slip settles at −150.00 and
    /// must not confirm until the override flag is set.
    #[tokio::test]
    async fn test_confirm_negative_payout_requires_override() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        state
            .mutate(|data| {
                data.users[1].payroll = Some(PayrollConfig {
                    basis: SalaryBasis::Fixed {
                        monthly: Money::from_cents(10_000),
                    },
                    cutoff_day: 1,
                    waste_penalty: Percent::zero(),
                });
                data.payroll_transactions
                    .push(payroll_txn("adv1", PayrollKind::Advance, 25_000));
                data.payroll_transactions
                    .push(payroll_txn("slip1", PayrollKind::SalarySlip, 0));
                Ok(())
            })
            .unwrap();

        // first attempt: 409, nothing settles
        let response = confirm(
            State(state.clone()),
            Path("slip1".to_string()),
            Json(ConfirmRequest {
                allow_negative: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(state.read(|d| {
            d.payroll_transactions
                .iter()
                .all(|t| t.status == PayrollStatus::Pending)
        }));
        assert!(state.read(|d| d.expenses.is_empty()));

        // overridden: slip PAID at the negative amount, advance cleared,
        // one payroll expense created
        let response = confirm(
            State(state.clone()),
            Path("slip1".to_string()),
            Json(ConfirmRequest {
                allow_negative: true,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let slip = state.read(|d| {
            d.payroll_transactions
                .iter()
                .find(|t| t.id == "slip1")
                .cloned()
                .unwrap()
        });
        assert_eq!(slip.status, PayrollStatus::Paid);
        assert_eq!(slip.amount.cents(), -15_000);
        assert_eq!(
            state.read(|d| d.payroll_transactions
                .iter()
                .find(|t| t.id == "adv1")
                .unwrap()
                .status),
            PayrollStatus::Paid
        );
        assert_eq!(state.read(|d| d.expenses.len()), 1);
    }

    /// A positive payout never sees the gate, flag or no flag.
    #[tokio::test]
    async fn test_confirm_positive_payout_needs_no_override() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        state
            .mutate(|data| {
                data.users[1].payroll = Some(PayrollConfig {
                    basis: SalaryBasis::Fixed {
                        monthly: Money::from_cents(150_000),
                    },
                    cutoff_day: 1,
                    waste_penalty: Percent::zero(),
                });
                data.payroll_transactions
                    .push(payroll_txn("slip1", PayrollKind::SalarySlip, 0));
                Ok(())
            })
            .unwrap();

        let response = confirm(
            State(state.clone()),
            Path("slip1".to_string()),
            Json(ConfirmRequest {
                allow_negative: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            state.read(|d| d.payroll_transactions[0].amount.cents()),
            150_000
        );
    }
}
