//! Operational metrics routes: logging daily production work against the
//! configured targets. The logs feed the payroll bonus.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use atelier_core::types::{OperationalLog, OperationalTarget};
use atelier_core::validation;

use crate::api::new_id;
use crate::error::ApiError;
use crate::state::SharedState;

/// GET /api/operations/targets
pub async fn list_targets(State(state): State<SharedState>) -> Json<Vec<OperationalTarget>> {
    Json(state.read(|data| data.targets.clone()))
}

/// GET /api/operations/logs
pub async fn list_logs(State(state): State<SharedState>) -> Json<Vec<OperationalLog>> {
    Json(state.read(|data| data.logs.clone()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    /// Matched against targets by name; a log under a renamed or deleted
    /// target is kept but earns no bonus.
    pub metric_name: String,
    pub value: f64,
}

/// POST /api/operations/logs
pub async fn record_log(
    State(state): State<SharedState>,
    Json(req): Json<LogRequest>,
) -> Result<Json<OperationalLog>, ApiError> {
    debug!(metric = %req.metric_name, value = req.value, "record operational log");
    validation::validate_name(&req.metric_name)?;
    validation::validate_quantity(req.value)?;

    let log = OperationalLog {
        id: new_id(),
        date: chrono::Utc::now(),
        metric_name: req.metric_name.trim().to_string(),
        value: req.value,
    };

    let recorded = log.clone();
    state.mutate(move |data| {
        data.logs.push(log);
        Ok(())
    })?;

    info!(id = %recorded.id, metric = %recorded.metric_name, "operational log recorded");
    Ok(Json(recorded))
}
