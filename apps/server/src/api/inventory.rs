//! Inventory transaction log routes.
//!
//! Every manual stock movement is an immutable log entry attributed to the
//! acting user — LOSS entries feed the payroll waste penalty. Deleting an
//! entry reverses its stock effect and removes it from the log.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use atelier_core::stock::{apply_delta, reverse, signed_delta};
use atelier_core::types::{InventoryKind, InventoryTransaction};
use atelier_core::validation;
use atelier_core::CoreError;

use crate::api::new_id;
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Show only LOSS entries (the waste view).
    #[serde(default)]
    pub losses_only: bool,
}

/// GET /api/inventory?lossesOnly=true
pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<InventoryTransaction>> {
    Json(state.read(|data| {
        data.inventory_history
            .iter()
            .filter(|t| !query.losses_only || t.kind == InventoryKind::Loss)
            .cloned()
            .collect()
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub material_id: String,
    #[serde(rename = "type")]
    pub kind: InventoryKind,
    pub quantity: f64,
    pub user_id: Option<String>,
}

/// POST /api/inventory
pub async fn record(
    State(state): State<SharedState>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<InventoryTransaction>, ApiError> {
    debug!(material_id = %req.material_id, kind = ?req.kind, qty = req.quantity, "record stock movement");
    validation::validate_quantity(req.quantity)?;

    let recorded = state.mutate(move |data| {
        let material = data
            .materials
            .iter()
            .find(|m| m.id == req.material_id)
            .ok_or_else(|| CoreError::MaterialNotFound(req.material_id.clone()))?;

        let user = req
            .user_id
            .as_ref()
            .and_then(|id| data.users.iter().find(|u| &u.id == id));

        let txn = InventoryTransaction {
            id: new_id(),
            date: chrono::Utc::now(),
            material_id: material.id.clone(),
            material_name: material.name.clone(),
            kind: req.kind,
            quantity: req.quantity,
            user_id: user.map(|u| u.id.clone()),
            user_name: user.map(|u| u.name.clone()),
        };

        apply_delta(&mut data.materials, &txn.material_id, signed_delta(&txn));
        data.inventory_history.push(txn.clone());
        Ok(txn)
    })?;

    info!(id = %recorded.id, material = %recorded.material_name, "stock movement recorded");
    Ok(Json(recorded))
}

/// DELETE /api/inventory/{id}
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(), ApiError> {
    debug!(%id, "delete stock movement");

    state.mutate(move |data| {
        let position = data
            .inventory_history
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::InventoryTransactionNotFound(id))?;

        let txn = data.inventory_history.remove(position);
        reverse(&mut data.materials, &txn);

        info!(id = %txn.id, "stock movement deleted, effect reversed");
        Ok(())
    })
}
