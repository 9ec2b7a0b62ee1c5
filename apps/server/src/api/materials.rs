//! Material catalog routes.
//!
//! Deleting a material never touches history: ledger entries keep their
//! frozen names, and BOM lines pointing at it simply contribute zero cost
//! from then on.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use atelier_core::money::{Money, Percent};
use atelier_core::types::{Material, Unit};
use atelier_core::validation;
use atelier_core::CoreError;

use crate::api::new_id;
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    pub name: String,
    pub unit: Unit,
    pub cost_per_unit: Money,
    pub current_stock: f64,
    pub min_stock: f64,
    pub loss_tolerance: Percent,
}

fn validate(req: &MaterialRequest) -> Result<(), ApiError> {
    validation::validate_name(&req.name)?;
    validation::validate_amount("costPerUnit", req.cost_per_unit)?;
    validation::validate_percent("lossTolerance", req.loss_tolerance)?;
    Ok(())
}

/// GET /api/materials
pub async fn list(State(state): State<SharedState>) -> Json<Vec<Material>> {
    Json(state.read(|data| data.materials.clone()))
}

/// POST /api/materials
pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<MaterialRequest>,
) -> Result<Json<Material>, ApiError> {
    debug!(name = %req.name, "create material");
    validate(&req)?;

    let material = Material {
        id: new_id(),
        name: req.name.trim().to_string(),
        unit: req.unit,
        cost_per_unit: req.cost_per_unit,
        current_stock: req.current_stock,
        min_stock: req.min_stock,
        loss_tolerance: req.loss_tolerance,
    };

    let created = material.clone();
    state.mutate(move |data| {
        data.materials.push(material);
        Ok(())
    })?;

    info!(id = %created.id, name = %created.name, "material created");
    Ok(Json(created))
}

/// PUT /api/materials/{id}
pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<MaterialRequest>,
) -> Result<Json<Material>, ApiError> {
    debug!(%id, "update material");
    validate(&req)?;

    let updated = state.mutate(move |data| {
        let material = data
            .materials
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(CoreError::MaterialNotFound(id))?;

        material.name = req.name.trim().to_string();
        material.unit = req.unit;
        material.cost_per_unit = req.cost_per_unit;
        material.current_stock = req.current_stock;
        material.min_stock = req.min_stock;
        material.loss_tolerance = req.loss_tolerance;
        Ok(material.clone())
    })?;

    Ok(Json(updated))
}

/// DELETE /api/materials/{id}
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(), ApiError> {
    debug!(%id, "delete material");

    state.mutate(move |data| {
        let before = data.materials.len();
        data.materials.retain(|m| m.id != id);
        if data.materials.len() == before {
            return Err(CoreError::MaterialNotFound(id).into());
        }
        Ok(())
    })?;

    Ok(())
}
