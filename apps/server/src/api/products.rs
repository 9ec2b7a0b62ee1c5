//! Product catalog routes, including the AI listing-copy suggestion.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use atelier_core::money::Money;
use atelier_core::types::{BomLine, Product};
use atelier_core::validation;
use atelier_core::CoreError;

use crate::api::new_id;
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub bill_of_materials: Vec<BomLine>,
    pub selling_price: Money,
    pub labor_cost: Money,
}

/// GET /api/products
pub async fn list(State(state): State<SharedState>) -> Json<Vec<Product>> {
    Json(state.read(|data| data.products.clone()))
}

/// POST /api/products
pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    debug!(name = %req.name, "create product");
    validation::validate_name(&req.name)?;
    validation::validate_amount("sellingPrice", req.selling_price)?;
    validation::validate_amount("laborCost", req.labor_cost)?;
    for line in &req.bill_of_materials {
        validation::validate_quantity(line.quantity)?;
    }

    let product = Product {
        id: new_id(),
        name: req.name.trim().to_string(),
        bill_of_materials: req.bill_of_materials,
        selling_price: req.selling_price,
        labor_cost: req.labor_cost,
    };

    let created = product.clone();
    state.mutate(move |data| {
        data.products.push(product);
        Ok(())
    })?;

    info!(id = %created.id, name = %created.name, "product created");
    Ok(Json(created))
}

/// DELETE /api/products/{id}
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(), ApiError> {
    debug!(%id, "delete product");

    state.mutate(move |data| {
        let before = data.products.len();
        data.products.retain(|p| p.id != id);
        if data.products.len() == before {
            return Err(CoreError::ProductNotFound(id).into());
        }
        Ok(())
    })?;

    Ok(())
}

// =============================================================================
// AI Description
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeRequest {
    pub name: String,
    pub material_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeResponse {
    pub description: String,
}

/// POST /api/products/describe
///
/// Best effort: an empty description means the AI was unavailable, and the
/// frontend leaves the field blank.
pub async fn describe(
    State(state): State<SharedState>,
    Json(req): Json<DescribeRequest>,
) -> Json<DescribeResponse> {
    let material_names = state.read(|data| {
        req.material_ids
            .iter()
            .filter_map(|id| data.materials.iter().find(|m| &m.id == id))
            .map(|m| m.name.clone())
            .collect::<Vec<_>>()
    });

    let description = state
        .insight
        .product_description(&req.name, &material_names)
        .await;

    Json(DescribeResponse { description })
}
