//! Sales ledger routes.
//!
//! ## The Shortage Gate
//! Creating a sale that would push any material below its minimum does NOT
//! fail: the request comes back as 409 with the projected shortages, and the
//! frontend re-submits with `confirmed: true`. Stock is allowed to go
//! negative once the operator has said so.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use atelier_core::stock::{order_shortages, Shortage};
use atelier_core::types::{PaymentMethod, Sale, SaleItem, SaleStatus};
use atelier_core::validation;
use atelier_core::{sales, CoreError};

use crate::api::new_id;
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub items: Vec<SaleItemRequest>,
    pub marketplace_id: String,
    pub payment_method: PaymentMethod,
    pub customer_name: Option<String>,
    /// Set after the frontend has shown the shortage warning.
    #[serde(default)]
    pub confirmed: bool,
}

/// The 409 payload asking the operator to confirm projected shortages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortageWarning {
    pub requires_confirmation: bool,
    pub shortages: Vec<Shortage>,
}

/// GET /api/sales
pub async fn list(State(state): State<SharedState>) -> Json<Vec<Sale>> {
    Json(state.read(|data| data.sales.clone()))
}

/// POST /api/sales
pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<Response, ApiError> {
    debug!(marketplace_id = %req.marketplace_id, items = req.items.len(), "create sale");

    if req.items.is_empty() {
        return Err(ApiError::validation("sale must have at least one item"));
    }
    for item in &req.items {
        validation::validate_sale_quantity(item.quantity)?;
    }

    let sale = state.mutate(move |data| {
        let marketplace = data
            .marketplaces
            .iter()
            .find(|m| m.id == req.marketplace_id)
            .ok_or_else(|| CoreError::MarketplaceNotFound(req.marketplace_id.clone()))?
            .clone();

        // freeze each line's unit price off the current catalog
        let mut items = Vec::with_capacity(req.items.len());
        for line in &req.items {
            let product = data
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;
            items.push(SaleItem {
                product_id: product.id.clone(),
                quantity: line.quantity,
                unit_price: product.selling_price,
            });
        }

        // shortage gate: lines sharing a material are projected together
        if !req.confirmed {
            let warnings = order_shortages(&data.materials, &data.products, &items);
            if !warnings.is_empty() {
                return Ok(Err(warnings));
            }
        }

        let sale = sales::build(
            new_id(),
            chrono::Utc::now(),
            items,
            &marketplace,
            req.payment_method,
            req.customer_name,
            &data.products,
            &data.materials,
        );

        let products = data.products.clone();
        sales::consume_stock(&mut data.materials, &products, &sale.items);
        data.sales.push(sale.clone());
        Ok(Ok(sale))
    })?;

    match sale {
        Ok(sale) => {
            info!(id = %sale.id, total = %sale.total_amount, "sale recorded");
            Ok((StatusCode::CREATED, Json(sale)).into_response())
        }
        Err(warnings) => Ok((
            StatusCode::CONFLICT,
            Json(ShortageWarning {
                requires_confirmation: true,
                shortages: warnings,
            }),
        )
            .into_response()),
    }
}

/// DELETE /api/sales/{id}
///
/// Removes the sale and returns its material consumption to stock, using the
/// bill of materials in effect now.
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(), ApiError> {
    debug!(%id, "delete sale");

    state.mutate(move |data| {
        let position = data
            .sales
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoreError::SaleNotFound(id))?;

        let sale = data.sales.remove(position);
        let products = data.products.clone();
        sales::restock(&mut data.materials, &products, &sale);

        info!(id = %sale.id, "sale deleted, stock restored");
        Ok(())
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub status: SaleStatus,
}

/// PUT /api/sales/{id}/status
pub async fn update_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Sale>, ApiError> {
    debug!(%id, status = ?req.status, "update sale status");

    let updated = state.mutate(move |data| {
        let sale = data
            .sales
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CoreError::SaleNotFound(id))?;
        sales::set_status(sale, req.status);
        Ok(sale.clone())
    })?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::state::AppState;
    use atelier_core::money::Money;
    use atelier_core::types::{BomLine, Product};
    use atelier_store::Store;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state(dir: &TempDir) -> SharedState {
        let store = Store::open(dir.path()).unwrap();
        let config = ServerConfig {
            http_port: 0,
            data_dir: dir.path().display().to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
        };
        Arc::new(AppState::new(store, config))
    }

    fn add_product(state: &SharedState, id: &str, paper_per_unit: f64) {
        let product = Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            // seed material "1" starts at 100.0 with minimum 20.0
            bill_of_materials: vec![BomLine {
                material_id: "1".to_string(),
                quantity: paper_per_unit,
            }],
            selling_price: Money::from_cents(5000),
            labor_cost: Money::zero(),
        };
        state
            .mutate(|data| {
                data.products.push(product);
                Ok(())
            })
            .unwrap();
    }

    fn request(items: Vec<SaleItemRequest>, confirmed: bool) -> CreateSaleRequest {
        CreateSaleRequest {
            items,
            marketplace_id: "3".to_string(), // the zero-fee walk-in channel
            payment_method: PaymentMethod::Cash,
            customer_name: None,
            confirmed,
        }
    }

    fn line(product_id: &str, quantity: i64) -> SaleItemRequest {
        SaleItemRequest {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_shortage_gate_warns_then_commits_on_confirmation() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        add_product(&state, "p1", 50.0); // 2 units drain the paper to 0.0

        // first attempt: 409, nothing recorded, stock untouched
        let response = create(State(state.clone()), Json(request(vec![line("p1", 2)], false)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(state.read(|d| d.sales.is_empty()));
        assert!((state.read(|d| d.materials[0].current_stock) - 100.0).abs() < 1e-9);

        // re-submitted with the flag: the sale commits and stock goes below minimum
        let response = create(State(state.clone()), Json(request(vec![line("p1", 2)], true)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(state.read(|d| d.sales.len()), 1);
        assert!((state.read(|d| d.materials[0].current_stock) - 0.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_shortage_gate_projects_lines_together() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        add_product(&state, "p1", 45.0);

        // two lines of the same product need 90.0 combined, leaving 10.0
        // against a minimum of 20.0; each line alone would leave 55.0 and
        // pass, so only the aggregate projection can trip the gate
        let response = create(
            State(state.clone()),
            Json(request(vec![line("p1", 1), line("p1", 1)], false)),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(state.read(|d| d.sales.is_empty()));

        // a single line on the same stock clears the minimum and commits
        let response = create(State(state.clone()), Json(request(vec![line("p1", 1)], false)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(state.read(|d| d.sales.len()), 1);
    }

    #[tokio::test]
    async fn test_clean_sale_needs_no_confirmation() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        add_product(&state, "p1", 1.0);

        let response = create(State(state.clone()), Json(request(vec![line("p1", 3)], false)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!((state.read(|d| d.materials[0].current_stock) - 97.0).abs() < 1e-9);
    }
}
