//! # HTTP API
//!
//! JSON routes grouped the way the frontend's views are grouped. Every
//! handler is a thin shell: deserialize, validate, call into
//! `atelier_core`, commit through `AppState::mutate`, serialize.
//!
//! ## Route Map
//! ```text
//! /api/auth/login                      POST   PIN login
//! /api/materials[/{id}]                CRUD   material catalog
//! /api/products[/{id}]                 CRD    product catalog
//! /api/products/describe               POST   AI listing copy
//! /api/sales[/{id}]                    CRD    sales ledger (shortage gate)
//! /api/sales/{id}/status               PUT    production status
//! /api/inventory[/{id}]                CRD    stock movement log
//! /api/operations/logs                 GET/POST  productivity logs
//! /api/operations/targets              GET    metric targets
//! /api/expenses                        GET/POST  expense ledger
//! /api/payroll/...                     payroll engine surface
//! /api/reports/...                     monthly waterfall + AI insight
//! /api/settings/...                    marketplaces, targets, users, notice
//! /api/data/export|import              whole-state backup
//! ```

pub mod auth;
pub mod data;
pub mod inventory;
pub mod materials;
pub mod operations;
pub mod payroll;
pub mod products;
pub mod reports;
pub mod sales;
pub mod settings;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::SharedState;

/// Builds the full application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        // auth
        .route("/api/auth/login", post(auth::login))
        // catalog
        .route(
            "/api/materials",
            get(materials::list).post(materials::create),
        )
        .route(
            "/api/materials/{id}",
            put(materials::update).delete(materials::remove),
        )
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/{id}", delete(products::remove))
        .route("/api/products/describe", post(products::describe))
        // sales ledger
        .route("/api/sales", get(sales::list).post(sales::create))
        .route("/api/sales/{id}", delete(sales::remove))
        .route("/api/sales/{id}/status", put(sales::update_status))
        // inventory log
        .route(
            "/api/inventory",
            get(inventory::list).post(inventory::record),
        )
        .route("/api/inventory/{id}", delete(inventory::remove))
        // operational metrics
        .route(
            "/api/operations/logs",
            get(operations::list_logs).post(operations::record_log),
        )
        .route("/api/operations/targets", get(operations::list_targets))
        // expenses
        .route(
            "/api/expenses",
            get(reports::list_expenses).post(reports::add_expense),
        )
        // payroll
        .route(
            "/api/payroll/transactions",
            get(payroll::list_transactions),
        )
        .route("/api/payroll/users/{id}/config", put(payroll::update_config))
        .route("/api/payroll/advances", post(payroll::add_advance))
        .route("/api/payroll/slips/{id}/preview", get(payroll::preview_slip))
        .route("/api/payroll/slips/{id}/confirm", post(payroll::confirm))
        .route("/api/payroll/generate", post(payroll::generate))
        // reports
        .route("/api/reports/summary", get(reports::summary))
        .route("/api/reports/insight", post(reports::insight))
        // settings
        .route(
            "/api/settings/marketplaces",
            get(settings::list_marketplaces).post(settings::create_marketplace),
        )
        .route(
            "/api/settings/marketplaces/{id}",
            put(settings::update_marketplace).delete(settings::remove_marketplace),
        )
        .route("/api/settings/targets", post(settings::create_target))
        .route(
            "/api/settings/targets/{id}",
            put(settings::update_target).delete(settings::remove_target),
        )
        .route(
            "/api/settings/users",
            get(settings::list_users).post(settings::create_user),
        )
        .route(
            "/api/settings/users/{id}",
            put(settings::update_user).delete(settings::remove_user),
        )
        .route(
            "/api/settings/daily-message",
            get(settings::daily_message).put(settings::update_daily_message),
        )
        // backup
        .route("/api/data/export", get(data::export))
        .route("/api/data/import", post(data::import))
        .with_state(state)
}

/// A fresh UUID v4 string, the id format of every entity.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
