//! Settings routes: marketplaces, operational targets, user accounts, and
//! the dashboard notice.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use atelier_core::money::{Money, Percent};
use atelier_core::types::{Marketplace, OperationalTarget, Role, User};
use atelier_core::validation;
use atelier_core::CoreError;

use crate::api::new_id;
use crate::error::ApiError;
use crate::state::SharedState;

// =============================================================================
// Marketplaces
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceRequest {
    pub name: String,
    pub fixed_fee: Money,
    pub variable_fee: Percent,
    pub ads_fee: Percent,
    pub shipping_cost: Money,
    pub tax: Percent,
}

fn validate_marketplace(req: &MarketplaceRequest) -> Result<(), ApiError> {
    validation::validate_name(&req.name)?;
    validation::validate_amount("fixedFee", req.fixed_fee)?;
    validation::validate_amount("shippingCost", req.shipping_cost)?;
    validation::validate_percent("variableFee", req.variable_fee)?;
    validation::validate_percent("adsFee", req.ads_fee)?;
    validation::validate_percent("tax", req.tax)?;
    Ok(())
}

/// GET /api/settings/marketplaces
pub async fn list_marketplaces(State(state): State<SharedState>) -> Json<Vec<Marketplace>> {
    Json(state.read(|data| data.marketplaces.clone()))
}

/// POST /api/settings/marketplaces
pub async fn create_marketplace(
    State(state): State<SharedState>,
    Json(req): Json<MarketplaceRequest>,
) -> Result<Json<Marketplace>, ApiError> {
    debug!(name = %req.name, "create marketplace");
    validate_marketplace(&req)?;

    let marketplace = Marketplace {
        id: new_id(),
        name: req.name.trim().to_string(),
        fixed_fee: req.fixed_fee,
        variable_fee: req.variable_fee,
        ads_fee: req.ads_fee,
        shipping_cost: req.shipping_cost,
        tax: req.tax,
    };

    let created = marketplace.clone();
    state.mutate(move |data| {
        data.marketplaces.push(marketplace);
        Ok(())
    })?;

    info!(id = %created.id, name = %created.name, "marketplace created");
    Ok(Json(created))
}

/// PUT /api/settings/marketplaces/{id}
///
/// Existing sales keep their frozen fee snapshots; only future sales see the
/// new rates.
pub async fn update_marketplace(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<MarketplaceRequest>,
) -> Result<Json<Marketplace>, ApiError> {
    debug!(%id, "update marketplace");
    validate_marketplace(&req)?;

    let updated = state.mutate(move |data| {
        let marketplace = data
            .marketplaces
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(CoreError::MarketplaceNotFound(id))?;

        marketplace.name = req.name.trim().to_string();
        marketplace.fixed_fee = req.fixed_fee;
        marketplace.variable_fee = req.variable_fee;
        marketplace.ads_fee = req.ads_fee;
        marketplace.shipping_cost = req.shipping_cost;
        marketplace.tax = req.tax;
        Ok(marketplace.clone())
    })?;

    Ok(Json(updated))
}

/// DELETE /api/settings/marketplaces/{id}
pub async fn remove_marketplace(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(), ApiError> {
    debug!(%id, "delete marketplace");

    state.mutate(move |data| {
        let before = data.marketplaces.len();
        data.marketplaces.retain(|m| m.id != id);
        if data.marketplaces.len() == before {
            return Err(CoreError::MarketplaceNotFound(id).into());
        }
        Ok(())
    })
}

// =============================================================================
// Operational Targets
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRequest {
    pub metric_name: String,
    pub target_daily: f64,
    pub unit_rate: Money,
}

fn validate_target(req: &TargetRequest) -> Result<(), ApiError> {
    validation::validate_name(&req.metric_name)?;
    validation::validate_quantity(req.target_daily)?;
    validation::validate_amount("unitRate", req.unit_rate)?;
    Ok(())
}

/// POST /api/settings/targets
pub async fn create_target(
    State(state): State<SharedState>,
    Json(req): Json<TargetRequest>,
) -> Result<Json<OperationalTarget>, ApiError> {
    debug!(metric = %req.metric_name, "create target");
    validate_target(&req)?;

    let target = OperationalTarget {
        id: new_id(),
        metric_name: req.metric_name.trim().to_string(),
        target_daily: req.target_daily,
        unit_rate: req.unit_rate,
    };

    let created = target.clone();
    state.mutate(move |data| {
        data.targets.push(target);
        Ok(())
    })?;

    info!(id = %created.id, metric = %created.metric_name, "target created");
    Ok(Json(created))
}

/// PUT /api/settings/targets/{id}
///
/// Renaming a metric orphans its old logs: they stay in the ledger but earn
/// no bonus under the new name.
pub async fn update_target(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<TargetRequest>,
) -> Result<Json<OperationalTarget>, ApiError> {
    debug!(%id, "update target");
    validate_target(&req)?;

    let updated = state.mutate(move |data| {
        let target = data
            .targets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::TargetNotFound(id))?;

        target.metric_name = req.metric_name.trim().to_string();
        target.target_daily = req.target_daily;
        target.unit_rate = req.unit_rate;
        Ok(target.clone())
    })?;

    Ok(Json(updated))
}

/// DELETE /api/settings/targets/{id}
pub async fn remove_target(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(), ApiError> {
    debug!(%id, "delete target");

    state.mutate(move |data| {
        let before = data.targets.len();
        data.targets.retain(|t| t.id != id);
        if data.targets.len() == before {
            return Err(CoreError::TargetNotFound(id).into());
        }
        Ok(())
    })
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub name: String,
    pub pin: String,
    pub role: Role,
}

/// GET /api/settings/users
pub async fn list_users(State(state): State<SharedState>) -> Json<Vec<User>> {
    Json(state.read(|data| data.users.clone()))
}

/// POST /api/settings/users
pub async fn create_user(
    State(state): State<SharedState>,
    Json(req): Json<UserRequest>,
) -> Result<Json<User>, ApiError> {
    debug!(name = %req.name, role = ?req.role, "create user");
    validation::validate_name(&req.name)?;
    validation::validate_pin(&req.pin)?;

    let user = User {
        id: new_id(),
        name: req.name.trim().to_string(),
        pin: req.pin,
        role: req.role,
        payroll: None,
    };

    let created = user.clone();
    state.mutate(move |data| {
        data.users.push(user);
        Ok(())
    })?;

    info!(id = %created.id, name = %created.name, "user created");
    Ok(Json(created))
}

/// PUT /api/settings/users/{id}
///
/// Payroll config is managed through its own endpoint and untouched here.
pub async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Result<Json<User>, ApiError> {
    debug!(%id, "update user");
    validation::validate_name(&req.name)?;
    validation::validate_pin(&req.pin)?;

    let updated = state.mutate(move |data| {
        let user = data
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(CoreError::UserNotFound(id))?;

        user.name = req.name.trim().to_string();
        user.pin = req.pin;
        user.role = req.role;
        Ok(user.clone())
    })?;

    Ok(Json(updated))
}

/// DELETE /api/settings/users/{id}
///
/// The last remaining user cannot be deleted: an empty user table would lock
/// everyone out of the terminal.
pub async fn remove_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(), ApiError> {
    debug!(%id, "delete user");

    state.mutate(move |data| {
        if data.users.len() <= 1 {
            return Err(CoreError::LastUser.into());
        }
        let before = data.users.len();
        data.users.retain(|u| u.id != id);
        if data.users.len() == before {
            return Err(CoreError::UserNotFound(id).into());
        }
        Ok(())
    })
}

// =============================================================================
// Daily Message
// =============================================================================

#[derive(Debug, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMessage {
    pub daily_message: String,
}

/// GET /api/settings/daily-message
pub async fn daily_message(State(state): State<SharedState>) -> Json<DailyMessage> {
    Json(DailyMessage {
        daily_message: state.read(|data| data.system_config.daily_message.clone()),
    })
}

/// PUT /api/settings/daily-message
pub async fn update_daily_message(
    State(state): State<SharedState>,
    Json(req): Json<DailyMessage>,
) -> Result<Json<DailyMessage>, ApiError> {
    debug!("update daily message");

    let saved = state.mutate(move |data| {
        data.system_config.daily_message = req.daily_message.trim().to_string();
        Ok(data.system_config.daily_message.clone())
    })?;

    Ok(Json(DailyMessage {
        daily_message: saved,
    }))
}
