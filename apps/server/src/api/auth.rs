//! PIN login.
//!
//! The PIN is compared as plaintext against the stored user record. This is
//! terminal-sharing convenience for a single shop machine, not a security
//! boundary.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use atelier_core::User;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: String,
    pub pin: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    debug!(user_id = %req.user_id, "login attempt");

    let user = state.read(|data| {
        data.users
            .iter()
            .find(|u| u.id == req.user_id)
            .cloned()
    });

    match user {
        Some(user) if user.pin == req.pin => {
            info!(user_id = %user.id, name = %user.name, "login ok");
            Ok(Json(user))
        }
        _ => Err(ApiError::unauthorized("Incorrect PIN")),
    }
}
