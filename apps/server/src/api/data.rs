//! Whole-state backup routes.
//!
//! Export is the serialized [`DataSet`] itself, so a saved export file is
//! byte-compatible with the on-disk documents and with import.

use axum::extract::State;
use axum::Json;
use tracing::info;

use atelier_store::{DataSet, ImportDoc};

use crate::error::ApiError;
use crate::state::SharedState;

/// GET /api/data/export
pub async fn export(State(state): State<SharedState>) -> Json<DataSet> {
    info!("exporting full data set");
    Json(state.read(|data| data.clone()))
}

/// POST /api/data/import
///
/// Partial import: only the collections present in the document are
/// replaced, the rest keep their current contents. One commit, so a failed
/// persist leaves everything untouched.
pub async fn import(
    State(state): State<SharedState>,
    Json(doc): Json<ImportDoc>,
) -> Result<Json<DataSet>, ApiError> {
    let imported = state.mutate(move |data| {
        data.apply_import(doc);
        Ok(data.clone())
    })?;

    info!(
        materials = imported.materials.len(),
        products = imported.products.len(),
        sales = imported.sales.len(),
        "data set imported"
    );
    Ok(Json(imported))
}
