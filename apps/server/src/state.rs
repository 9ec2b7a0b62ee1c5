//! # Shared Application State
//!
//! All collections live in one [`DataSet`] behind a lock; every mutation goes
//! through [`AppState::mutate`].
//!
//! ## The Transaction Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mutate(f):                                                             │
//! │                                                                         │
//! │    1. take the write lock                                               │
//! │    2. CLONE the data set                                                │
//! │    3. apply f to the clone            ── error? nothing happened        │
//! │    4. persist the clone to disk       ── error? nothing happened        │
//! │    5. swap the clone in                                                 │
//! │                                                                         │
//! │  Compound operations (delete sale + restock, confirm slip + clear       │
//! │  advances + create expense) either fully commit or leave memory AND     │
//! │  disk at the pre-operation snapshot.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, RwLock};

use tracing::info;

use atelier_store::{DataSet, Store};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::insight::InsightClient;

/// Shared application state, one instance per process.
pub struct AppState {
    store: Store,
    data: RwLock<DataSet>,
    pub config: ServerConfig,
    pub insight: InsightClient,
}

/// What handlers receive from axum.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Loads the persisted state and wraps it for sharing.
    pub fn new(store: Store, config: ServerConfig) -> Self {
        let data = store.load();
        info!(
            materials = data.materials.len(),
            products = data.products.len(),
            sales = data.sales.len(),
            users = data.users.len(),
            "state loaded"
        );

        let insight = InsightClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        );

        AppState {
            store,
            data: RwLock::new(data),
            config,
            insight,
        }
    }

    /// Runs a closure against a read view of the state.
    pub fn read<T>(&self, f: impl FnOnce(&DataSet) -> T) -> T {
        let guard = self.data.read().expect("state lock poisoned");
        f(&guard)
    }

    /// Runs a mutation with commit-or-nothing semantics: the closure works on
    /// a clone, the clone is persisted, and only then swapped in.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut DataSet) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut guard = self.data.write().expect("state lock poisoned");

        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        self.store.persist(&draft)?;
        *guard = draft;

        Ok(out)
    }
}
