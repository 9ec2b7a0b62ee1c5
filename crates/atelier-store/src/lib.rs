//! # atelier-store: Persistence Layer for Atelier
//!
//! This crate provides document storage for the Atelier system.
//! The persisted state is a set of independent JSON documents, one per
//! logical collection, living in a data directory.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atelier Data Flow                                │
//! │                                                                         │
//! │  HTTP route handler (create_sale)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   atelier-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │    DataSet    │    │  ImportDoc   │  │   │
//! │  │   │  load/persist │◄───│ 11 collections│    │ partial      │  │   │
//! │  │   │  temp+rename  │    │ + seed()      │    │ replacement  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          data/materials.json … data/system_config.json          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! Reads never fail: a missing document means "first run" and a corrupt one
//! is logged and replaced by that collection's seed default. Losing a broken
//! document beats refusing to start. Writes DO fail loudly — a write error
//! aborts the enclosing mutation before the in-memory state is swapped.
//!
//! ## Usage
//! ```rust,no_run
//! use atelier_store::Store;
//!
//! let store = Store::open("data").unwrap();
//! let mut data = store.load();
//! data.system_config.daily_message = "Ship the pending orders first.".to_string();
//! store.persist(&data).unwrap();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;

pub use error::{StoreError, StoreResult};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use atelier_core::money::{Money, Percent};
use atelier_core::types::{
    Expense, InventoryTransaction, Marketplace, Material, OperationalLog, OperationalTarget,
    Product, Role, Sale, SystemConfig, Unit, User,
};
use atelier_core::PayrollTransaction;

// =============================================================================
// DataSet
// =============================================================================

/// The entire persisted state of the shop, in memory.
///
/// Serializes with camelCase keys; a serialized `DataSet` IS the export
/// document format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    pub materials: Vec<Material>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub logs: Vec<OperationalLog>,
    pub expenses: Vec<Expense>,
    pub targets: Vec<OperationalTarget>,
    pub marketplaces: Vec<Marketplace>,
    pub users: Vec<User>,
    pub inventory_history: Vec<InventoryTransaction>,
    pub payroll_transactions: Vec<PayrollTransaction>,
    pub system_config: SystemConfig,
}

impl DataSet {
    /// The state a brand-new installation starts from: a small catalog of
    /// materials, targets and marketplaces, an admin and an employee, and
    /// empty ledgers.
    pub fn seed() -> Self {
        DataSet {
            materials: vec![
                Material {
                    id: "1".to_string(),
                    name: "Coated Paper 150g".to_string(),
                    unit: Unit::M2,
                    cost_per_unit: Money::from_cents(250),
                    current_stock: 100.0,
                    min_stock: 20.0,
                    loss_tolerance: Percent::from_percent(5.0),
                },
                Material {
                    id: "2".to_string(),
                    name: "Black Vinyl Ink".to_string(),
                    unit: Unit::L,
                    cost_per_unit: Money::from_cents(15_000),
                    current_stock: 5.0,
                    min_stock: 1.0,
                    loss_tolerance: Percent::from_percent(2.0),
                },
            ],
            products: Vec::new(),
            sales: Vec::new(),
            logs: Vec::new(),
            expenses: Vec::new(),
            targets: vec![
                OperationalTarget {
                    id: "1".to_string(),
                    metric_name: "Listings Created".to_string(),
                    target_daily: 5.0,
                    unit_rate: Money::from_cents(200),
                },
                OperationalTarget {
                    id: "2".to_string(),
                    metric_name: "Packages Shipped".to_string(),
                    target_daily: 20.0,
                    unit_rate: Money::from_cents(50),
                },
            ],
            marketplaces: vec![
                Marketplace {
                    id: "1".to_string(),
                    name: "Mercado Livre - Classic".to_string(),
                    fixed_fee: Money::from_cents(500),
                    variable_fee: Percent::from_percent(12.0),
                    ads_fee: Percent::zero(),
                    shipping_cost: Money::from_cents(2000),
                    tax: Percent::from_percent(4.0),
                },
                Marketplace {
                    id: "2".to_string(),
                    name: "Shopee".to_string(),
                    fixed_fee: Money::from_cents(300),
                    variable_fee: Percent::from_percent(18.0),
                    ads_fee: Percent::from_percent(2.0),
                    shipping_cost: Money::from_cents(1500),
                    tax: Percent::from_percent(4.0),
                },
                Marketplace {
                    id: "3".to_string(),
                    name: "Walk-in / Physical Store".to_string(),
                    fixed_fee: Money::zero(),
                    variable_fee: Percent::zero(),
                    ads_fee: Percent::zero(),
                    shipping_cost: Money::zero(),
                    tax: Percent::zero(),
                },
            ],
            users: vec![
                User {
                    id: "1".to_string(),
                    name: "Administrator".to_string(),
                    pin: "1234".to_string(),
                    role: Role::Admin,
                    payroll: None,
                },
                User {
                    id: "2".to_string(),
                    name: "Employee".to_string(),
                    pin: "0000".to_string(),
                    role: Role::Employee,
                    payroll: None,
                },
            ],
            inventory_history: Vec::new(),
            payroll_transactions: Vec::new(),
            system_config: SystemConfig {
                daily_message: "Welcome! No message today.".to_string(),
            },
        }
    }
}

// =============================================================================
// Import Document
// =============================================================================

/// A backup being imported. Every key is optional: import replaces exactly
/// the collections present in the document and leaves the rest untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDoc {
    pub materials: Option<Vec<Material>>,
    pub products: Option<Vec<Product>>,
    pub sales: Option<Vec<Sale>>,
    pub logs: Option<Vec<OperationalLog>>,
    pub expenses: Option<Vec<Expense>>,
    pub targets: Option<Vec<OperationalTarget>>,
    pub marketplaces: Option<Vec<Marketplace>>,
    pub users: Option<Vec<User>>,
    pub inventory_history: Option<Vec<InventoryTransaction>>,
    pub payroll_transactions: Option<Vec<PayrollTransaction>>,
    pub system_config: Option<SystemConfig>,
}

impl DataSet {
    /// Applies a partial import: each collection present in the document
    /// wholesale-replaces the current one.
    pub fn apply_import(&mut self, doc: ImportDoc) {
        if let Some(v) = doc.materials {
            self.materials = v;
        }
        if let Some(v) = doc.products {
            self.products = v;
        }
        if let Some(v) = doc.sales {
            self.sales = v;
        }
        if let Some(v) = doc.logs {
            self.logs = v;
        }
        if let Some(v) = doc.expenses {
            self.expenses = v;
        }
        if let Some(v) = doc.targets {
            self.targets = v;
        }
        if let Some(v) = doc.marketplaces {
            self.marketplaces = v;
        }
        if let Some(v) = doc.users {
            self.users = v;
        }
        if let Some(v) = doc.inventory_history {
            self.inventory_history = v;
        }
        if let Some(v) = doc.payroll_transactions {
            self.payroll_transactions = v;
        }
        if let Some(v) = doc.system_config {
            self.system_config = v;
        }
    }
}

// =============================================================================
// Store
// =============================================================================

const MATERIALS_FILE: &str = "materials.json";
const PRODUCTS_FILE: &str = "products.json";
const SALES_FILE: &str = "sales.json";
const LOGS_FILE: &str = "logs.json";
const EXPENSES_FILE: &str = "expenses.json";
const TARGETS_FILE: &str = "targets.json";
const MARKETPLACES_FILE: &str = "marketplaces.json";
const USERS_FILE: &str = "users.json";
const INVENTORY_FILE: &str = "inventory_history.json";
const PAYROLL_FILE: &str = "payroll_transactions.json";
const SYSTEM_CONFIG_FILE: &str = "system_config.json";

/// Handle on the data directory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Opens (creating if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        debug!(dir = %dir.display(), "store opened");
        Ok(Store { dir })
    }

    /// The data directory this store writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads the full state. Never fails: missing documents mean first run,
    /// corrupt documents are logged and replaced by their seed default.
    pub fn load(&self) -> DataSet {
        let seed = DataSet::seed();
        DataSet {
            materials: self.load_collection(MATERIALS_FILE, seed.materials),
            products: self.load_collection(PRODUCTS_FILE, seed.products),
            sales: self.load_collection(SALES_FILE, seed.sales),
            logs: self.load_collection(LOGS_FILE, seed.logs),
            expenses: self.load_collection(EXPENSES_FILE, seed.expenses),
            targets: self.load_collection(TARGETS_FILE, seed.targets),
            marketplaces: self.load_collection(MARKETPLACES_FILE, seed.marketplaces),
            users: self.load_collection(USERS_FILE, seed.users),
            inventory_history: self.load_collection(INVENTORY_FILE, seed.inventory_history),
            payroll_transactions: self.load_collection(PAYROLL_FILE, seed.payroll_transactions),
            system_config: self.load_collection(SYSTEM_CONFIG_FILE, seed.system_config),
        }
    }

    /// Persists the full state, one document per collection, each written to
    /// a temp file and renamed into place.
    pub fn persist(&self, data: &DataSet) -> StoreResult<()> {
        self.persist_collection(MATERIALS_FILE, &data.materials)?;
        self.persist_collection(PRODUCTS_FILE, &data.products)?;
        self.persist_collection(SALES_FILE, &data.sales)?;
        self.persist_collection(LOGS_FILE, &data.logs)?;
        self.persist_collection(EXPENSES_FILE, &data.expenses)?;
        self.persist_collection(TARGETS_FILE, &data.targets)?;
        self.persist_collection(MARKETPLACES_FILE, &data.marketplaces)?;
        self.persist_collection(USERS_FILE, &data.users)?;
        self.persist_collection(INVENTORY_FILE, &data.inventory_history)?;
        self.persist_collection(PAYROLL_FILE, &data.payroll_transactions)?;
        self.persist_collection(SYSTEM_CONFIG_FILE, &data.system_config)?;
        Ok(())
    }

    fn load_collection<T: DeserializeOwned>(&self, file: &str, default: T) -> T {
        let path = self.dir.join(file);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return default,
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable document, using defaults");
                return default;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %path.display(), %err, "corrupt document, using defaults");
                default
            }
        }
    }

    fn persist_collection<T: Serialize>(&self, file: &str, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
            collection: file.to_string(),
            source,
        })?;

        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));
        fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn as_json(data: &DataSet) -> serde_json::Value {
        serde_json::to_value(data).unwrap()
    }

    #[test]
    fn test_empty_dir_loads_seed() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let data = store.load();
        assert_eq!(data.materials.len(), 2);
        assert_eq!(data.targets.len(), 2);
        assert_eq!(data.marketplaces.len(), 3);
        assert_eq!(data.users.len(), 2);
        assert!(data.sales.is_empty());
        assert_eq!(data.users[0].role, Role::Admin);
    }

    #[test]
    fn test_persist_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let mut data = DataSet::seed();
        data.system_config.daily_message = "Ship pending orders first.".to_string();
        data.materials[0].current_stock = 87.5;
        store.persist(&data).unwrap();

        let reloaded = store.load();
        assert_eq!(as_json(&data), as_json(&reloaded));
    }

    #[test]
    fn test_corrupt_document_falls_back_to_seed() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let mut data = DataSet::seed();
        data.system_config.daily_message = "kept".to_string();
        store.persist(&data).unwrap();

        fs::write(dir.path().join(MATERIALS_FILE), "{ not json").unwrap();

        let reloaded = store.load();
        // the broken collection reverts to seed, the rest survives
        assert_eq!(reloaded.materials.len(), 2);
        assert_eq!(reloaded.materials[0].name, "Coated Paper 150g");
        assert_eq!(reloaded.system_config.daily_message, "kept");
    }

    #[test]
    fn test_export_document_has_all_collection_keys() {
        let doc = as_json(&DataSet::seed());
        for key in [
            "materials",
            "products",
            "sales",
            "logs",
            "expenses",
            "targets",
            "marketplaces",
            "users",
            "inventoryHistory",
            "payrollTransactions",
            "systemConfig",
        ] {
            assert!(doc.get(key).is_some(), "missing export key {key}");
        }
    }

    #[test]
    fn test_partial_import_replaces_only_present_keys() {
        let mut data = DataSet::seed();
        let original_users = as_json(&data)["users"].clone();

        let doc: ImportDoc = serde_json::from_value(serde_json::json!({
            "materials": [],
            "systemConfig": { "dailyMessage": "imported" }
        }))
        .unwrap();

        data.apply_import(doc);
        assert!(data.materials.is_empty());
        assert_eq!(data.system_config.daily_message, "imported");
        // absent keys untouched
        assert_eq!(as_json(&data)["users"], original_users);
        assert_eq!(data.marketplaces.len(), 3);
    }

    #[test]
    fn test_full_export_import_round_trip() {
        let mut data = DataSet::seed();
        data.system_config.daily_message = "exported state".to_string();
        let exported = as_json(&data);

        let doc: ImportDoc = serde_json::from_value(exported.clone()).unwrap();
        let mut fresh = DataSet::seed();
        fresh.apply_import(doc);

        assert_eq!(as_json(&fresh), exported);
    }
}
