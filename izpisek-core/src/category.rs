//! Category persistence: key-value mappings keyed by transaction id and by
//! merchant key, applied to parsed transactions after the fact.
//!
//! Parsing stays pure; callers inject a store and decorate records later.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::merchant::merchant_key;
use crate::transaction::Transaction;

/// Default id-keyed category file, relative to the working directory.
pub const CATEGORIES_FILE: &str = "categories.json";
/// Default merchant-keyed category file.
pub const MERCHANT_CATEGORIES_FILE: &str = "merchant_categories.json";

/// Category mapping as persisted on disk.
pub type CategoryMap = HashMap<String, String>;

/// Key-value persistence boundary for category mappings.
pub trait CategoryStore {
    fn load(&self) -> Result<CategoryMap>;
    fn save(&self, map: &CategoryMap) -> Result<()>;
}

/// JSON-file-backed store. A missing file loads as an empty mapping.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CategoryStore for JsonFileStore {
    fn load(&self) -> Result<CategoryMap> {
        if !self.path.exists() {
            return Ok(CategoryMap::new());
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        Ok(serde_json::from_str(&s)?)
    }

    fn save(&self, map: &CategoryMap) -> Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

/// Attach categories to transactions: an id match wins, then the merchant
/// key derived from the description.
pub fn apply_categories(
    txns: &mut [Transaction],
    by_id: &CategoryMap,
    by_merchant: &CategoryMap,
) {
    for txn in txns.iter_mut() {
        if let Some(cat) = by_id.get(&txn.id) {
            txn.category = Some(cat.clone());
        } else if let Some(key) = merchant_key(&txn.description) {
            if let Some(cat) = by_merchant.get(&key) {
                txn.category = Some(cat.clone());
            }
        }
    }
}

/// Persist a category choice for one transaction id and, when a description
/// is supplied, the derived merchant key for future auto-matching.
pub fn assign_category(
    id_store: &dyn CategoryStore,
    merchant_store: &dyn CategoryStore,
    txn_id: &str,
    category: &str,
    description: Option<&str>,
) -> Result<()> {
    let mut by_id = id_store.load()?;
    by_id.insert(txn_id.to_string(), category.to_string());
    id_store.save(&by_id)?;

    if let Some(key) = description.and_then(merchant_key) {
        let mut by_merchant = merchant_store.load()?;
        by_merchant.insert(key, category.to_string());
        merchant_store.save(&by_merchant)?;
    }

    Ok(())
}
