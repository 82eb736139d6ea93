use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogResult;

/// Static properties of one commodity. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityDefinition {
    pub name: String,
    pub category: String,
    /// Remaining life a freshly produced batch of this commodity starts with
    /// (ticks until spoiled).
    pub shelf_life: f64,
    pub weight: f64,
    pub storage_space: f64,
}

/// Read-only lookup of commodity definitions by name.
///
/// Constructed explicitly by whichever component assembles a simulation run
/// and passed by reference to consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommodityCatalog {
    definitions: BTreeMap<String, CommodityDefinition>,
}

impl CommodityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, keyed by its name. Replaces any previous entry
    /// with the same name.
    pub fn insert(&mut self, definition: CommodityDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&CommodityDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommodityDefinition> {
        self.definitions.values()
    }

    /// Names of every commodity in the given category, in name order.
    pub fn names_in_category(&self, category: &str) -> Vec<&str> {
        self.definitions
            .values()
            .filter(|def| def.category == category)
            .map(|def| def.name.as_str())
            .collect()
    }

    /// Load a catalog from a JSON map of name → definition.
    pub fn load_from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}
