use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commodity::CommodityCatalog;
use crate::error::{CatalogError, CatalogResult};

/// One required input or produced output of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub commodity: String,
    pub amount: f64,
}

impl Ingredient {
    pub fn new(commodity: impl Into<String>, amount: f64) -> Self {
        Self {
            commodity: commodity.into(),
            amount,
        }
    }
}

/// A named input → output conversion. Immutable once loaded; referenced,
/// never owned, by any number of inventory owners.
///
/// `enabled` and `duration` are carried as data; execution is a single
/// synchronous step and does not consult them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    /// Category tag matched against a capability gate.
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Empty inputs make this a gathering recipe.
    #[serde(default)]
    pub inputs: Vec<Ingredient>,
    #[serde(default)]
    pub outputs: Vec<Ingredient>,
    #[serde(default)]
    pub duration: f64,
    pub enabled: bool,
}

impl Recipe {
    /// Sum of input amounts, used for the capacity netting check.
    pub fn total_input_amount(&self) -> f64 {
        self.inputs.iter().map(|ingredient| ingredient.amount).sum()
    }

    /// Sum of output amounts.
    pub fn total_output_amount(&self) -> f64 {
        self.outputs.iter().map(|ingredient| ingredient.amount).sum()
    }
}

/// Ordered collection of recipe definitions with name/category lookup.
///
/// Like [`CommodityCatalog`], always an explicitly constructed object passed
/// by reference, never a global table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// First recipe with the given name.
    pub fn by_name(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.name == name)
    }

    /// All recipes in a category, in book order.
    pub fn by_category(&self, category: &str) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| recipe.category == category)
            .collect()
    }

    /// Check that every commodity referenced by any recipe exists in the
    /// catalog. This is the engine's only use of the catalog, performed once
    /// at the load boundary so execution itself stays catalog-free.
    pub fn validate_against(&self, catalog: &CommodityCatalog) -> CatalogResult<()> {
        for recipe in &self.recipes {
            for ingredient in recipe.inputs.iter().chain(&recipe.outputs) {
                if !catalog.contains(&ingredient.commodity) {
                    return Err(CatalogError::UnknownCommodity {
                        recipe: recipe.name.clone(),
                        commodity: ingredient.commodity.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Load a book from a JSON list of recipes.
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
