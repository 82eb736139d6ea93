use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use granary_catalog::Recipe;

/// Per-owner policy over recipe categories.
///
/// Immutable after construction; the only way to change policy is to replace
/// the gate wholesale.
///
/// - No IO
/// - No panics
/// - Pure predicate over a recipe's category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityGate {
    /// Carried as data and through serialization, but not enforced against a
    /// count of active operations — reserved for future concurrency limiting.
    max_concurrent_ops: u32,
    allowed_categories: BTreeSet<String>,
}

impl CapabilityGate {
    pub fn new(
        max_concurrent_ops: u32,
        allowed_categories: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            max_concurrent_ops,
            allowed_categories: allowed_categories.into_iter().collect(),
        }
    }

    pub fn max_concurrent_ops(&self) -> u32 {
        self.max_concurrent_ops
    }

    pub fn allowed_categories(&self) -> &BTreeSet<String> {
        &self.allowed_categories
    }

    pub fn allows_category(&self, category: &str) -> bool {
        self.allowed_categories.contains(category)
    }

    /// True iff the recipe's category is within this gate's capabilities.
    pub fn can_run(&self, recipe: &Recipe) -> bool {
        self.allows_category(&recipe.category)
    }

    /// Filter a recipe list down to what this gate allows. Pure; preserves
    /// the relative order of the input.
    pub fn available_recipes<'a>(&self, all_recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        all_recipes
            .iter()
            .filter(|recipe| self.allows_category(&recipe.category))
            .collect()
    }
}
