use serde::{Deserialize, Serialize};

use granary_catalog::Recipe;
use granary_inventory::BatchStore;

use crate::engine::execute;
use crate::error::{ExecutionError, ExecutionResult};
use crate::gate::CapabilityGate;

/// The minimal inventory owner: one batch store, one capability gate, and at
/// most one selected recipe.
///
/// The selection state machine has no in-progress state: `None → Selected`
/// via [`Workstation::select_recipe`] (gated), back to `None` via any
/// [`Workstation::perform`] call — executing always consumes the selection,
/// win or lose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workstation {
    name: String,
    store: BatchStore,
    gate: CapabilityGate,
    active_recipe: Option<Recipe>,
}

impl Workstation {
    pub fn new(name: impl Into<String>, store: BatchStore, gate: CapabilityGate) -> Self {
        Self {
            name: name.into(),
            store,
            gate,
            active_recipe: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &BatchStore {
        &self.store
    }

    /// Mutable store access for host wiring (stocking, manual withdrawals).
    pub fn store_mut(&mut self) -> &mut BatchStore {
        &mut self.store
    }

    pub fn gate(&self) -> &CapabilityGate {
        &self.gate
    }

    pub fn active_recipe(&self) -> Option<&Recipe> {
        self.active_recipe.as_ref()
    }

    /// Select the recipe to run next.
    ///
    /// A recipe outside this station's capabilities is rejected here, at
    /// selection time, leaving any previously selected recipe in place.
    pub fn select_recipe(&mut self, recipe: &Recipe) -> ExecutionResult<()> {
        if !self.gate.can_run(recipe) {
            tracing::warn!(
                station = %self.name,
                recipe = %recipe.name,
                "selection rejected by capability gate"
            );
            return Err(ExecutionError::RecipeNotAllowed(recipe.name.clone()));
        }
        self.active_recipe = Some(recipe.clone());
        Ok(())
    }

    pub fn clear_recipe(&mut self) {
        self.active_recipe = None;
    }

    /// Run the selected recipe against this station's store.
    ///
    /// The selection is cleared regardless of the outcome.
    pub fn perform(&mut self) -> ExecutionResult<()> {
        let Some(recipe) = self.active_recipe.take() else {
            return Err(ExecutionError::NoRecipeSelected);
        };
        execute(&mut self.store, &self.gate, &recipe)
    }

    /// Recipes from `all_recipes` this station is capable of running.
    pub fn available_recipes<'a>(&self, all_recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        self.gate.available_recipes(all_recipes)
    }

    /// One simulation turn: age the stored batches.
    pub fn advance_turn(&mut self) {
        self.store.advance_time();
    }
}
