//! The transformation step: one recipe execution against one batch store.

use granary_catalog::Recipe;
use granary_inventory::{BatchStore, DEFAULT_OUTPUT_FRESHNESS};

use crate::error::{ExecutionError, ExecutionResult};
use crate::gate::CapabilityGate;

/// Execute one recipe against a store, gated by the owner's capabilities.
///
/// Check order, with no mutation until every check has passed:
/// 1. capability gate (category policy),
/// 2. ingredient sufficiency — every input must be fully available,
/// 3. capacity netting — `used - Σinputs + Σoutputs` must fit, so a recipe
///    that nets to zero or negative space never spuriously fails even when
///    its gross output would not fit alongside the inputs,
/// 4. output admissibility — every output commodity must pass the store's
///    whitelist.
///
/// Only then are the inputs consumed (oldest batch first, per commodity) and
/// the outputs admitted as fresh batches with [`DEFAULT_OUTPUT_FRESHNESS`].
pub fn execute(
    store: &mut BatchStore,
    gate: &CapabilityGate,
    recipe: &Recipe,
) -> ExecutionResult<()> {
    if !gate.can_run(recipe) {
        tracing::warn!(
            recipe = %recipe.name,
            category = %recipe.category,
            "recipe rejected by capability gate"
        );
        return Err(ExecutionError::RecipeNotAllowed(recipe.name.clone()));
    }

    let short = recipe
        .inputs
        .iter()
        .any(|input| !store.has(&input.commodity, input.amount));
    if short {
        tracing::warn!(recipe = %recipe.name, "missing ingredients");
        return Err(ExecutionError::MissingIngredients(recipe.name.clone()));
    }

    let projected_used =
        store.used_capacity() - recipe.total_input_amount() + recipe.total_output_amount();
    if projected_used > store.capacity() {
        tracing::warn!(
            recipe = %recipe.name,
            needed = projected_used,
            capacity = store.capacity(),
            "not enough capacity after transformation"
        );
        return Err(ExecutionError::InsufficientCapacity {
            needed: projected_used,
            capacity: store.capacity(),
        });
    }

    if let Some(output) = recipe
        .outputs
        .iter()
        .find(|output| !store.is_allowed(&output.commodity))
    {
        tracing::warn!(
            recipe = %recipe.name,
            commodity = %output.commodity,
            "output commodity not storable here"
        );
        return Err(ExecutionError::OutputNotStorable {
            commodity: output.commodity.clone(),
        });
    }

    for input in &recipe.inputs {
        store.remove(&input.commodity, input.amount)?;
    }
    for output in &recipe.outputs {
        store.insert(&output.commodity, output.amount, DEFAULT_OUTPUT_FRESHNESS)?;
    }

    tracing::debug!(recipe = %recipe.name, "recipe executed");
    Ok(())
}
