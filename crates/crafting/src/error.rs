//! Execution error model.

use granary_inventory::StoreError;
use thiserror::Error;

/// Result type used across recipe execution.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Failure of one recipe execution attempt.
///
/// All variants are recoverable policy conditions; callers inspect and react
/// (typically by prompting for a new selection). No variant mutates the
/// store, with the exception noted on [`ExecutionError::Store`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutionError {
    /// No recipe is currently selected on the owner.
    #[error("no recipe selected")]
    NoRecipeSelected,

    /// The recipe's category is outside the owner's capabilities. Raised both
    /// at selection time and at execution time.
    #[error("recipe {0:?} is not allowed here")]
    RecipeNotAllowed(String),

    /// At least one required input is short. Not broken down per commodity.
    #[error("missing ingredients for recipe {0:?}")]
    MissingIngredients(String),

    /// Even after netting inputs against outputs, the result would not fit.
    #[error("transformation would need {needed} of {capacity} capacity")]
    InsufficientCapacity { needed: f64, capacity: f64 },

    /// An output commodity is outside the store's whitelist. Checked before
    /// any input is consumed.
    #[error("output commodity {commodity:?} cannot be stored here")]
    OutputNotStorable { commodity: String },

    /// A store rejection after the pre-checks passed. With the pre-checks in
    /// place this indicates a malformed recipe (e.g. a non-positive output
    /// amount) and may leave inputs already consumed; it is propagated rather
    /// than swallowed so the caller can see the loss.
    #[error(transparent)]
    Store(#[from] StoreError),
}
