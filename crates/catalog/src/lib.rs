//! Commodity and recipe definitions.
//!
//! This crate contains the static lookup side of the production chain:
//! commodity definitions keyed by name and the recipe book. Both are plain,
//! explicitly constructed objects passed by reference — never process-wide
//! registries — and are immutable once loaded as far as consumers are
//! concerned.

pub mod commodity;
pub mod error;
pub mod recipe;

pub use commodity::{CommodityCatalog, CommodityDefinition};
pub use error::{CatalogError, CatalogResult};
pub use recipe::{Ingredient, Recipe, RecipeBook};
