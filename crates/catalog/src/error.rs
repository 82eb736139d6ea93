//! Catalog error model.

use thiserror::Error;

/// Result type used across catalog and recipe-book operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failure while loading, saving, or cross-checking catalog data.
///
/// `Io` and `Parse` are the hard-failure path for corrupt persisted records;
/// `UnknownCommodity` is a consistency failure between a recipe book and the
/// commodity catalog it is validated against.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file io: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog file parse: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("recipe {recipe:?} references unknown commodity {commodity:?}")]
    UnknownCommodity { recipe: String, commodity: String },
}
