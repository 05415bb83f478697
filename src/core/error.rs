use thiserror::Error;

use crate::db::GraphStoreError;
use crate::toolkit::taxonomy::{CompareError, HierarchyError, RankError, TaxonomyError};


#[derive(Error, Debug)]
pub enum DTopologyError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("Graph store error: {0}")]
    Graph(#[from] GraphStoreError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Ranking error: {0}")]
    Rank(#[from] RankError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}


pub type Result<T> = std::result::Result<T, DTopologyError>;
