use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{DTopologyError, Result};
use crate::{DEFAULT_BASE_IRI, DEFAULT_MAX_WALK_DEPTH, DEFAULT_PARENT_CACHE_SIZE, DEFAULT_ROOT, DEFAULT_TOP_N, WILDCARD};


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DTopologyConfig {
    /// Identifier of the taxonomy root; it has no definitional parent.
    pub root_concept: String,
    /// Facet marker that never discriminates between vectors.
    pub wildcard: String,
    /// Upper bound on parent steps in a single ancestor walk.
    pub max_walk_depth: usize,
    /// Memoised parent lookups; 0 disables the cache.
    pub parent_cache_size: usize,
    pub base_iri: String,

    pub dictionary_path: PathBuf,
    pub graph_path: PathBuf,
    pub catalogue_path: Option<PathBuf>,

    pub default_top_n: usize,
}

impl DTopologyConfig {
    pub fn new(dictionary_path: impl Into<PathBuf>, graph_path: impl Into<PathBuf>) -> Self {
        Self {
            root_concept: DEFAULT_ROOT.to_string(),
            wildcard: WILDCARD.to_string(),
            max_walk_depth: DEFAULT_MAX_WALK_DEPTH,
            parent_cache_size: DEFAULT_PARENT_CACHE_SIZE,
            base_iri: DEFAULT_BASE_IRI.to_string(),

            dictionary_path: dictionary_path.into(),
            graph_path: graph_path.into(),
            catalogue_path: None,

            default_top_n: DEFAULT_TOP_N,
        }
    }

    /// Layers an optional config file and `DTOPOLOGY_*` environment variables
    /// over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        } else {
            builder = builder.add_source(config::File::with_name("dtopology").required(false));
        }

        let config: Self = builder
            .add_source(config::Environment::with_prefix("DTOPOLOGY").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.root_concept.is_empty() {
            return Err(DTopologyError::Validation("root_concept must not be empty".into()));
        }
        if self.wildcard.is_empty() {
            return Err(DTopologyError::Validation("wildcard must not be empty".into()));
        }
        if self.root_concept == self.wildcard {
            return Err(DTopologyError::Validation(
                "root_concept and wildcard must differ".into(),
            ));
        }
        if self.max_walk_depth == 0 {
            return Err(DTopologyError::Validation("max_walk_depth must be greater than 0".into()));
        }
        if self.default_top_n == 0 {
            return Err(DTopologyError::Validation("default_top_n must be greater than 0".into()));
        }
        url::Url::parse(&self.base_iri)
            .map_err(|e| DTopologyError::Validation(format!("base_iri is not an IRI: {}", e)))?;
        Ok(())
    }
}

impl Default for DTopologyConfig {
    fn default() -> Self {
        Self::new("data/dtree_dictionary.txt", "data/dtree_edges.txt")
    }
}
