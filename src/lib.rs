pub mod core;
pub mod db;
pub mod toolkit;
pub mod utils;

pub use utils::split_facets;


pub use crate::core::config::DTopologyConfig;
pub use crate::core::error::{DTopologyError, Result};
pub use db::{GraphStore, GraphStoreError, MemoryGraph};
pub use toolkit::taxonomy::{
    AttributeVector, Catalogue, CatalogueEntry, Concept, ConceptComparator, DialecticTree, Facets,
    HierarchyNavigator, ParentLookup, Ranker, TaxonomyIndex, VectorComparator, VectorJudge,
    Verdict,
};


pub const DEFAULT_ROOT: &str = "одно";


pub const WILDCARD: &str = "nil";


pub const DEFAULT_MAX_WALK_DEPTH: usize = 1024;


pub const DEFAULT_PARENT_CACHE_SIZE: usize = 1000;


pub const DEFAULT_BASE_IRI: &str = "http://dtopology.local/dtree/";


pub const DEFAULT_TOP_N: usize = 3;
