pub mod comparator;
pub mod hierarchy;
pub mod index;
pub mod models;
pub mod ranking;

#[cfg(test)]
pub(crate) mod fixtures;

pub use comparator::{CompareError, ConceptComparator, VectorComparator, VectorJudge};
pub use hierarchy::{display_name, DefinitionIssue, HierarchyError, HierarchyNavigator};
pub use index::{TaxonomyError, TaxonomyIndex};
pub use models::{
    AttributeVector, Catalogue, CatalogueEntry, Concept, Facets, ParentLookup, TaxonomyStats, Verdict,
};
pub use ranking::{RankError, Ranker};

use tracing::info;

use crate::core::config::DTopologyConfig;
use crate::core::error::Result;
use crate::db::MemoryGraph;


/// Concept dictionary plus definitional edges, loaded together.
pub struct DialecticTree {
    index: TaxonomyIndex,
    graph: MemoryGraph,
    config: DTopologyConfig,
}

impl DialecticTree {
    pub fn new(index: TaxonomyIndex, graph: MemoryGraph, config: DTopologyConfig) -> Self {
        Self { index, graph, config }
    }

    pub fn load(config: &DTopologyConfig) -> Result<Self> {
        info!("Loading dialectical tree");
        let mut index = TaxonomyIndex::new();
        index.load_file(&config.dictionary_path)?;
        let graph = MemoryGraph::from_file(&config.base_iri, &config.graph_path)?;
        Ok(Self::new(index, graph, config.clone()))
    }

    pub fn index(&self) -> &TaxonomyIndex {
        &self.index
    }

    pub fn graph(&self) -> &MemoryGraph {
        &self.graph
    }

    pub fn config(&self) -> &DTopologyConfig {
        &self.config
    }

    pub fn navigator(&self) -> HierarchyNavigator<'_, MemoryGraph> {
        HierarchyNavigator::with_config(&self.index, &self.graph, &self.config)
    }

    pub fn concept_comparator(&self) -> ConceptComparator<'_, MemoryGraph> {
        ConceptComparator::new(self.navigator())
    }

    pub fn ranker(&self) -> Ranker<VectorComparator<'_, MemoryGraph>> {
        Ranker::new(VectorComparator::from_navigator(self.navigator()))
    }

    /// Opposite closure plus the definition audit; structural problems are
    /// reported, not repaired.
    pub fn check(&self) -> Result<Vec<DefinitionIssue>> {
        self.index.validate_opposites_closed()?;
        Ok(self.navigator().audit_definitions()?)
    }
}
