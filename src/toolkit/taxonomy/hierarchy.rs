use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::index::TaxonomyIndex;
use super::models::ParentLookup;
use crate::core::config::DTopologyConfig;
use crate::db::{GraphStore, GraphStoreError};

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Concept is empty or the wildcard: {0:?}")]
    Incomparable(String),
    #[error("Concept not found: {0}")]
    UnknownConcept(String),
    #[error("No definitional parent for {0}")]
    MissingParent(String),
    #[error("Ambiguous definitional parent for {concept}: {sources:?}")]
    AmbiguousParent { concept: String, sources: Vec<String> },
    #[error("{0} and {1} share no ancestor")]
    Disjoint(String, String),
    #[error("Walk exceeded {0} steps; the hierarchy is cyclic or deeper than allowed")]
    DepthExceeded(usize),
    #[error("Graph store error: {0}")]
    Graph(#[from] GraphStoreError),
}


/// A concept whose definition does not fit the tree shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DefinitionIssue {
    MissingParent { concept: String },
    AmbiguousParent { concept: String, sources: Vec<String> },
    ParentNotIndexed { concept: String, parent: String },
    SnNotIncreasing { concept: String, parent: String },
}


/// Percent-decodes a raw graph label and keeps what follows the last `/`.
/// Returns `None` if the decoded bytes are not UTF-8.
pub fn display_name(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    let name = match decoded.rfind('/') {
        Some(pos) => &decoded[pos + 1..],
        None => &decoded[..],
    };
    Some(name.to_string())
}


/// Walks the dialectical tree held by a [`TaxonomyIndex`] (semantic numbers)
/// and a [`GraphStore`] (definitional edges).
pub struct HierarchyNavigator<'a, G: GraphStore> {
    index: &'a TaxonomyIndex,
    graph: &'a G,
    root: String,
    wildcard: String,
    max_walk_depth: usize,
    parent_cache: Option<Mutex<LruCache<String, ParentLookup>>>,
}

impl<'a, G: GraphStore> HierarchyNavigator<'a, G> {
    pub fn new(index: &'a TaxonomyIndex, graph: &'a G) -> Self {
        Self::with_config(index, graph, &DTopologyConfig::default())
    }

    pub fn with_config(index: &'a TaxonomyIndex, graph: &'a G, config: &DTopologyConfig) -> Self {
        let parent_cache = NonZeroUsize::new(config.parent_cache_size)
            .map(|size| Mutex::new(LruCache::new(size)));

        Self {
            index,
            graph,
            root: config.root_concept.clone(),
            wildcard: config.wildcard.clone(),
            max_walk_depth: config.max_walk_depth,
            parent_cache,
        }
    }

    pub fn index(&self) -> &'a TaxonomyIndex {
        self.index
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn wildcard(&self) -> &str {
        &self.wildcard
    }

    pub fn is_wildcard(&self, value: &str) -> bool {
        value == self.wildcard
    }

    pub fn definitional_parent(&self, name: &str) -> Result<ParentLookup, HierarchyError> {
        if name == self.root {
            return Ok(ParentLookup::IsRoot);
        }
        if name.is_empty() {
            return Ok(ParentLookup::Missing);
        }

        if let Some(cache) = &self.parent_cache {
            if let Some(hit) = cache.lock().get(name) {
                debug!("Parent cache hit for {}", name);
                return Ok(hit.clone());
            }
        }

        let sources = self.graph.sources_into(name)?;
        let lookup = match sources.as_slice() {
            [] => ParentLookup::Missing,
            [source] => match display_name(source) {
                Some(parent) => ParentLookup::Found(parent),
                None => {
                    warn!("Undecodable parent label {:?} for {}", source, name);
                    ParentLookup::Missing
                }
            },
            _ => ParentLookup::Ambiguous(sources.iter().filter_map(|s| display_name(s)).collect()),
        };

        if lookup.is_malformed() {
            warn!("Concept {} has no single definitional parent: {:?}", name, lookup);
        }

        if let Some(cache) = &self.parent_cache {
            cache.lock().put(name.to_string(), lookup.clone());
        }
        Ok(lookup)
    }

    /// True iff `d` is `a` or lies below it.
    ///
    /// A malformed chain (missing or ambiguous parent) ends the walk with
    /// `false`; only a walk longer than `max_walk_depth` is an error.
    pub fn is_descendant(&self, d: &str, a: &str) -> Result<bool, HierarchyError> {
        if d.is_empty() || a.is_empty() {
            return Ok(false);
        }

        let sn_a = self.index.sn(a);
        let mut current = d.to_string();

        for _ in 0..=self.max_walk_depth {
            if current == a {
                return Ok(true);
            }

            // An ancestor's sn is always below its descendants'.
            match (sn_a, self.index.sn(&current)) {
                (Some(sa), Some(sd)) if sa > sd => return Ok(false),
                (Some(_), None) => return Ok(false),
                _ => {}
            }

            match self.definitional_parent(&current)? {
                ParentLookup::Found(parent) => current = parent,
                other => {
                    debug!("Descendant walk from {} stopped at {}: {:?}", d, current, other);
                    return Ok(false);
                }
            }
        }

        Err(HierarchyError::DepthExceeded(self.max_walk_depth))
    }

    /// Climbs from whichever operand has the larger sn until both meet.
    pub fn nearest_common_ancestor(&self, a: &str, b: &str) -> Result<String, HierarchyError> {
        for operand in [a, b] {
            if operand.is_empty() || self.is_wildcard(operand) {
                return Err(HierarchyError::Incomparable(operand.to_string()));
            }
        }

        let mut a = a.to_string();
        let mut b = b.to_string();
        let limit = self.max_walk_depth.saturating_mul(2);

        for _ in 0..=limit {
            if a == b {
                return Ok(a);
            }

            let sn_a = self.require_sn(&a)?;
            let sn_b = self.require_sn(&b)?;
            if sn_a == 1 && sn_b == 1 {
                return Ok(a);
            }

            if sn_a > sn_b {
                a = self.step_up(&a, &b)?;
            } else {
                b = self.step_up(&b, &a)?;
            }
        }

        Err(HierarchyError::DepthExceeded(limit))
    }

    /// Checks every indexed concept for a single, indexed parent with a
    /// smaller semantic number.
    pub fn audit_definitions(&self) -> Result<Vec<DefinitionIssue>, HierarchyError> {
        let mut issues = Vec::new();

        for concept in self.index.iter() {
            let name = concept.name.clone();
            match self.definitional_parent(&concept.name)? {
                ParentLookup::IsRoot => {}
                ParentLookup::Missing => issues.push(DefinitionIssue::MissingParent { concept: name }),
                ParentLookup::Ambiguous(sources) => {
                    issues.push(DefinitionIssue::AmbiguousParent { concept: name, sources })
                }
                ParentLookup::Found(parent) => match self.index.sn(&parent) {
                    None => issues.push(DefinitionIssue::ParentNotIndexed { concept: name, parent }),
                    Some(sn) if sn >= concept.sn => {
                        issues.push(DefinitionIssue::SnNotIncreasing { concept: name, parent })
                    }
                    Some(_) => {}
                },
            }
        }

        debug!("Definition audit found {} issues", issues.len());
        Ok(issues)
    }

    fn require_sn(&self, name: &str) -> Result<u64, HierarchyError> {
        self.index
            .sn(name)
            .ok_or_else(|| HierarchyError::UnknownConcept(name.to_string()))
    }

    fn step_up(&self, name: &str, other: &str) -> Result<String, HierarchyError> {
        match self.definitional_parent(name)? {
            ParentLookup::Found(parent) => Ok(parent),
            ParentLookup::IsRoot => Err(HierarchyError::Disjoint(name.to_string(), other.to_string())),
            ParentLookup::Missing => Err(HierarchyError::MissingParent(name.to_string())),
            ParentLookup::Ambiguous(sources) => Err(HierarchyError::AmbiguousParent {
                concept: name.to_string(),
                sources,
            }),
        }
    }
}
