use thiserror::Error;
use tracing::debug;

use super::hierarchy::{HierarchyError, HierarchyNavigator};
use super::models::Verdict;
use crate::db::GraphStore;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Concept is empty or the wildcard: {0:?}")]
    Incomparable(String),
    #[error("Vector lengths differ: a={a}, b={b}, reference={reference}")]
    LengthMismatch { a: usize, b: usize, reference: usize },
    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),
}


/// Judges which of two attribute vectors lies nearer to a reference vector.
pub trait VectorJudge {
    fn nearest_vector(&self, a: &[String], b: &[String], reference: &[String]) -> Result<Verdict, CompareError>;
}


/// Nearer of two concepts: the one whose common ancestor with the reference
/// sits deeper in the tree.
pub struct ConceptComparator<'a, G: GraphStore> {
    navigator: HierarchyNavigator<'a, G>,
}

impl<'a, G: GraphStore> ConceptComparator<'a, G> {
    pub fn new(navigator: HierarchyNavigator<'a, G>) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &HierarchyNavigator<'a, G> {
        &self.navigator
    }

    pub fn nearest_of(&self, a: &str, b: &str, reference: &str) -> Result<Verdict, CompareError> {
        for concept in [a, b, reference] {
            if concept.is_empty() || self.navigator.is_wildcard(concept) {
                return Err(CompareError::Incomparable(concept.to_string()));
            }
        }

        let ancestor_a = self.navigator.nearest_common_ancestor(a, reference)?;
        let ancestor_b = self.navigator.nearest_common_ancestor(b, reference)?;
        if ancestor_a == ancestor_b {
            return Ok(Verdict::Tie);
        }

        // Distinct ancestors of one reference lie on one path, so their sn differ.
        let sn_a = self.ancestor_sn(&ancestor_a)?;
        let sn_b = self.ancestor_sn(&ancestor_b)?;
        if sn_a > sn_b {
            Ok(Verdict::CloserA)
        } else {
            Ok(Verdict::CloserB)
        }
    }

    fn ancestor_sn(&self, name: &str) -> Result<u64, CompareError> {
        self.navigator
            .index()
            .sn(name)
            .ok_or_else(|| HierarchyError::UnknownConcept(name.to_string()).into())
    }
}


/// Lexicographic lifting of [`ConceptComparator`]: the most significant
/// facet that decides wins; wildcard positions are skipped.
pub struct VectorComparator<'a, G: GraphStore> {
    concepts: ConceptComparator<'a, G>,
}

impl<'a, G: GraphStore> VectorComparator<'a, G> {
    pub fn new(concepts: ConceptComparator<'a, G>) -> Self {
        Self { concepts }
    }

    pub fn from_navigator(navigator: HierarchyNavigator<'a, G>) -> Self {
        Self::new(ConceptComparator::new(navigator))
    }

    pub fn concepts(&self) -> &ConceptComparator<'a, G> {
        &self.concepts
    }

    pub fn nearest_vector(&self, a: &[String], b: &[String], reference: &[String]) -> Result<Verdict, CompareError> {
        if a.len() != reference.len() || b.len() != reference.len() {
            return Err(CompareError::LengthMismatch {
                a: a.len(),
                b: b.len(),
                reference: reference.len(),
            });
        }

        let navigator = self.concepts.navigator();
        for (position, ((x, y), r)) in a.iter().zip(b).zip(reference).enumerate() {
            if [x, y, r].iter().any(|v| navigator.is_wildcard(v)) {
                continue;
            }
            match self.concepts.nearest_of(x, y, r)? {
                Verdict::Tie => continue,
                verdict => {
                    debug!("Facet {} decides: {}", position, verdict);
                    return Ok(verdict);
                }
            }
        }

        Ok(Verdict::Tie)
    }
}

impl<G: GraphStore> VectorJudge for VectorComparator<'_, G> {
    fn nearest_vector(&self, a: &[String], b: &[String], reference: &[String]) -> Result<Verdict, CompareError> {
        VectorComparator::nearest_vector(self, a, b, reference)
    }
}
