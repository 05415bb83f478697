use thiserror::Error;
use tracing::{debug, info};

use super::comparator::{CompareError, VectorJudge};
use super::models::{Facets, Verdict};

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Catalogue is empty")]
    EmptyCatalogue,
    #[error("Selection size must be greater than 0")]
    ZeroSelection,
    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),
}


pub struct Ranker<J: VectorJudge> {
    judge: J,
}

impl<J: VectorJudge> Ranker<J> {
    pub fn new(judge: J) -> Self {
        Self { judge }
    }

    /// Single left-to-right reduction. A later vector replaces the running
    /// best only when strictly closer, so ties keep the earlier one.
    pub fn nearest_in_set<T: Facets>(&self, vectors: &[T], reference: &[String]) -> Result<usize, RankError> {
        if vectors.is_empty() {
            return Err(RankError::EmptyCatalogue);
        }

        let mut nearest = 0;
        for (i, candidate) in vectors.iter().enumerate().skip(1) {
            let verdict = self
                .judge
                .nearest_vector(vectors[nearest].facets(), candidate.facets(), reference)?;
            if verdict == Verdict::CloserB {
                nearest = i;
            }
        }
        Ok(nearest)
    }

    /// Nearest-first ordering by repeated selection; O(n²) comparisons.
    pub fn sort_by_distance<'c, T: Facets>(
        &self,
        vectors: &'c [T],
        reference: &[String],
    ) -> Result<Vec<&'c T>, RankError> {
        if vectors.is_empty() {
            return Err(RankError::EmptyCatalogue);
        }

        let mut pool: Vec<&'c T> = vectors.iter().collect();
        let mut sorted = Vec::with_capacity(pool.len());
        while !pool.is_empty() {
            let nearest = self.nearest_in_set(&pool, reference)?;
            sorted.push(pool.remove(nearest));
        }
        Ok(sorted)
    }

    /// Online selection of the `n` candidates nearest to `reference`.
    ///
    /// Each candidate is compared with the current worst of the shortlist
    /// only. Closer or tied candidates are inserted, the shortlist re-sorted
    /// and cut back to `n`; a candidate whose comparison fails is skipped.
    /// This is approximate: a candidate losing to the current worst is
    /// dropped even while the shortlist still has room, and with a
    /// non-transitive comparator it may beat an interior member unseen.
    pub fn top_n<'c, T: Facets>(
        &self,
        candidates: &'c [T],
        reference: &[String],
        n: usize,
    ) -> Result<Vec<&'c T>, RankError> {
        if candidates.is_empty() {
            return Err(RankError::EmptyCatalogue);
        }
        if n == 0 {
            return Err(RankError::ZeroSelection);
        }

        let mut selection: Vec<&'c T> = vec![&candidates[0]];

        for (i, candidate) in candidates.iter().enumerate().skip(1) {
            let worst = selection[selection.len() - 1];
            match self.judge.nearest_vector(candidate.facets(), worst.facets(), reference) {
                Err(err) => {
                    debug!("Skipping candidate {}: {}", i, err);
                }
                Ok(Verdict::CloserB) => {}
                Ok(_) => {
                    selection.push(candidate);
                    selection = self
                        .sort_by_distance(&selection, reference)?
                        .into_iter()
                        .copied()
                        .collect();
                    selection.truncate(n);
                }
            }
        }

        info!("Selected {} of {} candidates", selection.len(), candidates.len());
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryGraph;
    use crate::toolkit::taxonomy::comparator::VectorComparator;
    use crate::toolkit::taxonomy::fixtures::{
        catalogue_7411, catalogue_7413, reference_graph, reference_index, request_7411, request_7413,
        vector,
    };
    use crate::toolkit::taxonomy::hierarchy::HierarchyNavigator;
    use crate::toolkit::taxonomy::models::{AttributeVector, CatalogueEntry};
    use crate::toolkit::taxonomy::TaxonomyIndex;

    /// Single-facet vectors holding a score; higher is nearer. "broken"
    /// makes the comparison fail.
    struct ScoreJudge;

    impl VectorJudge for ScoreJudge {
        fn nearest_vector(&self, a: &[String], b: &[String], _reference: &[String]) -> Result<Verdict, CompareError> {
            let score = |v: &[String]| {
                v[0].parse::<i32>()
                    .map_err(|_| CompareError::Incomparable(v[0].clone()))
            };
            let (a, b) = (score(a)?, score(b)?);
            Ok(match a.cmp(&b) {
                std::cmp::Ordering::Greater => Verdict::CloserA,
                std::cmp::Ordering::Less => Verdict::CloserB,
                std::cmp::Ordering::Equal => Verdict::Tie,
            })
        }
    }

    fn scores(items: &[&str]) -> Vec<AttributeVector> {
        items.iter().map(|s| vector(&[*s])).collect()
    }

    fn firsts(selected: &[&AttributeVector]) -> Vec<String> {
        selected.iter().map(|v| v[0].clone()).collect()
    }

    fn ranker<'a>(index: &'a TaxonomyIndex, graph: &'a MemoryGraph) -> Ranker<VectorComparator<'a, MemoryGraph>> {
        Ranker::new(VectorComparator::from_navigator(HierarchyNavigator::new(index, graph)))
    }

    fn labels(selected: &[&CatalogueEntry]) -> Vec<String> {
        selected.iter().map(|e| e.label.clone()).collect()
    }

    fn dialectic_set() -> (Vec<AttributeVector>, AttributeVector) {
        let arr = vec![
            vector(&["одно", "иное_становлению", "бытие"]),
            vector(&["бытие", "ничто", "становление"]),
            vector(&["становление", "бытие", "возникновение"]),
        ];
        let reference = vector(&["ничто", "иное_становлению", "бытие"]);
        (arr, reference)
    }

    #[test]
    fn test_nearest_in_set() {
        let index = reference_index();
        let graph = reference_graph();
        let ranker = ranker(&index, &graph);
        let (arr, reference) = dialectic_set();

        assert_eq!(ranker.nearest_in_set(&arr, &reference).unwrap(), 0);
        assert_eq!(ranker.nearest_in_set(&arr[1..], &reference).unwrap(), 1);
    }

    #[test]
    fn test_sort_by_distance() {
        let index = reference_index();
        let graph = reference_graph();
        let ranker = ranker(&index, &graph);
        let (arr, reference) = dialectic_set();

        let sorted = ranker.sort_by_distance(&arr, &reference).unwrap();
        assert_eq!(sorted, vec![&arr[0], &arr[2], &arr[1]]);
    }

    #[test]
    fn test_top_n_catalogue_7411() {
        let index = reference_index();
        let graph = reference_graph();
        let ranker = ranker(&index, &graph);
        let catalogue = catalogue_7411();
        assert_eq!(catalogue.len(), 10);

        let selected = ranker.top_n(&catalogue.entries, &request_7411(), 3).unwrap();
        assert_eq!(
            labels(&selected),
            vec![
                "741124 фрезерование без резьбы",
                "741124 штамповка без резьбы",
                "741124 резьба",
            ]
        );
    }

    #[test]
    fn test_top_n_catalogue_7413() {
        let index = reference_index();
        let graph = reference_graph();
        let ranker = ranker(&index, &graph);
        let catalogue = catalogue_7413();
        let request = request_7413();

        let selected = ranker.top_n(&catalogue.entries, &request, 3).unwrap();
        assert_eq!(labels(&selected), vec!["741344 резьба", "741314 фрезерование", "741331"]);

        // Technology decides first, then the contour; the order is total here.
        let sorted = ranker.sort_by_distance(&catalogue.entries, &request).unwrap();
        assert_eq!(
            labels(&sorted),
            vec!["741344 резьба", "741314 фрезерование", "741331", "741311 штамповка"]
        );
    }

    #[test]
    fn test_top_one_catalogue_7411() {
        let index = reference_index();
        let graph = reference_graph();
        let ranker = ranker(&index, &graph);
        let catalogue = catalogue_7411();

        let selected = ranker.top_n(&catalogue.entries, &request_7411(), 1).unwrap();
        assert_eq!(labels(&selected), vec!["741124 фрезерование без резьбы"]);
    }

    #[test]
    fn test_top_n_misses_candidates_behind_the_worst() {
        let index = reference_index();
        let graph = reference_graph();
        let ranker = ranker(&index, &graph);
        let catalogue = catalogue_7411();
        // Exact match first, then two weaker parts.
        let entries = vec![
            catalogue.entries[9].clone(),
            catalogue.entries[0].clone(),
            catalogue.entries[1].clone(),
        ];
        let request = request_7411();

        // Both followers lose to the shortlist's only (and worst) member, so
        // they are dropped although there is room for three.
        let selected = ranker.top_n(&entries, &request, 3).unwrap();
        assert_eq!(labels(&selected), vec!["741124 фрезерование без резьбы"]);

        let sorted = ranker.sort_by_distance(&entries, &request).unwrap();
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn test_input_contract_errors() {
        let ranker = Ranker::new(ScoreJudge);
        let empty: Vec<AttributeVector> = Vec::new();
        let reference = vector(&["0"]);

        assert!(matches!(ranker.nearest_in_set(&empty, &reference), Err(RankError::EmptyCatalogue)));
        assert!(matches!(ranker.sort_by_distance(&empty, &reference), Err(RankError::EmptyCatalogue)));
        assert!(matches!(ranker.top_n(&empty, &reference, 3), Err(RankError::EmptyCatalogue)));
        assert!(matches!(
            ranker.top_n(&scores(&["1", "2"]), &reference, 0),
            Err(RankError::ZeroSelection)
        ));
    }

    #[test]
    fn test_ties_keep_earlier() {
        let ranker = Ranker::new(ScoreJudge);
        let items = scores(&["5", "5", "7", "7"]);
        let reference = vector(&["0"]);

        assert_eq!(ranker.nearest_in_set(&items, &reference).unwrap(), 2);
        let sorted = ranker.sort_by_distance(&items, &reference).unwrap();
        assert!(std::ptr::eq(sorted[0], &items[2]));
        assert!(std::ptr::eq(sorted[1], &items[3]));
        assert!(std::ptr::eq(sorted[2], &items[0]));
        assert!(std::ptr::eq(sorted[3], &items[1]));
    }

    #[test]
    fn test_top_n_with_consistent_order() {
        let ranker = Ranker::new(ScoreJudge);
        let items = scores(&["1", "4", "2", "9", "3", "8"]);
        let reference = vector(&["0"]);

        let selected = ranker.top_n(&items, &reference, 3).unwrap();
        assert_eq!(firsts(&selected), vec!["9", "8", "4"]);
    }

    #[test]
    fn test_top_n_larger_than_catalogue() {
        let ranker = Ranker::new(ScoreJudge);
        let items = scores(&["1", "2", "3"]);
        let reference = vector(&["0"]);

        let selected = ranker.top_n(&items, &reference, 10).unwrap();
        assert_eq!(firsts(&selected), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_top_n_skips_failed_comparisons() {
        let ranker = Ranker::new(ScoreJudge);
        let items = scores(&["1", "broken", "5"]);
        let reference = vector(&["0"]);

        let selected = ranker.top_n(&items, &reference, 3).unwrap();
        assert_eq!(firsts(&selected), vec!["5", "1"]);

        // The full sort has no such leniency.
        assert!(matches!(ranker.sort_by_distance(&items, &reference), Err(RankError::Compare(_))));
        assert!(matches!(ranker.nearest_in_set(&items, &reference), Err(RankError::Compare(_))));
    }
}
