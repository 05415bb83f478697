//! Reference dialectical tree shared by the taxonomy tests.
//!
//! `одно` is the root; `бытие`/`ничто` sit below it, `становление` and
//! `иное_становлению` below `бытие`, and a mechanical-parts branch (ЕСКД
//! classifier groups, technologies, contours, holes) hangs off
//! `иное_становлению`. Semantic numbers equal the depth.

use std::path::PathBuf;

use crate::db::MemoryGraph;
use crate::toolkit::taxonomy::{AttributeVector, Catalogue, TaxonomyIndex};
use crate::DEFAULT_BASE_IRI;

pub const DICTIONARY: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/dtree_dictionary.txt"));
pub const DICTIONARY_DUPLICATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/dtree_dictionary_duplicate.txt"));
pub const DICTIONARY_OPPOSITE_ABSENT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/dtree_dictionary_opposite_absent.txt"
));
pub const EDGES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/dtree_edges.txt"));
pub const CATALOGUE_7411: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalogue_7411.json"));
pub const CATALOGUE_7413: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalogue_7413.json"));

pub fn dictionary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/dtree_dictionary.txt")
}

pub fn reference_index() -> TaxonomyIndex {
    let mut index = TaxonomyIndex::new();
    index.load(DICTIONARY.as_bytes()).unwrap();
    index
}

pub fn reference_graph() -> MemoryGraph {
    MemoryGraph::from_reader(DEFAULT_BASE_IRI, EDGES.as_bytes()).unwrap()
}

pub fn catalogue_7411() -> Catalogue {
    Catalogue::from_reader(CATALOGUE_7411.as_bytes()).unwrap()
}

/// Milled rectangular part (l up to 3B) with unthreaded round holes.
pub fn request_7411() -> AttributeVector {
    vector(&[
        "группа_7411_ОК_ЕСКД",
        "фрезерование",
        "четырехугольник",
        "прямой_угол",
        "l_до_3в_включ",
        "с_отверстиями_круглыми",
        "без_резьбы",
    ])
}

pub fn catalogue_7413() -> Catalogue {
    Catalogue::from_reader(CATALOGUE_7413.as_bytes()).unwrap()
}

/// Milled combined-convex part (l up to 3B) with threaded mixed holes.
pub fn request_7413() -> AttributeVector {
    vector(&[
        "группа_7413_ОК_ЕСКД",
        "фрезерование",
        "комбинированная_выпуклая",
        "nil",
        "l_до_3в_включ",
        "с_отверстиями_круглыми_и_некруглыми",
        "резьба",
    ])
}

pub fn vector(items: &[&str]) -> AttributeVector {
    items.iter().map(|s| s.to_string()).collect()
}
