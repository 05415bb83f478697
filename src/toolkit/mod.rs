pub mod taxonomy;

pub use taxonomy::{DialecticTree, HierarchyNavigator, Ranker, TaxonomyIndex};
