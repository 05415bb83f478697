pub mod graph;

pub use graph::{GraphStore, GraphStoreError, MemoryGraph};
