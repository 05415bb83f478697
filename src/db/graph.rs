use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::utils::is_skippable_line;


#[derive(Debug, Error)]
pub enum GraphStoreError {
    #[error("Invalid IRI {iri}: {source}")]
    InvalidIri {
        iri: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Malformed edge at line {line}: {content:?}")]
    MalformedEdge { line: usize, content: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}


/// Read side of the triple store that physically holds the hierarchy edges.
pub trait GraphStore {
    /// Raw (namespace-prefixed, percent-encoded) labels of every node with an
    /// edge whose target is `concept`.
    fn sources_into(&self, concept: &str) -> Result<Vec<String>, GraphStoreError>;
}


/// Edge list held in memory: target IRI -> source IRIs.
pub struct MemoryGraph {
    base: Url,
    incoming: HashMap<String, Vec<String>>,
    edge_count: usize,
}

impl MemoryGraph {
    pub fn new(base_iri: &str) -> Result<Self, GraphStoreError> {
        let base = Url::parse(base_iri).map_err(|source| GraphStoreError::InvalidIri {
            iri: base_iri.to_string(),
            source,
        })?;

        Ok(Self {
            base,
            incoming: HashMap::new(),
            edge_count: 0,
        })
    }

    /// Parses `subject<TAB>predicate<TAB>object` lines of bare concept names.
    /// Blank lines and `#` comments are ignored.
    pub fn from_reader<R: BufRead>(base_iri: &str, reader: R) -> Result<Self, GraphStoreError> {
        let mut graph = Self::new(base_iri)?;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if is_skippable_line(&line) {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            match fields.as_slice() {
                [subject, predicate, object]
                    if !subject.is_empty() && !predicate.is_empty() && !object.is_empty() =>
                {
                    graph.add_edge(subject, predicate, object)?;
                }
                _ => {
                    return Err(GraphStoreError::MalformedEdge {
                        line: index + 1,
                        content: line,
                    });
                }
            }
        }

        info!("Loaded graph with {} edges into {} nodes", graph.edge_count, graph.incoming.len());
        Ok(graph)
    }

    pub fn from_file(base_iri: &str, path: impl AsRef<Path>) -> Result<Self, GraphStoreError> {
        let path = path.as_ref();
        debug!("Opening graph edge list {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(base_iri, BufReader::new(file))
    }

    /// Mints the IRI of a bare concept name under the graph's base.
    pub fn iri_for(&self, name: &str) -> Result<String, GraphStoreError> {
        // "./" keeps names containing ':' from parsing as a scheme.
        self.base
            .join(&format!("./{}", name))
            .map(String::from)
            .map_err(|source| GraphStoreError::InvalidIri {
                iri: name.to_string(),
                source,
            })
    }

    pub fn add_edge(&mut self, subject: &str, predicate: &str, object: &str) -> Result<(), GraphStoreError> {
        let source = self.iri_for(subject)?;
        let target = self.iri_for(object)?;
        debug!("Edge {} -[{}]-> {}", subject, predicate, object);
        self.incoming.entry(target).or_default().push(source);
        self.edge_count += 1;
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }
}

impl GraphStore for MemoryGraph {
    fn sources_into(&self, concept: &str) -> Result<Vec<String>, GraphStoreError> {
        let iri = self.iri_for(concept)?;
        let sources = self
            .incoming
            .get(&iri)
            .cloned()
            .unwrap_or_default();
        Ok(sources)
    }
}
