use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::models::{Concept, TaxonomyStats};

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Concept already exists: {0}")]
    DuplicateConcept(String),
    #[error("Malformed record at line {line}: {record:?}")]
    MalformedRecord { line: usize, record: String },
    #[error("Opposite {opposite:?} of concept {concept:?} is not in the index")]
    UnresolvedOpposite { concept: String, opposite: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}


/// Concept dictionary: name -> (opposite, semantic number), kept in
/// insertion order so that a save after a load reproduces the source file.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyIndex {
    concepts: Vec<Concept>,
    positions: HashMap<String, usize>,
}

impl TaxonomyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the index with the tab-separated `name, opposite, sn` records
    /// read from `reader`.
    ///
    /// Loading stops at the first duplicate name or malformed record; an empty
    /// line is malformed. Records read before that point stay in the index,
    /// so after an error the index must be treated as invalid and reloaded
    /// by the caller.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<(), TaxonomyError> {
        self.clear();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let concept = parse_record(&line).ok_or_else(|| TaxonomyError::MalformedRecord {
                line: index + 1,
                record: line.clone(),
            })?;

            if let Err(err) = self.insert(concept) {
                warn!("Dictionary load aborted at line {}: {}", index + 1, err);
                return Err(err);
            }
        }

        info!("Loaded {} concepts", self.concepts.len());
        Ok(())
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), TaxonomyError> {
        let path = path.as_ref();
        debug!("Loading concept dictionary {}", path.display());
        let file = File::open(path)?;
        self.load(BufReader::new(file))
    }

    pub fn save<W: Write>(&self, mut writer: W) -> Result<(), TaxonomyError> {
        for concept in &self.concepts {
            writeln!(writer, "{}\t{}\t{}", concept.name, concept.opposite, concept.sn)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), TaxonomyError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.save(BufWriter::new(file))?;
        info!("Saved {} concepts to {}", self.concepts.len(), path.display());
        Ok(())
    }

    pub fn insert(&mut self, concept: Concept) -> Result<(), TaxonomyError> {
        if self.positions.contains_key(&concept.name) {
            return Err(TaxonomyError::DuplicateConcept(concept.name));
        }
        self.positions.insert(concept.name.clone(), self.concepts.len());
        self.concepts.push(concept);
        Ok(())
    }

    /// Fails with the first concept whose declared opposite is not indexed.
    pub fn validate_opposites_closed(&self) -> Result<(), TaxonomyError> {
        match self.concepts.iter().find(|c| !self.contains(&c.opposite)) {
            Some(concept) => Err(TaxonomyError::UnresolvedOpposite {
                concept: concept.name.clone(),
                opposite: concept.opposite.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Concept> {
        self.positions.get(name).map(|&i| &self.concepts[i])
    }

    pub fn opposite(&self, name: &str) -> Option<&str> {
        self.get(name).map(|c| c.opposite.as_str())
    }

    pub fn sn(&self, name: &str) -> Option<u64> {
        self.get(name).map(|c| c.sn)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn clear(&mut self) {
        self.concepts.clear();
        self.positions.clear();
    }

    pub fn stats(&self) -> TaxonomyStats {
        TaxonomyStats {
            total_concepts: self.concepts.len(),
            max_sn: self.concepts.iter().map(|c| c.sn).max().unwrap_or(0),
            roots: self.concepts.iter().filter(|c| c.sn == 1).count(),
        }
    }
}

fn parse_record(line: &str) -> Option<Concept> {
    let mut fields = line.split('\t');
    let name = fields.next().filter(|s| !s.is_empty())?;
    let opposite = fields.next()?;
    let sn = fields.next()?.parse::<u64>().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(Concept::new(name, opposite, sn))
}
