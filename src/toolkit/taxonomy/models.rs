use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::info;


/// Ordered facet values; the wildcard marks a non-discriminating facet.
pub type AttributeVector = Vec<String>;


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Concept {
    pub name: String,
    pub opposite: String,
    pub sn: u64,
}

impl Concept {
    pub fn new(name: impl Into<String>, opposite: impl Into<String>, sn: u64) -> Self {
        Self {
            name: name.into(),
            opposite: opposite.into(),
            sn,
        }
    }
}


/// Which of two candidates lies nearer to a reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, IntoStaticStr, PartialEq, Eq, Hash)]
pub enum Verdict {
    #[strum(serialize = "CLOSER_A")]
    CloserA,
    #[strum(serialize = "CLOSER_B")]
    CloserB,
    #[strum(serialize = "TIE")]
    Tie,
}


/// Outcome of resolving a concept's definitional parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLookup {
    Found(String),
    IsRoot,
    /// No edge targets the concept.
    Missing,
    /// More than one edge targets the concept; holds the normalized sources.
    Ambiguous(Vec<String>),
}

impl ParentLookup {
    pub fn parent(&self) -> Option<&str> {
        match self {
            Self::Found(parent) => Some(parent),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Missing | Self::Ambiguous(_))
    }
}


/// Anything the ranker can read an attribute vector from.
pub trait Facets {
    fn facets(&self) -> &[String];
}

impl Facets for Vec<String> {
    fn facets(&self) -> &[String] {
        self
    }
}

impl Facets for [String] {
    fn facets(&self) -> &[String] {
        self
    }
}

impl<T: Facets + ?Sized> Facets for &T {
    fn facets(&self) -> &[String] {
        (**self).facets()
    }
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub label: String,
    pub facets: AttributeVector,
}

impl CatalogueEntry {
    pub fn new(label: impl Into<String>, facets: AttributeVector) -> Self {
        Self {
            label: label.into(),
            facets,
        }
    }
}

impl Facets for CatalogueEntry {
    fn facets(&self) -> &[String] {
        &self.facets
    }
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalogue {
    pub entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let file = File::open(path.as_ref())?;
        let catalogue = Self::from_reader(BufReader::new(file))?;
        info!("Loaded catalogue of {} entries from {}", catalogue.len(), path.as_ref().display());
        Ok(catalogue)
    }

    /// Arity shared by every entry, or `None` if the entries disagree.
    pub fn arity(&self) -> Option<usize> {
        let first = self.entries.first()?.facets.len();
        self.entries
            .iter()
            .all(|entry| entry.facets.len() == first)
            .then_some(first)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyStats {
    pub total_concepts: usize,
    pub max_sn: u64,
    pub roots: usize,
}
