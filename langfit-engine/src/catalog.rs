//! Language catalog
//!
//! Ordered, read-only collection of `LanguageRecord`s. Catalog order is
//! significant: candidate sets preserve it and the resolver breaks score ties
//! by it. The built-in catalog is embedded at build time; an alternative TOML
//! file with the same shape can be loaded at startup.

use crate::personality::PersonalityType;
use langfit_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

/// Primary application domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Web,
    Mobile,
    DataScience,
    Systems,
    Scripting,
    Enterprise,
    Scientific,
    Education,
    Hardware,
    Blockchain,
    Database,
    Graphics,
    Academic,
    Distributed,
}

/// How much the language is chosen for raw speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Critical,
    Important,
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningCurve {
    Gentle,
    Moderate,
    Steep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paradigm {
    Imperative,
    ObjectOriented,
    Functional,
    MultiParadigm,
    Logic,
    Array,
    Concatenative,
    Declarative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Typing {
    Static,
    Dynamic,
    Gradual,
}

/// Maturity of the surrounding ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    Mature,
    Modern,
    Niche,
    Legacy,
}

/// Niche tags that pull a dedicated differentiator question into the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Niche {
    Hardware,
    LegacyPlatform,
    FormalMethods,
}

/// Immutable catalog entry
///
/// Traits are used only for filtering candidates into question answers; they
/// never contribute to scores directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRecord {
    /// Globally unique, immutable identifier
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    /// Narrative blurb addressed to the user
    #[serde(default)]
    pub personality: String,
    /// Personality types this language suits; the first is primary
    #[serde(default)]
    pub affinities: Vec<PersonalityType>,
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub performance: Option<PerformanceTier>,
    #[serde(default)]
    pub learning_curve: Option<LearningCurve>,
    #[serde(default)]
    pub paradigm: Option<Paradigm>,
    #[serde(default)]
    pub typing: Option<Typing>,
    #[serde(default)]
    pub ecosystem: Option<Ecosystem>,
    #[serde(default)]
    pub niches: Vec<Niche>,
}

impl LanguageRecord {
    /// Whether the language lists `personality` among its affinities
    pub fn suits(&self, personality: PersonalityType) -> bool {
        self.affinities.contains(&personality)
    }

    pub fn primary_affinity(&self) -> Option<PersonalityType> {
        self.affinities.first().copied()
    }

    pub fn has_niche(&self, niche: Niche) -> bool {
        self.niches.contains(&niche)
    }

    /// Stand-in record for an id the catalog does not know
    ///
    /// Used when a resolved or shared id has no catalog entry, so callers
    /// always receive a displayable result.
    pub fn placeholder(id: &str, personality: PersonalityType) -> Self {
        Self {
            id: id.to_string(),
            name: capitalize(id),
            description: format!("A {} language that matches your personality", personality),
            strengths: vec![
                "Matches your personality type".to_string(),
                "Suits your preferences".to_string(),
            ],
            use_cases: vec!["Your preferred domains".to_string()],
            personality: format!("Perfect for {} personality types", personality),
            affinities: vec![personality],
            domain: None,
            performance: None,
            learning_curve: None,
            paradigm: None,
            typing: None,
            ecosystem: None,
            niches: Vec::new(),
        }
    }
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default, rename = "language")]
    languages: Vec<LanguageRecord>,
}

/// Ordered, read-only set of language records
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<LanguageRecord>,
    positions: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from records in the given order
    ///
    /// # Errors
    /// Returns `Error::Catalog` on an empty or duplicate identifier, or a
    /// record without a display name.
    pub fn new(records: Vec<LanguageRecord>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(Error::Catalog(format!(
                    "record #{} has an empty identifier",
                    position + 1
                )));
            }
            if record.name.trim().is_empty() {
                return Err(Error::Catalog(format!("'{}' has no display name", record.id)));
            }
            if positions.insert(record.id.clone(), position).is_some() {
                return Err(Error::Catalog(format!("duplicate language id '{}'", record.id)));
            }
            if record.affinities.is_empty() {
                debug!(
                    "'{}' has no affinity and can only be reached by scoring",
                    record.id
                );
            }
        }
        Ok(Self { records, positions })
    }

    /// Parse a catalog document (`[[language]]` tables)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: CatalogDocument = toml::from_str(content)?;
        Self::new(document.languages)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn get(&self, id: &str) -> Option<&LanguageRecord> {
        self.positions.get(id).map(|&i| &self.records[i])
    }

    /// Zero-based catalog position of `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LanguageRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for `id`, or a placeholder when the id is unknown
    pub fn get_or_placeholder(
        &self,
        id: &str,
        personality: PersonalityType,
    ) -> (LanguageRecord, bool) {
        match self.get(id) {
            Some(record) => (record.clone(), false),
            None => (LanguageRecord::placeholder(id, personality), true),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a LanguageRecord;
    type IntoIter = std::slice::Iter<'a, LanguageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
