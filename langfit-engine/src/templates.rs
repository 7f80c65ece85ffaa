//! Adaptive question template bank
//!
//! Templates are evaluated against a candidate set by the synthesizer. A
//! record matches a template answer when its id is listed explicitly or when
//! its traits satisfy every field of the answer's trait predicate.

use crate::catalog::{
    Domain, Ecosystem, LanguageRecord, LearningCurve, Niche, Paradigm, PerformanceTier, Typing,
};
use langfit_common::{CategoryWeights, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_TEMPLATES: &str = include_str!("../data/templates.toml");

/// Id reserved for the synthesized tie-break question
pub const TIE_BREAK_ID: &str = "tie_break";

/// Question category; selects the score weight of every answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Domain,
    Style,
    Performance,
    Ecosystem,
}

impl QuestionCategory {
    /// Points each language of a chosen answer receives
    pub fn weight(self, weights: &CategoryWeights) -> u32 {
        match self {
            QuestionCategory::Domain => weights.domain,
            QuestionCategory::Performance => weights.performance,
            QuestionCategory::Style => weights.style,
            QuestionCategory::Ecosystem => weights.ecosystem,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Domain => "domain",
            QuestionCategory::Style => "style",
            QuestionCategory::Performance => "performance",
            QuestionCategory::Ecosystem => "ecosystem",
        }
    }
}

/// Conjunction of trait requirements; unset fields are unconstrained
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraitPredicate {
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
    pub niche: Option<Niche>,
}

/// Required value present on the record (or no requirement)
fn satisfies<T: PartialEq>(required: Option<T>, actual: Option<T>) -> bool {
    match required {
        Some(value) => actual == Some(value),
        None => true,
    }
}

impl TraitPredicate {
    pub fn is_empty(&self) -> bool {
        *self == TraitPredicate::default()
    }

    /// An empty predicate matches nothing
    pub fn matches(&self, record: &LanguageRecord) -> bool {
        if self.is_empty() {
            return false;
        }
        satisfies(self.domain, record.domain)
            && satisfies(self.performance, record.performance)
            && satisfies(self.learning_curve, record.learning_curve)
            && satisfies(self.paradigm, record.paradigm)
            && satisfies(self.typing, record.typing)
            && satisfies(self.ecosystem, record.ecosystem)
            && self.niche.map_or(true, |niche| record.has_niche(niche))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateAnswer {
    pub id: String,
    pub prompt: String,
    /// Explicitly listed language ids (unknown ids are ignored)
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub traits: Option<TraitPredicate>,
}

impl TemplateAnswer {
    pub fn matches(&self, record: &LanguageRecord) -> bool {
        self.languages.iter().any(|id| *id == record.id)
            || self
                .traits
                .as_ref()
                .is_some_and(|traits| traits.matches(record))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionTemplate {
    pub id: String,
    pub prompt: String,
    pub category: QuestionCategory,
    #[serde(rename = "answer")]
    pub answers: Vec<TemplateAnswer>,
}

#[derive(Debug, Deserialize)]
struct TemplateDocument {
    #[serde(default, rename = "template")]
    templates: Vec<QuestionTemplate>,
}

/// Ordered bank of question templates
///
/// Bank order is the secondary ranking key: equal quality scores keep it.
#[derive(Debug, Clone)]
pub struct TemplateBank {
    templates: Vec<QuestionTemplate>,
}

impl TemplateBank {
    /// Validate and wrap templates
    ///
    /// # Errors
    /// Returns `Error::Catalog` when a template id is empty, duplicated or
    /// reserved, a template has fewer than two answers, answer ids repeat
    /// within a template, or an answer can never match anything.
    pub fn new(templates: Vec<QuestionTemplate>) -> Result<Self> {
        let mut template_ids = HashSet::new();
        for template in &templates {
            if template.id.trim().is_empty() {
                return Err(Error::Catalog("template with empty id".to_string()));
            }
            if template.id == TIE_BREAK_ID {
                return Err(Error::Catalog(format!("template id '{}' is reserved", TIE_BREAK_ID)));
            }
            if !template_ids.insert(template.id.as_str()) {
                return Err(Error::Catalog(format!("duplicate template id '{}'", template.id)));
            }
            if template.answers.len() < 2 {
                return Err(Error::Catalog(format!(
                    "template '{}' needs at least two answers",
                    template.id
                )));
            }

            let mut answer_ids = HashSet::new();
            for answer in &template.answers {
                if !answer_ids.insert(answer.id.as_str()) {
                    return Err(Error::Catalog(format!(
                        "template '{}' repeats answer id '{}'",
                        template.id, answer.id
                    )));
                }
                let has_traits = answer.traits.as_ref().is_some_and(|t| !t.is_empty());
                if answer.languages.is_empty() && !has_traits {
                    return Err(Error::Catalog(format!(
                        "answer '{}' of template '{}' lists no languages and no traits",
                        answer.id, template.id
                    )));
                }
            }
        }
        Ok(Self { templates })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: TemplateDocument = toml::from_str(content)?;
        Self::new(document.templates)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Template bank compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TEMPLATES)
    }

    pub fn get(&self, id: &str) -> Option<&QuestionTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
