//! Scoring and result resolution
//!
//! Every language of a chosen answer receives the weight of the question's
//! category. The winner is the top scorer; ties prefer a language whose
//! affinity contains the user's type, then catalog order. Resolution always
//! yields exactly one record.

use crate::catalog::{Catalog, LanguageRecord};
use crate::personality::PersonalityType;
use crate::synthesizer::AdaptiveQuestion;
use langfit_common::CategoryWeights;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Language id → accumulated score
pub type ScoreMap = BTreeMap<String, u32>;

/// Zero score for every candidate
pub fn seed_scores(candidates: &[String]) -> ScoreMap {
    candidates.iter().map(|id| (id.clone(), 0)).collect()
}

/// Add the weight of every answered question to the languages of its answer
///
/// Unknown question or answer ids contribute nothing. Scores only grow.
pub fn fold_answers(
    scores: &mut ScoreMap,
    questions: &[AdaptiveQuestion],
    answers: &BTreeMap<String, String>,
    weights: &CategoryWeights,
) {
    for question in questions {
        let Some(answer_id) = answers.get(&question.id) else {
            continue;
        };
        let Some(answer) = question.answer(answer_id) else {
            debug!("Ignoring unknown answer {} for {}", answer_id, question.id);
            continue;
        };
        let weight = question.category.weight(weights);
        for language in &answer.languages {
            *scores.entry(language.clone()).or_insert(0) += weight;
        }
    }
}

/// Why the resolver picked its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionReason {
    /// Single highest score
    TopScore,
    /// Tied top score; the language matching the type's affinity won
    AffinityTieBreak,
    /// Tied top score with no affinity match; first in catalog order won
    CatalogOrder,
    /// No positive score; first affinity match (or first candidate) won
    CandidateFallback,
    /// No candidates at all; the configured fallback language
    EmptyCandidateSet,
    /// Hydrated from a share token
    SharedResult,
}

impl ResolutionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionReason::TopScore => "top_score",
            ResolutionReason::AffinityTieBreak => "affinity_tie_break",
            ResolutionReason::CatalogOrder => "catalog_order",
            ResolutionReason::CandidateFallback => "candidate_fallback",
            ResolutionReason::EmptyCandidateSet => "empty_candidate_set",
            ResolutionReason::SharedResult => "shared_result",
        }
    }
}

/// Resolved result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub language: LanguageRecord,
    pub reason: ResolutionReason,
    /// The id had no catalog entry and `language` was synthesized
    pub placeholder: bool,
}

/// Picks the final language
pub struct ResultResolver<'a> {
    catalog: &'a Catalog,
    fallback_language: &'a str,
}

impl<'a> ResultResolver<'a> {
    pub fn new(catalog: &'a Catalog, fallback_language: &'a str) -> Self {
        Self {
            catalog,
            fallback_language,
        }
    }

    /// Resolve the winning language
    ///
    /// # Arguments
    /// * `scores` - Folded score map
    /// * `candidates` - Candidate set in selection order
    /// * `personality` - User's type, for affinity tie-breaks
    pub fn resolve(
        &self,
        scores: &ScoreMap,
        candidates: &[String],
        personality: PersonalityType,
    ) -> Resolution {
        let (id, reason) = self.pick(scores, candidates, personality);
        let (language, placeholder) = self.catalog.get_or_placeholder(&id, personality);
        if placeholder {
            warn!(
                "Resolved id '{}' is not in the catalog; using placeholder",
                id
            );
        }
        info!(
            "Resolved {} for {} ({})",
            language.name,
            personality,
            reason.as_str()
        );
        Resolution {
            language,
            reason,
            placeholder,
        }
    }

    fn pick(
        &self,
        scores: &ScoreMap,
        candidates: &[String],
        personality: PersonalityType,
    ) -> (String, ResolutionReason) {
        if candidates.is_empty() {
            error!(
                "Empty candidate set for {}; falling back to '{}'",
                personality, self.fallback_language
            );
            return (
                self.fallback_language.to_string(),
                ResolutionReason::EmptyCandidateSet,
            );
        }

        let best = scores.values().copied().max().unwrap_or(0);
        if best > 0 {
            let mut leaders: Vec<&String> = scores
                .iter()
                .filter(|(_, &score)| score == best)
                .map(|(id, _)| id)
                .collect();
            // Catalog order; unknown ids last, by id
            leaders.sort_by(|a, b| {
                let rank = |id: &str| self.catalog.position(id).unwrap_or(usize::MAX);
                rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
            });

            if leaders.len() == 1 {
                return (leaders[0].clone(), ResolutionReason::TopScore);
            }
            debug!("Tie at {} between {:?}", best, leaders);

            if let Some(id) = leaders.iter().find(|id| self.suits(id, personality)) {
                return ((*id).clone(), ResolutionReason::AffinityTieBreak);
            }
            return (leaders[0].clone(), ResolutionReason::CatalogOrder);
        }

        let id = candidates
            .iter()
            .find(|id| self.suits(id, personality))
            .unwrap_or(&candidates[0]);
        (id.clone(), ResolutionReason::CandidateFallback)
    }

    fn suits(&self, id: &str, personality: PersonalityType) -> bool {
        self.catalog
            .get(id)
            .is_some_and(|record| record.suits(personality))
    }
}
