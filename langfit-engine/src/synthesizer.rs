//! Adaptive question synthesizer and ranker
//!
//! Builds the type-specific second questionnaire from the template bank:
//!
//! 1. Evaluate every template against the candidate set (answers keep only
//!    candidates, in candidate order; empty answers are dropped)
//! 2. Keep questions with at least two answers
//! 3. Drop questions covering less than `min_coverage` of the candidates
//! 4. Rank by quality score; template order breaks ties
//! 5. Keep up to `question_cap` questions scoring at least `min_quality`,
//!    topping up to `question_floor` from the best of the rest
//! 6. Append niche differentiators when a candidate carries the niche
//! 7. Elastic pass: large sets get extra short questions, small sets get a
//!    bespoke tie-break question
//!
//! The result is deterministic for a given candidate set.

use crate::catalog::{Catalog, Ecosystem, LanguageRecord, LearningCurve, Niche, PerformanceTier};
use crate::personality::PersonalityType;
use crate::quality;
use crate::templates::{QuestionCategory, QuestionTemplate, TemplateBank, TIE_BREAK_ID};
use langfit_common::EngineConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Niche → differentiator template, checked in this order
const FORCED_DIFFERENTIATORS: [(Niche, &str); 3] = [
    (Niche::Hardware, "hardware_description"),
    (Niche::LegacyPlatform, "legacy_platform"),
    (Niche::FormalMethods, "formal_methods"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveAnswer {
    pub id: String,
    pub prompt: String,
    /// Candidate ids this answer awards points to, never empty
    pub languages: Vec<String>,
}

/// A materialized question: at least two answers, all drawn from the candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveQuestion {
    pub id: String,
    pub prompt: String,
    pub category: QuestionCategory,
    pub answers: Vec<AdaptiveAnswer>,
    /// Ranking score at synthesis time
    pub quality: f64,
}

impl AdaptiveQuestion {
    pub fn answer(&self, answer_id: &str) -> Option<&AdaptiveAnswer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }

    /// Whether any answer awards points to `language_id`
    pub fn mentions(&self, language_id: &str) -> bool {
        self.answers
            .iter()
            .any(|a| a.languages.iter().any(|l| l == language_id))
    }
}

/// A valid question together with its coverage of the candidate set
#[derive(Debug, Clone)]
struct Evaluated {
    question: AdaptiveQuestion,
    coverage: f64,
}

/// Adaptive question synthesizer
pub struct QuestionSynthesizer<'a> {
    catalog: &'a Catalog,
    templates: &'a TemplateBank,
    config: &'a EngineConfig,
}

impl<'a> QuestionSynthesizer<'a> {
    pub fn new(
        catalog: &'a Catalog,
        templates: &'a TemplateBank,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            catalog,
            templates,
            config,
        }
    }

    /// Generate the ranked adaptive questions for a candidate set
    ///
    /// # Arguments
    /// * `candidates` - Candidate ids from the selector
    /// * `personality` - Resolved type (diagnostics only)
    ///
    /// # Returns
    /// Between 0 and `question_cap` questions; empty when fewer than two
    /// candidates remain and the result is already decided.
    pub fn synthesize(
        &self,
        candidates: &[String],
        personality: PersonalityType,
    ) -> Vec<AdaptiveQuestion> {
        if candidates.len() < 2 {
            debug!(
                "{} candidate(s) for {}; no adaptive questions needed",
                candidates.len(),
                personality
            );
            return Vec::new();
        }

        let records: Vec<&LanguageRecord> = candidates
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect();

        // Steps 1-2: evaluation and validity, bank order
        let pool: Vec<Evaluated> = self
            .templates
            .iter()
            .filter_map(|template| evaluate(template, &records, candidates.len()))
            .collect();

        // Step 4 ordering applied to the whole pool; sort is stable
        let mut ranked: Vec<&Evaluated> = pool.iter().collect();
        ranked.sort_by(|a, b| b.question.quality.total_cmp(&a.question.quality));

        for entry in &ranked {
            debug!(
                "Question {} quality {:.3} coverage {:.2}",
                entry.question.id, entry.question.quality, entry.coverage
            );
        }

        // Step 3: coverage filter
        let primary: Vec<&Evaluated> = ranked
            .iter()
            .copied()
            .filter(|e| e.coverage >= self.config.min_coverage)
            .collect();

        // Step 5: threshold selection with floor top-up
        let cap = self.config.question_cap;
        let mut selected: Vec<AdaptiveQuestion> = primary
            .iter()
            .filter(|e| e.question.quality >= self.config.min_quality)
            .take(cap)
            .map(|e| e.question.clone())
            .collect();

        let floor = self.config.question_floor.min(cap);
        for entry in &primary {
            if selected.len() >= floor {
                break;
            }
            if !is_selected(&selected, &entry.question.id) {
                selected.push(entry.question.clone());
            }
        }

        // Step 6: forced differentiators (coverage filter bypassed)
        for (niche, template_id) in FORCED_DIFFERENTIATORS {
            if selected.len() >= cap {
                break;
            }
            if !records.iter().any(|r| r.has_niche(niche)) {
                continue;
            }
            match pool.iter().find(|e| e.question.id == template_id) {
                Some(entry) if !is_selected(&selected, template_id) => {
                    debug!("Forcing differentiator {} for {:?}", template_id, niche);
                    selected.push(entry.question.clone());
                }
                Some(_) => {}
                None => debug!(
                    "Differentiator {} not valid for this candidate set",
                    template_id
                ),
            }
        }

        // Step 7: elastic final pass
        if candidates.len() >= self.config.large_candidate_set {
            for entry in &ranked {
                if selected.len() >= cap {
                    break;
                }
                let answer_count = entry.question.answers.len();
                if (2..=3).contains(&answer_count) && !is_selected(&selected, &entry.question.id) {
                    selected.push(entry.question.clone());
                }
            }
        } else if candidates.len() <= self.config.small_candidate_set && selected.len() < cap {
            if let Some(tie_break) = tie_break_question(&records) {
                debug!(
                    "Adding tie-break question ({})",
                    tie_break.category.as_str()
                );
                selected.push(tie_break);
            }
        }

        debug!(
            "Synthesized {} questions for {} over {} candidates",
            selected.len(),
            personality,
            candidates.len()
        );
        selected
    }
}

fn is_selected(selected: &[AdaptiveQuestion], id: &str) -> bool {
    selected.iter().any(|q| q.id == id)
}

/// Materialize a template against the candidates; `None` when invalid
fn evaluate(
    template: &QuestionTemplate,
    records: &[&LanguageRecord],
    candidate_count: usize,
) -> Option<Evaluated> {
    let answers: Vec<AdaptiveAnswer> = template
        .answers
        .iter()
        .filter_map(|answer| {
            let languages: Vec<String> = records
                .iter()
                .filter(|record| answer.matches(record))
                .map(|record| record.id.clone())
                .collect();
            (!languages.is_empty()).then(|| AdaptiveAnswer {
                id: answer.id.clone(),
                prompt: answer.prompt.clone(),
                languages,
            })
        })
        .collect();

    if answers.len() < 2 {
        return None;
    }

    let groups: Vec<&[String]> = answers.iter().map(|a| a.languages.as_slice()).collect();
    let coverage = quality::coverage_ratio(&groups, candidate_count);
    let score = quality::quality_score(&groups, candidate_count);

    Some(Evaluated {
        question: AdaptiveQuestion {
            id: template.id.clone(),
            prompt: template.prompt.clone(),
            category: template.category,
            answers,
            quality: score,
        },
        coverage,
    })
}

/// Group candidates by a trait value, first-appearance order; records
/// without the trait are left out
fn group_by<T: PartialEq + Copy>(
    records: &[&LanguageRecord],
    value_of: impl Fn(&LanguageRecord) -> Option<T>,
) -> Vec<(T, Vec<String>)> {
    let mut groups: Vec<(T, Vec<String>)> = Vec::new();
    for record in records {
        let Some(value) = value_of(*record) else {
            continue;
        };
        match groups.iter_mut().find(|(v, _)| *v == value) {
            Some((_, ids)) => ids.push(record.id.clone()),
            None => groups.push((value, vec![record.id.clone()])),
        }
    }
    groups
}

fn learning_curve_prompt(value: LearningCurve) -> (&'static str, &'static str) {
    match value {
        LearningCurve::Gentle => ("gentle", "Something I can pick up in a weekend"),
        LearningCurve::Moderate => ("moderate", "A reasonable climb is fine"),
        LearningCurve::Steep => ("steep", "I enjoy a steep climb"),
    }
}

fn performance_prompt(value: PerformanceTier) -> (&'static str, &'static str) {
    match value {
        PerformanceTier::Critical => ("critical", "Every cycle counts"),
        PerformanceTier::Important => ("important", "Fast enough, with good ergonomics"),
        PerformanceTier::Flexible => ("flexible", "Developer speed over raw speed"),
    }
}

fn ecosystem_prompt(value: Ecosystem) -> (&'static str, &'static str) {
    match value {
        Ecosystem::Mature => ("mature", "A huge, battle-tested ecosystem"),
        Ecosystem::Modern => ("modern", "A modern, fast-moving ecosystem"),
        Ecosystem::Niche => ("niche", "A small, close-knit community"),
        Ecosystem::Legacy => ("legacy", "A long-established platform"),
    }
}

fn grouped_answers<T: Copy>(
    groups: Vec<(T, Vec<String>)>,
    describe: fn(T) -> (&'static str, &'static str),
) -> Vec<AdaptiveAnswer> {
    groups
        .into_iter()
        .map(|(value, languages)| {
            let (slug, prompt) = describe(value);
            AdaptiveAnswer {
                id: format!("{}_{}", TIE_BREAK_ID, slug),
                prompt: prompt.to_string(),
                languages,
            }
        })
        .collect()
}

/// Bespoke question separating a small candidate set
///
/// Uses the first of learning curve, performance tier and ecosystem that
/// splits the candidates into two or more groups; otherwise asks for the
/// language by name. `None` when fewer than two records remain.
fn tie_break_question(records: &[&LanguageRecord]) -> Option<AdaptiveQuestion> {
    if records.len() < 2 {
        return None;
    }

    let learning = group_by(records, |r| r.learning_curve);
    let performance = group_by(records, |r| r.performance);
    let ecosystem = group_by(records, |r| r.ecosystem);

    let (prompt, category, answers) = if learning.len() >= 2 {
        (
            "How steep a learning curve are you up for?",
            QuestionCategory::Ecosystem,
            grouped_answers(learning, learning_curve_prompt),
        )
    } else if performance.len() >= 2 {
        (
            "How much does raw performance matter to you?",
            QuestionCategory::Performance,
            grouped_answers(performance, performance_prompt),
        )
    } else if ecosystem.len() >= 2 {
        (
            "What kind of ecosystem do you want around you?",
            QuestionCategory::Ecosystem,
            grouped_answers(ecosystem, ecosystem_prompt),
        )
    } else {
        let answers: Vec<AdaptiveAnswer> = records
            .iter()
            .map(|record| AdaptiveAnswer {
                id: format!("{}_{}", TIE_BREAK_ID, record.id),
                prompt: record.name.clone(),
                languages: vec![record.id.clone()],
            })
            .collect();
        (
            "Which of these finalists speaks to you most?",
            QuestionCategory::Style,
            answers,
        )
    };

    let groups: Vec<&[String]> = answers.iter().map(|a| a.languages.as_slice()).collect();
    let score = quality::quality_score(&groups, records.len());

    Some(AdaptiveQuestion {
        id: TIE_BREAK_ID.to_string(),
        prompt: prompt.to_string(),
        category,
        answers,
        quality: score,
    })
}
