//! Quiz engine
//!
//! Owns the catalog, template bank and engine configuration, and drives
//! sessions through the classifier → selector → synthesizer → resolver
//! pipeline. All collaborators are injected; nothing here is global.

use crate::catalog::Catalog;
use crate::classifier::{self, personality_question, personality_questions, PersonalityQuestion};
use crate::personality::PersonalityType;
use crate::resolver::{
    fold_answers, seed_scores, Resolution, ResolutionReason, ResultResolver, ScoreMap,
};
use crate::selector::{CandidateSelector, Selection};
use crate::session::{Phase, QuizEvent, QuizSession};
use crate::synthesizer::{AdaptiveQuestion, QuestionSynthesizer};
use crate::templates::TemplateBank;
use chrono::Utc;
use langfit_common::{EngineConfig, Error, Result, TomlConfig};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Matching engine
#[derive(Debug, Clone)]
pub struct QuizEngine {
    catalog: Catalog,
    templates: TemplateBank,
    config: EngineConfig,
}

impl QuizEngine {
    /// Create an engine from explicit collaborators
    ///
    /// # Errors
    /// Returns `Error::Config` if `config` fails validation.
    pub fn new(catalog: Catalog, templates: TemplateBank, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        if !catalog.contains(&config.fallback_language) {
            warn!(
                "Fallback language '{}' is not in the catalog; it resolves to a placeholder",
                config.fallback_language
            );
        }
        debug!(
            "Engine ready: {} languages, {} question templates",
            catalog.len(),
            templates.len()
        );
        Ok(Self {
            catalog,
            templates,
            config,
        })
    }

    /// Built-in catalog and templates with default settings
    pub fn builtin() -> Result<Self> {
        Self::new(
            Catalog::builtin()?,
            TemplateBank::builtin()?,
            EngineConfig::default(),
        )
    }

    /// Engine from a loaded configuration file, honouring data path overrides
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                info!("Loading language catalog from {}", path.display());
                Catalog::from_file(path)
                    .map_err(|e| data_file_error(path, e))?
            }
            None => Catalog::builtin()?,
        };
        let templates = match &config.templates_path {
            Some(path) => {
                info!("Loading question templates from {}", path.display());
                TemplateBank::from_file(path)
                    .map_err(|e| data_file_error(path, e))?
            }
            None => TemplateBank::builtin()?,
        };
        Self::new(catalog, templates, config.engine.clone())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn templates(&self) -> &TemplateBank {
        &self.templates
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fixed personality questions, in presentation order
    pub fn personality_questions(&self) -> &'static [PersonalityQuestion] {
        personality_questions()
    }

    pub fn classify(&self, answers: &BTreeMap<String, String>) -> PersonalityType {
        classifier::classify(answers)
    }

    pub fn select(&self, personality: PersonalityType) -> Selection {
        CandidateSelector::new(&self.catalog, &self.config).select(personality)
    }

    pub fn questions_for(
        &self,
        candidates: &[String],
        personality: PersonalityType,
    ) -> Vec<AdaptiveQuestion> {
        QuestionSynthesizer::new(&self.catalog, &self.templates, &self.config)
            .synthesize(candidates, personality)
    }

    /// Score map for a set of adaptive answers, starting from zero
    pub fn score(
        &self,
        candidates: &[String],
        questions: &[AdaptiveQuestion],
        answers: &BTreeMap<String, String>,
    ) -> ScoreMap {
        let mut scores = seed_scores(candidates);
        fold_answers(&mut scores, questions, answers, &self.config.weights);
        scores
    }

    pub fn resolve(
        &self,
        scores: &ScoreMap,
        candidates: &[String],
        personality: PersonalityType,
    ) -> Resolution {
        ResultResolver::new(&self.catalog, &self.config.fallback_language)
            .resolve(scores, candidates, personality)
    }

    /// Result for an externally supplied (language, type) pair
    pub fn shared_result(&self, language_id: &str, personality: PersonalityType) -> Resolution {
        let (language, placeholder) = self.catalog.get_or_placeholder(language_id, personality);
        if placeholder {
            warn!(
                "Shared language '{}' is not in the catalog; using placeholder",
                language_id
            );
        }
        Resolution {
            language,
            reason: ResolutionReason::SharedResult,
            placeholder,
        }
    }

    /// Fresh session
    pub fn start(&self) -> QuizSession {
        let session = QuizSession::new();
        info!("Started quiz session {}", session.session_id);
        session
    }

    /// Apply an event to a session, returning the next session
    ///
    /// Events that do not fit the current phase, or that reference unknown
    /// question or answer ids, return an unchanged copy.
    pub fn apply(&self, session: &QuizSession, event: QuizEvent) -> QuizSession {
        match event {
            QuizEvent::Reset => {
                info!("Session {} reset", session.session_id);
                self.start()
            }
            QuizEvent::LoadSharedResult {
                language_id,
                personality,
            } => self.load_shared(&language_id, personality),
            QuizEvent::AnswerPersonality {
                question_id,
                answer_id,
            } => self.answer_personality(session, question_id, answer_id),
            QuizEvent::AnswerLanguage {
                question_id,
                answer_id,
            } => self.answer_language(session, question_id, answer_id),
        }
    }

    fn answer_personality(
        &self,
        session: &QuizSession,
        question_id: String,
        answer_id: String,
    ) -> QuizSession {
        if session.phase != Phase::Mbti {
            debug!(
                "Ignoring personality answer in {} phase",
                session.phase.as_str()
            );
            return session.clone();
        }
        let known =
            personality_question(&question_id).is_some_and(|q| q.answer(&answer_id).is_some());
        if !known {
            debug!(
                "Ignoring unknown personality answer {} -> {}",
                question_id, answer_id
            );
            return session.clone();
        }

        let mut next = session.clone();
        next.personality_answers.insert(question_id, answer_id);

        let bank = personality_questions();
        match bank
            .iter()
            .position(|q| !next.personality_answers.contains_key(q.id))
        {
            Some(cursor) => {
                next.cursor = cursor;
                next
            }
            None => self.enter_language_phase(next),
        }
    }

    fn enter_language_phase(&self, mut session: QuizSession) -> QuizSession {
        let personality = self.classify(&session.personality_answers);
        let selection = self.select(personality);
        let candidates = selection.into_candidates();
        let questions = self.questions_for(&candidates, personality);

        info!(
            "Session {}: type {}, {} candidates, {} adaptive questions",
            session.session_id,
            personality,
            candidates.len(),
            questions.len()
        );

        session.personality = Some(personality);
        session.scores = seed_scores(&candidates);
        session.candidates = candidates;
        session.questions = questions;
        session.language_answers.clear();
        session.cursor = 0;
        session.phase = Phase::Language;

        if session.questions.is_empty() {
            debug!("No adaptive questions; resolving immediately");
            return self.complete(session);
        }
        session
    }

    fn answer_language(
        &self,
        session: &QuizSession,
        question_id: String,
        answer_id: String,
    ) -> QuizSession {
        if session.phase != Phase::Language {
            debug!(
                "Ignoring language answer in {} phase",
                session.phase.as_str()
            );
            return session.clone();
        }
        let known = session
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .is_some_and(|q| q.answer(&answer_id).is_some());
        if !known {
            debug!(
                "Ignoring unknown language answer {} -> {}",
                question_id, answer_id
            );
            return session.clone();
        }

        let mut next = session.clone();
        next.language_answers.insert(question_id, answer_id);

        match next
            .questions
            .iter()
            .position(|q| !next.language_answers.contains_key(&q.id))
        {
            Some(cursor) => {
                next.cursor = cursor;
                next
            }
            None => self.complete(next),
        }
    }

    fn complete(&self, mut session: QuizSession) -> QuizSession {
        let Some(personality) = session.personality else {
            return session;
        };
        session.scores = self.score(
            &session.candidates,
            &session.questions,
            &session.language_answers,
        );
        let resolution = self.resolve(&session.scores, &session.candidates, personality);

        info!(
            "Session {} completed: {} ({})",
            session.session_id,
            resolution.language.id,
            resolution.reason.as_str()
        );

        session.result = Some(resolution.language);
        session.resolution = Some(resolution.reason);
        session.placeholder = resolution.placeholder;
        session.cursor = session.questions.len();
        session.phase = Phase::Completed;
        session.completed = true;
        session.completed_at = Some(Utc::now());
        session
    }

    fn load_shared(&self, language_id: &str, personality: PersonalityType) -> QuizSession {
        let resolution = self.shared_result(language_id, personality);
        info!(
            "Loaded shared result {} ({})",
            resolution.language.id, personality
        );

        let mut session = QuizSession::new();
        session.personality = Some(personality);
        session.result = Some(resolution.language);
        session.resolution = Some(resolution.reason);
        session.placeholder = resolution.placeholder;
        session.phase = Phase::Completed;
        session.completed = true;
        session.completed_at = Some(Utc::now());
        session
    }
}

fn data_file_error(path: &Path, error: Error) -> Error {
    match error {
        Error::Io(e) => Error::Config(format!("Failed to read {}: {}", path.display(), e)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_all(engine: &QuizEngine, pairs: &[(&str, &str)]) -> QuizSession {
        let mut session = engine.start();
        for (q, a) in pairs {
            session = engine.apply(
                &session,
                QuizEvent::AnswerPersonality {
                    question_id: q.to_string(),
                    answer_id: a.to_string(),
                },
            );
        }
        session
    }

    const ESTJ_ANSWERS: [(&str, &str); 5] = [
        ("ei1", "ei1e"),
        ("sn1", "sn1s"),
        ("sn2", "sn2s"),
        ("tf1", "tf1t"),
        ("jp1", "jp1j"),
    ];

    #[test]
    fn test_cursor_tracks_first_unanswered() {
        let engine = QuizEngine::builtin().unwrap();
        let session = answer_all(&engine, &[("sn1", "sn1n")]);
        assert_eq!(session.phase, Phase::Mbti);
        assert_eq!(session.cursor, 0);

        let session = answer_all(&engine, &[("ei1", "ei1i"), ("sn1", "sn1n")]);
        assert_eq!(session.cursor, 2);
    }

    #[test]
    fn test_full_personality_phase_enters_language() {
        let engine = QuizEngine::builtin().unwrap();
        let session = answer_all(&engine, &ESTJ_ANSWERS);

        assert_eq!(session.phase, Phase::Language);
        assert_eq!(session.personality_code().as_deref(), Some("ESTJ"));
        assert!(session.candidates.len() >= 6);
        assert!(!session.questions.is_empty());
        assert_eq!(session.cursor, 0);
        assert_eq!(session.scores.len(), session.candidates.len());
        assert!(session.scores.values().all(|&s| s == 0));
    }

    #[test]
    fn test_apply_does_not_touch_old_session() {
        let engine = QuizEngine::builtin().unwrap();
        let before = engine.start();
        let after = engine.apply(
            &before,
            QuizEvent::AnswerPersonality {
                question_id: "ei1".to_string(),
                answer_id: "ei1e".to_string(),
            },
        );
        assert!(before.personality_answers.is_empty());
        assert_eq!(after.personality_answers.len(), 1);
    }

    #[test]
    fn test_wrong_phase_is_ignored() {
        let engine = QuizEngine::builtin().unwrap();
        let session = engine.start();
        let next = engine.apply(
            &session,
            QuizEvent::AnswerLanguage {
                question_id: "use_case".to_string(),
                answer_id: "use_web".to_string(),
            },
        );
        assert_eq!(next, session);
    }

    #[test]
    fn test_invalid_engine_config_rejected() {
        let config = EngineConfig {
            question_cap: 0,
            ..EngineConfig::default()
        };
        let result = QuizEngine::new(
            Catalog::builtin().unwrap(),
            TemplateBank::builtin().unwrap(),
            config,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_catalog_override_is_config_error() {
        let config = TomlConfig {
            catalog_path: Some("/nonexistent/langfit/catalog.toml".into()),
            ..TomlConfig::default()
        };
        assert!(matches!(QuizEngine::from_config(&config), Err(Error::Config(_))));
    }
}
