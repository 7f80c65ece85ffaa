//! Quiz session state
//!
//! **Phases:** MBTI → LANGUAGE → COMPLETED
//!
//! A session is a plain value. `QuizEngine::apply` takes the old session and
//! an event and returns the next session; the old value is never mutated.

use crate::catalog::LanguageRecord;
use crate::personality::PersonalityType;
use crate::resolver::{ResolutionReason, ScoreMap};
use crate::synthesizer::AdaptiveQuestion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Quiz phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Fixed personality questions
    Mbti,
    /// Adaptive language questions
    Language,
    /// Result available
    Completed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Mbti => "mbti",
            Phase::Language => "language",
            Phase::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed)
    }
}

/// Session transition input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    /// Record (or overwrite) a personality-question answer
    AnswerPersonality {
        question_id: String,
        answer_id: String,
    },
    /// Record (or overwrite) an adaptive-question answer
    AnswerLanguage {
        question_id: String,
        answer_id: String,
    },
    /// Start over with a fresh session
    Reset,
    /// Jump straight to a shared result
    LoadSharedResult {
        language_id: String,
        personality: PersonalityType,
    },
}

/// Full quiz snapshot
///
/// This is everything a presentation layer needs; it never has to consult
/// the catalog or template bank directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    /// Unique session identifier
    pub session_id: Uuid,

    pub phase: Phase,

    /// Index of the first unanswered question in the current phase
    pub cursor: usize,

    /// Personality question id → answer id
    pub personality_answers: BTreeMap<String, String>,

    /// Adaptive question id → answer id
    pub language_answers: BTreeMap<String, String>,

    /// Resolved type, set on leaving the MBTI phase
    pub personality: Option<PersonalityType>,

    /// Candidate ids in selection order
    pub candidates: Vec<String>,

    /// Per-language score, seeded to zero for every candidate
    pub scores: ScoreMap,

    /// Generated adaptive questions
    pub questions: Vec<AdaptiveQuestion>,

    pub completed: bool,

    /// Winning language, once completed
    pub result: Option<LanguageRecord>,

    /// How the result was chosen
    pub resolution: Option<ResolutionReason>,

    /// `result` was synthesized for an unknown id
    pub placeholder: bool,

    /// Session start time
    pub started_at: DateTime<Utc>,

    /// Set on reaching COMPLETED
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Fresh session in the MBTI phase
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            phase: Phase::Mbti,
            cursor: 0,
            personality_answers: BTreeMap::new(),
            language_answers: BTreeMap::new(),
            personality: None,
            candidates: Vec::new(),
            scores: ScoreMap::new(),
            questions: Vec::new(),
            completed: false,
            result: None,
            resolution: None,
            placeholder: false,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Adaptive question at the cursor, while in the LANGUAGE phase
    pub fn current_question(&self) -> Option<&AdaptiveQuestion> {
        match self.phase {
            Phase::Language => self.questions.get(self.cursor),
            _ => None,
        }
    }

    /// Answered / total for the current phase
    pub fn progress(&self, personality_question_count: usize) -> (usize, usize) {
        match self.phase {
            Phase::Mbti => (self.personality_answers.len(), personality_question_count),
            Phase::Language => (self.language_answers.len(), self.questions.len()),
            Phase::Completed => (self.questions.len(), self.questions.len()),
        }
    }

    /// Personality type code, if resolved
    pub fn personality_code(&self) -> Option<String> {
        self.personality.map(|p| p.code())
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
