//! # LangFit Engine
//!
//! Matching engine for the programming-language personality quiz:
//! - Personality types and the dimension classifier
//! - Language catalog and question template bank
//! - Candidate selection with staged relaxation
//! - Adaptive question synthesis and ranking
//! - Scoring and result resolution
//! - Session reducer and result-sharing tokens

pub mod catalog;
pub mod classifier;
pub mod engine;
pub mod personality;
pub mod quality;
pub mod resolver;
pub mod selector;
pub mod session;
pub mod share;
pub mod synthesizer;
pub mod templates;

pub use catalog::{Catalog, LanguageRecord};
pub use engine::QuizEngine;
pub use personality::{Axis, Letter, PersonalityType};
pub use resolver::{Resolution, ResolutionReason, ScoreMap};
pub use selector::{Selection, SelectionPass};
pub use session::{Phase, QuizEvent, QuizSession};
pub use share::SharedResult;
pub use synthesizer::{AdaptiveAnswer, AdaptiveQuestion};
pub use templates::{QuestionCategory, TemplateBank};
