//! Dimension classifier
//!
//! Turns personality-question answers into a four-letter type. Each answer
//! carries a single letter; votes are tallied per pole and every axis is
//! resolved independently. Equal votes (including 0-0) fall back to the
//! axis tie default: I, N, F, P.

use crate::personality::{Axis, Letter, PersonalityType};
use std::collections::BTreeMap;
use tracing::debug;

/// Answer option of a personality question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonalityAnswer {
    pub id: &'static str,
    pub prompt: &'static str,
    pub letter: Letter,
}

/// Fixed personality question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonalityQuestion {
    pub id: &'static str,
    pub prompt: &'static str,
    pub axis: Axis,
    pub answers: [PersonalityAnswer; 2],
}

impl PersonalityQuestion {
    pub fn answer(&self, answer_id: &str) -> Option<&PersonalityAnswer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }
}

static PERSONALITY_QUESTIONS: [PersonalityQuestion; 5] = [
    PersonalityQuestion {
        id: "ei1",
        prompt: "After a busy social event or meeting, you usually:",
        axis: Axis::EnergyFocus,
        answers: [
            PersonalityAnswer {
                id: "ei1e",
                prompt: "Feel energized and ready for more interaction",
                letter: Letter::E,
            },
            PersonalityAnswer {
                id: "ei1i",
                prompt: "Need some quiet time alone to recharge",
                letter: Letter::I,
            },
        ],
    },
    PersonalityQuestion {
        id: "sn1",
        prompt: "When solving a problem, you tend to:",
        axis: Axis::Perception,
        answers: [
            PersonalityAnswer {
                id: "sn1s",
                prompt: "Start with the facts and work step-by-step through details",
                letter: Letter::S,
            },
            PersonalityAnswer {
                id: "sn1n",
                prompt: "Jump to the big picture and work backwards to specifics",
                letter: Letter::N,
            },
        ],
    },
    PersonalityQuestion {
        id: "sn2",
        prompt: "When learning something new, you prefer explanations with:",
        axis: Axis::Perception,
        answers: [
            PersonalityAnswer {
                id: "sn2s",
                prompt: "Specific examples, step-by-step instructions, and practical applications",
                letter: Letter::S,
            },
            PersonalityAnswer {
                id: "sn2n",
                prompt: "Overall concepts, underlying principles, and theoretical frameworks",
                letter: Letter::N,
            },
        ],
    },
    PersonalityQuestion {
        id: "tf1",
        prompt: "When making important decisions, you prioritize:",
        axis: Axis::Judgment,
        answers: [
            PersonalityAnswer {
                id: "tf1t",
                prompt: "Logic, efficiency, and objective criteria",
                letter: Letter::T,
            },
            PersonalityAnswer {
                id: "tf1f",
                prompt: "How it affects people and team dynamics",
                letter: Letter::F,
            },
        ],
    },
    PersonalityQuestion {
        id: "jp1",
        prompt: "You work best with:",
        axis: Axis::Lifestyle,
        answers: [
            PersonalityAnswer {
                id: "jp1j",
                prompt: "Clear plans, deadlines, and defined outcomes",
                letter: Letter::J,
            },
            PersonalityAnswer {
                id: "jp1p",
                prompt: "Open options, flexibility, and room to explore",
                letter: Letter::P,
            },
        ],
    },
];

/// The built-in personality question bank, in presentation order
pub fn personality_questions() -> &'static [PersonalityQuestion] {
    &PERSONALITY_QUESTIONS
}

/// Look up a personality question by id
pub fn personality_question(id: &str) -> Option<&'static PersonalityQuestion> {
    PERSONALITY_QUESTIONS.iter().find(|q| q.id == id)
}

/// Eight per-pole vote counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionVoteTally {
    counts: [u32; 8],
}

fn slot(letter: Letter) -> usize {
    match letter {
        Letter::E => 0,
        Letter::I => 1,
        Letter::S => 2,
        Letter::N => 3,
        Letter::T => 4,
        Letter::F => 5,
        Letter::J => 6,
        Letter::P => 7,
    }
}

impl DimensionVoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, letter: Letter) {
        self.counts[slot(letter)] += 1;
    }

    pub fn count(&self, letter: Letter) -> u32 {
        self.counts[slot(letter)]
    }

    /// Higher count wins; ties take the axis default
    pub fn resolve_axis(&self, axis: Axis) -> Letter {
        let (first, second) = axis.poles();
        let (a, b) = (self.count(first), self.count(second));
        if a > b {
            first
        } else if b > a {
            second
        } else {
            axis.tie_default()
        }
    }

    pub fn resolve(&self) -> PersonalityType {
        PersonalityType::from_poles(|axis| self.resolve_axis(axis) == axis.poles().1)
    }
}

/// Count votes for an answer map (question id → answer id)
///
/// Unknown question ids and answer ids are ignored.
pub fn tally(
    answers: &BTreeMap<String, String>,
    bank: &[PersonalityQuestion],
) -> DimensionVoteTally {
    let mut tally = DimensionVoteTally::new();
    for (question_id, answer_id) in answers {
        let letter = bank
            .iter()
            .find(|q| q.id == question_id.as_str())
            .and_then(|q| q.answer(answer_id))
            .map(|a| a.letter);
        match letter {
            Some(letter) => tally.add(letter),
            None => debug!(
                "Ignoring unresolvable answer {} -> {}",
                question_id, answer_id
            ),
        }
    }
    tally
}

/// Classify an answer map against the built-in bank
pub fn classify(answers: &BTreeMap<String, String>) -> PersonalityType {
    tally(answers, personality_questions()).resolve()
}
