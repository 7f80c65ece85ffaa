//! Personality primitives: letters, axes and the sixteen four-letter types
//!
//! A type holds exactly one letter per axis, in axis order (E/I, S/N, T/F,
//! J/P). Neighborhood helpers drive candidate relaxation in the selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One pole of a personality axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    E,
    I,
    S,
    N,
    T,
    F,
    J,
    P,
}

impl Letter {
    /// Parse a single letter (case-insensitive)
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'E' => Some(Letter::E),
            'I' => Some(Letter::I),
            'S' => Some(Letter::S),
            'N' => Some(Letter::N),
            'T' => Some(Letter::T),
            'F' => Some(Letter::F),
            'J' => Some(Letter::J),
            'P' => Some(Letter::P),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::E => 'E',
            Letter::I => 'I',
            Letter::S => 'S',
            Letter::N => 'N',
            Letter::T => 'T',
            Letter::F => 'F',
            Letter::J => 'J',
            Letter::P => 'P',
        }
    }

    /// Axis this letter belongs to
    pub fn axis(self) -> Axis {
        match self {
            Letter::E | Letter::I => Axis::EnergyFocus,
            Letter::S | Letter::N => Axis::Perception,
            Letter::T | Letter::F => Axis::Judgment,
            Letter::J | Letter::P => Axis::Lifestyle,
        }
    }

    /// The other pole of the same axis
    pub fn opposite(self) -> Letter {
        let (first, second) = self.axis().poles();
        if self == first {
            second
        } else {
            first
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The four binary axes, in type-code order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// E/I
    EnergyFocus,
    /// S/N
    Perception,
    /// T/F
    Judgment,
    /// J/P
    Lifestyle,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::EnergyFocus,
        Axis::Perception,
        Axis::Judgment,
        Axis::Lifestyle,
    ];

    /// Position of this axis within a type code
    pub fn index(self) -> usize {
        match self {
            Axis::EnergyFocus => 0,
            Axis::Perception => 1,
            Axis::Judgment => 2,
            Axis::Lifestyle => 3,
        }
    }

    /// (first pole, second pole)
    pub fn poles(self) -> (Letter, Letter) {
        match self {
            Axis::EnergyFocus => (Letter::E, Letter::I),
            Axis::Perception => (Letter::S, Letter::N),
            Axis::Judgment => (Letter::T, Letter::F),
            Axis::Lifestyle => (Letter::J, Letter::P),
        }
    }

    /// Letter chosen when both poles have equal votes
    pub fn tie_default(self) -> Letter {
        match self {
            Axis::EnergyFocus => Letter::I,
            Axis::Perception => Letter::N,
            Axis::Judgment => Letter::F,
            Axis::Lifestyle => Letter::P,
        }
    }
}

/// Error parsing a four-letter type code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTypeError {
    #[error("type code must have 4 letters, got {0}")]
    Length(usize),

    #[error("'{found}' is not a valid letter at position {position}")]
    Letter { position: usize, found: char },
}

/// A four-letter personality type such as `INTJ`
///
/// Serializes as its upper-case code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonalityType([Letter; 4]);

const fn code(ei: Letter, sn: Letter, tf: Letter, jp: Letter) -> PersonalityType {
    PersonalityType([ei, sn, tf, jp])
}

/// All sixteen types in canonical presentation order
const ALL_TYPES: [PersonalityType; 16] = {
    use Letter::*;
    [
        code(I, S, T, J),
        code(I, S, F, J),
        code(I, N, F, J),
        code(I, N, T, J),
        code(I, S, T, P),
        code(I, S, F, P),
        code(I, N, F, P),
        code(I, N, T, P),
        code(E, S, T, P),
        code(E, S, F, P),
        code(E, N, F, P),
        code(E, N, T, P),
        code(E, S, T, J),
        code(E, S, F, J),
        code(E, N, F, J),
        code(E, N, T, J),
    ]
};

/// One-paragraph descriptions, indexed like `ALL_TYPES`
const DESCRIPTIONS: [&str; 16] = [
    "Responsible, organized, and practical, ISTJs value tradition and reliability, approaching tasks methodically and fulfilling commitments with dedication.",
    "Quiet, caring, and dependable, ISFJs are motivated by a deep sense of duty and a desire to help others, often putting the needs of people and traditions first.",
    "Insightful, creative, and idealistic, INFJs combine strong values with empathy, striving to guide and support others toward meaningful growth.",
    "Strategic, independent, and visionary, INTJs analyze complex systems and pursue innovative solutions, preferring structure and long-term planning.",
    "Adaptable, analytical, and action-oriented, ISTPs excel at solving practical problems using logic and hands-on skills, thriving in situations that require flexibility.",
    "Gentle, adaptable, and sensitive, ISFPs value personal freedom and creativity, expressing themselves through actions and seeking harmony in their surroundings.",
    "Imaginative, idealistic, and empathetic, INFPs are guided by strong personal values and seek deep meaning and authenticity in their lives and relationships.",
    "Innovative, logical, and curious, INTPs enjoy exploring abstract ideas, analyzing theories, and seeking clarity through independent reflection.",
    "Energetic, pragmatic, and perceptive, ESTPs thrive in dynamic environments, skillfully navigating challenges and engaging others with confidence and resourcefulness.",
    "Enthusiastic, sociable, and spontaneous, ESFPs enjoy living in the moment, bringing excitement and warmth to social gatherings and valuing sensory experiences.",
    "Warm, imaginative, and expressive, ENFPs see possibilities everywhere, connect ideas and people effortlessly, and value authenticity and inspiration.",
    "Inventive, outspoken, and quick-thinking, ENTPs love debating ideas, exploring new possibilities, and generating solutions to complex problems.",
    "Efficient, organized, and decisive, ESTJs value order and tradition, naturally taking charge to bring structure and clarity to projects and groups.",
    "Sociable, conscientious, and supportive, ESFJs focus on creating harmony, meeting the needs of others, and maintaining traditions within their communities.",
    "Charismatic, supportive, and idealistic, ENFJs inspire and motivate others, excelling at understanding feelings and guiding people toward shared goals.",
    "Assertive, strategic, and determined, ENTJs are natural leaders who excel at organizing resources and people to achieve ambitious objectives.",
];

impl PersonalityType {
    /// Build a type from one letter per axis
    ///
    /// # Errors
    /// Returns `ParseTypeError::Letter` if a letter sits on the wrong axis.
    pub fn from_letters(letters: [Letter; 4]) -> Result<Self, ParseTypeError> {
        for (position, (letter, axis)) in letters.iter().zip(Axis::ALL).enumerate() {
            if letter.axis() != axis {
                return Err(ParseTypeError::Letter {
                    position,
                    found: letter.as_char(),
                });
            }
        }
        Ok(Self(letters))
    }

    /// Build a type by picking a pole per axis
    ///
    /// `pick` returns `true` for the second pole (I, N, F, P).
    pub fn from_poles(mut pick: impl FnMut(Axis) -> bool) -> Self {
        Self(Axis::ALL.map(|axis| {
            let (first, second) = axis.poles();
            if pick(axis) {
                second
            } else {
                first
            }
        }))
    }

    /// All sixteen types in canonical order
    pub fn all() -> [PersonalityType; 16] {
        ALL_TYPES
    }

    pub fn letters(&self) -> [Letter; 4] {
        self.0
    }

    /// Letter held on the given axis
    pub fn letter(&self, axis: Axis) -> Letter {
        self.0[axis.index()]
    }

    /// Same type with one axis flipped
    pub fn flip(&self, axis: Axis) -> PersonalityType {
        let mut letters = self.0;
        letters[axis.index()] = letters[axis.index()].opposite();
        Self(letters)
    }

    /// The four types differing on exactly one axis, in axis order
    pub fn one_axis_neighbors(&self) -> [PersonalityType; 4] {
        Axis::ALL.map(|axis| self.flip(axis))
    }

    /// Outer letters (E/I and J/P) flipped, middle letters kept
    ///
    /// The two types share the same pair of preferred mental functions.
    pub fn cognitive_pair(&self) -> PersonalityType {
        self.flip(Axis::EnergyFocus).flip(Axis::Lifestyle)
    }

    /// The two-axis neighbors other than the cognitive pair, in axis-pair order
    pub fn other_two_axis_neighbors(&self) -> Vec<PersonalityType> {
        let mut neighbors = Vec::with_capacity(5);
        for (i, first) in Axis::ALL.iter().enumerate() {
            for second in &Axis::ALL[i + 1..] {
                if *first == Axis::EnergyFocus && *second == Axis::Lifestyle {
                    continue;
                }
                neighbors.push(self.flip(*first).flip(*second));
            }
        }
        neighbors
    }

    /// Number of axes on which the two types differ
    pub fn distance(&self, other: &PersonalityType) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Upper-case four-letter code
    pub fn code(&self) -> String {
        self.0.iter().map(|l| l.as_char()).collect()
    }

    /// One-paragraph description of the type
    pub fn description(&self) -> &'static str {
        ALL_TYPES
            .iter()
            .position(|t| t == self)
            .map(|i| DESCRIPTIONS[i])
            .unwrap_or_default()
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in &self.0 {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

impl FromStr for PersonalityType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 4 {
            return Err(ParseTypeError::Length(chars.len()));
        }

        let mut letters = [Letter::I, Letter::N, Letter::F, Letter::P];
        for (position, (c, axis)) in chars.iter().zip(Axis::ALL).enumerate() {
            match Letter::from_char(*c) {
                Some(letter) if letter.axis() == axis => letters[position] = letter,
                _ => {
                    return Err(ParseTypeError::Letter {
                        position,
                        found: *c,
                    })
                }
            }
        }
        Ok(Self(letters))
    }
}

impl TryFrom<String> for PersonalityType {
    type Error = ParseTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PersonalityType> for String {
    fn from(value: PersonalityType) -> Self {
        value.code()
    }
}
