//! Core data model types for quizrun.
//!
//! These are the fundamental types the rest of the system uses to represent
//! questions, option keys, play modes, and bank manifest entries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One of the fixed answer slots of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    /// Every option key, in display order.
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    /// Lowercase letter for this key.
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::A => "a",
            OptionKey::B => "b",
            OptionKey::C => "c",
            OptionKey::D => "d",
        }
    }

    /// Uppercase letter, used when showing the key to a person.
    pub fn label(self) -> char {
        match self {
            OptionKey::A => 'A',
            OptionKey::B => 'B',
            OptionKey::C => 'C',
            OptionKey::D => 'D',
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(OptionKey::A),
            "b" => Ok(OptionKey::B),
            "c" => Ok(OptionKey::C),
            "d" => Ok(OptionKey::D),
            other => Err(format!("unknown option key: {other}")),
        }
    }
}

/// Practice or exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    /// Immediate per-question feedback, optional reveal before advancing.
    #[default]
    Instant,
    /// No feedback; answering always moves to the next question.
    Exam,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Instant => write!(f, "instant"),
            QuizMode::Exam => write!(f, "exam"),
        }
    }
}

impl FromStr for QuizMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "instant" | "practice" => Ok(QuizMode::Instant),
            "exam" | "test" => Ok(QuizMode::Exam),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// A single multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    text: String,
    options: BTreeMap<OptionKey, String>,
    correct_key: OptionKey,
}

impl QuestionRecord {
    /// Build a record from its text, the four option texts (in `OptionKey::ALL`
    /// order) and the correct key.
    pub fn new(
        text: impl Into<String>,
        options: [String; 4],
        correct_key: OptionKey,
    ) -> Result<Self, DataError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DataError::EmptyQuestionText);
        }
        let options = OptionKey::ALL.into_iter().zip(options).collect();
        Ok(Self {
            text,
            options,
            correct_key,
        })
    }

    /// The question text as stored, without any cleanup applied.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn correct_key(&self) -> OptionKey {
        self.correct_key
    }

    /// Text of one option. Empty if the bank left that option blank.
    pub fn option_text(&self, key: OptionKey) -> &str {
        self.options.get(&key).map(String::as_str).unwrap_or_default()
    }

    /// All options in key order.
    pub fn options(&self) -> impl Iterator<Item = (OptionKey, &str)> {
        self.options.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_correct(&self, key: OptionKey) -> bool {
        key == self.correct_key
    }
}

/// An entry of the bank manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    /// Stable identifier used to select the bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Where the bank's CSV lives, relative to the manifest.
    pub file: String,
    /// Number of questions, if the manifest records it.
    #[serde(default, rename = "questionCount", skip_serializing_if = "Option::is_none")]
    pub question_count: Option<usize>,
}
