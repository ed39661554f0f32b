//! Post-session report with JSON persistence.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::configurator::{PlaySequence, SessionConfig};
use crate::history::History;
use crate::model::{BankEntry, OptionKey};
use crate::normalize;

/// Qualitative band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    NeedsReview,
    Good,
    Excellent,
}

impl Tier {
    /// Bands from highest to lowest with their inclusive lower bounds.
    pub const BANDS: [(u32, Tier); 3] = [
        (80, Tier::Excellent),
        (50, Tier::Good),
        (0, Tier::NeedsReview),
    ];

    pub fn from_percentage(percentage: u32) -> Self {
        Self::BANDS
            .iter()
            .find(|(lower, _)| percentage >= *lower)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::NeedsReview)
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent! You know this material well.",
            Tier::Good => "Good work, keep practising.",
            Tier::NeedsReview => "Needs review: go over this material again.",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Excellent => write!(f, "excellent"),
            Tier::Good => write!(f, "good"),
            Tier::NeedsReview => write!(f, "needs review"),
        }
    }
}

/// `round(100 * score / total)`, rounding halves up. Zero when `total` is zero.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * score + total) / (2 * total)) as u32
}

/// Summary of the bank a session was played from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

/// One option as shown in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOption {
    pub key: OptionKey,
    pub text: String,
    pub is_correct: bool,
    pub is_chosen: bool,
}

/// Outcome of one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// Position in the play sequence.
    pub index: usize,
    /// Question text as stored in the bank.
    pub text: String,
    pub correct_key: OptionKey,
    /// `None` if the session ended before this question was answered.
    pub chosen_key: Option<OptionKey>,
    pub is_correct: bool,
    pub options: Vec<ReportOption>,
}

impl QuestionOutcome {
    pub fn is_answered(&self) -> bool {
        self.chosen_key.is_some()
    }
}

/// A complete session report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Bank the questions came from, if known.
    #[serde(default)]
    pub bank: Option<BankSummary>,
    /// Settings the session ran with.
    pub settings: SessionConfig,
    pub score: usize,
    pub total: usize,
    pub answered: usize,
    pub percentage: u32,
    pub tier: Tier,
    pub questions: Vec<QuestionOutcome>,
}

/// Build a report from a sequence and the answers given to it.
///
/// Questions without an answer are reported as unanswered and incorrect.
pub fn build_report(
    sequence: &PlaySequence,
    history: &History,
    final_score: usize,
    settings: SessionConfig,
) -> Report {
    let questions: Vec<QuestionOutcome> = sequence
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let event = history.get(index);
            let chosen_key = event.map(|e| e.chosen_key);
            let correct_key = question.correct_key();
            let options = question
                .options()
                .map(|(key, text)| ReportOption {
                    key,
                    text: text.to_string(),
                    is_correct: key == correct_key,
                    is_chosen: chosen_key == Some(key),
                })
                .collect();

            QuestionOutcome {
                index,
                text: question.text().to_string(),
                correct_key,
                chosen_key,
                is_correct: event.is_some_and(|e| e.is_correct),
                options,
            }
        })
        .collect();

    let total = sequence.len();
    let percentage = percentage(final_score, total);

    Report {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        bank: None,
        settings,
        score: final_score,
        total,
        answered: history.len(),
        percentage,
        tier: Tier::from_percentage(percentage),
        questions,
    }
}

impl Report {
    /// Attach the bank the session was played from.
    pub fn with_bank(mut self, bank: &BankEntry, question_count: usize) -> Self {
        self.bank = Some(BankSummary {
            id: bank.id.clone(),
            name: bank.name.clone(),
            question_count,
        });
        self
    }

    /// Question text as it should be shown, honouring the session's cleanup flag.
    pub fn display_text(&self, question: &QuestionOutcome) -> String {
        normalize::display_text(&question.text, self.settings.clean_question_text)
    }

    /// Questions answered wrongly or not at all.
    pub fn missed(&self) -> impl Iterator<Item = &QuestionOutcome> {
        self.questions.iter().filter(|q| !q.is_correct)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: Report =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
