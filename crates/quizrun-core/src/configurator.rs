//! Session settings and play-sequence construction.

use std::ops::Index;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bank::QuestionStore;
use crate::error::ConfigError;
use crate::model::{QuestionRecord, QuizMode};

/// User-chosen settings for the next session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Practice or exam.
    pub mode: QuizMode,
    /// Number of questions to play.
    pub limit: usize,
    /// Shuffle the bank before taking `limit` questions.
    pub shuffle: bool,
    /// Strip "Câu N." markers when showing question text.
    pub clean_question_text: bool,
}

impl SessionConfig {
    /// Defaults for a store of the given size: every question, shuffled and cleaned.
    pub fn for_store_size(size: usize) -> Self {
        Self {
            mode: QuizMode::Instant,
            limit: size,
            shuffle: true,
            clean_question_text: true,
        }
    }
}

/// The ordered questions of one session. Never empty.
#[derive(Debug, Clone)]
pub struct PlaySequence {
    questions: Vec<Arc<QuestionRecord>>,
}

impl PlaySequence {
    /// Build a sequence from shared records; an empty list is rejected.
    pub fn new(questions: Vec<Arc<QuestionRecord>>) -> Result<Self, ConfigError> {
        if questions.is_empty() {
            return Err(ConfigError::EmptyStore);
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`: a sequence holds at least one question.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.questions.get(index).map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.questions.iter().map(Arc::as_ref)
    }
}

impl Index<usize> for PlaySequence {
    type Output = QuestionRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.questions[index]
    }
}

/// Derive the questions for a session: optional shuffle, then truncation.
pub fn build_play_sequence<R: Rng + ?Sized>(
    store: &QuestionStore,
    config: &SessionConfig,
    rng: &mut R,
) -> Result<PlaySequence, ConfigError> {
    if store.is_empty() {
        return Err(ConfigError::EmptyStore);
    }
    if config.limit == 0 {
        return Err(ConfigError::InvalidLimit(config.limit));
    }

    let mut questions: Vec<_> = store.iter().cloned().collect();
    if config.shuffle {
        questions.shuffle(rng);
    }
    questions.truncate(config.limit.min(store.len()));

    PlaySequence::new(questions)
}

/// Holds the selected store and the settings for its next session.
#[derive(Debug, Clone)]
pub struct Configurator {
    store: QuestionStore,
    config: SessionConfig,
}

impl Configurator {
    pub fn new(store: QuestionStore) -> Self {
        let config = SessionConfig::for_store_size(store.len());
        Self { store, config }
    }

    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_mode(&mut self, mode: QuizMode) {
        self.config.mode = mode;
    }

    /// Store a question limit, clamped to the store size. Returns the value
    /// actually stored.
    pub fn set_limit(&mut self, limit: usize) -> Result<usize, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::InvalidLimit(limit));
        }
        if self.store.is_empty() {
            return Err(ConfigError::EmptyStore);
        }
        self.config.limit = limit.min(self.store.len());
        Ok(self.config.limit)
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.config.shuffle = shuffle;
    }

    pub fn set_clean_question_text(&mut self, clean: bool) {
        self.config.clean_question_text = clean;
    }

    /// Build a play sequence from the current store and settings.
    pub fn build_play_sequence<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<PlaySequence, ConfigError> {
        build_play_sequence(&self.store, &self.config, rng)
    }
}
