//! The surface a front end talks to.
//!
//! [`Quiz`] owns the configurator and the session engine for one question
//! store. Each `Quiz` is an independent context; nothing is global.

use rand::Rng;

use crate::bank::QuestionStore;
use crate::configurator::{Configurator, SessionConfig};
use crate::engine::{EngineState, Progression, RevealState, SessionEngine, Step};
use crate::error::ConfigError;
use crate::history::AnswerEvent;
use crate::model::{OptionKey, QuizMode};
use crate::normalize;
use crate::report::{build_report, Report};

/// One option of the question on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub key: OptionKey,
    pub text: String,
    /// The user picked this option.
    pub chosen: bool,
    /// This option may be shown as the correct one.
    pub marked_correct: bool,
}

/// The question on screen, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    /// Question text, cleaned if the session asks for it.
    pub text: String,
    pub options: Vec<OptionView>,
    pub reveal: RevealState,
    /// Normalized correct key. Front ends decide when to show it; see
    /// `marked_correct` on the options for the reveal rules.
    pub correct_key: OptionKey,
}

/// Settings, engine, and store for one player.
#[derive(Debug, Clone)]
pub struct Quiz {
    configurator: Configurator,
    engine: SessionEngine,
    session_config: Option<SessionConfig>,
}

impl Quiz {
    pub fn new(store: QuestionStore) -> Self {
        Self {
            configurator: Configurator::new(store),
            engine: SessionEngine::new(),
            session_config: None,
        }
    }

    pub fn store(&self) -> &QuestionStore {
        self.configurator.store()
    }

    /// Settings for the next session.
    pub fn config(&self) -> &SessionConfig {
        self.configurator.config()
    }

    /// Settings are frozen while playing.
    fn ensure_configurable(&self) -> Result<(), ConfigError> {
        match self.engine.state() {
            EngineState::Playing => Err(ConfigError::SessionActive),
            EngineState::Idle | EngineState::Finished => Ok(()),
        }
    }

    /// Called after a setting was accepted: a finished session is discarded
    /// and the engine returns to `Idle`.
    fn settings_changed(&mut self) {
        if self.engine.state() == EngineState::Finished {
            self.engine.reset();
            self.session_config = None;
        }
    }

    pub fn set_mode(&mut self, mode: QuizMode) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.configurator.set_mode(mode);
        self.settings_changed();
        Ok(())
    }

    /// Returns the limit actually stored after clamping. A rejected limit
    /// leaves both the settings and any finished session untouched.
    pub fn set_limit(&mut self, limit: usize) -> Result<usize, ConfigError> {
        self.ensure_configurable()?;
        let stored = self.configurator.set_limit(limit)?;
        self.settings_changed();
        Ok(stored)
    }

    pub fn set_shuffle(&mut self, shuffle: bool) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.configurator.set_shuffle(shuffle);
        self.settings_changed();
        Ok(())
    }

    pub fn set_clean_question_text(&mut self, clean: bool) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.configurator.set_clean_question_text(clean);
        self.settings_changed();
        Ok(())
    }

    /// Start a session using the thread-local RNG.
    pub fn start_session(&mut self) -> Result<(), ConfigError> {
        self.start_session_with(&mut rand::rng())
    }

    /// Start a session with a caller-supplied RNG. On error the engine is left
    /// as it was.
    pub fn start_session_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ConfigError> {
        let sequence = self.configurator.build_play_sequence(rng)?;
        let config = *self.configurator.config();
        self.engine.start_session(sequence, config.mode);
        self.session_config = Some(config);
        Ok(())
    }

    pub fn submit_answer(&mut self, key: OptionKey) -> Step<AnswerEvent> {
        self.engine.submit_answer(key)
    }

    pub fn reveal_answer(&mut self) -> Step<()> {
        self.engine.reveal_answer()
    }

    pub fn advance(&mut self) -> Step<Progression> {
        self.engine.advance()
    }

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn reveal_state(&self) -> RevealState {
        self.engine.reveal_state()
    }

    pub fn score(&self) -> usize {
        self.engine.score()
    }

    /// Fraction of the session completed, `current_index / len`.
    pub fn progress(&self) -> f64 {
        self.engine.progress()
    }

    /// Settings the current or last session started with.
    pub fn session_config(&self) -> Option<&SessionConfig> {
        self.session_config.as_ref()
    }

    /// The question being played, with reveal rules applied to its options.
    pub fn current_question(&self) -> Option<QuestionView> {
        let question = self.engine.current_question()?;
        let index = self.engine.current_index()?;
        let total = self.engine.sequence()?.len();
        let clean = self
            .session_config
            .map(|c| c.clean_question_text)
            .unwrap_or(false);
        let reveal = self.engine.reveal_state();
        let show_correct = self.engine.correct_option_visible();
        let correct_key = question.correct_key();

        let options = question
            .options()
            .map(|(key, text)| OptionView {
                key,
                text: text.to_string(),
                chosen: reveal.chosen() == Some(key),
                marked_correct: show_correct && key == correct_key,
            })
            .collect();

        Some(QuestionView {
            index,
            total,
            text: normalize::display_text(question.text(), clean),
            options,
            reveal,
            correct_key,
        })
    }

    /// Report for the current or last session, finished or not.
    pub fn report(&self) -> Option<Report> {
        let sequence = self.engine.sequence()?;
        let history = self.engine.history()?;
        let settings = self.session_config?;
        let report = build_report(sequence, history, self.engine.score(), settings);

        Some(match self.store().bank() {
            Some(bank) => report.with_bank(bank, self.store().len()),
            None => report,
        })
    }
}
