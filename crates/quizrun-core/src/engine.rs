//! Session state machine.
//!
//! Drives one session question by question: evaluates answers, keeps score,
//! and applies the per-mode reveal rules. States run `Idle → Playing →
//! Finished`; `start_session` may be called from any of them.
//!
//! Calls made in a state that forbids them are not errors. They return
//! [`Step::Ignored`] with the reason so a front end that lets such a call
//! through can be caught in testing, and the session carries on untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::configurator::PlaySequence;
use crate::history::{AnswerEvent, History};
use crate::model::{OptionKey, QuestionRecord, QuizMode};

/// Top-level engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Idle,
    Playing,
    Finished,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::Playing => write!(f, "playing"),
            EngineState::Finished => write!(f, "finished"),
        }
    }
}

/// Answer progress on the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RevealState {
    #[default]
    Unanswered,
    /// An option was picked; the correct one has not been asked for.
    Answered { chosen: OptionKey },
    /// The correct option has been shown.
    Revealed { chosen: OptionKey },
}

impl RevealState {
    /// The option picked on the current question, if any.
    pub fn chosen(&self) -> Option<OptionKey> {
        match self {
            RevealState::Unanswered => None,
            RevealState::Answered { chosen } | RevealState::Revealed { chosen } => Some(*chosen),
        }
    }
}

/// Why an engine call was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// The call needs a session in progress.
    NotPlaying(EngineState),
    /// The current question already has an answer.
    AlreadyAnswered,
    /// The current question has not been answered yet.
    NotAnswered,
    /// The correct option is already showing.
    AlreadyRevealed,
    /// Exam mode never reveals answers.
    RevealInExamMode,
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolViolation::NotPlaying(state) => write!(f, "no session in progress ({state})"),
            ProtocolViolation::AlreadyAnswered => write!(f, "question already answered"),
            ProtocolViolation::NotAnswered => write!(f, "question not answered yet"),
            ProtocolViolation::AlreadyRevealed => write!(f, "answer already revealed"),
            ProtocolViolation::RevealInExamMode => write!(f, "reveal is not available in exam mode"),
        }
    }
}

/// Outcome of an engine call.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    /// The call changed the session.
    Applied(T),
    /// The call was a no-op.
    Ignored(ProtocolViolation),
}

impl<T> Step<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Step::Applied(_))
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Step::Ignored(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Step::Applied(value) => Some(value),
            Step::Ignored(_) => None,
        }
    }

    pub fn violation(&self) -> Option<ProtocolViolation> {
        match self {
            Step::Applied(_) => None,
            Step::Ignored(violation) => Some(*violation),
        }
    }
}

/// Where the session went after an `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    /// Moved on to the question at `index`.
    Next { index: usize },
    /// The last question was done.
    Finished,
}

/// Mutable state of one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub current_index: usize,
    pub score: usize,
    pub history: History,
    pub reveal: RevealState,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    sequence: PlaySequence,
    mode: QuizMode,
    state: SessionState,
}

impl ActiveSession {
    fn current(&self) -> &QuestionRecord {
        &self.sequence[self.state.current_index]
    }
}

/// The session state machine. Holds at most one session.
#[derive(Debug, Clone)]
pub struct SessionEngine {
    status: EngineState,
    session: Option<ActiveSession>,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEngine {
    pub fn new() -> Self {
        Self {
            status: EngineState::Idle,
            session: None,
        }
    }

    /// Begin a session, discarding whatever session existed before.
    pub fn start_session(&mut self, sequence: PlaySequence, mode: QuizMode) {
        if self.status == EngineState::Playing {
            if let Some(previous) = &self.session {
                tracing::info!(
                    index = previous.state.current_index,
                    answered = previous.state.history.len(),
                    "abandoning session in progress"
                );
            }
        }
        tracing::info!(questions = sequence.len(), %mode, "session started");

        self.session = Some(ActiveSession {
            sequence,
            mode,
            state: SessionState::default(),
        });
        self.status = EngineState::Playing;
    }

    /// Drop any session and return to `Idle`.
    pub fn reset(&mut self) {
        self.session = None;
        self.status = EngineState::Idle;
    }

    /// Answer the current question.
    pub fn submit_answer(&mut self, key: OptionKey) -> Step<AnswerEvent> {
        let status = self.status;
        let Some(session) = self.playing_mut() else {
            return ignored("submit_answer", ProtocolViolation::NotPlaying(status));
        };
        if session.state.reveal != RevealState::Unanswered {
            return ignored("submit_answer", ProtocolViolation::AlreadyAnswered);
        }

        let is_correct = session.current().is_correct(key);
        let event = AnswerEvent {
            question_index: session.state.current_index,
            chosen_key: key,
            is_correct,
        };
        if !session.state.history.record(event) {
            return ignored("submit_answer", ProtocolViolation::AlreadyAnswered);
        }
        if is_correct {
            session.state.score += 1;
        }
        session.state.reveal = RevealState::Answered { chosen: key };
        tracing::debug!(index = event.question_index, %key, is_correct, "answer recorded");

        if session.mode == QuizMode::Exam {
            let _ = self.advance();
        }
        Step::Applied(event)
    }

    /// Show the correct option for the answered question (instant mode).
    pub fn reveal_answer(&mut self) -> Step<()> {
        let status = self.status;
        let Some(session) = self.playing_mut() else {
            return ignored("reveal_answer", ProtocolViolation::NotPlaying(status));
        };
        if session.mode == QuizMode::Exam {
            return ignored("reveal_answer", ProtocolViolation::RevealInExamMode);
        }
        match session.state.reveal {
            RevealState::Unanswered => ignored("reveal_answer", ProtocolViolation::NotAnswered),
            RevealState::Revealed { .. } => {
                ignored("reveal_answer", ProtocolViolation::AlreadyRevealed)
            }
            RevealState::Answered { chosen } => {
                session.state.reveal = RevealState::Revealed { chosen };
                Step::Applied(())
            }
        }
    }

    /// Move past the answered question.
    pub fn advance(&mut self) -> Step<Progression> {
        let status = self.status;
        let Some(session) = self.playing_mut() else {
            return ignored("advance", ProtocolViolation::NotPlaying(status));
        };
        if session.state.reveal == RevealState::Unanswered {
            return ignored("advance", ProtocolViolation::NotAnswered);
        }

        if session.state.current_index >= session.sequence.last_index() {
            let score = session.state.score;
            let total = session.sequence.len();
            self.status = EngineState::Finished;
            tracing::info!(score, total, "session finished");
            return Step::Applied(Progression::Finished);
        }

        session.state.current_index += 1;
        session.state.reveal = RevealState::Unanswered;
        Step::Applied(Progression::Next {
            index: session.state.current_index,
        })
    }

    fn playing_mut(&mut self) -> Option<&mut ActiveSession> {
        if self.status != EngineState::Playing {
            return None;
        }
        self.session.as_mut()
    }

    pub fn state(&self) -> EngineState {
        self.status
    }

    /// Mode of the current or last session.
    pub fn mode(&self) -> Option<QuizMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Reveal sub-state of the current question. `Unanswered` unless playing.
    pub fn reveal_state(&self) -> RevealState {
        match (&self.session, self.status) {
            (Some(session), EngineState::Playing) => session.state.reveal,
            _ => RevealState::Unanswered,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.state.current_index)
    }

    /// The question being played. `None` unless playing.
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        match (&self.session, self.status) {
            (Some(session), EngineState::Playing) => Some(session.current()),
            _ => None,
        }
    }

    pub fn score(&self) -> usize {
        self.session.as_ref().map(|s| s.state.score).unwrap_or(0)
    }

    pub fn history(&self) -> Option<&History> {
        self.session.as_ref().map(|s| &s.state.history)
    }

    pub fn sequence(&self) -> Option<&PlaySequence> {
        self.session.as_ref().map(|s| &s.sequence)
    }

    /// Fraction of the sequence already behind the current question.
    pub fn progress(&self) -> f64 {
        match (&self.session, self.status) {
            (_, EngineState::Finished) => 1.0,
            (Some(session), EngineState::Playing) => {
                session.state.current_index as f64 / session.sequence.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Whether the correct option may be marked on the current question.
    ///
    /// Instant mode only: after an explicit reveal, or straight away when the
    /// user's own pick is the correct one. Exam mode never shows it.
    pub fn correct_option_visible(&self) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        if self.mode() != Some(QuizMode::Instant) {
            return false;
        }
        match self.reveal_state() {
            RevealState::Unanswered => false,
            RevealState::Answered { chosen } => question.is_correct(chosen),
            RevealState::Revealed { .. } => true,
        }
    }
}

fn ignored<T>(operation: &str, violation: ProtocolViolation) -> Step<T> {
    tracing::debug!(operation, %violation, "ignored engine call");
    Step::Ignored(violation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    /// Questions whose correct answers are given by `keys`.
    fn sequence(keys: &[OptionKey]) -> PlaySequence {
        let questions = keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                Arc::new(
                    QuestionRecord::new(
                        format!("Câu {}. Question {i}", i + 1),
                        ["w".into(), "x".into(), "y".into(), "z".into()],
                        *key,
                    )
                    .unwrap(),
                )
            })
            .collect();
        PlaySequence::new(questions).unwrap()
    }

    fn playing(keys: &[OptionKey], mode: QuizMode) -> SessionEngine {
        let mut engine = SessionEngine::new();
        engine.start_session(sequence(keys), mode);
        engine
    }

    use OptionKey::{A, B, C, D};

    #[test]
    fn idle_engine_ignores_everything_but_start() {
        let mut engine = SessionEngine::new();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(
            engine.submit_answer(A).violation(),
            Some(ProtocolViolation::NotPlaying(EngineState::Idle))
        );
        assert!(engine.reveal_answer().is_ignored());
        assert!(engine.advance().is_ignored());
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.progress(), 0.0);
        assert!(engine.current_question().is_none());
    }

    #[test]
    fn exam_mode_scores_and_auto_advances() {
        let mut engine = playing(&[A, B, C], QuizMode::Exam);

        let first = engine.submit_answer(A).applied().unwrap();
        assert!(first.is_correct);
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.reveal_state(), RevealState::Unanswered);

        let second = engine.submit_answer(D).applied().unwrap();
        assert!(!second.is_correct);

        assert!(engine.submit_answer(C).is_applied());
        assert_eq!(engine.state(), EngineState::Finished);
        assert_eq!(engine.score(), 2);
        assert_eq!(engine.history().unwrap().len(), 3);
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn exam_mode_never_reveals() {
        let mut engine = playing(&[A, B], QuizMode::Exam);
        assert_eq!(
            engine.reveal_answer().violation(),
            Some(ProtocolViolation::RevealInExamMode)
        );
        let _ = engine.submit_answer(A);
        assert!(!engine.correct_option_visible());
    }

    #[test]
    fn instant_mode_waits_for_advance() {
        let mut engine = playing(&[B, A], QuizMode::Instant);

        assert!(engine.submit_answer(B).is_applied());
        assert_eq!(engine.reveal_state(), RevealState::Answered { chosen: B });
        assert_eq!(engine.current_index(), Some(0));
        // self-evidently correct: visible without a reveal
        assert!(engine.correct_option_visible());

        assert_eq!(
            engine.advance().applied(),
            Some(Progression::Next { index: 1 })
        );
        assert_eq!(engine.reveal_state(), RevealState::Unanswered);
        assert!(!engine.correct_option_visible());
        assert_eq!(engine.progress(), 0.5);
    }

    #[test]
    fn wrong_answer_hides_correct_option_until_revealed() {
        let mut engine = playing(&[C], QuizMode::Instant);
        let _ = engine.submit_answer(A);
        assert!(!engine.correct_option_visible());

        assert!(engine.reveal_answer().is_applied());
        assert_eq!(engine.reveal_state(), RevealState::Revealed { chosen: A });
        assert!(engine.correct_option_visible());
        assert_eq!(
            engine.reveal_answer().violation(),
            Some(ProtocolViolation::AlreadyRevealed)
        );

        assert_eq!(engine.advance().applied(), Some(Progression::Finished));
        assert_eq!(engine.state(), EngineState::Finished);
    }

    #[test]
    fn second_submission_is_ignored() {
        let mut engine = playing(&[A, B], QuizMode::Instant);
        let _ = engine.submit_answer(C);
        assert_eq!(
            engine.submit_answer(A).violation(),
            Some(ProtocolViolation::AlreadyAnswered)
        );
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.history().unwrap().len(), 1);
    }

    #[test]
    fn advance_and_reveal_need_an_answer() {
        let mut engine = playing(&[A, B], QuizMode::Instant);
        assert_eq!(
            engine.advance().violation(),
            Some(ProtocolViolation::NotAnswered)
        );
        assert_eq!(
            engine.reveal_answer().violation(),
            Some(ProtocolViolation::NotAnswered)
        );
        assert_eq!(engine.current_index(), Some(0));

        let mut exam = playing(&[A, B], QuizMode::Exam);
        assert_eq!(
            exam.advance().violation(),
            Some(ProtocolViolation::NotAnswered)
        );
    }

    #[test]
    fn finished_engine_ignores_everything_but_start() {
        let mut engine = playing(&[A], QuizMode::Exam);
        let _ = engine.submit_answer(A);
        assert_eq!(engine.state(), EngineState::Finished);

        let finished = Some(ProtocolViolation::NotPlaying(EngineState::Finished));
        assert_eq!(engine.submit_answer(A).violation(), finished);
        assert_eq!(engine.reveal_answer().violation(), finished);
        assert_eq!(engine.advance().violation(), finished);
        assert_eq!(engine.score(), 1);

        engine.start_session(sequence(&[B]), QuizMode::Instant);
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn restart_mid_session_discards_progress() {
        let mut engine = playing(&[A, A, A, A, A], QuizMode::Exam);
        let _ = engine.submit_answer(A);
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.score(), 1);

        engine.start_session(sequence(&[A, A, A, A, A]), QuizMode::Exam);
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.score(), 0);
        assert!(engine.history().unwrap().is_empty());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut engine = playing(&[A], QuizMode::Instant);
        engine.reset();
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.sequence().is_none());
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn score_matches_correct_events() {
        let keys = [A, B, C, D, A, B, C, D];
        let answers = [A, A, C, C, A, D, C, D];
        let mut engine = playing(&keys, QuizMode::Instant);
        for answer in answers {
            let _ = engine.submit_answer(answer);
            let _ = engine.advance();
        }
        assert_eq!(engine.state(), EngineState::Finished);
        assert_eq!(engine.score(), engine.history().unwrap().correct_count());
        assert_eq!(engine.score(), 5);
    }

    proptest! {
        #[test]
        fn score_counts_matching_answers_in_both_modes(
            rounds in prop::collection::vec((0usize..4, 0usize..4, any::<bool>()), 1..40),
            exam in any::<bool>(),
        ) {
            let mode = if exam { QuizMode::Exam } else { QuizMode::Instant };
            let keys: Vec<OptionKey> = rounds.iter().map(|(k, _, _)| OptionKey::ALL[*k]).collect();
            let mut engine = playing(&keys, mode);

            for (_, answer, reveal) in &rounds {
                prop_assert!(engine.submit_answer(OptionKey::ALL[*answer]).is_applied());
                if mode == QuizMode::Instant {
                    if *reveal {
                        prop_assert!(engine.reveal_answer().is_applied());
                    }
                    prop_assert!(engine.advance().is_applied());
                }
            }

            let matching = rounds.iter().filter(|(k, a, _)| k == a).count();
            prop_assert_eq!(engine.state(), EngineState::Finished);
            prop_assert_eq!(engine.score(), matching);
            prop_assert_eq!(engine.history().unwrap().correct_count(), matching);
            prop_assert_eq!(engine.history().unwrap().len(), rounds.len());
        }
    }
}
