//! Append-only log of answered questions.

use serde::{Deserialize, Serialize};

use crate::model::OptionKey;

/// A single answer given during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    /// Position of the question in the play sequence.
    pub question_index: usize,
    /// The option the user picked.
    pub chosen_key: OptionKey,
    /// Whether the pick matched the correct key.
    pub is_correct: bool,
}

/// Every answer of one session, in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    events: Vec<AnswerEvent>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Returns `false` and leaves the log untouched if the
    /// question already has an answer.
    pub fn record(&mut self, event: AnswerEvent) -> bool {
        if self.get(event.question_index).is_some() {
            return false;
        }
        self.events.push(event);
        true
    }

    /// The answer given to a question, if any.
    pub fn get(&self, question_index: usize) -> Option<&AnswerEvent> {
        self.events
            .iter()
            .find(|e| e.question_index == question_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnswerEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of correct answers.
    pub fn correct_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_correct).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(index: usize, key: OptionKey, correct: bool) -> AnswerEvent {
        AnswerEvent {
            question_index: index,
            chosen_key: key,
            is_correct: correct,
        }
    }

    #[test]
    fn records_in_order() {
        let mut history = History::new();
        assert!(history.record(event(0, OptionKey::A, true)));
        assert!(history.record(event(1, OptionKey::C, false)));

        let indices: Vec<usize> = history.iter().map(|e| e.question_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(history.correct_count(), 1);
        assert_eq!(history.get(1).unwrap().chosen_key, OptionKey::C);
        assert!(history.get(2).is_none());
    }

    #[test]
    fn second_answer_for_same_question_is_refused() {
        let mut history = History::new();
        assert!(history.record(event(0, OptionKey::A, false)));
        assert!(!history.record(event(0, OptionKey::B, true)));
        assert_eq!(history.len(), 1);
        assert_eq!(history.correct_count(), 0);
    }
}
