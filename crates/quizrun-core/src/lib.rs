//! Question banks, quiz sessions and scored reports.
//!
//! This crate defines the question model, bank loading, the session state
//! machine, and the report that the rest of quizrun builds on.

pub mod bank;
pub mod configurator;
pub mod engine;
pub mod error;
pub mod history;
pub mod model;
pub mod normalize;
pub mod quiz;
pub mod report;

pub use bank::{BankSource, DirectorySource, QuestionStore};
pub use configurator::{build_play_sequence, Configurator, PlaySequence, SessionConfig};
pub use engine::{EngineState, ProtocolViolation, RevealState, SessionEngine, Step};
pub use error::{ConfigError, DataError};
pub use model::{BankEntry, OptionKey, QuestionRecord, QuizMode};
pub use quiz::{OptionView, Quiz, QuestionView};
pub use report::{build_report, Report, Tier};
