//! Kana quiz engine: question selection and distractors, practice scoring,
//! lifetime statistics, timed tests with persisted history, and a countdown
//! challenge. UI-less; frontends drive everything through [`Trainer`].

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod exam;
pub mod generator;
pub mod session;
pub mod store;
pub mod trainer;

pub use catalog::{CharacterEntry, KanaCatalog, Script};
pub use config::Preferences;
pub use engine::{LifetimeStats, SessionLedger};
pub use error::TrainerError;
pub use exam::{TestAnswer, TestResult};
pub use session::{AnswerOutcome, ChallengeStatus, GameMode, QuestionState};
pub use trainer::Trainer;
