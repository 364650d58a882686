pub mod challenge;
pub mod practice;
pub mod question;
pub mod stopwatch;

pub use challenge::{Challenge, ChallengeStatus};
pub use practice::{AnswerOutcome, PracticeSession, WrongAnswerRule};
pub use question::{Direction, GameMode, QuestionState, OPTION_COUNT};
pub use stopwatch::{Countdown, Stopwatch};
