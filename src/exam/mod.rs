pub mod orchestrator;
pub mod result;

pub use orchestrator::{TestAnswer, TimedTest};
pub use result::{QuestionDetail, TestResult};
