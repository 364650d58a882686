use thiserror::Error;

/// Errors surfaced by `Trainer` operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TrainerError {
    #[error("selection pool too small: need at least {needed} characters, have {available}")]
    InsufficientPool { needed: usize, available: usize },

    #[error("no stored test result with id {0:?}")]
    ResultNotFound(String),
}
