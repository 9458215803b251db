use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid difficulty code: {0}. code must be in [0, 2]")]
    InvalidDifficultyCode(i16),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("answer name must not be empty")]
    EmptyAnswerName,
    #[error("invalid answer name length: {0}. name must be at most 100 characters")]
    InvalidAnswerNameLength(usize),
    #[error("option count must be at least 1")]
    InvalidOptionCount,
}
