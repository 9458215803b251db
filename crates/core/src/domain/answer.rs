use super::{AnswerId, Difficulty, DomainError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnswerName(String);

impl AnswerName {
    pub const MAX_LEN: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::EmptyAnswerName);
        }

        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(DomainError::InvalidAnswerNameLength(len));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: AnswerId,
    pub name: String,
    pub difficulty: Difficulty,
}
