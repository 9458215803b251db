use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: String,
    pub client_ip: Option<String>,
}

impl SearchQuery {
    pub fn new(name: impl Into<String>, client_ip: Option<String>) -> Self {
        Self {
            name: name.into(),
            client_ip,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourcingError {
    #[error("image search timed out")]
    Timeout,
    #[error("image search unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourcingError>;

    async fn download(&self, links: Vec<String>) -> Vec<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sourcing_errors_have_readable_messages() {
        assert_eq!(SourcingError::Timeout.to_string(), "image search timed out");
        assert_eq!(
            SourcingError::Unavailable("connection refused".to_string()).to_string(),
            "image search unavailable: connection refused"
        );
    }
}
