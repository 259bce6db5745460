//! Error handling for the job matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ranking failed: {0}")]
    RankingFailed(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, JobMatcherError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for JobMatcherError {
    fn from(err: anyhow::Error) -> Self {
        JobMatcherError::RankingFailed(err.to_string())
    }
}

impl JobMatcherError {
    /// Shorthand used by the ranking core for precondition violations.
    pub fn invalid(message: impl Into<String>) -> Self {
        JobMatcherError::InvalidInput(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, JobMatcherError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_helper() {
        let err = JobMatcherError::invalid("top_k must be at least 1");
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Invalid input: top_k must be at least 1");
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: JobMatcherError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, JobMatcherError::RankingFailed(_)));
        assert!(!err.is_invalid_input());
    }
}
