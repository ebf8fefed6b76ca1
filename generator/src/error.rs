use regret_shared::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("GEMINI_API_KEY (or VITE_GEMINI_API_KEY) must be set")]
    MissingApiKey,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed media payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("API error: {0}")]
    Provider(String),

    #[error("no media in response")]
    EmptyResult,

    #[error("operation {0} did not finish in time")]
    PollTimeout(String),
}

/// How long the batch runner backs off before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// The provider answered with an error body.
    Provider,
    /// Nothing usable came back, or the request never completed.
    Transient,
}

impl GeneratorError {
    pub fn retry_class(&self) -> RetryClass {
        match self {
            GeneratorError::Provider(_) => RetryClass::Provider,
            _ => RetryClass::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert_eq!(GeneratorError::Provider("quota".into()).retry_class(), RetryClass::Provider);
        assert_eq!(GeneratorError::EmptyResult.retry_class(), RetryClass::Transient);
        assert_eq!(GeneratorError::PollTimeout("op".into()).retry_class(), RetryClass::Transient);
    }
}
