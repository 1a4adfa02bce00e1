use thiserror::Error;

/// Errors raised anywhere between reading credentials and submitting a batch update.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Missing or invalid local credentials / settings.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The OAuth token exchange did not yield a usable token.
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("HTTP {status} {method} {url}: {body}")]
    Http {
        method: String,
        url: String,
        status: u16,
        body: String,
    },
    /// The request never produced a response (connect failure, timeout, bad body).
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    TabNotFound(String),
    #[error("Isolation violation: marker found outside target tab in {0}")]
    IsolationViolation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
