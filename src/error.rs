use thiserror::Error;

/// Why a webhook delivery could not be processed.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The caller sent something we will never act on. Not retried.
    #[error("{0}")]
    InvalidRequest(String),

    /// Talking to the provider failed part-way through the invocation.
    #[error("Provider request failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}
