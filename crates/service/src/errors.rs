use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no JSON data received")]
    EmptyPayload,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl ServiceError {
    /// Short machine-friendly tag for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyPayload => "empty",
            Self::InvalidJson(_) => "invalid_json",
        }
    }
}
