use sekolah_core::AppError;

/// Error type for override store operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("invalid override: {0}")]
    Invalid(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    /// HTTP status equivalent, used when a store error has to be surfaced over HTTP.
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Server { status, .. } => *status,
            ClientError::Network(e) => e.status().map(|s| s.as_u16()).unwrap_or(502),
            ClientError::Decode(_) => 502,
            ClientError::Invalid(_) => 422,
            ClientError::NotFound(_) => 404,
            ClientError::Conflict(_) => 409,
            ClientError::Unavailable(_) => 503,
        }
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        ClientError::Invalid(err.error.to_string())
    }
}
