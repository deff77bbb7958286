use thiserror::Error;

/// Errors returned by the configuration API client.
///
/// SECURITY: Error messages must NEVER contain the API password.
#[derive(Debug, Error)]
pub enum ConfigApiError {
    /// Credentials were rejected
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The addressed configuration object does not exist
    #[error("configuration object not found: {path}")]
    NotFound { path: String },

    /// Network-level error (connection failed, timeout, TLS, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The object's schemas URN names a subtype this crate does not model
    #[error("unsupported {object} type: '{type_}'")]
    UnknownType { object: String, type_: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConfigApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigApiError::NotFound { .. })
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        ConfigApiError::InvalidResponse {
            message: message.into(),
        }
    }
}
