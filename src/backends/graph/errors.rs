use thiserror::Error;

/// Typed error enum for media API operations
///
/// Every variant carries owned strings so the error can be cloned into
/// observable view model state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or invalid client configuration, detected before any request is sent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network/connection errors (timeout, connection refused, etc.)
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("HTTP error: {message} (status: {status})")]
    Http { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Network and HTTP failures both count as transport failures
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Http { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create an error from a reqwest error
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Transport(format!("Request timeout: {}", error))
        } else if error.is_connect() {
            ApiError::Transport(format!("Connection failed: {}", error))
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(format!("Request error: {}", error))
        }
    }

    /// Create an error from an HTTP status code and response body
    pub fn from_status(status: u16, body: String) -> Self {
        ApiError::Http {
            status,
            message: body,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}
