//! Error types for console API calls

use horizon_core::ValidationError;
use thiserror::Error;

/// Result type alias for console API calls
pub type Result<T> = std::result::Result<T, ApiError>;

/// Classified failure of an API call
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401: the session has been logged out
    #[error("Session expired. Please log in again.")]
    AuthExpired,

    /// 403
    #[error("You do not have permission to access this resource.")]
    Forbidden,

    /// 404
    #[error("The requested resource was not found.")]
    NotFound,

    /// Any 5xx status
    #[error("Server error. Please try again later.")]
    ServerError { status: u16 },

    /// Any other 4xx status, with the message extracted from the body
    #[error("{message}")]
    ClientError { status: u16, message: String },

    /// Every attempt exceeded the per-attempt ceiling
    #[error("Request timed out. Please check your connection.")]
    Timeout,

    /// A one-shot fetch failed; carries the extracted message
    #[error("{0}")]
    Fetch(String),

    /// The server could not be reached
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// The response could not be turned into the expected shape
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl ApiError {
    /// Whether the executor may retry after this error
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::NetworkFailure(_))
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }

    /// HTTP status behind this error, when there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthExpired => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::ServerError { status } | ApiError::ClientError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Classify a transport-level reqwest failure
    pub(crate) fn from_transport(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Validation(ValidationError::Invalid(format!(
                "Malformed response body: {}",
                e
            )))
        } else {
            ApiError::NetworkFailure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages() {
        assert_eq!(
            ApiError::AuthExpired.to_string(),
            "Session expired. Please log in again."
        );
        assert_eq!(
            ApiError::ServerError { status: 503 }.to_string(),
            "Server error. Please try again later."
        );
        assert_eq!(
            ApiError::ClientError {
                status: 422,
                message: "bad features".into()
            }
            .to_string(),
            "bad features"
        );
    }

    #[test]
    fn only_timeout_and_network_are_transient() {
        assert!(ApiError::Timeout.is_transient());
        assert!(ApiError::NetworkFailure("refused".into()).is_transient());
        assert!(!ApiError::NotFound.is_transient());
        assert!(!ApiError::ServerError { status: 500 }.is_transient());
        assert!(!ApiError::AuthExpired.is_transient());
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Forbidden.status(), Some(403));
        assert_eq!(ApiError::Timeout.status(), None);
    }
}
