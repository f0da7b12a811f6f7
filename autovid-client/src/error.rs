//! Error types for the AutoVid client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the generation service
///
/// Every failure is terminal for that attempt: there is no automatic
/// retry and no global error channel. `Validation` and `Busy` are raised
/// before any network call is made.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure before a response was received
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Service answered with a non-2xx status
    #[error("service error (status {status}): {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Error message drawn from the response body
        message: String,
    },

    /// Response body was not valid JSON or missed the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Caller-side precondition violated; no request was issued
    #[error("validation error: {0}")]
    Validation(String),

    /// An operation is already in flight on this instance
    #[error("operation already in flight: {0}")]
    Busy(&'static str),

    /// The request was superseded before its response was applied
    #[error("request cancelled: {0}")]
    Cancelled(&'static str),
}

impl ClientError {
    /// Create an HTTP error from status code and body message
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status >= 500)
    }

    /// Check if this error was raised before any network call
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Busy(_) | Self::Cancelled(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_carries_status() {
        let err = ClientError::http(500, "renderer crashed");
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("renderer crashed"));
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_local_errors() {
        assert!(ClientError::Validation("niche must not be empty".into()).is_local());
        assert!(ClientError::Busy("prompt request in flight").is_local());
        assert!(!ClientError::http(404, "not found").is_local());
    }
}
