// ABOUTME: Error types for confab-client
// ABOUTME: Classifies transport, protocol, and local precondition failures

use thiserror::Error;

/// Errors that can occur in confab-client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Backend error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not connected to backend")]
    NotConnected,

    #[error("A connect is already in progress")]
    ConnectInProgress,

    #[error("A submission is already outstanding")]
    SubmissionInFlight,

    #[error("Message is empty")]
    EmptyMessage,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            ClientError::Connection(err.to_string())
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Api(format!("backend returned {}", status))
        } else {
            ClientError::Api(err.to_string())
        }
    }
}
