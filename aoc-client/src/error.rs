//! Error types for the AOC client

use crate::duration::WaitDuration;
use thiserror::Error;

/// Errors surfaced by [`AocClient`](crate::AocClient) operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// The session was rejected, or an authenticated endpoint answered with
    /// an unexpected status
    #[error("Invalid session: check your session cookie")]
    InvalidSession,

    /// The server reported that an answer was submitted too recently
    #[error("You gave an answer too recently, you have to wait: {wait}")]
    RateLimited {
        /// Wait time stated by the server
        wait: WaitDuration,
    },

    /// The submission page had a shape that could not be classified
    #[error("Unrecognised submission response: {0}")]
    SolveError(String),

    /// An unauthenticated endpoint answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    /// The request parameters are out of range
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to decode response as UTF-8
    #[error("Failed to decode response as UTF-8")]
    Encoding,

    /// Failed to parse HTML response
    #[error("Failed to parse HTML response")]
    HtmlParse,

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(String),
}

/// Failures raised by the transport before any classification happens
#[derive(Error, Debug)]
pub(crate) enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid HTTP status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to decode response as UTF-8")]
    Encoding,

    #[error("Invalid URL: {0}")]
    Url(String),
}

impl From<TransportError> for ClientError {
    /// Authenticated endpoints answer bad or expired sessions with 400/500,
    /// so every non-success status is treated as a session failure.
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Request(e) => ClientError::Request(e),
            TransportError::Status(_) => ClientError::InvalidSession,
            TransportError::Encoding => ClientError::Encoding,
            TransportError::Url(message) => ClientError::ClientInit(message),
        }
    }
}
