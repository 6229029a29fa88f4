//! Error types for the control-plane client.

use thiserror::Error;

/// Result type alias for control-plane operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors raised by the control-plane client.
///
/// `Credentials` and `Client` only occur while constructing a client. Every
/// failed read surfaces as `InvalidArgument` or `Request`; callers treat
/// those as one opaque failure and propagate the message.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to load in-cluster credentials: {0}")]
    Credentials(String),

    #[error("failed to create API client: {0}")]
    Client(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Request(String),
}
