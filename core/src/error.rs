//! Error types for the DIA client.
//!
//! # Design
//! Each variant corresponds to one failure class a caller may want to react
//! to differently: a broken configuration is fatal before any I/O, a missing
//! session is a caller bug, and upstream rejections carry the upstream `msg`
//! verbatim. Transport failures (including a body that is not JSON) never
//! touch session state; during login they surface as `Authentication`.

use crate::protocol::Operation;

pub type Result<T> = std::result::Result<T, DiaError>;

/// Errors returned by `DiaClient` build/parse methods and the async host.
#[derive(Debug, thiserror::Error)]
pub enum DiaError {
    /// A required configuration field is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A session-scoped operation was issued before a successful login.
    #[error("you must login before calling {operation}")]
    Precondition { operation: Operation },

    /// Upstream rejected the login.
    #[error("login failed: {0}")]
    Authentication(String),

    /// Upstream rejected the logout; the session is kept.
    #[error("logout failed: {0}")]
    Session(String),

    /// Upstream answered a scoped call with a code other than `"200"`.
    #[error("{operation} failed: {message}")]
    Request { operation: Operation, message: String },

    /// Network-level failure, or a response body that is not JSON.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl DiaError {
    /// Upstream message for rejections, `None` for local failures.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            DiaError::Authentication(msg) | DiaError::Session(msg) => Some(msg),
            DiaError::Request { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Fold a transport failure into a login rejection carrying its text.
    pub fn into_authentication(self) -> Self {
        match self {
            DiaError::Transport(msg) => DiaError::Authentication(msg),
            other => other,
        }
    }
}
