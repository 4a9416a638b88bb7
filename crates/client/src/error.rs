//! Client error taxonomy.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tenantdesk_auth::DecodeError;

use crate::storage::StorageError;

/// Error body returned by the API: `{error, errors?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,

    /// Field-level validation messages, keyed by field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Why the server rejected the credential on a `401`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("invalid token")]
    InvalidToken,

    #[error("expired token")]
    ExpiredToken,

    #[error("missing token")]
    MissingToken,

    /// Any `401` whose reason the client does not recognize.
    #[error("unauthorized")]
    Unauthorized,
}

impl AuthFailure {
    /// Map the server's `error` text to a reason.
    pub fn from_server_message(message: &str) -> Self {
        match message {
            "invalid token" => Self::InvalidToken,
            "expired token" => Self::ExpiredToken,
            "missing token" => Self::MissingToken,
            _ => Self::Unauthorized,
        }
    }

    /// Text shown on the login screen after a forced logout.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidToken => "Your session is no longer valid. Please log in again.",
            Self::ExpiredToken => "Your session has expired. Please log in again.",
            Self::MissingToken => "Please log in to continue.",
            Self::Unauthorized => "You are not authorized. Please log in again.",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// `401`: the session has already been torn down.
    #[error("unauthorized: {0}")]
    Unauthorized(AuthFailure),

    /// `403`: the user stays logged in but may not do this.
    #[error("permission denied")]
    PermissionDenied(Option<ErrorPayload>),

    /// Any other non-success status. `payload` is `None` when the body was not
    /// a recognizable error payload.
    #[error("request failed with status {status}")]
    Server {
        status: StatusCode,
        payload: Option<ErrorPayload>,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid request path: {0}")]
    InvalidPath(#[from] url::ParseError),
}

impl ApiError {
    /// The server-provided error payload, when there is one.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::PermissionDenied(payload) | Self::Server { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Self::PermissionDenied(_) => Some(StatusCode::FORBIDDEN),
            Self::Server { status, .. } => Some(*status),
            Self::Network(e) => e.status(),
            Self::InvalidPath(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("token cannot be sent as a header: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
}

/// Failure of the credential exchange. Handed to the login form as is.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("server issued an unreadable token: {0}")]
    Decode(#[from] DecodeError),

    #[error("could not store session: {0}")]
    Session(#[from] SessionError),
}
