//! Seam between the session provider and the remote auth API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::SessionUser;

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>, remember_me: bool) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The API answered with a non-success status.
    #[error("rejected by auth API ({status})")]
    Rejected {
        status: u16,
        /// `message` field of a JSON error body, when there was one.
        message: Option<String>,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed auth response: {0}")]
    Malformed(String),
}

impl AuthError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }
}

/// Credentialed (cookie-carrying) calls against the session API.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// `GET /api/auth/me`.
    async fn current_user(&self) -> Result<SessionUser, AuthError>;

    /// `POST /api/auth/login`; on success the transport keeps the session cookie.
    async fn login(&self, request: &LoginRequest) -> Result<SessionUser, AuthError>;

    /// `POST /api/auth/logout`.
    async fn logout(&self) -> Result<(), AuthError>;
}
