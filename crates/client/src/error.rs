use serde_json::Value;
use thiserror::Error;

use storefront_session::AuthError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(status, _) => Some(*status),
            _ => None,
        }
    }

    /// `message` of a JSON error body, if the body was one.
    pub fn api_message(&self) -> Option<String> {
        let ClientError::Api(_, body) = self else {
            return None;
        };
        serde_json::from_str::<Value>(body)
            .ok()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        let message = err.api_message();
        match err {
            ClientError::Api(status, _) => AuthError::rejected(status, message),
            ClientError::Network(e) => AuthError::Network(e),
            ClientError::Parse(e) => AuthError::Malformed(e),
        }
    }
}
