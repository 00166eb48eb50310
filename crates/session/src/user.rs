//! The signed-in user, as the session API returns it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque user record.
///
/// The session layer never interprets it beyond a few convenience readers;
/// views that need more read the raw payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionUser(Value);

impl SessionUser {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }

    pub fn into_payload(self) -> Value {
        self.0
    }

    /// `userId` as a display string (the API sends a number).
    pub fn user_id(&self) -> Option<String> {
        match self.0.get("userId")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.str_field("firstName")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.str_field("lastName")
    }

    /// "First Last", falling back to the email address.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name(), self.last_name()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if parts.is_empty() {
            self.email().map(str::to_string)
        } else {
            Some(parts.join(" "))
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}
