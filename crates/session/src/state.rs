//! Session state.

use crate::user::SessionUser;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Provider created, no check issued yet.
    Unchecked,
    /// Initial session check in flight.
    Checking,
    Authenticated,
    Anonymous,
}

/// Internal state. The user only exists inside `Authenticated`, so the user
/// and the authenticated flag cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    Unchecked,
    Checking,
    Authenticated(SessionUser),
    Anonymous,
}

impl Phase {
    pub(crate) fn status(&self) -> SessionStatus {
        match self {
            Phase::Unchecked => SessionStatus::Unchecked,
            Phase::Checking => SessionStatus::Checking,
            Phase::Authenticated(_) => SessionStatus::Authenticated,
            Phase::Anonymous => SessionStatus::Anonymous,
        }
    }

    /// True until the initial check has resolved one way or the other.
    pub(crate) fn is_loading(&self) -> bool {
        matches!(self, Phase::Unchecked | Phase::Checking)
    }

    pub(crate) fn snapshot(&self) -> Session {
        let user = match self {
            Phase::Authenticated(user) => Some(user.clone()),
            _ => None,
        };
        Session {
            is_authenticated: user.is_some(),
            user,
            loading: self.is_loading(),
            status: self.status(),
        }
    }
}

/// Read-only view of the session handed to consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub status: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_keeps_user_and_flag_together() {
        let anon = Phase::Anonymous.snapshot();
        assert_eq!(anon.user, None);
        assert!(!anon.is_authenticated);
        assert!(!anon.loading);

        let auth = Phase::Authenticated(SessionUser::new(json!({"userId": 1}))).snapshot();
        assert!(auth.user.is_some());
        assert!(auth.is_authenticated);
        assert_eq!(auth.status, SessionStatus::Authenticated);
    }

    #[test]
    fn loading_only_before_first_resolution() {
        assert!(Phase::Unchecked.snapshot().loading);
        assert!(Phase::Checking.snapshot().loading);
        assert!(!Phase::Anonymous.snapshot().loading);
    }
}
