//! Session provider: single source of truth for "who is the current user".
//!
//! One provider lives for the whole tab (created on app start, shut down on
//! app close) and is handed to every view that needs the session. All remote
//! calls go through the [`AuthBackend`], which carries the session cookie.
//!
//! ## Ordering
//!
//! Every operation takes a ticket when it starts. A session check result is
//! only committed if no operation that started later has already committed,
//! so a slow check can never overwrite a newer login or logout. Login and
//! logout results reflect a cookie change on the server and are only
//! superseded by a later login or logout.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::task::JoinHandle;

use crate::backend::{AuthBackend, AuthError, LoginRequest};
use crate::state::{Phase, Session, SessionStatus};
use crate::user::SessionUser;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Result of [`SessionProvider::login`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success(SessionUser),
    /// Human-readable reason, ready to show under the login form.
    Failure(String),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success(_))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            LoginOutcome::Success(user) => Some(user),
            LoginOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoginOutcome::Success(_) => None,
            LoginOutcome::Failure(msg) => Some(msg),
        }
    }

    fn from_error(err: &AuthError) -> Self {
        let msg = match err {
            AuthError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            AuthError::Rejected { .. } | AuthError::Malformed(_) => LOGIN_FAILED_MESSAGE.to_string(),
            AuthError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
        };
        LoginOutcome::Failure(msg)
    }
}

/// Result of [`SessionProvider::logout`]. Logout always succeeds locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Whether the API confirmed the logout. `false` means the server-side
    /// session may still be alive until its cookie expires.
    pub remote_acknowledged: bool,
}

/// Why a protected view cannot render yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGate {
    /// Initial session check still running; show a spinner.
    Loading,
    /// No session; send the user to the login page.
    RedirectToLogin,
}

impl AuthGate {
    pub const LOGIN_PATH: &'static str = "/login";
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Check,
    Login,
    Logout,
}

impl Op {
    fn as_str(self) -> &'static str {
        match self {
            Op::Check => "session check",
            Op::Login => "login",
            Op::Logout => "logout",
        }
    }

    /// Login and logout change the server-side cookie.
    fn is_write(self) -> bool {
        matches!(self, Op::Login | Op::Logout)
    }
}

#[derive(Debug)]
struct Slot {
    phase: Phase,
    /// Ticket of the newest operation that has committed a phase.
    committed: u64,
    /// Ticket of the newest login or logout that has committed.
    committed_write: u64,
}

pub struct SessionProvider {
    backend: Arc<dyn AuthBackend>,
    slot: RwLock<Slot>,
    issued: AtomicU64,
    disposed: AtomicBool,
}

impl core::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionProvider")
            .field("session", &self.session())
            .field("disposed", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}

impl SessionProvider {
    /// Create a provider in the `Unchecked` state. No request is issued.
    pub fn new(backend: Arc<dyn AuthBackend>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            slot: RwLock::new(Slot {
                phase: Phase::Unchecked,
                committed: 0,
                committed_write: 0,
            }),
            issued: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
        })
    }

    /// Create a provider and wait for the initial session check.
    pub async fn start(backend: Arc<dyn AuthBackend>) -> Arc<Self> {
        let provider = Self::new(backend);
        provider.check_auth_status().await;
        provider
    }

    /// Create a provider and run the initial session check in the background.
    ///
    /// The provider is already in `Checking` when this returns.
    pub fn spawn(backend: Arc<dyn AuthBackend>) -> (Arc<Self>, JoinHandle<()>) {
        let provider = Self::new(backend);
        let ticket = provider.begin_check();
        let task = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move {
                provider.finish_check(ticket).await;
            }
        });
        (provider, task)
    }

    /// Ask the API who is signed in and update the session accordingly.
    pub async fn check_auth_status(&self) -> SessionStatus {
        let ticket = self.begin_check();
        self.finish_check(ticket).await;
        self.status()
    }

    fn begin_check(&self) -> u64 {
        let ticket = self.next_ticket();
        self.with_slot(|slot| {
            if matches!(slot.phase, Phase::Unchecked) {
                slot.phase = Phase::Checking;
                tracing::debug!("session check started");
            }
        });
        ticket
    }

    async fn finish_check(&self, ticket: u64) {
        let next = match self.backend.current_user().await {
            Ok(user) => Phase::Authenticated(user),
            Err(err) => {
                tracing::debug!(error = %err, "no active session");
                Phase::Anonymous
            }
        };
        self.commit(ticket, next, Op::Check);
    }

    /// Sign in with credentials. The session only becomes authenticated on
    /// success; a failure never changes an existing session.
    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> LoginOutcome {
        let ticket = self.next_ticket();
        let request = LoginRequest::new(email, password, remember_me);

        match self.backend.login(&request).await {
            Ok(user) => {
                if !self.commit(ticket, Phase::Authenticated(user.clone()), Op::Login) {
                    tracing::warn!(ticket, "login result not committed; a newer login or logout already settled the session");
                    return LoginOutcome::Failure(LOGIN_FAILED_MESSAGE.to_string());
                }
                tracing::info!(user_id = ?user.user_id(), "login succeeded");
                LoginOutcome::Success(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "login failed");
                // Nobody has checked the session yet: settle on anonymous.
                self.with_slot(|slot| {
                    if !self.is_shut_down() && matches!(slot.phase, Phase::Unchecked) {
                        slot.phase = Phase::Anonymous;
                    }
                });
                LoginOutcome::from_error(&err)
            }
        }
    }

    /// Sign out. Local state is cleared before the remote call and stays
    /// cleared whatever the API answers.
    pub async fn logout(&self) -> LogoutOutcome {
        let ticket = self.next_ticket();
        self.commit(ticket, Phase::Anonymous, Op::Logout);

        match self.backend.logout().await {
            Ok(()) => {
                tracing::info!("logged out");
                LogoutOutcome {
                    remote_acknowledged: true,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote logout failed; local session cleared anyway");
                LogoutOutcome {
                    remote_acknowledged: false,
                }
            }
        }
    }

    /// Tear the provider down. In-flight results are discarded from now on.
    pub fn shutdown(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            tracing::debug!("session provider shut down");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn session(&self) -> Session {
        self.read_phase(Phase::snapshot)
    }

    pub fn status(&self) -> SessionStatus {
        self.read_phase(Phase::status)
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.read_phase(|phase| match phase {
            Phase::Authenticated(user) => Some(user.clone()),
            _ => None,
        })
    }

    /// Pure read; never issues a request.
    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.read_phase(Phase::is_loading)
    }

    /// Gate for protected views.
    pub fn require_authenticated(&self) -> Result<SessionUser, AuthGate> {
        self.read_phase(|phase| match phase {
            Phase::Authenticated(user) => Ok(user.clone()),
            Phase::Unchecked | Phase::Checking => Err(AuthGate::Loading),
            Phase::Anonymous => Err(AuthGate::RedirectToLogin),
        })
    }

    fn next_ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn commit(&self, ticket: u64, next: Phase, op: Op) -> bool {
        if self.is_shut_down() {
            tracing::debug!(op = op.as_str(), ticket, "provider shut down; dropping result");
            return false;
        }
        self.with_slot(|slot| {
            let floor = if op.is_write() {
                slot.committed_write
            } else {
                slot.committed
            };
            if ticket < floor {
                tracing::debug!(op = op.as_str(), ticket, floor, "dropping stale session result");
                return false;
            }
            tracing::debug!(op = op.as_str(), ticket, status = ?next.status(), "session updated");
            slot.phase = next;
            slot.committed = slot.committed.max(ticket);
            if op.is_write() {
                slot.committed_write = ticket;
            }
            true
        })
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut Slot) -> T) -> T {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut slot)
    }

    fn read_phase<T>(&self, f: impl FnOnce(&Phase) -> T) -> T {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        f(&slot.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Scripted backend: each call pops the next canned answer.
    #[derive(Default)]
    struct ScriptedBackend {
        me: Mutex<VecDeque<Result<SessionUser, AuthError>>>,
        login: Mutex<VecDeque<Result<SessionUser, AuthError>>>,
        logout: Mutex<VecDeque<Result<(), AuthError>>>,
        /// Holds the next `current_user` call until released.
        me_gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
        /// Holds the next `login` call until released.
        login_gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
        login_requests: Mutex<Vec<LoginRequest>>,
    }

    impl ScriptedBackend {
        fn me(self, answer: Result<SessionUser, AuthError>) -> Self {
            self.me.lock().unwrap().push_back(answer);
            self
        }

        fn login(self, answer: Result<SessionUser, AuthError>) -> Self {
            self.login.lock().unwrap().push_back(answer);
            self
        }

        fn logout(self, answer: Result<(), AuthError>) -> Self {
            self.logout.lock().unwrap().push_back(answer);
            self
        }

        /// Returns (entered, release): `entered` fires when the gated call
        /// starts, `release` lets it finish.
        fn gate_me(&self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
            let (entered_tx, entered_rx) = oneshot::channel();
            let (release_tx, release_rx) = oneshot::channel();
            *self.me_gate.lock().unwrap() = Some((entered_tx, release_rx));
            (entered_rx, release_tx)
        }

        fn gate_login(&self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
            let (entered_tx, entered_rx) = oneshot::channel();
            let (release_tx, release_rx) = oneshot::channel();
            *self.login_gate.lock().unwrap() = Some((entered_tx, release_rx));
            (entered_rx, release_tx)
        }
    }

    #[async_trait::async_trait]
    impl AuthBackend for ScriptedBackend {
        async fn current_user(&self) -> Result<SessionUser, AuthError> {
            let gate = self.me_gate.lock().unwrap().take();
            let answer = self
                .me
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AuthError::rejected(401, None)));
            if let Some((entered, release)) = gate {
                let _ = entered.send(());
                let _ = release.await;
            }
            answer
        }

        async fn login(&self, request: &LoginRequest) -> Result<SessionUser, AuthError> {
            self.login_requests.lock().unwrap().push(request.clone());
            let gate = self.login_gate.lock().unwrap().take();
            let answer = self
                .login
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AuthError::Network("no script".into())));
            if let Some((entered, release)) = gate {
                let _ = entered.send(());
                let _ = release.await;
            }
            answer
        }

        async fn logout(&self) -> Result<(), AuthError> {
            self.logout.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    fn user(id: u64) -> SessionUser {
        SessionUser::new(json!({"userId": id, "email": format!("user{id}@example.com")}))
    }

    #[tokio::test]
    async fn new_provider_is_loading_until_checked() {
        let provider = SessionProvider::new(Arc::new(ScriptedBackend::default()));
        let session = provider.session();
        assert!(session.loading);
        assert_eq!(session.status, SessionStatus::Unchecked);
        assert_eq!(provider.require_authenticated(), Err(AuthGate::Loading));
    }

    #[tokio::test]
    async fn unauthorized_check_settles_anonymous() {
        let backend = ScriptedBackend::default().me(Err(AuthError::rejected(401, None)));
        let provider = SessionProvider::start(Arc::new(backend)).await;

        let session = provider.session();
        assert_eq!(session.status, SessionStatus::Anonymous);
        assert!(!session.loading);
        assert_eq!(session.user, None);
        assert!(!session.is_authenticated);
        assert_eq!(provider.require_authenticated(), Err(AuthGate::RedirectToLogin));
    }

    #[tokio::test]
    async fn network_error_during_check_settles_anonymous() {
        let backend = ScriptedBackend::default().me(Err(AuthError::Network("refused".into())));
        let provider = SessionProvider::start(Arc::new(backend)).await;
        assert_eq!(provider.status(), SessionStatus::Anonymous);
        assert!(!provider.is_loading());
    }

    #[tokio::test]
    async fn successful_check_authenticates() {
        let backend = ScriptedBackend::default().me(Ok(user(7)));
        let provider = SessionProvider::start(Arc::new(backend)).await;
        assert!(provider.is_authenticated());
        assert_eq!(provider.user(), Some(user(7)));
        assert_eq!(provider.require_authenticated(), Ok(user(7)));
    }

    #[tokio::test]
    async fn spawn_enters_checking_immediately() {
        let backend = Arc::new(ScriptedBackend::default().me(Ok(user(1))));
        let (entered, release) = backend.gate_me();
        let (provider, task) = SessionProvider::spawn(backend.clone());

        assert_eq!(provider.status(), SessionStatus::Checking);
        assert!(provider.session().loading);

        entered.await.unwrap();
        release.send(()).unwrap();
        task.await.unwrap();
        assert!(provider.is_authenticated());
        assert!(!provider.is_loading());
    }

    #[tokio::test]
    async fn bad_credentials_return_server_message_and_stay_anonymous() {
        let backend = ScriptedBackend::default()
            .me(Err(AuthError::rejected(401, None)))
            .login(Err(AuthError::rejected(
                401,
                Some("Invalid credentials".into()),
            )));
        let backend = Arc::new(backend);
        let provider = SessionProvider::start(backend.clone()).await;

        let outcome = provider.login("a@b.com", "wrong", false).await;
        assert_eq!(outcome, LoginOutcome::Failure("Invalid credentials".into()));
        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some("Invalid credentials"));
        assert_eq!(provider.status(), SessionStatus::Anonymous);
        assert_eq!(provider.user(), None);

        let sent = backend.login_requests.lock().unwrap().clone();
        assert_eq!(sent, vec![LoginRequest::new("a@b.com", "wrong", false)]);
    }

    #[tokio::test]
    async fn login_failure_messages() {
        let backend = ScriptedBackend::default()
            .login(Err(AuthError::rejected(500, None)))
            .login(Err(AuthError::Network("timeout".into())))
            .login(Err(AuthError::Malformed("not json".into())));
        let provider = SessionProvider::new(Arc::new(backend));

        assert_eq!(
            provider.login("a@b.com", "pw", false).await.error(),
            Some(LOGIN_FAILED_MESSAGE)
        );
        assert_eq!(
            provider.login("a@b.com", "pw", false).await.error(),
            Some(NETWORK_ERROR_MESSAGE)
        );
        assert_eq!(
            provider.login("a@b.com", "pw", false).await.error(),
            Some(LOGIN_FAILED_MESSAGE)
        );
        // A failed login before any check settles the session as anonymous.
        assert_eq!(provider.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn failed_login_keeps_existing_session() {
        let backend = ScriptedBackend::default()
            .me(Ok(user(3)))
            .login(Err(AuthError::rejected(401, Some("Invalid credentials".into()))));
        let provider = SessionProvider::start(Arc::new(backend)).await;

        let outcome = provider.login("other@b.com", "nope", true).await;
        assert!(!outcome.is_success());
        assert_eq!(provider.user(), Some(user(3)));
    }

    #[tokio::test]
    async fn login_success_authenticates() {
        let backend = ScriptedBackend::default()
            .me(Err(AuthError::rejected(401, None)))
            .login(Ok(user(5)));
        let provider = SessionProvider::start(Arc::new(backend)).await;

        let outcome = provider.login("a@b.com", "right", true).await;
        assert_eq!(outcome.user(), Some(&user(5)));
        let session = provider.session();
        assert!(session.is_authenticated);
        assert_eq!(session.user, Some(user(5)));
        assert!(!session.loading);
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_remote_fails() {
        let backend = ScriptedBackend::default()
            .me(Ok(user(1)))
            .logout(Err(AuthError::Network("offline".into())));
        let provider = SessionProvider::start(Arc::new(backend)).await;
        assert!(provider.is_authenticated());

        let outcome = provider.logout().await;
        assert!(!outcome.remote_acknowledged);
        assert_eq!(provider.status(), SessionStatus::Anonymous);
        assert_eq!(provider.user(), None);
    }

    #[tokio::test]
    async fn logout_reports_remote_acknowledgement() {
        let backend = ScriptedBackend::default().me(Ok(user(1))).logout(Ok(()));
        let provider = SessionProvider::start(Arc::new(backend)).await;
        assert!(provider.logout().await.remote_acknowledged);
        assert!(!provider.is_authenticated());
    }

    #[tokio::test]
    async fn slow_session_check_does_not_override_newer_login() {
        let backend = Arc::new(
            ScriptedBackend::default()
                .me(Err(AuthError::rejected(401, None)))
                .login(Ok(user(9))),
        );
        let (entered, release) = backend.gate_me();
        let (provider, task) = SessionProvider::spawn(backend.clone());
        entered.await.unwrap();

        assert!(provider.login("a@b.com", "pw", false).await.is_success());
        release.send(()).unwrap();
        task.await.unwrap();

        assert_eq!(provider.user(), Some(user(9)));
    }

    #[tokio::test]
    async fn login_wins_over_check_that_resolved_first() {
        let backend = Arc::new(
            ScriptedBackend::default()
                .me(Err(AuthError::rejected(401, None)))
                .me(Err(AuthError::rejected(401, None)))
                .login(Ok(user(6))),
        );
        let provider = SessionProvider::start(backend.clone()).await;

        let (entered, release) = backend.gate_login();
        let login = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.login("a@b.com", "pw", false).await }
        });
        entered.await.unwrap();

        // Re-check issued after the login started, answered before the cookie was set.
        assert_eq!(provider.check_auth_status().await, SessionStatus::Anonymous);

        release.send(()).unwrap();
        let outcome = login.await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(provider.status(), SessionStatus::Authenticated);
        assert_eq!(provider.user(), Some(user(6)));
    }

    #[tokio::test]
    async fn login_overtaken_by_logout_reports_failure() {
        let backend = Arc::new(
            ScriptedBackend::default()
                .me(Err(AuthError::rejected(401, None)))
                .login(Ok(user(6)))
                .logout(Ok(())),
        );
        let provider = SessionProvider::start(backend.clone()).await;

        let (entered, release) = backend.gate_login();
        let login = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.login("a@b.com", "pw", false).await }
        });
        entered.await.unwrap();
        assert!(provider.logout().await.remote_acknowledged);

        release.send(()).unwrap();
        let outcome = login.await.unwrap();
        assert_eq!(outcome.error(), Some(LOGIN_FAILED_MESSAGE));
        assert_eq!(provider.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn failed_login_does_not_cancel_running_check() {
        let backend = Arc::new(
            ScriptedBackend::default()
                .me(Ok(user(4)))
                .login(Err(AuthError::rejected(401, None))),
        );
        let (entered, release) = backend.gate_me();
        let (provider, task) = SessionProvider::spawn(backend.clone());
        entered.await.unwrap();

        assert!(!provider.login("a@b.com", "pw", false).await.is_success());
        assert!(provider.is_loading());

        release.send(()).unwrap();
        task.await.unwrap();
        assert_eq!(provider.user(), Some(user(4)));
    }

    #[tokio::test]
    async fn shutdown_discards_in_flight_check() {
        let backend = Arc::new(ScriptedBackend::default().me(Ok(user(2))));
        let (entered, release) = backend.gate_me();
        let (provider, task) = SessionProvider::spawn(backend.clone());
        entered.await.unwrap();

        provider.shutdown();
        release.send(()).unwrap();
        task.await.unwrap();

        assert!(provider.is_shut_down());
        assert_eq!(provider.status(), SessionStatus::Checking);
        assert!(!provider.is_authenticated());
    }

    #[tokio::test]
    async fn recheck_does_not_flip_loading_back_on() {
        let backend = ScriptedBackend::default()
            .me(Err(AuthError::rejected(401, None)))
            .me(Ok(user(8)));
        let provider = SessionProvider::start(Arc::new(backend)).await;
        assert!(!provider.is_loading());

        assert_eq!(provider.check_auth_status().await, SessionStatus::Authenticated);
        assert!(!provider.is_loading());
    }
}
