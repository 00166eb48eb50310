//! `storefront-session`: the tab-wide authentication context.
//!
//! This crate is intentionally decoupled from HTTP: the remote session API is
//! reached through the [`AuthBackend`] seam, implemented by `storefront-client`.

pub mod backend;
pub mod provider;
pub mod state;
pub mod user;

pub use backend::{AuthBackend, AuthError, LoginRequest};
pub use provider::{AuthGate, LoginOutcome, LogoutOutcome, SessionProvider};
pub use state::{Session, SessionStatus};
pub use user::SessionUser;
