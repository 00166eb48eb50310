//! HTTP client for the storefront API.
//!
//! One [`StorefrontClient`] is shared by the catalog, the forms and the
//! session provider; its cookie store carries the session cookie across all
//! of them.

pub mod client;
pub mod config;
pub mod error;

pub use client::StorefrontClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
