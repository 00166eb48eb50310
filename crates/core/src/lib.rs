//! `storefront-core`: shared building blocks for the storefront crates.
//!
//! This crate contains **pure** primitives (no IO, no HTTP).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ProductId};
pub use value_object::ValueObject;
