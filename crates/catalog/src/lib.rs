//! Catalog module of the storefront.
//!
//! Turns a fetched product collection plus a [`FilterConfig`] into the exact
//! sequence of products to render. Everything here is deterministic domain
//! logic (no IO, no HTTP); fetching lives in `storefront-client`.

pub mod cart;
pub mod filter;
pub mod price;
pub mod product;
pub mod view;

pub use cart::{CartIntent, Quantity};
pub use filter::{CategoryFilter, FilterConfig, PriceRange, SortBy, apply};
pub use price::Price;
pub use product::{
    Badge, Category, PLACEHOLDER_IMAGE, Product, ProductDetail, Review, parse_categories,
};
pub use view::{CatalogStatus, CatalogView, LoadError, LoadTicket};
