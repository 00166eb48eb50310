//! Catalog view engine: the fetched collection, the active filter config and
//! the derived visible list.
//!
//! The visible list is recomputed from scratch whenever the collection or the
//! config changes, so it is always `apply(products, config)`.

use serde_json::Value;
use thiserror::Error;

use storefront_core::{DomainError, DomainResult, Entity, ProductId};

use crate::filter::{FilterConfig, apply};
use crate::product::Product;

/// User-facing text for a failed catalog load.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load products. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("expected a sequence of items, got {found}")]
    NotASequence { found: &'static str },
    #[error("malformed item in payload: {0}")]
    Malformed(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
}

impl LoadError {
    pub fn not_a_sequence(payload: &Value) -> Self {
        let found = match payload {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        LoadError::NotASequence { found }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    /// Waiting on the first (or a newer) fetch.
    Loading,
    Ready,
    Failed(LoadError),
}

/// Handle for one in-flight fetch.
///
/// Only the most recently issued ticket may complete a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass the ticket back to `complete_load`"]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct CatalogView {
    products: Vec<Product>,
    categories: Vec<String>,
    config: FilterConfig,
    visible: Vec<Product>,
    status: CatalogStatus,
    generation: u64,
    disposed: bool,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self::with_config(FilterConfig::default())
    }

    pub fn with_config(config: FilterConfig) -> Self {
        Self {
            products: Vec::new(),
            categories: Vec::new(),
            config,
            visible: Vec::new(),
            status: CatalogStatus::Loading,
            generation: 0,
            disposed: false,
        }
    }

    /// Replace the collection with a raw API payload.
    ///
    /// Never fails past this boundary: a payload that is not a sequence
    /// empties the collection and records the error. Items that cannot be
    /// read are skipped; the rest of the collection still loads.
    pub fn load(&mut self, payload: Value) {
        match parse_products(payload) {
            Ok(products) => self.load_products(products),
            Err(err) => self.fail(err),
        }
    }

    /// Replace the collection with already-typed products.
    pub fn load_products(&mut self, products: Vec<Product>) {
        self.categories = unique_categories(&products);
        self.products = products;
        self.status = CatalogStatus::Ready;
        self.recompute();
        tracing::debug!(
            products = self.products.len(),
            categories = self.categories.len(),
            visible = self.visible.len(),
            "catalog loaded"
        );
    }

    /// Record a failed fetch: empty collection, empty visible list, error set.
    pub fn fail(&mut self, err: LoadError) {
        tracing::warn!(error = %err, "catalog load failed");
        self.products.clear();
        self.categories.clear();
        self.visible.clear();
        self.status = CatalogStatus::Failed(err);
    }

    /// Atomically replace the filter config and recompute the visible list.
    pub fn set_config(&mut self, config: FilterConfig) {
        self.config = config;
        self.recompute();
    }

    /// Start a fetch. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        if !matches!(self.status, CatalogStatus::Ready) {
            self.status = CatalogStatus::Loading;
        }
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Finish the fetch started by `ticket`.
    ///
    /// Returns `false` (and leaves state untouched) when the ticket is stale or
    /// the view has been disposed.
    pub fn complete_load<E>(&mut self, ticket: LoadTicket, result: Result<Value, E>) -> bool
    where
        E: core::fmt::Display,
    {
        if self.disposed {
            tracing::debug!(generation = ticket.generation, "dropping load for disposed view");
            return false;
        }
        if ticket.generation != self.generation {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "dropping stale catalog response"
            );
            return false;
        }

        match result {
            Ok(payload) => self.load(payload),
            Err(err) => self.fail(LoadError::Fetch(err.to_string())),
        }
        true
    }

    /// Tear the view down; in-flight loads complete into nothing.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a loaded product, e.g. to seed the detail page before its fetch lands.
    pub fn product(&self, id: &ProductId) -> DomainResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(DomainError::not_found)
    }

    /// Unique categories of the full collection, in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn visible(&self) -> &[Product] {
        &self.visible
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == CatalogStatus::Loading
    }

    pub fn has_error(&self) -> bool {
        matches!(self.status, CatalogStatus::Failed(_))
    }

    pub fn error(&self) -> Option<&LoadError> {
        match &self.status {
            CatalogStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Message for the error banner, if the last load failed.
    pub fn error_message(&self) -> Option<&'static str> {
        self.has_error().then_some(LOAD_FAILED_MESSAGE)
    }

    fn recompute(&mut self) {
        self.visible = apply(&self.products, &self.config);
    }
}

fn parse_products(payload: Value) -> Result<Vec<Product>, LoadError> {
    match payload {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| match serde_json::from_value(item) {
                Ok(product) => Some(product),
                Err(err) => {
                    tracing::warn!(item = idx, error = %err, "skipping unreadable product");
                    None
                }
            })
            .collect()),
        other => Err(LoadError::not_a_sequence(&other)),
    }
}

fn unique_categories(products: &[Product]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    products
        .iter()
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect()
}
