//! Filter/sort configuration and the pure filter → sort pipeline.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, ValueObject};

use crate::price::Price;
use crate::product::Product;

/// Wire token selecting every category.
pub const ALL: &str = "all";

/// Category step of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on the product's category label.
    Exact(String),
}

impl CategoryFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(label) => product.category == *label,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL,
            CategoryFilter::Exact(label) => label,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(value)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => ALL.to_string(),
            CategoryFilter::Exact(label) => label,
        }
    }
}

/// Price step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "all")]
    All,
    /// price < 50
    #[serde(rename = "under50")]
    Under50,
    /// 50 <= price <= 100
    #[serde(rename = "50to100")]
    From50To100,
    /// price > 100
    #[serde(rename = "over100")]
    Over100,
}

impl PriceRange {
    const FIFTY: Price = Price::from_units(50);
    const HUNDRED: Price = Price::from_units(100);

    pub fn contains(&self, price: Price) -> bool {
        match self {
            PriceRange::All => true,
            PriceRange::Under50 => price < Self::FIFTY,
            PriceRange::From50To100 => price >= Self::FIFTY && price <= Self::HUNDRED,
            PriceRange::Over100 => price > Self::HUNDRED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceRange::All => "all",
            PriceRange::Under50 => "under50",
            PriceRange::From50To100 => "50to100",
            PriceRange::Over100 => "over100",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::All => "All Prices",
            PriceRange::Under50 => "Under $50",
            PriceRange::From50To100 => "$50 - $100",
            PriceRange::Over100 => "Over $100",
        }
    }
}

impl FromStr for PriceRange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PriceRange::All),
            "under50" => Ok(PriceRange::Under50),
            "50to100" => Ok(PriceRange::From50To100),
            "over100" => Ok(PriceRange::Over100),
            other => Err(DomainError::validation(format!(
                "unknown price range '{other}' (expected all, under50, 50to100 or over100)"
            ))),
        }
    }
}

/// Sort step of the pipeline. Every ordering is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Fetch order, untouched.
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    /// New items first; no secondary key.
    Newest,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Featured => "featured",
            SortBy::PriceLow => "priceLow",
            SortBy::PriceHigh => "priceHigh",
            SortBy::Newest => "newest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Featured => "Featured",
            SortBy::PriceLow => "Price: Low to High",
            SortBy::PriceHigh => "Price: High to Low",
            SortBy::Newest => "Newest First",
        }
    }

    fn sort(&self, products: &mut [Product]) {
        match self {
            SortBy::Featured => {}
            SortBy::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
            SortBy::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
            SortBy::Newest => products.sort_by_key(|p| !p.is_new),
        }
    }
}

impl FromStr for SortBy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(SortBy::Featured),
            "priceLow" => Ok(SortBy::PriceLow),
            "priceHigh" => Ok(SortBy::PriceHigh),
            "newest" => Ok(SortBy::Newest),
            other => Err(DomainError::validation(format!(
                "unknown sort '{other}' (expected featured, priceLow, priceHigh or newest)"
            ))),
        }
    }
}

/// The (category, priceRange, sortBy) triple driving the catalog view.
///
/// Replaced wholesale on every edit; the `with_*` builders return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub category: CategoryFilter,
    pub price_range: PriceRange,
    pub sort_by: SortBy,
}

impl ValueObject for FilterConfig {}

impl FilterConfig {
    pub fn new(category: CategoryFilter, price_range: PriceRange, sort_by: SortBy) -> Self {
        Self {
            category,
            price_range,
            sort_by,
        }
    }

    /// Parse the three wire tokens (`"all"`, `"50to100"`, `"priceHigh"`, ...).
    pub fn parse(category: &str, price_range: &str, sort_by: &str) -> Result<Self, DomainError> {
        Ok(Self {
            category: CategoryFilter::from(category),
            price_range: price_range.parse()?,
            sort_by: sort_by.parse()?,
        })
    }

    /// Config for a `/products?category=<label>` link.
    pub fn for_category(label: impl Into<String>) -> Self {
        Self::default().with_category(CategoryFilter::from(label.into()))
    }

    pub fn with_category(&self, category: CategoryFilter) -> Self {
        Self {
            category,
            ..self.clone()
        }
    }

    pub fn with_price_range(&self, price_range: PriceRange) -> Self {
        Self {
            price_range,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort_by: SortBy) -> Self {
        Self {
            sort_by,
            ..self.clone()
        }
    }

    /// True when `apply` is the identity.
    pub fn is_identity(&self) -> bool {
        *self == FilterConfig::default()
    }
}

/// Filter then sort, returning a new sequence. `products` is never touched.
pub fn apply(products: &[Product], config: &FilterConfig) -> Vec<Product> {
    let mut visible: Vec<Product> = products
        .iter()
        .filter(|p| config.category.matches(p))
        .filter(|p| config.price_range.contains(p.price))
        .cloned()
        .collect();

    config.sort_by.sort(&mut visible);
    visible
}
