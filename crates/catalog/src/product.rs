//! Catalog data model: products, product detail, categories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use storefront_core::{CategoryId, Entity, ProductId};

use crate::price::Price;
use crate::view::LoadError;

/// Image shown when a product or category has none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Wire shape of a product, validated into [`Product`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductWire {
    id: ProductId,
    name: String,
    price: Price,
    #[serde(default)]
    category: String,
    #[serde(default, alias = "discountPercent")]
    discount: Option<i64>,
    // The products API sends this flag as `new`.
    #[serde(default, alias = "new")]
    is_new: bool,
    #[serde(default)]
    image: Option<String>,
}

/// A product as listed in the catalog.
///
/// Created from a fetch response and never mutated afterwards; a re-fetch
/// replaces the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductWire", rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: String,
    #[serde(rename = "discount", skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<ProductWire> for Product {
    /// A discount outside 1..=99 is shown as no discount.
    fn from(wire: ProductWire) -> Self {
        let discount_percent = match wire.discount {
            None | Some(0) => None,
            Some(d) => match u8::try_from(d) {
                Ok(pct) if pct < 100 => Some(pct),
                _ => {
                    tracing::warn!(product = %wire.id, discount = d, "ignoring out-of-range discount");
                    None
                }
            },
        };

        Self {
            id: wire.id,
            name: wire.name,
            price: wire.price,
            category: wire.category,
            discount_percent,
            is_new: wire.is_new,
            image: wire.image,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Badge rendered on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Discount(u8),
    New,
}

impl core::fmt::Display for Badge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Badge::Discount(pct) => write!(f, "{pct}% OFF"),
            Badge::New => f.write_str("New"),
        }
    }
}

impl Product {
    pub fn image_or_placeholder(&self) -> &str {
        image_or_placeholder(self.image.as_deref())
    }

    /// A discount badge wins over the "new" badge.
    pub fn badge(&self) -> Option<Badge> {
        match (self.discount_percent, self.is_new) {
            (Some(pct), _) => Some(Badge::Discount(pct)),
            (None, true) => Some(Badge::New),
            (None, false) => None,
        }
    }

    /// Price before the discount, when the product is discounted.
    pub fn original_price(&self) -> Option<Price> {
        self.discount_percent
            .and_then(|pct| self.price.before_discount(pct))
    }

    /// Amount the discount saves, when the product is discounted.
    pub fn savings(&self) -> Option<Price> {
        self.discount_percent
            .and_then(|pct| self.price.discount_savings(pct))
    }
}

fn image_or_placeholder(image: Option<&str>) -> &str {
    match image {
        Some(src) if !src.trim().is_empty() => src,
        _ => PLACEHOLDER_IMAGE,
    }
}

/// A customer review on the product detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// `GET /api/products/{id}` payload: a product plus its detail tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub rating: Option<f32>,
}

impl ProductDetail {
    /// Star rating shown next to the title; unrated products show four stars.
    pub const DEFAULT_RATING: f32 = 4.0;

    pub fn display_rating(&self) -> f32 {
        self.rating.unwrap_or(Self::DEFAULT_RATING)
    }

    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => "No description available for this product.",
        }
    }

    pub fn review_summary(&self) -> String {
        if self.reviews.is_empty() {
            "No reviews yet".to_string()
        } else {
            format!("{} reviews", self.reviews.len())
        }
    }
}

/// A category tile from `GET /api/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub items: u32,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Category {
    pub fn image_or_placeholder(&self) -> &str {
        image_or_placeholder(self.image.as_deref())
    }

    pub fn items_label(&self) -> String {
        if self.items == 1 {
            "1 item".to_string()
        } else {
            format!("{} items", self.items)
        }
    }

    /// Link into the product list pre-filtered on this category.
    pub fn products_href(&self) -> String {
        format!("/products?category={}", self.name)
    }
}

/// Parse a categories payload; anything but a JSON array is rejected.
pub fn parse_categories(payload: Value) -> Result<Vec<Category>, LoadError> {
    match payload {
        Value::Array(_) => {
            serde_json::from_value(payload).map_err(|e| LoadError::Malformed(e.to_string()))
        }
        other => Err(LoadError::not_a_sequence(&other)),
    }
}
