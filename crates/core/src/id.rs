//! Strongly-typed identifiers used across the storefront.
//!
//! The remote API hands out numeric keys today, but the storefront treats them
//! as opaque: a key is whatever JSON scalar the API sent, and it is echoed back
//! in the same form (path segments, cart intents).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Raw key as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
enum RawKey {
    Number(i64),
    Text(String),
}

impl core::fmt::Display for RawKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RawKey::Number(n) => core::fmt::Display::fmt(n, f),
            RawKey::Text(s) => f.write_str(s),
        }
    }
}

/// Identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(RawKey);

/// Identifier of a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(RawKey);

macro_rules! impl_opaque_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn from_number(n: i64) -> Self {
                Self(RawKey::Number(n))
            }

            /// Build an identifier from a textual key.
            ///
            /// Purely numeric text is kept as text; use `from_str` to normalise.
            pub fn from_text(s: impl Into<String>) -> Self {
                Self(RawKey::Text(s.into()))
            }

            /// Numeric value of the key, if the API sent a number.
            pub fn as_number(&self) -> Option<i64> {
                match &self.0 {
                    RawKey::Number(n) => Some(*n),
                    RawKey::Text(_) => None,
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self::from_number(value)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            /// Parses route parameters: numbers become numeric keys, anything
            /// else non-empty stays textual.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty key", $name)));
                }
                Ok(match trimmed.parse::<i64>() {
                    Ok(n) => Self::from_number(n),
                    Err(_) => Self::from_text(trimmed),
                })
            }
        }
    };
}

impl_opaque_id!(ProductId, "ProductId");
impl_opaque_id!(CategoryId, "CategoryId");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_keys_round_trip_as_numbers() {
        let id: ProductId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id.as_number(), Some(42));
        assert_eq!(id.to_string(), "42");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(42));
    }

    #[test]
    fn textual_keys_stay_textual() {
        let id: CategoryId = serde_json::from_value(json!("shoes-01")).unwrap();
        assert_eq!(id.as_number(), None);
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("shoes-01"));
    }

    #[test]
    fn from_str_normalises_route_params() {
        assert_eq!("7".parse::<ProductId>().unwrap(), ProductId::from_number(7));
        assert_eq!(
            "abc".parse::<ProductId>().unwrap(),
            ProductId::from_text("abc")
        );
        assert!(matches!(
            "  ".parse::<ProductId>(),
            Err(DomainError::InvalidId(_))
        ));
    }
}
