//! Price value object.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use storefront_core::{DomainError, DomainResult, ValueObject};

/// Non-negative price as the API sends it (`49.99`).
///
/// Comparisons (range filters, sorting) use the exact amount, so `49.996`
/// stays under 50. Display and discount math work on the amount rounded to
/// whole cents.
#[derive(Debug, Copy, Clone, Default)]
pub struct Price {
    /// Always finite and non-negative; `-0.0` is normalised away.
    amount: f64,
}

impl ValueObject for Price {}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Price {}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount.total_cmp(&other.amount)
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.amount.to_bits().hash(state);
    }
}

/// Largest amount whose cent count still fits a `u64`.
const MAX_AMOUNT: f64 = u64::MAX as f64 / 100.0;

impl Price {
    pub const ZERO: Price = Price { amount: 0.0 };

    pub const fn from_cents(cents: u64) -> Self {
        Self {
            amount: cents as f64 / 100.0,
        }
    }

    /// Whole currency units, e.g. `Price::from_units(50)` is 50.00.
    pub const fn from_units(units: u64) -> Self {
        Self {
            amount: units as f64,
        }
    }

    pub fn from_decimal(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if value < 0.0 {
            return Err(DomainError::validation(format!(
                "price must be non-negative (got {value})"
            )));
        }
        if value > MAX_AMOUNT {
            return Err(DomainError::validation("price is out of range"));
        }
        // `+ 0.0` turns -0.0 into 0.0.
        Ok(Self {
            amount: value + 0.0,
        })
    }

    /// Amount rounded to the nearest cent.
    pub fn cents(&self) -> u64 {
        (self.amount * 100.0).round() as u64
    }

    /// The exact amount received.
    pub fn as_decimal(&self) -> f64 {
        self.amount
    }

    /// Price before a `discount_percent` reduction was applied.
    ///
    /// `price * 100 / (100 - discount)`, rounded half-up to the cent. `None`
    /// for a discount outside 1..=99 or an amount too large to scale.
    pub fn before_discount(&self, discount_percent: u8) -> Option<Price> {
        let remaining = remaining_share(discount_percent)?;
        let scaled = self.cents().checked_mul(100)?;
        Some(Price::from_cents(div_round(scaled, remaining)?))
    }

    /// Amount saved by a `discount_percent` reduction that produced `self`.
    ///
    /// `price * discount / (100 - discount)`, rounded half-up to the cent.
    pub fn discount_savings(&self, discount_percent: u8) -> Option<Price> {
        let remaining = remaining_share(discount_percent)?;
        let scaled = self.cents().checked_mul(u64::from(discount_percent))?;
        Some(Price::from_cents(div_round(scaled, remaining)?))
    }
}

fn remaining_share(discount_percent: u8) -> Option<u64> {
    if discount_percent == 0 || discount_percent >= 100 {
        return None;
    }
    Some(100 - u64::from(discount_percent))
}

fn div_round(numerator: u64, denominator: u64) -> Option<u64> {
    Some(numerator.checked_add(denominator / 2)? / denominator)
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let cents = self.cents();
        write!(f, "${}.{:02}", cents / 100, cents % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Price::from_decimal(value).map_err(serde::de::Error::custom)
    }
}
