//! Cart intent from the product detail page.
//!
//! There is no cart backend yet; the detail page only collects a quantity and
//! confirms the intent.

use serde::{Deserialize, Serialize};

use storefront_core::{ProductId, ValueObject};

use crate::product::Product;

/// Positive item count. Starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl ValueObject for Quantity {}

impl Default for Quantity {
    fn default() -> Self {
        Self(1)
    }
}

impl Quantity {
    pub fn new(n: u32) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Apply raw input from the quantity field.
    ///
    /// Like the browser's `parseInt`, leading digits are read and trailing
    /// junk ignored. Anything that does not yield a positive integer leaves
    /// the current value in place; returns whether the value changed.
    pub fn set_from_input(&mut self, input: &str) -> bool {
        match leading_integer(input) {
            Some(n) if n > 0 => {
                let n = u32::try_from(n).unwrap_or(u32::MAX);
                let changed = n != self.0;
                self.0 = n;
                changed
            }
            _ => false,
        }
    }
}

fn leading_integer(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// "Add to cart" intent: which product, how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartIntent {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: Quantity,
}

impl CartIntent {
    pub fn new(product: &Product, quantity: Quantity) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
        }
    }

    pub fn confirmation(&self) -> String {
        format!(
            "Added {} {}(s) to cart",
            self.quantity.get(),
            self.product_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;

    #[test]
    fn quantity_starts_at_one_and_rejects_zero() {
        assert_eq!(Quantity::default().get(), 1);
        assert_eq!(Quantity::new(0), None);
        assert_eq!(Quantity::new(3).map(|q| q.get()), Some(3));
    }

    #[test]
    fn input_follows_parse_int_rules() {
        let mut qty = Quantity::default();
        assert!(qty.set_from_input("4"));
        assert_eq!(qty.get(), 4);

        assert!(qty.set_from_input("  2items"));
        assert_eq!(qty.get(), 2);

        for rejected in ["", "0", "-3", "abc", "-"] {
            assert!(!qty.set_from_input(rejected), "accepted {rejected:?}");
            assert_eq!(qty.get(), 2);
        }
    }

    #[test]
    fn confirmation_names_product_and_quantity() {
        let product = Product {
            id: ProductId::from_number(9),
            name: "Desk Lamp".into(),
            price: Price::from_units(25),
            category: "Home".into(),
            discount_percent: None,
            is_new: false,
            image: None,
        };
        let intent = CartIntent::new(&product, Quantity::new(2).unwrap());
        assert_eq!(intent.confirmation(), "Added 2 Desk Lamp(s) to cart");
        assert_eq!(intent.product_id, ProductId::from_number(9));
    }
}
