//! Cart wire types and display-only total derivations.
//!
//! The cart is server-owned: `item_count` and `total` arrive recomputed from
//! the backend after every mutation and are never recomputed locally. The one
//! exception is the presentational tax/grand-total derivation in [`Totals`],
//! which is never sent back to the server.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::CartItemId;

/// Flat sales tax rate applied for display (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// A server-owned cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub items: Vec<CartItem>,
    pub item_count: u32,
    /// Pre-tax sum of price x quantity, computed server-side.
    pub total: Decimal,
}

impl Cart {
    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A (product, quantity) line within a cart. The product is embedded
/// (denormalized) by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Line total (price x quantity), display only.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Display-only derived totals. Recomputed on every render, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

impl Totals {
    /// Derive totals from a pre-tax subtotal: tax = subtotal x 0.08,
    /// grand total = subtotal x 1.08. Shipping is always free.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            tax,
            grand_total: subtotal + tax,
        }
    }
}

impl From<&Cart> for Totals {
    fn from(cart: &Cart) -> Self {
        Self::from_subtotal(cart.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::{CategoryId, ProductId};

    fn product(price: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Desk Lamp".to_string(),
            description: String::new(),
            price: price.parse().unwrap(),
            image: String::new(),
            category_id: CategoryId::new(1),
            category_name: "Home".to_string(),
            stock,
            rating: Decimal::ZERO,
            reviews: 0,
            brand: None,
        }
    }

    #[test]
    fn test_totals_exact_derivation() {
        // One item, price 19.99, quantity 2
        let totals = Totals::from_subtotal("39.98".parse().unwrap());

        assert_eq!(totals.subtotal, "39.98".parse::<Decimal>().unwrap());
        assert_eq!(totals.tax, "3.1984".parse::<Decimal>().unwrap());
        assert_eq!(totals.grand_total, "43.1784".parse::<Decimal>().unwrap());
        // Displayed rounded to 2 decimals
        assert_eq!(format!("${:.2}", totals.grand_total.round_dp(2)), "$43.18");
    }

    #[test]
    fn test_totals_zero_subtotal() {
        let totals = Totals::from_subtotal(Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_line_total() {
        let item = CartItem {
            id: CartItemId::new(10),
            product: product("19.99", 5),
            quantity: 2,
        };
        assert_eq!(item.line_total(), "39.98".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_cart_wire_shape() {
        let json = r#"{
            "id": "default-cart",
            "items": [{
                "id": 4,
                "product": {"id": 1, "name": "Mug", "price": 7.5, "categoryId": 2, "stock": 3},
                "quantity": 2
            }],
            "itemCount": 2,
            "total": 15.0
        }"#;

        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.id, "default-cart");
        assert_eq!(cart.item_count, 2);
        assert_eq!(cart.items.len(), 1);
        assert!(!cart.is_empty());
    }
}
