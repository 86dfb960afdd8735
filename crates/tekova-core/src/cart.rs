//! # Cart Collection
//!
//! The pre-checkout item selection and its invariants.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                  │
//! │                                                                     │
//! │  Presentation Action       Collection Change                        │
//! │  ───────────────────       ─────────────────                        │
//! │                                                                     │
//! │  Click "Add to cart" ────► existing line? qty += 1                  │
//! │                            else push new line (qty 1)               │
//! │                                                                     │
//! │  Change quantity ────────► qty <= 0? remove line                    │
//! │                            else line.qty = qty (not additive)       │
//! │                                                                     │
//! │  Click remove ───────────► retain(id != product_id)                 │
//! │                                                                     │
//! │  Click clear ────────────► lines.clear()                            │
//! │                                                                     │
//! │  Badge / totals ─────────► derived on read, never stored            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - A persisted line always has quantity >= 1
//! - Missing product ids are silent no-ops, never errors

use serde::{Deserialize, Serialize};

use crate::types::Product;

// =============================================================================
// Cart Line
// =============================================================================

/// One entry in the cart, keyed by product id.
///
/// ## Snapshot Pattern
/// Title, price and image are frozen copies of the product at the moment it
/// was first added. A later catalog change does not rewrite lines already in
/// the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product id (unique key within the cart).
    pub product_id: i64,

    /// Title at time of adding (frozen).
    pub title: String,

    /// Unit price in cents at time of adding (frozen).
    pub price_cents: i64,

    /// Image URL at time of adding (first product image or placeholder).
    pub image: String,

    /// Quantity in cart; always >= 1 while the line exists.
    pub quantity: u32,

    /// Product slug for linking back to the product page.
    pub slug: String,
}

impl CartLine {
    /// Creates a quantity-1 line from a catalog product.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id,
            title: product.title.clone(),
            price_cents: product.price_cents,
            image: product.primary_image(),
            quantity: 1,
            slug: product.slug.clone(),
        }
    }

    /// Line total (unit price × quantity) in cents.
    pub fn line_total_cents(&self) -> i64 {
        self.price_cents * i64::from(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart collection.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increments
///   its quantity instead of duplicating the line)
/// - Setting a quantity <= 0 removes the line rather than persisting it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from a hydrated snapshot.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Cart { lines }
    }

    /// Adds a product to the cart.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases by 1
    /// - Product not in cart: new line with quantity 1, image from the
    ///   product's first image or the placeholder
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            line.quantity += 1;
            return;
        }

        self.lines.push(CartLine::from_product(product));
    }

    /// Removes a line by product id. Silent no-op when absent.
    pub fn remove(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Sets a line's quantity to exactly `quantity` (not additive).
    ///
    /// ## Behavior
    /// - `quantity <= 0`: equivalent to [`Cart::remove`]
    /// - Unknown product id: silent no-op
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
        {
            line.quantity = quantity as u32;
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Checks whether a product is in the cart.
    pub fn contains(&self, product_id: i64) -> bool {
        self.lines.iter().any(|l| l.product_id == product_id)
    }

    /// Returns a line's quantity, or 0 when the product is not in the cart.
    pub fn quantity_of(&self, product_id: i64) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Derived: sum of all line quantities.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Derived: sum of unit price × quantity across lines, in cents.
    pub fn total_price_cents(&self) -> i64 {
        self.lines.iter().map(CartLine::line_total_cents).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Read access to the lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: i64, price_cents: i64) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            price_cents,
            images: vec![format!("https://img/{}.jpg", id)],
            slug: format!("product-{}", id),
        }
    }

    #[test]
    fn test_add_same_product_twice_merges_lines() {
        let mut cart = Cart::new();
        let product = test_product(1, 999);

        cart.add(&product);
        cart.add(&product);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(1), 2);
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 999));

        cart.update_quantity(1, 5);

        assert_eq!(cart.quantity_of(1), 5);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 999));
        cart.add(&test_product(2, 500));
        cart.update_quantity(1, 4);
        let before = cart.total_items();

        cart.update_quantity(1, 0);

        assert!(!cart.contains(1));
        assert_eq!(before - cart.total_items(), 4);
    }

    #[test]
    fn test_update_quantity_negative_removes_line() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 999));

        cart.update_quantity(1, -3);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 999));

        cart.update_quantity(42, 5);

        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_remove_absent_line_is_noop() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 999));

        cart.remove(42);

        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_totals_scenario() {
        // cart = [{id:1, qty:2, price:$10}, {id:2, qty:1, price:$5}]
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1000));
        cart.add(&test_product(1, 1000));
        cart.add(&test_product(2, 500));

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price_cents(), 2500);
    }

    #[test]
    fn test_image_falls_back_to_placeholder() {
        let mut cart = Cart::new();
        let mut product = test_product(1, 999);
        product.images.clear();

        cart.add(&product);

        assert_eq!(cart.lines()[0].image, crate::PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 999));
        cart.add(&test_product(2, 500));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_price_cents(), 0);
    }
}
