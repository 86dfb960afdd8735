//! # Wishlist Collection
//!
//! The saved-for-later item selection.
//!
//! Simpler than the cart on purpose: no quantity concept, and duplicate adds
//! are no-ops rather than increments. The wishlist is also the one container
//! without a durable mirror (session-scoped only); that decision lives in
//! `tekova-store`, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Product;

/// One entry in the wishlist, keyed by product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistLine {
    /// Product id (unique key within the wishlist).
    pub product_id: i64,

    /// Title at time of adding (frozen).
    pub title: String,

    /// Price in cents at time of adding (frozen).
    pub price_cents: i64,

    /// Image URL at time of adding.
    pub image: String,

    /// Product slug for linking back to the product page.
    pub slug: String,

    /// When the product was saved.
    pub added_at: DateTime<Utc>,
}

/// The wishlist collection.
///
/// ## Invariants
/// - At most one line per product id; duplicate add is a no-op, not an error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    lines: Vec<WishlistLine>,
}

impl Wishlist {
    /// Creates a new empty wishlist.
    pub fn new() -> Self {
        Wishlist::default()
    }

    /// Saves a product, stamping the current time.
    ///
    /// No-op if the product id is already present.
    pub fn add(&mut self, product: &Product) {
        if self.contains(product.id) {
            return;
        }

        self.lines.push(WishlistLine {
            product_id: product.id,
            title: product.title.clone(),
            price_cents: product.price_cents,
            image: product.primary_image(),
            slug: product.slug.clone(),
            added_at: Utc::now(),
        });
    }

    /// Removes a line by product id. Silent no-op when absent.
    pub fn remove(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Empties the wishlist.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Checks whether a product is saved.
    pub fn contains(&self, product_id: i64) -> bool {
        self.lines.iter().any(|l| l.product_id == product_id)
    }

    /// Derived: number of saved products.
    pub fn total_items(&self) -> usize {
        self.lines.len()
    }

    /// Read access to the lines, in insertion order.
    pub fn lines(&self) -> &[WishlistLine] {
        &self.lines
    }
}
