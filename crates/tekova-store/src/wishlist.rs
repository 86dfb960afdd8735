//! # Wishlist Store
//!
//! The saved-for-later container.
//!
//! ## No Durable Mirror — By Design
//! Unlike the other three containers the wishlist is session-scoped: it has
//! no snapshot key and its contents are gone on restart. All methods are
//! therefore synchronous; there is no flush to await.

use std::sync::Mutex;

use tracing::debug;

use tekova_core::{Product, Wishlist, WishlistLine};

/// The wishlist state container.
#[derive(Debug, Default)]
pub struct WishlistStore {
    wishlist: Mutex<Wishlist>,
}

impl WishlistStore {
    /// Creates an empty wishlist store.
    pub fn new() -> Self {
        WishlistStore::default()
    }

    /// Saves a product. No-op if already saved.
    pub fn add(&self, product: &Product) {
        debug!(product_id = product.id, "add_to_wishlist");
        self.wishlist
            .lock()
            .expect("Wishlist mutex poisoned")
            .add(product);
    }

    /// Removes a saved product. Silent no-op when absent.
    pub fn remove(&self, product_id: i64) {
        debug!(product_id, "remove_from_wishlist");
        self.wishlist
            .lock()
            .expect("Wishlist mutex poisoned")
            .remove(product_id);
    }

    /// Empties the wishlist.
    pub fn clear(&self) {
        debug!("clear_wishlist");
        self.wishlist
            .lock()
            .expect("Wishlist mutex poisoned")
            .clear();
    }

    /// Checks whether a product is saved.
    pub fn contains(&self, product_id: i64) -> bool {
        self.wishlist
            .lock()
            .expect("Wishlist mutex poisoned")
            .contains(product_id)
    }

    /// Derived: number of saved products.
    pub fn total_items(&self) -> usize {
        self.wishlist
            .lock()
            .expect("Wishlist mutex poisoned")
            .total_items()
    }

    /// A value copy of the saved lines, in insertion order.
    pub fn lines(&self) -> Vec<WishlistLine> {
        self.wishlist
            .lock()
            .expect("Wishlist mutex poisoned")
            .lines()
            .to_vec()
    }
}
