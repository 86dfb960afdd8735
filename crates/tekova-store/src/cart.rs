//! # Cart Store
//!
//! The cart container: in-memory [`Cart`] plus its durable mirror.
//!
//! ## Mutate-Then-Flush
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  add / remove / update_quantity / clear                             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  1. lock, mutate the Cart, clone lines, unlock                      │
//! │  2. await save("cart-items", lines)                                 │
//! │                                                                     │
//! │  Derived aggregates (total_items, total_price) are recomputed from  │
//! │  the collection on every read, never stored.                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The collection invariants (one line per product, the zero-quantity
//! rule) live in `tekova-core`; this layer adds sharing and persistence.

use std::sync::{Arc, Mutex};

use tracing::debug;

use tekova_core::{Cart, CartLine, Product};

use crate::error::StoreResult;
use crate::snapshot::SnapshotStore;

/// Durable record key for the cart container.
pub const CART_KEY: &str = "cart-items";

/// The cart state container.
#[derive(Debug)]
pub struct CartStore {
    cart: Mutex<Cart>,
    snapshot: Arc<SnapshotStore>,
}

impl CartStore {
    /// Builds the store, hydrating the cart from its durable record.
    ///
    /// Absent record → empty cart; corrupt record → reset to empty.
    pub async fn hydrate(snapshot: Arc<SnapshotStore>) -> StoreResult<Self> {
        let lines: Vec<CartLine> = snapshot.load_or_reset(CART_KEY).await?.unwrap_or_default();
        debug!(lines = lines.len(), "Cart hydrated");

        Ok(CartStore {
            cart: Mutex::new(Cart::from_lines(lines)),
            snapshot,
        })
    }

    /// Adds a product (new line, or +1 on the existing line).
    pub async fn add(&self, product: &Product) -> StoreResult<()> {
        debug!(product_id = product.id, "add_to_cart");
        let lines = self.mutate(|cart| cart.add(product));
        self.flush(lines).await
    }

    /// Removes a line by product id. Silent no-op when absent.
    pub async fn remove(&self, product_id: i64) -> StoreResult<()> {
        debug!(product_id, "remove_from_cart");
        let lines = self.mutate(|cart| cart.remove(product_id));
        self.flush(lines).await
    }

    /// Sets a line's quantity exactly; `quantity <= 0` removes the line.
    pub async fn update_quantity(&self, product_id: i64, quantity: i64) -> StoreResult<()> {
        debug!(product_id, quantity, "update_quantity");
        let lines = self.mutate(|cart| cart.update_quantity(product_id, quantity));
        self.flush(lines).await
    }

    /// Empties the cart.
    pub async fn clear(&self) -> StoreResult<()> {
        debug!("clear_cart");
        let lines = self.mutate(Cart::clear);
        self.flush(lines).await
    }

    /// Checks whether a product is in the cart.
    pub fn contains(&self, product_id: i64) -> bool {
        self.with_cart(|cart| cart.contains(product_id))
    }

    /// A line's quantity, or 0 when absent.
    pub fn quantity_of(&self, product_id: i64) -> u32 {
        self.with_cart(|cart| cart.quantity_of(product_id))
    }

    /// Derived: sum of quantities.
    pub fn total_items(&self) -> u32 {
        self.with_cart(Cart::total_items)
    }

    /// Derived: sum of unit price × quantity, in cents.
    pub fn total_price_cents(&self) -> i64 {
        self.with_cart(Cart::total_price_cents)
    }

    /// A value copy of the current lines, in insertion order.
    ///
    /// Checkout builds order lines from this copy; the originals stay
    /// exclusively owned by the cart.
    pub fn lines(&self) -> Vec<CartLine> {
        self.with_cart(|cart| cart.lines().to_vec())
    }

    fn with_cart<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Mutates under the lock and hands back the lines to flush. The lock
    /// is never held across the snapshot write.
    fn mutate(&self, f: impl FnOnce(&mut Cart)) -> Vec<CartLine> {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart);
        cart.lines().to_vec()
    }

    async fn flush(&self, lines: Vec<CartLine>) -> StoreResult<()> {
        self.snapshot.save(CART_KEY, &lines).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::snapshot::SnapshotConfig;

    fn test_product(id: i64, price_cents: i64) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            price_cents,
            images: vec![format!("https://img/{}.jpg", id)],
            slug: format!("product-{}", id),
        }
    }

    async fn memory_snapshot() -> Arc<SnapshotStore> {
        Arc::new(
            SnapshotStore::open(SnapshotConfig::in_memory())
                .await
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_add_twice_merges_and_mirrors() {
        let snapshot = memory_snapshot().await;
        let store = CartStore::hydrate(snapshot.clone()).await.unwrap();

        store.add(&test_product(1, 999)).await.unwrap();
        store.add(&test_product(1, 999)).await.unwrap();

        assert_eq!(store.total_items(), 2);
        assert_eq!(store.lines().len(), 1);

        let mirrored: Option<Vec<CartLine>> = snapshot.load(CART_KEY).await.unwrap();
        assert_eq!(mirrored.unwrap()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes_and_mirrors() {
        let snapshot = memory_snapshot().await;
        let store = CartStore::hydrate(snapshot.clone()).await.unwrap();
        store.add(&test_product(1, 999)).await.unwrap();

        store.update_quantity(1, 0).await.unwrap();

        assert!(!store.contains(1));
        let mirrored: Option<Vec<CartLine>> = snapshot.load(CART_KEY).await.unwrap();
        assert!(mirrored.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cart_round_trip_through_mirror() {
        let snapshot = memory_snapshot().await;
        {
            let store = CartStore::hydrate(snapshot.clone()).await.unwrap();
            store.add(&test_product(1, 1000)).await.unwrap();
            store.add(&test_product(1, 1000)).await.unwrap();
            store.add(&test_product(2, 500)).await.unwrap();
        }

        // Simulated restart: a fresh store over the same durable state.
        let reloaded = CartStore::hydrate(snapshot).await.unwrap();

        assert_eq!(reloaded.total_items(), 3);
        assert_eq!(reloaded.total_price_cents(), 2500);
        assert_eq!(reloaded.quantity_of(1), 2);
        assert_eq!(reloaded.quantity_of(2), 1);
    }

    #[tokio::test]
    async fn test_hydrate_absent_record_is_empty() {
        let store = CartStore::hydrate(memory_snapshot().await).await.unwrap();
        assert_eq!(store.total_items(), 0);
        assert_eq!(store.quantity_of(1), 0);
    }

    #[tokio::test]
    async fn test_clear_mirrors_empty_list() {
        let snapshot = memory_snapshot().await;
        let store = CartStore::hydrate(snapshot.clone()).await.unwrap();
        store.add(&test_product(1, 999)).await.unwrap();

        store.clear().await.unwrap();

        let mirrored: Option<Vec<CartLine>> = snapshot.load(CART_KEY).await.unwrap();
        assert_eq!(mirrored, Some(vec![]));
    }
}
