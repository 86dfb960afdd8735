//! # Order Store
//!
//! The order history container: in-memory [`OrderHistory`] plus its durable
//! mirror.
//!
//! ## Write Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  create / update_status / cancel / clear                            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  1. lock, apply the mutation through the core state machine         │
//! │  2. if (and only if) state changed: clone history, unlock,          │
//! │     await save("user-orders", orders)                               │
//! │                                                                     │
//! │  Rejected transitions and unknown ids never touch the mirror.       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transition table itself lives in `tekova-core::order`; this layer
//! adds sharing, persistence and the store-level result shapes.

use std::sync::{Arc, Mutex};

use tracing::debug;

use tekova_core::{Order, OrderDraft, OrderHistory, OrderStatus};

use crate::error::StoreResult;
use crate::snapshot::SnapshotStore;

/// Durable record key for the order history container.
pub const ORDERS_KEY: &str = "user-orders";

/// The order history state container.
#[derive(Debug)]
pub struct OrderStore {
    history: Mutex<OrderHistory>,
    snapshot: Arc<SnapshotStore>,
}

impl OrderStore {
    /// Builds the store, hydrating history from its durable record.
    ///
    /// Absent record → empty history; corrupt record → reset to empty.
    pub async fn hydrate(snapshot: Arc<SnapshotStore>) -> StoreResult<Self> {
        let orders: Vec<Order> = snapshot.load_or_reset(ORDERS_KEY).await?.unwrap_or_default();
        debug!(orders = orders.len(), "Order history hydrated");

        Ok(OrderStore {
            history: Mutex::new(OrderHistory::from_orders(orders)),
            snapshot,
        })
    }

    /// Creates an order from a checkout draft and prepends it to history.
    ///
    /// The draft carries frozen items, totals and shipping/payment details
    /// supplied by the composing layer; this store never reads the cart.
    pub async fn create(&self, draft: OrderDraft) -> StoreResult<Order> {
        let (order, orders) = {
            let mut history = self.history.lock().expect("Order mutex poisoned");
            let order = history.create(draft);
            (order, history.orders().to_vec())
        };
        debug!(order_id = %order.id, order_number = %order.order_number, "create_order");

        self.flush(orders).await?;
        Ok(order)
    }

    /// Moves an order to a new status, optionally attaching a tracking
    /// number.
    ///
    /// ## Behavior
    /// - Unknown id: `Ok(None)`, mirror untouched
    /// - Illegal transition: `Err(Domain)`, state and mirror untouched
    /// - Moving to `shipped` stamps the delivery estimate (now + 3 days)
    pub async fn update_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        tracking_number: Option<String>,
    ) -> StoreResult<Option<Order>> {
        debug!(order_id, %new_status, "update_order_status");

        let outcome = {
            let mut history = self.history.lock().expect("Order mutex poisoned");
            let updated = history.update_status(order_id, new_status, tracking_number)?;
            updated.map(|order| (order, history.orders().to_vec()))
        };

        match outcome {
            Some((order, orders)) => {
                self.flush(orders).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Cancels an order.
    ///
    /// Returns `true` only when the prior status was `pending` or
    /// `processing`; anything else (including unknown ids) returns `false`
    /// and leaves state and mirror untouched.
    pub async fn cancel(&self, order_id: &str) -> StoreResult<bool> {
        debug!(order_id, "cancel_order");

        let orders = {
            let mut history = self.history.lock().expect("Order mutex poisoned");
            if !history.cancel(order_id) {
                return Ok(false);
            }
            history.orders().to_vec()
        };

        self.flush(orders).await?;
        Ok(true)
    }

    /// Administrative reset: empties history and rewrites the mirror.
    pub async fn clear(&self) -> StoreResult<()> {
        debug!("clear_orders");
        let orders = {
            let mut history = self.history.lock().expect("Order mutex poisoned");
            history.clear();
            history.orders().to_vec()
        };
        self.flush(orders).await
    }

    /// Looks up an order by id.
    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.with_history(|h| h.get(order_id).cloned())
    }

    /// All orders with exactly the given status, most recent first.
    pub fn by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.with_history(|h| h.by_status(status).into_iter().cloned().collect())
    }

    /// Derived: number of orders in history.
    pub fn total_orders(&self) -> usize {
        self.with_history(OrderHistory::total_orders)
    }

    /// Derived: orders still in flight (`pending` or `processing`).
    pub fn pending_orders(&self) -> Vec<Order> {
        self.with_history(|h| h.pending_orders().into_iter().cloned().collect())
    }

    /// Derived: orders that reached `delivered`.
    pub fn completed_orders(&self) -> Vec<Order> {
        self.with_history(|h| h.completed_orders().into_iter().cloned().collect())
    }

    /// A value copy of the full history, most recent first.
    pub fn orders(&self) -> Vec<Order> {
        self.with_history(|h| h.orders().to_vec())
    }

    fn with_history<R>(&self, f: impl FnOnce(&OrderHistory) -> R) -> R {
        let history = self.history.lock().expect("Order mutex poisoned");
        f(&history)
    }

    async fn flush(&self, orders: Vec<Order>) -> StoreResult<()> {
        self.snapshot.save(ORDERS_KEY, &orders).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tekova_core::{OrderLine, ShippingAddress};

    use crate::error::StoreError;
    use crate::snapshot::SnapshotConfig;

    fn test_draft() -> OrderDraft {
        OrderDraft {
            status: OrderStatus::Pending,
            items: vec![OrderLine {
                product_id: 1,
                title: "Ceramic Mug".to_string(),
                price_cents: 1250,
                image: "https://img/1.jpg".to_string(),
                quantity: 2,
                slug: "ceramic-mug".to_string(),
            }],
            subtotal_cents: 2500,
            shipping_cents: 500,
            total_cents: 3000,
            shipping_address: ShippingAddress {
                full_name: "Jane Roe".to_string(),
                phone: "+1 555 0100".to_string(),
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                postal_code: "12345".to_string(),
                notes: Some("leave at door".to_string()),
            },
            shipping_method: "standard".to_string(),
            payment_method: "card".to_string(),
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
    async fn test_create_prepends_and_mirrors() {
        let snapshot = memory_snapshot().await;
        let store = OrderStore::hydrate(snapshot.clone()).await.unwrap();

        let first = store.create(test_draft()).await.unwrap();
        let second = store.create(test_draft()).await.unwrap();

        assert_eq!(store.total_orders(), 2);
        assert_eq!(store.orders()[0].id, second.id);

        let mirrored: Option<Vec<Order>> = snapshot.load(ORDERS_KEY).await.unwrap();
        let mirrored = mirrored.unwrap();
        assert_eq!(mirrored.len(), 2);
        assert_eq!(mirrored[1].id, first.id);
    }

    #[tokio::test]
    async fn test_history_survives_restart() {
        let snapshot = memory_snapshot().await;
        let created = {
            let store = OrderStore::hydrate(snapshot.clone()).await.unwrap();
            store.create(test_draft()).await.unwrap()
        };

        let reloaded = OrderStore::hydrate(snapshot).await.unwrap();

        let order = reloaded.get(&created.id).unwrap();
        assert_eq!(order.order_number, created.order_number);
        assert_eq!(order.items, created.items);
        assert_eq!(order.total_cents, 3000);
    }

    #[tokio::test]
    async fn test_update_status_mirrors_change() {
        let snapshot = memory_snapshot().await;
        let store = OrderStore::hydrate(snapshot.clone()).await.unwrap();
        let order = store.create(test_draft()).await.unwrap();

        let updated = store
            .update_status(&order.id, OrderStatus::Shipped, Some("ZX9".to_string()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Shipped);
        assert!(updated.estimated_delivery.is_some());

        let mirrored: Option<Vec<Order>> = snapshot.load(ORDERS_KEY).await.unwrap();
        assert_eq!(mirrored.unwrap()[0].tracking_number.as_deref(), Some("ZX9"));
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_is_noop() {
        let store = OrderStore::hydrate(memory_snapshot().await).await.unwrap();
        let result = store
            .update_status("nope", OrderStatus::Shipped, None)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_illegal_transition_surfaces_domain_error() {
        let store = OrderStore::hydrate(memory_snapshot().await).await.unwrap();
        let order = store.create(test_draft()).await.unwrap();
        store
            .update_status(&order.id, OrderStatus::Delivered, None)
            .await
            .unwrap();

        let err = store
            .update_status(&order.id, OrderStatus::Pending, None)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Domain(_)));
        assert_eq!(store.get(&order.id).unwrap().status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_cancel_guard_and_mirror() {
        let snapshot = memory_snapshot().await;
        let store = OrderStore::hydrate(snapshot.clone()).await.unwrap();
        let order = store.create(test_draft()).await.unwrap();

        assert!(store.cancel(&order.id).await.unwrap());
        assert!(!store.cancel(&order.id).await.unwrap());

        let mirrored: Option<Vec<Order>> = snapshot.load(ORDERS_KEY).await.unwrap();
        assert_eq!(mirrored.unwrap()[0].status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_derived_views() {
        let store = OrderStore::hydrate(memory_snapshot().await).await.unwrap();
        let a = store.create(test_draft()).await.unwrap();
        let _b = store.create(test_draft()).await.unwrap();
        store
            .update_status(&a.id, OrderStatus::Delivered, None)
            .await
            .unwrap();

        assert_eq!(store.total_orders(), 2);
        assert_eq!(store.pending_orders().len(), 1);
        assert_eq!(store.completed_orders().len(), 1);
        assert_eq!(store.by_status(OrderStatus::Delivered).len(), 1);
    }

    #[tokio::test]
    async fn test_clear_mirrors_empty_history() {
        let snapshot = memory_snapshot().await;
        let store = OrderStore::hydrate(snapshot.clone()).await.unwrap();
        store.create(test_draft()).await.unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.total_orders(), 0);
        let mirrored: Option<Vec<Order>> = snapshot.load(ORDERS_KEY).await.unwrap();
        assert_eq!(mirrored, Some(vec![]));
    }
}
