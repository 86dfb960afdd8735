//! # Order Entity and Lifecycle
//!
//! The order history collection and the fulfillment status machine.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Order Lifecycle                                │
//! │                                                                     │
//! │   pending ──► processing ──► shipped ──► delivered (terminal)       │
//! │      │             │            │                                   │
//! │      │             │            └── sets estimated_delivery         │
//! │      │             │                (now + 3 days)                  │
//! │      ▼             ▼                                                │
//! │   cancelled ◄──────┘  (terminal; only from pending/processing)      │
//! │                                                                     │
//! │   Forward skips are legal (pending ──► shipped) — a fulfillment     │
//! │   backend may report states faster than we poll. Backward moves     │
//! │   and exits from terminal states are rejected.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability Rules
//! - History is prepend-only: new orders go to the front
//! - Line items and totals are frozen at creation (value copies of the
//!   cart contents, supplied by the caller)
//! - Only status, tracking number and delivery estimate mutate afterwards

use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::{ESTIMATED_DELIVERY_DAYS, ORDER_NUMBER_PREFIX};

// =============================================================================
// Order Status
// =============================================================================

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted, not yet picked up by fulfillment.
    Pending,

    /// Being prepared for shipment.
    Processing,

    /// Handed to the carrier; delivery estimate is set at this moment.
    Shipped,

    /// Delivered to the customer. Terminal.
    Delivered,

    /// Cancelled before shipment. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Position along the fulfillment chain; `Cancelled` sits outside it.
    fn rank(self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Processing => Some(1),
            OrderStatus::Shipped => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }

    /// Checks whether this status permits any further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Checks whether an order in this status may still be cancelled.
    pub fn is_cancellable(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Checks whether `self -> to` is a legal transition.
    ///
    /// ## Rules
    /// - Terminal states permit nothing
    /// - `Cancelled` is reachable only from a cancellable status
    /// - Otherwise only forward moves along the chain (skips allowed)
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == OrderStatus::Cancelled {
            return self.is_cancellable();
        }
        match (self.rank(), to.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One frozen line in an order.
///
/// ## Snapshot Pattern
/// Copied by value from the cart at checkout. Later cart mutation or catalog
/// changes cannot retroactively alter a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product id at time of purchase.
    pub product_id: i64,

    /// Title at time of purchase.
    pub title: String,

    /// Unit price in cents at time of purchase.
    pub price_cents: i64,

    /// Image URL at time of purchase.
    pub image: String,

    /// Quantity purchased.
    pub quantity: u32,

    /// Product slug at time of purchase.
    pub slug: String,
}

impl From<&crate::cart::CartLine> for OrderLine {
    /// Value-copies a cart line into an order line at checkout.
    fn from(line: &crate::cart::CartLine) -> Self {
        OrderLine {
            product_id: line.product_id,
            title: line.title.clone(),
            price_cents: line.price_cents,
            image: line.image.clone(),
            quantity: line.quantity,
            slug: line.slug.clone(),
        }
    }
}

// =============================================================================
// Shipping Address
// =============================================================================

/// Shipping address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub notes: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

/// A submitted order.
///
/// `id`, `order_number` and `created_at` are assigned at creation and never
/// change; `items` and the totals are frozen caller-supplied copies. The
/// mutable fulfillment envelope is `status`, `tracking_number` and
/// `estimated_delivery`, reachable only through [`OrderHistory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier (UUID v4). This is the true identity; the order
    /// number is cosmetic.
    pub id: String,

    /// Human-shareable order number (`TKV` + time suffix + random suffix).
    /// Not guaranteed globally unique.
    pub order_number: String,

    /// When the order was submitted.
    pub created_at: DateTime<Utc>,

    /// Current fulfillment status.
    pub status: OrderStatus,

    /// Frozen line items, in cart order.
    pub items: Vec<OrderLine>,

    /// Item subtotal in cents, frozen at creation.
    pub subtotal_cents: i64,

    /// Shipping cost in cents, frozen at creation.
    pub shipping_cents: i64,

    /// Grand total in cents, frozen at creation.
    pub total_cents: i64,

    /// Delivery address captured at checkout.
    pub shipping_address: ShippingAddress,

    /// Chosen shipping method (free text from the checkout layer).
    pub shipping_method: String,

    /// Chosen payment method (free text from the checkout layer).
    pub payment_method: String,

    /// Carrier tracking number, attached when fulfillment reports one.
    pub tracking_number: Option<String>,

    /// Estimated delivery timestamp, set when the order ships.
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Everything the checkout layer supplies to create an order.
///
/// The store fills in the identity fields (`id`, `order_number`,
/// `created_at`); it does not read the cart itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub shipping_address: ShippingAddress,
    pub shipping_method: String,
    pub payment_method: String,
}

/// Generates a human-shareable order number.
///
/// ## Format
/// `TKV` + last six digits of the unix-millis clock + four random uppercase
/// alphanumerics. Two orders created within the same millisecond still get
/// distinct numbers thanks to the random suffix; true uniqueness is carried
/// by the UUID order id, never by this string.
fn generate_order_number() -> String {
    let time_part = Utc::now().timestamp_millis().rem_euclid(1_000_000);
    let random_part: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(4)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();

    format!("{}{:06}{}", ORDER_NUMBER_PREFIX, time_part, random_part)
}

// =============================================================================
// Order History
// =============================================================================

/// The append-only order history, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        OrderHistory::default()
    }

    /// Rebuilds a history from a hydrated snapshot (most recent first).
    pub fn from_orders(orders: Vec<Order>) -> Self {
        OrderHistory { orders }
    }

    /// Creates an order from a checkout draft and prepends it to history.
    ///
    /// Assigns the UUID id, the order number and the creation timestamp;
    /// everything else is the caller's frozen data.
    pub fn create(&mut self, draft: OrderDraft) -> Order {
        let order = Order {
            id: Uuid::new_v4().to_string(),
            order_number: generate_order_number(),
            created_at: Utc::now(),
            status: draft.status,
            items: draft.items,
            subtotal_cents: draft.subtotal_cents,
            shipping_cents: draft.shipping_cents,
            total_cents: draft.total_cents,
            shipping_address: draft.shipping_address,
            shipping_method: draft.shipping_method,
            payment_method: draft.payment_method,
            tracking_number: None,
            estimated_delivery: None,
        };

        self.orders.insert(0, order.clone());
        order
    }

    /// Looks up an order by id.
    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// Moves an order to a new status, optionally attaching a tracking
    /// number.
    ///
    /// ## Behavior
    /// - Unknown id: `Ok(None)` — a silent no-op, not an error
    /// - Illegal transition: `Err(InvalidStatusTransition)`, state untouched
    /// - Moving to `Shipped` sets `estimated_delivery` to now + 3 days,
    ///   computed from the moment of this call
    pub fn update_status(
        &mut self,
        order_id: &str,
        new_status: OrderStatus,
        tracking_number: Option<String>,
    ) -> CoreResult<Option<Order>> {
        let Some(order) = self.orders.iter_mut().find(|o| o.id == order_id) else {
            return Ok(None);
        };

        if !order.status.can_transition_to(new_status) {
            return Err(CoreError::InvalidStatusTransition {
                order_id: order_id.to_string(),
                from: order.status,
                to: new_status,
            });
        }

        order.status = new_status;
        if let Some(tracking) = tracking_number {
            order.tracking_number = Some(tracking);
        }
        if new_status == OrderStatus::Shipped {
            order.estimated_delivery = Some(Utc::now() + Duration::days(ESTIMATED_DELIVERY_DAYS));
        }

        Ok(Some(order.clone()))
    }

    /// Cancels an order.
    ///
    /// ## Returns
    /// `true` and status `cancelled` only when the current status is
    /// `pending` or `processing`; `false` otherwise, state untouched.
    /// Unknown ids also return `false`.
    pub fn cancel(&mut self, order_id: &str) -> bool {
        match self.orders.iter_mut().find(|o| o.id == order_id) {
            Some(order) if order.status.is_cancellable() => {
                order.status = OrderStatus::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// All orders with exactly the given status, most recent first.
    pub fn by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    /// Derived: number of orders ever submitted (minus administrative
    /// clears).
    pub fn total_orders(&self) -> usize {
        self.orders.len()
    }

    /// Derived: orders still in flight (`pending` or `processing`).
    pub fn pending_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.status.is_cancellable())
            .collect()
    }

    /// Derived: orders that reached `delivered`.
    pub fn completed_orders(&self) -> Vec<&Order> {
        self.by_status(OrderStatus::Delivered)
    }

    /// Administrative reset: empties the history.
    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Read access to the full history, most recent first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}
