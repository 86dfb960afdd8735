//! # Error Types
//!
//! Domain-specific error types for tekova-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  tekova-core errors (this file)                                     │
//! │  └── CoreError      - Domain rule violations                        │
//! │                                                                     │
//! │  tekova-store errors (separate crate)                               │
//! │  ├── SnapshotError  - Durable mirror failures                       │
//! │  └── StoreError     - What the presentation layer sees              │
//! │                                                                     │
//! │  Flow: CoreError → StoreError → Presentation layer                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (order id, statuses)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::order::OrderStatus;

/// Core domain errors.
///
/// Silent no-op paths (removing an absent cart line, updating an unknown
/// order id) are deliberately NOT errors; only genuine rule violations
/// surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The order status machine rejected a transition.
    ///
    /// ## When This Occurs
    /// - Moving backwards along the fulfillment chain
    /// - Leaving a terminal state (`delivered`, `cancelled`)
    /// - Cancelling an order that already shipped
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
