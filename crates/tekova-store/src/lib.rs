//! # tekova-store: State Containers for the Tekova Shopping Experience
//!
//! Four independent state containers over the pure collections in
//! `tekova-core`, each pairing an in-memory collection with a durable
//! snapshot mirror (except the wishlist, which is session-scoped by design).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Tekova State Containers                          │
//! │                                                                     │
//! │  Presentation layer (external) constructs the stores once and       │
//! │  passes them by reference — no globals, no singletons.              │
//! │                                                                     │
//! │  ┌──────────────┐ ┌───────────┐ ┌───────────────┐ ┌────────────┐    │
//! │  │ SessionStore │ │ CartStore │ │ WishlistStore │ │ OrderStore │    │
//! │  │  auth-user   │ │cart-items │ │  (no mirror)  │ │user-orders │    │
//! │  └──────┬───────┘ └─────┬─────┘ └───────────────┘ └─────┬──────┘    │
//! │         │               │                               │           │
//! │         └───────────────┴───────────┬───────────────────┘           │
//! │                                     ▼                               │
//! │                            ┌─────────────────┐                      │
//! │                            │  SnapshotStore  │  SQLite, one JSON    │
//! │                            │  (snapshot.rs)  │  record per key      │
//! │                            └─────────────────┘                      │
//! │                                                                     │
//! │  NO cross-store transactions: checkout is the composing layer       │
//! │  sequencing independent calls (see tests/checkout.rs).              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`snapshot`] - The durable snapshot mirror (SQLite + embedded migration)
//! - [`session`] - Signed-in identity container
//! - [`cart`] - Pre-checkout item selection container
//! - [`wishlist`] - Saved-for-later container (no mirror)
//! - [`orders`] - Order history container
//! - [`auth`] - Auth backend trait seam + simulated backend
//! - [`error`] - Store and snapshot error types
//!
//! ## Durability Contract
//! Every mutation follows mutate-then-flush: in-memory state first, then an
//! awaited full-snapshot write. A crash between the two loses at most that
//! one mutation; hydration at startup recovers everything flushed before it.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod error;
pub mod orders;
pub mod session;
pub mod snapshot;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{AuthError, AuthProvider, SimulatedAuth};
pub use cart::{CartStore, CART_KEY};
pub use error::{SnapshotError, SnapshotResult, StoreError, StoreResult};
pub use orders::{OrderStore, ORDERS_KEY};
pub use session::{SessionStore, SESSION_KEY};
pub use snapshot::{SnapshotConfig, SnapshotStore};
pub use wishlist::WishlistStore;
