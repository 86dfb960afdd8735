//! # tekova-core: Pure Domain Logic for the Tekova State Layer
//!
//! This crate is the **heart** of the Tekova client state layer. It contains
//! the entity types and collection logic for all four state containers as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Tekova State Architecture                        │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │              Presentation Layer (external)                    │  │
//! │  │   Product pages ──► Cart view ──► Checkout ──► Order history  │  │
//! │  └─────────────────────────────┬─────────────────────────────────┘  │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │                tekova-store (containers)                      │  │
//! │  │   SessionStore, CartStore, WishlistStore, OrderStore          │  │
//! │  └─────────────────────────────┬─────────────────────────────────┘  │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │               ★ tekova-core (THIS CRATE) ★                    │  │
//! │  │                                                               │  │
//! │  │   ┌─────────┐ ┌──────────┐ ┌──────────────┐ ┌─────────────┐  │  │
//! │  │   │  types  │ │   cart   │ │   wishlist   │ │    order    │  │  │
//! │  │   │ Product │ │   Cart   │ │   Wishlist   │ │ OrderStatus │  │  │
//! │  │   │Identity │ │ CartLine │ │ WishlistLine │ │OrderHistory │  │  │
//! │  │   └─────────┘ └──────────┘ └──────────────┘ └─────────────┘  │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Shared entity types (Product, Identity)
//! - [`cart`] - Cart collection and its invariants
//! - [`wishlist`] - Wishlist collection
//! - [`order`] - Order entity, status state machine, order history
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: collection methods are deterministic apart from
//!    timestamps and the order-number random suffix
//! 2. **No I/O**: persistence lives entirely in `tekova-store`
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Value Copies**: an order freezes its line items at creation; later
//!    cart mutation cannot reach into a submitted order

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod order;
pub mod types;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult};
pub use order::{
    Order, OrderDraft, OrderHistory, OrderLine, OrderStatus, ShippingAddress,
};
pub use types::{Identity, Product};
pub use wishlist::{Wishlist, WishlistLine};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Placeholder image used when a product carries no images.
///
/// Lines snapshot an image URL at insertion time, so an empty catalog image
/// list must resolve to something displayable.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/300x200";

/// Placeholder avatar for identities created by the simulated auth backend.
pub const PLACEHOLDER_AVATAR: &str = "https://placehold.co/100x100";

/// Prefix for generated order numbers (e.g. `TKV483920K7QZ`).
pub const ORDER_NUMBER_PREFIX: &str = "TKV";

/// Days added to the moment an order ships to produce its delivery estimate.
pub const ESTIMATED_DELIVERY_DAYS: i64 = 3;
