//! # Shared Entity Types
//!
//! Types shared across the four containers.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Shared Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐          ┌─────────────────┐                   │
//! │  │    Product      │          │    Identity     │                   │
//! │  │  ─────────────  │          │  ─────────────  │                   │
//! │  │  id (i64)       │          │  id (i64)       │                   │
//! │  │  title          │          │  name           │                   │
//! │  │  price_cents    │          │  email          │                   │
//! │  │  images[]       │          │  avatar?        │                   │
//! │  │  slug           │          │  credential     │                   │
//! │  └─────────────────┘          └─────────────────┘                   │
//! │   supplied by catalog          owned by SessionStore                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Integer Money
//! All prices are cents (`i64`). Floating-point money is forbidden in this
//! workspace; aggregates stay exact under summation.

use serde::{Deserialize, Serialize};

use crate::PLACEHOLDER_IMAGE;

// =============================================================================
// Product
// =============================================================================

/// A catalog product, as handed to `add` operations by the upstream
/// catalog service.
///
/// The containers never store a `Product` directly; cart and wishlist lines
/// snapshot the fields they need (including exactly one image) at insertion
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog product id; the unique line key in cart and wishlist.
    pub id: i64,

    /// Display title.
    pub title: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Image URLs; the first one is snapshotted onto lines.
    pub images: Vec<String>,

    /// URL slug for linking back to the product page.
    pub slug: String,
}

impl Product {
    /// Returns the product's primary image, or the placeholder when the
    /// catalog supplied none.
    pub fn primary_image(&self) -> String {
        self.images
            .first()
            .cloned()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
    }
}

// =============================================================================
// Identity
// =============================================================================

/// An authenticated identity.
///
/// Presence of an `Identity` in the session container IS the authentication
/// predicate; there is no separate flag to drift out of sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Numeric account id as issued by the auth backend.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Email address the identity signed in with.
    pub email: String,

    /// Optional avatar image URL.
    pub avatar: Option<String>,

    /// Credential material echoed by the (simulated) auth backend.
    pub credential: String,
}
