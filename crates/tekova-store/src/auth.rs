//! # Authentication Provider
//!
//! The trait seam between the session container and the remote
//! authentication backend, plus the simulated backend used in this scope.
//!
//! ## Why a Trait Seam?
//! In production the backend is a remote service that may be slow or fail;
//! here it is simulated. The session container only ever sees the trait, so
//! swapping in a real client changes nothing above this line.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use tekova_core::{Identity, PLACEHOLDER_AVATAR};

/// The authentication backend rejected or failed a call.
///
/// Carries the detailed cause for logging; the session container surfaces
/// only a generic reason to its callers.
#[derive(Debug, Error)]
#[error("auth backend: {0}")]
pub struct AuthError(pub String);

/// External authentication backend.
///
/// Both calls suspend; while one is in flight other store operations may
/// interleave. No cancellation or timeout is defined here — callers observe
/// only the eventual success or failure.
#[allow(async_fn_in_trait)]
pub trait AuthProvider {
    /// Verifies an existing account.
    async fn login(&self, email: &str, credential: &str) -> Result<Identity, AuthError>;

    /// Creates a new account.
    async fn register(
        &self,
        name: &str,
        email: &str,
        credential: &str,
    ) -> Result<Identity, AuthError>;
}

// =============================================================================
// Simulated Backend
// =============================================================================

/// Simulated authentication backend.
///
/// Sleeps for a configurable latency (default one second, matching the
/// remote round-trip it stands in for) and returns a fixed mock identity
/// echoing the supplied fields. The `rejecting` variant fails every call,
/// for exercising the failure path.
#[derive(Debug, Clone)]
pub struct SimulatedAuth {
    latency: Duration,
    reject: bool,
}

impl SimulatedAuth {
    /// Backend that accepts every call after the default 1s latency.
    pub fn new() -> Self {
        SimulatedAuth {
            latency: Duration::from_secs(1),
            reject: false,
        }
    }

    /// Overrides the simulated round-trip latency (tests use zero).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Backend that rejects every call.
    pub fn rejecting() -> Self {
        SimulatedAuth {
            latency: Duration::from_millis(0),
            reject: true,
        }
    }

    async fn round_trip(&self, op: &str) -> Result<(), AuthError> {
        debug!(op, latency_ms = self.latency.as_millis() as u64, "Simulated auth call");
        tokio::time::sleep(self.latency).await;

        if self.reject {
            return Err(AuthError(format!("simulated {} rejection", op)));
        }
        Ok(())
    }
}

impl Default for SimulatedAuth {
    fn default() -> Self {
        SimulatedAuth::new()
    }
}

impl AuthProvider for SimulatedAuth {
    async fn login(&self, email: &str, credential: &str) -> Result<Identity, AuthError> {
        self.round_trip("login").await?;

        Ok(Identity {
            id: 1,
            name: "John Doe".to_string(),
            email: email.to_string(),
            avatar: Some(PLACEHOLDER_AVATAR.to_string()),
            credential: credential.to_string(),
        })
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        credential: &str,
    ) -> Result<Identity, AuthError> {
        self.round_trip("register").await?;

        Ok(Identity {
            id: 1,
            name: name.to_string(),
            email: email.to_string(),
            avatar: Some(PLACEHOLDER_AVATAR.to_string()),
            credential: credential.to_string(),
        })
    }
}
