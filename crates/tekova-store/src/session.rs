//! # Session Store
//!
//! Holds at most one authenticated identity.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Session Lifecycle                              │
//! │                                                                     │
//! │  startup ──► hydrate("auth-user") ──► Some(identity) | None         │
//! │                                                                     │
//! │  login(email, credential)                                           │
//! │      │  is_loading = true                                           │
//! │      ▼                                                              │
//! │  await auth backend  ── failure ──► generic error, state untouched  │
//! │      │  success                                                     │
//! │      ▼                                                              │
//! │  replace identity ──► flush snapshot ──► is_loading = false         │
//! │                                                                     │
//! │  logout() ──► identity = None ──► delete snapshot row (idempotent)  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## is_loading Is Advisory
//! While a login/register call is suspended, other operations (including a
//! second login) may interleave. The flag lets the presentation layer
//! disable duplicate submissions; it is not a lock and enforces nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use tekova_core::Identity;

use crate::auth::AuthProvider;
use crate::error::{StoreError, StoreResult};
use crate::snapshot::SnapshotStore;

/// Durable record key for the session container.
pub const SESSION_KEY: &str = "auth-user";

/// The session state container.
///
/// Generic over the auth backend so tests and future real clients plug in
/// behind the same seam.
#[derive(Debug)]
pub struct SessionStore<A: AuthProvider> {
    current: Mutex<Option<Identity>>,
    is_loading: AtomicBool,
    auth: A,
    snapshot: Arc<SnapshotStore>,
}

impl<A: AuthProvider> SessionStore<A> {
    /// Builds the store, hydrating the identity from its durable record.
    ///
    /// Absent record → signed out; corrupt record → reset to signed out.
    pub async fn hydrate(snapshot: Arc<SnapshotStore>, auth: A) -> StoreResult<Self> {
        let current: Option<Identity> = snapshot.load_or_reset(SESSION_KEY).await?;
        if current.is_some() {
            info!("Session hydrated: signed in");
        }

        Ok(SessionStore {
            current: Mutex::new(current),
            is_loading: AtomicBool::new(false),
            auth,
            snapshot,
        })
    }

    /// Authenticates against the backend and replaces the stored identity.
    ///
    /// ## Behavior
    /// - Backend failure: prior state untouched, generic "Login failed"
    ///   reason (the detailed cause is logged, never surfaced)
    /// - Success: identity replaced and mirrored durably
    pub async fn login(&self, email: &str, credential: &str) -> StoreResult<Identity> {
        debug!(email, "login");
        self.is_loading.store(true, Ordering::SeqCst);
        let result = self.auth.login(email, credential).await;
        self.is_loading.store(false, Ordering::SeqCst);

        let identity = result.map_err(|err| {
            warn!(%err, "Login rejected by auth backend");
            StoreError::Auth {
                reason: "Login failed".to_string(),
            }
        })?;

        self.replace(identity).await
    }

    /// Creates a new account and stores the resulting identity.
    ///
    /// Same contract as [`SessionStore::login`], with a "Registration
    /// failed" reason.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        credential: &str,
    ) -> StoreResult<Identity> {
        debug!(email, "register");
        self.is_loading.store(true, Ordering::SeqCst);
        let result = self.auth.register(name, email, credential).await;
        self.is_loading.store(false, Ordering::SeqCst);

        let identity = result.map_err(|err| {
            warn!(%err, "Registration rejected by auth backend");
            StoreError::Auth {
                reason: "Registration failed".to_string(),
            }
        })?;

        self.replace(identity).await
    }

    async fn replace(&self, identity: Identity) -> StoreResult<Identity> {
        {
            let mut current = self.current.lock().expect("Session mutex poisoned");
            *current = Some(identity.clone());
        }
        self.snapshot.save(SESSION_KEY, &identity).await?;
        Ok(identity)
    }

    /// Signs out unconditionally and deletes the durable record (no
    /// tombstone). Idempotent.
    pub async fn logout(&self) -> StoreResult<()> {
        debug!("logout");
        {
            let mut current = self.current.lock().expect("Session mutex poisoned");
            *current = None;
        }
        self.snapshot.remove(SESSION_KEY).await?;
        Ok(())
    }

    /// The stored identity, if signed in.
    pub fn current(&self) -> Option<Identity> {
        self.current
            .lock()
            .expect("Session mutex poisoned")
            .clone()
    }

    /// Derived: true iff an identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.current
            .lock()
            .expect("Session mutex poisoned")
            .is_some()
    }

    /// Advisory flag: a login/register call is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::auth::SimulatedAuth;
    use crate::snapshot::SnapshotConfig;

    async fn store_with(auth: SimulatedAuth) -> (Arc<SnapshotStore>, SessionStore<SimulatedAuth>) {
        let snapshot = Arc::new(
            SnapshotStore::open(SnapshotConfig::in_memory())
                .await
                .unwrap(),
        );
        let store = SessionStore::hydrate(snapshot.clone(), auth).await.unwrap();
        (snapshot, store)
    }

    fn fast_auth() -> SimulatedAuth {
        SimulatedAuth::new().with_latency(Duration::from_millis(0))
    }

    #[tokio::test]
    async fn test_login_sets_identity_and_mirror() {
        let (snapshot, store) = store_with(fast_auth()).await;
        assert!(!store.is_authenticated());

        let identity = store.login("a@b.com", "pw").await.unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.current().unwrap().email, identity.email);

        let mirrored: Option<Identity> = snapshot.load(SESSION_KEY).await.unwrap();
        assert_eq!(mirrored.unwrap(), identity);
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_untouched() {
        let (snapshot, store) = store_with(fast_auth()).await;
        store.login("a@b.com", "pw").await.unwrap();

        let snapshot2 = snapshot.clone();
        let failing = SessionStore::hydrate(snapshot2, SimulatedAuth::rejecting())
            .await
            .unwrap();
        let err = failing.login("a@b.com", "pw").await.unwrap_err();

        assert_eq!(err.to_string(), "Login failed");
        // Hydrated identity from the earlier login is still present.
        assert!(failing.is_authenticated());
        assert!(!failing.is_loading());
    }

    #[tokio::test]
    async fn test_register_uses_generic_failure_reason() {
        let (_snapshot, store) = store_with(SimulatedAuth::rejecting()).await;
        let err = store.register("Ada", "ada@b.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Registration failed");
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_and_removes_record() {
        let (snapshot, store) = store_with(fast_auth()).await;
        store.login("a@b.com", "pw").await.unwrap();

        store.logout().await.unwrap();
        store.logout().await.unwrap();

        assert!(!store.is_authenticated());
        let mirrored: Option<Identity> = snapshot.load(SESSION_KEY).await.unwrap();
        assert!(mirrored.is_none());
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let (snapshot, store) = store_with(fast_auth()).await;
        store.login("a@b.com", "pw").await.unwrap();

        let rehydrated = SessionStore::hydrate(snapshot, fast_auth()).await.unwrap();

        assert!(rehydrated.is_authenticated());
        assert_eq!(rehydrated.current().unwrap().email, "a@b.com");
    }
}
