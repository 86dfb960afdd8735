//! # Store Error Types
//!
//! Error types for the state containers and the snapshot mirror.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  SQLite error (sqlx::Error) ── or ── JSON error (serde_json)        │
//! │       │                                   │                         │
//! │       └────────────┬──────────────────────┘                         │
//! │                    ▼                                                │
//! │  SnapshotError  ← adds context and categorization                   │
//! │                    │                                                │
//! │                    ▼                                                │
//! │  StoreError     ← what the presentation layer sees; also carries    │
//! │                   auth failures and domain rule violations          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal to the process; every failure is local and the
//! user action can simply be retried.

use thiserror::Error;

use tekova_core::CoreError;

// =============================================================================
// Snapshot Error
// =============================================================================

/// Durable mirror failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The SQLite file could not be opened or the pool could not connect.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Embedded migrations failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A snapshot read or write failed at the SQL level.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A collection could not be serialized to its JSON record.
    ///
    /// The reverse direction (unparseable stored JSON) never surfaces as
    /// an error: hydration resets the corrupt record instead.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for SnapshotError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                SnapshotError::ConnectionFailed(err.to_string())
            }
            other => SnapshotError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for SnapshotError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        SnapshotError::MigrationFailed(err.to_string())
    }
}

/// Convenience type alias for snapshot results.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

// =============================================================================
// Store Error
// =============================================================================

/// Errors surfaced by the state containers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The durable mirror failed. In-memory state may already hold the
    /// mutation (at-most-once durability).
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The authentication backend rejected or failed the call.
    ///
    /// The reason is deliberately generic ("Login failed"); the detailed
    /// cause is logged, never shown.
    #[error("{reason}")]
    Auth { reason: String },

    /// A domain rule rejected the mutation (e.g. an illegal order status
    /// transition). State is untouched.
    #[error(transparent)]
    Domain(#[from] CoreError),
}

/// Convenience type alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tekova_core::OrderStatus;

    #[test]
    fn test_auth_error_message_is_generic() {
        let err = StoreError::Auth {
            reason: "Login failed".to_string(),
        };
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn test_domain_error_passes_through() {
        let core = CoreError::InvalidStatusTransition {
            order_id: "o1".to_string(),
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        };
        let err: StoreError = core.into();
        assert!(err.to_string().contains("delivered"));
    }
}
