//! # Snapshot Mirror
//!
//! The durable mirror every persistent container writes through.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Mirror Data Flow                        │
//! │                                                                     │
//! │  Container mutation (add_to_cart, login, create_order, ...)         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  1. Mutate in-memory collection under the mutex                     │
//! │  2. Clone the collection, drop the lock                             │
//! │  3. await save(key, &collection)  ← full-collection rewrite         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────┐                        │
//! │  │  snapshots table (SQLite)               │                        │
//! │  │  ┌─────────────┬──────────────────────┐ │                        │
//! │  │  │ auth-user   │ {"id":1,...}         │ │                        │
//! │  │  │ cart-items  │ [{...},{...}]        │ │                        │
//! │  │  │ user-orders │ [{...}]              │ │                        │
//! │  │  └─────────────┴──────────────────────┘ │                        │
//! │  └─────────────────────────────────────────┘                        │
//! │                                                                     │
//! │  On startup each container hydrates from its row:                   │
//! │    absent row      → empty/unset initial state                      │
//! │    unparseable row → warn, delete the row, start empty              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! WAL (Write-Ahead Logging) is enabled so snapshot reads never block the
//! frequent small writes, and the file survives crashes cleanly.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{SnapshotError, SnapshotResult};

/// Embedded migrations from the `migrations/` directory.
///
/// The `sqlx::migrate!()` macro embeds the SQL files into the binary at
/// compile time; there is no runtime file access and running them twice is
/// a no-op.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// =============================================================================
// Configuration
// =============================================================================

/// Snapshot store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SnapshotConfig::new("~/.local/share/tekova/state.db")
///     .max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one reader, one writer is plenty for a client app)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    pub min_connections: u32,

    /// Connection timeout duration.
    pub connect_timeout: Duration,

    /// Whether to run migrations on connect.
    pub run_migrations: bool,
}

impl SnapshotConfig {
    /// Creates a configuration for the given database path. The file is
    /// created on first connect if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// A single kept-alive connection, because every new in-memory
    /// connection would see its own empty database.
    pub fn in_memory() -> Self {
        SnapshotConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// Snapshot Store
// =============================================================================

/// Handle to the snapshots table.
///
/// Cheap to clone; all four containers share one `SnapshotStore` but own
/// disjoint keys, so there is no write contention between them beyond the
/// SQLite file lock.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    pool: SqlitePool,
}

impl SnapshotStore {
    /// Opens (and if needed creates) the snapshot database.
    ///
    /// ## What This Does
    /// 1. Opens the SQLite file in WAL mode, creating it if missing
    /// 2. Builds the connection pool
    /// 3. Applies embedded migrations (unless disabled)
    pub async fn open(config: SnapshotConfig) -> SnapshotResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening snapshot database"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| SnapshotError::ConnectionFailed(e.to_string()))?
        } else {
            let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&url)
                .map_err(|e| SnapshotError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| SnapshotError::ConnectionFailed(e.to_string()))?;

        let store = SnapshotStore { pool };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Applies all pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> SnapshotResult<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("Snapshot migrations applied");
        Ok(())
    }

    /// Serializes `value` and rewrites the record under `key`.
    pub async fn save<T: Serialize>(&self, key: &str, value: &T) -> SnapshotResult<()> {
        let json = serde_json::to_string(value)?;
        debug!(key, bytes = json.len(), "Writing snapshot");

        sqlx::query(
            r#"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Loads and deserializes the record under `key`.
    ///
    /// ## Returns
    /// - `Ok(Some(T))` - record present and parseable
    /// - `Ok(None)` - no record under this key
    /// - `Err(Serialization)` - record present but unparseable (callers
    ///   hydrating at startup should prefer [`SnapshotStore::load_or_reset`])
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> SnapshotResult<Option<T>> {
        let row: Option<String> = sqlx::query_scalar("SELECT value FROM snapshots WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Loads the record under `key`, resetting it when corrupt.
    ///
    /// ## Corruption Policy
    /// An unparseable record is logged with `warn!`, its row is deleted,
    /// and hydration proceeds as if the record were absent. A corrupt
    /// mirror costs the user their saved collection, never a startup crash.
    pub async fn load_or_reset<T: DeserializeOwned>(&self, key: &str) -> SnapshotResult<Option<T>> {
        match self.load(key).await {
            Ok(value) => Ok(value),
            Err(SnapshotError::Serialization(err)) => {
                warn!(key, %err, "Corrupt snapshot record, resetting to empty");
                self.remove(key).await?;
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Deletes the record under `key` entirely (no tombstone).
    pub async fn remove(&self, key: &str) -> SnapshotResult<()> {
        debug!(key, "Removing snapshot");

        sqlx::query("DELETE FROM snapshots WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Returns a reference to the underlying pool (tests and diagnostics).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool. After this every snapshot operation fails.
    pub async fn close(&self) {
        info!("Closing snapshot database");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Probe {
        n: i64,
        label: String,
    }

    async fn memory_store() -> SnapshotStore {
        SnapshotStore::open(SnapshotConfig::in_memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let store = memory_store().await;
        let value = Probe {
            n: 7,
            label: "seven".to_string(),
        };

        store.save("probe", &value).await.unwrap();
        let loaded: Option<Probe> = store.load("probe").await.unwrap();

        assert_eq!(loaded, Some(value));
    }

    #[tokio::test]
    async fn test_load_absent_key_is_none() {
        let store = memory_store().await;
        let loaded: Option<Probe> = store.load("missing").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_full_record() {
        let store = memory_store().await;
        store
            .save("probe", &Probe { n: 1, label: "a".into() })
            .await
            .unwrap();
        store
            .save("probe", &Probe { n: 2, label: "b".into() })
            .await
            .unwrap();

        let loaded: Option<Probe> = store.load("probe").await.unwrap();
        assert_eq!(loaded.unwrap().n, 2);
    }

    #[tokio::test]
    async fn test_remove_deletes_record() {
        let store = memory_store().await;
        store
            .save("probe", &Probe { n: 1, label: "a".into() })
            .await
            .unwrap();

        store.remove("probe").await.unwrap();

        let loaded: Option<Probe> = store.load("probe").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_or_reset_clears_corrupt_record() {
        let store = memory_store().await;

        sqlx::query("INSERT INTO snapshots (key, value, updated_at) VALUES (?1, ?2, ?3)")
            .bind("probe")
            .bind("{not json")
            .bind(Utc::now().to_rfc3339())
            .execute(store.pool())
            .await
            .unwrap();

        let loaded: Option<Probe> = store.load_or_reset("probe").await.unwrap();
        assert!(loaded.is_none());

        // The corrupt row is gone, so a plain load succeeds too.
        let reloaded: Option<Probe> = store.load("probe").await.unwrap();
        assert!(reloaded.is_none());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let store = memory_store().await;
        store.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_store_rejects_writes() {
        let store = memory_store().await;
        store.close().await;

        let result = store.save("probe", &Probe { n: 1, label: "a".into() }).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = SnapshotConfig::new("/tmp/test.db")
            .max_connections(4)
            .connect_timeout(Duration::from_secs(3));

        assert_eq!(config.max_connections, 4);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.is_in_memory());
        assert!(SnapshotConfig::in_memory().is_in_memory());
    }
}
