//! SQLite history backend.
//!
//! A single database file with one append-only `turns` table, indexed by
//! `(conversation_id, created_at)`. The AUTOINCREMENT primary key doubles as
//! the ordering tie-breaker for turns persisted within the same millisecond.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use textline_core::error::StorageError;
use textline_core::store::HistoryStore;
use textline_core::turn::{ConversationId, Role, Turn};
use tracing::{debug, info};

/// The production SQLite history store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and table are created automatically.
    /// Pass `":memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StorageError::Unavailable(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Unavailable(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite history store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS turns (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id TEXT NOT NULL,
                role            TEXT NOT NULL,
                content         TEXT NOT NULL,
                created_at      TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::MigrationFailed(format!("turns table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_turns_conversation
             ON turns(conversation_id, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::MigrationFailed(format!("conversation index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Parse a `Turn` from a SQLite row.
    fn row_to_turn(row: &sqlx::sqlite::SqliteRow) -> Result<Turn, StorageError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| StorageError::QueryFailed(format!("id column: {e}")))?;
        let conversation_id: String = row
            .try_get("conversation_id")
            .map_err(|e| StorageError::QueryFailed(format!("conversation_id column: {e}")))?;
        let role_str: String = row
            .try_get("role")
            .map_err(|e| StorageError::QueryFailed(format!("role column: {e}")))?;
        let content: String = row
            .try_get("content")
            .map_err(|e| StorageError::QueryFailed(format!("content column: {e}")))?;
        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| StorageError::QueryFailed(format!("created_at column: {e}")))?;

        let role: Role = role_str
            .parse()
            .map_err(|e| StorageError::QueryFailed(format!("role value: {e}")))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::QueryFailed(format!("created_at value: {e}")))?;

        Ok(Turn {
            id,
            conversation_id: ConversationId(conversation_id),
            role,
            content,
            created_at,
        })
    }
}

#[async_trait]
impl HistoryStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn append(
        &self,
        conversation_id: &ConversationId,
        role: Role,
        content: &str,
    ) -> Result<Turn, StorageError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO turns (conversation_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(conversation_id.as_str())
        .bind(role.as_str())
        .bind(content)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Unavailable(format!("INSERT failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!(conversation = %conversation_id, role = role.as_str(), id, "Turn appended");

        Ok(Turn {
            id,
            conversation_id: conversation_id.clone(),
            role,
            content: content.to_string(),
            created_at,
        })
    }

    async fn list_turns(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Turn>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, conversation_id, role, content, created_at
             FROM turns
             WHERE conversation_id = ?1
             ORDER BY created_at, id",
        )
        .bind(conversation_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(format!("SELECT failed: {e}")))?;

        rows.iter().map(Self::row_to_turn).collect()
    }

    async fn clear(&self, conversation_id: &ConversationId) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM turns WHERE conversation_id = ?1")
            .bind(conversation_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Unavailable(format!("DELETE failed: {e}")))?;

        let deleted = result.rows_affected();
        info!(conversation = %conversation_id, deleted, "Conversation cleared");
        Ok(deleted)
    }

    async fn count(&self, conversation_id: &ConversationId) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM turns WHERE conversation_id = ?1")
            .bind(conversation_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(format!("COUNT failed: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| StorageError::QueryFailed(format!("cnt column: {e}")))?;

        Ok(cnt as u64)
    }
}
