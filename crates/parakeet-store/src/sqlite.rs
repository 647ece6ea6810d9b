//! SQLite-backed conversation store
//!
//! WAL mode allows concurrent readers with a single writer, which matches
//! the access pattern here: one read plus two writes per conversational
//! turn, across independent sessions.

use async_trait::async_trait;
use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OpenFlags};

use parakeet_core::{Message, Role};

use crate::{ConversationStore, StoreError};

type DbPool = Pool<SqliteConnectionManager>;

/// SQLite store configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file path; `:memory:` opens a private in-memory database
    /// per pooled connection and is only useful with a pool of one.
    pub path: String,
    /// Busy timeout for SQLite connections, in milliseconds
    pub busy_timeout_ms: u64,
    /// Maximum number of pooled connections
    pub pool_max_size: u32,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "parakeet.db".to_string(),
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// SQLite implementation of the conversation store
#[derive(Clone)]
pub struct SqliteConversationStore {
    pool: DbPool,
}

impl SqliteConversationStore {
    /// Open (or create) the database and build the connection pool.
    pub fn open(config: SqliteConfig) -> Result<Self, StoreError> {
        tracing::info!(path = %config.path, "Opening conversation store");

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

        let busy_timeout_ms = config.busy_timeout_ms;
        let manager = SqliteConnectionManager::file(&config.path)
            .with_flags(flags)
            .with_init(move |conn| {
                // In-memory databases report "memory", which is acceptable.
                let journal_mode: String =
                    conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
                if journal_mode != "wal" && journal_mode != "memory" {
                    return Err(rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                        Some(format!(
                            "failed to set WAL journal mode, got: {}",
                            journal_mode
                        )),
                    ));
                }
                conn.execute_batch(&format!("PRAGMA busy_timeout = {};", busy_timeout_ms))
            });

        let pool = Pool::builder()
            .max_size(config.pool_max_size)
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Ensure the messages table exists.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let conn = pool.get()?;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS messages (
                     id         INTEGER PRIMARY KEY AUTOINCREMENT,
                     session_id TEXT NOT NULL,
                     role       TEXT NOT NULL,
                     content    TEXT NOT NULL,
                     created_at TEXT NOT NULL
                 );
                 CREATE INDEX IF NOT EXISTS idx_messages_session
                     ON messages (session_id);",
            )?;
            Ok(())
        })
        .await?;

        tracing::debug!("Conversation store schema ensured");
        Ok(())
    }

    async fn append(&self, session_id: &str, role: Role, content: &str) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        let content = content.to_string();

        run_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO messages (session_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    session_id,
                    role.to_string(),
                    content,
                    Utc::now().to_rfc3339()
                ],
            )?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn messages(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        let pool = self.pool.clone();
        let session_id = session_id.to_string();

        run_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT role, content FROM messages
                 WHERE session_id = ?1
                 ORDER BY id ASC",
            )?;

            let rows = stmt.query_map(params![session_id], |row| {
                let role: String = row.get(0)?;
                let content: String = row.get(1)?;
                Ok((role, content))
            })?;

            let mut messages = Vec::new();
            for row in rows {
                let (role, content) = row?;
                let role = Role::parse(&role)
                    .ok_or_else(|| StoreError::InvalidData(format!("unknown role: {role}")))?;
                messages.push(Message { role, content });
            }
            Ok(messages)
        })
        .await
    }

    async fn add_user_message(&self, session_id: &str, content: &str) -> Result<(), StoreError> {
        self.append(session_id, Role::User, content).await
    }

    async fn add_assistant_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<(), StoreError> {
        self.append(session_id, Role::Assistant, content).await
    }
}

/// Run a blocking store operation on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store(dir: &tempfile::TempDir) -> SqliteConversationStore {
        let config = SqliteConfig {
            path: dir
                .path()
                .join("history.db")
                .to_string_lossy()
                .into_owned(),
            ..SqliteConfig::default()
        };
        let store = SqliteConversationStore::open(config).unwrap();
        store.ensure_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(store.messages("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        store.add_user_message("s1", "hello").await.unwrap();
        store.add_assistant_message("s1", "hi there").await.unwrap();
        store.add_user_message("s1", "how are you?").await.unwrap();

        let messages = store.messages("s1").await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::user("hello"));
        assert_eq!(messages[1], Message::assistant("hi there"));
        assert_eq!(messages[2], Message::user("how are you?"));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        store.add_user_message("s1", "one").await.unwrap();
        store.add_user_message("s2", "two").await.unwrap();

        assert_eq!(store.messages("s1").await.unwrap().len(), 1);
        assert_eq!(store.messages("s2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join("history.db")
            .to_string_lossy()
            .into_owned();

        {
            let store = SqliteConversationStore::open(SqliteConfig {
                path: path.clone(),
                ..SqliteConfig::default()
            })
            .unwrap();
            store.ensure_schema().await.unwrap();
            store.add_user_message("s1", "persisted").await.unwrap();
        }

        let store = SqliteConversationStore::open(SqliteConfig {
            path,
            ..SqliteConfig::default()
        })
        .unwrap();
        store.ensure_schema().await.unwrap();

        let messages = store.messages("s1").await.unwrap();
        assert_eq!(messages, vec![Message::user("persisted")]);
    }
}
