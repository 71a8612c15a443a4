// Durable session token storage
// The token lives under a single flat key of the app_state table

use rusqlite::{params, OptionalExtension};

use super::database::{DatabaseManager, StorageResult};

/// Key the access token is persisted under
pub const TOKEN_KEY: &str = "token";

/// Durable storage for the session access token
pub trait TokenStorage: Send + Sync {
    fn set_token(&self, token: &str) -> StorageResult<()>;
    fn token(&self) -> StorageResult<Option<String>>;
    /// Returns true when a token was present
    fn clear_token(&self) -> StorageResult<bool>;
}

impl DatabaseManager {
    /// Read a flat value from the app_state table
    pub fn get_state(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
    }

    /// Write a flat value, replacing any previous one
    pub fn set_state(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO app_state (key, value, updated_at)
                VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')
                "#,
                params![key, value],
            )?;
            Ok(())
        })
    }

    pub fn delete_state(&self, key: &str) -> StorageResult<bool> {
        self.with_connection(|conn| {
            let rows = conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])?;
            Ok(rows > 0)
        })
    }
}

impl TokenStorage for DatabaseManager {
    fn set_token(&self, token: &str) -> StorageResult<()> {
        self.set_state(TOKEN_KEY, token)
    }

    fn token(&self) -> StorageResult<Option<String>> {
        self.get_state(TOKEN_KEY)
    }

    fn clear_token(&self) -> StorageResult<bool> {
        self.delete_state(TOKEN_KEY)
    }
}
