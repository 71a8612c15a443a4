// Bucketed key-value storage backing the offline mirror
// Every write replaces a whole (bucket, key) entry

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::database::{DatabaseManager, StorageResult};

/// Named buckets of the offline mirror
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StorageFolder {
    /// Folder collections, keyed by feature
    Folders,
    /// Snippet lists keyed by folder id, plus the "starred" list
    Snippets,
}

impl StorageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageFolder::Folders => "folders",
            StorageFolder::Snippets => "snippets",
        }
    }
}

/// Key-value storage organised in buckets
pub trait KeyValueStorage: Send + Sync {
    fn set_item(&self, bucket: StorageFolder, key: &str, value: &Value) -> StorageResult<()>;
    fn get_item(&self, bucket: StorageFolder, key: &str) -> StorageResult<Option<Value>>;
}

/// Serialize `value` and store it under `bucket`/`key`
pub fn write_json<T>(
    storage: &dyn KeyValueStorage,
    bucket: StorageFolder,
    key: &str,
    value: &T,
) -> StorageResult<()>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)?;
    storage.set_item(bucket, key, &value)
}

/// Read and deserialize the entry under `bucket`/`key`
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    bucket: StorageFolder,
    key: &str,
) -> StorageResult<Option<T>> {
    match storage.get_item(bucket, key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

impl KeyValueStorage for DatabaseManager {
    fn set_item(&self, bucket: StorageFolder, key: &str, value: &Value) -> StorageResult<()> {
        let encoded = serde_json::to_string(value)?;
        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO kv_items (bucket, key, value, updated_at)
                VALUES (?1, ?2, ?3, datetime('now'))
                ON CONFLICT(bucket, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')
                "#,
                params![bucket.as_str(), key, encoded],
            )?;
            Ok(())
        })
    }

    fn get_item(&self, bucket: StorageFolder, key: &str) -> StorageResult<Option<Value>> {
        let raw: Option<String> = self.with_connection(|conn| {
            conn.query_row(
                "SELECT value FROM kv_items WHERE bucket = ?1 AND key = ?2",
                params![bucket.as_str(), key],
                |row| row.get(0),
            )
            .optional()
        })?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}
