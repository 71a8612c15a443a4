// Snippet folders data model and storage operations
// Folders group snippets; "All Snippets" is synthetic and never stored

use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::database::{DatabaseManager, StorageError, StorageResult};

/// Id of the synthetic folder representing the unfiltered view
pub const ALL_SNIPPETS_FOLDER_ID: &str = "all";
pub const ALL_SNIPPETS_FOLDER_NAME: &str = "All Snippets";

/// A named grouping of snippets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnippetFolder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl SnippetFolder {
    /// The synthetic "All Snippets" folder, selected by default on the dashboard
    pub fn all_snippets() -> Self {
        Self {
            id: ALL_SNIPPETS_FOLDER_ID.to_string(),
            name: ALL_SNIPPETS_FOLDER_NAME.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// Input for creating a new folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderInput {
    pub name: String,
}

/// Input for updating an existing folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFolderInput {
    pub name: Option<String>,
}

fn folder_from_row(row: &Row<'_>) -> rusqlite::Result<SnippetFolder> {
    Ok(SnippetFolder {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

impl DatabaseManager {
    /// Create a new folder
    pub fn create_folder(&self, input: CreateFolderInput) -> StorageResult<SnippetFolder> {
        let id = Uuid::new_v4().to_string();

        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO snippet_folders (id, name, created_at, updated_at)
                VALUES (?1, ?2, datetime('now'), datetime('now'))
                "#,
                params![id, input.name],
            )?;
            Ok(())
        })?;

        self.get_folder(&id)?
            .ok_or(StorageError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a folder by ID
    pub fn get_folder(&self, id: &str) -> StorageResult<Option<SnippetFolder>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, name, created_at, updated_at FROM snippet_folders WHERE id = ?1",
                params![id],
                folder_from_row,
            )
            .optional()
        })
    }

    /// Get all folders in creation order
    pub fn get_all_folders(&self) -> StorageResult<Vec<SnippetFolder>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, created_at, updated_at
                 FROM snippet_folders ORDER BY created_at, rowid",
            )?;

            let folders = stmt
                .query_map([], folder_from_row)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(folders)
        })
    }

    /// Update an existing folder, returning None when it does not exist
    pub fn update_folder(
        &self,
        id: &str,
        input: UpdateFolderInput,
    ) -> StorageResult<Option<SnippetFolder>> {
        if self.get_folder(id)?.is_none() {
            return Ok(None);
        }

        if let Some(name) = input.name {
            self.with_connection(|conn| {
                conn.execute(
                    "UPDATE snippet_folders SET name = ?1, updated_at = datetime('now') WHERE id = ?2",
                    params![name, id],
                )
            })?;
        }

        self.get_folder(id)
    }
}
