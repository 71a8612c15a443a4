// Code snippets storage
// Snippets belong to exactly one folder and can be starred

use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::database::{DatabaseManager, StorageError, StorageResult};

/// Reference from a snippet to the folder holding it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderRef {
    pub id: String,
}

/// A code snippet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snippet {
    pub id: String,
    pub folder: FolderRef,
    pub title: String,
    pub code: String,
    /// Language / technology tag, e.g. "rust"
    pub language: Option<String>,
    pub description: Option<String>,
    /// Starred by the user
    pub favorite: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Input for creating a new snippet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSnippetInput {
    pub folder_id: String,
    pub title: String,
    pub code: String,
    pub language: Option<String>,
    pub description: Option<String>,
}

const SNIPPET_COLUMNS: &str =
    "id, folder_id, title, code, language, description, favorite, created_at, updated_at";

fn snippet_from_row(row: &Row<'_>) -> rusqlite::Result<Snippet> {
    Ok(Snippet {
        id: row.get(0)?,
        folder: FolderRef { id: row.get(1)? },
        title: row.get(2)?,
        code: row.get(3)?,
        language: row.get(4)?,
        description: row.get(5)?,
        favorite: row.get::<_, i32>(6)? != 0,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl DatabaseManager {
    /// Create a new snippet in an existing folder
    pub fn create_snippet(&self, input: CreateSnippetInput) -> StorageResult<Snippet> {
        let id = Uuid::new_v4().to_string();

        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO snippets (id, folder_id, title, code, language, description, favorite)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
                "#,
                params![
                    id,
                    input.folder_id,
                    input.title,
                    input.code,
                    input.language,
                    input.description
                ],
            )?;
            Ok(())
        })?;

        self.get_snippet(&id)?
            .ok_or(StorageError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a snippet by ID
    pub fn get_snippet(&self, id: &str) -> StorageResult<Option<Snippet>> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!("SELECT {SNIPPET_COLUMNS} FROM snippets WHERE id = ?1"),
                params![id],
                snippet_from_row,
            )
            .optional()
        })
    }

    /// Get all snippets
    pub fn get_all_snippets(&self) -> StorageResult<Vec<Snippet>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SNIPPET_COLUMNS} FROM snippets ORDER BY created_at, rowid"
            ))?;

            let snippets = stmt
                .query_map([], snippet_from_row)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(snippets)
        })
    }

    /// Get the snippets of one folder
    pub fn get_snippets_by_folder(&self, folder_id: &str) -> StorageResult<Vec<Snippet>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SNIPPET_COLUMNS} FROM snippets WHERE folder_id = ?1 ORDER BY created_at, rowid"
            ))?;

            let snippets = stmt
                .query_map(params![folder_id], snippet_from_row)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(snippets)
        })
    }

    /// Star or unstar a snippet, returning None when it does not exist
    pub fn set_snippet_favorite(&self, id: &str, favorite: bool) -> StorageResult<Option<Snippet>> {
        let rows = self.with_connection(|conn| {
            conn.execute(
                "UPDATE snippets SET favorite = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![favorite as i32, id],
            )
        })?;

        if rows == 0 {
            return Ok(None);
        }
        self.get_snippet(id)
    }

    /// Distinct languages used by stored snippets, sorted
    pub fn get_snippet_languages(&self) -> StorageResult<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT language FROM snippets WHERE language IS NOT NULL ORDER BY language",
            )?;
            let languages = stmt
                .query_map([], |row| row.get(0))?
                .filter_map(|r| r.ok())
                .collect();
            Ok(languages)
        })
    }
}
