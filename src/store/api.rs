// Snippet backend seam
// The store reaches the backend only through this trait

use async_trait::async_trait;
use std::sync::Arc;

use super::state::Technology;
use super::StoreError;
use crate::storage::{CreateFolderInput, DatabaseManager, Snippet, SnippetFolder, UpdateFolderInput};

/// Backend serving folders and snippets
#[async_trait]
pub trait SnippetApi: Send + Sync {
    async fn fetch_folders(&self) -> Result<Vec<SnippetFolder>, StoreError>;

    /// `None` fetches every snippet
    async fn fetch_snippets(&self, folder_id: Option<&str>) -> Result<Vec<Snippet>, StoreError>;

    async fn create_folder(&self, name: &str) -> Result<SnippetFolder, StoreError>;

    async fn rename_folder(&self, id: &str, name: &str) -> Result<SnippetFolder, StoreError>;

    async fn set_favorite(&self, snippet_id: &str, favorite: bool) -> Result<Snippet, StoreError>;

    async fn fetch_technologies(&self) -> Result<Vec<Technology>, StoreError>;
}

/// Backend served from the local SQLite database
pub struct LocalSnippetApi {
    db: Arc<DatabaseManager>,
}

impl LocalSnippetApi {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnippetApi for LocalSnippetApi {
    async fn fetch_folders(&self) -> Result<Vec<SnippetFolder>, StoreError> {
        Ok(self.db.get_all_folders()?)
    }

    async fn fetch_snippets(&self, folder_id: Option<&str>) -> Result<Vec<Snippet>, StoreError> {
        let snippets = match folder_id {
            Some(id) => self.db.get_snippets_by_folder(id)?,
            None => self.db.get_all_snippets()?,
        };
        Ok(snippets)
    }

    async fn create_folder(&self, name: &str) -> Result<SnippetFolder, StoreError> {
        Ok(self.db.create_folder(CreateFolderInput {
            name: name.to_string(),
        })?)
    }

    async fn rename_folder(&self, id: &str, name: &str) -> Result<SnippetFolder, StoreError> {
        self.db
            .update_folder(
                id,
                UpdateFolderInput {
                    name: Some(name.to_string()),
                },
            )?
            .ok_or_else(|| StoreError::NotFound(format!("folder {id}")))
    }

    async fn set_favorite(&self, snippet_id: &str, favorite: bool) -> Result<Snippet, StoreError> {
        self.db
            .set_snippet_favorite(snippet_id, favorite)?
            .ok_or_else(|| StoreError::NotFound(format!("snippet {snippet_id}")))
    }

    async fn fetch_technologies(&self) -> Result<Vec<Technology>, StoreError> {
        Ok(self
            .db
            .get_snippet_languages()?
            .into_iter()
            .map(|name| Technology { name })
            .collect())
    }
}
