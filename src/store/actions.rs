// Commands accepted by the store

use crate::storage::{Snippet, SnippetFolder};

/// A state-changing command. Dispatch is serialized per command.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch the folder collection from the backend
    GetSnippetFolders,
    SetActiveSnippetFolder(SnippetFolder),
    /// Fetch the snippets of a folder; `None` or the "All Snippets" id fetches everything
    GetSnippets(Option<String>),
    SetActiveSnippet(Option<Snippet>),
    AddSnippetFolder { name: String },
    UpdateSnippetFolder { id: String, name: String },
    SetSnippetFavorite { id: String, favorite: bool },
    GetTechnologies,
}

impl Action {
    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::GetSnippetFolders => "[Snippet Folders] Get",
            Action::SetActiveSnippetFolder(_) => "[Snippet Folders] Set Active",
            Action::GetSnippets(_) => "[Snippets] Get",
            Action::SetActiveSnippet(_) => "[Snippets] Set Active",
            Action::AddSnippetFolder { .. } => "[Snippet Folders] Add",
            Action::UpdateSnippetFolder { .. } => "[Snippet Folders] Update",
            Action::SetSnippetFavorite { .. } => "[Snippets] Set Favorite",
            Action::GetTechnologies => "[Technologies] Get",
        }
    }
}
