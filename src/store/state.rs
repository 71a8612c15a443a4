// Normalized client state held by the store, plus the selectors reading it

use serde::{Deserialize, Serialize};

use crate::storage::{Snippet, SnippetFolder};

/// A language / technology known from the snippet collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Technology {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnippetState {
    /// Every snippet fetched so far
    pub snippets: Vec<Snippet>,
    /// Snippets of the last fetched folder
    pub shown: Vec<Snippet>,
    pub active: Option<Snippet>,
    pub fetched: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnippetFolderState {
    pub folders: Vec<SnippetFolder>,
    pub active: Option<SnippetFolder>,
    pub fetched: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub snippets: SnippetState,
    pub snippet_folders: SnippetFolderState,
    pub technologies: Vec<Technology>,
}

impl SnippetState {
    /// Replace `snippet` wherever a copy of it is held
    pub(crate) fn replace(&mut self, snippet: &Snippet) {
        for held in self.snippets.iter_mut().chain(self.shown.iter_mut()) {
            if held.id == snippet.id {
                *held = snippet.clone();
            }
        }
        if let Some(active) = self.active.as_mut() {
            if active.id == snippet.id {
                *active = snippet.clone();
            }
        }
    }
}

/// Query functions over [`StoreState`], used with `Store::select`
pub mod selectors {
    use super::*;

    pub fn all_snippets(state: &StoreState) -> Vec<Snippet> {
        state.snippets.snippets.clone()
    }

    pub fn snippets_shown(state: &StoreState) -> Vec<Snippet> {
        state.snippets.shown.clone()
    }

    pub fn active_snippet(state: &StoreState) -> Option<Snippet> {
        state.snippets.active.clone()
    }

    pub fn snippets_fetched(state: &StoreState) -> bool {
        state.snippets.fetched
    }

    pub fn all_folders(state: &StoreState) -> Vec<SnippetFolder> {
        state.snippet_folders.folders.clone()
    }

    pub fn active_folder(state: &StoreState) -> Option<SnippetFolder> {
        state.snippet_folders.active.clone()
    }

    pub fn folders_fetched(state: &StoreState) -> bool {
        state.snippet_folders.fetched
    }

    pub fn technologies(state: &StoreState) -> Vec<Technology> {
        state.technologies.clone()
    }

    /// Snippets and folders together, for projections needing both
    pub fn snippets_with_folders(state: &StoreState) -> (Vec<Snippet>, Vec<SnippetFolder>) {
        (all_snippets(state), all_folders(state))
    }
}
