//! Global client state store.
//!
//! The store owns one [`StoreState`] behind a lock. All mutation goes through
//! [`Store::dispatch`]; each command commits at most once, and every commit
//! notifies the registered listeners in commit order. Reads go through
//! [`Store::select`], which pushes the selected value immediately and then
//! again whenever it changes.

pub mod actions;
pub mod api;
pub mod state;

pub use actions::Action;
pub use api::{LocalSnippetApi, SnippetApi};
pub use state::{selectors, SnippetFolderState, SnippetState, StoreState, Technology};

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

use crate::reactive::{Listeners, Subscription};
use crate::storage::{StorageError, ALL_SNIPPETS_FOLDER_ID};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Backend request failed: {0}")]
    Backend(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct Store {
    state: RwLock<StoreState>,
    listeners: Listeners<StoreState>,
    actions: Listeners<Action>,
    // Serializes commit + notification so listeners observe commits in order
    commit_lock: Mutex<()>,
    api: Arc<dyn SnippetApi>,
}

impl Store {
    pub fn new(api: Arc<dyn SnippetApi>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            listeners: Listeners::new(),
            actions: Listeners::new(),
            commit_lock: Mutex::new(()),
            api,
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> StoreState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `selector` once against the current state
    pub fn select_snapshot<R>(&self, selector: impl Fn(&StoreState) -> R) -> R {
        selector(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Observe a projection of the state.
    ///
    /// `on_change` receives the current value before this returns, then every
    /// subsequent value that differs from the previous one. Listeners must not
    /// dispatch synchronously from `on_change`.
    pub fn select<R, S, F>(&self, selector: S, on_change: F) -> Subscription
    where
        S: Fn(&StoreState) -> R + Send + Sync + 'static,
        R: PartialEq + Send + 'static,
        F: Fn(&R) + Send + Sync + 'static,
    {
        let _guard = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.select_snapshot(&selector);
        on_change(&current);

        let last = Mutex::new(current);
        self.listeners.subscribe(move |state| {
            let next = selector(state);
            let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
            if *last != next {
                on_change(&next);
                *last = next;
            }
        })
    }

    /// Observe every dispatched action, before it is applied
    pub fn on_dispatch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Action) + Send + Sync + 'static,
    {
        self.actions.subscribe(callback)
    }

    /// Number of live state listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Apply a command; resolves once its effect is committed or it failed
    pub async fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        let name = action.name();
        debug!(action = name, "dispatch");
        self.actions.emit(&action);

        let result = self.apply(action).await;
        if let Err(err) = &result {
            warn!(action = name, error = %err, "action failed");
        }
        result
    }

    async fn apply(&self, action: Action) -> Result<(), StoreError> {
        match action {
            Action::GetSnippetFolders => {
                let folders = self.api.fetch_folders().await?;
                self.commit(|state| {
                    state.snippet_folders.folders = folders;
                    state.snippet_folders.fetched = true;
                });
            }
            Action::SetActiveSnippetFolder(folder) => {
                self.commit(|state| state.snippet_folders.active = Some(folder));
            }
            Action::GetSnippets(folder_id) => {
                let folder_id = folder_id.filter(|id| id != ALL_SNIPPETS_FOLDER_ID);
                let fetched = self.api.fetch_snippets(folder_id.as_deref()).await?;
                self.commit(|state| {
                    let snippets = &mut state.snippets;
                    match &folder_id {
                        Some(id) => {
                            snippets.snippets.retain(|s| &s.folder.id != id);
                            snippets.snippets.extend(fetched.iter().cloned());
                        }
                        None => snippets.snippets = fetched.clone(),
                    }
                    snippets.shown = fetched;
                    snippets.fetched = true;
                });
            }
            Action::SetActiveSnippet(snippet) => {
                self.commit(|state| state.snippets.active = snippet);
            }
            Action::AddSnippetFolder { name } => {
                let folder = self.api.create_folder(&name).await?;
                self.commit(|state| state.snippet_folders.folders.push(folder));
            }
            Action::UpdateSnippetFolder { id, name } => {
                let folder = self.api.rename_folder(&id, &name).await?;
                self.commit(|state| {
                    let folders = &mut state.snippet_folders;
                    for held in folders.folders.iter_mut().filter(|f| f.id == folder.id) {
                        *held = folder.clone();
                    }
                    if folders.active.as_ref().is_some_and(|a| a.id == folder.id) {
                        folders.active = Some(folder);
                    }
                });
            }
            Action::SetSnippetFavorite { id, favorite } => {
                let snippet = self.api.set_favorite(&id, favorite).await?;
                self.commit(|state| state.snippets.replace(&snippet));
            }
            Action::GetTechnologies => {
                let technologies = self.api.fetch_technologies().await?;
                self.commit(|state| state.technologies = technologies);
            }
        }
        Ok(())
    }

    fn commit<F>(&self, reduce: F)
    where
        F: FnOnce(&mut StoreState),
    {
        let _guard = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            reduce(&mut state);
            state.clone()
        };
        self.listeners.emit(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SnippetFolder;
    use crate::testing::{folder, snippet, ScriptedApi};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store_with(api: ScriptedApi) -> (Store, Arc<ScriptedApi>) {
        let api = Arc::new(api);
        (Store::new(api.clone()), api)
    }

    #[tokio::test]
    async fn test_get_snippet_folders_commits_collection() {
        let (store, _) = store_with(ScriptedApi::new().with_folders(vec![folder("A"), folder("B")]));

        assert!(!store.select_snapshot(selectors::folders_fetched));
        store.dispatch(Action::GetSnippetFolders).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.snippet_folders.folders, vec![folder("A"), folder("B")]);
        assert!(state.snippet_folders.fetched);
    }

    #[tokio::test]
    async fn test_get_snippets_for_all_and_for_one_folder() {
        let api = ScriptedApi::new().with_snippets(vec![
            snippet("1", "A", true),
            snippet("2", "B", false),
            snippet("3", "A", false),
        ]);
        let (store, api) = store_with(api);

        store
            .dispatch(Action::GetSnippets(Some(ALL_SNIPPETS_FOLDER_ID.to_string())))
            .await
            .unwrap();
        assert_eq!(store.snapshot().snippets.snippets.len(), 3);
        assert_eq!(api.snippet_requests(), vec![None]);

        store
            .dispatch(Action::GetSnippets(Some("A".to_string())))
            .await
            .unwrap();
        let state = store.snapshot();
        let shown: Vec<&str> = state.snippets.shown.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(shown, vec!["1", "3"]);
        // Folder fetch merges into the full collection
        assert_eq!(state.snippets.snippets.len(), 3);
        assert!(state.snippets.fetched);
    }

    #[tokio::test]
    async fn test_backend_failure_leaves_state_untouched() {
        let (store, _) = store_with(ScriptedApi::new().failing());

        let before = store.snapshot();
        let result = store.dispatch(Action::GetSnippetFolders).await;

        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_select_emits_current_value_then_changes() {
        let (store, _) = store_with(ScriptedApi::new().with_folders(vec![folder("A")]));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _sub = store.select(selectors::all_folders, move |folders: &Vec<SnippetFolder>| {
            sink.lock().unwrap().push(folders.len());
        });
        store.dispatch(Action::GetSnippetFolders).await.unwrap();
        // Unrelated commit does not re-emit the folder selection
        store.dispatch(Action::SetActiveSnippet(None)).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_set_active_folder_twice_equals_once() {
        let (store, _) = store_with(ScriptedApi::new());
        let emissions = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&emissions);
        let _sub = store.select(selectors::active_folder, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let target = folder("A");
        store
            .dispatch(Action::SetActiveSnippetFolder(target.clone()))
            .await
            .unwrap();
        let once = store.snapshot();
        store
            .dispatch(Action::SetActiveSnippetFolder(target.clone()))
            .await
            .unwrap();

        assert_eq!(store.snapshot(), once);
        assert_eq!(store.select_snapshot(selectors::active_folder), Some(target));
        // Initial value plus a single change
        assert_eq!(emissions.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_add_and_update_folder() {
        let (store, _) = store_with(ScriptedApi::new());

        store
            .dispatch(Action::AddSnippetFolder {
                name: "Drafts".to_string(),
            })
            .await
            .unwrap();
        let created: SnippetFolder = store.snapshot().snippet_folders.folders[0].clone();
        store
            .dispatch(Action::SetActiveSnippetFolder(created.clone()))
            .await
            .unwrap();

        store
            .dispatch(Action::UpdateSnippetFolder {
                id: created.id.clone(),
                name: "Final".to_string(),
            })
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.snippet_folders.folders[0].name, "Final");
        assert_eq!(state.snippet_folders.active.unwrap().name, "Final");
    }

    #[tokio::test]
    async fn test_set_favorite_replaces_every_copy() {
        let (store, _) = store_with(ScriptedApi::new().with_snippets(vec![snippet("1", "A", false)]));

        store.dispatch(Action::GetSnippets(None)).await.unwrap();
        let first = store.snapshot().snippets.snippets[0].clone();
        store
            .dispatch(Action::SetActiveSnippet(Some(first)))
            .await
            .unwrap();

        store
            .dispatch(Action::SetSnippetFavorite {
                id: "1".to_string(),
                favorite: true,
            })
            .await
            .unwrap();

        let state = store.snapshot();
        assert!(state.snippets.snippets[0].favorite);
        assert!(state.snippets.shown[0].favorite);
        assert!(state.snippets.active.unwrap().favorite);
    }

    #[tokio::test]
    async fn test_get_technologies() {
        let api = ScriptedApi::new().with_technologies(vec!["rust", "sql"]);
        let (store, _) = store_with(api);

        store.dispatch(Action::GetTechnologies).await.unwrap();
        let names: Vec<String> = store
            .select_snapshot(selectors::technologies)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["rust", "sql"]);
    }

    #[tokio::test]
    async fn test_on_dispatch_sees_every_action() {
        let (store, _) = store_with(ScriptedApi::new());
        let names = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&names);
        let sub = store.on_dispatch(move |action| sink.lock().unwrap().push(action.name()));
        store.dispatch(Action::SetActiveSnippet(None)).await.unwrap();
        sub.unsubscribe();
        store.dispatch(Action::SetActiveSnippet(None)).await.unwrap();

        assert_eq!(*names.lock().unwrap(), vec!["[Snippets] Set Active"]);
    }

    #[tokio::test]
    async fn test_dropped_selection_stops_listening() {
        let (store, _) = store_with(ScriptedApi::new());

        let sub = store.select(selectors::snippets_fetched, |_| {});
        assert_eq!(store.listener_count(), 1);
        drop(sub);
        assert_eq!(store.listener_count(), 0);
    }
}
