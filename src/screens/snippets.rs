// Snippets dashboard view-model
// Loads folders and snippets, tracks layout and mode, mirrors the store offline

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::reactive::{Subscription, SubscriptionSet};
use crate::screens::mirror;
use crate::services::{
    BreakpointObserver, DialogConfig, DialogId, DialogService, DialogSize,
    FeatureType, FolderDialogData, MediaQuery, MenuService,
};
use crate::storage::{KeyValueStorage, Snippet, SnippetFolder, StorageResult};
use crate::store::{selectors, Action, Store};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnippetMode {
    #[default]
    Explorer,
    Editor,
}

pub struct SnippetsScreen {
    store: Arc<Store>,
    storage: Arc<dyn KeyValueStorage>,
    dialogs: Arc<dyn DialogService>,
    layout: Arc<dyn BreakpointObserver>,
    menu: Arc<MenuService>,
    large_screen_query: MediaQuery,
    folder_loading: Arc<watch::Sender<bool>>,
    snippet_loading: Arc<watch::Sender<bool>>,
    large_screen: Arc<watch::Sender<bool>>,
    mode: watch::Sender<SnippetMode>,
    slug: Option<String>,
    subscriptions: Mutex<SubscriptionSet>,
    loads: Mutex<Vec<JoinHandle<()>>>,
}

impl SnippetsScreen {
    pub fn new(
        store: Arc<Store>,
        storage: Arc<dyn KeyValueStorage>,
        dialogs: Arc<dyn DialogService>,
        layout: Arc<dyn BreakpointObserver>,
        menu: Arc<MenuService>,
        large_screen_query: MediaQuery,
    ) -> Self {
        let (folder_loading, _) = watch::channel(false);
        let (snippet_loading, _) = watch::channel(false);
        let (large_screen, _) = watch::channel(false);
        let (mode, _) = watch::channel(SnippetMode::default());
        Self {
            store,
            storage,
            dialogs,
            layout,
            menu,
            large_screen_query,
            folder_loading: Arc::new(folder_loading),
            snippet_loading: Arc::new(snippet_loading),
            large_screen: Arc::new(large_screen),
            mode,
            slug: None,
            subscriptions: Mutex::new(SubscriptionSet::new()),
            loads: Mutex::new(Vec::new()),
        }
    }

    /// Screen opened for a single snippet, from the `slug` route parameter
    pub fn with_slug(mut self, slug: Option<String>) -> Self {
        self.slug = slug;
        self
    }

    pub fn snippet_slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Start observers and mirrors, then kick off the initial loads.
    ///
    /// Must be called from within a tokio runtime. The loads run detached;
    /// use [`SnippetsScreen::idle`] to wait for them. Activating again
    /// replaces the previous activation's subscriptions.
    pub async fn activate(&self) {
        info!("activating snippets dashboard");
        self.deactivate();
        {
            let mut subscriptions = self.subscriptions();
            subscriptions.add(self.observe_layout());
            subscriptions.add(mirror::mirror_folders(&self.store, Arc::clone(&self.storage)));
            for subscription in mirror::mirror_snippets(&self.store, Arc::clone(&self.storage)) {
                subscriptions.add(subscription);
            }
        }

        self.spawn_load(&self.folder_loading, Action::GetSnippetFolders);
        if let Err(err) = self
            .store
            .dispatch(Action::SetActiveSnippetFolder(SnippetFolder::all_snippets()))
            .await
        {
            warn!(error = %err, "could not select the default folder");
        }

        let folder_id = self
            .store
            .select_snapshot(selectors::active_folder)
            .map(|folder| folder.id);
        self.spawn_load(&self.snippet_loading, Action::GetSnippets(folder_id));
    }

    /// Wait for every load started by [`SnippetsScreen::activate`]
    pub async fn idle(&self) {
        let loads = std::mem::take(&mut *self.loads.lock().unwrap_or_else(PoisonError::into_inner));
        for result in join_all(loads).await {
            if let Err(err) = result {
                warn!(error = %err, "load task did not finish");
            }
        }
    }

    /// Release every subscription opened by activation. In-flight loads keep running.
    pub fn deactivate(&self) {
        let mut subscriptions = self.subscriptions();
        if !subscriptions.is_empty() {
            debug!(count = subscriptions.len(), "releasing dashboard subscriptions");
            subscriptions.unsubscribe_all();
        }
    }

    /// Number of subscriptions held by the current activation
    pub fn subscription_count(&self) -> usize {
        self.subscriptions().len()
    }

    /// Number of started loads not yet collected by [`SnippetsScreen::idle`]
    pub fn pending_loads(&self) -> usize {
        self.loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub async fn handle_select_folder(&self, folder: Option<SnippetFolder>) {
        let Some(folder) = folder else {
            return;
        };
        debug!(folder_id = %folder.id, "folder selected");

        self.snippet_loading.send_replace(true);
        let folder_id = folder.id.clone();
        let steps = [
            Action::SetActiveSnippetFolder(folder),
            Action::SetActiveSnippet(None),
            Action::GetSnippets(Some(folder_id)),
        ];
        for action in steps {
            // Failures were logged by the store; stop at the first one
            if self.store.dispatch(action).await.is_err() {
                break;
            }
        }
        self.snippet_loading.send_replace(false);
    }

    pub fn handle_create_folder(&self) -> DialogId {
        self.open_folder_dialog(FolderDialogData::Create)
    }

    pub fn handle_edit_folder(&self, folder: SnippetFolder) -> DialogId {
        self.open_folder_dialog(FolderDialogData::Update { folder })
    }

    pub fn change_mode(&self, mode: SnippetMode) {
        self.mode.send_replace(mode);
    }

    pub fn mode(&self) -> SnippetMode {
        *self.mode.borrow()
    }

    pub fn mode_changes(&self) -> watch::Receiver<SnippetMode> {
        self.mode.subscribe()
    }

    pub fn is_large_screen(&self) -> bool {
        *self.large_screen.borrow()
    }

    pub fn large_screen_changes(&self) -> watch::Receiver<bool> {
        self.large_screen.subscribe()
    }

    pub fn is_folder_loading(&self) -> bool {
        *self.folder_loading.borrow()
    }

    pub fn folder_loading(&self) -> watch::Receiver<bool> {
        self.folder_loading.subscribe()
    }

    pub fn is_snippet_loading(&self) -> bool {
        *self.snippet_loading.borrow()
    }

    pub fn snippet_loading(&self) -> watch::Receiver<bool> {
        self.snippet_loading.subscribe()
    }

    pub fn toggle_menu(&self) {
        self.menu.toggle_menu();
    }

    pub fn close_menu(&self) {
        self.menu.close_menu();
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_open()
    }

    pub fn cached_folders(&self) -> StorageResult<Vec<SnippetFolder>> {
        mirror::cached_folders(self.storage.as_ref())
    }

    /// Mirrored snippets of `folder_id`, or the favorites for [`mirror::STARRED_KEY`]
    pub fn cached_snippets(&self, folder_id: &str) -> StorageResult<Vec<Snippet>> {
        mirror::cached_snippets(self.storage.as_ref(), folder_id)
    }

    fn subscriptions(&self) -> std::sync::MutexGuard<'_, SubscriptionSet> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn observe_layout(&self) -> Subscription {
        let large_screen = Arc::clone(&self.large_screen);
        self.layout.observe(
            self.large_screen_query,
            Box::new(move |matches| {
                large_screen.send_replace(matches);
            }),
        )
    }

    fn spawn_load(&self, flag: &Arc<watch::Sender<bool>>, action: Action) {
        flag.send_replace(true);
        let store = Arc::clone(&self.store);
        let flag = Arc::clone(flag);
        let handle = tokio::spawn(async move {
            let name = action.name();
            if store.dispatch(action).await.is_err() {
                debug!(action = name, "load failed, clearing loading flag");
            }
            flag.send_replace(false);
        });
        let mut loads = self.loads.lock().unwrap_or_else(PoisonError::into_inner);
        loads.retain(|load| !load.is_finished());
        loads.push(handle);
    }

    fn open_folder_dialog(&self, data: FolderDialogData) -> DialogId {
        self.dialogs.open(DialogConfig {
            size: DialogSize::Sm,
            enable_close: false,
            feature: FeatureType::Snippet,
            data,
        })
    }
}

impl Drop for SnippetsScreen {
    fn drop(&mut self) {
        self.deactivate();
    }
}
