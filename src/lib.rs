// Module declarations
pub mod config;
pub mod forms;
pub mod logging;
pub mod reactive;
pub mod screens;
pub mod services;
pub mod storage;
pub mod store;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use tracing::{info, warn};

use config::ClientConfig;
use screens::{FolderDialog, LoginScreen, SnippetsScreen};
use services::{
    snippet_slug, DialogStack, MenuService, Router, SessionService, ToastQueue, Viewport,
};
use storage::{DatabaseManager, StorageResult, TokenStorage};
use store::{LocalSnippetApi, Store};

pub const LOGIN_ROUTE: &str = "/login";

/// Long-lived services shared by every screen
pub struct AppContext {
    pub config: ClientConfig,
    pub db: Arc<DatabaseManager>,
    pub store: Arc<Store>,
    pub session: Arc<dyn SessionService>,
    pub router: Arc<Router>,
    pub toasts: Arc<ToastQueue>,
    pub dialogs: Arc<DialogStack>,
    pub viewport: Arc<Viewport>,
    pub menu: Arc<MenuService>,
}

/// Open the database and wire the concrete services.
///
/// Starts on the home route when a token is already stored, on the login route otherwise.
pub fn bootstrap(config: ClientConfig, session: Arc<dyn SessionService>) -> StorageResult<AppContext> {
    info!(db_path = %config.db_path.display(), "starting client");
    let db = Arc::new(DatabaseManager::new(config.db_path.clone())?);

    let initial_route = match db.token() {
        Ok(Some(_)) => config.home_route.as_str(),
        Ok(None) => LOGIN_ROUTE,
        Err(err) => {
            warn!(error = %err, "could not read stored token");
            LOGIN_ROUTE
        }
    };

    let store = Arc::new(Store::new(Arc::new(LocalSnippetApi::new(Arc::clone(&db)))));
    Ok(AppContext {
        router: Arc::new(Router::new(initial_route)),
        viewport: Arc::new(Viewport::new(config.large_screen_min_width)),
        config,
        db,
        store,
        session,
        toasts: Arc::new(ToastQueue::new()),
        dialogs: Arc::new(DialogStack::new()),
        menu: Arc::new(MenuService::new()),
    })
}

impl AppContext {
    pub fn login_screen(&self) -> LoginScreen {
        LoginScreen::new(
            Arc::clone(&self.session),
            self.db.clone(),
            self.router.clone(),
            self.toasts.clone(),
            self.config.home_route.clone(),
        )
    }

    /// Dashboard for the current route, carrying its `slug` parameter if any
    pub fn snippets_screen(&self) -> SnippetsScreen {
        let route = self.router.current();
        SnippetsScreen::new(
            Arc::clone(&self.store),
            self.db.clone(),
            self.dialogs.clone(),
            self.viewport.clone(),
            Arc::clone(&self.menu),
            self.config.large_screen_query(),
        )
        .with_slug(snippet_slug(&route).map(str::to_string))
    }

    /// View-model for the folder dialog on top of the stack, if any
    pub fn folder_dialog(&self) -> Option<FolderDialog> {
        let (id, config) = self.dialogs.top()?;
        Some(FolderDialog::new(
            id,
            config.data,
            Arc::clone(&self.store),
            self.dialogs.clone(),
            self.toasts.clone(),
        ))
    }
}
