// Test doubles shared by the unit tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::services::{Credentials, Navigator, OAuthProvider, SessionError, SessionService, SignInResponse};
use crate::storage::{
    FolderRef, KeyValueStorage, Snippet, SnippetFolder, StorageError, StorageFolder, StorageResult,
    TokenStorage,
};
use crate::store::{SnippetApi, StoreError, Technology};

pub fn folder(id: &str) -> SnippetFolder {
    SnippetFolder {
        id: id.to_string(),
        name: format!("Folder {id}"),
        created_at: String::new(),
        updated_at: String::new(),
    }
}

pub fn snippet(id: &str, folder_id: &str, favorite: bool) -> Snippet {
    Snippet {
        id: id.to_string(),
        folder: FolderRef {
            id: folder_id.to_string(),
        },
        title: format!("Snippet {id}"),
        code: String::new(),
        language: None,
        description: None,
        favorite,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

/// Snippet backend answering from in-memory collections
#[derive(Default)]
pub struct ScriptedApi {
    folders: Mutex<Vec<SnippetFolder>>,
    snippets: Mutex<Vec<Snippet>>,
    technologies: Vec<String>,
    failing: AtomicBool,
    gate: Option<Arc<Semaphore>>,
    snippet_requests: Mutex<Vec<Option<String>>>,
    folder_requests: AtomicUsize,
    created: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folders(self, folders: Vec<SnippetFolder>) -> Self {
        *self.folders.lock().unwrap() = folders;
        self
    }

    pub fn with_snippets(self, snippets: Vec<Snippet>) -> Self {
        *self.snippets.lock().unwrap() = snippets;
        self
    }

    pub fn with_technologies(mut self, names: Vec<&str>) -> Self {
        self.technologies = names.into_iter().map(str::to_string).collect();
        self
    }

    /// Every call fails with a backend error
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// Fetches wait for a permit on `gate` before answering
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn snippet_requests(&self) -> Vec<Option<String>> {
        self.snippet_requests.lock().unwrap().clone()
    }

    pub fn folder_requests(&self) -> usize {
        self.folder_requests.load(Ordering::SeqCst)
    }

    async fn answer(&self) -> Result<(), StoreError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("scripted failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SnippetApi for ScriptedApi {
    async fn fetch_folders(&self) -> Result<Vec<SnippetFolder>, StoreError> {
        self.folder_requests.fetch_add(1, Ordering::SeqCst);
        self.answer().await?;
        Ok(self.folders.lock().unwrap().clone())
    }

    async fn fetch_snippets(&self, folder_id: Option<&str>) -> Result<Vec<Snippet>, StoreError> {
        self.snippet_requests
            .lock()
            .unwrap()
            .push(folder_id.map(str::to_string));
        self.answer().await?;
        let snippets = self.snippets.lock().unwrap();
        Ok(snippets
            .iter()
            .filter(|s| folder_id.map_or(true, |id| s.folder.id == id))
            .cloned()
            .collect())
    }

    async fn create_folder(&self, name: &str) -> Result<SnippetFolder, StoreError> {
        self.answer().await?;
        let n = self.created.fetch_add(1, Ordering::SeqCst);
        let mut created = folder(&format!("folder-{n}"));
        created.name = name.to_string();
        self.folders.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn rename_folder(&self, id: &str, name: &str) -> Result<SnippetFolder, StoreError> {
        self.answer().await?;
        let mut folders = self.folders.lock().unwrap();
        let held = folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("folder {id}")))?;
        held.name = name.to_string();
        Ok(held.clone())
    }

    async fn set_favorite(&self, snippet_id: &str, favorite: bool) -> Result<Snippet, StoreError> {
        self.answer().await?;
        let mut snippets = self.snippets.lock().unwrap();
        let held = snippets
            .iter_mut()
            .find(|s| s.id == snippet_id)
            .ok_or_else(|| StoreError::NotFound(format!("snippet {snippet_id}")))?;
        held.favorite = favorite;
        Ok(held.clone())
    }

    async fn fetch_technologies(&self) -> Result<Vec<Technology>, StoreError> {
        self.answer().await?;
        Ok(self
            .technologies
            .iter()
            .map(|name| Technology { name: name.clone() })
            .collect())
    }
}

/// In-memory bucket and token storage with a write log
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<(StorageFolder, String), Value>>,
    token: Mutex<Option<String>>,
    writes: Mutex<Vec<(StorageFolder, String)>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<(StorageFolder, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn item(&self, bucket: StorageFolder, key: &str) -> Option<Value> {
        self.items
            .lock()
            .unwrap()
            .get(&(bucket, key.to_string()))
            .cloned()
    }

    fn check_write(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn set_item(&self, bucket: StorageFolder, key: &str, value: &Value) -> StorageResult<()> {
        self.check_write()?;
        self.writes.lock().unwrap().push((bucket, key.to_string()));
        self.items
            .lock()
            .unwrap()
            .insert((bucket, key.to_string()), value.clone());
        Ok(())
    }

    fn get_item(&self, bucket: StorageFolder, key: &str) -> StorageResult<Option<Value>> {
        Ok(self.item(bucket, key))
    }
}

impl TokenStorage for MemoryStorage {
    fn set_token(&self, token: &str) -> StorageResult<()> {
        self.check_write()?;
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn token(&self) -> StorageResult<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn clear_token(&self) -> StorageResult<bool> {
        Ok(self.token.lock().unwrap().take().is_some())
    }
}

pub enum SessionScript {
    Token(Option<String>),
    Reject(String),
}

/// Session service answering every sign-in with the same script
pub struct ScriptedSession {
    script: SessionScript,
    calls: Mutex<Vec<Credentials>>,
    providers: Mutex<Vec<OAuthProvider>>,
}

impl ScriptedSession {
    pub fn new(script: SessionScript) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
            providers: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Credentials> {
        self.calls.lock().unwrap().clone()
    }

    pub fn providers(&self) -> Vec<OAuthProvider> {
        self.providers.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionService for ScriptedSession {
    async fn sign_in_with_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<SignInResponse, SessionError> {
        self.calls.lock().unwrap().push(credentials.clone());
        match &self.script {
            SessionScript::Token(token) => Ok(SignInResponse {
                access_token: token.clone(),
            }),
            SessionScript::Reject(message) => Err(SessionError::Rejected(message.clone())),
        }
    }

    fn sign_in_with_provider(&self, provider: OAuthProvider) {
        self.providers.lock().unwrap().push(provider);
    }
}

/// Records each navigation with the token stored at that moment
pub struct RecordingNavigator {
    tokens: Arc<dyn TokenStorage>,
    visits: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingNavigator {
    pub fn new(tokens: Arc<dyn TokenStorage>) -> Self {
        Self {
            tokens,
            visits: Mutex::new(Vec::new()),
        }
    }

    pub fn visits(&self) -> Vec<(String, Option<String>)> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        let token = self.tokens.token().unwrap();
        self.visits.lock().unwrap().push((route.to_string(), token));
    }
}
