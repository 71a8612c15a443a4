// Modal dialogs
// Screens open dialogs by value; the rendering layer draws the top of the stack

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::storage::SnippetFolder;

/// Which feature a shared dialog acts for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Snippet,
    Bookmark,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DialogSize {
    Sm,
    Md,
    Lg,
}

/// Payload of the folder modal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum FolderDialogData {
    Create,
    Update { folder: SnippetFolder },
}

/// Serializes as `{size, enableClose, feature, data: {type, folder?}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DialogConfig {
    pub size: DialogSize,
    /// Whether the user may dismiss the dialog without submitting
    pub enable_close: bool,
    /// Feature the folder belongs to
    pub feature: FeatureType,
    pub data: FolderDialogData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(u64);

pub trait DialogService: Send + Sync {
    fn open(&self, config: DialogConfig) -> DialogId;
    /// Returns false when the dialog was not open
    fn close(&self, id: DialogId) -> bool;
}

/// Stack of open dialogs, newest last
#[derive(Default)]
pub struct DialogStack {
    next_id: AtomicU64,
    open: Mutex<Vec<(DialogId, DialogConfig)>>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(&self) -> Option<(DialogId, DialogConfig)> {
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.open.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DialogService for DialogStack {
    fn open(&self, config: DialogConfig) -> DialogId {
        let id = DialogId(self.next_id.fetch_add(1, Ordering::SeqCst));
        debug!(?id, size = ?config.size, "open dialog");
        self.open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, config));
        id
    }

    fn close(&self, id: DialogId) -> bool {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        let before = open.len();
        open.retain(|(held, _)| *held != id);
        before != open.len()
    }
}
