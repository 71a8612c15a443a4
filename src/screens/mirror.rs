// Offline mirror of the store's snippet collections
// Store -> storage only; every write replaces a whole entry

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::reactive::Subscription;
use crate::storage::{
    read_json, write_json, KeyValueStorage, Snippet, SnippetFolder, StorageFolder, StorageResult,
};
use crate::store::{selectors, Store};

/// Key of the folder collection inside the folders bucket
pub const FOLDERS_KEY: &str = "snippets";
/// Key of the favorites list inside the snippets bucket
pub const STARRED_KEY: &str = "starred";

/// Favorited snippets, in collection order
pub fn starred(snippets: &[Snippet]) -> Vec<&Snippet> {
    snippets.iter().filter(|s| s.favorite).collect()
}

/// One entry per folder, holding that folder's snippets
pub fn group_by_folder<'a>(
    snippets: &'a [Snippet],
    folders: &[SnippetFolder],
) -> Vec<(String, Vec<&'a Snippet>)> {
    folders
        .iter()
        .map(|folder| {
            let group = snippets.iter().filter(|s| s.folder.id == folder.id).collect();
            (folder.id.clone(), group)
        })
        .collect()
}

fn persist<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStorage,
    bucket: StorageFolder,
    key: &str,
    value: &T,
) {
    match write_json(storage, bucket, key, value) {
        Ok(()) => debug!(bucket = bucket.as_str(), key, "mirrored"),
        Err(err) => warn!(bucket = bucket.as_str(), key, error = %err, "mirror write failed"),
    }
}

/// Persist the folder collection whenever it changes and is non-empty
pub fn mirror_folders(store: &Store, storage: Arc<dyn KeyValueStorage>) -> Subscription {
    store.select(selectors::all_folders, move |folders: &Vec<SnippetFolder>| {
        if folders.is_empty() {
            return;
        }
        persist(storage.as_ref(), StorageFolder::Folders, FOLDERS_KEY, folders);
    })
}

/// Persist the starred list and the per-folder groups while snippets are non-empty
pub fn mirror_snippets(store: &Store, storage: Arc<dyn KeyValueStorage>) -> Vec<Subscription> {
    let starred_storage = Arc::clone(&storage);
    let starred_sub = store.select(selectors::all_snippets, move |snippets: &Vec<Snippet>| {
        if snippets.is_empty() {
            return;
        }
        persist(
            starred_storage.as_ref(),
            StorageFolder::Snippets,
            STARRED_KEY,
            &starred(snippets),
        );
    });

    let grouped_sub = store.select(
        selectors::snippets_with_folders,
        move |(snippets, folders): &(Vec<Snippet>, Vec<SnippetFolder>)| {
            if snippets.is_empty() {
                return;
            }
            for (folder_id, group) in group_by_folder(snippets, folders) {
                persist(storage.as_ref(), StorageFolder::Snippets, &folder_id, &group);
            }
        },
    );

    vec![starred_sub, grouped_sub]
}

pub fn cached_folders(storage: &dyn KeyValueStorage) -> StorageResult<Vec<SnippetFolder>> {
    Ok(read_json(storage, StorageFolder::Folders, FOLDERS_KEY)?.unwrap_or_default())
}

/// Snippets mirrored for `key`: a folder id or [`STARRED_KEY`]
pub fn cached_snippets(storage: &dyn KeyValueStorage, key: &str) -> StorageResult<Vec<Snippet>> {
    Ok(read_json(storage, StorageFolder::Snippets, key)?.unwrap_or_default())
}
