// Local persistence for the client
// Session token, offline mirror buckets, and the local snippet backend tables

pub mod database;
pub mod buckets;
pub mod token;
pub mod folders;
pub mod snippets;

pub use database::{DatabaseManager, StorageError, StorageResult, get_default_db_path};
pub use buckets::{KeyValueStorage, StorageFolder, read_json, write_json};
pub use token::{TokenStorage, TOKEN_KEY};
pub use folders::{
    SnippetFolder, CreateFolderInput, UpdateFolderInput, ALL_SNIPPETS_FOLDER_ID,
    ALL_SNIPPETS_FOLDER_NAME,
};
pub use snippets::{Snippet, FolderRef, CreateSnippetInput};
