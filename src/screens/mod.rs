// Screen view-models
// Each screen owns its form and loading state and talks to services through traits

pub mod folder_dialog;
pub mod login;
pub mod mirror;
pub mod snippets;

pub use folder_dialog::{FolderDialog, FOLDER_NAME_MAX_LEN};
pub use login::{LoginForm, LoginScreen};
pub use mirror::{FOLDERS_KEY, STARRED_KEY};
pub use snippets::{SnippetMode, SnippetsScreen};
