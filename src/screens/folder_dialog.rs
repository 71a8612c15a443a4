// Folder modal view-model
// Creates or renames a snippet folder, then closes its dialog

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::forms::{FormControl, Validator};
use crate::services::{DialogId, DialogService, FolderDialogData, Notifier};
use crate::store::{Action, Store};

pub const FOLDER_NAME_MAX_LEN: usize = 50;

pub struct FolderDialog {
    id: DialogId,
    data: FolderDialogData,
    store: Arc<Store>,
    dialogs: Arc<dyn DialogService>,
    notifier: Arc<dyn Notifier>,
    name: FormControl,
    saving: watch::Sender<bool>,
}

impl FolderDialog {
    /// View-model for the dialog `id`; an update starts from the folder's current name
    pub fn new(
        id: DialogId,
        data: FolderDialogData,
        store: Arc<Store>,
        dialogs: Arc<dyn DialogService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let mut name = FormControl::new(&[Validator::Required, Validator::MaxLength(FOLDER_NAME_MAX_LEN)]);
        if let FolderDialogData::Update { folder } = &data {
            name.set_value(folder.name.clone());
        }
        let (saving, _) = watch::channel(false);
        Self {
            id,
            data,
            store,
            dialogs,
            notifier,
            name,
            saving,
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn data(&self) -> &FolderDialogData {
        &self.data
    }

    pub fn name(&self) -> &FormControl {
        &self.name
    }

    pub fn name_mut(&mut self) -> &mut FormControl {
        &mut self.name
    }

    pub fn is_saving(&self) -> bool {
        *self.saving.borrow()
    }

    /// A name made only of whitespace counts as missing
    pub fn is_valid(&self) -> bool {
        self.name.is_valid() && !self.name.value().trim().is_empty()
    }

    /// Save the folder. Returns whether the dialog was closed.
    pub async fn submit(&self) -> bool {
        if !self.is_valid() {
            debug!("folder form invalid, not submitting");
            return false;
        }

        let name = self.name.value().trim().to_string();
        let (action, done) = match &self.data {
            FolderDialogData::Create => (Action::AddSnippetFolder { name }, "Folder created"),
            FolderDialogData::Update { folder } => (
                Action::UpdateSnippetFolder {
                    id: folder.id.clone(),
                    name,
                },
                "Folder updated",
            ),
        };

        self.saving.send_replace(true);
        let result = self.store.dispatch(action).await;
        self.saving.send_replace(false);

        match result {
            Ok(()) => {
                info!(dialog = ?self.id, "{done}");
                self.notifier.show_success(done);
                self.dialogs.close(self.id);
                true
            }
            Err(err) => {
                self.notifier.show_error(&err.to_string());
                false
            }
        }
    }
}
