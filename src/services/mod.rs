// Collaborator seams injected into screens
// Each trait has one concrete headless implementation next to it

pub mod dialog;
pub mod layout;
pub mod menu;
pub mod navigation;
pub mod notify;
pub mod session;

pub use dialog::{
    DialogConfig, DialogId, DialogService, DialogSize, DialogStack, FeatureType,
    FolderDialogData,
};
pub use layout::{BreakpointObserver, MediaQuery, Viewport};
pub use menu::MenuService;
pub use navigation::{snippet_slug, Navigator, Router, SNIPPETS_ROUTE};
pub use notify::{Notifier, Toast, ToastKind, ToastQueue};
pub use session::{Credentials, OAuthProvider, SessionError, SessionService, SignInResponse};
