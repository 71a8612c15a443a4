// Side menu open/closed state

use tokio::sync::watch;

pub struct MenuService {
    open: watch::Sender<bool>,
}

impl MenuService {
    pub fn new() -> Self {
        let (open, _) = watch::channel(false);
        Self { open }
    }

    pub fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.open.subscribe()
    }

    pub fn open_menu(&self) {
        self.open.send_replace(true);
    }

    pub fn close_menu(&self) {
        self.open.send_replace(false);
    }

    pub fn toggle_menu(&self) {
        self.open.send_modify(|open| *open = !*open);
    }
}

impl Default for MenuService {
    fn default() -> Self {
        Self::new()
    }
}
