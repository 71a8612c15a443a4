// Transient user notifications (toasts)

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Surfaces short messages to the user
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
    fn show_success(&self, message: &str);
}

/// Queue of pending toasts, drained by the rendering layer
#[derive(Default)]
pub struct ToastQueue {
    pending: Mutex<VecDeque<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: ToastKind, message: &str) {
        info!(?kind, text = message, "toast");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Toast {
                kind,
                message: message.to_string(),
            });
    }

    /// Toasts not yet taken, oldest first
    pub fn pending(&self) -> Vec<Toast> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Remove and return the oldest toast
    pub fn take(&self) -> Option<Toast> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

impl Notifier for ToastQueue {
    fn show_error(&self, message: &str) {
        self.push(ToastKind::Error, message);
    }

    fn show_success(&self, message: &str) {
        self.push(ToastKind::Success, message);
    }
}
