// Layout breakpoints
// A headless stand-in for media queries, driven by the viewport width

use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::reactive::{Listeners, Subscription};

/// Width condition of a media query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaQuery {
    MinWidth(u32),
    MaxWidth(u32),
}

impl MediaQuery {
    pub fn matches(&self, width: u32) -> bool {
        match *self {
            MediaQuery::MinWidth(min) => width >= min,
            MediaQuery::MaxWidth(max) => width <= max,
        }
    }
}

/// Pushes whether a media query matches, now and on every change
pub trait BreakpointObserver: Send + Sync {
    fn observe(
        &self,
        query: MediaQuery,
        on_change: Box<dyn Fn(bool) + Send + Sync>,
    ) -> Subscription;
}

/// Viewport whose width is set by the rendering layer
pub struct Viewport {
    width: Mutex<u32>,
    listeners: Listeners<u32>,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Self {
            width: Mutex::new(width),
            listeners: Listeners::new(),
        }
    }

    pub fn width(&self) -> u32 {
        *self.width.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_width(&self, width: u32) {
        {
            let mut current = self.width.lock().unwrap_or_else(PoisonError::into_inner);
            if *current == width {
                return;
            }
            *current = width;
        }
        debug!(width, "viewport resized");
        self.listeners.emit(&width);
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.listeners.len()
    }
}

impl BreakpointObserver for Viewport {
    fn observe(
        &self,
        query: MediaQuery,
        on_change: Box<dyn Fn(bool) + Send + Sync>,
    ) -> Subscription {
        let initial = query.matches(self.width());
        on_change(initial);

        let last = Mutex::new(initial);
        self.listeners.subscribe(move |width| {
            let matches = query.matches(*width);
            let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
            if *last != matches {
                *last = matches;
                on_change(matches);
            }
        })
    }
}
