// Route navigation

use tokio::sync::watch;
use tracing::debug;

/// Dashboard route; `/snippets/<slug>` opens a single snippet
pub const SNIPPETS_ROUTE: &str = "/snippets";

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// The `slug` segment of a `/snippets/<slug>` route
pub fn snippet_slug(route: &str) -> Option<&str> {
    let rest = route.strip_prefix(SNIPPETS_ROUTE)?.strip_prefix('/')?;
    let slug = rest.split(['?', '#']).next().unwrap_or_default().trim_end_matches('/');
    (!slug.is_empty() && !slug.contains('/')).then_some(slug)
}

/// Holds the current route; the rendering layer follows `subscribe()`
pub struct Router {
    current: watch::Sender<String>,
}

impl Router {
    pub fn new(initial: &str) -> Self {
        let (current, _) = watch::channel(initial.to_string());
        Self { current }
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }
}

impl Navigator for Router {
    fn navigate(&self, route: &str) {
        debug!(route, "navigate");
        self.current.send_replace(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_navigate_updates_subscribers() {
        let router = Router::new("/login");
        let mut rx = router.subscribe();

        router.navigate("/");

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "/");
        assert_eq!(router.current(), "/");
    }

    #[test]
    fn test_snippet_slug() {
        assert_eq!(snippet_slug("/snippets/hello-world"), Some("hello-world"));
        assert_eq!(snippet_slug("/snippets/hello-world/?tab=code"), Some("hello-world"));
        assert_eq!(snippet_slug("/snippets"), None);
        assert_eq!(snippet_slug("/snippets/"), None);
        assert_eq!(snippet_slug("/snippetsfoo/x"), None);
        assert_eq!(snippet_slug("/snippets/a/b"), None);
        assert_eq!(snippet_slug("/login"), None);
    }
}
