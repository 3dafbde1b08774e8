//! Notification intent resolution
//!
//! When the user taps a notification the provider asks the resolver what to
//! do with the notification's URL. The answer is a [`PendingNavigation`] that
//! the provider houses and fires later; nothing here navigates directly.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;
use url::Url;

/// What the host application wants to happen when a notification is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Open a URL (deep link or web page)
    OpenUrl(Url),
    /// Bring the application to the foreground without a target
    LaunchApp,
    /// Let the provider fall back to its own default behavior
    ProviderDefault,
}

/// Host-supplied mapping from a notification URL to a navigation action
pub trait NotificationUrlHandler: Send + Sync {
    fn navigation_for(&self, url: Option<&str>) -> NavigationAction;
}

impl<F> NotificationUrlHandler for F
where
    F: Fn(Option<&str>) -> NavigationAction + Send + Sync,
{
    fn navigation_for(&self, url: Option<&str>) -> NavigationAction {
        self(url)
    }
}

/// Navigation action waiting to be triggered by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    /// Unique per resolver, so housed actions never replace one another
    pub request_code: u32,
    pub action: NavigationAction,
}

/// Resolves notification URLs through the host's handler
pub struct IntentResolver {
    handler: Option<Arc<dyn NotificationUrlHandler>>,
    next_request_code: AtomicU32,
}

impl IntentResolver {
    pub fn new(handler: Option<Arc<dyn NotificationUrlHandler>>) -> Self {
        Self {
            handler,
            next_request_code: AtomicU32::new(1),
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Map a tapped notification's URL to a housed navigation action
    pub fn resolve(&self, url: Option<&str>) -> PendingNavigation {
        let action = match &self.handler {
            Some(handler) => handler.navigation_for(url),
            None => NavigationAction::ProviderDefault,
        };
        let request_code = self.next_request_code.fetch_add(1, Ordering::Relaxed);
        debug!("Resolved notification url {:?} to {:?} (request {})", url, action, request_code);

        PendingNavigation {
            request_code,
            action,
        }
    }
}

impl std::fmt::Debug for IntentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentResolver")
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

/// Handler that opens the notification URL when it parses, else launches the app
pub fn open_url_or_launch(url: Option<&str>) -> NavigationAction {
    url.and_then(|u| Url::parse(u).ok())
        .map(NavigationAction::OpenUrl)
        .unwrap_or(NavigationAction::LaunchApp)
}
