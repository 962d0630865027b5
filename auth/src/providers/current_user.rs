//! Provider-side cache of the signed-in user.

use super::observer::{AuthStateObserver, Listener, Subscription};
use crate::state::Identity;
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the provider's current user and notifies observers when it changes.
///
/// Gateways publish here after a successful call. Rapid successive publishes
/// may be coalesced for a slow subscriber; the latest value always arrives.
///
/// Subscribing spawns a forwarding task, so it must happen inside a Tokio
/// runtime.
#[derive(Debug, Clone)]
pub struct CurrentUserChannel {
    sender: Arc<watch::Sender<Option<Identity>>>,
}

impl CurrentUserChannel {
    /// A channel with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::with_current(None)
    }

    /// A channel that already has a cached user (e.g. restored by the provider).
    #[must_use]
    pub fn with_current(identity: Option<Identity>) -> Self {
        let (sender, _) = watch::channel(identity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the cached user and notify subscribers.
    pub fn publish(&self, identity: Option<Identity>) {
        tracing::debug!(
            uid = identity.as_ref().map(|i| i.uid.as_str()),
            "Publishing current user"
        );
        self.sender.send_replace(identity);
    }

    /// Clear the cached user.
    pub fn sign_out(&self) {
        self.publish(None);
    }

    /// The cached user.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.sender.borrow().clone()
    }
}

impl Default for CurrentUserChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStateObserver for CurrentUserChannel {
    fn subscribe(&self, listener: Listener) -> Subscription {
        let mut receiver = self.sender.subscribe();

        let initial = receiver.borrow_and_update().clone();
        listener(initial);

        let task = tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let identity = receiver.borrow_and_update().clone();
                listener(identity);
            }
        });

        Subscription::new(move || task.abort())
    }
}
