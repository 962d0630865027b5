//! Ambient current-user notification stream.

use crate::state::Identity;
use std::fmt;

/// Callback invoked with the signed-in identity, or `None` when signed out.
pub type Listener = Box<dyn Fn(Option<Identity>) + Send + Sync>;

/// Source of current-user notifications.
///
/// A subscriber is called once immediately with whatever the provider has
/// cached, then again every time the signed-in user changes.
pub trait AuthStateObserver: Send + Sync {
    /// Register a listener until the returned [`Subscription`] is released.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Handle that releases a listener registration.
///
/// Releasing is idempotent and also happens on drop.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the provider-specific release action.
    #[must_use]
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    #[must_use]
    pub const fn detached() -> Self {
        Self { release: None }
    }

    /// `true` until the first [`Subscription::unsubscribe`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Stop receiving notifications. Later calls do nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
