//! Session Context.
//!
//! The single authoritative answer to "is someone signed in". It listens to
//! the provider's current-user notifications and republishes each one as a
//! [`Session`] that consumers can read or await, but never write.
//!
//! # Example
//!
//! ```no_run
//! use session_gate_auth::providers::CurrentUserChannel;
//! use session_gate_auth::session::SessionContext;
//!
//! # async fn example() {
//! let provider = CurrentUserChannel::new();
//! let context = SessionContext::attach(&provider);
//!
//! let mut watch = context.watch();
//! while let Some(session) = watch.changed().await {
//!     println!("signed in: {}", session.is_authenticated);
//! }
//! # }
//! ```

use crate::providers::{AuthStateObserver, Subscription};
use crate::state::Session;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// Owner of the process-wide [`Session`].
///
/// Dropping the context detaches it from the provider.
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    sender: watch::Sender<Session>,
    attached: AtomicBool,
    subscription: Mutex<Option<Subscription>>,
}

impl SessionContext {
    /// Subscribe to `observer` and start tracking its notifications.
    ///
    /// The observer replays its cached user during this call, so the
    /// session is current as soon as `attach` returns.
    pub fn attach<O>(observer: &O) -> Self
    where
        O: AuthStateObserver + ?Sized,
    {
        let (sender, _) = watch::channel(Session::default());
        let inner = Arc::new(Inner {
            sender,
            attached: AtomicBool::new(true),
            subscription: Mutex::new(None),
        });

        // The provider owns the listener; a strong reference here would keep
        // the context alive through its own subscription.
        let weak = Arc::downgrade(&inner);
        let subscription = observer.subscribe(Box::new(move |identity| {
            let Some(inner) = weak.upgrade() else {
                return;
            };

            if !inner.attached.load(Ordering::Acquire) {
                tracing::trace!("Ignoring notification after detach");
                return;
            }

            let session = Session::from_notification(identity);
            tracing::debug!(
                authenticated = session.is_authenticated,
                uid = session.identity.as_ref().map(|i| i.uid.as_str()),
                "Session replaced"
            );
            inner.sender.send_replace(session);
        }));

        *inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(subscription);

        tracing::info!("Session context attached");
        Self { inner }
    }

    /// The current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.inner.sender.borrow().clone()
    }

    /// Shorthand for `current().is_authenticated`.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.sender.borrow().is_authenticated
    }

    /// A read-only handle that is told about every session change.
    #[must_use]
    pub fn watch(&self) -> SessionWatch {
        SessionWatch {
            receiver: self.inner.sender.subscribe(),
        }
    }

    /// `false` once [`SessionContext::detach`] has run.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.attached.load(Ordering::Acquire)
    }

    /// Stop processing provider notifications.
    ///
    /// The session keeps its last value. Calling this again does nothing.
    pub fn detach(&self) {
        if !self.inner.attached.swap(false, Ordering::AcqRel) {
            return;
        }

        let subscription = self
            .inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(mut subscription) = subscription {
            subscription.unsubscribe();
        }

        tracing::info!("Session context detached");
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("session", &self.current())
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Read-only view of the session.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    receiver: watch::Receiver<Session>,
}

impl SessionWatch {
    /// The current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.receiver.borrow().clone()
    }

    /// Wait for the next session change and return it.
    ///
    /// Returns `None` once the owning [`SessionContext`] is gone.
    pub async fn changed(&mut self) -> Option<Session> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}
