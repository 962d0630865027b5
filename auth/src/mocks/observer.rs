//! Manually driven current-user notification stream.

use crate::providers::{AuthStateObserver, Listener, Subscription};
use crate::state::Identity;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

type SharedListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Observer whose notifications are emitted by the test, synchronously.
///
/// Like a real provider it replays the cached user to each new subscriber.
#[derive(Clone, Default)]
pub struct ManualAuthObserver {
    state: Arc<Mutex<ObserverState>>,
}

#[derive(Default)]
struct ObserverState {
    current: Option<Identity>,
    listeners: BTreeMap<u64, SharedListener>,
    next_id: u64,
}

impl ManualAuthObserver {
    /// Observer with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer with a cached user that new subscribers receive immediately.
    #[must_use]
    pub fn with_current(identity: Option<Identity>) -> Self {
        let observer = Self::default();
        observer.lock().current = identity;
        observer
    }

    /// Cache `identity` and call every registered listener with it.
    pub fn emit(&self, identity: Option<Identity>) {
        let listeners: Vec<SharedListener> = {
            let mut state = self.lock();
            state.current.clone_from(&identity);
            state.listeners.values().cloned().collect()
        };

        for listener in listeners {
            listener(identity.clone());
        }
    }

    /// Number of listeners still registered.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ObserverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthStateObserver for ManualAuthObserver {
    fn subscribe(&self, listener: Listener) -> Subscription {
        let listener: SharedListener = Arc::from(listener);

        let (id, current) = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.insert(id, Arc::clone(&listener));
            (id, state.current.clone())
        };

        listener(current);

        let state = Arc::clone(&self.state);
        Subscription::new(move || {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .remove(&id);
        })
    }
}

impl std::fmt::Debug for ManualAuthObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ManualAuthObserver")
            .field("current", &state.current)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}
