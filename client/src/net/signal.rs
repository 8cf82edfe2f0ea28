//! In-process "credential rejected" broadcast.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ApiClient` raises the signal on every 401 response; `SessionStore`
//! subscribes once at construction. Both receive the same handle explicitly,
//! there is no global event target.

#[cfg(test)]
#[path = "signal_test.rs"]
mod signal_test;

use std::sync::{Arc, Mutex, PoisonError};

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Cloneable handle to a shared listener list.
#[derive(Clone, Default)]
pub struct UnauthorizedSignal {
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl UnauthorizedSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the lifetime of the signal. There is no
    /// unsubscribe; listeners live as long as the process-wide store.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// Invoke every listener once. The list is copied out first so a
    /// listener may subscribe or raise again without deadlocking.
    pub fn raise(&self) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener();
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl std::fmt::Debug for UnauthorizedSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnauthorizedSignal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
