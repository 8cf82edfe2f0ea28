//! Session store: the single source of truth for who is signed in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the persisted token's write side and the [`AuthState`] snapshot.
//! `ApiClient` reads the token and raises the unauthorized signal; this store
//! subscribes to that signal at construction and treats it like `logout`.
//! Observers (the Leptos auth signal) are told about every visible change.
//!
//! ```text
//!            bootstrap ok
//!   Booting ─────────────────▶ Authenticated
//!      │                         ▲       │
//!      │ no token / failure      │ login │ logout, 401
//!      ▼                         │       ▼
//!   Anonymous ◀──────────────────┴───────┘
//! ```
//!
//! CONCURRENCY
//! ===========
//! Calls interleave on one event loop. Every login/logout/unauthorized
//! transition advances `generation`; a bootstrap fetch that resolves after a
//! newer transition only clears `loading`, so the latest explicit transition
//! wins and "user present iff token stored" holds once things settle. The
//! inner lock is never held across an await or while observers run.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::auth::{AuthState, SessionPhase};
use crate::net::api::{ApiClient, ApiError, Transport};
use crate::net::signal::UnauthorizedSignal;
use crate::net::types::{MeResponse, User};
use crate::util::token_store::TokenStore;

type Observer = Arc<dyn Fn(&AuthState) + Send + Sync>;

struct Inner {
    state: AuthState,
    generation: u64,
    observers: Vec<Observer>,
}

/// Cloneable handle to the process-wide session.
#[derive(Clone)]
pub struct SessionStore<S> {
    tokens: S,
    inner: Arc<Mutex<Inner>>,
}

impl<S: TokenStore> SessionStore<S> {
    /// Create a booting session and subscribe it to `unauthorized` for the
    /// rest of the process lifetime.
    pub fn new(tokens: S, unauthorized: &UnauthorizedSignal) -> Self {
        let store = Self {
            tokens,
            inner: Arc::new(Mutex::new(Inner {
                state: AuthState::booting(),
                generation: 0,
                observers: Vec::new(),
            })),
        };
        let listener = store.clone();
        unauthorized.subscribe(move || listener.on_unauthorized());
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state by value.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.lock().state.phase()
    }

    /// Register a change observer. It is not called for the current state.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        self.lock().observers.push(Arc::new(observer));
    }

    /// Apply `change` under the lock, then notify observers outside it when
    /// the visible state moved.
    fn transition<F>(&self, change: F)
    where
        F: FnOnce(&mut Inner, &S),
    {
        let notify = {
            let mut inner = self.lock();
            let before = inner.state.clone();
            change(&mut *inner, &self.tokens);
            (inner.state != before).then(|| (inner.state.clone(), inner.observers.clone()))
        };
        if let Some((state, observers)) = notify {
            for observer in observers {
                observer(&state);
            }
        }
    }

    /// Reconstruct the session from the persisted token. Call once at startup.
    ///
    /// Failures never escape: a missing, rejected, or unreachable identity
    /// collapses to `Anonymous` with the token removed.
    pub async fn bootstrap<T: Transport>(&self, api: &ApiClient<T, S>) -> SessionPhase {
        if self.tokens.load().is_none() {
            self.transition(|inner, _| inner.state.loading = false);
            return self.phase();
        }
        let started = self.lock().generation;
        let outcome = api.fetch_me().await;
        self.complete_bootstrap(started, outcome);
        self.phase()
    }

    fn complete_bootstrap(&self, started: u64, outcome: Result<MeResponse, ApiError>) {
        self.transition(|inner, tokens| {
            inner.state.loading = false;
            if inner.generation != started {
                leptos::logging::log!("bootstrap result discarded: session changed while fetching identity");
                return;
            }
            match outcome {
                Ok(MeResponse { user: Some(user) }) => inner.state.user = Some(user),
                Ok(MeResponse { user: None }) => {
                    tokens.clear();
                    inner.state.user = None;
                }
                Err(e) => {
                    leptos::logging::warn!("Auth check failed: {e}");
                    tokens.clear();
                    inner.state.user = None;
                }
            }
        });
    }

    /// Sign in with an identity and token obtained from a prior request.
    pub fn login(&self, user: User, token: &str) {
        self.transition(|inner, tokens| {
            tokens.save(token);
            inner.generation += 1;
            inner.state.user = Some(user);
        });
    }

    /// Sign out. Always succeeds; a no-op when already anonymous.
    pub fn logout(&self) {
        self.clear();
    }

    /// Handler for the unauthorized broadcast: same effect as [`Self::logout`].
    pub fn on_unauthorized(&self) {
        if self.lock().state.user.is_some() {
            leptos::logging::warn!("credential rejected by server; signing out");
        }
        self.clear();
    }

    fn clear(&self) {
        self.transition(|inner, tokens| {
            tokens.clear();
            inner.generation += 1;
            inner.state.user = None;
        });
    }
}

impl<S> std::fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("SessionStore")
            .field("state", &inner.state)
            .field("generation", &inner.generation)
            .finish_non_exhaustive()
    }
}
