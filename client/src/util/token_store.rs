//! Persisted bearer-token storage.
//!
//! The browser implementation keeps the token in `localStorage` under
//! [`TOKEN_KEY`]; absence of the key is the canonical "logged out" marker
//! across reloads. SSR paths see an empty store.
//!
//! TRADE-OFFS
//! ==========
//! Storage writes are best-effort. A failed write or removal (private mode,
//! quota) is logged and otherwise ignored. A token that could not be removed
//! is sent again by the next bootstrap and dropped if the server rejects it.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::sync::{Arc, Mutex, PoisonError};

/// `localStorage` key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Durable single-slot token storage.
///
/// Only `SessionStore` writes through this trait; `ApiClient` only reads.
pub trait TokenStore: Clone + Send + Sync + 'static {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);

    fn has_token(&self) -> bool {
        self.load().is_some()
    }
}

/// Token storage backed by `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
            storage
                .get_item(TOKEN_KEY)
                .ok()
                .flatten()
                .filter(|token| !token.is_empty())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save(&self, token: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
                leptos::logging::warn!("{}", storage_warning(TokenWrite::Save, StorageFault::Unavailable));
                return;
            };
            if storage.set_item(TOKEN_KEY, token).is_err() {
                leptos::logging::warn!("{}", storage_warning(TokenWrite::Save, StorageFault::Rejected));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
                leptos::logging::warn!("{}", storage_warning(TokenWrite::Clear, StorageFault::Unavailable));
                return;
            };
            if storage.remove_item(TOKEN_KEY).is_err() {
                leptos::logging::warn!("{}", storage_warning(TokenWrite::Clear, StorageFault::Rejected));
            }
        }
    }
}

#[cfg(any(feature = "hydrate", test))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenWrite {
    Save,
    Clear,
}

#[cfg(any(feature = "hydrate", test))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StorageFault {
    Unavailable,
    Rejected,
}

/// Console text for a failed token write or removal.
#[cfg(any(feature = "hydrate", test))]
fn storage_warning(write: TokenWrite, fault: StorageFault) -> String {
    let what = match write {
        TokenWrite::Save => "token not persisted",
        TokenWrite::Clear => "stored token not removed",
    };
    let why = match fault {
        StorageFault::Unavailable => "localStorage unavailable",
        StorageFault::Rejected => "localStorage rejected the write",
    };
    format!("{what}: {why}")
}

/// In-memory token storage for tests and non-browser hosts.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`, as if left behind by a previous visit.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.save(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn save(&self, token: &str) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
