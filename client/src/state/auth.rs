//! Auth-session snapshot for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Produced by `SessionStore` on every transition and mirrored into a Leptos
//! signal, so route guards and user-aware components re-render whenever the
//! session changes.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;

/// Coarse session lifecycle derived from [`AuthState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// One-time startup bootstrap still running.
    Booting,
    Anonymous,
    Authenticated,
}

/// Authentication state tracking the current user and loading status.
///
/// `loading` is true only while the startup bootstrap runs and never flips
/// back once cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::booting()
    }
}

impl AuthState {
    /// State at application start, before the persisted token is checked.
    #[must_use]
    pub fn booting() -> Self {
        Self { user: None, loading: true }
    }

    /// Settled state with nobody signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user: None, loading: false }
    }

    /// Settled state for `user`.
    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user), loading: false }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (&self.user, self.loading) {
            (_, true) => SessionPhase::Booting,
            (None, false) => SessionPhase::Anonymous,
            (Some(_), false) => SessionPhase::Authenticated,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }

    /// True when a settled session belongs to an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        !self.loading && self.user.as_ref().is_some_and(User::is_admin)
    }
}
