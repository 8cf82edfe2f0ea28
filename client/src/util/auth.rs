//! Route guard: who may see which screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`decide`] is the pure decision consulted on every protected render.
//! [`install_guard_redirect`] turns that decision into navigation so every
//! guarded route applies identical redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

/// Sign-in screen; unauthenticated visitors land here.
pub const LOGIN_PATH: &str = "/login";
/// Public home; signed-in users without the right capability land here.
pub const HOME_PATH: &str = "/";

/// Authorization level a route requires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Capability {
    /// Public route.
    #[default]
    None,
    /// Any signed-in user.
    User,
    /// Signed-in user with the admin flag.
    Admin,
}

/// Outcome of a guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still bootstrapping; show a placeholder and wait.
    Loading,
    Render,
    /// Send to [`LOGIN_PATH`], remembering where the visitor was headed.
    RedirectLogin { from: String },
    /// Send to [`HOME_PATH`].
    RedirectHome,
}

impl GuardDecision {
    /// Full href to navigate to, including the saved origin for login.
    #[must_use]
    pub fn redirect_href(&self) -> Option<String> {
        match self {
            Self::RedirectLogin { from } => Some(login_href(from)),
            Self::RedirectHome => Some(HOME_PATH.to_owned()),
            Self::Loading | Self::Render => None,
        }
    }
}

/// Decide what a route requiring `capability` shows for `state`.
///
/// Pure and total; `origin_path` is only echoed back in `RedirectLogin`.
#[must_use]
pub fn decide(state: &AuthState, capability: Capability, origin_path: &str) -> GuardDecision {
    if state.loading {
        return GuardDecision::Loading;
    }
    if capability == Capability::None {
        return GuardDecision::Render;
    }
    let Some(user) = &state.user else {
        return GuardDecision::RedirectLogin { from: origin_path.to_owned() };
    };
    if capability == Capability::Admin && !user.is_admin() {
        return GuardDecision::RedirectHome;
    }
    GuardDecision::Render
}

/// `/login?from=<origin>`; plain `/login` when the origin is home or empty.
#[must_use]
pub fn login_href(from: &str) -> String {
    if from.is_empty() || from == HOME_PATH {
        LOGIN_PATH.to_owned()
    } else {
        format!("{LOGIN_PATH}?from={}", urlencoding::encode(from))
    }
}

/// Origin to remember for a guarded URL: its path plus any query string.
///
/// `search` may come with or without its leading `?`.
#[must_use]
pub fn origin_path(pathname: &str, search: &str) -> String {
    match search.trim_start_matches('?') {
        "" => pathname.to_owned(),
        query => format!("{pathname}?{query}"),
    }
}

/// Where to go after a successful sign-in.
///
/// Only same-origin absolute paths are honored; anything else (missing,
/// protocol-relative, the login page itself) falls back to home.
#[must_use]
pub fn post_login_target(from: Option<&str>) -> String {
    match from {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && path != LOGIN_PATH
                && !path.starts_with("/login?") =>
        {
            path.to_owned()
        }
        _ => HOME_PATH.to_owned(),
    }
}

/// Navigate away whenever the guard decision for the current session turns
/// into a redirect. Re-runs on every auth change.
pub fn install_guard_redirect<O, F>(auth: RwSignal<AuthState>, capability: Capability, origin: O, navigate: F)
where
    O: Fn() -> String + Send + Sync + 'static,
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let decision = decide(&auth.get(), capability, &origin());
        if let Some(href) = decision.redirect_href() {
            navigate(&href, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
