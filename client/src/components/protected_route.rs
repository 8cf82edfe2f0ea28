//! Guarded route wrapper.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps a page so it renders only when [`decide`] allows it. While the
//! session bootstraps a loader is shown; redirects are issued by
//! [`install_guard_redirect`] with `replace` so the blocked page never lands
//! in history.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::app::AppServices;
use crate::util::auth::{Capability, GuardDecision, decide, install_guard_redirect, origin_path};

/// Render `children` only for sessions that hold `capability`.
#[component]
pub fn ProtectedRoute(
    services: AppServices,
    #[prop(optional)] capability: Capability,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = services.auth;
    let location = use_location();
    let (pathname, search) = (location.pathname, location.search);
    let origin = move || pathname.with_untracked(|path| search.with_untracked(|query| origin_path(path, query)));

    install_guard_redirect(auth, capability, origin, use_navigate());

    move || match decide(&auth.get(), capability, &origin()) {
        GuardDecision::Loading => view! {
            <div class="route-loading">
                <div class="loader"></div>
            </div>
        }
        .into_any(),
        GuardDecision::Render => children().into_any(),
        GuardDecision::RedirectLogin { .. } | GuardDecision::RedirectHome => ().into_any(),
    }
}
