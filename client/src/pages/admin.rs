//! Admin landing page. Only reachable through an admin-guarded route.

use leptos::prelude::*;

use crate::app::AppServices;
use crate::net::types::User;

#[component]
pub fn AdminPage(services: AppServices) -> impl IntoView {
    let auth = services.auth;
    let name = move || auth.with(|s| s.user.as_ref().map(User::display_name).unwrap_or_default());

    view! {
        <section class="admin-page">
            <h1>"Admin Dashboard"</h1>
            <p class="admin-page__who">{move || format!("Signed in as {}", name())}</p>
        </section>
    }
}
