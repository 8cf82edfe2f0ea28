//! Public landing page.

use leptos::prelude::*;

use crate::app::AppServices;

#[component]
pub fn HomePage(services: AppServices) -> impl IntoView {
    let auth = services.auth;
    let greeting = move || {
        auth.with(|s| match &s.user {
            Some(user) => format!("Welcome back, {}.", user.display_name()),
            None => "Your movie review platform.".to_owned(),
        })
    };

    view! {
        <section class="home-page">
            <h1 class="home-page__title">"FrameRate"</h1>
            <p class="home-page__tagline">{greeting}</p>
            <Show when=move || auth.with(|s| !s.loading && s.user.is_none())>
                <p class="home-page__hint">
                    <a href="/login">"Sign in"</a>
                    " to rate films and keep a watchlist."
                </p>
            </Show>
        </section>
    }
}
