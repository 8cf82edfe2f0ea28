//! Top navigation bar.
//!
//! Shows sign-in links to visitors, and the username, admin link and logout
//! button to signed-in users. Logging out here only clears the session; any
//! guarded page underneath redirects itself.

use leptos::prelude::*;

use crate::app::AppServices;
use crate::net::types::User;
use crate::state::auth::AuthState;

#[component]
pub fn NavBar(services: AppServices) -> impl IntoView {
    let auth = services.auth;
    let session = services.session;

    let username = move || auth.with(|s| s.user.as_ref().map(User::display_name).unwrap_or_default());

    view! {
        <nav class="nav-bar">
            <a class="nav-bar__brand" href="/">"FrameRate"</a>
            <div class="nav-bar__links">
                <Show
                    when=move || auth.with(AuthState::is_authenticated)
                    fallback=|| {
                        view! {
                            <a class="nav-bar__link" href="/login">"Login"</a>
                            <a class="nav-bar__link" href="/register">"Register"</a>
                        }
                    }
                >
                    <Show when=move || auth.with(AuthState::is_admin)>
                        <a class="nav-bar__link" href="/admin">"Admin"</a>
                    </Show>
                    <a class="nav-bar__user" href="/profile">{username}</a>
                    <button
                        class="nav-bar__logout"
                        type="button"
                        on:click={
                            let session = session.clone();
                            move |_| session.logout()
                        }
                    >
                        "Logout"
                    </button>
                </Show>
            </div>
        </nav>
    }
}
