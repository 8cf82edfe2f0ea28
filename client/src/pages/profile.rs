//! Signed-in user's profile summary.

use leptos::prelude::*;

use crate::app::AppServices;

#[component]
pub fn ProfilePage(services: AppServices) -> impl IntoView {
    let auth = services.auth;
    let user = move || auth.with(|s| s.user.clone());

    view! {
        <section class="profile-page">
            {move || {
                user()
                    .map(|user| {
                        let unverified = !user.is_verified;
                        view! {
                            <h1 class="profile-page__name">{user.display_name()}</h1>
                            <p class="profile-page__handle">{format!("@{}", user.username)}</p>
                            <p class="profile-page__email">{user.email.clone()}</p>
                            {user.bio.clone().map(|bio| view! { <p class="profile-page__bio">{bio}</p> })}
                            {unverified
                                .then(|| view! { <p class="profile-page__warning">"Email not verified yet."</p> })}
                        }
                    })
            }}
        </section>
    }
}
