//! Application root: service wiring, shell and routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AppServices`] builds the one `UnauthorizedSignal` shared by the API
//! client and the session store, then mirrors session snapshots into a Leptos
//! signal so guards and pages re-render on every transition. The handles are
//! passed to routes as props. Bootstrap runs once, in the browser only, so SSR
//! output and the first hydrated frame both show the booting state.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::components::nav_bar::NavBar;
use crate::components::protected_route::ProtectedRoute;
use crate::config;
use crate::net::api::{ApiClient, GlooTransport};
use crate::net::signal::UnauthorizedSignal;
use crate::pages::admin::AdminPage;
use crate::pages::auth::AuthPage;
use crate::pages::home::HomePage;
use crate::pages::profile::ProfilePage;
use crate::pages::verify_email::VerifyEmailPage;
use crate::state::auth::AuthState;
use crate::state::auth_form::AuthMode;
use crate::state::session::SessionStore;
use crate::util::auth::Capability;
use crate::util::token_store::BrowserTokenStore;

/// API client as wired in the browser.
pub type BrowserApi = ApiClient<GlooTransport, BrowserTokenStore>;
/// Session store as wired in the browser.
pub type BrowserSession = SessionStore<BrowserTokenStore>;

/// Session-level handles shared by every route.
#[derive(Clone, Debug)]
pub struct AppServices {
    pub api: BrowserApi,
    pub session: BrowserSession,
    /// Reactive mirror of `session`; written only by the session observer.
    pub auth: RwSignal<AuthState>,
}

impl AppServices {
    /// Wire the API client and session store to one unauthorized signal.
    pub fn new(api_base_url: &str) -> Self {
        let tokens = BrowserTokenStore;
        let unauthorized = UnauthorizedSignal::new();
        let api = ApiClient::new(GlooTransport, tokens, unauthorized.clone(), api_base_url);
        let session = SessionStore::new(tokens, &unauthorized);
        let auth = RwSignal::new(session.snapshot());
        session.subscribe(move |state| auth.set(state.clone()));
        Self { api, session, auth }
    }
}

/// SSR document shell.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let services = AppServices::new(config::api_base_url());

    #[cfg(feature = "hydrate")]
    {
        let boot = services.clone();
        leptos::task::spawn_local(async move {
            let phase = boot.session.bootstrap(&boot.api).await;
            leptos::logging::log!("session ready: {phase:?}");
        });
    }

    let home = services.clone();
    let login = services.clone();
    let register = services.clone();
    let verify = services.clone();
    let profile = services.clone();
    let admin = services.clone();

    view! {
        <Stylesheet id="leptos" href="/pkg/framerate.css" />
        <Title text="FrameRate" />
        <Router>
            <NavBar services=services />
            <main class="app-main">
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=path!("/") view=move || view! { <HomePage services=home.clone() /> } />
                    <Route
                        path=path!("/login")
                        view=move || view! { <AuthPage services=login.clone() initial_mode=AuthMode::Login /> }
                    />
                    <Route
                        path=path!("/register")
                        view=move || {
                            view! { <AuthPage services=register.clone() initial_mode=AuthMode::Register /> }
                        }
                    />
                    <Route
                        path=path!("/verify-email")
                        view=move || view! { <VerifyEmailPage services=verify.clone() /> }
                    />
                    <Route
                        path=path!("/profile")
                        view=move || {
                            let services = profile.clone();
                            view! {
                                <ProtectedRoute services=services.clone() capability=Capability::User>
                                    <ProfilePage services=services.clone() />
                                </ProtectedRoute>
                            }
                        }
                    />
                    <Route
                        path=path!("/admin")
                        view=move || {
                            let services = admin.clone();
                            view! {
                                <ProtectedRoute services=services.clone() capability=Capability::Admin>
                                    <AdminPage services=services.clone() />
                                </ProtectedRoute>
                            }
                        }
                    />
                </Routes>
            </main>
        </Router>
    }
}
