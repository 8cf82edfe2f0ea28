//! Sign-in / sign-up page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds `state::auth_form` to inputs. A successful sign-in is observed
//! through the session signal rather than the submit result, so visitors who
//! are already signed in and fresh logins take the same exit: the `from`
//! query parameter when it is a safe local path, otherwise home.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::app::AppServices;
use crate::state::auth::AuthState;
use crate::state::auth_form::{AuthMode, Field, FieldErrors, LoginForm, RegisterForm};
use crate::util::auth::post_login_target;

#[component]
pub fn AuthPage(services: AppServices, #[prop(optional)] initial_mode: AuthMode) -> impl IntoView {
    let auth = services.auth;
    let query = use_query_map();
    let navigate = use_navigate();

    let mode = RwSignal::new(initial_mode);
    let identifier = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let banner = RwSignal::new(None::<String>);
    let pending = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    Effect::new(move || {
        if auth.with(AuthState::is_authenticated) {
            let target = post_login_target(query.with_untracked(|q| q.get("from")).as_deref());
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_toggle = move |_| {
        mode.update(|m| *m = m.toggle());
        errors.set(FieldErrors::new());
        banner.set(None);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        errors.set(FieldErrors::new());
        banner.set(None);
        busy.set(true);

        let current = mode.get_untracked();
        let login = LoginForm { identifier: identifier.get_untracked(), password: password.get_untracked() };
        let register = RegisterForm {
            email: email.get_untracked(),
            username: username.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };

        #[cfg(feature = "hydrate")]
        {
            use crate::state::auth_form::{SubmitOutcome, submit_login, submit_register};

            let services = services.clone();
            leptos::task::spawn_local(async move {
                let result = match current {
                    AuthMode::Login => submit_login(&login, &services.api, &services.session).await,
                    AuthMode::Register => submit_register(&register, &services.api, &services.session).await,
                };
                match result {
                    Ok(SubmitOutcome::SignedIn(_)) => {}
                    Ok(SubmitOutcome::PendingVerification(message)) => pending.set(Some(message)),
                    Err(err) => {
                        errors.set(err.fields().clone());
                        banner.set(err.banner().map(str::to_owned));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (current, login, register, &services);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1 class="auth-card__title">{move || mode.get().title()}</h1>
                <Show
                    when=move || pending.get().is_none()
                    fallback=move || {
                        view! {
                            <p class="auth-message auth-message--success">
                                {move || pending.get().unwrap_or_default()}
                            </p>
                            <a class="auth-link" href="/login">"Back to Login"</a>
                        }
                    }
                >
                    <form class="auth-form" on:submit=on_submit.clone()>
                        <Show
                            when=move || mode.get() == AuthMode::Register
                            fallback=move || {
                                text_field("Email or Username", "text", identifier, Field::Identifier, errors)
                            }
                        >
                            {text_field("Email", "email", email, Field::Email, errors)}
                            {text_field("Username", "text", username, Field::Username, errors)}
                        </Show>
                        {text_field("Password", "password", password, Field::Password, errors)}
                        <Show when=move || mode.get() == AuthMode::Register>
                            {text_field(
                                "Confirm Password",
                                "password",
                                confirm_password,
                                Field::ConfirmPassword,
                                errors,
                            )}
                        </Show>
                        <Show when=move || banner.get().is_some()>
                            <p class="auth-message auth-message--error">
                                {move || banner.get().unwrap_or_default()}
                            </p>
                        </Show>
                        <button class="auth-button" type="submit" disabled=move || busy.get()>
                            {move || mode.get().submit_label()}
                        </button>
                    </form>
                    <button class="auth-toggle" type="button" on:click=on_toggle>
                        {move || match mode.get() {
                            AuthMode::Login => "Don't have an account? Register",
                            AuthMode::Register => "Already have an account? Login",
                        }}
                    </button>
                </Show>
            </div>
        </div>
    }
}

/// Labelled input bound to `value`, with its inline error underneath.
fn text_field(
    label: &'static str,
    kind: &'static str,
    value: RwSignal<String>,
    field: Field,
    errors: RwSignal<FieldErrors>,
) -> impl IntoView {
    view! {
        <label class="auth-field">
            <span class="auth-field__label">{label}</span>
            <input
                class="auth-input"
                type=kind
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            <Show when=move || errors.with(|e| e.contains_key(&field))>
                <span class="auth-field__error">
                    {move || errors.with(|e| e.get(&field).cloned().unwrap_or_default())}
                </span>
            </Show>
        </label>
    }
}
