//! Email verification landing page (`/verify-email?token=...`).
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs `confirm_email` once on mount. On success a short countdown sends the
//! visitor home; the countdown stops if the page is torn down first.

#[cfg(test)]
#[path = "verify_email_test.rs"]
mod verify_email_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::app::AppServices;
use crate::state::auth_form::VerifyOutcome;

/// Seconds before the automatic redirect after a successful verification.
const REDIRECT_SECONDS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
enum VerifyStatus {
    Verifying,
    Success(String),
    Failed(String),
}

impl From<Result<VerifyOutcome, String>> for VerifyStatus {
    fn from(result: Result<VerifyOutcome, String>) -> Self {
        match result {
            Ok(outcome) => Self::Success(outcome.message().to_owned()),
            Err(message) => Self::Failed(message),
        }
    }
}

#[component]
pub fn VerifyEmailPage(services: AppServices) -> impl IntoView {
    let query = use_query_map();
    let status = RwSignal::new(VerifyStatus::Verifying);
    let countdown = RwSignal::new(REDIRECT_SECONDS);

    #[cfg(feature = "hydrate")]
    {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        use leptos_router::NavigateOptions;
        use leptos_router::hooks::use_navigate;

        use crate::state::auth_form::confirm_email;

        let alive = Arc::new(AtomicBool::new(true));
        let alive_task = alive.clone();
        let navigate_home = use_navigate();
        let token = query.with_untracked(|q| q.get("token"));
        leptos::task::spawn_local(async move {
            let result = VerifyStatus::from(confirm_email(token.as_deref(), &services.api, &services.session).await);
            if !alive_task.load(Ordering::Relaxed) {
                return;
            }
            let succeeded = matches!(result, VerifyStatus::Success(_));
            status.set(result);
            if !succeeded {
                return;
            }
            while countdown.get_untracked() > 0 {
                gloo_timers::future::sleep(std::time::Duration::from_secs(1)).await;
                if !alive_task.load(Ordering::Relaxed) {
                    return;
                }
                countdown.update(|n| *n = n.saturating_sub(1));
            }
            navigate_home("/", NavigateOptions::default());
        });
        on_cleanup(move || alive.store(false, Ordering::Relaxed));
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (query, &services);
    }

    view! {
        <div class="verify-page">
            <div class="verify-card">
                {move || match status.get() {
                    VerifyStatus::Verifying => {
                        view! {
                            <div class="loader"></div>
                            <h2>"Verifying..."</h2>
                            <p class="verify-card__hint">"Please wait while we confirm your account."</p>
                        }
                            .into_any()
                    }
                    VerifyStatus::Success(message) => {
                        view! {
                            <h2>"Verified!"</h2>
                            <p class="verify-card__message">{message}</p>
                            <p class="verify-card__hint">
                                {move || format!("Redirecting to Home in {}s...", countdown.get())}
                            </p>
                            <a class="auth-button" href="/">"Go to Home now"</a>
                        }
                            .into_any()
                    }
                    VerifyStatus::Failed(message) => {
                        view! {
                            <h2>"Failed"</h2>
                            <p class="auth-message auth-message--error">{message}</p>
                            <a class="auth-button" href="/register">"Return to Sign Up"</a>
                            <a class="auth-toggle" href="/login">"Back to Login"</a>
                        }
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}
