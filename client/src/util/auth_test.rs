use super::*;
use crate::net::types::User;

fn member() -> AuthState {
    AuthState::authenticated(User::new(1, "ana", false))
}

fn admin() -> AuthState {
    AuthState::authenticated(User::new(2, "root", true))
}

// =============================================================
// decide
// =============================================================

#[test]
fn loading_yields_placeholder_for_every_capability() {
    for capability in [Capability::None, Capability::User, Capability::Admin] {
        assert_eq!(decide(&AuthState::booting(), capability, "/profile"), GuardDecision::Loading);
    }
}

#[test]
fn public_route_renders_for_everyone_once_loaded() {
    for state in [AuthState::anonymous(), member(), admin()] {
        assert_eq!(decide(&state, Capability::None, "/"), GuardDecision::Render);
    }
}

#[test]
fn anonymous_is_sent_to_login_with_origin() {
    let decision = decide(&AuthState::anonymous(), Capability::User, "/profile");
    assert_eq!(decision, GuardDecision::RedirectLogin { from: "/profile".to_owned() });
    assert_eq!(decision.redirect_href().as_deref(), Some("/login?from=%2Fprofile"));

    let decision = decide(&AuthState::anonymous(), Capability::Admin, "/admin");
    assert_eq!(decision, GuardDecision::RedirectLogin { from: "/admin".to_owned() });
}

#[test]
fn non_admin_is_sent_home_from_admin_route() {
    let decision = decide(&member(), Capability::Admin, "/admin");
    assert_eq!(decision, GuardDecision::RedirectHome);
    assert_eq!(decision.redirect_href().as_deref(), Some("/"));
    assert_eq!(decide(&member(), Capability::User, "/profile"), GuardDecision::Render);
}

#[test]
fn admin_renders_everywhere() {
    for capability in [Capability::None, Capability::User, Capability::Admin] {
        assert_eq!(decide(&admin(), capability, "/admin"), GuardDecision::Render);
    }
}

#[test]
fn decision_is_total_and_deterministic() {
    let states = [AuthState::booting(), AuthState::anonymous(), member(), admin()];
    let capabilities = [Capability::None, Capability::User, Capability::Admin];
    for state in &states {
        for capability in capabilities {
            let first = decide(state, capability, "/x");
            let second = decide(state, capability, "/x");
            assert_eq!(first, second);
            let is_redirect = first.redirect_href().is_some();
            assert_eq!(
                is_redirect,
                matches!(first, GuardDecision::RedirectLogin { .. } | GuardDecision::RedirectHome)
            );
        }
    }
}

#[test]
fn render_and_loading_have_no_redirect() {
    assert_eq!(GuardDecision::Render.redirect_href(), None);
    assert_eq!(GuardDecision::Loading.redirect_href(), None);
}

// =============================================================
// Redirect hrefs
// =============================================================

#[test]
fn login_href_carries_encoded_origin() {
    assert_eq!(login_href("/profile"), "/login?from=%2Fprofile");
    assert_eq!(login_href("/"), "/login");
    assert_eq!(login_href(""), "/login");
}

#[test]
fn login_href_keeps_origin_query_string() {
    assert_eq!(login_href("/admin?tab=users&q=a b"), "/login?from=%2Fadmin%3Ftab%3Dusers%26q%3Da%20b");
}

#[test]
fn redirect_href_for_login_includes_origin() {
    let decision = GuardDecision::RedirectLogin { from: "/admin".to_owned() };
    assert_eq!(decision.redirect_href().as_deref(), Some("/login?from=%2Fadmin"));
    assert_eq!(GuardDecision::RedirectHome.redirect_href().as_deref(), Some("/"));
}

#[test]
fn post_login_target_accepts_local_paths() {
    assert_eq!(post_login_target(Some("/profile")), "/profile");
    assert_eq!(post_login_target(Some("/admin?tab=users")), "/admin?tab=users");
}

#[test]
fn post_login_target_rejects_foreign_or_looping_paths() {
    assert_eq!(post_login_target(None), "/");
    assert_eq!(post_login_target(Some("https://evil.example")), "/");
    assert_eq!(post_login_target(Some("//evil.example")), "/");
    assert_eq!(post_login_target(Some("/\\evil.example")), "/");
    assert_eq!(post_login_target(Some("/login")), "/");
    assert_eq!(post_login_target(Some("/login?from=/x")), "/");
}

#[test]
fn origin_path_keeps_query_string() {
    assert_eq!(origin_path("/profile", ""), "/profile");
    assert_eq!(origin_path("/profile", "?"), "/profile");
    assert_eq!(origin_path("/admin", "tab=users"), "/admin?tab=users");
    assert_eq!(origin_path("/admin", "?tab=users"), "/admin?tab=users");
}

#[test]
fn guarded_query_string_survives_login_round_trip() {
    let from = origin_path("/admin", "tab=users");
    let decision = decide(&AuthState::anonymous(), Capability::Admin, &from);
    assert_eq!(decision.redirect_href().as_deref(), Some("/login?from=%2Fadmin%3Ftab%3Dusers"));
    assert_eq!(post_login_target(Some(&from)), "/admin?tab=users");
}
