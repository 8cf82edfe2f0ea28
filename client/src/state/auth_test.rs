use super::*;

// =============================================================
// AuthState defaults
// =============================================================

#[test]
fn auth_state_default_is_booting() {
    let state = AuthState::default();
    assert!(state.user.is_none());
    assert!(state.loading);
    assert_eq!(state.phase(), SessionPhase::Booting);
}

// =============================================================
// Phase derivation
// =============================================================

#[test]
fn anonymous_phase_when_settled_without_user() {
    assert_eq!(AuthState::anonymous().phase(), SessionPhase::Anonymous);
    assert!(!AuthState::anonymous().is_authenticated());
}

#[test]
fn authenticated_phase_when_settled_with_user() {
    let state = AuthState::authenticated(User::new(1, "ana", false));
    assert_eq!(state.phase(), SessionPhase::Authenticated);
    assert!(state.is_authenticated());
    assert!(!state.is_admin());
}

#[test]
fn loading_wins_over_user_presence() {
    let state = AuthState { user: Some(User::new(1, "ana", true)), loading: true };
    assert_eq!(state.phase(), SessionPhase::Booting);
    assert!(!state.is_admin());
}

#[test]
fn admin_flag_read_through_accessor() {
    let state = AuthState::authenticated(User::new(2, "root", true));
    assert!(state.is_admin());
}
