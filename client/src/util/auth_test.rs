use super::*;
use crate::net::types::User;

fn user_with_roles(roles: &[&str]) -> User {
    User {
        user_id: "u1".to_owned(),
        email: "alice@school.edu".to_owned(),
        first_name: "Alice".to_owned(),
        last_name: "Smith".to_owned(),
        roles: roles.iter().map(|r| (*r).to_owned()).collect(),
        phone_number: None,
        avatar_url: None,
        created_at: None,
    }
}

fn signed_in(roles: &[&str]) -> AuthState {
    AuthState::authenticated(user_with_roles(roles), "access".to_owned(), Some("refresh".to_owned()))
}

#[test]
fn should_redirect_unauth_when_anonymous() {
    assert!(should_redirect_unauth(&AuthState::anonymous()));
}

#[test]
fn should_not_redirect_when_user_exists() {
    assert!(!should_redirect_unauth(&signed_in(&["teacher"])));
}

#[test]
fn loading_state_neither_redirects_nor_allows() {
    let state = AuthState::pending();
    assert!(!should_redirect_unauth(&state));
    assert_eq!(evaluate_guard(&state, &[], DEFAULT_LOGIN_PATH), GuardDecision::Pending);
    assert_eq!(evaluate_guard(&state, ADMIN_ROLES, DEFAULT_LOGIN_PATH), GuardDecision::Pending);
}

#[test]
fn loading_with_restored_user_still_waits() {
    let state = AuthState { loading: true, ..signed_in(&["admin"]) };
    assert_eq!(evaluate_guard(&state, ADMIN_ROLES, DEFAULT_LOGIN_PATH), GuardDecision::Pending);
}

#[test]
fn anonymous_state_redirects_to_given_path() {
    let decision = evaluate_guard(&AuthState::anonymous(), &[], DEFAULT_LOGIN_PATH);
    assert_eq!(decision, GuardDecision::Redirect("/login".to_owned()));

    let custom = evaluate_guard(&AuthState::anonymous(), ADMIN_ROLES, "/signin");
    assert_eq!(custom, GuardDecision::Redirect("/signin".to_owned()));
}

#[test]
fn authenticated_without_role_requirement_is_allowed() {
    assert_eq!(evaluate_guard(&signed_in(&[]), &[], DEFAULT_LOGIN_PATH), GuardDecision::Allow);
}

#[test]
fn any_matching_role_is_enough() {
    let state = signed_in(&["teacher"]);
    assert_eq!(evaluate_guard(&state, TEACHER_ROLES, DEFAULT_LOGIN_PATH), GuardDecision::Allow);
    assert_eq!(evaluate_guard(&state, &["student", "teacher"], DEFAULT_LOGIN_PATH), GuardDecision::Allow);
}

#[test]
fn missing_role_is_denied() {
    let state = signed_in(&["teacher"]);
    assert_eq!(evaluate_guard(&state, ADMIN_ROLES, DEFAULT_LOGIN_PATH), GuardDecision::Denied);
}

#[test]
fn authenticated_without_user_record_is_denied_when_roles_required() {
    let state = AuthState { is_authenticated: true, access_token: Some("a".to_owned()), ..AuthState::default() };
    assert_eq!(evaluate_guard(&state, ADMIN_ROLES, DEFAULT_LOGIN_PATH), GuardDecision::Denied);
    assert_eq!(evaluate_guard(&state, &[], DEFAULT_LOGIN_PATH), GuardDecision::Allow);
}

#[test]
fn role_sets_cover_expected_roles() {
    assert!(has_any_role(&signed_in(&["super_admin"]), ADMIN_ROLES));
    assert!(has_any_role(&signed_in(&["admin"]), TEACHER_ROLES));
    assert!(!has_any_role(&signed_in(&["parent", "student"]), TEACHER_ROLES));
}

#[test]
fn role_gate_needs_user_and_non_empty_roles() {
    assert!(role_gate_allows(&signed_in(&["admin"]), ADMIN_ROLES));
    assert!(!role_gate_allows(&signed_in(&["admin"]), &[]));
    assert!(!role_gate_allows(&signed_in(&["student"]), TEACHER_ROLES));
    assert!(!role_gate_allows(&AuthState::anonymous(), ADMIN_ROLES));
}
