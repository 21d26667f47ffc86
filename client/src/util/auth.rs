//! Route-guard decisions shared by protected pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect and role
//! checks. The decision is a pure function of the auth state so it can be
//! tested without a reactive runtime; the Leptos wiring lives in
//! `components::protected_route`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

pub use crate::config::DEFAULT_LOGIN_PATH;
use crate::state::auth::AuthState;

pub const ADMIN_ROLES: &[&str] = &["admin", "super_admin"];
pub const TEACHER_ROLES: &[&str] = &["teacher", "admin", "super_admin"];

/// What a protected route should do for the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// The persisted session has not been read yet; show the fallback.
    Pending,
    /// Not signed in; navigate to the contained path.
    Redirect(String),
    /// Signed in without any of the required roles.
    Denied,
    Allow,
}

/// Whether `state` holds at least one of `roles`. An empty list matches.
pub fn has_any_role(state: &AuthState, roles: &[&str]) -> bool {
    if roles.is_empty() {
        return true;
    }
    let held = state.roles();
    roles.iter().any(|role| held.iter().any(|h| h == role))
}

/// Inline role gate: a user record must be present and hold one of `roles`.
/// Unlike [`evaluate_guard`], an empty list shows nothing.
pub fn role_gate_allows(state: &AuthState, roles: &[&str]) -> bool {
    state.user.is_some() && !roles.is_empty() && has_any_role(state, roles)
}

pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && !state.is_authenticated
}

/// Decide access for a route requiring any of `required_roles`.
///
/// An authenticated state without a user record cannot prove a role, so it
/// is denied whenever roles are required.
pub fn evaluate_guard(state: &AuthState, required_roles: &[&str], redirect_to: &str) -> GuardDecision {
    if state.loading {
        return GuardDecision::Pending;
    }
    if should_redirect_unauth(state) {
        return GuardDecision::Redirect(redirect_to.to_owned());
    }
    if has_any_role(state, required_roles) {
        GuardDecision::Allow
    } else {
        GuardDecision::Denied
    }
}

/// Navigate to `redirect_to` whenever the session becomes anonymous. Does
/// nothing while the persisted session is still loading.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, redirect_to: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = auth.get();
        if should_redirect_unauth(&state) {
            log::debug!("guard: anonymous session, redirecting to {redirect_to}");
            navigate(&redirect_to, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
