//! Route guard components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages wrap their content in [`ProtectedRoute`] for sign-in and role
//! checks, or use [`RequireRole`] and its presets to hide fragments inline.
//! Decisions come from `util::auth`; these components only render them.

use leptos::prelude::*;

use super::session::{use_auth, use_auth_store};
use crate::util::auth::{ADMIN_ROLES, DEFAULT_LOGIN_PATH, GuardDecision, TEACHER_ROLES, evaluate_guard, role_gate_allows};

/// Render `children` only for signed-in users holding one of
/// `required_roles` (any role when empty). Until the session is restored,
/// and for anonymous visitors on their way to `redirect_to`, `fallback` (a
/// spinner by default) is shown.
#[component]
pub fn ProtectedRoute(
    children: ChildrenFn,
    #[prop(optional, into)] required_roles: Vec<String>,
    #[prop(optional, into)] fallback: Option<ViewFn>,
    #[prop(into, default = DEFAULT_LOGIN_PATH.to_owned())] redirect_to: String,
) -> impl IntoView {
    let auth = use_auth();

    #[cfg(feature = "hydrate")]
    crate::util::auth::install_unauth_redirect(auth, redirect_to.clone(), leptos_router::hooks::use_navigate());

    let decision = Memo::new(move |_| {
        let roles: Vec<&str> = required_roles.iter().map(String::as_str).collect();
        auth.with(|state| evaluate_guard(state, &roles, &redirect_to))
    });

    move || match decision.get() {
        GuardDecision::Allow => children(),
        GuardDecision::Denied => view! { <AccessDenied/> }.into_any(),
        GuardDecision::Pending | GuardDecision::Redirect(_) => match fallback.as_ref() {
            Some(fallback) => fallback.run(),
            None => view! {
                <div class="auth-pending">
                    <span class="spinner" aria-hidden="true"></span>
                    <p>"Checking authentication..."</p>
                </div>
            }
            .into_any(),
        },
    }
}

/// Shown to signed-in users lacking the route's role.
#[component]
pub fn AccessDenied() -> impl IntoView {
    let on_back = move |_| {
        #[cfg(feature = "hydrate")]
        {
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                let _ = history.back();
            }
        }
    };

    view! {
        <div class="access-denied">
            <h1>"Access Denied"</h1>
            <p>"You don't have permission to access this page."</p>
            <button class="access-denied__back" type="button" on:click=on_back>
                "Go Back"
            </button>
        </div>
    }
}

fn role_gate(roles: Vec<String>, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let allowed = Memo::new(move |_| {
        let roles: Vec<&str> = roles.iter().map(String::as_str).collect();
        auth.with(|state| role_gate_allows(state, &roles))
    });
    move || allowed.get().then(|| children())
}

fn owned(roles: &[&str]) -> Vec<String> {
    roles.iter().map(|r| (*r).to_owned()).collect()
}

/// Render `children` only when the user holds one of `roles`; no redirect.
#[component]
pub fn RequireRole(#[prop(into)] roles: Vec<String>, children: ChildrenFn) -> impl IntoView {
    role_gate(roles, children)
}

#[component]
pub fn AdminOnly(children: ChildrenFn) -> impl IntoView {
    role_gate(owned(ADMIN_ROLES), children)
}

#[component]
pub fn TeacherOnly(children: ChildrenFn) -> impl IntoView {
    role_gate(owned(TEACHER_ROLES), children)
}

/// Restore the persisted session once, after the client mounts. Guards stay
/// pending until then, so the hydrating render matches the server markup.
#[component]
pub fn AuthInitializer() -> impl IntoView {
    let store = use_auth_store();
    #[cfg(feature = "hydrate")]
    Effect::new(move || {
        if store.initialize() {
            log::debug!("auth: restored persisted session");
        }
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = store;
}
