//! Authenticated landing page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Shows who is signed in and offers sign-out. The route itself is wrapped in
//! `ProtectedRoute`, so this page assumes a session is present.

use leptos::prelude::*;

use crate::components::session::use_auth;
use crate::util::roles::{display_name, initials, primary_role, role_label};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();

    let name = move || auth.with(|state| display_name(state.user.as_ref()));
    let badge = move || auth.with(|state| initials(state.user.as_ref()));
    let role = move || auth.with(|state| role_label(primary_role(state.user.as_ref())));

    #[cfg(feature = "hydrate")]
    let (api, store, login_path) = (
        crate::components::session::use_auth_api(),
        crate::components::session::use_auth_store(),
        crate::components::session::use_config().login_path,
    );

    let on_sign_out = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let (api, store, login_path) = (api.clone(), store.clone(), login_path.clone());
            leptos::task::spawn_local(async move {
                if let Err(e) = crate::pages::login::sign_out(&api, &store).await {
                    log::warn!("dashboard: {e}");
                }
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href(&login_path);
                }
            });
        }
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <span class="avatar">{badge}</span>
                <div class="dashboard-header__user">
                    <strong>{name}</strong>
                    <span class="badge">{role}</span>
                </div>
                <button class="dashboard-header__logout" type="button" on:click=on_sign_out>
                    "Logout"
                </button>
            </header>
        </div>
    }
}
