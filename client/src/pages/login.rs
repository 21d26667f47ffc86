//! Login page plus the session flows behind it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The flows (`submit_login`, `sign_out`, `refresh_session`,
//! `sync_current_user`, `register_account`) are plain async functions over
//! [`AuthApi`] and [`AuthStore`] so the CLI and tests drive them without a
//! reactive runtime. The page component only wires form signals to them.
//!
//! ERROR HANDLING
//! ==============
//! Failures collapse into [`SubmitError`]. Validation blocks the request;
//! request and network failures surface as one banner message. Nothing
//! retries.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use serde_json::Value;

use crate::net::auth_api::AuthApi;
use crate::net::types::{ApiError, INVALID_RESPONSE, RegisterRequest, User};
use crate::state::auth::AuthStore;
use crate::util::validators::{Field, FieldErrors, LoginInput, RegisterInput};

pub const LOGIN_RETRY_MESSAGE: &str = "Login failed. Please try again.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";
pub const NO_SESSION_MESSAGE: &str = "No active session";

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("request failed: {0}")]
    Request(ApiError),
    #[error("network error: {0}")]
    Network(ApiError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl SubmitError {
    /// Classify an API failure.
    pub fn from_api(error: ApiError) -> Self {
        if error.is_network() {
            Self::Network(error)
        } else if error.code == INVALID_RESPONSE {
            Self::Unexpected(error.message)
        } else {
            Self::Request(error)
        }
    }

    /// Text for the form-level alert; `None` for validation failures, which
    /// render inline.
    pub fn banner_message(&self) -> Option<String> {
        match self {
            Self::Validation(_) => None,
            Self::Request(error) | Self::Network(error) if !error.message.is_empty() => Some(error.message.clone()),
            Self::Request(_) | Self::Network(_) => Some(LOGIN_RETRY_MESSAGE.to_owned()),
            Self::Unexpected(_) => Some(UNEXPECTED_MESSAGE.to_owned()),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

// =============================================================
// Session flows
// =============================================================

/// Validate credentials, call login, and commit the session.
///
/// # Errors
///
/// Returns [`SubmitError::Validation`] without touching the network, or the
/// classified API failure. The store is only written on success.
pub async fn submit_login(api: &AuthApi, store: &AuthStore, email: &str, password: &str) -> Result<User, SubmitError> {
    let input = LoginInput::parse(email, password).map_err(SubmitError::Validation)?;
    let response = api
        .login(&input.email, &input.password)
        .await
        .into_result()
        .map_err(SubmitError::from_api)?;
    store.login(&response);
    Ok(response.user())
}

/// Tell the server the session ended, then clear local state regardless.
///
/// # Errors
///
/// Reports the remote failure; local state is already anonymous by then.
pub async fn sign_out(api: &AuthApi, store: &AuthStore) -> Result<(), SubmitError> {
    let remote = match store.access_token() {
        Some(token) => api.logout(&token).await.into_result().map(|_| ()),
        None => Ok(()),
    };
    store.logout();
    remote.map_err(|e| {
        log::warn!("auth: remote logout failed: {e}");
        SubmitError::from_api(e)
    })
}

/// Exchange the refresh token for a new pair.
///
/// # Errors
///
/// Fails without a request when no refresh token is held; API failures leave
/// the current tokens in place.
pub async fn refresh_session(api: &AuthApi, store: &AuthStore) -> Result<(), SubmitError> {
    let Some(refresh_token) = store.get().refresh_token else {
        return Err(SubmitError::Unexpected(NO_SESSION_MESSAGE.to_owned()));
    };
    let pair = api
        .refresh(&refresh_token)
        .await
        .into_result()
        .map_err(SubmitError::from_api)?;
    store.replace_tokens(pair.access_token, pair.refresh_token);
    Ok(())
}

/// Reload the user record from `GET /auth/me`.
///
/// # Errors
///
/// Fails without a request when signed out.
pub async fn sync_current_user(api: &AuthApi, store: &AuthStore) -> Result<User, SubmitError> {
    let Some(token) = store.access_token() else {
        return Err(SubmitError::Unexpected(NO_SESSION_MESSAGE.to_owned()));
    };
    let user = api
        .current_user(&token)
        .await
        .into_result()
        .map_err(SubmitError::from_api)?;
    store.update_user(user.clone());
    Ok(user)
}

/// Validate and submit a registration. Does not sign the user in.
///
/// # Errors
///
/// Same taxonomy as [`submit_login`].
pub async fn register_account(
    api: &AuthApi,
    email: &str,
    password: &str,
    name: &str,
    phone: Option<&str>,
) -> Result<Value, SubmitError> {
    let input = RegisterInput::parse(email, password, name, phone).map_err(SubmitError::Validation)?;
    let request = RegisterRequest {
        email: &input.email,
        password: &input.password,
        name: &input.name,
        phone: input.phone.as_deref(),
    };
    api.register(&request).await.into_result().map_err(SubmitError::from_api)
}

// =============================================================
// Page
// =============================================================

/// Email + password sign-in form. Expects the auth context to be provided.
#[component]
pub fn LoginPage(#[prop(into, default = crate::config::DEFAULT_DASHBOARD_PATH.to_owned())] redirect_to: String) -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);
    let field_errors = RwSignal::new(FieldErrors::default());
    let banner = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let api = crate::components::session::use_auth_api();
    #[cfg(feature = "hydrate")]
    let store = crate::components::session::use_auth_store();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();
    #[cfg(not(feature = "hydrate"))]
    let _ = &redirect_to;

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        banner.set(None);
        if let Err(errors) = LoginInput::parse(&email.get(), &password.get()) {
            field_errors.set(errors);
            return;
        }
        field_errors.set(FieldErrors::default());
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let api = api.clone();
            let store = store.clone();
            let navigate = navigate.clone();
            let redirect_to = redirect_to.clone();
            leptos::task::spawn_local(async move {
                match submit_login(&api, &store, &email.get_untracked(), &password.get_untracked()).await {
                    Ok(_) => navigate(&redirect_to, leptos_router::NavigateOptions::default()),
                    Err(e) => {
                        log::error!("login: {e}");
                        if let Some(errors) = e.field_errors() {
                            field_errors.set(errors.clone());
                        }
                        banner.set(e.banner_message());
                    }
                }
                busy.set(false);
            });
        }
    };

    let field_message = move |field: Field| move || field_errors.get().first(field).unwrap_or_default();

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=on_submit>
                <Show when=move || banner.get().is_some()>
                    <p class="login-message login-message--error">{move || banner.get().unwrap_or_default()}</p>
                </Show>
                <label for="email">"Email"</label>
                <input
                    id="email"
                    class="login-input"
                    type="email"
                    autocomplete="email"
                    placeholder="Enter your email"
                    disabled=move || busy.get()
                    prop:value=move || email.get()
                    on:input=move |ev| {
                        email.set(event_target_value(&ev));
                        field_errors.update(|errs| errs.clear(Field::Email));
                    }
                />
                <span class="login-field-error">{field_message(Field::Email)}</span>
                <label for="password">"Password"</label>
                <input
                    id="password"
                    class="login-input"
                    type=move || if show_password.get() { "text" } else { "password" }
                    autocomplete="current-password"
                    placeholder="Enter your password"
                    disabled=move || busy.get()
                    prop:value=move || password.get()
                    on:input=move |ev| {
                        password.set(event_target_value(&ev));
                        field_errors.update(|errs| errs.clear(Field::Password));
                    }
                />
                <button type="button" class="login-toggle" on:click=move |_| show_password.update(|v| *v = !*v)>
                    {move || if show_password.get() { "Hide" } else { "Show" }}
                </button>
                <span class="login-field-error">{field_message(Field::Password)}</span>
                <button class="login-button" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                </button>
            </form>
        </div>
    }
}
