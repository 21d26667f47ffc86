//! Context providers that bridge the session stores into Leptos.
//!
//! DESIGN
//! ======
//! [`AuthStore`] and [`ToastQueue`] stay framework-agnostic. Each provider
//! puts the store in context and mirrors it into an `RwSignal` through a
//! store subscription, so components read reactively while flows keep
//! writing to the store. The subscription is dropped when the owner is
//! cleaned up.

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::net::auth_api::AuthApi;
use crate::state::auth::{AuthState, AuthStore};
use crate::state::toast::{Toast, ToastQueue};

/// Install `store` and its mirrored signal in context.
pub fn provide_auth_context(store: AuthStore) -> RwSignal<AuthState> {
    let signal = RwSignal::new(store.get());
    let id = store.subscribe(move |state: &AuthState| {
        let _ = signal.try_set(state.clone());
    });
    let owner_store = store.clone();
    on_cleanup(move || {
        owner_store.unsubscribe(id);
    });
    provide_context(store);
    provide_context(signal);
    signal
}

/// Install `queue` and its mirrored toast list in context.
pub fn provide_toast_context(queue: ToastQueue) -> RwSignal<Vec<Toast>> {
    let signal = RwSignal::new(queue.toasts());
    let id = queue.subscribe(move |toasts: &Vec<Toast>| {
        let _ = signal.try_set(toasts.clone());
    });
    let owner_queue = queue.clone();
    on_cleanup(move || {
        owner_queue.unsubscribe(id);
    });
    provide_context(queue);
    provide_context(signal);
    signal
}

pub fn provide_api_context(api: AuthApi) {
    provide_context(api);
}

/// Wire the browser session: `fetch` transport, `localStorage` + cookie
/// persistence, and an empty toast queue.
#[cfg(feature = "hydrate")]
pub fn provide_browser_session(config: &ClientConfig) {
    use std::sync::Arc;

    use crate::net::api::ApiClient;
    use crate::net::transport::BrowserTransport;
    use crate::storage::SessionPersistence;

    let client = ApiClient::from_config(config, Arc::new(BrowserTransport));
    provide_api_context(AuthApi::new(client));
    provide_auth_context(AuthStore::new(SessionPersistence::browser()));
    provide_toast_context(ToastQueue::new());
    provide_context(config.clone());
}

/// Configuration in context, or defaults when none was provided.
pub fn use_config() -> ClientConfig {
    use_context::<ClientConfig>().unwrap_or_default()
}

pub fn use_auth() -> RwSignal<AuthState> {
    expect_context::<RwSignal<AuthState>>()
}

pub fn use_auth_store() -> AuthStore {
    expect_context::<AuthStore>()
}

pub fn use_auth_api() -> AuthApi {
    expect_context::<AuthApi>()
}

pub fn use_toasts() -> ToastQueue {
    expect_context::<ToastQueue>()
}

pub fn use_toast_list() -> RwSignal<Vec<Toast>> {
    expect_context::<RwSignal<Vec<Toast>>>()
}
