//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::protected_route::{AuthInitializer, ProtectedRoute};
use crate::components::session::use_config;
use crate::components::toast_stack::ToastStack;
use crate::config::ClientConfig;
use crate::pages::{dashboard::DashboardPage, login::LoginPage};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Installs the session contexts, restores any persisted session, and sets
/// up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_session_contexts();

    let config = use_config();
    let app_name = config.app_name.clone();
    let dashboard_path = config.dashboard_path.clone();
    let login_path = config.login_path.clone();
    let home_path = config.dashboard_path.clone();

    view! {
        <Title text=app_name/>
        <AuthInitializer/>
        <ToastStack/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route
                    path=StaticSegment("login")
                    view=move || view! { <LoginPage redirect_to=dashboard_path.clone()/> }
                />
                <Route
                    path=StaticSegment("dashboard")
                    view=move || {
                        let login_path = login_path.clone();
                        view! {
                            <ProtectedRoute redirect_to=login_path>
                                <DashboardPage/>
                            </ProtectedRoute>
                        }
                    }
                />
                <Route path=StaticSegment("") view=move || view! { <Redirect path=home_path.clone()/> }/>
            </Routes>
        </Router>
    }
}

#[cfg(feature = "hydrate")]
fn provide_session_contexts() {
    let config = ClientConfig::from_build_env().unwrap_or_else(|e| {
        log::warn!("config: {e}; using defaults");
        ClientConfig::default()
    });
    crate::components::session::provide_browser_session(&config);
}

/// Server render: no browser storage, so the session always starts
/// anonymous and the client takes over after hydration.
#[cfg(not(feature = "hydrate"))]
fn provide_session_contexts() {
    use std::sync::Arc;

    use crate::components::session::{provide_api_context, provide_auth_context, provide_toast_context};
    use crate::net::api::ApiClient;
    use crate::net::auth_api::AuthApi;
    use crate::net::transport::OfflineTransport;
    use crate::state::auth::AuthStore;
    use crate::state::toast::ToastQueue;
    use crate::storage::SessionPersistence;

    let config = ClientConfig::from_env().unwrap_or_default();
    provide_api_context(AuthApi::new(ApiClient::from_config(&config, Arc::new(OfflineTransport))));
    provide_auth_context(AuthStore::new(SessionPersistence::in_memory()));
    provide_toast_context(ToastQueue::new());
    provide_context(config);
}
