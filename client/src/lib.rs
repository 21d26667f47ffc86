//! # sia-client
//!
//! Client session layer for the SIA school-administration web app: an API
//! client that normalizes every call into a `{data, error}` envelope, an
//! observable auth store mirrored to local storage and cookies, route
//! guards, a toast queue, and form validators.
//!
//! The core modules are framework-agnostic and also drive the `sia` CLI.
//! Leptos bindings live in `components`, `pages`, and `app`; browser code is
//! gated behind the `hydrate` feature and the `reqwest` transport behind
//! `native`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod storage;
pub mod util;

/// Route browser panics and `log` records to the devtools console.
#[cfg(feature = "hydrate")]
pub fn init_browser_logging(debug: bool) {
    console_error_panic_hook::set_once();
    let level = if debug { log::Level::Debug } else { log::Level::Info };
    let _ = console_log::init_with_level(level);
}

/// WASM entry point: hydrate the server-rendered [`app::App`].
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    let config = config::ClientConfig::from_build_env().unwrap_or_default();
    init_browser_logging(config.debug);
    leptos::mount::hydrate_body(app::App);
}
