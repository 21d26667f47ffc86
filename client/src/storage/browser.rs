//! Browser backends: `window.localStorage` and `document.cookie`.
//!
//! Both types are stateless handles that look the browser object up on every
//! call, so they stay `Send + Sync` and can live inside Leptos contexts.

use cookie::Cookie;
use wasm_bindgen::{JsCast, JsValue};

use super::cookies::header_value;
use super::{CookieJar, KeyValueStore, StorageError};

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookies;

fn js_error(value: JsValue) -> StorageError {
    StorageError::Backend(format!("{value:?}"))
}

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("window".to_owned()))?;
    window
        .local_storage()
        .map_err(js_error)?
        .ok_or_else(|| StorageError::Unavailable("localStorage".to_owned()))
}

fn html_document() -> Result<web_sys::HtmlDocument, StorageError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| StorageError::Unavailable("document".to_owned()))?
        .dyn_into::<web_sys::HtmlDocument>()
        .map_err(|_| StorageError::Unavailable("html document".to_owned()))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        local_storage()?.remove_item(key).map_err(js_error)
    }
}

impl CookieJar for DocumentCookies {
    fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        html_document()?.set_cookie(&header_value(&cookie)).map_err(js_error)
    }

    fn cookie(&self, name: &str) -> Result<Option<String>, StorageError> {
        let raw = html_document()?.cookie().map_err(js_error)?;
        Ok(Cookie::split_parse_encoded(raw)
            .filter_map(Result::ok)
            .find(|c| c.name() == name)
            .map(|c| c.value().to_owned()))
    }
}
