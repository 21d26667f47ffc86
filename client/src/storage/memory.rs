//! In-process storage backends for SSR and tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use cookie::Cookie;
use cookie::time::OffsetDateTime;

use super::cookies::is_expired;
use super::{CookieJar, KeyValueStore, StorageError};

/// `localStorage` stand-in backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}

/// `document.cookie` stand-in keeping the full cookie (attributes included).
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, Cookie<'static>>>,
}

impl MemoryCookieJar {
    /// Stored cookie with its attributes, for inspection.
    pub fn get(&self, name: &str) -> Option<Cookie<'static>> {
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl CookieJar for MemoryCookieJar {
    fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let mut cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        if is_expired(&cookie, OffsetDateTime::now_utc()) {
            cookies.remove(cookie.name());
        } else {
            cookies.insert(cookie.name().to_owned(), cookie);
        }
        Ok(())
    }

    fn cookie(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(name).map(|c| c.value().to_owned()))
    }
}
