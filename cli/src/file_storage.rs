//! JSON-file session mirror for the CLI.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser keeps the session in `localStorage` and `document.cookie`.
//! The CLI keeps both halves in one JSON file so `sia login` and a later
//! `sia whoami` share a session. Every write rewrites the whole file through
//! a temp file and rename.

#[cfg(test)]
#[path = "file_storage_test.rs"]
mod file_storage_test;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cookie::Cookie;
use cookie::time::OffsetDateTime;
use serde::{Deserialize, Serialize};
use sia_client::storage::cookies::is_expired;
use sia_client::storage::{CookieJar, KeyValueStore, StorageError};

const STATE_FILE_KEY: &str = "state-file";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCookie {
    value: String,
    /// Unix seconds; `None` is a session cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<i64>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FileState {
    #[serde(default)]
    local: BTreeMap<String, String>,
    #[serde(default)]
    cookies: BTreeMap<String, StoredCookie>,
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl FileStore {
    /// Load `path`, or start empty when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => FileState::default(),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| StorageError::Corrupt { key: STATE_FILE_KEY, reason: e.to_string() })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileState::default(),
            Err(e) => return Err(StorageError::Unavailable(format!("{}: {e}", path.display()))),
        };
        Ok(Self { path, state: Mutex::new(state) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, state: &FileState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        let text = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text).map_err(|e| StorageError::Backend(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::Backend(e.to_string()))
    }

    fn mutate(&self, f: impl FnOnce(&mut FileState)) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
        self.write(&state)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .local
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.mutate(|state| {
            state.local.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.mutate(|state| {
            state.local.remove(key);
        })
    }
}

impl CookieJar for FileStore {
    fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let now = OffsetDateTime::now_utc();
        if is_expired(&cookie, now) {
            return self.mutate(|state| {
                state.cookies.remove(cookie.name());
            });
        }
        let expires_at = cookie
            .max_age()
            .map(|age| now + age)
            .or_else(|| cookie.expires_datetime())
            .map(OffsetDateTime::unix_timestamp);
        let stored = StoredCookie { value: cookie.value().to_owned(), expires_at };
        self.mutate(|state| {
            state.cookies.insert(cookie.name().to_owned(), stored);
        })
    }

    fn cookie(&self, name: &str) -> Result<Option<String>, StorageError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .cookies
            .get(name)
            .filter(|c| c.expires_at.is_none_or(|at| at > now))
            .map(|c| c.value.clone()))
    }
}
