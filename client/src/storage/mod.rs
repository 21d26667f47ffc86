//! Persisted mirror of the auth session: key/value storage plus cookies.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth store is authoritative while the process runs. Storage is only
//! read back by `AuthStore::initialize` to rehydrate after a reload, which
//! bridges server-rendered markup (no access to local storage) and the
//! client runtime.
//!
//! TRADE-OFFS
//! ==========
//! Local storage and cookie writes are independent and not transactional; a
//! crash between them leaves the two out of sync until the next login or
//! logout rewrites both.


pub mod cookies;
pub mod memory;

#[cfg(feature = "hydrate")]
pub mod browser;

use std::sync::Arc;

use ::cookie::Cookie;

use crate::net::types::User;

pub const USER_KEY: &str = "user";
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const USER_COOKIE: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store does not exist in this environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backing store rejected the operation.
    #[error("storage operation failed: {0}")]
    Backend(String),

    /// A stored value could not be decoded.
    #[error("corrupt value for {key}: {reason}")]
    Corrupt { key: &'static str, reason: String },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key/value store with `localStorage` semantics.
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backing store is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns an error if the write is rejected.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unavailable.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Cookie sink with `document.cookie` semantics: setting an expired cookie
/// deletes it.
pub trait CookieJar: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the cookie could not be written.
    fn set_cookie(&self, cookie: Cookie<'static>) -> Result<(), StorageError>;

    /// Decoded value of a live cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the jar cannot be read.
    fn cookie(&self, name: &str) -> Result<Option<String>, StorageError>;
}

/// Session fields recovered from storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Writes and reads the session mirror across both backends.
#[derive(Clone)]
pub struct SessionPersistence {
    local: Arc<dyn KeyValueStore>,
    cookies: Arc<dyn CookieJar>,
}

impl std::fmt::Debug for SessionPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPersistence").finish_non_exhaustive()
    }
}

impl SessionPersistence {
    pub fn new(local: Arc<dyn KeyValueStore>, cookies: Arc<dyn CookieJar>) -> Self {
        Self { local, cookies }
    }

    /// Process-local persistence; used for SSR and tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(memory::MemoryStorage::default()), Arc::new(memory::MemoryCookieJar::default()))
    }

    /// `localStorage` + `document.cookie`.
    #[cfg(feature = "hydrate")]
    pub fn browser() -> Self {
        Self::new(Arc::new(browser::LocalStorage), Arc::new(browser::DocumentCookies))
    }

    pub fn local(&self) -> &dyn KeyValueStore {
        self.local.as_ref()
    }

    pub fn cookies(&self) -> &dyn CookieJar {
        self.cookies.as_ref()
    }

    /// Mirror a fresh login: three storage keys, then two cookies.
    ///
    /// # Errors
    ///
    /// Stops at the first failed write.
    pub fn save_session(&self, user: &User, access_token: &str, refresh_token: &str) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.local.set(USER_KEY, &user_json)?;
        self.local.set(ACCESS_TOKEN_KEY, access_token)?;
        self.local.set(REFRESH_TOKEN_KEY, refresh_token)?;
        self.cookies
            .set_cookie(cookies::session_cookie(ACCESS_TOKEN_COOKIE, access_token.to_owned()))?;
        self.cookies.set_cookie(cookies::session_cookie(USER_COOKIE, user_json))?;
        Ok(())
    }

    /// Re-persist the user only. Cookies are left as written at login.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.local.set(USER_KEY, &user_json)
    }

    /// Replace the stored token pair and the access-token cookie.
    ///
    /// # Errors
    ///
    /// Stops at the first failed write.
    pub fn save_tokens(&self, access_token: &str, refresh_token: &str) -> Result<(), StorageError> {
        self.local.set(ACCESS_TOKEN_KEY, access_token)?;
        self.local.set(REFRESH_TOKEN_KEY, refresh_token)?;
        self.cookies
            .set_cookie(cookies::session_cookie(ACCESS_TOKEN_COOKIE, access_token.to_owned()))
    }

    /// Remove every session key and expire both cookies.
    ///
    /// # Errors
    ///
    /// Every removal is attempted; the first failure is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let results = [
            self.local.remove(USER_KEY),
            self.local.remove(ACCESS_TOKEN_KEY),
            self.local.remove(REFRESH_TOKEN_KEY),
            self.cookies.set_cookie(cookies::removal_cookie(ACCESS_TOKEN_COOKIE)),
            self.cookies.set_cookie(cookies::removal_cookie(USER_COOKIE)),
        ];
        results.into_iter().collect()
    }

    /// Read the session back. `None` unless both user and access token exist;
    /// an empty stored value counts as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if storage is unreadable or the stored user is not
    /// valid JSON.
    pub fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        let (Some(user_json), Some(access_token)) = (self.non_empty(USER_KEY)?, self.non_empty(ACCESS_TOKEN_KEY)?) else {
            return Ok(None);
        };
        let user = serde_json::from_str::<User>(&user_json)
            .map_err(|e| StorageError::Corrupt { key: USER_KEY, reason: e.to_string() })?;
        let refresh_token = self.non_empty(REFRESH_TOKEN_KEY)?;
        Ok(Some(PersistedSession { user, access_token, refresh_token }))
    }

    fn non_empty(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.local.get(key)?.filter(|v| !v.is_empty()))
    }
}
