use super::*;
use crate::storage::memory::{MemoryCookieJar, MemoryStorage};
use crate::storage::{ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_KEY, KeyValueStore, REFRESH_TOKEN_KEY, USER_COOKIE, USER_KEY};
use std::sync::{Arc, Mutex};

// =============================================================
// Helpers
// =============================================================

fn make_login() -> LoginResponse {
    LoginResponse {
        user_id: "u-1".to_owned(),
        email: "ada@sia.local".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        roles: vec!["teacher".to_owned(), "admin".to_owned()],
        access_token: "acc-1".to_owned(),
        refresh_token: "ref-1".to_owned(),
        expires_in: "15m".to_owned(),
    }
}

fn make_store() -> (AuthStore, Arc<MemoryStorage>, Arc<MemoryCookieJar>) {
    let local = Arc::new(MemoryStorage::default());
    let jar = Arc::new(MemoryCookieJar::default());
    let store = AuthStore::new(SessionPersistence::new(local.clone(), jar.clone()));
    (store, local, jar)
}

// =============================================================
// AuthState
// =============================================================

#[test]
fn auth_state_default_is_anonymous() {
    let state = AuthState::default();
    assert!(state.user.is_none());
    assert!(state.access_token.is_none());
    assert!(state.refresh_token.is_none());
    assert!(!state.is_authenticated);
    assert_eq!(state, AuthState::anonymous());
}

#[test]
fn pending_state_is_loading_and_signed_out() {
    let state = AuthState::pending();
    assert!(state.loading);
    assert!(!state.is_authenticated);
    assert_ne!(state, AuthState::anonymous());
}

#[test]
fn auth_state_roles_empty_when_anonymous() {
    assert!(AuthState::anonymous().roles().is_empty());
}

// =============================================================
// login
// =============================================================

#[test]
fn login_sets_authenticated_state_with_both_tokens() {
    let (store, _, _) = make_store();
    store.login(&make_login());

    let state = store.get();
    assert!(state.is_authenticated);
    assert_eq!(state.access_token.as_deref(), Some("acc-1"));
    assert_eq!(state.refresh_token.as_deref(), Some("ref-1"));
    assert_eq!(state.user.unwrap().first_name, "Ada");
}

#[test]
fn login_persists_storage_and_cookies() {
    let (store, local, jar) = make_store();
    store.login(&make_login());

    assert_eq!(local.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("acc-1"));
    assert_eq!(local.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("ref-1"));
    let stored_user: User = serde_json::from_str(&local.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored_user, make_login().user());
    assert!(jar.get(ACCESS_TOKEN_COOKIE).is_some());
    assert!(jar.get(USER_COOKIE).is_some());
}

#[test]
fn login_replaces_existing_session() {
    let (store, _, _) = make_store();
    store.login(&make_login());
    let mut second = make_login();
    second.user_id = "u-2".to_owned();
    second.access_token = "acc-2".to_owned();
    second.refresh_token = "ref-2".to_owned();
    store.login(&second);

    let state = store.get();
    assert_eq!(state.user.unwrap().user_id, "u-2");
    assert_eq!(state.access_token.as_deref(), Some("acc-2"));
    assert_eq!(state.refresh_token.as_deref(), Some("ref-2"));
}

#[test]
fn login_notifies_subscribers_once_with_full_state() {
    let (store, _, _) = make_store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |s: &AuthState| sink.lock().unwrap().push(s.clone()));
    store.login(&make_login());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(!seen[0].is_authenticated);
    assert!(seen[1].is_authenticated);
    assert!(seen[1].access_token.is_some() && seen[1].refresh_token.is_some());
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_restores_initial_state_and_clears_storage() {
    let (store, local, jar) = make_store();
    store.login(&make_login());
    store.logout();

    assert_eq!(store.get(), AuthState::anonymous());
    assert!(local.get(USER_KEY).unwrap().is_none());
    assert!(local.get(ACCESS_TOKEN_KEY).unwrap().is_none());
    assert!(local.get(REFRESH_TOKEN_KEY).unwrap().is_none());
    assert!(jar.names().is_empty());
}

#[test]
fn logout_from_anonymous_is_harmless() {
    let (store, local, _) = make_store();
    store.logout();
    assert_eq!(store.get(), AuthState::anonymous());
    assert!(local.is_empty());
}

// =============================================================
// update_user / replace_tokens
// =============================================================

#[test]
fn update_user_keeps_tokens() {
    let (store, local, _) = make_store();
    store.login(&make_login());
    let mut user = make_login().user();
    user.first_name = "Augusta".to_owned();
    user.avatar_url = Some("https://cdn.sia.local/a.png".to_owned());
    store.update_user(user.clone());

    let state = store.get();
    assert_eq!(state.user.as_ref(), Some(&user));
    assert_eq!(state.access_token.as_deref(), Some("acc-1"));
    assert!(state.is_authenticated);
    let stored: User = serde_json::from_str(&local.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.first_name, "Augusta");
}

#[test]
fn replace_tokens_swaps_pair_and_keeps_user() {
    let (store, local, jar) = make_store();
    store.login(&make_login());
    store.replace_tokens("acc-2".to_owned(), "ref-2".to_owned());

    let state = store.get();
    assert_eq!(state.access_token.as_deref(), Some("acc-2"));
    assert_eq!(state.refresh_token.as_deref(), Some("ref-2"));
    assert_eq!(state.user.unwrap().user_id, "u-1");
    assert_eq!(local.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("ref-2"));
    assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().value(), "acc-2");
}

// =============================================================
// initialize
// =============================================================

#[test]
fn new_store_is_pending_until_initialized() {
    let (store, _, _) = make_store();
    assert_eq!(store.get(), AuthState::pending());
    assert!(!store.is_authenticated());
}

#[test]
fn login_before_initialize_clears_loading() {
    let (store, _, _) = make_store();
    store.login(&make_login());
    assert!(!store.get().loading);
}

#[test]
fn initialize_restores_persisted_session() {
    let local = Arc::new(MemoryStorage::default());
    let jar = Arc::new(MemoryCookieJar::default());
    let first = AuthStore::new(SessionPersistence::new(local.clone(), jar.clone()));
    first.login(&make_login());

    let reloaded = AuthStore::new(SessionPersistence::new(local, jar));
    assert!(reloaded.initialize());
    assert_eq!(reloaded.get(), first.get());
}

#[test]
fn initialize_with_empty_storage_stays_anonymous() {
    let (store, _, _) = make_store();
    assert!(!store.initialize());
    assert_eq!(store.get(), AuthState::anonymous());
}

#[test]
fn initialize_ignores_corrupt_user() {
    let (store, local, _) = make_store();
    local.set(USER_KEY, "not-json").unwrap();
    local.set(ACCESS_TOKEN_KEY, "acc").unwrap();
    assert!(!store.initialize());
    assert!(!store.is_authenticated());
}

#[test]
fn initialize_without_refresh_token_is_still_authenticated() {
    let (store, local, _) = make_store();
    local.set(USER_KEY, &serde_json::to_string(&make_login().user()).unwrap()).unwrap();
    local.set(ACCESS_TOKEN_KEY, "acc").unwrap();
    assert!(store.initialize());
    let state = store.get();
    assert!(state.is_authenticated);
    assert_eq!(state.refresh_token, None);
    assert_eq!(store.access_token().as_deref(), Some("acc"));
}

#[test]
fn initialize_ignores_emptied_access_token() {
    let (store, local, _) = make_store();
    store.login(&make_login());
    local.set(ACCESS_TOKEN_KEY, "").unwrap();

    let reloaded = AuthStore::new(store.persistence().clone());
    assert!(!reloaded.initialize());
    assert_eq!(reloaded.get(), AuthState::anonymous());
}

#[test]
fn initialize_clears_loading_when_storage_fails() {
    let jar = Arc::new(MemoryCookieJar::default());
    let store = AuthStore::new(SessionPersistence::new(Arc::new(UnreadableStorage), jar));
    assert!(!store.initialize());
    assert_eq!(store.get(), AuthState::anonymous());
}

/// Storage whose reads always fail.
struct UnreadableStorage;

impl KeyValueStore for UnreadableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, crate::storage::StorageError> {
        Err(crate::storage::StorageError::Unavailable("locked".to_owned()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), crate::storage::StorageError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), crate::storage::StorageError> {
        Ok(())
    }
}
