//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login
//! redirects and identity-dependent rendering. [`AuthStore`] is the single
//! source of truth within a running client; storage is a mirror that only
//! [`AuthStore::initialize`] reads back.
//!
//! ERROR HANDLING
//! ==============
//! Actions never fail. Persistence errors are logged and the in-memory state
//! stands, so a full or unavailable storage backend degrades to a session
//! that does not survive reload.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::store::{Store, SubscriptionId};
use crate::net::types::{LoginResponse, User};
use crate::storage::SessionPersistence;

/// Authentication state: the current user, token pair, and whether the
/// persisted session has been read back yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    /// True until [`AuthStore::initialize`] has run. Guards hold off while set.
    pub loading: bool,
}

impl AuthState {
    /// Signed out with nothing left to restore.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signed out, but storage has not been checked yet.
    pub fn pending() -> Self {
        Self { loading: true, ..Self::default() }
    }

    pub fn authenticated(user: User, access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            user: Some(user),
            access_token: Some(access_token),
            refresh_token,
            is_authenticated: true,
            loading: false,
        }
    }

    /// Roles of the current user, empty when anonymous.
    pub fn roles(&self) -> &[String] {
        self.user.as_ref().map(|u| u.roles.as_slice()).unwrap_or_default()
    }
}

/// Session store plus the actions that keep its storage mirror in sync.
#[derive(Clone, Debug)]
pub struct AuthStore {
    state: Store<AuthState>,
    persistence: SessionPersistence,
}

impl AuthStore {
    /// Store persisting through `persistence`, pending until
    /// [`initialize`](Self::initialize) runs.
    pub fn new(persistence: SessionPersistence) -> Self {
        Self { state: Store::new(AuthState::pending()), persistence }
    }

    pub fn get(&self) -> AuthState {
        self.state.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.get().is_authenticated
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.get().access_token
    }

    pub fn persistence(&self) -> &SessionPersistence {
        &self.persistence
    }

    /// See [`Store::subscribe`].
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Commit a successful login: user and both tokens in one write, then
    /// mirror to storage and cookies.
    pub fn login(&self, response: &LoginResponse) {
        let user = response.user();
        self.state.set(AuthState::authenticated(
            user.clone(),
            response.access_token.clone(),
            Some(response.refresh_token.clone()),
        ));
        log::debug!("auth: logged in {}", user.user_id);

        if let Err(e) = self
            .persistence
            .save_session(&user, &response.access_token, &response.refresh_token)
        {
            log::warn!("auth: failed to persist session: {e}");
        }
    }

    /// Return to the anonymous state and wipe the storage mirror.
    pub fn logout(&self) {
        self.state.set(AuthState::anonymous());
        log::debug!("auth: logged out");

        if let Err(e) = self.persistence.clear() {
            log::warn!("auth: failed to clear persisted session: {e}");
        }
    }

    /// Replace only the user; tokens and the authenticated flag are kept.
    pub fn update_user(&self, user: User) {
        if let Err(e) = self.persistence.save_user(&user) {
            log::warn!("auth: failed to persist user: {e}");
        }
        self.state.update(|state| state.user = Some(user));
    }

    /// Swap in a refreshed token pair, keeping the user.
    pub fn replace_tokens(&self, access_token: String, refresh_token: String) {
        if let Err(e) = self.persistence.save_tokens(&access_token, &refresh_token) {
            log::warn!("auth: failed to persist refreshed tokens: {e}");
        }
        self.state.update(|state| {
            state.access_token = Some(access_token);
            state.refresh_token = Some(refresh_token);
        });
    }

    /// Rehydrate from storage. Returns whether a session was restored. On a
    /// miss or a read failure only the loading flag is cleared.
    pub fn initialize(&self) -> bool {
        match self.persistence.load() {
            Ok(Some(session)) => {
                self.state.set(AuthState::authenticated(
                    session.user,
                    session.access_token,
                    session.refresh_token,
                ));
                true
            }
            Ok(None) => {
                self.finish_loading();
                false
            }
            Err(e) => {
                log::error!("auth: failed to load auth state: {e}");
                self.finish_loading();
                false
            }
        }
    }

    fn finish_loading(&self) {
        if self.state.get().loading {
            self.state.update(|state| state.loading = false);
        }
    }
}
