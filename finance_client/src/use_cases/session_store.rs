use std::sync::Arc;

use crate::domain::ports::{KeyValueStore, Navigator};
use crate::domain::session::{Route, Session, TOKEN_KEY, USER_EMAIL_KEY, USER_NAME_KEY};

/// Single source of truth for the bearer token and cached user identity.
///
/// Cloning shares the same underlying storage and navigator.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { storage, navigator }
    }

    /// Persists all three fields, overwriting any existing session. The token is not validated.
    pub fn set_session(&self, token: &str, email: &str, name: &str) {
        self.storage.set(TOKEN_KEY, token);
        self.storage.set(USER_EMAIL_KEY, email);
        self.storage.set(USER_NAME_KEY, name);
        tracing::debug!(email = %email, "session stored");
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Presence check only; says nothing about validity or expiry.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn current(&self) -> Option<Session> {
        let token = self.token()?;
        Some(Session {
            token,
            user_email: self.storage.get(USER_EMAIL_KEY).unwrap_or_default(),
            user_name: self.storage.get(USER_NAME_KEY).unwrap_or_default(),
        })
    }

    pub fn clear_session(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_EMAIL_KEY);
        self.storage.remove(USER_NAME_KEY);
    }

    /// Explicit logout: clear and return to the landing page.
    pub fn logout(&self) {
        self.clear_session();
        tracing::info!("logged out");
        self.navigator.navigate(Route::Landing);
    }

    /// Unrecoverable auth failure: clear and send the user to the login page.
    pub fn expire(&self) {
        self.clear_session();
        tracing::info!("session cleared, redirecting to login");
        self.navigator.navigate(Route::Login);
    }

    pub(crate) fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }
}
