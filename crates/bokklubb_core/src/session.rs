//! Session state
//!
//! The transient authentication state of the client: a bearer token plus the cached user
//! profile. Nothing here survives a restart; the store lives exactly as long as the hosting
//! application run, the desktop analog of tab-scoped session storage.

use crate::api::types::{AuthResponse, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized user profile.
pub const USER_KEY: &str = "user";

/// Bearer token + cached user profile of the authenticated viewer.
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    #[must_use]
    #[inline]
    pub const fn new(token: String, user: User) -> Self {
        Self { token, user }
    }

    /// Builds a session from a successful login or registration response.
    #[must_use]
    #[inline]
    pub fn from_auth(auth: AuthResponse) -> Self {
        Self {
            token: auth.jwt,
            user: auth.user,
        }
    }
}

/// Explicit load/save/clear lifecycle for the session, so that views receive their session
/// context injected rather than reaching into a global.
pub trait SessionStore {
    /// Returns the current session, if both token and profile are present and readable.
    fn load(&self) -> Option<Session>;
    /// Persists token and profile under their well-known keys.
    fn save(&mut self, session: &Session);
    /// Drops token and profile. Called on logout.
    fn clear(&mut self);
}

/// Key-value store holding the session in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    #[inline]
    fn load(&self) -> Option<Session> {
        let token = self.values.get(TOKEN_KEY)?;
        let user = serde_json::from_str(self.values.get(USER_KEY)?).ok()?;
        Some(Session::new(token.clone(), user))
    }

    #[inline]
    fn save(&mut self, session: &Session) {
        self.values
            .insert(TOKEN_KEY.to_owned(), session.token.clone());
        match serde_json::to_string(&session.user) {
            Ok(user) => {
                self.values.insert(USER_KEY.to_owned(), user);
            }
            Err(err) => log::error!("Failed to serialize user profile for session store: {err}"),
        }
    }

    #[inline]
    fn clear(&mut self) {
        self.values.remove(TOKEN_KEY);
        self.values.remove(USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(
            "jwt-token".to_owned(),
            User::new(
                "u1".to_owned(),
                "astrid".to_owned(),
                "astrid@example.com".to_owned(),
            ),
        )
    }

    #[test]
    fn test_empty_store_has_no_session() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut store = MemorySessionStore::new();
        store.save(&session());
        assert_eq!(store.load(), Some(session()));
    }

    #[test]
    fn test_clear_drops_the_session() {
        let mut store = MemorySessionStore::new();
        store.save(&session());
        store.clear();
        assert_eq!(store.load(), None);
    }
}
