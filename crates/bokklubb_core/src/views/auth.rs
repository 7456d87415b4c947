use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::session::{Session, SessionStore};
use core::time::Duration;
use serde::Serialize;

/// Delay before the webview reloads itself after a successful login or registration, so the
/// welcome notification stays readable before authenticated rendering kicks in.
pub const RELOAD_DELAY: Duration = Duration::from_secs(3);

/// Render model for the shared user-status fragment in the page header.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserBanner {
    pub username: String,
}

/// Posts credentials, persists the resulting session through the injected store, and returns
/// the session together with the header banner.
/// # Errors
/// Returns an error if the credentials are rejected or the request fails; the store is left
/// untouched in that case.
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub async fn login(
    api: &ApiClient,
    store: &mut dyn SessionStore,
    identifier: &str,
    password: &str,
) -> Result<(Session, UserBanner), ApiError> {
    let auth = api.login(identifier, password).await?;
    persist(store, Session::from_auth(auth))
}

/// Registers a new account. A successful registration logs the user straight in, identical to
/// `login` from the store's point of view.
/// # Errors
/// Returns an error if the registration is rejected or the request fails.
#[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
pub async fn register(
    api: &ApiClient,
    store: &mut dyn SessionStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(Session, UserBanner), ApiError> {
    let auth = api.register(username, email, password).await?;
    persist(store, Session::from_auth(auth))
}

/// Clears the stored session. The webview reloads afterwards to drop authenticated rendering.
#[inline]
pub fn logout(store: &mut dyn SessionStore) {
    store.clear();
    log::info!("Session cleared");
}

fn persist(
    store: &mut dyn SessionStore,
    session: Session,
) -> Result<(Session, UserBanner), ApiError> {
    store.save(&session);
    log::info!("Stored session for user {}", session.user.username);
    let banner = UserBanner {
        username: session.user.username.clone(),
    };
    Ok((session, banner))
}
