use crate::errors::Error;
use crate::state::{API_URL_STORE_KEY, APP_CONFIG_PATH, AppState};
use bokklubb_core::api::types::{RatingValue, User};
use bokklubb_core::session::SessionStore as _;
use bokklubb_core::views::auth::{self, UserBanner};
use bokklubb_core::views::catalog::CatalogView;
use bokklubb_core::views::profile::{ProfileView, SortKey};
use serde_json::json;
use std::time::Instant;
use tauri::{AppHandle, Emitter as _, State};
use tauri_plugin_store::StoreExt as _;
use tracing::instrument;

/// Points the client at a different API base URL and persists the choice in the config store.
#[tauri::command]
pub async fn configure_api(
    state: State<'_, AppState>,
    app: AppHandle,
    base_url: String,
) -> Result<(), Error> {
    let store = app.store(APP_CONFIG_PATH)?;
    store.set(API_URL_STORE_KEY, json!({ "value": base_url.clone() }));
    log::info!("Updated API base URL in store to {base_url}");

    state.configure_api(&base_url).await.map_err(Error::Other)?;

    Ok(())
}

/// Base URL of the configured API, used by the webview to resolve relative cover image paths.
#[tauri::command]
pub async fn api_base_url(state: State<'_, AppState>) -> Result<String, Error> {
    let api_guard = state.api.read().await;
    api_guard
        .as_ref()
        .map(|api| api.base_url().to_owned())
        .ok_or_else(|| Error::Other("API client unavailable".to_owned()))
}

/// Loads the catalog page: all books with their aggregate ratings, plus the viewer-specific
/// card state when a session is present.
#[instrument(name = "cmd.get_catalog", skip(state))]
#[tauri::command]
pub async fn get_catalog(state: State<'_, AppState>) -> Result<CatalogView, Error> {
    let t0 = Instant::now();

    let api_guard = state.api.read().await;
    let Some(api) = api_guard.as_ref() else {
        return Err(Error::Other("API client unavailable".to_owned()));
    };
    let session = state.session.read().await.load();

    let view = CatalogView::load(api, session.as_ref()).await?;

    tracing::info!(
        elapsed_ms = t0.elapsed().as_millis(),
        cards = view.cards.len(),
        authenticated = session.is_some(),
        "catalog loaded"
    );

    state.catalog.write().await.replace(view.clone());
    Ok(view)
}

/// Stores the viewer's rating for a book and returns the refreshed average.
#[instrument(name = "cmd.rate_book", skip(state), fields(book_id = %book_id))]
#[tauri::command]
pub async fn rate_book(
    state: State<'_, AppState>,
    book_id: String,
    value: u8,
) -> Result<f64, Error> {
    let value = RatingValue::new(value).map_err(|err| Error::Other(err.to_string()))?;

    let api_guard = state.api.read().await;
    let Some(api) = api_guard.as_ref() else {
        return Err(Error::Other("API client unavailable".to_owned()));
    };
    let session = state
        .session
        .read()
        .await
        .load()
        .ok_or(Error::Unauthenticated)?;

    let mut catalog = state.catalog.write().await;
    let Some(view) = catalog.as_mut() else {
        return Err(Error::Other("Catalog not loaded".to_owned()));
    };

    let average = view.rate(api, &session, &book_id, value).await?;
    tracing::info!(average, "rating stored");
    Ok(average)
}

/// Marks a book as "read later" for the viewer. A no-op when the card already reports the book
/// as saved.
#[tauri::command]
pub async fn add_to_wishlist(state: State<'_, AppState>, book_id: String) -> Result<(), Error> {
    let api_guard = state.api.read().await;
    let Some(api) = api_guard.as_ref() else {
        return Err(Error::Other("API client unavailable".to_owned()));
    };
    let session = state
        .session
        .read()
        .await
        .load()
        .ok_or(Error::Unauthenticated)?;

    let mut catalog = state.catalog.write().await;
    let Some(view) = catalog.as_mut() else {
        return Err(Error::Other("Catalog not loaded".to_owned()));
    };

    view.add_to_wishlist(api, &session, &book_id).await?;
    Ok(())
}

#[tauri::command]
pub async fn login(
    state: State<'_, AppState>,
    app: AppHandle,
    identifier: String,
    password: String,
) -> Result<UserBanner, Error> {
    let api_guard = state.api.read().await;
    let Some(api) = api_guard.as_ref() else {
        return Err(Error::Other("API client unavailable".to_owned()));
    };

    let mut store = state.session.write().await;
    let (_session, banner) = auth::login(api, &mut *store, &identifier, &password).await?;

    app.emit("session:changed", ())?;
    Ok(banner)
}

#[tauri::command]
pub async fn register(
    state: State<'_, AppState>,
    app: AppHandle,
    username: String,
    email: String,
    password: String,
) -> Result<UserBanner, Error> {
    let api_guard = state.api.read().await;
    let Some(api) = api_guard.as_ref() else {
        return Err(Error::Other("API client unavailable".to_owned()));
    };

    let mut store = state.session.write().await;
    let (_session, banner) = auth::register(api, &mut *store, &username, &email, &password).await?;

    app.emit("session:changed", ())?;
    Ok(banner)
}

#[tauri::command]
pub async fn logout(state: State<'_, AppState>, app: AppHandle) -> Result<(), Error> {
    let mut store = state.session.write().await;
    auth::logout(&mut *store);

    // authenticated page state is stale once the session is gone
    state.catalog.write().await.take();
    state.profile.write().await.take();

    app.emit("session:changed", ())?;
    Ok(())
}

/// The cached profile of the authenticated viewer, `None` when logged out. The webview uses this
/// to decide between the login controls and the welcome banner.
#[tauri::command]
pub async fn current_user(state: State<'_, AppState>) -> Result<Option<User>, Error> {
    Ok(state
        .session
        .read()
        .await
        .load()
        .map(|session| session.user))
}

/// Loads the profile page. Fails with `unauthenticated` when no session is stored, which the
/// webview turns into a hard redirect to the landing page.
#[instrument(name = "cmd.load_profile", skip(state))]
#[tauri::command]
pub async fn load_profile(state: State<'_, AppState>) -> Result<ProfileView, Error> {
    let t0 = Instant::now();

    let api_guard = state.api.read().await;
    let Some(api) = api_guard.as_ref() else {
        return Err(Error::Other("API client unavailable".to_owned()));
    };
    let session = state
        .session
        .read()
        .await
        .load()
        .ok_or(Error::Unauthenticated)?;

    let view = ProfileView::load(api, &session).await?;

    tracing::info!(
        elapsed_ms = t0.elapsed().as_millis(),
        wishlist = view.wishlist.len(),
        ratings = view.ratings.len(),
        "profile loaded"
    );

    state.profile.write().await.replace(view.clone());
    Ok(view)
}

#[tauri::command]
pub async fn sort_wishlist(
    state: State<'_, AppState>,
    key: SortKey,
) -> Result<ProfileView, Error> {
    let mut profile = state.profile.write().await;
    let Some(view) = profile.as_mut() else {
        return Err(Error::Other("Profile not loaded".to_owned()));
    };
    view.toggle_wishlist_sort(key);
    Ok(view.clone())
}

#[tauri::command]
pub async fn sort_ratings(state: State<'_, AppState>, key: SortKey) -> Result<ProfileView, Error> {
    let mut profile = state.profile.write().await;
    let Some(view) = profile.as_mut() else {
        return Err(Error::Other("Profile not loaded".to_owned()));
    };
    view.toggle_ratings_sort(key);
    Ok(view.clone())
}

/// Removes a wishlist entry. The webview asks for confirmation through the dialog plugin before
/// invoking this.
#[tauri::command]
pub async fn remove_wishlist_entry(
    state: State<'_, AppState>,
    entry_id: String,
) -> Result<ProfileView, Error> {
    let api_guard = state.api.read().await;
    let Some(api) = api_guard.as_ref() else {
        return Err(Error::Other("API client unavailable".to_owned()));
    };
    let session = state
        .session
        .read()
        .await
        .load()
        .ok_or(Error::Unauthenticated)?;

    let mut profile = state.profile.write().await;
    let Some(view) = profile.as_mut() else {
        return Err(Error::Other("Profile not loaded".to_owned()));
    };

    view.remove_wishlist_entry(api, &session, &entry_id).await?;
    log::info!("Removed wishlist entry {entry_id}");
    Ok(view.clone())
}
