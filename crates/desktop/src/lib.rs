//! `desktop`
//!
//! This crate contains everything Tauri-specific for the Bokklubben client
use crate::commands::{
    add_to_wishlist, api_base_url, configure_api, current_user, get_catalog, load_profile, login,
    logout, rate_book, register, remove_wishlist_entry, sort_ratings, sort_wishlist,
};
use crate::state::{API_URL_STORE_KEY, APP_CONFIG_PATH, AppState, DEFAULT_API_URL};
use anyhow::Error;
use tauri::Manager as _;
use tauri_plugin_log::fern::colors::ColoredLevelConfig;
use tauri_plugin_store::StoreExt as _;
#[cfg(not(debug_assertions))]
use tracing_subscriber::{EnvFilter, fmt};
/// Command module, holds every command the webview pages invoke against the remote book-club API
mod commands;
/// Error types
mod errors;
/// App state management
mod state;
use std::env;
use tauri::async_runtime;

#[allow(
    clippy::missing_inline_in_public_items,
    reason = "Executed once per run, never across crate boundaries"
)]
#[allow(
    clippy::print_stderr,
    reason = "Tracing might not be available here if run_safe() failed before its initialization"
)]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(error) = run_safe() {
        eprintln!("Failed to start Bokklubben! Error: {error}");
    }
}

/// Encapsulated run function that allows returning errors instead of always panicking on `Err` or
/// `None` variants. Note that, since `run()` is the entry point for mobile, it has to keep its
/// signature of not returning anything.
#[allow(clippy::exit, reason = "Happens in Tauri macro, cannot be avoided")]
fn run_safe() -> Result<(), Error> {
    #[cfg(not(debug_assertions))]
    {
        let subscriber = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("Unable to set global tracing subscriber");
    }
    let enable_devtools = env::var("ENABLE_DEVTOOLS")
        .map(|val| val == "true" || val == "1")
        .unwrap_or(false);
    let builder = tauri::Builder::default()
        .plugin(tauri_plugin_process::init())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(tauri_plugin_dialog::init());
    builder
        .manage(AppState::new())
        .setup(move |app| {
            let (tauri_plugin_log, max_level, logger) = tauri_plugin_log::Builder::default()
                .with_colors(ColoredLevelConfig::default())
                .level(log::LevelFilter::Info)
                .level_for("bokklubben", log::LevelFilter::Info)
                .target(tauri_plugin_log::Target::new(
                    tauri_plugin_log::TargetKind::Webview,
                ))
                .split(app.handle())?;

            #[cfg(debug_assertions)]
            {
                if enable_devtools {
                    // With debug assertions, use CrabNebula dev tools plugin
                    let mut devtools_builder = tauri_plugin_devtools::Builder::default();
                    devtools_builder.attach_logger(logger);
                    app.handle().plugin(devtools_builder.init())?;
                } else {
                    tauri_plugin_log::attach_logger(max_level, logger)?;
                }
            }
            #[cfg(not(debug_assertions))]
            {
                // Without debug assertions, use regular logger plugin
                tauri_plugin_log::attach_logger(max_level, logger)?;
            }
            app.handle().plugin(tauri_plugin_log)?;

            // Environment wins over the config store, the store over the compiled-in default
            let store = app.store(APP_CONFIG_PATH)?;
            let base_url = env::var("BOKKLUBB_API_URL").ok().or_else(|| {
                store.get(API_URL_STORE_KEY).and_then(|stored| {
                    stored
                        .get("value")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_owned)
                })
            });
            let base_url = base_url.unwrap_or_else(|| {
                log::info!("No API base URL configured, falling back to {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_owned()
            });

            let app_state = app.state::<AppState>();
            async_runtime::block_on(async {
                if let Err(err) = app_state.configure_api(&base_url).await {
                    log::error!("API client init on startup failed: {err}");
                } else {
                    log::info!("API client configured for {base_url}");
                }
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            configure_api,
            api_base_url,
            get_catalog,
            rate_book,
            add_to_wishlist,
            login,
            register,
            logout,
            current_user,
            load_profile,
            sort_wishlist,
            sort_ratings,
            remove_wishlist_entry
        ])
        .run(tauri::generate_context!())?;
    Ok(())
}
