use bokklubb_core::api::client::ApiClient;
use bokklubb_core::session::MemorySessionStore;
use bokklubb_core::views::catalog::CatalogView;
use bokklubb_core::views::profile::ProfileView;
use tokio::sync::RwLock;

pub const APP_CONFIG_PATH: &str = "bokklubben-config.json";
pub const API_URL_STORE_KEY: &str = "api-base-url";
pub const DEFAULT_API_URL: &str = "http://localhost:1337";

pub struct AppState {
    pub api: RwLock<Option<ApiClient>>,
    pub session: RwLock<MemorySessionStore>,
    pub catalog: RwLock<Option<CatalogView>>,
    pub profile: RwLock<Option<ProfileView>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api: RwLock::new(None),
            session: RwLock::new(MemorySessionStore::new()),
            catalog: RwLock::new(None),
            profile: RwLock::new(None),
        }
    }

    pub async fn configure_api(&self, base_url: &str) -> Result<(), String> {
        log::info!("Creating API client for {base_url}");
        let client = ApiClient::new(base_url)?;

        let mut guard = self.api.write().await;
        // guard.replace(client) puts the client into Option<ApiClient> and returns the contained
        // value if there was one
        if guard.replace(client).is_some() {
            log::info!("Replaced previously configured API client");
        }

        Ok(())
    }
}
