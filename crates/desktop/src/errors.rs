/// The Bokklubben command error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error variant arising from failing to access the store from `tauri_plugin_store`
    #[error("Failed to open key-value config")]
    StoreAccess(#[from] tauri_plugin_store::Error),
    /// Generic Tauri error variant
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),
    /// A protected command was invoked without a stored session. The webview maps this message
    /// to a redirect to the landing page.
    #[error("unauthenticated")]
    Unauthenticated,
    /// Error variant for failures of the remote book-club API
    #[error(transparent)]
    Api(#[from] bokklubb_core::api::errors::ApiError),
    /// Wildcard error for everything else
    #[error("{0}")]
    Other(String),
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
