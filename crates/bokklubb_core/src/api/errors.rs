/// Custom error type for handling failures of calls against the remote book-club API.
/// Distinguishes "empty" from "failed": an empty collection is a regular `Ok` value and never
/// an error.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The operation requires an authenticated session but none is available.
    #[error("operation requires an authenticated session")]
    Unauthenticated,
    /// The remote API rejected the bearer token or credentials (401/403).
    #[error("remote API rejected the credentials or token")]
    Denied,
    /// The remote API answered with a non-success status outside the authorization range.
    #[error("remote API returned status {0}")]
    Status(reqwest::StatusCode),
    /// Error that occurs during the HTTP request itself, originating from `reqwest`.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body did not match the expected shape, originating from `serde_json`.
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}
