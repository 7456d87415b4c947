use crate::api::errors::ApiError;
use crate::api::query::QueryBuilder;
use crate::api::types::{AuthResponse, Book, DataEnvelope, Rating, RatingValue, WishlistEntry};
use crate::session::Session;
use core::time::Duration;
use reqwest::redirect::Policy;
use reqwest::{ClientBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::json;

pub struct ApiClient {
    /// A HTTP client used to execute all requests against the book-club API
    http_client: reqwest::Client,
    /// Base URL of the remote content API, without the `/api` prefix
    base_url: String,
}

impl ApiClient {
    /// Create a new HTTP request client, to be used for all subsequent calls against the remote
    /// book-club API.
    /// # Errors
    /// Fails in case any of the reqwest `ClientBuilder` methods fail
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once per program run"
    )]
    pub fn new(base_url: &str) -> Result<Self, String> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let client = ClientBuilder::new()
            .user_agent("bokklubben-desktop/0.1")
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(25))
            .redirect(Policy::limited(10))
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(Duration::from_secs(30))
            .build();

        client
            .map(|http_client| Self {
                http_client,
                base_url: base_url.trim_end_matches('/').to_owned(),
            })
            .map_err(|err| format!("Failed to create HTTP request client for the API: {err}"))
    }

    /// Base URL the client was configured with. The webview needs it to resolve relative cover
    /// image paths.
    #[must_use]
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetches the full catalog. Public, no session required.
    /// # Errors
    /// Returns an error if the request fails or the response cannot be decoded
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_books(&self) -> Result<Vec<Book>, ApiError> {
        let url = QueryBuilder::new(self.endpoint("/api/books"))
            .populate_all()
            .build();
        let envelope: DataEnvelope<Vec<Book>> =
            self.execute(self.http_client.get(url), None).await?;
        Ok(envelope.data)
    }

    /// Posts credentials against `/auth/local`. The caller is responsible for persisting the
    /// returned token and profile.
    /// # Errors
    /// Returns an error if the credentials are rejected or the request fails
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn login(&self, identifier: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = json!({
            "identifier": identifier,
            "password": password,
        });
        self.execute(
            self.http_client
                .post(self.endpoint("/api/auth/local"))
                .json(&body),
            None,
        )
        .await
    }

    /// Registers a new account against `/auth/local/register`, returning the same token+profile
    /// shape as a login.
    /// # Errors
    /// Returns an error if the registration is rejected or the request fails
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = json!({
            "username": username,
            "email": email,
            "password": password,
        });
        self.execute(
            self.http_client
                .post(self.endpoint("/api/auth/local/register"))
                .json(&body),
            None,
        )
        .await
    }

    /// Fetches all ratings for a book and computes their mean, rounded to one decimal. A book
    /// without ratings yields `0.0`, which is not an error.
    /// # Errors
    /// Returns an error if the request fails or the response cannot be decoded
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn average_rating(&self, book_id: &str) -> Result<f64, ApiError> {
        let url = QueryBuilder::new(self.endpoint("/api/ratings"))
            .filter_eq("book", book_id)
            .build();
        let envelope: DataEnvelope<Vec<Rating>> =
            self.execute(self.http_client.get(url), None).await?;
        Ok(mean_rating(&envelope.data))
    }

    /// Looks up the viewer's own rating for a book, `None` when they have not rated it yet.
    /// # Errors
    /// Returns an error if the request fails or the token is rejected
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn user_rating(
        &self,
        session: &Session,
        book_id: &str,
    ) -> Result<Option<Rating>, ApiError> {
        let url = QueryBuilder::new(self.endpoint("/api/ratings"))
            .filter_eq("user", &session.user.document_id)
            .filter_eq("book", book_id)
            .build();
        let envelope: DataEnvelope<Vec<Rating>> = self
            .execute(self.http_client.get(url), Some(&session.token))
            .await?;
        Ok(envelope.data.into_iter().next())
    }

    /// Stores the viewer's rating for a book. Looks up the existing rating first and updates it
    /// in place, otherwise creates a new record, keeping at most one rating per (user, book)
    /// pair. The read and the write are two separate requests; under concurrent calls the last
    /// writer wins.
    /// # Errors
    /// Returns an error if either the lookup or the write fails
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn rate_book(
        &self,
        session: &Session,
        book_id: &str,
        value: RatingValue,
    ) -> Result<(), ApiError> {
        match self.user_rating(session, book_id).await? {
            Some(existing) => {
                let url = self.endpoint(&format!("/api/ratings/{}", existing.document_id));
                let body = json!({ "data": { "rating": value } });
                self.execute_unit(self.http_client.put(url).json(&body), Some(&session.token))
                    .await
            }
            None => {
                let body = json!({
                    "data": {
                        "user": session.user.document_id,
                        "book": book_id,
                        "rating": value,
                    }
                });
                self.execute_unit(
                    self.http_client
                        .post(self.endpoint("/api/ratings"))
                        .json(&body),
                    Some(&session.token),
                )
                .await
            }
        }
    }

    /// Fetches all of the viewer's ratings, with each rating's book and cover image populated.
    /// # Errors
    /// Returns an error if the request fails or the token is rejected
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn user_ratings(&self, session: &Session) -> Result<Vec<Rating>, ApiError> {
        let url = QueryBuilder::new(self.endpoint("/api/ratings"))
            .filter_eq("user", &session.user.document_id)
            .populate_nested("book", "image")
            .build();
        let envelope: DataEnvelope<Vec<Rating>> = self
            .execute(self.http_client.get(url), Some(&session.token))
            .await?;
        Ok(envelope.data)
    }

    /// Marks a book as "read later" for the viewer. No uniqueness guarantee against races; the
    /// catalog view keeps the control unreachable once the book is saved.
    /// # Errors
    /// Returns an error if the request fails or the token is rejected
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn add_to_wishlist(&self, session: &Session, book_id: &str) -> Result<(), ApiError> {
        let body = json!({
            "data": {
                "user": session.user.document_id,
                "book": book_id,
            }
        });
        self.execute_unit(
            self.http_client
                .post(self.endpoint("/api/wishlists"))
                .json(&body),
            Some(&session.token),
        )
        .await
    }

    /// Existence check for a (user, book) wishlist pair, expressed as a filtered query.
    /// # Errors
    /// Returns an error if the request fails or the token is rejected
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn wishlist_contains(
        &self,
        session: &Session,
        book_id: &str,
    ) -> Result<bool, ApiError> {
        let url = QueryBuilder::new(self.endpoint("/api/wishlists"))
            .filter_eq("user", &session.user.document_id)
            .filter_eq("book", book_id)
            .build();
        let envelope: DataEnvelope<Vec<WishlistEntry>> = self
            .execute(self.http_client.get(url), Some(&session.token))
            .await?;
        Ok(!envelope.data.is_empty())
    }

    /// Fetches the viewer's full wishlist with populated book relations.
    /// # Errors
    /// Returns an error if the request fails or the token is rejected
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn user_wishlist(&self, session: &Session) -> Result<Vec<WishlistEntry>, ApiError> {
        let url = QueryBuilder::new(self.endpoint("/api/wishlists"))
            .filter_eq("user", &session.user.document_id)
            .populate_nested("book", "image")
            .build();
        let envelope: DataEnvelope<Vec<WishlistEntry>> = self
            .execute(self.http_client.get(url), Some(&session.token))
            .await?;
        Ok(envelope.data)
    }

    /// Deletes a wishlist entry by its own identifier.
    /// # Errors
    /// Returns an error if the request fails or the token is rejected
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn remove_wishlist_entry(
        &self,
        session: &Session,
        entry_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/wishlists/{entry_id}"));
        self.execute_unit(self.http_client.delete(url), Some(&session.token))
            .await
    }

    /// Dispatches a request, attaching the bearer token when one is given, and decodes the JSON
    /// body into the expected shape.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let body = self.dispatch(request, token).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Dispatches a request whose response body carries no information the client needs.
    async fn execute_unit(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.dispatch(request, token).await.map(|_body| ())
    }

    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            log::warn!("Remote API denied the request with status {status}");
            return Err(ApiError::Denied);
        }
        if !status.is_success() {
            log::warn!("Remote API returned status {status}");
            return Err(ApiError::Status(status));
        }
        Ok(response.text().await?)
    }
}

/// Mean of all rating values, rounded to one decimal. An empty slice yields `0.0`, which the
/// views render as a "no rating" label rather than a score.
#[must_use]
#[inline]
pub fn mean_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = ratings.iter().map(|rating| u32::from(rating.rating)).sum();
    #[allow(clippy::cast_precision_loss, reason = "Rating counts stay small")]
    let mean = f64::from(sum) / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}
