use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The `{ "data": ... }` envelope the remote content API wraps every collection and
/// single-resource response in.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// A catalog book. Immutable from the client's perspective; every field is owned by the remote
/// API and only mirrored here.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub document_id: String,
    pub title: String,
    pub author: String,
    pub pages: i64,
    pub publication_date: NaiveDate,
    #[serde(default)]
    pub image: Option<CoverImage>,
}

impl Book {
    #[must_use]
    #[inline]
    pub const fn new(
        document_id: String,
        title: String,
        author: String,
        pages: i64,
        publication_date: NaiveDate,
        image: Option<CoverImage>,
    ) -> Self {
        Self {
            document_id,
            title,
            author,
            pages,
            publication_date,
            image,
        }
    }
}

/// Reference to a book's cover image, relative to the API base URL.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct CoverImage {
    pub url: String,
}

impl CoverImage {
    #[must_use]
    #[inline]
    pub const fn new(url: String) -> Self {
        Self { url }
    }
}

/// A user's rating of a book. The `book` relation is only present when the query asked for it to
/// be populated.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub document_id: String,
    pub rating: u8,
    #[serde(default)]
    pub book: Option<Book>,
}

impl Rating {
    #[must_use]
    #[inline]
    pub const fn new(document_id: String, rating: u8, book: Option<Book>) -> Self {
        Self {
            document_id,
            rating,
            book,
        }
    }
}

/// A saved association marking a book as "read later" for a specific user. Existence of the
/// record is the whole signal; it carries no payload beyond its relations.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub document_id: String,
    #[serde(default)]
    pub book: Option<Book>,
}

impl WishlistEntry {
    #[must_use]
    #[inline]
    pub const fn new(document_id: String, book: Option<Book>) -> Self {
        Self { document_id, book }
    }
}

/// The remote user profile, cached client-side for the lifetime of the session.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub document_id: String,
    pub username: String,
    pub email: String,
}

impl User {
    #[must_use]
    #[inline]
    pub const fn new(document_id: String, username: String, email: String) -> Self {
        Self {
            document_id,
            username,
            email,
        }
    }
}

/// Response shape of the `/auth/local` and `/auth/local/register` endpoints.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub jwt: String,
    pub user: User,
}

/// A 1-10 integer score a user assigns to a book, validated at construction.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct RatingValue(u8);

impl RatingValue {
    /// Validates that the raw value lies in the 1-10 range the remote API expects.
    /// # Errors
    /// Fails if the value is 0 or greater than 10.
    #[inline]
    pub const fn new(value: u8) -> Result<Self, InvalidRating> {
        if value >= 1 && value <= 10 {
            Ok(Self(value))
        } else {
            Err(InvalidRating(value))
        }
    }

    #[must_use]
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, thiserror::Error)]
#[error("rating must be between 1 and 10, got {0}")]
pub struct InvalidRating(pub u8);
