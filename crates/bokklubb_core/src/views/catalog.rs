use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::types::{Book, RatingValue};
use crate::session::Session;
use futures::future::join_all;
use serde::Serialize;

/// What the authenticated viewer sees on a card beyond the public data: their own rating and
/// whether the book is already on their wishlist.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    pub own_rating: Option<u8>,
    pub in_wishlist: bool,
}

/// One renderable catalog entry: the book itself, its aggregate rating, and the viewer-specific
/// state when a session is present. An `average` of `0.0` means "no rating yet" and renders as a
/// label instead of a score.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BookCard {
    pub book: Book,
    pub average: f64,
    pub viewer: Option<ViewerState>,
}

/// The catalog page: the full book list with one card per book.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    pub cards: Vec<BookCard>,
}

impl CatalogView {
    /// Fetches the book list and builds all cards, fanning the per-book lookups out
    /// concurrently. Card construction degrades rather than fails: a broken average or viewer
    /// lookup is logged and rendered as "no rating" or a logged-out card.
    /// # Errors
    /// Fails only if the book list itself cannot be fetched.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn load(api: &ApiClient, session: Option<&Session>) -> Result<Self, ApiError> {
        let books = api.fetch_books().await?;
        let cards = join_all(
            books
                .into_iter()
                .map(|book| Self::build_card(api, session, book)),
        )
        .await;
        Ok(Self { cards })
    }

    async fn build_card(api: &ApiClient, session: Option<&Session>, book: Book) -> BookCard {
        let average = match api.average_rating(&book.document_id).await {
            Ok(average) => average,
            Err(err) => {
                log::warn!(
                    "Failed to fetch average rating for {}: {err}",
                    book.document_id
                );
                0.0
            }
        };

        let viewer = match session {
            Some(session) => match Self::viewer_state(api, session, &book.document_id).await {
                Ok(state) => Some(state),
                Err(err) => {
                    log::warn!("Failed to fetch viewer state for {}: {err}", book.document_id);
                    None
                }
            },
            None => None,
        };

        BookCard {
            book,
            average,
            viewer,
        }
    }

    async fn viewer_state(
        api: &ApiClient,
        session: &Session,
        book_id: &str,
    ) -> Result<ViewerState, ApiError> {
        let own_rating = api.user_rating(session, book_id).await?;
        let in_wishlist = api.wishlist_contains(session, book_id).await?;
        Ok(ViewerState {
            own_rating: own_rating.map(|rating| rating.rating),
            in_wishlist,
        })
    }

    /// Submits the viewer's rating for a book, then re-fetches the aggregate and patches the
    /// card in place. Returns the new average so the webview can update the score line.
    /// # Errors
    /// Returns an error if the rating cannot be stored or the refreshed average cannot be
    /// fetched.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn rate(
        &mut self,
        api: &ApiClient,
        session: &Session,
        book_id: &str,
        value: RatingValue,
    ) -> Result<f64, ApiError> {
        api.rate_book(session, book_id, value).await?;
        let average = api.average_rating(book_id).await?;

        if let Some(card) = self.card_mut(book_id) {
            card.average = average;
            if let Some(viewer) = card.viewer.as_mut() {
                viewer.own_rating = Some(value.get());
            }
        }
        Ok(average)
    }

    /// Marks a book as "read later". A card that already reports wishlist membership is left
    /// untouched and no second add call is issued; once saved, the control stays disabled.
    /// # Errors
    /// Returns an error if the add call fails.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn add_to_wishlist(
        &mut self,
        api: &ApiClient,
        session: &Session,
        book_id: &str,
    ) -> Result<(), ApiError> {
        if self
            .card(book_id)
            .and_then(|card| card.viewer.as_ref())
            .is_some_and(|viewer| viewer.in_wishlist)
        {
            return Ok(());
        }

        api.add_to_wishlist(session, book_id).await?;
        if let Some(viewer) = self
            .card_mut(book_id)
            .and_then(|card| card.viewer.as_mut())
        {
            viewer.in_wishlist = true;
        }
        Ok(())
    }

    fn card(&self, book_id: &str) -> Option<&BookCard> {
        self.cards
            .iter()
            .find(|card| card.book.document_id == book_id)
    }

    fn card_mut(&mut self, book_id: &str) -> Option<&mut BookCard> {
        self.cards
            .iter_mut()
            .find(|card| card.book.document_id == book_id)
    }
}
