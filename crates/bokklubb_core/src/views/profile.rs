use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::types::{Book, Rating, WishlistEntry};
use crate::session::Session;
use crate::views::sorting;
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

/// The sort controls the profile page exposes. `Rating` only applies to the ratings list;
/// wishlist entries carry no rating value.
#[derive(Serialize, Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    Author,
    Rating,
}

/// The profile page: the viewer's wishlist and ratings, each with an original-order snapshot so
/// that toggling the active sort control restores the fetch order exactly.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub wishlist: Vec<WishlistEntry>,
    pub ratings: Vec<Rating>,
    pub wishlist_sort: Option<SortKey>,
    pub ratings_sort: Option<SortKey>,
    #[serde(skip)]
    original_wishlist: Vec<WishlistEntry>,
    #[serde(skip)]
    original_ratings: Vec<Rating>,
}

impl ProfileView {
    /// Loads the viewer's wishlist and ratings and snapshots both for sort-reset.
    /// # Errors
    /// Returns an error if either fetch fails or the token is rejected.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn load(api: &ApiClient, session: &Session) -> Result<Self, ApiError> {
        let wishlist = api.user_wishlist(session).await?;
        let ratings = api.user_ratings(session).await?;
        Ok(Self::from_lists(wishlist, ratings))
    }

    fn from_lists(wishlist: Vec<WishlistEntry>, ratings: Vec<Rating>) -> Self {
        Self {
            original_wishlist: wishlist.clone(),
            original_ratings: ratings.clone(),
            wishlist,
            ratings,
            wishlist_sort: None,
            ratings_sort: None,
        }
    }

    /// Applies or toggles a sort on the wishlist. Activating the already-active key restores the
    /// original fetch order; the `Rating` key does not apply here and leaves the list unchanged.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn toggle_wishlist_sort(&mut self, key: SortKey) {
        if self.wishlist_sort == Some(key) {
            self.wishlist = self.original_wishlist.clone();
            self.wishlist_sort = None;
            return;
        }
        match key {
            SortKey::Title => self
                .wishlist
                .sort_by(|left, right| compare_books(&left.book, &right.book, |book| &book.title)),
            SortKey::Author => self.wishlist.sort_by(|left, right| {
                compare_books(&left.book, &right.book, |book| &book.author)
            }),
            SortKey::Rating => return,
        }
        self.wishlist_sort = Some(key);
    }

    /// Applies or toggles a sort on the ratings list. Title and author sort alphabetically,
    /// rating sorts by value descending. Activating the already-active key restores the original
    /// fetch order.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub fn toggle_ratings_sort(&mut self, key: SortKey) {
        if self.ratings_sort == Some(key) {
            self.ratings = self.original_ratings.clone();
            self.ratings_sort = None;
            return;
        }
        match key {
            SortKey::Title => self
                .ratings
                .sort_by(|left, right| compare_books(&left.book, &right.book, |book| &book.title)),
            SortKey::Author => self.ratings.sort_by(|left, right| {
                compare_books(&left.book, &right.book, |book| &book.author)
            }),
            SortKey::Rating => self
                .ratings
                .sort_by(|left, right| right.rating.cmp(&left.rating)),
        }
        self.ratings_sort = Some(key);
    }

    /// Deletes a wishlist entry remotely, then drops it from both the rendered list and the
    /// original-order snapshot so a later sort-reset cannot resurrect it. The confirmation step
    /// happens at the webview seam before this is called.
    /// # Errors
    /// Returns an error if the delete call fails; the local lists are left untouched then.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn remove_wishlist_entry(
        &mut self,
        api: &ApiClient,
        session: &Session,
        entry_id: &str,
    ) -> Result<(), ApiError> {
        api.remove_wishlist_entry(session, entry_id).await?;
        self.purge_entry(entry_id);
        Ok(())
    }

    fn purge_entry(&mut self, entry_id: &str) {
        self.wishlist.retain(|entry| entry.document_id != entry_id);
        self.original_wishlist
            .retain(|entry| entry.document_id != entry_id);
    }
}

/// Compares two optionally populated book relations on one of their display fields. Entries
/// whose relation the API left unpopulated sort last.
fn compare_books(
    left: &Option<Book>,
    right: &Option<Book>,
    field: fn(&Book) -> &str,
) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => sorting::compare(field(left), field(right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
