//! Integration tests driving `ApiClient` and the view models against a mock remote API.

use bokklubb_core::api::client::ApiClient;
use bokklubb_core::api::errors::ApiError;
use bokklubb_core::api::types::{RatingValue, User};
use bokklubb_core::session::{MemorySessionStore, Session, SessionStore as _};
use bokklubb_core::views::auth;
use bokklubb_core::views::catalog::CatalogView;
use bokklubb_core::views::profile::{ProfileView, SortKey};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_FILTER: &str = "filters[user][documentId][$eq]";
const BOOK_FILTER: &str = "filters[book][documentId][$eq]";

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri()).expect("client should build")
}

fn session() -> Session {
    Session::new(
        "jwt-token".to_owned(),
        User::new(
            "u1".to_owned(),
            "astrid".to_owned(),
            "astrid@example.com".to_owned(),
        ),
    )
}

fn book_json(id: &str, title: &str, author: &str) -> serde_json::Value {
    json!({
        "documentId": id,
        "title": title,
        "author": author,
        "pages": 320,
        "publicationDate": "1995-05-04",
        "image": { "url": format!("/uploads/{id}.jpg") },
    })
}

#[tokio::test]
async fn average_rating_is_rounded_to_one_decimal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "documentId": "r1", "rating": 7 },
                { "documentId": "r2", "rating": 8 },
                { "documentId": "r3", "rating": 8 },
            ]
        })))
        .mount(&server)
        .await;

    let average = client(&server)
        .average_rating("b1")
        .await
        .expect("average should be fetched");

    assert_eq!(average, 7.7);
}

#[tokio::test]
async fn book_without_ratings_averages_to_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let average = client(&server)
        .average_rating("b1")
        .await
        .expect("average should be fetched");

    assert_eq!(average, 0.0);
}

#[tokio::test]
async fn second_rating_updates_the_existing_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(USER_FILTER, "u1"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "documentId": "r1", "rating": 5 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/ratings/r1"))
        .and(body_partial_json(json!({ "data": { "rating": 9 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;

    client(&server)
        .rate_book(
            &session(),
            "b1",
            RatingValue::new(9).expect("9 is a valid rating"),
        )
        .await
        .expect("rating should be stored");
}

#[tokio::test]
async fn first_rating_creates_a_new_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(USER_FILTER, "u1"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ratings"))
        .and(body_partial_json(json!({
            "data": { "user": "u1", "book": "b1", "rating": 8 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .rate_book(
            &session(),
            "b1",
            RatingValue::new(8).expect("8 is a valid rating"),
        )
        .await
        .expect("rating should be stored");
}

#[tokio::test]
async fn catalog_renders_no_rating_books_with_zero_average() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                book_json("b1", "Hobbiten", "J. R. R. Tolkien"),
                book_json("b2", "Zebrans rand", "Anna Ek"),
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(BOOK_FILTER, "b2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "documentId": "r1", "rating": 6 },
                { "documentId": "r2", "rating": 7 },
            ]
        })))
        .mount(&server)
        .await;

    let view = CatalogView::load(&client(&server), None)
        .await
        .expect("catalog should load");

    assert_eq!(view.cards.len(), 2);
    assert_eq!(view.cards[0].average, 0.0);
    assert_eq!(view.cards[0].viewer, None);
    assert_eq!(view.cards[1].average, 6.5);
}

#[tokio::test]
async fn wishlist_add_is_refused_once_the_book_is_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [book_json("b1", "Hobbiten", "J. R. R. Tolkien")]
        })))
        .mount(&server)
        .await;
    // viewer's own rating lookup is more specific than the public average lookup
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(USER_FILTER, "u1"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .with_priority(5)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/wishlists"))
        .and(query_param(USER_FILTER, "u1"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "documentId": "w1" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/wishlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;

    let api = client(&server);
    let viewer_session = session();
    let mut view = CatalogView::load(&api, Some(&viewer_session))
        .await
        .expect("catalog should load");

    assert!(
        view.cards[0]
            .viewer
            .as_ref()
            .is_some_and(|viewer| viewer.in_wishlist)
    );

    view.add_to_wishlist(&api, &viewer_session, "b1")
        .await
        .expect("a saved book is a silent no-op");
}

#[tokio::test]
async fn wishlist_add_flips_the_card_to_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [book_json("b1", "Hobbiten", "J. R. R. Tolkien")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(USER_FILTER, "u1"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .with_priority(5)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/wishlists"))
        .and(query_param(USER_FILTER, "u1"))
        .and(query_param(BOOK_FILTER, "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/wishlists"))
        .and(body_partial_json(json!({
            "data": { "user": "u1", "book": "b1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let viewer_session = session();
    let mut view = CatalogView::load(&api, Some(&viewer_session))
        .await
        .expect("catalog should load");

    view.add_to_wishlist(&api, &viewer_session, "b1")
        .await
        .expect("add should succeed");
    assert!(
        view.cards[0]
            .viewer
            .as_ref()
            .is_some_and(|viewer| viewer.in_wishlist)
    );

    // the card now reports the book as saved, so a second add never reaches the API
    view.add_to_wishlist(&api, &viewer_session, "b1")
        .await
        .expect("second add is a local no-op");
}

#[tokio::test]
async fn login_stores_token_and_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .and(body_partial_json(json!({
            "identifier": "astrid@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jwt": "jwt-token",
            "user": {
                "documentId": "u1",
                "username": "astrid",
                "email": "astrid@example.com",
            }
        })))
        .mount(&server)
        .await;

    let mut store = MemorySessionStore::new();
    let (stored_session, banner) = auth::login(
        &client(&server),
        &mut store,
        "astrid@example.com",
        "hunter2",
    )
    .await
    .expect("login should succeed");

    assert_eq!(banner.username, "astrid");
    assert_eq!(stored_session.token, "jwt-token");
    assert_eq!(store.load(), Some(stored_session));
}

#[tokio::test]
async fn rejected_credentials_leave_the_store_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "Invalid identifier or password" }
        })))
        .mount(&server)
        .await;

    let mut store = MemorySessionStore::new();
    let result = auth::login(&client(&server), &mut store, "astrid@example.com", "wrong").await;

    assert!(matches!(result, Err(ApiError::Status(_))));
    assert_eq!(store.load(), None);
}

#[tokio::test]
async fn rejected_token_maps_to_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wishlists"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "message": "Forbidden" }
        })))
        .mount(&server)
        .await;

    let result = client(&server).user_wishlist(&session()).await;

    assert!(matches!(result, Err(ApiError::Denied)));
}

#[tokio::test]
async fn removed_wishlist_entry_survives_a_sort_reset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wishlists"))
        .and(query_param(USER_FILTER, "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "documentId": "w1", "book": book_json("b1", "Zebrans rand", "Anna Ek") },
                { "documentId": "w2", "book": book_json("b2", "Hobbiten", "J. R. R. Tolkien") },
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ratings"))
        .and(query_param(USER_FILTER, "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/wishlists/w1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let viewer_session = session();
    let mut view = ProfileView::load(&api, &viewer_session)
        .await
        .expect("profile should load");

    view.toggle_wishlist_sort(SortKey::Title);
    view.remove_wishlist_entry(&api, &viewer_session, "w1")
        .await
        .expect("removal should succeed");

    // reset to original order; the removed entry must not come back
    view.toggle_wishlist_sort(SortKey::Title);
    let ids: Vec<&str> = view
        .wishlist
        .iter()
        .map(|entry| entry.document_id.as_str())
        .collect();
    assert_eq!(ids, vec!["w2"]);
}
