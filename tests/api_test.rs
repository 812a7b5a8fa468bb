//! API client tests
//!
//! Title search and detail lookups against a mock server: query building,
//! response validation, retries and error messages.

use std::time::{Duration, Instant};

use mockito::{Matcher, Server, ServerGuard};
use moviedex::api::{ImdbClient, MoviesClient};
use moviedex::{Config, Error};

const MATRIX_PAGE: &str = r#"{
    "page": 1,
    "per_page": 10,
    "total": 2,
    "total_pages": 1,
    "data": [
        {"Title": "The Matrix", "Year": 1999, "imdbID": "tt0133093"},
        {"Title": "The Matrix Reloaded", "Year": 2003, "imdbID": "tt0234215"}
    ]
}"#;

const MATRIX_DETAIL: &str = r#"{
    "id": "tt0133093",
    "type": "movie",
    "primaryTitle": "The Matrix",
    "originalTitle": "The Matrix",
    "primaryImage": {"url": "https://m.media-amazon.com/images/M/matrix.jpg", "width": 2100, "height": 3156},
    "startYear": 1999,
    "runtimeSeconds": 8160,
    "genres": ["Action", "Sci-Fi"],
    "rating": {"aggregateRating": 8.7, "voteCount": 2200000},
    "directors": [{"id": "nm0905154", "displayName": "Lana Wachowski"}]
}"#;

// =============================================================================
// Title Search
// =============================================================================

#[tokio::test]
async fn test_search_sends_title_and_page() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("Title".into(), "the matrix".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MATRIX_PAGE)
        .create_async()
        .await;

    let client = MoviesClient::with_base_url(server.url());
    let page = client.search_movies("the matrix", 2).await.unwrap();

    mock.assert_async().await;

    assert_eq!(page.total, 2);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].title, "The Matrix");
    assert_eq!(page.data[0].year, 1999);
    assert_eq!(page.data[1].imdb_id, "tt0234215");
    assert!(page.data.iter().all(|m| m.image_url.is_none()));
}

#[tokio::test]
async fn test_browse_all_omits_title() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Exact("page=3".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page": 3, "per_page": 10, "total": 0, "total_pages": 0, "data": []}"#)
        .create_async()
        .await;

    let client = MoviesClient::with_base_url(server.url());
    let page = client.get_all_movies(3).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.page, 3);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_search_rejects_bad_envelope() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = MoviesClient::with_base_url(server.url());
    let err = client.search_movies("matrix", 1).await.unwrap_err();

    assert!(matches!(err, Error::DataFormat(_)));
    assert_eq!(err.to_string(), "Invalid API response format");
}

#[tokio::test]
async fn test_search_rejects_foreign_ids() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"page": 1, "per_page": 10, "total": 1, "total_pages": 1,
                "data": [{"Title": "Odd", "Year": 2001, "imdbID": "nm0000001"}]}"#,
        )
        .create_async()
        .await;

    let client = MoviesClient::with_base_url(server.url());
    let err = client.search_movies("odd", 1).await.unwrap_err();
    assert!(matches!(err, Error::DataFormat(_)));
}

#[tokio::test]
async fn test_search_not_found_message() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("missing")
        .create_async()
        .await;

    let client = MoviesClient::with_base_url(server.url());
    let err = client.search_movies("nothing", 1).await.unwrap_err();

    assert_eq!(err.to_string(), "No movies found");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.body(), Some("missing"));
    assert!(err.is_not_found());
}

// =============================================================================
// Retries
// =============================================================================

#[tokio::test]
async fn test_retries_after_rate_limit() {
    let mut server = Server::new_async().await;

    // First request returns 429, second succeeds
    let mock_429 = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("Retry-After", "0")
        .expect(1)
        .create_async()
        .await;

    let mock_200 = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MATRIX_PAGE)
        .expect(1)
        .create_async()
        .await;

    let client = MoviesClient::with_base_url(server.url());
    let result = client.search_movies("matrix", 1).await;

    assert!(result.is_ok());
    mock_429.assert_async().await;
    mock_200.assert_async().await;
}

#[tokio::test]
async fn test_server_error_after_retries_exhausted() {
    let mut server = Server::new_async().await;

    // One attempt plus two retries
    let mock = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let client = MoviesClient::with_base_url(server.url()).with_retry(2, Duration::ZERO);
    let err = client.search_movies("matrix", 1).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Server error. Please try again later");
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(400)
        .expect(1)
        .create_async()
        .await;

    let client = MoviesClient::with_base_url(server.url()).with_retry(2, Duration::ZERO);
    let err = client.search_movies("matrix", 1).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Failed to search movies");
}

fn movies_client_with_timeout(server: &ServerGuard, secs: u64) -> MoviesClient {
    MoviesClient::from_config(&Config {
        movies_api_url: Some(server.url()),
        timeout_secs: Some(secs),
        ..Config::default()
    })
}

#[tokio::test]
async fn test_long_retry_after_ends_the_call() {
    let mut server = Server::new_async().await;

    let mock_429 = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("Retry-After", "12")
        .expect(1)
        .create_async()
        .await;

    let mock_200 = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(MATRIX_PAGE)
        .expect(0)
        .create_async()
        .await;

    let client = movies_client_with_timeout(&server, 2);
    let started = Instant::now();
    let err = client.search_movies("matrix", 1).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(err.status(), Some(429));
    assert_eq!(err.to_string(), "Too many requests. Please try again later");
    mock_429.assert_async().await;
    mock_200.assert_async().await;
}

#[tokio::test]
async fn test_retry_waits_count_against_the_timeout() {
    let mut server = Server::new_async().await;

    // First wait fits in the 2s budget, the second would not
    let mock = server
        .mock("GET", "/movies/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_header("Retry-After", "1")
        .expect(2)
        .create_async()
        .await;

    let client = movies_client_with_timeout(&server, 2);
    let started = Instant::now();
    let err = client.search_movies("matrix", 1).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(err.status(), Some(503));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_network_failure_has_no_status() {
    // Nothing listens on the discard port
    let client = MoviesClient::with_base_url("http://127.0.0.1:9");
    let err = client.search_movies("matrix", 1).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(err.status(), None);
    assert_eq!(err.to_string(), Error::NETWORK_MESSAGE);
}

// =============================================================================
// Details
// =============================================================================

#[tokio::test]
async fn test_movie_details_parses_record() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/titles/tt0133093")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MATRIX_DETAIL)
        .create_async()
        .await;

    let client = ImdbClient::with_base_url(server.url());
    let detail = client.movie_details("tt0133093").await.unwrap();

    mock.assert_async().await;

    assert_eq!(detail.id, "tt0133093");
    assert_eq!(detail.display_title(), Some("The Matrix"));
    assert_eq!(detail.release_year(), Some(1999));
    assert_eq!(
        detail.image_url(),
        Some("https://m.media-amazon.com/images/M/matrix.jpg")
    );
    assert_eq!(detail.runtime_minutes(), Some(136));
}

#[tokio::test]
async fn test_invalid_id_makes_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = ImdbClient::with_base_url(server.url());
    let err = client.movie_details("tt123").await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_in_band_error_message_is_not_found() {
    let mut server = Server::new_async().await;

    let body = r#"{"id": "tt9999999", "errorMessage": "Title not found"}"#;
    let _mock = server
        .mock("GET", "/titles/tt9999999")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = ImdbClient::with_base_url(server.url());
    let err = client.movie_details("tt9999999").await.unwrap_err();

    assert_eq!(err.to_string(), "Title not found");
    assert!(err.is_not_found());
    assert_eq!(err.body(), Some(body));
}

#[tokio::test]
async fn test_detail_not_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/titles/tt0133093")
        .with_status(200)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let client = ImdbClient::with_base_url(server.url());
    let err = client.movie_details("tt0133093").await.unwrap_err();

    assert!(matches!(err, Error::DataFormat(_)));
    assert_eq!(err.to_string(), "Invalid movie data received");
}

#[tokio::test]
async fn test_detail_not_found_status() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/titles/tt0000404")
        .with_status(404)
        .create_async()
        .await;

    let client = ImdbClient::with_base_url(server.url());
    let err = client.movie_details("tt0000404").await.unwrap_err();

    assert_eq!(err.to_string(), "Movie not found");
    assert!(err.is_not_found());
    assert_eq!(err.body(), None);
}

#[tokio::test]
async fn test_multiple_details_keeps_positions() {
    let mut server = Server::new_async().await;

    let _ok = server
        .mock("GET", "/titles/tt0133093")
        .with_status(200)
        .with_body(MATRIX_DETAIL)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/titles/tt0234215")
        .with_status(404)
        .create_async()
        .await;

    let client = ImdbClient::with_base_url(server.url());
    let ids = vec!["tt0234215".to_string(), "tt0133093".to_string(), "bad".to_string()];
    let details = client.multiple_movie_details(&ids).await;

    assert_eq!(details.len(), 3);
    assert!(details[0].is_none());
    assert_eq!(details[1].as_ref().map(|d| d.id.as_str()), Some("tt0133093"));
    assert!(details[2].is_none());
}
