use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use showspree::api::{create_router, AppState};
use showspree::auth::SessionKeys;
use showspree::services::catalog::{Catalog, CatalogMovie, Lookup, TmdbClient};
use showspree::store::MemoryStore;

/// Server wired to the in-memory store and a catalog with no credential,
/// so every enrichment lookup degrades to Unavailable without touching
/// the network.
fn test_server() -> TestServer {
    let catalog = TmdbClient::new(
        reqwest::Client::new(),
        None,
        "http://tmdb.invalid".to_string(),
        "http://images.tmdb.invalid".to_string(),
    );
    server_with_catalog(Arc::new(catalog))
}

fn server_with_catalog(catalog: Arc<dyn Catalog>) -> TestServer {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        catalog,
        SessionKeys::new("test-secret"),
    );
    TestServer::new(create_router(state)).unwrap()
}

/// Scripted catalog that answers every lookup with a fixed movie.
struct ScriptedCatalog {
    movie: CatalogMovie,
    trailer: Option<String>,
}

#[async_trait::async_trait]
impl Catalog for ScriptedCatalog {
    async fn search_movie(&self, _title: &str) -> Lookup<CatalogMovie> {
        Lookup::Found(self.movie.clone())
    }

    async fn movie_details(&self, _id: &str) -> Lookup<CatalogMovie> {
        Lookup::Found(self.movie.clone())
    }

    async fn trailer_url(&self, _id: &str) -> Lookup<String> {
        match &self.trailer {
            Some(url) => Lookup::Found(url.clone()),
            None => Lookup::NotFound,
        }
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!("http://images.test/w500{}", poster_path)
    }
}

async fn register_and_login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/auth/register")
        .json(&json!({ "email": email, "password": "hunter22" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": "hunter22" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn create_minimal_movie_fills_defaults() {
    let server = test_server();

    let response = server
        .post("/movies")
        .json(&json!({ "title": "Primer", "genre": "Sci-Fi" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["title"], "Primer");
    assert_eq!(created["genre"], "Sci-Fi");
    assert_eq!(created["description"], "");
    assert!(created["posterUrl"].is_null());
    assert!(created["trailerUrl"].is_null());
    assert!(created["tmdbId"].is_null());
    assert!(created["id"].is_string());
}

#[tokio::test]
async fn create_without_title_or_reference_is_rejected() {
    let server = test_server();

    let response = server
        .post("/movies")
        .json(&json!({ "genre": "Drama" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn listing_is_newest_first() {
    let server = test_server();

    for title in ["First", "Second", "Third"] {
        server
            .post("/movies")
            .json(&json!({ "title": title, "genre": "Test" }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server.get("/movies").await;
    response.assert_status_ok();
    let movies: Vec<serde_json::Value> = response.json();
    let titles: Vec<&str> = movies.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn get_by_id_round_trips_and_unknown_is_404() {
    let server = test_server();

    let created: serde_json::Value = server
        .post("/movies")
        .json(&json!({ "title": "Moon", "genre": "Sci-Fi" }))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server.get(&format!("/movies/{}", id)).await;
    response.assert_status_ok();
    let fetched: serde_json::Value = response.json();
    assert_eq!(fetched["title"], "Moon");

    let response = server
        .get(&format!("/movies/{}", uuid::Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_is_partial_and_empty_description_overwrites() {
    let server = test_server();

    let created: serde_json::Value = server
        .post("/movies")
        .json(&json!({
            "title": "Brick",
            "genre": "Noir",
            "description": "A high-school detective story."
        }))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    // Omitted fields stay put
    let response = server
        .put(&format!("/movies/{}", id))
        .json(&json!({ "genre": "Mystery" }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["title"], "Brick");
    assert_eq!(updated["genre"], "Mystery");
    assert_eq!(updated["description"], "A high-school detective story.");

    // An explicit empty string clears the description
    let response = server
        .put(&format!("/movies/{}", id))
        .json(&json!({ "description": "" }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["description"], "");
    assert_eq!(updated["genre"], "Mystery");
}

#[tokio::test]
async fn update_with_no_fields_is_rejected() {
    let server = test_server();

    let created: serde_json::Value = server
        .post("/movies")
        .json(&json!({ "title": "Pi", "genre": "Thriller" }))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server
        .put(&format!("/movies/{}", id))
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_unknown_movie_is_404() {
    let server = test_server();
    let response = server
        .put(&format!("/movies/{}", uuid::Uuid::new_v4()))
        .json(&json!({ "title": "Ghost" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_and_reports_missing() {
    let server = test_server();

    let created: serde_json::Value = server
        .post("/movies")
        .json(&json!({ "title": "Cube", "genre": "Horror" }))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server.delete(&format!("/movies/{}", id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    // Second delete finds nothing
    let response = server.delete(&format!("/movies/{}", id)).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server.get(&format!("/movies/{}", id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_from_reference_succeeds_without_credential() {
    // No API key: enrichment degrades, the movie is still created with
    // the resolved catalog id and the raw input as title fallback.
    let server = test_server();

    let response = server
        .post("/movies")
        .json(&json!({ "tmdbInput": "https://www.themoviedb.org/movie/603-the-matrix" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["tmdbId"], "603");
    assert_eq!(
        created["title"],
        "https://www.themoviedb.org/movie/603-the-matrix"
    );
    assert_eq!(created["genre"], "");
}

#[tokio::test]
async fn create_from_reference_enriches_unset_fields() {
    let server = server_with_catalog(Arc::new(ScriptedCatalog {
        movie: CatalogMovie {
            id: "603".to_string(),
            title: "The Matrix".to_string(),
            overview: Some("A computer hacker learns the truth.".to_string()),
            poster_path: Some("/matrix.jpg".to_string()),
            genres: vec!["Action".to_string(), "Science Fiction".to_string()],
        },
        trailer: Some("https://www.youtube.com/watch?v=m7bvnsfaNQo".to_string()),
    }));

    let response = server
        .post("/movies")
        .json(&json!({ "tmdbInput": "603" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["tmdbId"], "603");
    assert_eq!(created["title"], "The Matrix");
    assert_eq!(created["description"], "A computer hacker learns the truth.");
    assert_eq!(created["genre"], "Action, Science Fiction");
    assert_eq!(created["posterUrl"], "http://images.test/w500/matrix.jpg");
    assert_eq!(
        created["trailerUrl"],
        "https://www.youtube.com/watch?v=m7bvnsfaNQo"
    );
}

#[tokio::test]
async fn supplied_fields_win_over_enrichment() {
    let server = server_with_catalog(Arc::new(ScriptedCatalog {
        movie: CatalogMovie {
            id: "603".to_string(),
            title: "The Matrix".to_string(),
            overview: Some("Catalog overview.".to_string()),
            poster_path: None,
            genres: vec!["Action".to_string()],
        },
        trailer: None,
    }));

    let response = server
        .post("/movies")
        .json(&json!({
            "tmdbInput": "603",
            "title": "My Own Title",
            "description": "My own words."
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["title"], "My Own Title");
    assert_eq!(created["description"], "My own words.");
    assert_eq!(created["genre"], "Action");
}

#[tokio::test]
async fn register_rejects_duplicates_and_never_leaks_the_hash() {
    let server = test_server();

    let response = server
        .post("/auth/register")
        .json(&json!({ "email": "a@example.com", "password": "hunter22", "name": "Ada" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], "a@example.com");
    assert_eq!(body["name"], "Ada");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("passwordHash").is_none());

    let response = server
        .post("/auth/register")
        .json(&json!({ "email": "a@example.com", "password": "other" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_requires_email_and_password() {
    let server = test_server();
    let response = server
        .post("/auth/register")
        .json(&json!({ "email": "  ", "password": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_user() {
    let server = test_server();
    register_and_login(&server, "b@example.com").await;

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "b@example.com", "password": "wrong" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "hunter22" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_favorites_listing_is_empty() {
    let server = test_server();
    let response = server.get("/favorites").await;
    response.assert_status_ok();
    let favorites: Vec<serde_json::Value> = response.json();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn favoriting_requires_a_session() {
    let server = test_server();
    let response = server
        .post("/favorites")
        .json(&json!({ "movieId": uuid::Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn favorites_round_trip_is_idempotent() {
    let server = test_server();
    let token = register_and_login(&server, "fan@example.com").await;

    let created: serde_json::Value = server
        .post("/movies")
        .json(&json!({ "title": "Solaris", "genre": "Sci-Fi" }))
        .await
        .json();
    let movie_id = created["id"].as_str().unwrap();

    // Favoriting twice leaves a single entry
    for _ in 0..2 {
        let response = server
            .post("/favorites")
            .authorization_bearer(&token)
            .json(&json!({ "movieId": movie_id }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let response = server.get("/favorites").authorization_bearer(&token).await;
    response.assert_status_ok();
    let favorites: Vec<serde_json::Value> = response.json();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["movieId"], movie_id);
}

#[tokio::test]
async fn favoriting_unknown_movie_is_404() {
    let server = test_server();
    let token = register_and_login(&server, "fan2@example.com").await;

    let response = server
        .post("/favorites")
        .authorization_bearer(&token)
        .json(&json!({ "movieId": uuid::Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unfavoriting_removes_and_missing_is_404() {
    let server = test_server();
    let token = register_and_login(&server, "fan3@example.com").await;

    let created: serde_json::Value = server
        .post("/movies")
        .json(&json!({ "title": "Stalker", "genre": "Sci-Fi" }))
        .await
        .json();
    let movie_id = created["id"].as_str().unwrap();

    server
        .post("/favorites")
        .authorization_bearer(&token)
        .json(&json!({ "movieId": movie_id }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .delete("/favorites")
        .authorization_bearer(&token)
        .json(&json!({ "movieId": movie_id }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    // Already gone
    let response = server
        .delete("/favorites")
        .authorization_bearer(&token)
        .json(&json!({ "movieId": movie_id }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_movie_cascades_its_favorites() {
    let server = test_server();
    let token = register_and_login(&server, "fan4@example.com").await;

    let created: serde_json::Value = server
        .post("/movies")
        .json(&json!({ "title": "Sunshine", "genre": "Sci-Fi" }))
        .await
        .json();
    let movie_id = created["id"].as_str().unwrap();

    server
        .post("/favorites")
        .authorization_bearer(&token)
        .json(&json!({ "movieId": movie_id }))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .delete(&format!("/movies/{}", movie_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = server.get("/favorites").authorization_bearer(&token).await;
    response.assert_status_ok();
    let favorites: Vec<serde_json::Value> = response.json();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn garbage_bearer_token_is_treated_as_anonymous() {
    let server = test_server();
    let response = server
        .get("/favorites")
        .authorization_bearer("not-a-real-token")
        .await;
    response.assert_status_ok();
    let favorites: Vec<serde_json::Value> = response.json();
    assert!(favorites.is_empty());
}
