//! TMDB catalog provider
//!
//! Talks to the TMDB HTTP API (search-by-title, fetch-by-id, fetch-videos)
//! and extracts normalized fields. Requires an API key passed as a query
//! parameter; when the key is absent every operation degrades to
//! [`Lookup::Unavailable`] rather than failing the caller's request.

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::services::catalog::{Catalog, CatalogMovie, Lookup};

/// Poster size token; a good default for list and detail pages.
const POSTER_SIZE: &str = "w500";

/// Only entries from this host with this exact type count as trailers.
const TRAILER_SITE: &str = "YouTube";
const TRAILER_TYPE: &str = "Trailer";

pub struct TmdbClient {
    http: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_url: String,
}

impl TmdbClient {
    pub fn new(
        http: HttpClient,
        api_key: Option<String>,
        api_url: String,
        image_url: String,
    ) -> Self {
        // Warn once at startup rather than on every degraded call
        if api_key.is_none() {
            tracing::warn!("TMDB_API_KEY is not set; catalog enrichment is unavailable");
        }
        Self {
            http,
            api_key,
            api_url,
            image_url,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        api_key: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, reqwest::Error> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), path);
        self.http
            .get(url)
            .query(&[("api_key", api_key)])
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait::async_trait]
impl Catalog for TmdbClient {
    async fn search_movie(&self, title: &str) -> Lookup<CatalogMovie> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!(query = %title, "skipping TMDB search: no credential");
            return Lookup::Unavailable;
        };

        let response: Result<SearchResponse, _> = self
            .get_json(
                api_key,
                "/search/movie",
                &[("query", title), ("include_adult", "false")],
            )
            .await;

        match response {
            Ok(body) => match body.results.into_iter().next() {
                Some(movie) => Lookup::Found(movie.into()),
                None => {
                    tracing::debug!(query = %title, "TMDB search returned no results");
                    Lookup::NotFound
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, query = %title, "TMDB search failed");
                Lookup::Unavailable
            }
        }
    }

    async fn movie_details(&self, id: &str) -> Lookup<CatalogMovie> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!(tmdb_id = %id, "skipping TMDB details fetch: no credential");
            return Lookup::Unavailable;
        };

        let response: Result<TmdbMovie, _> = self
            .get_json(api_key, &format!("/movie/{}", id), &[])
            .await;

        match response {
            Ok(movie) => Lookup::Found(movie.into()),
            Err(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND) => {
                tracing::debug!(tmdb_id = %id, "TMDB has no movie with this id");
                Lookup::NotFound
            }
            Err(e) => {
                tracing::warn!(error = %e, tmdb_id = %id, "TMDB details fetch failed");
                Lookup::Unavailable
            }
        }
    }

    async fn trailer_url(&self, id: &str) -> Lookup<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!(tmdb_id = %id, "skipping TMDB videos fetch: no credential");
            return Lookup::Unavailable;
        };

        let response: Result<VideosResponse, _> = self
            .get_json(api_key, &format!("/movie/{}/videos", id), &[])
            .await;

        match response {
            Ok(body) => match pick_trailer(&body.results) {
                Some(video) => Lookup::Found(watch_url(&video.key)),
                None => {
                    tracing::debug!(tmdb_id = %id, "no trailer among TMDB videos");
                    Lookup::NotFound
                }
            },
            Err(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND) => {
                tracing::debug!(tmdb_id = %id, "TMDB has no movie with this id");
                Lookup::NotFound
            }
            Err(e) => {
                tracing::warn!(error = %e, tmdb_id = %id, "TMDB videos fetch failed");
                Lookup::Unavailable
            }
        }
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}{}",
            self.image_url.trim_end_matches('/'),
            POSTER_SIZE,
            poster_path
        )
    }
}

/// First video that is an actual trailer on the canonical host.
fn pick_trailer(videos: &[TmdbVideo]) -> Option<&TmdbVideo> {
    videos
        .iter()
        .find(|v| v.site == TRAILER_SITE && v.kind == TRAILER_TYPE)
}

/// Canonical watch-page form for a video key.
fn watch_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}

// Wire types

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: i64,
    title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    /// Present on detail responses only; search results omit it.
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

impl From<TmdbMovie> for CatalogMovie {
    fn from(movie: TmdbMovie) -> Self {
        CatalogMovie {
            id: movie.id.to_string(),
            title: movie.title,
            overview: movie.overview.filter(|o| !o.is_empty()),
            poster_path: movie.poster_path,
            genres: movie.genres.into_iter().map(|g| g.name).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
struct TmdbVideo {
    key: String,
    site: String,
    #[serde(rename = "type")]
    kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_without_credential() -> TmdbClient {
        TmdbClient::new(
            HttpClient::new(),
            None,
            "http://tmdb.local".to_string(),
            "http://images.tmdb.local".to_string(),
        )
    }

    #[tokio::test]
    async fn missing_credential_degrades_search_to_unavailable() {
        let client = client_without_credential();
        assert_eq!(client.search_movie("Dune").await, Lookup::Unavailable);
    }

    #[tokio::test]
    async fn missing_credential_degrades_details_to_unavailable() {
        let client = client_without_credential();
        assert_eq!(client.movie_details("603").await, Lookup::Unavailable);
        assert_eq!(client.trailer_url("603").await, Lookup::Unavailable);
    }

    #[test]
    fn poster_url_concatenates_base_size_and_path() {
        let client = client_without_credential();
        assert_eq!(
            client.poster_url("/abc123.jpg"),
            "http://images.tmdb.local/w500/abc123.jpg"
        );
    }

    #[test]
    fn poster_url_tolerates_trailing_slash_on_base() {
        let client = TmdbClient::new(
            HttpClient::new(),
            None,
            "http://tmdb.local".to_string(),
            "http://images.tmdb.local/".to_string(),
        );
        assert_eq!(
            client.poster_url("/abc123.jpg"),
            "http://images.tmdb.local/w500/abc123.jpg"
        );
    }

    #[test]
    fn pick_trailer_requires_exact_site_and_type() {
        let videos = vec![
            TmdbVideo {
                key: "teaser".to_string(),
                site: "YouTube".to_string(),
                kind: "Teaser".to_string(),
            },
            TmdbVideo {
                key: "vimeo".to_string(),
                site: "Vimeo".to_string(),
                kind: "Trailer".to_string(),
            },
            TmdbVideo {
                key: "m7bvnsfaNQo".to_string(),
                site: "YouTube".to_string(),
                kind: "Trailer".to_string(),
            },
        ];

        let picked = pick_trailer(&videos).expect("should find the YouTube trailer");
        assert_eq!(picked.key, "m7bvnsfaNQo");
        assert_eq!(
            watch_url(&picked.key),
            "https://www.youtube.com/watch?v=m7bvnsfaNQo"
        );
    }

    #[test]
    fn pick_trailer_yields_nothing_without_a_match() {
        let videos = vec![TmdbVideo {
            key: "x".to_string(),
            site: "YouTube".to_string(),
            kind: "Featurette".to_string(),
        }];
        assert!(pick_trailer(&videos).is_none());
        assert!(pick_trailer(&[]).is_none());
    }

    #[test]
    fn search_response_deserializes_without_genres() {
        let json = r#"{
            "results": [{
                "id": 603,
                "title": "The Matrix",
                "overview": "A computer hacker learns the truth.",
                "poster_path": "/matrix.jpg"
            }]
        }"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        let movie: CatalogMovie = body.results.into_iter().next().unwrap().into();
        assert_eq!(movie.id, "603");
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.poster_path.as_deref(), Some("/matrix.jpg"));
        assert!(movie.genres.is_empty());
    }

    #[test]
    fn details_response_carries_genre_names() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "overview": "",
            "poster_path": null,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
        }"#;

        let movie: CatalogMovie = serde_json::from_str::<TmdbMovie>(json).unwrap().into();
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        // An empty overview is treated as absent
        assert_eq!(movie.overview, None);
        assert_eq!(movie.poster_path, None);
    }
}
