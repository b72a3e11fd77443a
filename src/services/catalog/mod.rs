//! External movie-catalog abstraction.
//!
//! Enrichment is best-effort: persistence must succeed with partial data,
//! so nothing in this module surfaces an error to the caller. Instead every
//! operation reports a [`Lookup`], which keeps "the catalog has no such
//! movie" distinguishable from "the catalog was unreachable".

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Outcome of a best-effort catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The catalog resolved a value.
    Found(T),
    /// The catalog answered, but has no such movie.
    NotFound,
    /// The catalog could not be consulted: missing credential, network
    /// failure, or a malformed response. Logged at the call site.
    Unavailable,
}

impl<T> Lookup<T> {
    /// The resolved value, if any; both negative outcomes collapse to `None`.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::Unavailable => None,
        }
    }
}

/// A movie as the external catalog describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMovie {
    /// The catalog's numeric identifier, kept as a string for storage.
    pub id: String,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    /// Genre names; populated by detail lookups only.
    pub genres: Vec<String>,
}

/// Trait for external movie-catalog providers
///
/// One production implementation exists ([`TmdbClient`]); the trait keeps
/// the enrichment seam stubbable in tests, the same way the store is.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Search the catalog by title and report the first match.
    async fn search_movie(&self, title: &str) -> Lookup<CatalogMovie>;

    /// Fetch full movie details for a known catalog ID.
    async fn movie_details(&self, id: &str) -> Lookup<CatalogMovie>;

    /// Resolve the canonical trailer watch-page URL for a catalog ID.
    async fn trailer_url(&self, id: &str) -> Lookup<String>;

    /// Build an absolute poster URL from a catalog-relative poster path.
    /// Deterministic string construction; no network involved.
    fn poster_url(&self, poster_path: &str) -> String;
}
