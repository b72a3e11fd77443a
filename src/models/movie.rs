use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A persisted movie record.
///
/// `title` and `genre` are always present (genre may be the empty string);
/// every other field besides `id` and `created_at` is optional. Identity
/// never changes; all other fields are mutable via partial update.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Movie {
    pub id: Uuid,
    pub tmdb_id: Option<String>,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A fully assembled record ready for insertion.
///
/// The ingestion service produces this; the store only assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, Default)]
pub struct NewMovie {
    pub tmdb_id: Option<String>,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
}

/// Partial update: `None` means "leave unchanged". An explicit empty
/// description is a valid overwrite, distinct from omission.
#[derive(Debug, Clone, Default)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
}

impl MovieUpdate {
    /// True when every field is omitted, i.e. there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.genre.is_none()
            && self.description.is_none()
            && self.poster_url.is_none()
            && self.trailer_url.is_none()
    }
}
