//! Persistence seam.
//!
//! The handlers talk to trait objects so the same router runs against
//! Postgres in production and the in-memory store in tests.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Movie, MovieUpdate, NewMovie, NewUser, User},
};

/// CRUD persistence for movies, keyed by internal ID.
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// Insert the assembled record, assigning id and creation timestamp.
    /// No duplicate detection: repeated ingestion produces duplicate rows.
    async fn create_movie(&self, movie: NewMovie) -> AppResult<Movie>;

    async fn movie(&self, id: Uuid) -> AppResult<Option<Movie>>;

    /// Every record, newest first.
    async fn movies(&self) -> AppResult<Vec<Movie>>;

    /// Partial update; `None` when the id is unknown.
    async fn update_movie(&self, id: Uuid, update: MovieUpdate) -> AppResult<Option<Movie>>;

    /// Remove by id; reports whether a row existed so callers can map a
    /// missing id to not-found rather than a server error.
    async fn delete_movie(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

#[async_trait::async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Record the pair; idempotent, favoriting twice neither errors nor
    /// duplicates.
    async fn add_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()>;

    /// Remove the pair; reports whether it existed.
    async fn remove_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<bool>;

    async fn favorites_for_user(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;
}

/// The full persistence surface as one trait object.
pub trait Store: MovieStore + UserStore + FavoriteStore {}

impl<T: MovieStore + UserStore + FavoriteStore> Store for T {}
