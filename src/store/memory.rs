use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieUpdate, NewMovie, NewUser, User},
    store::{FavoriteStore, MovieStore, UserStore},
};

/// In-memory store with the same semantics as [`super::PgStore`], including
/// the favorite cascade on movie deletion. Backs the integration tests and
/// database-less local runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    /// Insertion order doubles as creation order, which keeps the
    /// newest-first listing deterministic even for equal timestamps.
    movies: Vec<Movie>,
    users: HashMap<String, User>,
    favorites: Vec<(Uuid, Uuid)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MovieStore for MemoryStore {
    async fn create_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let created = Movie {
            id: Uuid::new_v4(),
            tmdb_id: movie.tmdb_id,
            title: movie.title,
            description: movie.description,
            genre: movie.genre,
            poster_url: movie.poster_url,
            trailer_url: movie.trailer_url,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner.movies.push(created.clone());
        Ok(created)
    }

    async fn movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn movies(&self) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.iter().rev().cloned().collect())
    }

    async fn update_movie(&self, id: Uuid, update: MovieUpdate) -> AppResult<Option<Movie>> {
        let mut inner = self.inner.write().await;
        let Some(movie) = inner.movies.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            movie.title = title;
        }
        if let Some(genre) = update.genre {
            movie.genre = genre;
        }
        if let Some(description) = update.description {
            movie.description = description;
        }
        if let Some(poster_url) = update.poster_url {
            movie.poster_url = Some(poster_url);
        }
        if let Some(trailer_url) = update.trailer_url {
            movie.trailer_url = Some(trailer_url);
        }

        Ok(Some(movie.clone()))
    }

    async fn delete_movie(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.movies.len();
        inner.movies.retain(|m| m.id != id);
        let existed = inner.movies.len() < before;
        if existed {
            inner.favorites.retain(|(_, movie_id)| *movie_id != id);
        }
        Ok(existed)
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.email) {
            return Err(AppError::InvalidInput("User already exists".to_string()));
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            name: user.name,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        inner.users.insert(user.email, created.clone());
        Ok(created)
    }

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(email).cloned())
    }
}

#[async_trait::async_trait]
impl FavoriteStore for MemoryStore {
    async fn add_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let pair = (user_id, movie_id);
        if !inner.favorites.contains(&pair) {
            inner.favorites.push(pair);
        }
        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.favorites.len();
        inner
            .favorites
            .retain(|pair| *pair != (user_id, movie_id));
        Ok(inner.favorites.len() < before)
    }

    async fn favorites_for_user(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, movie_id)| *movie_id)
            .collect())
    }
}
