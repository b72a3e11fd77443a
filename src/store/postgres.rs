use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieUpdate, NewMovie, NewUser, User},
    store::{FavoriteStore, MovieStore, UserStore},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed store. Row-level atomicity comes from the database; no
/// multi-row transaction spans a request.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MovieStore for PgStore {
    async fn create_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let created = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (id, tmdb_id, title, description, genre, poster_url, trailer_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, tmdb_id, title, description, genre, poster_url, trailer_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&movie.tmdb_id)
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(&movie.genre)
        .bind(&movie.poster_url)
        .bind(&movie.trailer_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, tmdb_id, title, description, genre, poster_url, trailer_url, created_at
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }

    async fn movies(&self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, tmdb_id, title, description, genre, poster_url, trailer_url, created_at
            FROM movies
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn update_movie(&self, id: Uuid, update: MovieUpdate) -> AppResult<Option<Movie>> {
        // COALESCE keeps omitted (NULL-bound) fields unchanged while an
        // explicitly bound empty string overwrites.
        let updated = sqlx::query_as::<_, Movie>(
            r#"
            UPDATE movies SET
                title = COALESCE($2, title),
                genre = COALESCE($3, genre),
                description = COALESCE($4, description),
                poster_url = COALESCE($5, poster_url),
                trailer_url = COALESCE($6, trailer_url)
            WHERE id = $1
            RETURNING id, tmdb_id, title, description, genre, poster_url, trailer_url, created_at
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.genre)
        .bind(&update.description)
        .bind(&update.poster_url)
        .bind(&update.trailer_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_movie(&self, id: Uuid) -> AppResult<bool> {
        // Favorites cascade via the schema's ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // Two concurrent registrations can race past the existence
            // check; surface the loser as a validation error, not a 500.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::InvalidInput("User already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(created)
    }

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait::async_trait]
impl FavoriteStore for PgStore {
    async fn add_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, movie_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, movie_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn favorites_for_user(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let movie_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT movie_id
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movie_ids)
    }
}
