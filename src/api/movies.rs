use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieUpdate},
    services::ingest::{self, MovieDraft},
};

use super::AppState;

// Request/Response types

/// The canonical create contract: direct fields, plus an optional
/// `tmdbInput` catalog reference (numeric ID, catalog URL or title) that
/// enriches whichever fields were left unset.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub tmdb_input: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: Uuid,
    pub tmdb_id: Option<String>,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            tmdb_id: movie.tmdb_id,
            title: movie.title,
            description: movie.description,
            genre: movie.genre,
            poster_url: movie.poster_url,
            trailer_url: movie.trailer_url,
            created_at: movie.created_at,
        }
    }
}

// Handlers

/// List all movies, newest first
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<MovieResponse>>> {
    let movies = state.store.movies().await?;
    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

/// Create a movie, enriching unset fields from the catalog when a
/// reference was supplied
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<MovieResponse>)> {
    let draft = MovieDraft {
        title: request.title,
        genre: request.genre,
        description: request.description,
        poster: request.poster_url,
        trailer_url: request.trailer_url,
        tmdb_input: request.tmdb_input,
    };

    let new_movie = ingest::assemble_movie(state.catalog.as_ref(), draft).await?;
    let movie = state.store.create_movie(new_movie).await?;

    tracing::info!(
        movie_id = %movie.id,
        title = %movie.title,
        tmdb_id = movie.tmdb_id.as_deref().unwrap_or("-"),
        "movie created"
    );

    Ok((StatusCode::CREATED, Json(movie.into())))
}

/// Fetch a single movie
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MovieResponse>> {
    let movie = state
        .store
        .movie(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(Json(movie.into()))
}

/// Partial update: omitted fields stay unchanged; an explicit empty
/// description overwrites
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMovieRequest>,
) -> AppResult<Json<MovieResponse>> {
    let update = MovieUpdate {
        title: request.title,
        genre: request.genre,
        description: request.description,
        poster_url: request.poster_url,
        trailer_url: request.trailer_url,
    };

    if update.is_empty() {
        return Err(AppError::InvalidInput("Nothing to update".to_string()));
    }

    let movie = state
        .store
        .update_movie(id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(Json(movie.into()))
}

/// Delete a movie (its favorites cascade)
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    if state.store.delete_movie(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Movie not found".to_string()))
    }
}
