use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::SessionIdentity,
    error::{AppError, AppResult},
    models::User,
};

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub movie_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub movie_id: Uuid,
}

/// Resolve the session to a user row, if any.
async fn current_user(state: &AppState, session: SessionIdentity) -> AppResult<Option<User>> {
    match session {
        SessionIdentity::Authenticated { email } => state.store.user_by_email(&email).await,
        SessionIdentity::Anonymous => Ok(None),
    }
}

async fn require_user(state: &AppState, session: SessionIdentity) -> AppResult<User> {
    current_user(state, session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))
}

/// List the session user's favorited movie ids.
///
/// Anonymous callers and sessions without a matching user row get an empty
/// list with 200, not an error.
pub async fn list(
    State(state): State<AppState>,
    session: SessionIdentity,
) -> AppResult<Json<Vec<FavoriteResponse>>> {
    let Some(user) = current_user(&state, session).await? else {
        return Ok(Json(Vec::new()));
    };

    let favorites = state.store.favorites_for_user(user.id).await?;
    Ok(Json(
        favorites
            .into_iter()
            .map(|movie_id| FavoriteResponse { movie_id })
            .collect(),
    ))
}

/// Favorite a movie for the session user. Idempotent per (user, movie) pair.
pub async fn add(
    State(state): State<AppState>,
    session: SessionIdentity,
    Json(request): Json<FavoriteRequest>,
) -> AppResult<(StatusCode, Json<FavoriteResponse>)> {
    let user = require_user(&state, session).await?;
    let movie_id = request
        .movie_id
        .ok_or_else(|| AppError::InvalidInput("movieId required".to_string()))?;

    // Check the movie up front so the caller sees 404 instead of a
    // foreign-key violation turned 500
    if state.store.movie(movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    state.store.add_favorite(user.id, movie_id).await?;
    Ok((StatusCode::CREATED, Json(FavoriteResponse { movie_id })))
}

/// Un-favorite a movie for the session user.
pub async fn remove(
    State(state): State<AppState>,
    session: SessionIdentity,
    Json(request): Json<FavoriteRequest>,
) -> AppResult<StatusCode> {
    let user = require_user(&state, session).await?;
    let movie_id = request
        .movie_id
        .ok_or_else(|| AppError::InvalidInput("movieId required".to_string()))?;

    if state.store.remove_favorite(user.id, movie_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Favorite not found".to_string()))
    }
}
