use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth,
    error::{AppError, AppResult},
    models::{NewUser, User},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

fn required<'a>(field: &'a Option<String>) -> Option<&'a str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let (Some(email), Some(password)) = (required(&request.email), required(&request.password))
    else {
        return Err(AppError::InvalidInput(
            "Email and password required".to_string(),
        ));
    };

    if state.store.user_by_email(email).await?.is_some() {
        return Err(AppError::InvalidInput("User already exists".to_string()));
    }

    let password_hash = auth::hash_password(password)?;
    let user = state
        .store
        .create_user(NewUser {
            email: email.to_string(),
            name: request.name.clone().filter(|n| !n.trim().is_empty()),
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Sign in with email and password; issues a session bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (required(&request.email), required(&request.password))
    else {
        return Err(AppError::InvalidInput(
            "Email and password required".to_string(),
        ));
    };

    let user = state.store.user_by_email(email).await?;
    let valid = user
        .as_ref()
        .map(|u| auth::verify_password(password, &u.password_hash))
        .unwrap_or(false);
    let Some(user) = user.filter(|_| valid) else {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };

    let token = state.sessions.issue(&user.email)?;
    Ok(Json(LoginResponse { token }))
}
