//! Auth route group.
//!
//! POST /api/auth/signup   - create an account, returns a session token
//! POST /api/auth/signin   - exchange credentials for a session token
//! POST /api/auth/logout   - invalidate the current session
//! GET  /api/auth/me       - the signed-in user

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::auth::{bearer_token, require_user, Role, User};
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    let user = state
        .auth
        .create_user(&req.email, &req.name, req.role, &req.password)
        .await
        .ok_or_else(|| ApiError::Conflict("an account with this email already exists".to_string()))?;

    tracing::info!(user_id = %user.id, role = ?user.role, "account created");

    let token = state.auth.create_session(&user).await;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user: user.into(),
        }),
    ))
}

async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = state
        .auth
        .verify_credentials(&req.email, &req.password)
        .await
        .ok_or(ApiError::InvalidCredentials)?;

    let token = state.auth.create_session(&user).await;
    tracing::debug!(user_id = %user.id, "signin");

    Ok(Json(SessionResponse {
        token,
        user: user.into(),
    }))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::AuthenticationRequired)?;
    state.auth.delete_session(token).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;
    Ok(Json(user.into()))
}
