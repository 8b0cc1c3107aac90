//! Auth domain - account registration, signin and bearer-token sessions.

pub mod routes;
pub mod session;

pub use routes::routes;
pub use session::{AuthStore, Role, Session, SessionToken, User};

use axum::http::{header, HeaderMap};

use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the signed-in user for a request, or fail with 401.
///
/// Expired sessions behave exactly like absent ones.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::AuthenticationRequired)?;
    let session = state
        .auth
        .get_session(token)
        .await
        .ok_or(ApiError::AuthenticationRequired)?;
    state
        .auth
        .user_by_id(session.user_id)
        .await
        .ok_or(ApiError::AuthenticationRequired)
}

/// Like [`require_user`], but additionally requires the organizer role.
pub async fn require_organizer(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let user = require_user(state, headers).await?;
    if user.role != Role::Organizer {
        return Err(ApiError::PermissionDenied(
            "organizer account required".to_string(),
        ));
    }
    Ok(user)
}
