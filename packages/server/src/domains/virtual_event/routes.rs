//! Virtual event route group.
//!
//! PUT  /api/events/:id/virtual       - attach or replace the session (organizer)
//! GET  /api/events/:id/virtual       - fetch the session
//! POST /api/events/:id/virtual/join  - record a participant joining

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domains::auth::{require_organizer, require_user};
use crate::domains::events::VirtualSession;
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/events/:id/virtual",
            put(attach_session).get(get_session),
        )
        .route("/api/events/:id/virtual/join", post(join_session))
}

#[derive(Deserialize)]
pub struct AttachSessionRequest {
    pub join_url: String,
    pub platform: String,
}

#[derive(Serialize)]
pub struct JoinResponse {
    pub join_url: String,
    pub attendance: u32,
}

async fn attach_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
    Json(req): Json<AttachSessionRequest>,
) -> Result<Json<VirtualSession>, ApiError> {
    let user = require_organizer(&state, &headers).await?;

    let join_url = Url::parse(&req.join_url)
        .map_err(|_| ApiError::BadRequest("join_url must be a valid URL".to_string()))?;
    if join_url.scheme() != "http" && join_url.scheme() != "https" {
        return Err(ApiError::BadRequest(
            "join_url must be an http(s) URL".to_string(),
        ));
    }
    if req.platform.trim().is_empty() {
        return Err(ApiError::BadRequest("platform is required".to_string()));
    }

    let event = state
        .events
        .get(event_id)
        .await
        .ok_or(ApiError::NotFound("event"))?;
    if event.organizer_id != user.id {
        return Err(ApiError::PermissionDenied(
            "only the event organizer may attach a virtual session".to_string(),
        ));
    }

    let session = VirtualSession {
        join_url: join_url.to_string(),
        platform: req.platform.trim().to_string(),
        attendance: 0,
        created_at: Utc::now(),
    };

    let attached = state
        .events
        .update(event_id, |event| {
            event.virtual_session = Some(session.clone());
            session.clone()
        })
        .await
        .ok_or(ApiError::NotFound("event"))?;

    tracing::info!(event_id = %event_id, platform = %attached.platform, "virtual session attached");
    Ok(Json(attached))
}

async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
) -> Result<Json<VirtualSession>, ApiError> {
    let user = require_user(&state, &headers).await?;

    let event = state
        .events
        .get(event_id)
        .await
        .ok_or(ApiError::NotFound("event"))?;

    // Visible to the event team and to registered participants
    if !event.is_collaborator(user.id) && !event.is_registered(user.id) {
        return Err(ApiError::PermissionDenied(
            "register for the event to see its virtual session".to_string(),
        ));
    }

    let session = event
        .virtual_session
        .ok_or(ApiError::NotFound("virtual session"))?;
    Ok(Json(session))
}

async fn join_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
) -> Result<(StatusCode, Json<JoinResponse>), ApiError> {
    let user = require_user(&state, &headers).await?;

    let event = state
        .events
        .get(event_id)
        .await
        .ok_or(ApiError::NotFound("event"))?;
    if !event.is_collaborator(user.id) && !event.is_registered(user.id) {
        return Err(ApiError::PermissionDenied(
            "register for the event before joining".to_string(),
        ));
    }

    let joined = state
        .events
        .update(event_id, |event| {
            let session = event.virtual_session.as_mut()?;
            session.attendance += 1;
            Some(JoinResponse {
                join_url: session.join_url.clone(),
                attendance: session.attendance,
            })
        })
        .await
        .ok_or(ApiError::NotFound("event"))?
        .ok_or(ApiError::NotFound("virtual session"))?;

    tracing::debug!(event_id = %event_id, user_id = %user.id, "participant joined virtual session");
    Ok((StatusCode::OK, Json(joined)))
}
