//! Organizer route group.
//!
//! POST   /api/organizer/events                    - create a draft event
//! GET    /api/organizer/events                    - list own events
//! GET    /api/organizer/events/:id                - fetch one own event
//! PUT    /api/organizer/events/:id                - update fields
//! POST   /api/organizer/events/:id/publish        - open for registration
//! POST   /api/organizer/events/:id/cancel         - cancel the event
//! POST   /api/organizer/events/:id/collaborators  - add a collaborator by email
//! DELETE /api/organizer/events/:id                - delete the event

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use serde::Deserialize;

use crate::domains::auth::require_organizer;
use crate::domains::events::{Event, EventStatus};
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/organizer/events", post(create_event).get(list_events))
        .route(
            "/api/organizer/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/organizer/events/:id/publish", post(publish_event))
        .route("/api/organizer/events/:id/cancel", post(cancel_event))
        .route(
            "/api/organizer/events/:id/collaborators",
            post(add_collaborator),
        )
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: u32,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub capacity: Option<u32>,
}

#[derive(Deserialize)]
pub struct AddCollaboratorRequest {
    pub email: String,
}

/// Fetch an event and verify the caller owns it
async fn owned_event(state: &AppState, id: Uuid, organizer_id: Uuid) -> Result<Event, ApiError> {
    let event = state.events.get(id).await.ok_or(ApiError::NotFound("event"))?;
    if event.organizer_id != organizer_id {
        return Err(ApiError::PermissionDenied(
            "only the event organizer may do this".to_string(),
        ));
    }
    Ok(event)
}

async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let user = require_organizer(&state, &headers).await?;

    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    if req.capacity == 0 {
        return Err(ApiError::BadRequest("capacity must be positive".to_string()));
    }

    let event = Event::new(
        user.id,
        req.title.trim().to_string(),
        req.description,
        req.starts_at,
        req.capacity,
    );
    tracing::info!(event_id = %event.id, organizer_id = %user.id, "event created");

    state.events.insert(event.clone()).await;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Event>>, ApiError> {
    let user = require_organizer(&state, &headers).await?;
    Ok(Json(state.events.list_by_organizer(user.id).await))
}

async fn get_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let user = require_organizer(&state, &headers).await?;
    let event = owned_event(&state, id, user.id).await?;
    Ok(Json(event))
}

async fn update_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let user = require_organizer(&state, &headers).await?;
    owned_event(&state, id, user.id).await?;

    if let Some(capacity) = req.capacity {
        if capacity == 0 {
            return Err(ApiError::BadRequest("capacity must be positive".to_string()));
        }
    }

    let updated = state
        .events
        .update(id, |event| {
            if let Some(title) = req.title {
                event.title = title.trim().to_string();
            }
            if let Some(description) = req.description {
                event.description = description;
            }
            if let Some(starts_at) = req.starts_at {
                event.starts_at = starts_at;
            }
            if let Some(capacity) = req.capacity {
                event.capacity = capacity;
            }
            event.clone()
        })
        .await
        .ok_or(ApiError::NotFound("event"))?;

    Ok(Json(updated))
}

async fn publish_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let user = require_organizer(&state, &headers).await?;
    let event = owned_event(&state, id, user.id).await?;

    if event.status == EventStatus::Cancelled {
        return Err(ApiError::Conflict(
            "a cancelled event cannot be published".to_string(),
        ));
    }

    let published = state
        .events
        .update(id, |event| {
            event.status = EventStatus::Published;
            event.clone()
        })
        .await
        .ok_or(ApiError::NotFound("event"))?;

    tracing::info!(event_id = %id, "event published");
    Ok(Json(published))
}

/// Cancel an event. Cancelled events disappear from participant
/// listings; registrations are kept for the organizer's records.
async fn cancel_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let user = require_organizer(&state, &headers).await?;
    owned_event(&state, id, user.id).await?;

    let cancelled = state
        .events
        .update(id, |event| {
            event.status = EventStatus::Cancelled;
            event.clone()
        })
        .await
        .ok_or(ApiError::NotFound("event"))?;

    tracing::info!(event_id = %id, "event cancelled");
    Ok(Json(cancelled))
}

async fn add_collaborator(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<AddCollaboratorRequest>,
) -> Result<Json<Event>, ApiError> {
    let user = require_organizer(&state, &headers).await?;
    owned_event(&state, id, user.id).await?;

    let collaborator = state
        .auth
        .user_by_email(&req.email)
        .await
        .ok_or(ApiError::NotFound("user"))?;

    if collaborator.id == user.id {
        return Err(ApiError::Conflict(
            "the organizer is already on the event".to_string(),
        ));
    }

    let updated = state
        .events
        .update(id, |event| {
            if !event.collaborators.contains(&collaborator.id) {
                event.collaborators.push(collaborator.id);
            }
            event.clone()
        })
        .await
        .ok_or(ApiError::NotFound("event"))?;

    Ok(Json(updated))
}

async fn delete_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = require_organizer(&state, &headers).await?;
    owned_event(&state, id, user.id).await?;

    state.events.remove(id).await;
    tracing::info!(event_id = %id, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}
