//! Participant route group.
//!
//! GET    /api/events                        - browse published events
//! GET    /api/events/:id                    - one published event
//! POST   /api/events/:id/register           - register for an event
//! DELETE /api/events/:id/register           - drop a registration
//! GET    /api/participant/registrations     - own registrations

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domains::auth::require_user;
use crate::domains::events::{Event, EventStatus};
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/:id", get(get_event))
        .route(
            "/api/events/:id/register",
            axum::routing::post(register).delete(unregister),
        )
        .route("/api/participant/registrations", get(list_registrations))
}

/// Participant-facing view of an event.
///
/// Registration lists stay private to the organizer; participants only
/// see the headcount.
#[derive(Serialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: u32,
    pub registered: usize,
    pub status: EventStatus,
    pub has_virtual_session: bool,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            starts_at: event.starts_at,
            capacity: event.capacity,
            registered: event.registrations.len(),
            status: event.status,
            has_virtual_session: event.virtual_session.is_some(),
        }
    }
}

/// Browsing is open; no session required
async fn list_events(State(state): State<AppState>) -> Json<Vec<EventSummary>> {
    let events = state.events.list_published().await;
    Json(events.iter().map(EventSummary::from).collect())
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventSummary>, ApiError> {
    let event = state.events.get(id).await.ok_or(ApiError::NotFound("event"))?;
    // Drafts and cancelled events are invisible to participants
    if event.status != EventStatus::Published {
        return Err(ApiError::NotFound("event"));
    }
    Ok(Json(EventSummary::from(&event)))
}

async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(&state, &headers).await?;
    state.events.register(id, user.id).await?;
    tracing::info!(event_id = %id, user_id = %user.id, "registration added");
    Ok(StatusCode::CREATED)
}

async fn unregister(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(&state, &headers).await?;
    state.events.unregister(id, user.id).await?;
    tracing::info!(event_id = %id, user_id = %user.id, "registration dropped");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_registrations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<EventSummary>>, ApiError> {
    let user = require_user(&state, &headers).await?;
    let events = state.events.list_registered(user.id).await;
    Ok(Json(events.iter().map(EventSummary::from).collect()))
}
