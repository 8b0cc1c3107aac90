//! Collaboration route group.
//!
//! POST /api/events/:id/tasks           - add a task to the board
//! GET  /api/events/:id/tasks           - list the board
//! PUT  /api/events/:id/tasks/:task_id  - update title/assignee/status

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::domains::auth::require_user;
use crate::domains::events::{Task, TaskStatus};
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/events/:id/tasks", get(list_tasks).post(create_task))
        .route("/api/events/:id/tasks/:task_id", put(update_task))
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub assignee: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Verify the caller may touch the event's board
async fn require_board_access(
    state: &AppState,
    headers: &HeaderMap,
    event_id: Uuid,
) -> Result<Uuid, ApiError> {
    let user = require_user(state, headers).await?;
    let event = state
        .events
        .get(event_id)
        .await
        .ok_or(ApiError::NotFound("event"))?;
    if !event.is_collaborator(user.id) {
        return Err(ApiError::PermissionDenied(
            "only the organizer and collaborators may access the task board".to_string(),
        ));
    }
    Ok(user.id)
}

async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    require_board_access(&state, &headers, event_id).await?;

    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("task title is required".to_string()));
    }

    let task = Task {
        id: Uuid::new_v4(),
        title: req.title.trim().to_string(),
        assignee: req.assignee,
        status: TaskStatus::Todo,
        created_at: Utc::now(),
    };

    let created = state
        .events
        .update(event_id, |event| {
            event.tasks.push(task.clone());
            task.clone()
        })
        .await
        .ok_or(ApiError::NotFound("event"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, ApiError> {
    require_board_access(&state, &headers, event_id).await?;
    let event = state
        .events
        .get(event_id)
        .await
        .ok_or(ApiError::NotFound("event"))?;
    Ok(Json(event.tasks))
}

async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((event_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    require_board_access(&state, &headers, event_id).await?;

    let updated = state
        .events
        .update(event_id, |event| {
            let task = event.tasks.iter_mut().find(|task| task.id == task_id)?;
            if let Some(title) = req.title {
                task.title = title.trim().to_string();
            }
            if let Some(assignee) = req.assignee {
                task.assignee = Some(assignee);
            }
            if let Some(status) = req.status {
                task.status = status;
            }
            Some(task.clone())
        })
        .await
        .ok_or(ApiError::NotFound("event"))?
        .ok_or(ApiError::NotFound("task"))?;

    Ok(Json(updated))
}
