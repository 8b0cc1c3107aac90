use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// Task on an event's collaboration board
#[derive(Clone, Debug, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub assignee: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Virtual session attached to an event (at most one)
#[derive(Clone, Debug, Serialize)]
pub struct VirtualSession {
    pub join_url: String,
    pub platform: String,
    pub attendance: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: u32,
    pub status: EventStatus,
    pub collaborators: Vec<Uuid>,
    pub registrations: Vec<Uuid>,
    pub tasks: Vec<Task>,
    pub virtual_session: Option<VirtualSession>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        organizer_id: Uuid,
        title: String,
        description: String,
        starts_at: DateTime<Utc>,
        capacity: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            organizer_id,
            title,
            description,
            starts_at,
            capacity,
            status: EventStatus::Draft,
            collaborators: Vec::new(),
            registrations: Vec::new(),
            tasks: Vec::new(),
            virtual_session: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user may touch the collaboration board
    pub fn is_collaborator(&self, user_id: Uuid) -> bool {
        self.organizer_id == user_id || self.collaborators.contains(&user_id)
    }

    pub fn is_registered(&self, user_id: Uuid) -> bool {
        self.registrations.contains(&user_id)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("event not found")]
    NotFound,
    #[error("event is not open for registration")]
    NotOpen,
    #[error("event is at capacity")]
    Full,
    #[error("already registered for this event")]
    AlreadyRegistered,
    #[error("not registered for this event")]
    NotRegistered,
}

/// In-memory event store
pub struct EventStore {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, event: Event) {
        let mut events = self.events.write().await;
        events.insert(event.id, event);
    }

    pub async fn get(&self, id: Uuid) -> Option<Event> {
        let events = self.events.read().await;
        events.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<Event> {
        let mut events = self.events.write().await;
        events.remove(&id)
    }

    /// Apply a mutation to an event under the write lock.
    ///
    /// `updated_at` is bumped on every call; returns None if the id is
    /// unknown.
    pub async fn update<T>(&self, id: Uuid, apply: impl FnOnce(&mut Event) -> T) -> Option<T> {
        let mut events = self.events.write().await;
        let event = events.get_mut(&id)?;
        let result = apply(event);
        event.updated_at = Utc::now();
        Some(result)
    }

    /// All events owned by an organizer, soonest first
    pub async fn list_by_organizer(&self, organizer_id: Uuid) -> Vec<Event> {
        let events = self.events.read().await;
        let mut owned: Vec<Event> = events
            .values()
            .filter(|event| event.organizer_id == organizer_id)
            .cloned()
            .collect();
        owned.sort_by_key(|event| event.starts_at);
        owned
    }

    /// Published events visible to participants, soonest first
    pub async fn list_published(&self) -> Vec<Event> {
        let events = self.events.read().await;
        let mut published: Vec<Event> = events
            .values()
            .filter(|event| event.status == EventStatus::Published)
            .cloned()
            .collect();
        published.sort_by_key(|event| event.starts_at);
        published
    }

    /// Events the user holds a registration for, soonest first
    pub async fn list_registered(&self, user_id: Uuid) -> Vec<Event> {
        let events = self.events.read().await;
        let mut registered: Vec<Event> = events
            .values()
            .filter(|event| event.is_registered(user_id))
            .cloned()
            .collect();
        registered.sort_by_key(|event| event.starts_at);
        registered
    }

    /// Register a participant, enforcing status and capacity
    pub async fn register(&self, id: Uuid, user_id: Uuid) -> Result<(), RegistrationError> {
        let mut events = self.events.write().await;
        let event = events.get_mut(&id).ok_or(RegistrationError::NotFound)?;

        if event.status != EventStatus::Published {
            return Err(RegistrationError::NotOpen);
        }
        if event.is_registered(user_id) {
            return Err(RegistrationError::AlreadyRegistered);
        }
        if event.registrations.len() as u32 >= event.capacity {
            return Err(RegistrationError::Full);
        }

        event.registrations.push(user_id);
        event.updated_at = Utc::now();
        Ok(())
    }

    pub async fn unregister(&self, id: Uuid, user_id: Uuid) -> Result<(), RegistrationError> {
        let mut events = self.events.write().await;
        let event = events.get_mut(&id).ok_or(RegistrationError::NotFound)?;

        let before = event.registrations.len();
        event.registrations.retain(|registered| *registered != user_id);
        if event.registrations.len() == before {
            return Err(RegistrationError::NotRegistered);
        }
        event.updated_at = Utc::now();
        Ok(())
    }

    pub async fn count(&self) -> usize {
        self.events.read().await.len()
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}
