//! Shared event model and in-memory store.
//!
//! Organizer, participant, collaboration and virtual-event routes all
//! operate on this store; the route groups own the HTTP surface, the
//! store owns the registration and capacity rules.

pub mod store;

pub use store::{
    Event, EventStatus, EventStore, RegistrationError, Task, TaskStatus, VirtualSession,
};
