// Gatherly - Event Platform API Core
//
// This crate provides the backend for the event management platform:
// five route groups (auth, organizer, participant, collaboration,
// virtual event) mounted on a single axum application, plus static
// serving of the frontend bundle.

pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
