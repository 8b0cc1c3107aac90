//! Participant domain - event discovery and registration.

pub mod routes;

pub use routes::routes;
