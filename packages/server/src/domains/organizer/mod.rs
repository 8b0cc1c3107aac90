//! Organizer domain - event lifecycle management for organizer accounts.

pub mod routes;

pub use routes::routes;
