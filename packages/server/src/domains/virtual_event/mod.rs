//! Virtual event domain - the online session attached to an event.

pub mod routes;

pub use routes::routes;
