//! Collaboration domain - the per-event task board shared by the
//! organizer and invited collaborators.

pub mod routes;

pub use routes::routes;
