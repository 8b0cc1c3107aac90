//! HTTP server assembly: router, state, error mapping and static serving.

pub mod app;
pub mod error;
pub mod routes;
pub mod static_files;

pub use app::{build_app, AppState};
