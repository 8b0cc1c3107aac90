//! Application setup and server configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::auth::AuthStore;
use crate::domains::events::EventStore;
use crate::domains::{auth, collaboration, organizer, participant, virtual_event};
use crate::server::routes::health_handler;
use crate::server::static_files::{serve_asset, serve_dashboard, serve_signin, serve_signup};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthStore>,
    pub events: Arc<EventStore>,
    pub frontend_dir: Arc<PathBuf>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            auth: Arc::new(AuthStore::new(config.session_ttl_hours)),
            events: Arc::new(EventStore::new()),
            frontend_dir: Arc::new(config.frontend_dir.clone()),
            started_at: Instant::now(),
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        // No origins configured: open CORS (development)
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build the axum application router.
///
/// The five route groups are merged with no prefix; each group defines
/// its own namespace. The named page routes and /health are matched
/// first; everything else falls through to the static asset handler.
///
/// Returns (Router, AppState) - the state is also needed by the session
/// cleanup task in main.
pub fn build_app(config: &Config) -> (Router, AppState) {
    let state = AppState::new(config);
    let router = build_router(state.clone(), &config.allowed_origins);
    (router, state)
}

/// Assemble the router for a given state (tests inject their own state)
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        // Server-owned routes
        .route("/health", get(health_handler))
        // Named frontend pages
        .route("/", get(serve_dashboard))
        .route("/signin", get(serve_signin))
        .route("/signup", get(serve_signup))
        // Route groups, mounted with no prefix
        .merge(auth::routes())
        .merge(organizer::routes())
        .merge(participant::routes())
        .merge(collaboration::routes())
        .merge(virtual_event::routes())
        // Anything unmatched is a frontend asset
        .fallback(serve_asset)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
