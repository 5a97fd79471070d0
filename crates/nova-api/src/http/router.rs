//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`. Every endpoint except health is a POST with
//! a JSON body naming the user.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        // Accounts
        .route("/user/register", post(handlers::user::register))
        .route("/user/login", post(handlers::user::login))
        // Conversations
        .route("/conversation/load", post(handlers::conversation::load))
        .route("/conversation/list", post(handlers::conversation::list))
        .route("/conversation/select", post(handlers::conversation::select))
        .route("/conversation/delete", post(handlers::conversation::delete))
        .route("/conversation/clear", post(handlers::conversation::clear))
        .route("/conversation/summary", post(handlers::conversation::summary))
        .route("/conversation/new", post(handlers::conversation::start_new))
        // Relay
        .route("/chat", post(handlers::chat::chat));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
