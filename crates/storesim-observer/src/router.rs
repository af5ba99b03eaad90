//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- `WebSocket` stats stream and `start` command
/// - `GET /api/customers` -- roster snapshot
/// - `POST /api/customers` -- add a customer
/// - `DELETE /api/customers/{id}` -- remove a customer
/// - `GET /api/stats` -- stats snapshot
/// - `GET /api/logs` -- technical log tail
/// - `POST /api/simulation/start` -- admit generated customers
/// - `POST /api/accidents/start` -- start the accident generator
/// - `POST /api/accidents/stop` -- stop the accident generator
/// - `GET /api/accidents/status` -- accident generator state
///
/// CORS is configured to allow any origin for development.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_stats))
        // REST API
        .route(
            "/api/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route("/api/customers/{id}", delete(handlers::delete_customer))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/logs", get(handlers::get_logs))
        // Operator API
        .route("/api/simulation/start", post(operator::start_simulation))
        .route("/api/accidents/start", post(operator::start_accidents))
        .route("/api/accidents/stop", post(operator::stop_accidents))
        .route("/api/accidents/status", get(operator::accident_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
