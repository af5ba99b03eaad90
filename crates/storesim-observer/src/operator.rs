//! Operator REST API handlers for runtime simulation control.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/simulation/start` | Admit N generated customers |
//! | `POST` | `/api/accidents/start` | Start the accident generator |
//! | `POST` | `/api/accidents/stop` | Stop the accident generator |
//! | `GET` | `/api/accidents/status` | Whether accidents are running |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use storesim_core::population;
use tracing::info;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/simulation/start`.
///
/// Accepts both the browser's `customerCount` and `customer_count`.
#[derive(Debug, serde::Deserialize)]
pub struct StartSimulationRequest {
    /// Number of customers to generate.
    #[serde(rename = "customerCount", alias = "customer_count")]
    pub customer_count: u32,
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

// ---------------------------------------------------------------------------
// POST /api/simulation/start
// ---------------------------------------------------------------------------

/// Generate and admit `customerCount` random customers.
///
/// Responds once every customer is in the intake queue, so a request
/// larger than the free queue capacity waits for the dispatcher.
pub async fn start_simulation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartSimulationRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    if req.customer_count == 0 {
        return Err(ObserverError::InvalidRequest(
            "customerCount must be positive".to_owned(),
        ));
    }

    info!(customer_count = req.customer_count, "starting simulation run");
    let admitted = population::admit_random(&state.store, req.customer_count).await?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "message": format!("Admitted {} customers", admitted.len()),
        "ids": admitted,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/accidents/start
// ---------------------------------------------------------------------------

/// Start the periodic accident generator. `409` if already running.
pub async fn start_accidents(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    state.accidents.start().await?;

    Ok(Json(OperatorResponse {
        ok: true,
        message: "Accidents started".to_owned(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/accidents/stop
// ---------------------------------------------------------------------------

/// Stop the accident generator. `409` if it is not running.
pub async fn stop_accidents(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    state.accidents.stop().await?;

    Ok(Json(OperatorResponse {
        ok: true,
        message: "Accidents stopped".to_owned(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/accidents/status
// ---------------------------------------------------------------------------

/// Report whether the accident generator is running.
pub async fn accident_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "running": state.accidents.is_running().await,
    }))
}
