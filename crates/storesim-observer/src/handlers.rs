//! REST API endpoint handlers for the Observer server.
//!
//! All reads go through the shared [`Store`](storesim_core::Store), which
//! hands out deep copies.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/customers` | Roster snapshot |
//! | `POST` | `/api/customers` | Add a customer |
//! | `DELETE` | `/api/customers/{id}` | Remove a customer |
//! | `GET` | `/api/stats` | Stats snapshot |
//! | `GET` | `/api/logs` | Technical log tail |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use rust_decimal::Decimal;
use storesim_types::{Customer, CustomerId, ProductCategory};
use tracing::info;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Request body for `POST /api/customers`.
///
/// Names and category are required; the history counters default to zero.
#[derive(Debug, serde::Deserialize)]
pub struct CreateCustomerRequest {
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Category label: a slug (`"vegetables"`) or a department name.
    #[serde(default)]
    pub category: String,
    /// Lifetime purchase total.
    #[serde(default)]
    pub purchase_amount: Decimal,
    /// Number of past purchases.
    #[serde(default)]
    pub purchase_count: u32,
    /// Number of past visits.
    #[serde(default)]
    pub visit_count: u32,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing store status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let customers = state.store.roster_len().await;
    let workers = state.store.workers().get();
    let channels = state.store.channels().get();
    let accidents = if state.accidents.is_running().await {
        "ON"
    } else {
        "OFF"
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Store Simulation Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
    </style>
</head>
<body>
    <h1>Store Simulation Observer</h1>

    <div>
        <div class="metric">
            <div class="label">Customers</div>
            <div class="value">{customers}</div>
        </div>
        <div class="metric">
            <div class="label">Active workers</div>
            <div class="value">{workers}</div>
        </div>
        <div class="metric">
            <div class="label">Active channels</div>
            <div class="value">{channels}</div>
        </div>
        <div class="metric">
            <div class="label">Accidents</div>
            <div class="value">{accidents}</div>
        </div>
    </div>

    <h2>API Endpoints</h2>
    <ul>
        <li>GET <a href="/api/customers">/api/customers</a> -- Roster snapshot</li>
        <li>GET <a href="/api/stats">/api/stats</a> -- Stats snapshot</li>
        <li>GET <a href="/api/logs">/api/logs</a> -- Technical log tail</li>
        <li>GET <a href="/api/accidents/status">/api/accidents/status</a> -- Accident generator</li>
        <li>POST /api/customers, DELETE /api/customers/{{id}}</li>
        <li>POST /api/simulation/start, /api/accidents/start, /api/accidents/stop</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws</code> -- Live stats stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/customers
// ---------------------------------------------------------------------------

/// Return every customer currently in the store.
pub async fn list_customers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let customers = state.store.customers().await;
    Json(serde_json::json!({
        "count": customers.len(),
        "customers": customers,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/customers
// ---------------------------------------------------------------------------

/// Add a customer to the store. Responds `201 Created`.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    if req.first_name.trim().is_empty()
        || req.last_name.trim().is_empty()
        || req.category.trim().is_empty()
    {
        return Err(ObserverError::InvalidRequest(
            "first_name, last_name and category are required".to_owned(),
        ));
    }

    let id = state.store.next_customer_id();
    let category = ProductCategory::from_label(&req.category);
    let customer = Customer::new(id, category)
        .with_name(req.first_name, req.last_name)
        .with_history(req.purchase_amount, req.purchase_count, req.visit_count);

    let admission = state.store.add_customer(customer).await?;
    info!(customer_id = %id, %category, "customer added via API");
    let customer = state.store.admitted_customer(admission).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Customer added",
            "id": id,
            "customer": customer,
        })),
    ))
}

// ---------------------------------------------------------------------------
// DELETE /api/customers/{id}
// ---------------------------------------------------------------------------

/// Remove a customer. Responds `404` if the ID is not in the roster.
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let id: u64 = id_str
        .parse()
        .map_err(|e| ObserverError::InvalidRequest(format!("invalid customer id {id_str}: {e}")))?;
    let id = CustomerId::new(id);

    if !state.store.remove_customer(id).await {
        return Err(ObserverError::NotFound(format!("customer {id}")));
    }
    info!(customer_id = %id, "customer removed via API");

    Ok(Json(serde_json::json!({
        "message": "Customer removed",
        "id": id,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/stats
// ---------------------------------------------------------------------------

/// Return a fresh stats snapshot.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.stats().await)
}

// ---------------------------------------------------------------------------
// GET /api/logs
// ---------------------------------------------------------------------------

/// Return the most recent event log entries, oldest first.
pub async fn get_logs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let logs = state.store.technical_logs().await;
    Json(serde_json::json!({
        "count": logs.len(),
        "logs": logs,
    }))
}
