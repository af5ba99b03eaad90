//! Observer API server for the store simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) streaming [`SimulationStats`]
//!   snapshots via [`tokio::sync::broadcast`], and accepting the
//!   `start` command from the browser
//! - **REST endpoints** for the roster, stats and the event log tail
//! - **Operator endpoints** for starting a simulation run and
//!   controlling the accident generator
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! Handlers hold an `Arc` to the core [`Store`] and read it directly;
//! every read is a deep-copy snapshot, so handlers never hold the roster
//! lock across a response. A [`publisher`] task takes a stats snapshot on
//! a fixed interval and pushes it to every `WebSocket` client.
//!
//! [`SimulationStats`]: storesim_types::SimulationStats
//! [`Store`]: storesim_core::Store

pub mod error;
pub mod handlers;
pub mod operator;
pub mod publisher;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
