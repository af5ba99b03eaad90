//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the store handle, the accident controller and the
//! broadcast channel that fans stats snapshots out to `WebSocket` clients.

use std::sync::Arc;

use storesim_core::Store;
use storesim_core::accident::AccidentController;
use storesim_types::SimulationStats;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel for stats snapshots.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 64;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for stats snapshots.
    pub tx: broadcast::Sender<SimulationStats>,
    /// The simulated store.
    pub store: Arc<Store>,
    /// Accident generator controls.
    pub accidents: Arc<AccidentController>,
}

impl AppState {
    /// Create application state around an existing store and controller.
    pub fn new(store: Arc<Store>, accidents: Arc<AccidentController>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            store,
            accidents,
        }
    }

    /// Subscribe to the stats broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<SimulationStats> {
        self.tx.subscribe()
    }

    /// Publish a stats snapshot to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, stats: &SimulationStats) -> usize {
        self.tx.send(stats.clone()).unwrap_or(0)
    }
}
