//! Periodic stats publisher.
//!
//! Takes a [`SimulationStats`](storesim_types::SimulationStats) snapshot
//! every interval and broadcasts it to connected `WebSocket` clients. The
//! same tick emits the telemetry gauges as a `tracing` debug event under
//! the `storesim::telemetry` target.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::state::AppState;

/// Spawn the publisher loop. It runs until the task is aborted.
pub fn spawn_stats_publisher(state: Arc<AppState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            publish_once(&state).await;
        }
    })
}

/// Take one snapshot, record telemetry and broadcast it.
///
/// Returns the number of clients that received the snapshot.
pub async fn publish_once(state: &AppState) -> usize {
    let stats = state.store.stats().await;
    debug!(
        target: "storesim::telemetry",
        customers = stats.customers.len(),
        active_workers = stats.active_workers,
        active_channels = stats.active_channels,
        store_load = %stats.store_load,
        "store gauges"
    );
    state.broadcast(&stats)
}

#[cfg(test)]
mod tests {
    use storesim_core::Store;
    use storesim_core::accident::AccidentController;
    use storesim_core::config::SimulationConfig;

    use super::*;

    fn state() -> Arc<AppState> {
        let config = SimulationConfig::default();
        let store = Arc::new(Store::from_config(&config));
        let accidents = Arc::new(AccidentController::new(Arc::clone(&store), &config.accidents));
        Arc::new(AppState::new(store, accidents))
    }

    #[tokio::test]
    async fn publish_without_clients_is_fine() {
        assert_eq!(publish_once(&state()).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_receive_snapshots() {
        let state = state();
        let mut rx = state.subscribe();
        let publisher = spawn_stats_publisher(Arc::clone(&state), Duration::from_millis(100));

        let first = rx.recv().await;
        assert!(first.is_ok_and(|stats| stats.customers.is_empty()));
        publisher.abort();
    }
}
