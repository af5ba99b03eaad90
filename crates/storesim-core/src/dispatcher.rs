//! Turns intake-queue arrivals into running customer workers.
//!
//! Two modes:
//!
//! - **Fan-out** (`pool_size == 0`): one loop pulls IDs off the intake queue
//!   and spawns an independent task per customer. Concurrency is unbounded.
//! - **Pool** (`pool_size > 0`): `pool_size` long-lived tasks share the
//!   intake receiver and each runs one customer at a time to completion.
//!
//! In both modes the store's channel counter is held for as long as the
//! dispatcher is attached to the queue, and the worker counter is held for
//! as long as each customer's state machine runs.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::counters::ActivityGuard;
use crate::store::{Admission, Store};
use crate::worker::{self, WorkerOutcome};

/// Handle to a running dispatcher.
///
/// Dropping the handle also stops the dispatcher, since the shutdown
/// channel closes.
#[derive(Debug)]
pub struct DispatcherHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl DispatcherHandle {
    /// Number of dispatcher tasks (1 in fan-out mode, `pool_size` otherwise).
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Stop pulling from the intake queue and wait for the dispatcher
    /// tasks to finish.
    ///
    /// In fan-out mode, customers already spawned keep walking. In pool
    /// mode, each pool task finishes its current customer first.
    pub async fn shutdown(self) {
        if self.shutdown.send(true).is_err() {
            debug!("dispatcher tasks already stopped");
        }
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "dispatcher task ended abnormally");
            }
        }
    }
}

/// Spawn a single customer worker, holding the worker counter for its
/// whole run.
pub fn spawn_customer_worker(
    store: &Arc<Store>,
    admission: Admission,
) -> JoinHandle<WorkerOutcome> {
    let guard = store.workers().enter();
    let store = Arc::clone(store);
    tokio::spawn(async move {
        let _guard = guard;
        let outcome = worker::run_customer(&store, admission).await;
        debug!(
            customer_id = %admission.id(),
            phase = %outcome.final_phase(),
            "customer worker finished"
        );
        outcome
    })
}

/// Start the dispatcher.
pub fn spawn_dispatcher(store: Arc<Store>, pool_size: usize) -> DispatcherHandle {
    let (shutdown, rx) = watch::channel(false);
    let attached = Arc::new(store.channels().enter());

    let tasks = if pool_size == 0 {
        info!("dispatcher started in fan-out mode");
        vec![tokio::spawn(fan_out(store, rx, attached))]
    } else {
        info!(pool_size, "dispatcher started in pool mode");
        (0..pool_size)
            .map(|slot| {
                tokio::spawn(pool_worker(
                    slot,
                    Arc::clone(&store),
                    rx.clone(),
                    Arc::clone(&attached),
                ))
            })
            .collect()
    };

    DispatcherHandle { shutdown, tasks }
}

async fn fan_out(
    store: Arc<Store>,
    mut shutdown: watch::Receiver<bool>,
    attached: Arc<ActivityGuard>,
) {
    while let Some(admission) = store.next_intake(&mut shutdown).await {
        debug!(customer_id = %admission.id(), "dispatching customer");
        drop(spawn_customer_worker(&store, admission));
    }
    drop(attached);
    info!("dispatcher detached from intake queue");
}

async fn pool_worker(
    slot: usize,
    store: Arc<Store>,
    mut shutdown: watch::Receiver<bool>,
    attached: Arc<ActivityGuard>,
) {
    while let Some(admission) = store.next_intake(&mut shutdown).await {
        let id = admission.id();
        debug!(slot, customer_id = %id, "pool worker picked up customer");
        let _running = store.workers().enter();
        let outcome = worker::run_customer(&store, admission).await;
        debug!(slot, customer_id = %id, phase = %outcome.final_phase(), "customer worker finished");
    }
    drop(attached);
    debug!(slot, "pool worker stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use storesim_types::{Customer, CustomerId, ProductCategory};

    use super::*;
    use crate::config::SimulationConfig;

    #[tokio::test(start_paused = true)]
    async fn channel_counter_tracks_attachment() {
        let store = Arc::new(Store::from_config(&SimulationConfig::default()));
        let handle = spawn_dispatcher(Arc::clone(&store), 0);
        assert_eq!(store.channels().get(), 1);
        assert_eq!(handle.task_count(), 1);

        handle.shutdown().await;
        assert_eq!(store.channels().get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn pool_attaches_once() {
        let store = Arc::new(Store::from_config(&SimulationConfig::default()));
        let handle = spawn_dispatcher(Arc::clone(&store), 3);
        assert_eq!(store.channels().get(), 1);
        assert_eq!(handle.task_count(), 3);

        handle.shutdown().await;
        assert_eq!(store.channels().get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_worker_releases_counter() {
        let store = Arc::new(Store::from_config(&SimulationConfig::default()));
        let id = CustomerId::new(1);
        let admitted = store
            .add_customer(Customer::new(id, ProductCategory::Sugar))
            .await;
        assert!(admitted.is_ok());
        let Ok(admission) = admitted else { return };

        let before = store.workers().get();
        let worker = spawn_customer_worker(&store, admission);
        assert_eq!(store.workers().get(), before.saturating_add(1));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.remove_customer(id).await);
        assert!(worker.await.is_ok());
        assert_eq!(store.workers().get(), before);
    }
}
