//! The per-customer state machine.
//!
//! A worker walks its customer from the entry to the desired department,
//! dwells there to simulate the purchase, walks to the exit and finally
//! removes the customer from the roster. Each transition is logged.
//!
//! The worker looks its customer up in the roster on every step, by the
//! [`Admission`] it was handed. If the customer has been removed externally
//! (operator delete or accident), or removed and admitted again for a new
//! visit, the worker stops at the next step boundary instead of running to
//! completion.

use storesim_types::{CustomerId, Position};

use crate::geometry;
use crate::store::{Admission, Store};

/// States of the customer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerPhase {
    /// Standing at the entry.
    Entering,
    /// Walking to the target department.
    MovingToTarget,
    /// Dwelling in the department.
    Purchasing,
    /// Walking to the exit.
    MovingToExit,
    /// Left the store. Terminal.
    Exited,
}

impl core::fmt::Display for CustomerPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Entering => "entering",
            Self::MovingToTarget => "moving to target",
            Self::Purchasing => "purchasing",
            Self::MovingToExit => "moving to exit",
            Self::Exited => "exited",
        };
        f.write_str(label)
    }
}

/// How a worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The customer walked the full route and left the store.
    Completed,
    /// The customer was removed from the roster while in the given phase.
    Removed(CustomerPhase),
}

impl WorkerOutcome {
    /// The phase the customer was in when the worker ended.
    pub const fn final_phase(self) -> CustomerPhase {
        match self {
            Self::Completed => CustomerPhase::Exited,
            Self::Removed(phase) => phase,
        }
    }
}

/// Run one customer through the whole state machine.
pub async fn run_customer(store: &Store, admission: Admission) -> WorkerOutcome {
    let id = admission.id();

    // Entering
    let Some(customer) = store.admitted_customer(admission).await else {
        return removed_early(store, id, CustomerPhase::Entering).await;
    };
    let category = customer.category();
    store
        .log_message(format!("Customer {id} entered the store"))
        .await;
    tracing::debug!(customer_id = %id, %category, "customer entered");

    // MovingToTarget
    let target = store.layout().target_for(category);
    store
        .log_message(format!("Customer {id} started moving to {category}"))
        .await;
    if !walk(store, admission, customer.current_position, target).await {
        return removed_early(store, id, CustomerPhase::MovingToTarget).await;
    }

    // Purchasing
    store
        .log_message(format!("Customer {id} is purchasing in {category}"))
        .await;
    tokio::time::sleep(store.purchase_dwell()).await;
    let Some(position) = store.admitted_position(admission).await else {
        return removed_early(store, id, CustomerPhase::Purchasing).await;
    };
    store
        .log_message(format!(
            "Customer {id} purchase complete, heading to the exit"
        ))
        .await;

    // MovingToExit
    if !walk(store, admission, position, store.layout().exit()).await {
        return removed_early(store, id, CustomerPhase::MovingToExit).await;
    }

    // Exited
    store
        .log_message(format!("Customer {id} exited the store"))
        .await;
    store.remove_admission(admission).await;
    tracing::debug!(customer_id = %id, "customer exited");
    WorkerOutcome::Completed
}

/// Walk from `from` toward `to` in the configured number of steps.
///
/// Returns `false` as soon as the customer is no longer in the roster.
async fn walk(store: &Store, admission: Admission, from: Position, to: Position) -> bool {
    let params = *store.movement();
    let delta = geometry::step_delta(from, to, params.steps);
    for _ in 0..params.steps {
        tokio::time::sleep(params.step_delay).await;
        if store.step_admission(admission, delta).await.is_none() {
            return false;
        }
    }
    true
}

async fn removed_early(store: &Store, id: CustomerId, phase: CustomerPhase) -> WorkerOutcome {
    store
        .log_message(format!("Customer {id} left early while {phase}"))
        .await;
    tracing::debug!(customer_id = %id, %phase, "customer worker stopped early");
    WorkerOutcome::Removed(phase)
}
