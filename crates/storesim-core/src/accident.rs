//! Accident generator: periodic random removal of a slice of the roster.
//!
//! An accident picks one of ten [`AccidentKind`]s, logs it, removes
//! `floor(len * fraction_percent / 100)` distinct random customers and logs
//! a summary. [`AccidentController`] runs accidents on a fixed interval
//! and can be started and stopped at runtime.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use storesim_types::CustomerId;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::config::AccidentConfig;
use crate::error::AccidentError;
use crate::store::Store;

/// What went wrong in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccidentKind {
    /// Fire in the produce area.
    Fire,
    /// Attempted break-in.
    Burglary,
    /// Power outage.
    PowerOutage,
    /// Water leak flooding the floor.
    Flood,
    /// Blocked sewer.
    SewerBlockage,
    /// Someone got hurt at the checkout.
    Injury,
    /// Refrigeration broke down.
    CoolingFailure,
    /// Electrical grid overload.
    GridOverload,
    /// Security system fault.
    SecurityFault,
    /// Checkout system down.
    CheckoutFailure,
}

impl AccidentKind {
    /// Every accident kind.
    pub const ALL: [Self; 10] = [
        Self::Fire,
        Self::Burglary,
        Self::PowerOutage,
        Self::Flood,
        Self::SewerBlockage,
        Self::Injury,
        Self::CoolingFailure,
        Self::GridOverload,
        Self::SecurityFault,
        Self::CheckoutFailure,
    ];

    /// Short title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Burglary => "Burglary",
            Self::PowerOutage => "Power outage",
            Self::Flood => "Flood",
            Self::SewerBlockage => "Sewer blockage",
            Self::Injury => "Injury",
            Self::CoolingFailure => "Cooling failure",
            Self::GridOverload => "Grid overload",
            Self::SecurityFault => "Security fault",
            Self::CheckoutFailure => "Checkout failure",
        }
    }

    /// One-sentence description for the event log.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Fire => "A fire broke out in the vegetable section.",
            Self::Burglary => "Intruders tried to break into the store.",
            Self::PowerOutage => "A power outage closed some departments.",
            Self::Flood => "A leak flooded part of the sales floor.",
            Self::SewerBlockage => "A sewer blockage is causing unpleasant smells.",
            Self::Injury => "A customer was injured at the checkout and needs help.",
            Self::CoolingFailure => "The cooling system failed and products are spoiling.",
            Self::GridOverload => "A grid overload cut the lights.",
            Self::SecurityFault => "The security system is down and some cameras are offline.",
            Self::CheckoutFailure => "The checkout system failed and payments are impossible.",
        }
    }

    /// Pick a kind uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL.choose(rng).copied().unwrap_or(Self::Fire)
    }
}

impl core::fmt::Display for AccidentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} - {}", self.title(), self.description())
    }
}

/// What an accident did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccidentReport {
    /// The accident that happened.
    pub kind: AccidentKind,
    /// Customers removed from the roster.
    pub removed: Vec<CustomerId>,
}

/// `floor(len * fraction_percent / 100)`, with the percentage capped at 100.
pub fn affected_count(len: usize, fraction_percent: u32) -> usize {
    let percent = usize::try_from(fraction_percent.min(100)).unwrap_or(100);
    len.saturating_mul(percent).checked_div(100).unwrap_or(0)
}

/// Run one accident against the store.
///
/// Victim IDs are sampled from a roster snapshot, then removed one by one.
/// A victim that already left in between is skipped.
pub async fn trigger_accident(store: &Store, fraction_percent: u32) -> AccidentReport {
    let ids = store.customer_ids().await;
    let count = affected_count(ids.len(), fraction_percent);

    let (kind, victims) = {
        let mut rng = rand::rng();
        let kind = AccidentKind::random(&mut rng);
        let victims: Vec<CustomerId> = rand::seq::index::sample(&mut rng, ids.len(), count)
            .into_iter()
            .filter_map(|index| ids.get(index).copied())
            .collect();
        (kind, victims)
    };

    store.log_message(format!("Accident: {kind}")).await;

    let mut removed = Vec::with_capacity(victims.len());
    for id in victims {
        if store.remove_customer(id).await {
            removed.push(id);
        }
    }

    store
        .log_message(format!(
            "Accident applied: {}. Removed {} customers.",
            kind.title(),
            removed.len()
        ))
        .await;
    info!(kind = kind.title(), removed = removed.len(), "accident triggered");

    AccidentReport { kind, removed }
}

/// Starts and stops the periodic accident generator.
#[derive(Debug)]
pub struct AccidentController {
    store: Arc<Store>,
    interval: Duration,
    fraction_percent: u32,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AccidentController {
    /// Create a stopped controller.
    pub fn new(store: Arc<Store>, config: &AccidentConfig) -> Self {
        Self {
            store,
            interval: config.interval(),
            fraction_percent: config.fraction_percent,
            task: Mutex::new(None),
        }
    }

    /// Start generating accidents. The first one fires one interval from now.
    ///
    /// # Errors
    ///
    /// [`AccidentError::AlreadyRunning`] if the generator is running.
    pub async fn start(&self) -> Result<(), AccidentError> {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return Err(AccidentError::AlreadyRunning);
        }

        let store = Arc::clone(&self.store);
        let period = self.interval;
        let fraction_percent = self.fraction_percent;
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                trigger_accident(&store, fraction_percent).await;
            }
        }));

        info!(interval_secs = period.as_secs(), "accident generator started");
        Ok(())
    }

    /// Stop generating accidents.
    ///
    /// # Errors
    ///
    /// [`AccidentError::NotRunning`] if the generator is not running.
    pub async fn stop(&self) -> Result<(), AccidentError> {
        let handle = self
            .task
            .lock()
            .await
            .take()
            .ok_or(AccidentError::NotRunning)?;
        handle.abort();
        info!("accident generator stopped");
        Ok(())
    }

    /// Whether the generator is running.
    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }
}

impl Drop for AccidentController {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use storesim_types::{Customer, ProductCategory};

    use super::*;
    use crate::config::SimulationConfig;

    async fn store_with(count: u64) -> Arc<Store> {
        let store = Arc::new(Store::from_config(&SimulationConfig::default()));
        for id in 1..=count {
            let added = store
                .add_customer(Customer::new(CustomerId::new(id), ProductCategory::Dairy))
                .await;
            assert!(added.is_ok());
        }
        store
    }

    #[test]
    fn affected_count_floors() {
        assert_eq!(affected_count(25, 10), 2);
        assert_eq!(affected_count(9, 10), 0);
        assert_eq!(affected_count(10, 10), 1);
        assert_eq!(affected_count(10, 250), 10);
    }

    #[test]
    fn every_kind_has_text() {
        for kind in AccidentKind::ALL {
            assert!(!kind.title().is_empty());
            assert!(!kind.description().is_empty());
        }
    }

    #[tokio::test]
    async fn accident_removes_tenth_of_roster() {
        let store = store_with(30).await;
        let report = trigger_accident(&store, 10).await;

        assert_eq!(report.removed.len(), 3);
        assert_eq!(store.roster_len().await, 27);
        for id in &report.removed {
            assert!(!store.contains(*id).await);
        }

        let logs = store.technical_logs().await;
        assert!(logs.iter().any(|l| l.contains("Accident: ")));
        assert!(
            logs.last()
                .is_some_and(|l| l.ends_with("Removed 3 customers."))
        );
    }

    #[tokio::test]
    async fn accident_on_small_roster_removes_nobody() {
        let store = store_with(5).await;
        let report = trigger_accident(&store, 10).await;
        assert!(report.removed.is_empty());
        assert_eq!(store.roster_len().await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn controller_start_stop() {
        let store = store_with(20).await;
        let controller = AccidentController::new(Arc::clone(&store), &AccidentConfig::default());

        assert!(!controller.is_running().await);
        assert_eq!(controller.stop().await, Err(AccidentError::NotRunning));

        assert!(controller.start().await.is_ok());
        assert!(controller.is_running().await);
        assert_eq!(controller.start().await, Err(AccidentError::AlreadyRunning));

        // First accident fires after one interval.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.roster_len().await, 20);
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(store.roster_len().await, 18);

        assert!(controller.stop().await.is_ok());
        assert!(!controller.is_running().await);
    }
}
