//! The shared store aggregate.
//!
//! [`Store`] owns the roster, the intake queue, the event log and the two
//! activity counters. One instance is built at startup and shared by
//! `Arc` with every consumer: the dispatcher, customer workers, the
//! accident generator and the observer.
//!
//! # Locking
//!
//! The roster, the intake receiver and the event log each have their own
//! lock, and no operation holds two of them at once. Every position write
//! happens under the roster lock.
//!
//! # Admissions
//!
//! Every successful [`Store::add_customer`] mints an [`Admission`]: the
//! customer ID plus a ticket unique to that visit. The intake queue carries
//! admissions, and workers address their roster entry by ticket. A customer
//! removed and re-added under the same ID gets a new ticket, so a worker
//! still running for the earlier visit no longer finds it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use storesim_types::{Customer, CustomerId, Position, SimulationStats};
use tokio::sync::{Mutex, mpsc, watch};

use crate::config::SimulationConfig;
use crate::counters::ActivityCounter;
use crate::error::StoreError;
use crate::event_log::EventLog;
use crate::geometry::Bounds;
use crate::layout::StoreLayout;
use crate::movement::{self, MovementParams, StepOutcome};

/// One visit of one customer: the ID and the ticket minted when it was
/// admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Admission {
    id: CustomerId,
    ticket: u64,
}

impl Admission {
    /// The admitted customer.
    pub const fn id(self) -> CustomerId {
        self.id
    }

    /// Ticket unique to this visit within its store.
    pub const fn ticket(self) -> u64 {
        self.ticket
    }
}

#[derive(Debug)]
struct RosterEntry {
    ticket: u64,
    customer: Customer,
}

impl RosterEntry {
    const fn is(&self, admission: Admission) -> bool {
        self.ticket == admission.ticket
    }
}

/// The store: layout, roster, intake queue, event log and counters.
#[derive(Debug)]
pub struct Store {
    layout: StoreLayout,
    bounds: Bounds,
    movement: MovementParams,
    purchase_dwell: Duration,
    nominal_capacity: u32,
    log_tail: usize,
    roster: Mutex<Vec<RosterEntry>>,
    intake_tx: mpsc::Sender<Admission>,
    intake_rx: Mutex<mpsc::Receiver<Admission>>,
    log: EventLog,
    workers: Arc<ActivityCounter>,
    channels: Arc<ActivityCounter>,
    next_id: AtomicU64,
    next_ticket: AtomicU64,
}

impl Store {
    /// Build a store from configuration and an explicit layout.
    ///
    /// The layout is used as given; its doors are not overridden by
    /// `config.store.entry`/`exit`.
    pub fn new(config: &SimulationConfig, layout: StoreLayout) -> Self {
        let (intake_tx, intake_rx) = mpsc::channel(config.store.intake_capacity.max(1));
        Self {
            layout,
            bounds: config.store.bounds(),
            movement: config.movement.params(),
            purchase_dwell: config.workers.purchase_dwell(),
            nominal_capacity: config.store.nominal_capacity,
            log_tail: config.event_log.tail,
            roster: Mutex::new(Vec::new()),
            intake_tx,
            intake_rx: Mutex::new(intake_rx),
            log: EventLog::new(config.event_log.capacity),
            workers: Arc::new(ActivityCounter::new()),
            channels: Arc::new(ActivityCounter::new()),
            next_id: AtomicU64::new(1),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// Build a store with the standard departments and the configured doors.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let layout = StoreLayout::standard().with_doors(config.store.entry, config.store.exit);
        Self::new(config, layout)
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Admit a customer: place it at the entry, append it to the roster and
    /// push its admission onto the intake queue.
    ///
    /// Waits while the intake queue is full.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateCustomer`] if the ID is already in the roster;
    /// [`StoreError::IntakeClosed`] if the queue has no receiver, in which
    /// case the roster entry is rolled back.
    pub async fn add_customer(&self, mut customer: Customer) -> Result<Admission, StoreError> {
        let id = customer.id;
        customer.current_position = self.layout.entry();
        let admission = {
            let mut roster = self.roster.lock().await;
            if roster.iter().any(|e| e.customer.id == id) {
                return Err(StoreError::DuplicateCustomer { id });
            }
            let ticket = self.next_ticket.fetch_add(1, Ordering::AcqRel);
            roster.push(RosterEntry { ticket, customer });
            Admission { id, ticket }
        };
        self.observe_id(id);

        if self.intake_tx.send(admission).await.is_err() {
            self.roster.lock().await.retain(|e| !e.is(admission));
            return Err(StoreError::IntakeClosed { id });
        }

        self.log.append(format!("Added customer {id}")).await;
        Ok(admission)
    }

    /// Remove the roster entry with this ID, whichever visit it belongs to.
    ///
    /// Returns `false` (and logs nothing) when the ID is absent.
    pub async fn remove_customer(&self, id: CustomerId) -> bool {
        self.remove_where(id, |e| e.customer.id == id).await
    }

    /// Remove the roster entry only if it still belongs to `admission`.
    ///
    /// Returns `false` when the customer is absent or was re-admitted since.
    pub async fn remove_admission(&self, admission: Admission) -> bool {
        self.remove_where(admission.id, |e| e.is(admission)).await
    }

    async fn remove_where(&self, id: CustomerId, matches: impl Fn(&RosterEntry) -> bool) -> bool {
        let removed = {
            let mut roster = self.roster.lock().await;
            roster
                .iter()
                .position(matches)
                .map(|index| roster.remove(index))
                .is_some()
        };
        if removed {
            self.log.append(format!("Removed customer {id}")).await;
        }
        removed
    }

    /// Deep copy of the roster.
    pub async fn customers(&self) -> Vec<Customer> {
        self.roster
            .lock()
            .await
            .iter()
            .map(|e| e.customer.clone())
            .collect()
    }

    /// Deep copy of one customer.
    pub async fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.roster
            .lock()
            .await
            .iter()
            .find(|e| e.customer.id == id)
            .map(|e| e.customer.clone())
    }

    /// Deep copy of the customer, if `admission` is still its current visit.
    pub async fn admitted_customer(&self, admission: Admission) -> Option<Customer> {
        self.roster
            .lock()
            .await
            .iter()
            .find(|e| e.is(admission))
            .map(|e| e.customer.clone())
    }

    /// IDs currently in the roster, in roster order.
    pub async fn customer_ids(&self) -> Vec<CustomerId> {
        self.roster.lock().await.iter().map(|e| e.customer.id).collect()
    }

    /// Current position of a customer.
    pub async fn position_of(&self, id: CustomerId) -> Option<Position> {
        self.roster
            .lock()
            .await
            .iter()
            .find(|e| e.customer.id == id)
            .map(|e| e.customer.current_position)
    }

    /// Current position, if `admission` is still the customer's current visit.
    pub async fn admitted_position(&self, admission: Admission) -> Option<Position> {
        self.roster
            .lock()
            .await
            .iter()
            .find(|e| e.is(admission))
            .map(|e| e.customer.current_position)
    }

    /// Whether the roster holds this ID.
    pub async fn contains(&self, id: CustomerId) -> bool {
        self.roster.lock().await.iter().any(|e| e.customer.id == id)
    }

    /// Number of customers in the roster.
    pub async fn roster_len(&self) -> usize {
        self.roster.lock().await.len()
    }

    /// Allocate an ID above every ID this store has seen.
    pub fn next_customer_id(&self) -> CustomerId {
        let previous = self
            .next_id
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_add(1)))
            .unwrap_or_else(|n| n);
        CustomerId::new(previous)
    }

    fn observe_id(&self, id: CustomerId) {
        self.next_id
            .fetch_max(id.into_inner().saturating_add(1), Ordering::AcqRel);
    }

    /// Advance one customer by `delta`, with collision jitter and clamping,
    /// and commit the result.
    ///
    /// Returns `None` if the customer is no longer in the roster.
    pub async fn step_customer(&self, id: CustomerId, delta: Position) -> Option<StepOutcome> {
        self.step_where(delta, |e| e.customer.id == id).await
    }

    /// Like [`step_customer`](Self::step_customer), but only moves the
    /// customer while `admission` is its current visit.
    pub async fn step_admission(&self, admission: Admission, delta: Position) -> Option<StepOutcome> {
        self.step_where(delta, |e| e.is(admission)).await
    }

    async fn step_where(
        &self,
        delta: Position,
        matches: impl Fn(&RosterEntry) -> bool,
    ) -> Option<StepOutcome> {
        let mut roster = self.roster.lock().await;
        let index = roster.iter().position(matches)?;
        let entry = roster.get(index)?;
        let id = entry.customer.id;
        let current = entry.customer.current_position;

        let outcome = {
            let mut rng = rand::rng();
            let others = roster
                .iter()
                .filter(|e| e.customer.id != id)
                .map(|e| e.customer.current_position);
            movement::advance(current, delta, others, &self.movement, self.bounds, &mut rng)
        };

        if let Some(entry) = roster.get_mut(index) {
            entry.customer.current_position = outcome.committed;
        }
        Some(outcome)
    }

    // -----------------------------------------------------------------------
    // Intake queue
    // -----------------------------------------------------------------------

    /// Wait for the next queued admission.
    ///
    /// Returns `None` once `shutdown` flips to `true` or its sender is
    /// dropped. Concurrent callers take turns on the receiver.
    pub async fn next_intake(&self, shutdown: &mut watch::Receiver<bool>) -> Option<Admission> {
        let mut intake = tokio::select! {
            biased;
            _ = shutdown.wait_for(|stop| *stop) => return None,
            guard = self.intake_rx.lock() => guard,
        };
        tokio::select! {
            biased;
            _ = shutdown.wait_for(|stop| *stop) => None,
            admission = intake.recv() => admission,
        }
    }

    /// Number of admissions waiting in the intake queue.
    pub fn queued(&self) -> usize {
        self.intake_tx
            .max_capacity()
            .saturating_sub(self.intake_tx.capacity())
    }

    // -----------------------------------------------------------------------
    // Event log
    // -----------------------------------------------------------------------

    /// Append a timestamped entry to the event log.
    pub async fn log_message(&self, message: impl Into<String>) {
        self.log.append(message).await;
    }

    /// The most recent entries surfaced to pollers, oldest first.
    pub async fn technical_logs(&self) -> Vec<String> {
        self.log.tail(self.log_tail).await
    }

    /// The full event log.
    pub const fn event_log(&self) -> &EventLog {
        &self.log
    }

    // -----------------------------------------------------------------------
    // Counters and settings
    // -----------------------------------------------------------------------

    /// Running customer workers.
    pub const fn workers(&self) -> &Arc<ActivityCounter> {
        &self.workers
    }

    /// Dispatchers attached to the intake queue.
    pub const fn channels(&self) -> &Arc<ActivityCounter> {
        &self.channels
    }

    /// The static layout.
    pub const fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Canvas bounds.
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Movement parameters.
    pub const fn movement(&self) -> &MovementParams {
        &self.movement
    }

    /// How long a purchase takes.
    pub const fn purchase_dwell(&self) -> Duration {
        self.purchase_dwell
    }

    // -----------------------------------------------------------------------
    // Poller snapshot
    // -----------------------------------------------------------------------

    /// Point-in-time statistics for pollers.
    pub async fn stats(&self) -> SimulationStats {
        let customers = self.customers().await;
        let technical_logs = self.technical_logs().await;

        let mut customer_categories = BTreeMap::new();
        let mut total_purchases = Decimal::ZERO;
        for customer in &customers {
            total_purchases = total_purchases.saturating_add(Decimal::from(customer.purchase_count));
            let count: &mut u32 = customer_categories
                .entry(customer.category().department_name().to_owned())
                .or_insert(0);
            *count = count.saturating_add(1);
        }

        let roster_size = Decimal::from(customers.len());
        let average_purchase_count = total_purchases
            .checked_div(roster_size)
            .unwrap_or(Decimal::ZERO);
        let store_load = roster_size
            .checked_div(Decimal::from(self.nominal_capacity))
            .unwrap_or(Decimal::ZERO);

        SimulationStats {
            customers: customers.iter().map(Customer::view).collect(),
            average_purchase_count,
            customer_categories,
            store_load,
            active_workers: self.workers.get(),
            active_channels: self.channels.get(),
            technical_logs,
            generated_at: Utc::now(),
        }
    }
}


#[cfg(test)]
mod tests {
    use storesim_types::ProductCategory;

    use super::*;

    fn store() -> Store {
        Store::from_config(&SimulationConfig::default())
    }

    fn customer(id: u64, category: ProductCategory) -> Customer {
        Customer::new(CustomerId::new(id), category)
    }

    #[tokio::test]
    async fn added_customer_is_in_roster_at_entry() {
        let store = store();
        let result = store.add_customer(customer(1, ProductCategory::Meat)).await;
        assert!(result.is_ok());

        assert_eq!(store.roster_len().await, 1);
        assert_eq!(
            store.position_of(CustomerId::new(1)).await,
            Some(Position::new(50, 500))
        );
        assert_eq!(store.queued(), 1);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = store();
        assert!(store.add_customer(customer(1, ProductCategory::Meat)).await.is_ok());
        let second = store.add_customer(customer(1, ProductCategory::Bread)).await;
        assert_eq!(
            second,
            Err(StoreError::DuplicateCustomer {
                id: CustomerId::new(1)
            })
        );
        assert_eq!(store.roster_len().await, 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = store();
        assert!(store.add_customer(customer(4, ProductCategory::Sugar)).await.is_ok());

        assert!(store.remove_customer(CustomerId::new(4)).await);
        assert!(!store.remove_customer(CustomerId::new(4)).await);
        assert!(!store.contains(CustomerId::new(4)).await);

        let removals = store
            .event_log()
            .entries()
            .await
            .into_iter()
            .filter(|e| e.message == "Removed customer 4")
            .count();
        assert_eq!(removals, 1);
    }

    #[tokio::test]
    async fn snapshot_is_a_deep_copy() {
        let store = store();
        assert!(store.add_customer(customer(1, ProductCategory::Dairy)).await.is_ok());
        let snapshot = store.customers().await;

        let moved = store.step_customer(CustomerId::new(1), Position::new(10, 10)).await;
        assert!(moved.is_some());

        assert_eq!(
            snapshot.first().map(|c| c.current_position),
            Some(Position::new(50, 500))
        );
        assert_eq!(
            store.position_of(CustomerId::new(1)).await,
            Some(Position::new(60, 510))
        );
    }

    #[tokio::test]
    async fn step_of_absent_customer_is_none() {
        let store = store();
        assert!(store.step_customer(CustomerId::new(9), Position::new(1, 1)).await.is_none());
    }

    #[tokio::test]
    async fn next_id_skips_observed_ids() {
        let store = store();
        assert!(store.add_customer(customer(41, ProductCategory::Bread)).await.is_ok());
        assert_eq!(store.next_customer_id(), CustomerId::new(42));
        assert_eq!(store.next_customer_id(), CustomerId::new(43));
    }

    #[tokio::test]
    async fn stats_summarise_roster() {
        let store = store();
        let a = customer(1, ProductCategory::Vegetables).with_history(Decimal::ZERO, 2, 1);
        let b = customer(2, ProductCategory::Vegetables).with_history(Decimal::ZERO, 4, 1);
        let c = customer(3, ProductCategory::Meat).with_history(Decimal::ZERO, 0, 1);
        for c in [a, b, c] {
            assert!(store.add_customer(c).await.is_ok());
        }

        let stats = store.stats().await;
        assert_eq!(stats.customers.len(), 3);
        assert_eq!(stats.average_purchase_count, Decimal::from(2));
        assert_eq!(stats.customer_categories.get("Отдел овощей"), Some(&2));
        assert_eq!(stats.customer_categories.get("Отдел мяса"), Some(&1));
        assert_eq!(stats.store_load, Decimal::new(3, 2));
        assert_eq!(stats.active_workers, 0);
        assert_eq!(stats.technical_logs.len(), 3);
    }

    #[tokio::test]
    async fn empty_store_stats_are_zero() {
        let stats = store().stats().await;
        assert_eq!(stats.average_purchase_count, Decimal::ZERO);
        assert_eq!(stats.store_load, Decimal::ZERO);
        assert!(stats.customers.is_empty());
    }

    #[tokio::test]
    async fn next_intake_returns_queued_ids_in_order() {
        let store = store();
        for id in [1, 2] {
            assert!(store.add_customer(customer(id, ProductCategory::Bread)).await.is_ok());
        }
        let (_tx, mut rx) = watch::channel(false);
        assert_eq!(
            store.next_intake(&mut rx).await.map(Admission::id),
            Some(CustomerId::new(1))
        );
        assert_eq!(
            store.next_intake(&mut rx).await.map(Admission::id),
            Some(CustomerId::new(2))
        );
    }

    #[tokio::test]
    async fn readmission_gets_a_fresh_ticket() {
        let store = store();
        let id = CustomerId::new(1);
        let first = store.add_customer(customer(1, ProductCategory::Dairy)).await;
        assert!(first.is_ok());
        let Ok(first) = first else { return };
        assert!(store.remove_customer(id).await);

        let second = store.add_customer(customer(1, ProductCategory::Meat)).await;
        assert!(second.is_ok());
        let Ok(second) = second else { return };
        assert_eq!(second.id(), first.id());
        assert_ne!(second.ticket(), first.ticket());

        assert!(store.admitted_customer(first).await.is_none());
        assert!(store.admitted_position(first).await.is_none());
        assert!(store.step_admission(first, Position::new(5, 5)).await.is_none());
        assert!(!store.remove_admission(first).await);
        assert!(store.contains(id).await);
        assert_eq!(
            store.customer(id).await.map(|c| c.category()),
            Some(ProductCategory::Meat)
        );
        assert_eq!(store.position_of(id).await, Some(Position::new(50, 500)));

        assert!(store.remove_admission(second).await);
        assert!(!store.contains(id).await);
    }

    #[tokio::test]
    async fn next_intake_stops_on_shutdown() {
        let store = store();
        let (tx, mut rx) = watch::channel(false);
        assert!(tx.send(true).is_ok());
        assert_eq!(store.next_intake(&mut rx).await, None);
    }
}
