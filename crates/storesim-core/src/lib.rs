//! Concurrent simulation engine for the store simulation.
//!
//! Customers are added to a shared [`Store`], handed to a dispatcher through
//! a bounded intake queue, and walked through the store by one worker each:
//! to the department that sells what they want, a short purchase dwell, and
//! out through the exit. Pollers read roster snapshots, activity counters,
//! and the tail of the event log at their own cadence.
//!
//! # Modules
//!
//! - [`accident`] -- Random accidents that remove a slice of the roster.
//! - [`config`] -- Configuration loading from `storesim-config.yaml`.
//! - [`counters`] -- Active worker and intake channel counters.
//! - [`dispatcher`] -- Intake consumer: unbounded fan-out or a bounded pool.
//! - [`error`] -- Store and accident error types.
//! - [`event_log`] -- Bounded, timestamped FIFO of simulation events.
//! - [`geometry`] -- Distance, step interpolation, and canvas clamping.
//! - [`layout`] -- Departments and category-to-target resolution.
//! - [`movement`] -- Per-step movement with local collision jitter.
//! - [`population`] -- Random customer generation.
//! - [`store`] -- The shared store aggregate.
//! - [`worker`] -- The per-customer state machine.
//!
//! [`Store`]: store::Store

pub mod accident;
pub mod config;
pub mod counters;
pub mod dispatcher;
pub mod error;
pub mod event_log;
pub mod geometry;
pub mod layout;
pub mod movement;
pub mod population;
pub mod store;
pub mod worker;

pub use error::{AccidentError, StoreError};
pub use store::{Admission, Store};
