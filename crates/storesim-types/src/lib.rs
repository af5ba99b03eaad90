//! Shared type definitions for the store simulation.
//!
//! This crate is the single source of truth for the types exchanged between
//! the simulation core, the observer API and the browser client. Types
//! defined here flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Integer identifier wrapper for customers
//! - [`enums`] -- Product categories
//! - [`structs`] -- Positions, customers, and poller snapshots

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::ProductCategory;
pub use ids::CustomerId;
pub use structs::{Customer, CustomerView, DesiredProduct, Position, SimulationStats};
