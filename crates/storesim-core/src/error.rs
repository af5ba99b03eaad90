//! Error types for the simulation core.

use storesim_types::CustomerId;

/// Errors returned by roster and intake operations on the [`Store`](crate::Store).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// A customer with this ID is already in the roster.
    #[error("customer {id} is already in the store")]
    DuplicateCustomer {
        /// The conflicting ID.
        id: CustomerId,
    },

    /// The intake queue has no receiver left; the customer was not admitted.
    #[error("intake queue is closed, customer {id} was not admitted")]
    IntakeClosed {
        /// The customer that could not be enqueued.
        id: CustomerId,
    },
}

/// Errors returned by the accident generator controls.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccidentError {
    /// `start` was called while the generator is already running.
    #[error("accident generator is already running")]
    AlreadyRunning,

    /// `stop` was called while the generator is not running.
    #[error("accident generator is not running")]
    NotRunning,
}
