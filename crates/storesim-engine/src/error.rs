//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and shutdown.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: storesim_core::config::ConfigError,
    },

    /// Admitting the initial customers failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: storesim_core::StoreError,
    },

    /// The accident generator could not be started or stopped.
    #[error("accident error: {source}")]
    Accident {
        /// The underlying accident controller error.
        #[from]
        source: storesim_core::AccidentError,
    },

    /// Observer API server failed to start.
    #[error("observer error: {message}")]
    Observer {
        /// Description of the observer failure.
        message: String,
    },

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
