//! Configuration loading and typed config structures for the store simulation.
//!
//! The canonical configuration lives in `storesim-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and parses the file. Every
//! field has a default, so an empty file (or no file at all) yields the
//! reference store.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use storesim_types::Position;

use crate::geometry::Bounds;
use crate::movement::MovementParams;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `storesim-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Store geometry and intake sizing.
    #[serde(default)]
    pub store: StoreConfig,

    /// Movement algorithm parameters.
    #[serde(default)]
    pub movement: MovementConfig,

    /// Worker scheduling parameters.
    #[serde(default)]
    pub workers: WorkerConfig,

    /// Event log sizing.
    #[serde(default)]
    pub event_log: EventLogConfig,

    /// Accident generator parameters.
    #[serde(default)]
    pub accidents: AccidentConfig,

    /// Initial population.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Observer HTTP server settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `OBSERVER_PORT` environment variable overrides
    /// `observer.port` when it holds a valid port number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as unit, not as an empty map.
        if yaml.trim().is_empty() {
            let mut config = Self::default();
            config.observer.apply_env_overrides();
            return Ok(config);
        }
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.observer.apply_env_overrides();
        Ok(config)
    }
}

/// Store geometry and intake sizing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Capacity of the intake queue. Producers block once it is full.
    #[serde(default = "default_intake_capacity")]
    pub intake_capacity: usize,

    /// Customer count that corresponds to a store load of 1.0.
    #[serde(default = "default_nominal_capacity")]
    pub nominal_capacity: u32,

    /// Where customers appear when they enter.
    #[serde(default = "default_entry")]
    pub entry: Position,

    /// Where customers leave.
    #[serde(default = "default_exit")]
    pub exit: Position,

    /// Canvas width; x is clamped to `0..=canvas_width`.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: i32,

    /// Canvas height; y is clamped to `0..=canvas_height`.
    #[serde(default = "default_canvas_height")]
    pub canvas_height: i32,
}

impl StoreConfig {
    /// The canvas bounds described by this configuration.
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.canvas_width, self.canvas_height)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            intake_capacity: default_intake_capacity(),
            nominal_capacity: default_nominal_capacity(),
            entry: default_entry(),
            exit: default_exit(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
        }
    }
}

/// Movement algorithm parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovementConfig {
    /// Number of discrete steps per walk.
    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Real-time delay before each step, in milliseconds.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Distance under which a neighbour triggers a jitter nudge.
    #[serde(default = "default_min_separation")]
    pub min_separation: f64,

    /// Maximum jitter per axis, in canvas units.
    #[serde(default = "default_jitter")]
    pub jitter: u32,
}

impl MovementConfig {
    /// Convert to the runtime parameters used by the movement algorithm.
    pub fn params(&self) -> MovementParams {
        MovementParams {
            steps: self.steps.max(1),
            step_delay: Duration::from_millis(self.step_delay_ms),
            min_separation: self.min_separation,
            jitter: i32::try_from(self.jitter).unwrap_or(i32::MAX),
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            step_delay_ms: default_step_delay_ms(),
            min_separation: default_min_separation(),
            jitter: default_jitter(),
        }
    }
}

/// Worker scheduling parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkerConfig {
    /// Number of long-lived pool workers. `0` spawns one task per customer
    /// with no upper bound.
    #[serde(default)]
    pub pool_size: usize,

    /// Purchase dwell time, in milliseconds.
    #[serde(default = "default_purchase_dwell_ms")]
    pub purchase_dwell_ms: u64,
}

impl WorkerConfig {
    /// The purchase dwell as a [`Duration`].
    pub const fn purchase_dwell(&self) -> Duration {
        Duration::from_millis(self.purchase_dwell_ms)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pool_size: 0,
            purchase_dwell_ms: default_purchase_dwell_ms(),
        }
    }
}

/// Event log sizing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventLogConfig {
    /// Maximum number of retained entries.
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,

    /// Number of most recent entries surfaced to pollers.
    #[serde(default = "default_log_tail")]
    pub tail: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            capacity: default_log_capacity(),
            tail: default_log_tail(),
        }
    }
}

/// Accident generator parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccidentConfig {
    /// Seconds between accidents while the generator runs.
    #[serde(default = "default_accident_interval_secs")]
    pub interval_secs: u64,

    /// Percentage of the roster removed per accident (0-100).
    #[serde(default = "default_accident_fraction_percent")]
    pub fraction_percent: u32,

    /// Start the generator together with the engine.
    #[serde(default)]
    pub enabled_on_start: bool,
}

impl AccidentConfig {
    /// The accident interval as a [`Duration`]; never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Default for AccidentConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_accident_interval_secs(),
            fraction_percent: default_accident_fraction_percent(),
            enabled_on_start: false,
        }
    }
}

/// Initial population.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of generated customers admitted at startup.
    #[serde(default)]
    pub initial_customers: u32,
}

/// Observer HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Bind address.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// TCP port for the HTTP API and `WebSocket`.
    #[serde(default = "default_observer_port")]
    pub port: u16,

    /// Interval between stats broadcasts, in milliseconds.
    #[serde(default = "default_broadcast_interval_ms")]
    pub broadcast_interval_ms: u64,
}

impl ObserverConfig {
    /// Apply environment variable overrides.
    ///
    /// `OBSERVER_PORT` replaces [`port`](Self::port) when it parses as a
    /// `u16`; anything else is ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = std::env::var("OBSERVER_PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
        {
            self.port = port;
        }
    }

    /// The broadcast interval as a [`Duration`]; never shorter than 10ms.
    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_millis(self.broadcast_interval_ms.max(10))
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
            broadcast_interval_ms: default_broadcast_interval_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_intake_capacity() -> usize {
    1000
}

const fn default_nominal_capacity() -> u32 {
    100
}

const fn default_entry() -> Position {
    Position::new(50, 500)
}

const fn default_exit() -> Position {
    Position::new(750, 575)
}

const fn default_canvas_width() -> i32 {
    800
}

const fn default_canvas_height() -> i32 {
    600
}

const fn default_steps() -> u32 {
    50
}

const fn default_step_delay_ms() -> u64 {
    50
}

const fn default_min_separation() -> f64 {
    30.0
}

const fn default_jitter() -> u32 {
    2
}

const fn default_purchase_dwell_ms() -> u64 {
    2000
}

const fn default_log_capacity() -> usize {
    1000
}

const fn default_log_tail() -> usize {
    10
}

const fn default_accident_interval_secs() -> u64 {
    10
}

const fn default_accident_fraction_percent() -> u32 {
    10
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

const fn default_broadcast_interval_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_owned()
}
