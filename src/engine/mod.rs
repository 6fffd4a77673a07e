// src/engine/mod.rs

//! Host-side engine that drives a scheduler like a device's control loop.
//!
//! - [`device`] bundles a scheduler, its energy source and its state store,
//!   built from a validated config. It is synchronous and IO-free apart from
//!   the store and task commands, so tests can tick it directly.
//! - [`runtime`] is the async shell that ticks a device on a timer and
//!   stops on Ctrl-C or after a fixed number of sweeps.

use std::time::Duration;

pub mod device;
pub mod runtime;

pub use device::Device;
pub use runtime::{RunSummary, Runtime};

/// Options for the async runtime loop.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Time between sweeps. The first sweep runs immediately.
    pub tick_interval: Duration,
    /// Stop after this many sweeps; `None` runs until Ctrl-C.
    pub max_ticks: Option<u64>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
            max_ticks: None,
        }
    }
}
