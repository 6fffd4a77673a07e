// src/config/mod.rs

//! Device description loading and validation for the host simulator.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate names, dependencies and limits (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigFile, EnergySection, RawConfigFile, SchedulerSection, TaskConfig};
pub use validate::validate_config;
