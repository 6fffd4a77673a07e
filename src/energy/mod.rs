// src/energy/mod.rs

//! Energy measurement boundary.
//!
//! The scheduler only asks "how much energy is available right now?" through
//! [`EnergySource`]. The physical side (voltage sampling, storage capacitor)
//! lives behind that trait:
//!
//! - [`capacitor`] turns a capacitance and a voltage sample into joules.
//! - [`trace`] replays a list of voltage readings, used by the host simulator.

pub mod capacitor;
pub mod trace;

use thiserror::Error;

use crate::types::Joules;

pub use capacitor::{CapacitorSource, VoltageSampler};
pub use trace::VoltageTrace;

/// Why an energy reading could not be produced.
///
/// The scheduler treats every variant as "not enough energy".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyError {
    #[error("energy source has no voltage sampler")]
    MissingVoltageSampler,

    #[error("energy source has zero capacitance")]
    ZeroCapacitance,
}

/// Reports the energy currently available to the device.
///
/// Each call is an independent, fresh reading.
pub trait EnergySource {
    fn available_energy(&mut self) -> Result<Joules, EnergyError>;
}

impl<F> EnergySource for F
where
    F: FnMut() -> Result<Joules, EnergyError>,
{
    fn available_energy(&mut self) -> Result<Joules, EnergyError> {
        self()
    }
}
