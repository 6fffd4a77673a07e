// src/energy/capacitor.rs

use tracing::trace;

use super::{EnergyError, EnergySource};
use crate::types::Joules;

/// Reads the storage capacitor voltage in millivolts.
pub trait VoltageSampler {
    fn sample_millivolts(&mut self) -> u32;
}

impl<F> VoltageSampler for F
where
    F: FnMut() -> u32,
{
    fn sample_millivolts(&mut self) -> u32 {
        self()
    }
}

/// Energy stored in a capacitor, `E = ½·C·V²`.
///
/// A source without a sampler or with zero capacitance is a configuration
/// error and yields [`EnergyError`] on every query.
#[derive(Debug, Clone)]
pub struct CapacitorSource<S> {
    capacitance_uf: u32,
    sampler: Option<S>,
}

impl<S: VoltageSampler> CapacitorSource<S> {
    pub fn new(capacitance_uf: u32, sampler: Option<S>) -> Self {
        Self {
            capacitance_uf,
            sampler,
        }
    }

    pub fn capacitance_uf(&self) -> u32 {
        self.capacitance_uf
    }

    /// Energy held by `capacitance_uf` microfarads charged to `millivolts`.
    pub fn energy_for(capacitance_uf: u32, millivolts: u32) -> Joules {
        let farads = f64::from(capacitance_uf) * 1e-6;
        let volts = f64::from(millivolts) * 1e-3;
        Joules(0.5 * farads * volts * volts)
    }
}

impl<S: VoltageSampler> EnergySource for CapacitorSource<S> {
    fn available_energy(&mut self) -> Result<Joules, EnergyError> {
        let Some(sampler) = self.sampler.as_mut() else {
            return Err(EnergyError::MissingVoltageSampler);
        };
        if self.capacitance_uf == 0 {
            return Err(EnergyError::ZeroCapacitance);
        }

        let millivolts = sampler.sample_millivolts();
        let energy = Self::energy_for(self.capacitance_uf, millivolts);
        trace!(
            capacitance_uf = self.capacitance_uf,
            millivolts,
            energy = energy.value(),
            "sampled capacitor"
        );
        Ok(energy)
    }
}
