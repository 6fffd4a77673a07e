// src/energy/trace.rs

use super::capacitor::VoltageSampler;

/// Replays a fixed list of voltage readings, wrapping around at the end.
///
/// Models a harvester whose supply rises and falls over time.
#[derive(Debug, Clone)]
pub struct VoltageTrace {
    readings_mv: Vec<u32>,
    cursor: usize,
}

impl VoltageTrace {
    pub fn new(readings_mv: Vec<u32>) -> Self {
        Self {
            readings_mv,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.readings_mv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings_mv.is_empty()
    }
}

impl VoltageSampler for VoltageTrace {
    /// An empty trace reads as 0 mV (a dead capacitor).
    fn sample_millivolts(&mut self) -> u32 {
        if self.readings_mv.is_empty() {
            return 0;
        }
        let reading = self.readings_mv[self.cursor];
        self.cursor = (self.cursor + 1) % self.readings_mv.len();
        reading
    }
}
