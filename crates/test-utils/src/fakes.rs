//! Test doubles for the scheduler's collaborators.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use powertask::energy::{EnergyError, EnergySource};
use powertask::storage::{MemoryStore, StateStore, StorageError};
use powertask::storage::record;
use powertask::types::Joules;

/// Energy source that replays scripted readings, one per query.
///
/// Once the script runs out every query returns the fallback reading
/// (0 J unless changed). The number of queries is recorded.
#[derive(Debug, Clone)]
pub struct ScriptedEnergy {
    readings: VecDeque<Result<Joules, EnergyError>>,
    fallback: Result<Joules, EnergyError>,
    calls: usize,
}

impl ScriptedEnergy {
    pub fn new(readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            readings: readings.into_iter().map(|j| Ok(Joules(j))).collect(),
            fallback: Ok(Joules::ZERO),
            calls: 0,
        }
    }

    /// Every query returns `joules`.
    pub fn constant(joules: f64) -> Self {
        Self::new(Vec::new()).with_fallback(Ok(Joules(joules)))
    }

    /// Every query fails with `err`.
    pub fn failing(err: EnergyError) -> Self {
        Self::new(Vec::new()).with_fallback(Err(err))
    }

    pub fn with_fallback(mut self, fallback: Result<Joules, EnergyError>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl EnergySource for ScriptedEnergy {
    fn available_energy(&mut self) -> Result<Joules, EnergyError> {
        self.calls += 1;
        self.readings.pop_front().unwrap_or(self.fallback)
    }
}

/// A [`MemoryStore`] that counts loads and saves and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    pub loads: usize,
    pub saves: usize,
    pub fail_loads: bool,
    pub fail_saves: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with `bytes`, as if written before a power loss.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: MemoryStore::with_contents(bytes),
            ..Self::default()
        }
    }

    /// A store pre-loaded with a valid record of `flags`.
    pub fn with_flags(flags: &[bool]) -> Self {
        let bytes = record::encode(flags, record::FORMAT_MAX_TASKS)
            .expect("test flags fit in a record");
        Self::with_contents(bytes)
    }

    pub fn contents(&self) -> &[u8] {
        self.inner.contents()
    }

    /// Decode whatever was last saved, panicking if it is not a valid record.
    pub fn saved_flags(&self) -> Vec<bool> {
        record::decode(self.inner.contents(), record::FORMAT_MAX_TASKS)
            .expect("store holds a valid record")
    }

    pub fn touched(&self) -> bool {
        self.loads > 0 || self.saves > 0
    }
}

impl StateStore for RecordingStore {
    fn save(&mut self, data: &[u8]) -> Result<(), StorageError> {
        self.saves += 1;
        if self.fail_saves {
            debug!(save = self.saves, "injecting save failure");
            return Err(StorageError::Backend(anyhow::anyhow!("injected save failure")));
        }
        self.inner.save(data)
    }

    fn load(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        self.loads += 1;
        if self.fail_loads {
            debug!(load = self.loads, "injecting load failure");
            return Err(StorageError::Backend(anyhow::anyhow!("injected load failure")));
        }
        self.inner.load(buf)
    }
}

/// Shared log of executed task actions, in execution order.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// An action that appends `name` to this log each time it runs.
    pub fn action(&self, name: &str) -> impl FnMut() + use<> {
        let calls = Rc::clone(&self.calls);
        let name = name.to_string();
        move || calls.borrow_mut().push(name.clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == name).count()
    }
}
