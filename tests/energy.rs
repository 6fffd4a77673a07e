// tests/energy.rs

mod common;
use crate::common::fakes::RecordingStore;
use crate::common::{init_tracing, register};

use powertask::energy::{CapacitorSource, EnergyError, EnergySource, VoltageSampler, VoltageTrace};
use powertask::scheduler::{Scheduler, SkipReason};
use powertask::task::Task;
use powertask::types::Joules;

fn approx(actual: Joules, expected: f64) {
    assert!(
        (actual.value() - expected).abs() < 1e-9,
        "expected {expected} J, got {actual}"
    );
}

#[test]
fn capacitor_energy_is_half_c_v_squared() {
    // 1 F at 3 V.
    approx(CapacitorSource::<VoltageTrace>::energy_for(1_000_000, 3_000), 4.5);
    // 470 mF at 3.3 V.
    approx(
        CapacitorSource::<VoltageTrace>::energy_for(470_000, 3_300),
        0.5 * 0.47 * 3.3 * 3.3,
    );
    approx(CapacitorSource::<VoltageTrace>::energy_for(470_000, 0), 0.0);
}

#[test]
fn capacitor_source_reads_its_sampler() {
    init_tracing();
    let mut source = CapacitorSource::new(1_000_000, Some(|| 2_000u32));

    let energy = source.available_energy().expect("reading");

    approx(energy, 2.0);
    assert_eq!(source.capacitance_uf(), 1_000_000);
}

#[test]
fn capacitor_without_sampler_is_an_error() {
    let mut source: CapacitorSource<VoltageTrace> = CapacitorSource::new(1_000, None);

    assert_eq!(
        source.available_energy(),
        Err(EnergyError::MissingVoltageSampler)
    );
}

#[test]
fn zero_capacitance_is_an_error() {
    let mut source = CapacitorSource::new(0, Some(VoltageTrace::new(vec![3_300])));

    assert_eq!(source.available_energy(), Err(EnergyError::ZeroCapacitance));
}

#[test]
fn missing_sampler_is_reported_before_zero_capacitance() {
    let mut source: CapacitorSource<VoltageTrace> = CapacitorSource::new(0, None);

    assert_eq!(
        source.available_energy(),
        Err(EnergyError::MissingVoltageSampler)
    );
}

#[test]
fn voltage_trace_wraps_around() {
    let mut trace = VoltageTrace::new(vec![1_000, 2_000, 3_000]);

    let readings: Vec<u32> = (0..7).map(|_| trace.sample_millivolts()).collect();

    assert_eq!(
        readings,
        vec![1_000, 2_000, 3_000, 1_000, 2_000, 3_000, 1_000]
    );
    assert_eq!(trace.len(), 3);
}

#[test]
fn empty_trace_reads_as_a_dead_capacitor() {
    let mut trace = VoltageTrace::new(Vec::new());

    assert!(trace.is_empty());
    assert_eq!(trace.sample_millivolts(), 0);
    assert_eq!(trace.sample_millivolts(), 0);
}

#[test]
fn misconfigured_capacitor_starves_every_task() {
    init_tracing();
    let mut scheduler = Scheduler::new(2);
    let a = register(&mut scheduler, Task::new(0u32));
    let b = register(&mut scheduler, Task::new(0u32));
    let mut source = CapacitorSource::new(0, Some(VoltageTrace::new(vec![3_300])));
    let mut store = RecordingStore::new();

    let report = scheduler.run(&mut source, &mut store);

    assert!(report.executed.is_empty());
    for id in [a, b] {
        assert_eq!(
            report.skip_reason(id),
            Some(SkipReason::EnergyUnavailable(EnergyError::ZeroCapacitance))
        );
    }
}

#[test]
fn rising_supply_lets_tasks_through_one_by_one() {
    init_tracing();
    let mut scheduler = Scheduler::new(2);
    register(&mut scheduler, Task::new(Joules(2.0)).named("sense"));
    register(&mut scheduler, Task::new(Joules(2.0)).named("send"));
    // 1 F: 1.5 V is 1.125 J, 2.5 V is 3.125 J.
    let trace = VoltageTrace::new(vec![2_500, 1_500, 2_500]);
    let mut source = CapacitorSource::new(1_000_000, Some(trace));
    let mut store = RecordingStore::new();

    let first = scheduler.run(&mut source, &mut store);
    assert_eq!(first.executed.len(), 1);
    assert_eq!(scheduler.completion_flags(), vec![true, false]);

    let second = scheduler.run(&mut source, &mut store);
    assert_eq!(second.executed.len(), 1);
    assert!(second.cycle_reset);
}
