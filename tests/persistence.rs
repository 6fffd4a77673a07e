// tests/persistence.rs

mod common;
use crate::common::fakes::{CallLog, RecordingStore, ScriptedEnergy};
use crate::common::{init_tracing, register};

use std::cell::Cell;
use std::rc::Rc;

use powertask::energy::EnergySource;
use powertask::fs::mock::MockFileSystem;
use powertask::scheduler::{self, PersistStatus, RestoreStatus, Scheduler, SchedulerConfig};
use powertask::storage::record::{self, RecordError};
use powertask::storage::{FileStore, MemoryStore, StateStore};
use powertask::task::Task;

fn two_task_scheduler(log: &CallLog) -> Scheduler {
    let mut scheduler = Scheduler::new(2);
    register(
        &mut scheduler,
        Task::new(400u32).named("task1").action(log.action("task1")),
    );
    register(
        &mut scheduler,
        Task::new(400u32).named("task2").action(log.action("task2")),
    );
    scheduler
}

#[test]
fn progress_is_persisted_and_cycle_resets_on_completion() {
    init_tracing();
    let log = CallLog::new();
    let mut scheduler = two_task_scheduler(&log);
    let mut store = RecordingStore::new();

    let mut energy = ScriptedEnergy::new([401.0, 399.0]);
    let first = scheduler.run(&mut energy, &mut store);

    assert_eq!(log.calls(), vec!["task1"]);
    assert!(!first.cycle_reset);
    assert_eq!(store.saved_flags(), vec![true, false]);

    let mut energy = ScriptedEnergy::new([401.0]);
    let second = scheduler.run(&mut energy, &mut store);

    // task1 is already complete and does not query energy.
    assert_eq!(energy.calls(), 1);
    assert_eq!(second.already_complete, 1);
    assert_eq!(log.calls(), vec!["task1", "task2"]);
    assert!(second.cycle_reset);
    assert_eq!(scheduler.completion_flags(), vec![false, false]);
    assert_eq!(store.saved_flags(), vec![false, false]);
    assert_eq!(store.saves, 2);
}

#[test]
fn every_sweep_loads_then_saves_once() {
    init_tracing();
    let log = CallLog::new();
    let mut scheduler = two_task_scheduler(&log);
    let mut store = RecordingStore::new();
    let mut energy = ScriptedEnergy::constant(0.0);

    let first = scheduler.run(&mut energy, &mut store);
    scheduler.run(&mut energy, &mut store);

    assert!(matches!(first.restore, RestoreStatus::LoadFailed(_)));
    assert_eq!(
        first.persist,
        PersistStatus::Saved {
            bytes: record::encoded_len(2)
        }
    );
    assert_eq!((store.loads, store.saves), (2, 2));
}

#[test]
fn stored_flags_override_in_memory_flags() {
    init_tracing();
    let log = CallLog::new();
    let mut scheduler = two_task_scheduler(&log);
    let mut store = RecordingStore::with_flags(&[true, false]);
    let mut energy = ScriptedEnergy::constant(0.0);

    let report = scheduler.run(&mut energy, &mut store);

    assert_eq!(report.restore, RestoreStatus::Restored { count: 2 });
    assert_eq!(report.already_complete, 1);
    assert_eq!(scheduler.completion_flags(), vec![true, false]);
    // Only the incomplete task queried energy.
    assert_eq!(energy.calls(), 1);
}

#[test]
fn restored_complete_task_is_not_reevaluated() {
    init_tracing();
    let evaluations = Rc::new(Cell::new(0));
    let seen = Rc::clone(&evaluations);
    let log = CallLog::new();
    let mut scheduler = Scheduler::new(2);
    register(
        &mut scheduler,
        Task::new(1u32)
            .named("done")
            .action(log.action("done"))
            .ready_when(move || {
                seen.set(seen.get() + 1);
                true
            }),
    );
    register(&mut scheduler, Task::new(1u32).named("pending"));
    let mut store = RecordingStore::with_flags(&[true, false]);
    let mut energy = ScriptedEnergy::constant(0.0);

    scheduler.run(&mut energy, &mut store);

    assert_eq!(evaluations.get(), 0);
    assert_eq!(log.count("done"), 0);
    assert_eq!(energy.calls(), 1);
}

#[test]
fn empty_registry_persists_but_never_resets() {
    init_tracing();
    let mut scheduler = Scheduler::new(4);
    let mut store = RecordingStore::new();
    let mut energy = ScriptedEnergy::constant(100.0);

    let report = scheduler.run(&mut energy, &mut store);

    assert!(!report.cycle_reset);
    assert_eq!(energy.calls(), 0);
    assert_eq!(store.saved_flags(), Vec::<bool>::new());
}

#[test]
fn registry_over_record_limit_is_never_saved() {
    init_tracing();
    let mut scheduler = Scheduler::new(256);
    for _ in 0..256 {
        register(&mut scheduler, Task::new(1u32));
    }
    let mut store = RecordingStore::new();
    let mut energy = ScriptedEnergy::constant(0.0);

    let report = scheduler.run(&mut energy, &mut store);

    assert_eq!(
        report.persist,
        PersistStatus::SkippedOversized {
            count: 256,
            max: record::DEFAULT_MAX_PERSISTED_TASKS
        }
    );
    assert_eq!(store.saves, 0);
    assert!(store.contents().is_empty());
}

#[test]
fn raised_record_limit_allows_larger_registries() {
    init_tracing();
    let mut scheduler = Scheduler::with_config(SchedulerConfig::new(300).max_persisted_tasks(300));
    for _ in 0..300 {
        register(&mut scheduler, Task::new(1u32));
    }
    let mut store = RecordingStore::new();
    let mut energy = ScriptedEnergy::new([2.0]);

    scheduler.run(&mut energy, &mut store);
    let second = scheduler.run(&mut ScriptedEnergy::constant(0.0), &mut store);

    assert_eq!(second.restore, RestoreStatus::Restored { count: 300 });
    let flags = store.saved_flags();
    assert_eq!(flags.len(), 300);
    assert!(flags[0]);
    assert!(flags[1..].iter().all(|done| !done));
}

#[test]
fn missing_scheduler_or_energy_source_never_touches_the_store() {
    init_tracing();
    let log = CallLog::new();
    let mut sched = two_task_scheduler(&log);
    let mut energy = ScriptedEnergy::constant(1000.0);
    let mut store = RecordingStore::with_flags(&[true, true]);
    let before = store.contents().to_vec();

    let no_scheduler = scheduler::run(None, Some(&mut energy as &mut dyn EnergySource), &mut store);
    let no_energy = scheduler::run(Some(&mut sched), None, &mut store);
    let neither = scheduler::run(None, None, &mut store);

    for report in [no_scheduler, no_energy, neither] {
        assert!(report.was_aborted());
        assert!(report.executed.is_empty());
    }
    assert!(!store.touched());
    assert_eq!(store.contents(), before.as_slice());
    assert_eq!(energy.calls(), 0);
    assert!(log.calls().is_empty());
}

#[test]
fn nullable_entry_point_runs_a_full_sweep_when_given_both() {
    init_tracing();
    let log = CallLog::new();
    let mut sched = two_task_scheduler(&log);
    let mut energy = ScriptedEnergy::constant(1000.0);
    let mut store = RecordingStore::new();

    let report = scheduler::run(Some(&mut sched), Some(&mut energy), &mut store);

    assert!(!report.was_aborted());
    assert!(report.cycle_reset);
    assert_eq!(log.calls(), vec!["task1", "task2"]);
}

#[test]
fn record_with_more_tasks_than_capacity_is_ignored() {
    init_tracing();
    let mut scheduler = Scheduler::new(1);
    register(&mut scheduler, Task::new(1u32));
    let mut store = RecordingStore::with_flags(&[true, true]);
    let mut energy = ScriptedEnergy::constant(0.0);

    let report = scheduler.run(&mut energy, &mut store);

    assert_eq!(
        report.restore,
        RestoreStatus::Rejected(RecordError::TooManyTasks { count: 2, max: 1 })
    );
    assert_eq!(scheduler.completion_flags(), vec![false]);
    // The next save replaces the bad record.
    assert_eq!(store.saved_flags(), vec![false]);
}

#[test]
fn record_for_a_different_registry_size_is_ignored() {
    init_tracing();
    let log = CallLog::new();
    let mut scheduler = two_task_scheduler(&log);
    let mut store = RecordingStore::with_flags(&[true]);
    let mut energy = ScriptedEnergy::constant(0.0);

    let report = scheduler.run(&mut energy, &mut store);

    assert_eq!(
        report.restore,
        RestoreStatus::Rejected(RecordError::CountMismatch {
            stored: 1,
            registered: 2
        })
    );
    assert_eq!(scheduler.completion_flags(), vec![false, false]);
}

#[test]
fn torn_record_is_ignored() {
    init_tracing();
    let log = CallLog::new();
    let mut scheduler = two_task_scheduler(&log);
    let mut bytes = record::encode(&[true, true], 255).expect("encodes");
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    let mut store = RecordingStore::with_contents(bytes);
    let mut energy = ScriptedEnergy::constant(0.0);

    let report = scheduler.run(&mut energy, &mut store);

    assert_eq!(
        report.restore,
        RestoreStatus::Rejected(RecordError::ChecksumMismatch)
    );
    assert_eq!(scheduler.completion_flags(), vec![false, false]);
}

#[test]
fn load_and_save_failures_do_not_abort_the_sweep() {
    init_tracing();
    let log = CallLog::new();
    let mut scheduler = two_task_scheduler(&log);
    let mut store = RecordingStore::new();
    store.fail_loads = true;
    store.fail_saves = true;
    let mut energy = ScriptedEnergy::new([401.0, 0.0]);

    let report = scheduler.run(&mut energy, &mut store);

    assert!(matches!(report.restore, RestoreStatus::LoadFailed(_)));
    assert!(matches!(report.persist, PersistStatus::SaveFailed(_)));
    assert_eq!(log.calls(), vec!["task1"]);
    // In-memory progress survives a failed save.
    assert_eq!(scheduler.completion_flags(), vec![true, false]);
}

#[test]
fn fresh_scheduler_resumes_after_power_loss() {
    init_tracing();
    let fs = MockFileSystem::new();

    let before = CallLog::new();
    let mut scheduler = two_task_scheduler(&before);
    let mut store = FileStore::with_fs(fs.clone(), ".powertask/state");
    scheduler.run(&mut ScriptedEnergy::new([401.0, 399.0]), &mut store);
    assert_eq!(before.calls(), vec!["task1"]);
    drop(scheduler);

    // Power cut: everything in RAM is gone, the file remains.
    let after = CallLog::new();
    let mut scheduler = two_task_scheduler(&after);
    let mut store = FileStore::with_fs(fs.clone(), ".powertask/state");
    let report = scheduler.run(&mut ScriptedEnergy::new([401.0]), &mut store);

    assert_eq!(report.restore, RestoreStatus::Restored { count: 2 });
    assert_eq!(after.calls(), vec!["task2"]);
    assert!(report.cycle_reset);
}

#[test]
fn failed_write_keeps_the_previous_record() {
    init_tracing();
    let fs = MockFileSystem::new();
    let log = CallLog::new();
    let mut scheduler = two_task_scheduler(&log);
    let mut store = FileStore::with_fs(fs.clone(), "state.bin");

    scheduler.run(&mut ScriptedEnergy::new([401.0, 0.0]), &mut store);
    let saved = fs.contents("state.bin").expect("record written");

    fs.set_fail_writes(true);
    let report = scheduler.run(&mut ScriptedEnergy::new([401.0]), &mut store);

    assert!(matches!(report.persist, PersistStatus::SaveFailed(_)));
    assert_eq!(fs.contents("state.bin"), Some(saved.clone()));
    assert_eq!(
        record::decode(&saved, 255).expect("previous record intact"),
        vec![true, false]
    );
}

#[test]
fn file_store_round_trips_through_a_real_directory() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("state");
    let log = CallLog::new();
    let mut scheduler = two_task_scheduler(&log);

    let mut store = FileStore::new(&path);
    scheduler.run(&mut ScriptedEnergy::new([401.0, 0.0]), &mut store);

    let mut reopened = FileStore::new(&path);
    let mut buf = vec![0u8; record::max_record_len(255)];
    let len = reopened.load(&mut buf).expect("record readable");
    assert_eq!(record::decode(&buf[..len], 2).expect("valid"), vec![true, false]);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn memory_store_reports_empty_before_first_save() {
    let mut store = MemoryStore::new();
    let mut buf = [0u8; 16];

    assert!(store.load(&mut buf).is_err());
    store.save(&[1, 2, 3]).expect("save");
    assert_eq!(store.load(&mut buf).expect("load"), 3);
    assert_eq!(&buf[..3], &[1, 2, 3]);
}
