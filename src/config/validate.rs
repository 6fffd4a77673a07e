// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PowertaskError, Result};
use crate::storage::record::FORMAT_MAX_TASKS;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PowertaskError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.scheduler, raw.energy, raw.task))
    }
}

/// Run every semantic check on a raw config.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_scheduler_section(cfg)?;
    validate_energy_section(cfg)?;
    validate_task_names(cfg)?;
    validate_task_energy(cfg)?;
    validate_task_dependencies(cfg)?;
    validate_no_cycles(cfg)?;
    warn_forward_dependencies(cfg);
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(PowertaskError::ConfigError(
            "config must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_scheduler_section(cfg: &RawConfigFile) -> Result<()> {
    let capacity = cfg.scheduler.effective_capacity(cfg.task.len());
    if capacity == 0 {
        return Err(PowertaskError::ConfigError(
            "[scheduler].capacity must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.task.len() > capacity {
        return Err(PowertaskError::ConfigError(format!(
            "{} tasks configured but [scheduler].capacity is {}",
            cfg.task.len(),
            capacity
        )));
    }

    let max = cfg.scheduler.max_persisted_tasks;
    if max == 0 || max > FORMAT_MAX_TASKS {
        return Err(PowertaskError::ConfigError(format!(
            "[scheduler].max_persisted_tasks must be between 1 and {} (got {})",
            FORMAT_MAX_TASKS, max
        )));
    }

    if cfg.scheduler.state_file.trim().is_empty() {
        return Err(PowertaskError::ConfigError(
            "[scheduler].state_file must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_energy_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.energy.voltage_trace_mv.is_empty() {
        return Err(PowertaskError::ConfigError(
            "[energy].voltage_trace_mv must contain at least one reading".to_string(),
        ));
    }
    // Zero capacitance is left to the energy source, which reports it on
    // every query and so keeps every task from running.
    if cfg.energy.capacitance_uf == 0 {
        warn!("[energy].capacitance_uf is 0; no task will ever have enough energy");
    }
    Ok(())
}

fn validate_task_names(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in cfg.task.iter() {
        if task.name.trim().is_empty() {
            return Err(PowertaskError::ConfigError(
                "every [[task]] needs a non-empty `name`".to_string(),
            ));
        }
        if !seen.insert(task.name.as_str()) {
            return Err(PowertaskError::ConfigError(format!(
                "duplicate task name '{}'",
                task.name
            )));
        }
    }
    Ok(())
}

fn validate_task_energy(cfg: &RawConfigFile) -> Result<()> {
    for task in cfg.task.iter() {
        let value = task.required_energy.value();
        if !value.is_finite() || value < 0.0 {
            return Err(PowertaskError::ConfigError(format!(
                "task '{}' has invalid required_energy {} (must be a finite, non-negative number)",
                task.name, value
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for task in cfg.task.iter() {
        let Some(dep) = task.after.as_deref() else {
            continue;
        };
        if dep == task.name {
            return Err(PowertaskError::ConfigError(format!(
                "task '{}' cannot wait for itself in `after`",
                task.name
            )));
        }
        if !cfg.task.iter().any(|t| t.name == dep) {
            return Err(PowertaskError::ConfigError(format!(
                "task '{}' has unknown dependency '{}' in `after`",
                task.name, dep
            )));
        }
    }
    Ok(())
}

fn validate_no_cycles(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: dep -> task. A cycle means none of its members can
    // ever complete, so the cycle reset would never happen.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in cfg.task.iter() {
        graph.add_node(task.name.as_str());
    }
    for task in cfg.task.iter() {
        if let Some(dep) = task.after.as_deref() {
            graph.add_edge(dep, task.name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(PowertaskError::DependencyCycle(format!(
            "cycle detected in task dependencies involving task '{}'",
            cycle.node_id()
        ))),
    }
}

/// Waiting on a later task is legal, but it only resolves one sweep after
/// that task completes.
fn warn_forward_dependencies(cfg: &RawConfigFile) {
    for (index, task) in cfg.task.iter().enumerate() {
        let Some(dep) = task.after.as_deref() else {
            continue;
        };
        if let Some(dep_index) = cfg.task.iter().position(|t| t.name == dep) {
            if dep_index > index {
                warn!(
                    task = %task.name,
                    dep = %dep,
                    "task waits on a later task; it will run at the earliest one sweep after it"
                );
            }
        }
    }
}
