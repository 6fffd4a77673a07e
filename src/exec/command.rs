// src/exec/command.rs

use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::task::Action;

/// What the last invocation of a [`CommandAction`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    Failed(i32),
    SpawnError,
}

/// Runs a shell command as a task's action.
///
/// The action has no way to report failure to the scheduler, so a failing
/// command is logged and the task still counts as executed. The most recent
/// outcome is kept in a shared slot for callers that want to look.
#[derive(Debug, Clone)]
pub struct CommandAction {
    task: String,
    cmd: String,
    last_outcome: Arc<Mutex<Option<CommandOutcome>>>,
}

impl CommandAction {
    pub fn new(task: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            cmd: cmd.into(),
            last_outcome: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared handle to the outcome of the most recent run.
    pub fn outcome_handle(&self) -> Arc<Mutex<Option<CommandOutcome>>> {
        Arc::clone(&self.last_outcome)
    }

    fn run(&self) -> Result<CommandOutcome> {
        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("spawning process for task '{}'", self.task))?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!(task = %self.task, "stderr: {}", line);
        }

        let code = output.status.code().unwrap_or(-1);
        info!(
            task = %self.task,
            exit_code = code,
            success = output.status.success(),
            "task process exited"
        );

        if output.status.success() {
            Ok(CommandOutcome::Success)
        } else {
            Ok(CommandOutcome::Failed(code))
        }
    }
}

impl Action for CommandAction {
    fn execute(&mut self) {
        info!(task = %self.task, cmd = %self.cmd, "starting task process");

        let outcome = match self.run() {
            Ok(CommandOutcome::Failed(code)) => {
                warn!(task = %self.task, exit_code = code, "task command failed");
                CommandOutcome::Failed(code)
            }
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(task = %self.task, error = %err, "task command could not be started");
                CommandOutcome::SpawnError
            }
        };

        let mut slot = self
            .last_outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(outcome);
    }
}
