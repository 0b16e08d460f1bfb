//! External step execution
//!
//! Steps are blocking sub-processes. A step that runs and exits non-zero is a
//! normal [`StepStatus::Failed`] value, not an error; only failing to start
//! the process at all is an error.

use super::Stage;
use crate::core::error::{ShipError, ShipResult, SubprocessError};
use crate::utils::display_command;
use std::path::Path;
use std::process::Command;

/// Exit status of an external step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
  Success,
  Failed { code: Option<i32> },
}

/// An external command bound to a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInvocation<'a> {
  pub stage: Stage,
  pub argv: &'a [String],
  /// Extra environment variables (`SHIPLOG_*`)
  pub env: Vec<(String, String)>,
}

impl StepInvocation<'_> {
  pub fn command_line(&self) -> String {
    display_command(self.argv)
  }
}

/// Runs external steps for the pipeline
pub trait StepRunner {
  fn run(&mut self, root: &Path, step: &StepInvocation<'_>) -> ShipResult<StepStatus>;
}

/// Runs steps as real sub-processes with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl StepRunner for SystemRunner {
  fn run(&mut self, root: &Path, step: &StepInvocation<'_>) -> ShipResult<StepStatus> {
    let (program, args) = step
      .argv
      .split_first()
      .ok_or_else(|| ShipError::message(format!("Command for stage '{}' is empty", step.stage)))?;

    let mut cmd = Command::new(program);
    cmd.current_dir(root).args(args);
    for (key, value) in &step.env {
      cmd.env(key, value);
    }

    tracing::debug!(stage = %step.stage, command = %step.command_line(), "spawning step");
    let status = cmd.status().map_err(|source| {
      ShipError::Subprocess(SubprocessError::Spawn {
        command: step.command_line(),
        source,
      })
    })?;

    if status.success() {
      Ok(StepStatus::Success)
    } else {
      Ok(StepStatus::Failed { code: status.code() })
    }
  }
}
