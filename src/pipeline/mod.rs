//! Release pipeline
//!
//! ```text
//! Init -> Version -> Build -> Test -> [Changelog] -> Package -> Done
//!                      \-> Install
//!                      \-> Doc
//! Clean (any time)
//! ```
//!
//! Stages run strictly one after another. A stage only starts once all of its
//! prerequisites completed in this run, and the first failure stops the run
//! with the failing stage attached to the error. Nothing is retried.

pub mod clean;
pub mod runner;
pub mod stage;

pub use clean::{CleanReport, clean};
pub use runner::{StepInvocation, StepRunner, StepStatus, SystemRunner};
pub use stage::{Stage, Target};

use crate::changelog;
use crate::core::context::ProjectContext;
use crate::core::error::{ShipError, ShipResult, SubprocessError};
use crate::version::{self, BuildKind, VersionOutcome};
use serde::Serialize;
use std::collections::HashSet;

/// Environment variable carrying the resolved version to every step
pub const ENV_VERSION: &str = "SHIPLOG_VERSION";
/// Environment variable carrying the changelog path to the package step
pub const ENV_CHANGELOG: &str = "SHIPLOG_CHANGELOG";
/// Environment variable naming the running stage
pub const ENV_STAGE: &str = "SHIPLOG_STAGE";

/// Per-run options
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
  /// Overrides `package.snapshot` for distribution builds
  pub snapshot: Option<String>,
}

/// How a stage ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StageOutcome {
  Completed {
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
  },
  /// No command configured for this stage
  Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
  pub stage: Stage,
  #[serde(flatten)]
  pub outcome: StageOutcome,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
  pub target: Target,
  pub build_kind: BuildKind,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  pub stages: Vec<StageRecord>,
}

/// Drives the stages of one target
pub struct Pipeline<'a, R: StepRunner> {
  ctx: &'a ProjectContext,
  runner: R,
  options: PipelineOptions,
}

/// Mutable state threaded through one run
struct RunState {
  kind: BuildKind,
  completed: HashSet<Stage>,
  version: Option<String>,
  changelog_written: bool,
}

impl<'a, R: StepRunner> Pipeline<'a, R> {
  pub fn new(ctx: &'a ProjectContext, runner: R, options: PipelineOptions) -> Self {
    Self { ctx, runner, options }
  }

  /// Give back the runner (tests inspect recorded invocations)
  pub fn into_runner(self) -> R {
    self.runner
  }

  /// Run every stage of `target` in order
  pub fn run(&mut self, target: Target) -> ShipResult<PipelineReport> {
    let mut state = RunState {
      kind: target.build_kind(),
      completed: HashSet::new(),
      version: None,
      changelog_written: false,
    };
    let mut records = Vec::new();

    tracing::info!(%target, "starting pipeline");
    for &stage in target.stages() {
      if let Some(missing) = stage.prerequisites().iter().find(|p| !state.completed.contains(*p)) {
        return Err(
          ShipError::message(format!("Prerequisite stage '{}' has not completed", missing)).in_stage(stage),
        );
      }

      let outcome = self.run_stage(stage, &mut state).map_err(|e| e.in_stage(stage))?;
      tracing::info!(%stage, ?outcome, "stage finished");
      state.completed.insert(stage);
      records.push(StageRecord { stage, outcome });
    }

    Ok(PipelineReport {
      target,
      build_kind: state.kind,
      version: state.version,
      stages: records,
    })
  }

  fn run_stage(&mut self, stage: Stage, state: &mut RunState) -> ShipResult<StageOutcome> {
    match stage {
      Stage::Version => self.run_version(state),
      Stage::Changelog => self.run_changelog(state),
      Stage::Clean => self.run_clean(),
      Stage::Build | Stage::Test | Stage::Install | Stage::Doc | Stage::Package => self.run_step(stage, state),
    }
  }

  fn run_version(&mut self, state: &mut RunState) -> ShipResult<StageOutcome> {
    let outcome = version::stamp(
      self.ctx.project_root(),
      &self.ctx.config,
      state.kind,
      self.options.snapshot.as_deref(),
    )?;
    state.version = outcome.version().map(str::to_string);

    let detail = match &outcome {
      VersionOutcome::Written { version, .. } => format!("{} -> {}", version, self.ctx.config.version.file.display()),
      VersionOutcome::Untouched { existing: Some(v) } => format!("no VCS metadata, kept {}", v),
      VersionOutcome::Untouched { existing: None } => "no VCS metadata, no version file".to_string(),
    };
    Ok(StageOutcome::Completed { detail: Some(detail) })
  }

  fn run_changelog(&mut self, state: &mut RunState) -> ShipResult<StageOutcome> {
    let document = changelog::generate(self.ctx.project_root(), &self.ctx.config.changelog)?;
    state.changelog_written = true;
    Ok(StageOutcome::Completed {
      detail: Some(format!(
        "{} entries -> {}",
        document.len(),
        self.ctx.config.changelog.file.display()
      )),
    })
  }

  fn run_clean(&mut self) -> ShipResult<StageOutcome> {
    let report = clean(self.ctx)?;
    let detail = format!(
      "removed {}, protected {}",
      report.removed.len(),
      report.protected.len()
    );

    let ctx = self.ctx;
    if let Some(argv) = &ctx.config.steps.clean {
      self.invoke(Stage::Clean, argv, Vec::new())?;
    }
    Ok(StageOutcome::Completed { detail: Some(detail) })
  }

  fn run_step(&mut self, stage: Stage, state: &RunState) -> ShipResult<StageOutcome> {
    let ctx = self.ctx;
    let steps = &ctx.config.steps;
    let argv = match stage {
      Stage::Build => steps.build.as_ref(),
      Stage::Test => steps.test.as_ref(),
      Stage::Install => steps.install.as_ref(),
      Stage::Doc => steps.doc.as_ref(),
      Stage::Package => steps.package.as_ref(),
      _ => None,
    };
    let Some(argv) = argv else {
      tracing::debug!(%stage, "no command configured");
      return Ok(StageOutcome::Skipped {
        reason: format!("no [steps] {} command configured", stage),
      });
    };

    let mut env = Vec::new();
    if let Some(version) = &state.version {
      env.push((ENV_VERSION.to_string(), version.clone()));
    }
    if stage == Stage::Package && state.changelog_written {
      env.push((
        ENV_CHANGELOG.to_string(),
        ctx.changelog_file().display().to_string(),
      ));
    }

    self.invoke(stage, argv, env)?;
    Ok(StageOutcome::Completed { detail: None })
  }

  /// Run one external command; a non-zero exit becomes a subprocess error
  fn invoke(&mut self, stage: Stage, argv: &[String], mut env: Vec<(String, String)>) -> ShipResult<()> {
    env.push((ENV_STAGE.to_string(), stage.to_string()));
    let step = StepInvocation { stage, argv, env };

    match self.runner.run(self.ctx.project_root(), &step)? {
      StepStatus::Success => Ok(()),
      StepStatus::Failed { code } => Err(ShipError::Subprocess(SubprocessError::Exited {
        command: step.command_line(),
        code,
      })),
    }
  }
}
