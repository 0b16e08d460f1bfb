//! `shiplog build|test|install|dist|doc|clean` - run a pipeline target
//!
//! Supports:
//! - `--dry-run` to print the stage plan without running anything
//! - `--json` to print the run report (or plan) as JSON
//! - `--snapshot <suffix>` on `dist` to override `package.snapshot`

use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::core::vcs::{RepoState, VcsKind};
use crate::pipeline::{Pipeline, PipelineOptions, PipelineReport, Stage, StageOutcome, SystemRunner, Target};
use crate::utils::display_command;
use crate::version::{self, BuildKind};
use serde::Serialize;

/// One planned stage, as shown by `--dry-run`
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStage {
  pub stage: Stage,
  pub requires: &'static [Stage],
  /// External command, if the stage runs one
  #[serde(skip_serializing_if = "Option::is_none")]
  pub command: Option<String>,
}

/// What a target would do
#[derive(Debug, Clone, Serialize)]
pub struct TargetPlan {
  pub target: Target,
  pub build_kind: BuildKind,
  /// VCS owning the project tree, if any
  pub working_copy: Option<VcsKind>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  pub stages: Vec<PlannedStage>,
}

/// Build the dry-run plan for a target
pub fn plan_target(ctx: &ProjectContext, target: Target, snapshot: Option<&str>) -> ShipResult<TargetPlan> {
  let kind = target.build_kind();
  let version = if target.stages().contains(&Stage::Version) {
    version::plan(ctx.project_root(), &ctx.config, kind, snapshot)?
      .version()
      .map(str::to_string)
  } else {
    None
  };

  let steps = &ctx.config.steps;
  let stages = target
    .stages()
    .iter()
    .map(|&stage| {
      let command = match stage {
        Stage::Build => steps.build.as_deref().map(display_command),
        Stage::Test => steps.test.as_deref().map(display_command),
        Stage::Install => steps.install.as_deref().map(display_command),
        Stage::Doc => steps.doc.as_deref().map(display_command),
        Stage::Package => steps.package.as_deref().map(display_command),
        Stage::Clean => steps.clean.as_deref().map(display_command),
        Stage::Version | Stage::Changelog => None,
      };
      PlannedStage {
        stage,
        requires: stage.prerequisites(),
        command,
      }
    })
    .collect();

  let working_copy = match ctx.repo_state() {
    RepoState::Tracked(vcs) => Some(vcs),
    RepoState::Untracked => None,
  };

  Ok(TargetPlan {
    target,
    build_kind: kind,
    working_copy,
    version,
    stages,
  })
}

/// Run a pipeline target
pub fn run_target(
  ctx: &ProjectContext,
  target: Target,
  snapshot: Option<String>,
  dry_run: bool,
  json: bool,
) -> ShipResult<()> {
  if dry_run {
    let plan = plan_target(ctx, target, snapshot.as_deref())?;
    if json {
      println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
      print_plan(&plan);
    }
    return Ok(());
  }

  if !json {
    println!("🚀 {} {}", target, ctx.config.package.name);
  }

  let mut pipeline = Pipeline::new(ctx, SystemRunner, PipelineOptions { snapshot });
  let report = pipeline.run(target)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }
  Ok(())
}

fn print_plan(plan: &TargetPlan) {
  println!("DRY RUN: {} ({:?} build)", plan.target, plan.build_kind);
  match plan.working_copy {
    Some(vcs) => println!("  working copy: {}", vcs),
    None => println!("  working copy: none"),
  }
  if let Some(ref version) = plan.version {
    println!("  version: {}", version);
  }
  for (index, planned) in plan.stages.iter().enumerate() {
    match &planned.command {
      Some(command) => println!("  {}. {:<10} {}", index + 1, planned.stage, command),
      None if matches!(planned.stage, Stage::Version | Stage::Changelog | Stage::Clean) => {
        println!("  {}. {}", index + 1, planned.stage)
      }
      None => println!("  {}. {:<10} (not configured, skipped)", index + 1, planned.stage),
    }
  }
}

fn print_report(report: &PipelineReport) {
  for record in &report.stages {
    match &record.outcome {
      StageOutcome::Completed { detail: Some(detail) } => println!("  ✅ {:<10} {}", record.stage, detail),
      StageOutcome::Completed { detail: None } => println!("  ✅ {}", record.stage),
      StageOutcome::Skipped { reason } => println!("  ⏭️  {:<10} {}", record.stage, reason),
    }
  }

  match &report.version {
    Some(version) => println!("\n✅ {} finished ({})", report.target, version),
    None => println!("\n✅ {} finished", report.target),
  }
}
