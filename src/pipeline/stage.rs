//! Stages, their prerequisites, and the stage plan behind each CLI target

use crate::version::BuildKind;
use serde::Serialize;
use std::fmt;

/// One step of the release pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
  Version,
  Build,
  Test,
  Changelog,
  Package,
  Install,
  Doc,
  Clean,
}

impl Stage {
  /// Stages that must have completed before this one may run
  pub fn prerequisites(self) -> &'static [Stage] {
    match self {
      Stage::Version | Stage::Clean => &[],
      Stage::Build => &[Stage::Version],
      Stage::Test | Stage::Install | Stage::Doc => &[Stage::Build],
      Stage::Changelog => &[Stage::Test],
      Stage::Package => &[Stage::Build, Stage::Changelog],
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Stage::Version => "version",
      Stage::Build => "build",
      Stage::Test => "test",
      Stage::Changelog => "changelog",
      Stage::Package => "package",
      Stage::Install => "install",
      Stage::Doc => "doc",
      Stage::Clean => "clean",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A CLI trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
  Build,
  Test,
  Install,
  Dist,
  Doc,
  Clean,
}

impl Target {
  /// Ordered stages run for this target
  pub fn stages(self) -> &'static [Stage] {
    match self {
      Target::Build => &[Stage::Version, Stage::Build],
      Target::Test => &[Stage::Version, Stage::Build, Stage::Test],
      Target::Install => &[Stage::Version, Stage::Build, Stage::Install],
      Target::Dist => &[
        Stage::Version,
        Stage::Build,
        Stage::Test,
        Stage::Changelog,
        Stage::Package,
      ],
      Target::Doc => &[Stage::Version, Stage::Build, Stage::Doc],
      Target::Clean => &[Stage::Clean],
    }
  }

  /// Only `dist` produces a distribution artifact
  pub fn build_kind(self) -> BuildKind {
    match self {
      Target::Dist => BuildKind::Distribution,
      _ => BuildKind::Routine,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Target::Build => "build",
      Target::Test => "test",
      Target::Install => "install",
      Target::Dist => "dist",
      Target::Doc => "doc",
      Target::Clean => "clean",
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
