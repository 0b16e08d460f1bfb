//! Version resolution and stamping
//!
//! The package version is decided from two facts: whether the tree is a
//! working copy, and whether this is a distribution build.
//!
//! | Repository | Build        | Result                         |
//! |------------|--------------|--------------------------------|
//! | tracked    | routine      | `0.5+svn` (working copy)       |
//! | any        | distribution | `0.5` + snapshot suffix        |
//! | untracked  | routine      | nothing written, file left as is |
//!
//! Distribution artifacts never carry the working-copy marker.

use crate::core::config::{ShipConfig, validate_version_fragment};
use crate::core::error::{ShipError, ShipResult};
use crate::core::vcs::{RepoState, VcsKind};
use crate::utils::write_artifact;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Kind of build being prepared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildKind {
  /// Everyday developer build
  Routine,
  /// Explicit distribution/release build
  Distribution,
}

/// The resolved version identity of the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSpec {
  pub base: String,
  pub snapshot_suffix: Option<String>,
  /// VCS owning the working copy, for working-copy builds
  pub working_copy: Option<VcsKind>,
}

impl VersionSpec {
  pub fn is_working_copy(&self) -> bool {
    self.working_copy.is_some()
  }

  /// The emitted version string
  pub fn version_string(&self) -> String {
    match self.working_copy {
      Some(vcs) => format!("{}+{}", self.base, vcs.marker()),
      None => format!("{}{}", self.base, self.snapshot_suffix.as_deref().unwrap_or("")),
    }
  }

  /// The single-line declaration stored in the version artifact
  pub fn declaration(&self) -> String {
    format!("version='{}'\n", self.version_string())
  }
}

impl fmt::Display for VersionSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.version_string())
  }
}

/// Decide the version for this build
///
/// Returns `None` for a routine build of a tree without VCS metadata; the
/// existing version artifact is then left untouched rather than guessing.
pub fn resolve(
  repo: RepoState,
  release_version: &str,
  snapshot_suffix: Option<&str>,
  kind: BuildKind,
) -> Option<VersionSpec> {
  match (kind, repo) {
    (BuildKind::Distribution, _) => Some(VersionSpec {
      base: release_version.to_string(),
      snapshot_suffix: Some(snapshot_suffix.unwrap_or("").to_string()),
      working_copy: None,
    }),
    (BuildKind::Routine, RepoState::Tracked(vcs)) => Some(VersionSpec {
      base: release_version.to_string(),
      snapshot_suffix: None,
      working_copy: Some(vcs),
    }),
    (BuildKind::Routine, RepoState::Untracked) => None,
  }
}

/// Write the version declaration, replacing the whole file
pub fn write_version_file(path: &Path, spec: &VersionSpec) -> ShipResult<()> {
  write_artifact(path, &spec.declaration())
}

/// Read the version declared by an existing artifact
///
/// Returns `Ok(None)` when the file does not exist or holds no declaration.
pub fn read_version_file(path: &Path) -> ShipResult<Option<String>> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(ShipError::filesystem(path, e)),
  };

  Ok(content.lines().find_map(parse_declaration))
}

fn parse_declaration(line: &str) -> Option<String> {
  let value = line.trim().strip_prefix("version")?.trim_start().strip_prefix('=')?.trim();
  let quote = value.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
  let inner = value.strip_prefix(quote)?.strip_suffix(quote)?;
  Some(inner.to_string())
}

/// What the version stage did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VersionOutcome {
  /// A fresh declaration was written
  Written { spec: VersionSpec, version: String },
  /// Routine build without VCS metadata; the existing artifact was kept
  Untouched { existing: Option<String> },
}

impl VersionOutcome {
  /// The version in force after the stage, if known
  pub fn version(&self) -> Option<&str> {
    match self {
      VersionOutcome::Written { version, .. } => Some(version),
      VersionOutcome::Untouched { existing } => existing.as_deref(),
    }
  }
}

/// Detect, resolve and write the version artifact for a project
///
/// `snapshot_override` replaces the configured snapshot suffix for this run.
pub fn stamp(
  root: &Path,
  config: &ShipConfig,
  kind: BuildKind,
  snapshot_override: Option<&str>,
) -> ShipResult<VersionOutcome> {
  let outcome = plan(root, config, kind, snapshot_override)?;
  let path = root.join(&config.version.file);

  if let VersionOutcome::Written { spec, .. } = &outcome {
    write_version_file(&path, spec)?;
    tracing::info!(version = %spec, path = %path.display(), "wrote version file");
  } else {
    tracing::info!(path = %path.display(), "no VCS metadata found, leaving version file untouched");
  }

  Ok(outcome)
}

/// Resolve without writing anything
pub fn plan(
  root: &Path,
  config: &ShipConfig,
  kind: BuildKind,
  snapshot_override: Option<&str>,
) -> ShipResult<VersionOutcome> {
  if let Some(snapshot) = snapshot_override {
    validate_version_fragment("snapshot", snapshot, true)?;
  }
  let snapshot = snapshot_override.or(config.package.snapshot.as_deref());
  let repo = RepoState::detect(root);
  tracing::debug!(?repo, ?kind, "resolving version");

  match resolve(repo, &config.package.version, snapshot, kind) {
    Some(spec) => Ok(VersionOutcome::Written {
      version: spec.version_string(),
      spec,
    }),
    None => Ok(VersionOutcome::Untouched {
      existing: read_version_file(&root.join(&config.version.file))?,
    }),
  }
}
