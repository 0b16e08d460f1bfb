//! Removal of transient build outputs
//!
//! Only paths listed under `[clean]` are touched. A listed path that holds the
//! version artifact, the changelog or the configuration is skipped.

use crate::core::config::ShipConfig;
use crate::core::context::ProjectContext;
use crate::core::error::{ShipError, ShipResult};
use crate::utils::is_within;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

/// What a clean run did, per configured path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
  pub removed: Vec<PathBuf>,
  /// Skipped because they contain a release artifact
  pub protected: Vec<PathBuf>,
  /// Nothing to remove
  pub missing: Vec<PathBuf>,
}

/// Remove the configured build outputs
pub fn clean(ctx: &ProjectContext) -> ShipResult<CleanReport> {
  ctx.config.clean.validate()?;

  let mut guarded = vec![ctx.version_file(), ctx.changelog_file()];
  if let Some(config_path) = ShipConfig::find_config_path(ctx.project_root()) {
    guarded.push(config_path);
  }

  let mut report = CleanReport::default();
  for relative in &ctx.config.clean.paths {
    let target = ctx.root.join(relative);

    if guarded.iter().any(|artifact| is_within(&target, artifact)) {
      tracing::warn!(path = %relative.display(), "clean path holds a release artifact, skipping");
      report.protected.push(relative.clone());
      continue;
    }

    let metadata = match fs::symlink_metadata(&target) {
      Ok(metadata) => metadata,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        report.missing.push(relative.clone());
        continue;
      }
      Err(e) => return Err(ShipError::filesystem(&target, e)),
    };

    let removal = if metadata.is_dir() {
      fs::remove_dir_all(&target)
    } else {
      fs::remove_file(&target)
    };
    removal.map_err(|e| ShipError::filesystem(&target, e))?;

    tracing::info!(path = %relative.display(), "removed");
    report.removed.push(relative.clone());
  }

  Ok(report)
}
