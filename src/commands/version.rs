//! `shiplog version` - show (and optionally stamp) the resolved version

use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::version::{self, BuildKind, VersionOutcome};

/// Run the version command
///
/// Without `--write` nothing on disk changes.
pub fn run_version(
  ctx: &ProjectContext,
  dist: bool,
  snapshot: Option<String>,
  write: bool,
  json: bool,
) -> ShipResult<()> {
  let kind = if dist {
    BuildKind::Distribution
  } else {
    BuildKind::Routine
  };

  let outcome = if write {
    version::stamp(ctx.project_root(), &ctx.config, kind, snapshot.as_deref())?
  } else {
    version::plan(ctx.project_root(), &ctx.config, kind, snapshot.as_deref())?
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    return Ok(());
  }

  match &outcome {
    VersionOutcome::Written { version, .. } => {
      println!("{}", version);
      if write {
        eprintln!("📝 wrote {}", ctx.version_file().display());
      }
    }
    VersionOutcome::Untouched { existing } => {
      if let Some(existing) = existing {
        println!("{}", existing);
      }
      eprintln!(
        "⚠️  {} is not a working copy; {} left as is",
        ctx.project_root().display(),
        ctx.config.version.file.display()
      );
    }
  }

  Ok(())
}
