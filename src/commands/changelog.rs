//! `shiplog changelog` - generate the changelog outside a pipeline run
//!
//! Reads the export from `--input` (or the configured source), applies the
//! configured path filter and user map, and writes the result to `--output`
//! (`-` for stdout, default: the configured changelog file).

use crate::changelog::{ChangelogFormat, ChangelogInputs};
use crate::core::context::ProjectContext;
use crate::core::error::ShipResult;
use crate::core::vcs::LogSource;
use crate::utils::write_artifact;
use std::path::PathBuf;

/// Run the changelog command
pub fn run_changelog(
  ctx: &ProjectContext,
  input: Option<PathBuf>,
  output: Option<String>,
  format: String,
) -> ShipResult<()> {
  let format = ChangelogFormat::parse(&format)?;

  let mut inputs = ChangelogInputs::from_config(ctx.project_root(), &ctx.config.changelog)?;
  if let Some(input) = input {
    inputs.source = LogSource::File(ctx.root.join(input));
  }

  let document = inputs.build(ctx.project_root())?;
  let rendered = document.render(format)?;

  match output.as_deref() {
    Some("-") => print!("{}", rendered),
    Some(path) => {
      let path = ctx.root.join(path);
      write_artifact(&path, &rendered)?;
      eprintln!("📝 {} entries -> {}", document.len(), path.display());
    }
    None => {
      let path = ctx.changelog_file();
      write_artifact(&path, &rendered)?;
      eprintln!("📝 {} entries -> {}", document.len(), path.display());
    }
  }

  Ok(())
}
