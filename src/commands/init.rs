use std::path::Path;

use crate::core::config::ShipConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::vcs::RepoState;

/// Version written into a fresh configuration
const INITIAL_VERSION: &str = "0.1";

/// Run the init command to create shiplog.toml
pub fn run_init(project_root: &Path, force: bool) -> ShipResult<()> {
  if let Some(existing) = ShipConfig::find_config_path(project_root)
    && !force
  {
    return Err(ShipError::with_help(
      format!("Configuration already exists: {}", existing.display()),
      "Pass --force to overwrite it.",
    ));
  }

  let name = project_root
    .file_name()
    .and_then(|n| n.to_str())
    .unwrap_or("project")
    .to_string();

  let config = ShipConfig::new(name, INITIAL_VERSION);
  let path = config.save(project_root)?;

  println!("✅ Initialized shiplog for '{}'", config.package.name);
  println!("   Configuration saved to: {}", path.display());
  match RepoState::detect(project_root) {
    RepoState::Tracked(vcs) => println!("   Detected {} working copy", vcs),
    RepoState::Untracked => println!("   No VCS metadata found; routine builds will not touch the version file"),
  }
  println!("\n🚀 Next steps:");
  println!("   1. Set [package] version and fill in the [steps] commands");
  println!("   2. Run: shiplog build --dry-run");

  Ok(())
}
