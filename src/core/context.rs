//! Project context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ProjectContext::load() -> &ProjectContext
//!   |
//!   v
//! commands/pipeline.rs, version.rs, changelog.rs:
//!   fn run_*(ctx: &ProjectContext, ...)
//! ```

use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;
use crate::core::vcs::RepoState;
use std::path::{Path, PathBuf};

/// Everything a run needs to know about the project, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory
  pub root: PathBuf,

  /// Loaded shiplog.toml
  pub config: ShipConfig,
}

impl ProjectContext {
  /// Load the context for a project root.
  pub fn load(project_root: &Path) -> ShipResult<Self> {
    let config = ShipConfig::load(project_root)?;
    Ok(Self::new(project_root, config))
  }

  /// Build a context from an already-loaded config
  pub fn new(project_root: &Path, config: ShipConfig) -> Self {
    Self {
      root: project_root.to_path_buf(),
      config,
    }
  }

  /// Get project root as Path reference (convenience)
  pub fn project_root(&self) -> &Path {
    &self.root
  }

  /// Inspect the project root for version-control metadata
  pub fn repo_state(&self) -> RepoState {
    RepoState::detect(&self.root)
  }

  /// Absolute path of the version artifact
  pub fn version_file(&self) -> PathBuf {
    self.root.join(&self.config.version.file)
  }

  /// Absolute path of the changelog artifact
  pub fn changelog_file(&self) -> PathBuf {
    self.root.join(&self.config.changelog.file)
  }
}
