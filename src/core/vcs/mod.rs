pub mod log_source;

pub use log_source::LogSource;

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Version-control system owning a working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
  Subversion,
  Git,
}

impl VcsKind {
  /// Metadata entry marking a working copy root
  pub fn metadata_dir(self) -> &'static str {
    match self {
      VcsKind::Subversion => ".svn",
      VcsKind::Git => ".git",
    }
  }

  /// Marker appended to working-copy versions (`0.5+svn`)
  pub fn marker(self) -> &'static str {
    match self {
      VcsKind::Subversion => "svn",
      VcsKind::Git => "git",
    }
  }
}

impl fmt::Display for VcsKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.marker())
  }
}

/// Whether the project tree is a working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
  Tracked(VcsKind),
  Untracked,
}

impl RepoState {
  /// Look for VCS metadata at `root`; Subversion wins when both are present.
  ///
  /// Git worktrees use a `.git` file rather than a directory, so any entry counts.
  pub fn detect(root: &Path) -> Self {
    [VcsKind::Subversion, VcsKind::Git]
      .into_iter()
      .find(|kind| root.join(kind.metadata_dir()).exists())
      .map(RepoState::Tracked)
      .unwrap_or(RepoState::Untracked)
  }

  pub fn is_tracked(&self) -> bool {
    matches!(self, RepoState::Tracked(_))
  }
}
