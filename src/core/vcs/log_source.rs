//! Log export acquisition
//!
//! The changelog is built from `svn log -v --xml` output. It can come from a
//! file written earlier (handy for exported trees and tests) or be produced on
//! demand by running the configured command inside the project root.

use crate::core::config::ChangelogConfig;
use crate::core::error::{ShipError, ShipResult, SubprocessError};
use crate::utils::display_command;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Where the structured log export comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
  /// Pre-generated export file
  File(PathBuf),
  /// Command printing the export on stdout
  Command(Vec<String>),
}

impl LogSource {
  /// Pick the source from configuration; an explicit file wins over the command
  pub fn from_config(root: &Path, config: &ChangelogConfig) -> Self {
    match &config.log_export {
      Some(path) => LogSource::File(root.join(path)),
      None => LogSource::Command(config.log_command.clone()),
    }
  }

  /// Read the raw export bytes
  pub fn fetch(&self, root: &Path) -> ShipResult<Vec<u8>> {
    match self {
      LogSource::File(path) => {
        tracing::debug!(path = %path.display(), "reading log export");
        fs::read(path).map_err(|e| ShipError::filesystem(path, e))
      }
      LogSource::Command(argv) => run_export_command(root, argv),
    }
  }
}

/// Run the export command and capture its stdout
fn run_export_command(root: &Path, argv: &[String]) -> ShipResult<Vec<u8>> {
  let (program, args) = argv
    .split_first()
    .ok_or_else(|| ShipError::message("Log export command is empty"))?;
  let command_line = display_command(argv);
  tracing::debug!(command = %command_line, "running log export command");

  let output = isolated_cmd(root, program)
    .args(args)
    .stdin(Stdio::null())
    .output()
    .map_err(|source| {
      ShipError::Subprocess(SubprocessError::Spawn {
        command: command_line.clone(),
        source,
      })
    })?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
      tracing::warn!(command = %command_line, stderr = %stderr.trim(), "log export command failed");
    }
    return Err(ShipError::Subprocess(SubprocessError::Exited {
      command: command_line,
      code: output.status.code(),
    }));
  }

  Ok(output.stdout)
}

/// Create a command with an isolated environment
///
/// - Sets working directory to the project root
/// - Clears environment variables
/// - Whitelists only PATH and HOME
/// - Forces the C locale so messages stay untranslated
fn isolated_cmd(root: &Path, program: &str) -> Command {
  let mut cmd = Command::new(program);
  cmd.current_dir(root);

  cmd.env_clear();
  if let Ok(path) = std::env::var("PATH") {
    cmd.env("PATH", path);
  }
  if let Ok(home) = std::env::var("HOME") {
    cmd.env("HOME", home);
  }
  cmd.env("LC_ALL", "C");

  cmd
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_config_prefers_file() {
    let mut config = ChangelogConfig::default();
    assert_eq!(
      LogSource::from_config(Path::new("/p"), &config),
      LogSource::Command(vec!["svn".into(), "log".into(), "-v".into(), "--xml".into()])
    );

    config.log_export = Some(PathBuf::from("log.xml"));
    assert_eq!(
      LogSource::from_config(Path::new("/p"), &config),
      LogSource::File(PathBuf::from("/p/log.xml"))
    );
  }

  #[test]
  fn test_fetch_missing_file_is_filesystem_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = LogSource::File(dir.path().join("missing.xml"));
    let err = source.fetch(dir.path()).unwrap_err();
    assert!(matches!(err, ShipError::Filesystem { .. }));
  }

  #[test]
  fn test_fetch_empty_command() {
    let dir = tempfile::tempdir().unwrap();
    assert!(LogSource::Command(Vec::new()).fetch(dir.path()).is_err());
  }

  #[cfg(unix)]
  #[test]
  fn test_fetch_command_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = LogSource::Command(vec!["sh".into(), "-c".into(), "printf '<log/>'".into()]);
    assert_eq!(source.fetch(dir.path()).unwrap(), b"<log/>");
  }

  #[cfg(unix)]
  #[test]
  fn test_fetch_command_failure() {
    let dir = tempfile::tempdir().unwrap();
    let source = LogSource::Command(vec!["sh".into(), "-c".into(), "exit 3".into()]);
    let err = source.fetch(dir.path()).unwrap_err();
    assert!(matches!(
      err,
      ShipError::Subprocess(SubprocessError::Exited { code: Some(3), .. })
    ));
  }
}
