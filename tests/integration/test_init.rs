//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_creates_config() -> Result<()> {
  let temp = tempfile::TempDir::new()?;
  let path = temp.path();

  run_shiplog(path, &["init"])?;

  let config = std::fs::read_to_string(path.join("shiplog.toml"))?;
  assert!(config.contains("[package]"));
  assert!(config.contains("version = \"0.1\""));
  assert!(config.contains("path_filter"));

  Ok(())
}

#[test]
fn test_init_refuses_existing_config() -> Result<()> {
  let project = TestProject::new()?;
  let before = project.read_file("shiplog.toml")?;

  let output = shiplog(&project.path, &["init"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--force"));
  assert_eq!(project.read_file("shiplog.toml")?, before);

  run_shiplog(&project.path, &["init", "--force"])?;
  assert_ne!(project.read_file("shiplog.toml")?, before);

  Ok(())
}

#[test]
fn test_initialized_project_builds() -> Result<()> {
  let temp = tempfile::TempDir::new()?;
  std::fs::create_dir(temp.path().join(".git"))?;

  run_shiplog(temp.path(), &["init"])?;
  let output = run_shiplog(temp.path(), &["build"])?;

  assert!(stdout(&output).contains("build finished (0.1+git)"));
  assert_eq!(
    std::fs::read_to_string(temp.path().join("version.py"))?,
    "version='0.1+git'\n"
  );

  Ok(())
}
