//! Tests for the `version` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_working_copy_version_has_marker() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;

  let output = run_shiplog(&project.path, &["version"])?;
  assert_eq!(stdout(&output).trim(), "0.5+svn");
  assert!(!project.file_exists("version.py"), "plain `version` writes nothing");

  run_shiplog(&project.path, &["version", "--write"])?;
  assert_eq!(project.read_file("version.py")?, "version='0.5+svn'\n");

  Ok(())
}

#[test]
fn test_distribution_version_uses_snapshot() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;

  let output = run_shiplog(&project.path, &["version", "--dist"])?;
  assert_eq!(stdout(&output).trim(), "0.5");

  let output = run_shiplog(&project.path, &["version", "--dist", "--snapshot", "rc1"])?;
  assert_eq!(stdout(&output).trim(), "0.5rc1");

  Ok(())
}

#[test]
fn test_untracked_version_reports_existing_file() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("version.py", "version='0.4'\n")?;

  let output = run_shiplog(&project.path, &["version", "--write"])?;

  assert_eq!(stdout(&output).trim(), "0.4");
  assert!(stderr(&output).contains("not a working copy"));
  assert_eq!(project.read_file("version.py")?, "version='0.4'\n");

  Ok(())
}

#[test]
fn test_version_json() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;

  let output = run_shiplog(&project.path, &["version", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["status"], "written");
  assert_eq!(json["version"], "0.5+svn");
  assert_eq!(json["spec"]["base"], "0.5");

  Ok(())
}

#[test]
fn test_invalid_snapshot_is_rejected() -> Result<()> {
  let project = TestProject::new()?;

  let output = shiplog(&project.path, &["version", "--dist", "--snapshot", "a'b"])?;

  assert_eq!(output.status.code(), Some(1));
  Ok(())
}
