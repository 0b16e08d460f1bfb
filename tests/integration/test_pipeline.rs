//! Tests for the pipeline targets

use crate::helpers::*;
use anyhow::Result;

#[cfg(unix)]
#[test]
fn test_build_stamps_working_copy_version() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;

  run_shiplog(&project.path, &["build"])?;

  assert_eq!(project.read_file("version.py")?, "version='0.5+svn'\n");
  assert_eq!(project.read_file("build/stamp")?, "0.5+svn\n");
  assert!(!project.file_exists("ChangeLog"), "routine builds skip the changelog");

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_untracked_build_leaves_version_file() -> Result<()> {
  let project = TestProject::new()?;

  run_shiplog(&project.path, &["build"])?;

  assert!(!project.file_exists("version.py"));
  assert!(project.file_exists("build/stamp"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_dist_packages_changelog_without_marker() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;

  run_shiplog(&project.path, &["dist", "--snapshot", "rc1"])?;

  assert_eq!(project.read_file("version.py")?, "version='0.5rc1'\n");
  let changelog = project.read_file("ChangeLog")?;
  assert!(changelog.contains("(r12)"));
  assert_eq!(project.read_file("build/ChangeLog.packaged")?, changelog);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_failing_test_step_stops_dist() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;
  project.write_config(
    r#"[package]
name = "demo"
version = "0.5"

[changelog]
log_export = "log.xml"

[steps]
build = ["true"]
test = ["sh", "-c", "exit 3"]
package = ["sh", "-c", "touch packaged"]
"#,
  )?;

  let output = shiplog(&project.path, &["dist"])?;

  assert_eq!(output.status.code(), Some(4));
  assert!(stderr(&output).contains("Stage 'test' failed"));
  assert!(!project.file_exists("ChangeLog"));
  assert!(!project.file_exists("packaged"));
  assert_eq!(project.read_file("version.py")?, "version='0.5'\n");

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_malformed_log_stops_dist_before_package() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("log.xml", "<log>")?;

  let output = shiplog(&project.path, &["dist"])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Stage 'changelog' failed"));
  assert!(!project.file_exists("build/ChangeLog.packaged"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_missing_step_command_reports_spawn_failure() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(
    r#"[package]
name = "demo"
version = "0.5"

[steps]
build = ["shiplog-test-no-such-binary"]
"#,
  )?;

  let output = shiplog(&project.path, &["build"])?;

  assert_eq!(output.status.code(), Some(4));
  assert!(stderr(&output).contains("Stage 'build' failed"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_clean_removes_outputs_but_keeps_artifacts() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;
  run_shiplog(&project.path, &["dist"])?;
  assert!(project.file_exists("build/stamp"));

  run_shiplog(&project.path, &["clean"])?;

  assert!(!project.file_exists("build"));
  assert!(project.file_exists("version.py"));
  assert!(project.file_exists("ChangeLog"));

  Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;

  let output = run_shiplog(&project.path, &["dist", "--dry-run"])?;
  let text = stdout(&output);

  assert!(text.contains("DRY RUN: dist"));
  assert!(text.contains("version: 0.5"));
  assert!(text.contains("changelog"));
  assert!(!project.file_exists("version.py"));
  assert!(!project.file_exists("ChangeLog"));

  Ok(())
}

#[test]
fn test_dry_run_json_plan() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;

  let output = run_shiplog(&project.path, &["install", "--dry-run", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["target"], "install");
  assert_eq!(json["working_copy"], "subversion");
  assert_eq!(json["version"], "0.5+svn");
  let stages: Vec<_> = json["stages"]
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["stage"].as_str().unwrap().to_string())
    .collect();
  assert_eq!(stages, vec!["version", "build", "install"]);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_json_report_marks_skipped_stages() -> Result<()> {
  let project = TestProject::new()?.svn_working_copy()?;

  let output = run_shiplog(&project.path, &["doc", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["version"], "0.5+svn");
  assert_eq!(json["stages"][1]["status"], "completed");
  assert_eq!(json["stages"][2]["stage"], "doc");
  assert_eq!(json["stages"][2]["status"], "skipped");

  Ok(())
}

#[test]
fn test_missing_config_is_user_error() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = shiplog(dir.path(), &["build"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("shiplog init"));
  Ok(())
}

#[test]
fn test_empty_step_command_is_config_error() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(
    r#"[package]
name = "demo"
version = "0.5"

[steps]
build = []
"#,
  )?;

  let output = shiplog(&project.path, &["build"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("steps.build"));
  Ok(())
}
