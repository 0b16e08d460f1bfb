//! Tests for the `changelog` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_changelog_filters_and_maps_authors() -> Result<()> {
  let project = TestProject::new()?;

  run_shiplog(&project.path, &["changelog"])?;
  let changelog = project.read_file("ChangeLog")?;

  assert_eq!(
    changelog,
    "2010-05-03 09:30 UTC  jdoe  (r12)\n\
     \n\
     \t* foo:\n\
     \tFix foo & friends\n\
     \n\
     2010-05-02 09:30 UTC  Alice Example <alice@example.org>  (r11)\n\
     \n\
     \t* bar:\n\
     \tBranch work\n\
     \n"
  );
  assert!(!changelog.contains("Tag 0.4"));

  Ok(())
}

#[test]
fn test_changelog_trunk_only_filter() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(
    r#"[package]
name = "demo"
version = "0.5"

[changelog]
log_export = "log.xml"
path_filter = "trunk"
"#,
  )?;

  let output = run_shiplog(&project.path, &["changelog", "--output", "-"])?;
  let text = stdout(&output);

  assert!(text.contains("Fix foo"));
  assert!(!text.contains("Branch work"));
  assert!(!project.file_exists("ChangeLog"), "stdout output leaves the artifact alone");

  Ok(())
}

#[test]
fn test_changelog_json_output() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_shiplog(&project.path, &["changelog", "--output", "-", "--format", "json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["total_entries"], 2);
  assert_eq!(json["entries"][0]["revision"], "12");
  assert_eq!(json["entries"][1]["author"], "Alice Example <alice@example.org>");

  Ok(())
}

#[test]
fn test_changelog_overwrites_previous_artifact() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("ChangeLog", &"stale line\n".repeat(200))?;

  run_shiplog(&project.path, &["changelog"])?;

  let changelog = project.read_file("ChangeLog")?;
  assert!(!changelog.contains("stale"));
  assert!(changelog.starts_with("2010-05-03 09:30 UTC  jdoe  (r12)\n"));

  Ok(())
}

#[test]
fn test_changelog_input_override() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(
    "other.xml",
    r#"<log><logentry revision="99"><author>bob</author><date>2011-01-01T00:00:00Z</date>
<paths><path action="M">/trunk/x</path></paths><msg>other</msg></logentry></log>"#,
  )?;

  run_shiplog(&project.path, &["changelog", "--input", "other.xml", "--output", "out/CHANGES"])?;

  let changelog = project.read_file("out/CHANGES")?;
  assert!(changelog.starts_with("2011-01-01 00:00 UTC  bob  (r99)\n"));
  assert!(!project.file_exists("ChangeLog"));

  Ok(())
}

#[test]
fn test_malformed_log_exits_with_parse_code() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("log.xml", "<log><logentry revision=\"1\">")?;

  let output = shiplog(&project.path, &["changelog"])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Malformed log export"));
  assert!(!project.file_exists("ChangeLog"));

  Ok(())
}

#[test]
fn test_unknown_format_is_rejected() -> Result<()> {
  let project = TestProject::new()?;
  let output = shiplog(&project.path, &["changelog", "--format", "yaml"])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}
