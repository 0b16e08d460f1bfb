//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Log export with one trunk, one branch and one tag revision, newest first
pub const SAMPLE_LOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<log>
<logentry revision="12">
<author>jdoe</author>
<date>2010-05-03T09:30:00.000000Z</date>
<paths>
<path kind="file" action="M">/trunk/foo</path>
</paths>
<msg>Fix foo &amp; friends</msg>
</logentry>
<logentry revision="11">
<author>alice</author>
<date>2010-05-02T09:30:00.000000Z</date>
<paths>
<path kind="file" action="M">/branches/dev/bar</path>
</paths>
<msg>Branch work</msg>
</logentry>
<logentry revision="10">
<author>alice</author>
<date>2010-05-01T09:30:00.000000Z</date>
<paths>
<path kind="dir" action="A">/tags/0.4</path>
</paths>
<msg>Tag 0.4</msg>
</logentry>
</log>
"#;

/// A throwaway project with a shiplog.toml
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Project whose steps all succeed, reading the log from `log.xml`
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    let project = Self { _root: root, path };

    project.write_config(
      r#"[package]
name = "demo"
version = "0.5"

[changelog]
log_export = "log.xml"
users = "users.map"

[steps]
build = ["sh", "-c", "mkdir -p build && echo \"$SHIPLOG_VERSION\" > build/stamp"]
test = ["true"]
install = ["true"]
package = ["sh", "-c", "cp \"$SHIPLOG_CHANGELOG\" build/ChangeLog.packaged"]
"#,
    )?;
    project.write_file("log.xml", SAMPLE_LOG)?;
    project.write_file("users.map", "# login: Name\nalice: Alice Example <alice@example.org>\n")?;

    Ok(project)
  }

  /// Mark the project as a Subversion working copy
  pub fn svn_working_copy(self) -> Result<Self> {
    std::fs::create_dir_all(self.path.join(".svn"))?;
    Ok(self)
  }

  pub fn write_config(&self, content: &str) -> Result<()> {
    self.write_file("shiplog.toml", content)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run the shiplog binary, failing on a non-zero exit
pub fn run_shiplog(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = shiplog(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "shiplog command failed: shiplog {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the shiplog binary and return the output whatever the exit status
pub fn shiplog(cwd: &Path, args: &[&str]) -> Result<Output> {
  let shiplog_bin = env!("CARGO_BIN_EXE_shiplog");

  Command::new(shiplog_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run shiplog")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
