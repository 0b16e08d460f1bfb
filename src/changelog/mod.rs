//! Changelog generation from a Subversion XML log export
//!
//! parse → filter by path → map authors → render → write.
//!
//! The transformation is pure: the export bytes, the filter and the user map
//! go in, a [`ChangelogDocument`] comes out. Only [`generate`] touches the
//! filesystem, and it replaces the artifact in full.

pub mod filter;
pub mod log;
pub mod render;
pub mod users;
mod xml;

pub use filter::PathFilter;
pub use log::{ChangedPath, LogEntry, parse_log};
pub use render::{ChangelogDocument, ChangelogEntry, ChangelogFormat, RenderedHeader, parse_rendered};
pub use users::UserMap;

use crate::core::config::ChangelogConfig;
use crate::core::error::ShipResult;
use crate::core::vcs::LogSource;
use crate::utils::write_artifact;
use std::path::Path;

/// Turn a raw log export into a changelog document
///
/// Entries keep the export's order. Entries whose paths all fall outside the
/// filter are dropped; unknown authors keep their raw identifier.
pub fn transform(log_export: &[u8], filter: &PathFilter, users: &UserMap) -> ShipResult<ChangelogDocument> {
  let entries = parse_log(log_export)?;
  let total = entries.len();
  let retained = filter.apply(entries);
  tracing::debug!(total, retained = retained.len(), filter = filter.pattern(), "filtered log entries");

  Ok(ChangelogDocument::new(
    retained
      .iter()
      .map(|entry| ChangelogEntry::from_log(entry, filter, users))
      .collect(),
  ))
}

/// Write the rendered text, replacing any previous content
pub fn write_changelog(path: &Path, document: &ChangelogDocument) -> ShipResult<()> {
  write_artifact(path, &document.to_text())
}

/// Inputs resolved from configuration for one changelog run
#[derive(Debug, Clone)]
pub struct ChangelogInputs {
  pub source: LogSource,
  pub filter: PathFilter,
  pub users: UserMap,
}

impl ChangelogInputs {
  /// Resolve the source, compile the filter and load the user map
  pub fn from_config(root: &Path, config: &ChangelogConfig) -> ShipResult<Self> {
    let users = match &config.users {
      Some(path) => UserMap::load(&root.join(path))?,
      None => UserMap::default(),
    };

    Ok(Self {
      source: LogSource::from_config(root, config),
      filter: PathFilter::new(&config.path_filter)?,
      users,
    })
  }

  /// Fetch the export and transform it
  pub fn build(&self, root: &Path) -> ShipResult<ChangelogDocument> {
    let export = self.source.fetch(root)?;
    transform(&export, &self.filter, &self.users)
  }
}

/// Produce the changelog artifact configured for a project
pub fn generate(root: &Path, config: &ChangelogConfig) -> ShipResult<ChangelogDocument> {
  let document = ChangelogInputs::from_config(root, config)?.build(root)?;
  let path = root.join(&config.file);
  write_changelog(&path, &document)?;
  tracing::info!(entries = document.len(), path = %path.display(), "wrote changelog");
  Ok(document)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::error::{LogError, ShipError};
  use std::fs;
  use std::path::PathBuf;

  const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<log>
<logentry revision="3">
<author>jdoe</author>
<date>2010-03-03T10:00:00.000000Z</date>
<paths><path action="M">/trunk/foo</path></paths>
<msg>trunk change</msg>
</logentry>
<logentry revision="2">
<author>alice</author>
<date>2010-03-02T10:00:00.000000Z</date>
<paths><path action="M">/branches/dev/bar</path></paths>
<msg>branch change</msg>
</logentry>
<logentry revision="1">
<author>alice</author>
<date>2010-03-01T10:00:00.000000Z</date>
<paths><path action="A">/trunk</path></paths>
<msg>initial
import</msg>
</logentry>
</log>
"#;

  #[test]
  fn test_transform_filters_and_keeps_order() {
    let filter = PathFilter::new("trunk").unwrap();
    let users = UserMap::parse("alice: Alice Example <alice@example.org>\n").unwrap();

    let doc = transform(EXPORT.as_bytes(), &filter, &users).unwrap();

    let revisions: Vec<_> = doc.entries.iter().map(|e| e.revision.as_str()).collect();
    assert_eq!(revisions, vec!["3", "1"]);
    assert_eq!(doc.entries[0].author, "jdoe");
    assert_eq!(doc.entries[1].author, "Alice Example <alice@example.org>");
    assert_eq!(doc.entries[1].message, "initial\nimport");
  }

  #[test]
  fn test_transform_output_mentions_only_trunk_entry() {
    let filter = PathFilter::new("trunk").unwrap();
    let text = transform(EXPORT.as_bytes(), &filter, &UserMap::default())
      .unwrap()
      .to_text();

    assert!(text.contains("trunk change"));
    assert!(!text.contains("branch change"));
    assert!(text.find("trunk change").unwrap() < text.find("initial").unwrap());
  }

  #[test]
  fn test_render_reparse_count_matches_retained() {
    let filter = PathFilter::new("branches/[^/]+|trunk").unwrap();
    let doc = transform(EXPORT.as_bytes(), &filter, &UserMap::default()).unwrap();
    assert_eq!(doc.len(), 3);
    assert_eq!(parse_rendered(&doc.to_text()).unwrap().len(), doc.len());
  }

  #[test]
  fn test_transform_malformed_export() {
    let err = transform(b"<log><logentry>", &PathFilter::new("trunk").unwrap(), &UserMap::default()).unwrap_err();
    assert!(matches!(err, ShipError::Parse(LogError::Malformed { .. })));
  }

  #[test]
  fn test_generate_overwrites_artifact() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("log.xml"), EXPORT).unwrap();
    fs::write(dir.path().join("users"), "jdoe: John Doe\n").unwrap();
    fs::write(dir.path().join("ChangeLog"), "stale content that must disappear\n".repeat(50)).unwrap();

    let config = ChangelogConfig {
      file: PathBuf::from("ChangeLog"),
      path_filter: "trunk".to_string(),
      users: Some(PathBuf::from("users")),
      log_export: Some(PathBuf::from("log.xml")),
      ..ChangelogConfig::default()
    };

    let doc = generate(dir.path(), &config).unwrap();
    let written = fs::read_to_string(dir.path().join("ChangeLog")).unwrap();

    assert_eq!(doc.len(), 2);
    assert_eq!(written, doc.to_text());
    assert!(written.starts_with("2010-03-03 10:00 UTC  John Doe  (r3)\n"));
    assert!(!written.contains("stale"));
  }

  #[test]
  fn test_generate_bad_filter_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ChangelogConfig {
      path_filter: "[".to_string(),
      log_export: Some(PathBuf::from("log.xml")),
      ..ChangelogConfig::default()
    };
    assert!(matches!(generate(dir.path(), &config).unwrap_err(), ShipError::Config(_)));
  }
}
