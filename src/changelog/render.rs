//! Changelog document rendering
//!
//! Text output follows the GNU ChangeLog layout, one block per revision:
//!
//! ```text
//! 2006-10-29 11:08 UTC  Jacek Konieczny <jajcus@example.net>  (r678)
//!
//! 	* pyxmpp/jabber/vcard.py, setup.py:
//! 	vcard fixes
//!
//! ```
//!
//! Header lines never start with a tab and body lines always do, which is what
//! lets [`parse_rendered`] read the block structure back.

use super::filter::PathFilter;
use super::log::LogEntry;
use super::users::UserMap;
use crate::core::error::{LogError, ShipError, ShipResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";
/// Width of a rendered timestamp, e.g. `2006-10-29 11:08 UTC`
const TIMESTAMP_WIDTH: usize = 20;

/// Changelog output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogFormat {
  /// GNU ChangeLog style text (default)
  Text,
  /// JSON format for programmatic use
  Json,
}

impl ChangelogFormat {
  /// Parse a `--format` value
  pub fn parse(value: &str) -> ShipResult<Self> {
    match value {
      "text" => Ok(ChangelogFormat::Text),
      "json" => Ok(ChangelogFormat::Json),
      other => Err(ShipError::with_help(
        format!("Unknown changelog format '{}'", other),
        "Use --format text or --format json.",
      )),
    }
  }
}

/// One rendered revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
  pub revision: String,
  /// Display author after user mapping
  pub author: String,
  pub timestamp: DateTime<Utc>,
  /// Changed paths relative to their branch root
  pub paths: Vec<String>,
  pub message: String,
}

impl ChangelogEntry {
  /// Attribute and relativise a retained log entry
  pub fn from_log(entry: &LogEntry, filter: &PathFilter, users: &UserMap) -> Self {
    let mut paths: Vec<String> = Vec::new();
    for relative in entry.affected_paths().filter_map(|path| filter.relative(path)) {
      if !relative.is_empty() && !paths.iter().any(|p| p == relative) {
        paths.push(relative.to_string());
      }
    }

    Self {
      revision: entry.revision.clone(),
      author: users.display_name(&entry.author).replace(['\r', '\n'], " "),
      timestamp: entry.timestamp,
      paths,
      message: entry.message.clone(),
    }
  }

  fn header(&self) -> String {
    format!(
      "{}  {}  (r{})",
      self.timestamp.format(TIMESTAMP_FORMAT),
      self.author,
      self.revision
    )
  }
}

/// The rendered changelog, newest entry first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogDocument {
  pub entries: Vec<ChangelogEntry>,
}

impl ChangelogDocument {
  pub fn new(entries: Vec<ChangelogEntry>) -> Self {
    Self { entries }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Render as ChangeLog text
  pub fn to_text(&self) -> String {
    let mut output = String::new();

    for entry in &self.entries {
      output.push_str(&entry.header());
      output.push_str("\n\n");

      if !entry.paths.is_empty() {
        output.push_str(&format!("\t* {}:\n", entry.paths.join(", ")));
      }

      for line in entry.message.trim_end_matches(['\r', '\n']).lines() {
        output.push('\t');
        output.push_str(line);
        output.push('\n');
      }

      output.push('\n');
    }

    output
  }

  /// Render as JSON
  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    #[derive(Serialize)]
    struct ChangelogJson<'a> {
      entries: &'a [ChangelogEntry],
      total_entries: usize,
    }

    serde_json::to_string_pretty(&ChangelogJson {
      entries: &self.entries,
      total_entries: self.entries.len(),
    })
  }

  /// Render in the specified format
  pub fn render(&self, format: ChangelogFormat) -> ShipResult<String> {
    match format {
      ChangelogFormat::Text => Ok(self.to_text()),
      ChangelogFormat::Json => Ok(self.to_json()?),
    }
  }
}

/// Header of a rendered block, as read back from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeader {
  pub timestamp: DateTime<Utc>,
  pub author: String,
  pub revision: String,
}

/// Read the block headers back from rendered ChangeLog text
pub fn parse_rendered(text: &str) -> Result<Vec<RenderedHeader>, LogError> {
  text
    .lines()
    .enumerate()
    .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('\t'))
    .map(|(index, line)| {
      parse_header(line).ok_or_else(|| LogError::InvalidHeader {
        line: index + 1,
        content: line.to_string(),
      })
    })
    .collect()
}

fn parse_header(line: &str) -> Option<RenderedHeader> {
  let stamp = line.get(..TIMESTAMP_WIDTH)?;
  let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?.and_utc();
  let rest = line.get(TIMESTAMP_WIDTH..)?.strip_prefix("  ")?;
  let (author, revision) = rest.rsplit_once("  (r")?;
  let revision = revision.strip_suffix(')')?;

  Some(RenderedHeader {
    timestamp,
    author: author.to_string(),
    revision: revision.to_string(),
  })
}
