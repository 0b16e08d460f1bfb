//! Log entries read from a Subversion XML log export

use super::xml::{Element, parse_document};
use crate::core::error::LogError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Author recorded by Subversion for revisions without one
pub const NO_AUTHOR: &str = "(no author)";

/// One path touched by a revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedPath {
  pub path: String,
  /// `A`, `M`, `D` or `R`
  #[serde(skip_serializing_if = "Option::is_none")]
  pub action: Option<String>,
}

impl ChangedPath {
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      action: None,
    }
  }
}

/// A single revision from the log export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
  pub revision: String,
  pub author: String,
  pub timestamp: DateTime<Utc>,
  pub paths: Vec<ChangedPath>,
  pub message: String,
}

impl LogEntry {
  /// Paths touched by this revision
  pub fn affected_paths(&self) -> impl Iterator<Item = &str> {
    self.paths.iter().map(|p| p.path.as_str())
  }
}

/// Parse a raw export into entries, preserving export order (newest first)
pub fn parse_log(export: &[u8]) -> Result<Vec<LogEntry>, LogError> {
  let text = std::str::from_utf8(export).map_err(|e| LogError::InvalidUtf8 {
    offset: e.valid_up_to(),
  })?;
  let root = parse_document(text)?;

  if root.name != "log" {
    return Err(LogError::UnexpectedRoot { name: root.name });
  }

  root
    .elements()
    .filter(|element| element.name == "logentry")
    .map(entry_from_element)
    .collect()
}

fn entry_from_element(element: &Element) -> Result<LogEntry, LogError> {
  let revision = element
    .attribute("revision")
    .map(str::trim)
    .filter(|r| !r.is_empty())
    .ok_or(LogError::MissingField {
      revision: None,
      field: "revision",
    })?
    .to_string();
  if !revision.bytes().all(|b| b.is_ascii_digit()) {
    return Err(LogError::InvalidRevision { value: revision });
  }

  let raw_date = element
    .child("date")
    .map(|date| date.text())
    .ok_or_else(|| LogError::MissingField {
      revision: Some(revision.clone()),
      field: "date",
    })?;
  let timestamp = DateTime::parse_from_rfc3339(raw_date.trim())
    .map_err(|_| LogError::InvalidDate {
      revision: revision.clone(),
      value: raw_date.trim().to_string(),
    })?
    .with_timezone(&Utc);

  let author = element
    .child("author")
    .map(|author| author.text().trim().to_string())
    .filter(|author| !author.is_empty())
    .unwrap_or_else(|| NO_AUTHOR.to_string());

  let paths = element
    .child("paths")
    .map(|paths| {
      paths
        .elements()
        .filter(|path| path.name == "path")
        .map(|path| ChangedPath {
          path: path.text().trim().to_string(),
          action: path.attribute("action").map(str::to_string),
        })
        .filter(|path| !path.path.is_empty())
        .collect()
    })
    .unwrap_or_default();

  let message = element.child("msg").map(|msg| msg.text()).unwrap_or_default();

  Ok(LogEntry {
    revision,
    author,
    timestamp,
    paths,
    message,
  })
}
