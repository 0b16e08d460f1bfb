//! Path-based entry filtering
//!
//! A filter is one regular expression anchored at the start of a changed path
//! (a leading `/` is optional) and required to end on a segment boundary, so
//! `trunk` matches `/trunk/foo` and `trunk` but not `trunk2/foo`.

use super::log::LogEntry;
use crate::core::error::{ConfigError, ShipError, ShipResult};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct PathFilter {
  pattern: String,
  regex: Regex,
}

impl PathFilter {
  /// Compile an inclusion pattern such as `branches/[^/]+|trunk`
  pub fn new(pattern: &str) -> ShipResult<Self> {
    let anchored = format!(r"^/?(?:{})(?:/|$)", pattern);
    let regex = Regex::new(&anchored).map_err(|e| {
      ShipError::Config(ConfigError::InvalidPathFilter {
        pattern: pattern.to_string(),
        reason: e.to_string(),
      })
    })?;

    Ok(Self {
      pattern: pattern.to_string(),
      regex,
    })
  }

  /// The pattern as configured
  pub fn pattern(&self) -> &str {
    &self.pattern
  }

  pub fn matches(&self, path: &str) -> bool {
    self.regex.is_match(path)
  }

  /// Path relative to the matched branch root, `None` if the path does not match
  ///
  /// `/trunk/pkg/mod.py` becomes `pkg/mod.py`; the branch root itself becomes `""`.
  pub fn relative<'a>(&self, path: &'a str) -> Option<&'a str> {
    self.regex.find(path).map(|m| &path[m.end()..])
  }

  /// True if any affected path of the entry matches
  pub fn is_relevant(&self, entry: &LogEntry) -> bool {
    entry.affected_paths().any(|path| self.matches(path))
  }

  /// Keep relevant entries, preserving their order
  pub fn apply(&self, entries: Vec<LogEntry>) -> Vec<LogEntry> {
    entries.into_iter().filter(|entry| self.is_relevant(entry)).collect()
  }
}
