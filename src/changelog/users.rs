//! Author display names
//!
//! The map is plain text, one `login: Display Name <email>` per line. Blank
//! lines and `#` comments are ignored; a later line for the same login wins.

use crate::core::error::{ConfigError, ShipError, ShipResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Raw author identifier to display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMap {
  names: BTreeMap<String, String>,
}

impl UserMap {
  /// Parse user map text
  pub fn parse(text: &str) -> ShipResult<Self> {
    let mut names = BTreeMap::new();

    for (index, raw) in text.lines().enumerate() {
      let line = raw.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }

      let invalid = || {
        ShipError::Config(ConfigError::InvalidUserMap {
          line: index + 1,
          content: line.to_string(),
        })
      };
      let (login, name) = line.split_once(':').ok_or_else(invalid)?;
      let (login, name) = (login.trim(), name.trim());
      if login.is_empty() || name.is_empty() {
        return Err(invalid());
      }

      names.insert(login.to_string(), name.to_string());
    }

    Ok(Self { names })
  }

  /// Load and parse a user map file
  pub fn load(path: &Path) -> ShipResult<Self> {
    let text = fs::read_to_string(path).map_err(|e| ShipError::filesystem(path, e))?;
    let map = Self::parse(&text)?;
    tracing::debug!(path = %path.display(), users = map.len(), "loaded user map");
    Ok(map)
  }

  /// Display name for an author; unknown authors are returned unchanged
  pub fn display_name<'a>(&'a self, author: &'a str) -> &'a str {
    self.names.get(author).map(String::as_str).unwrap_or(author)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

impl FromIterator<(String, String)> for UserMap {
  fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
    Self {
      names: iter.into_iter().collect(),
    }
  }
}
