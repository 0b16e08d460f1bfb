//! Artifact writes and small path helpers

use crate::core::error::{ShipError, ShipResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Replace `path` wholesale with `contents`
///
/// The data is written to a sibling temporary file first and renamed over the
/// target, so readers see either the old artifact or the new one, never a
/// partial write. Missing parent directories are created.
pub fn write_artifact(path: &Path, contents: &str) -> ShipResult<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).map_err(|e| ShipError::filesystem(parent, e))?;
  }

  let file_name = path
    .file_name()
    .ok_or_else(|| ShipError::message(format!("Artifact path has no file name: {}", path.display())))?;
  let mut tmp_name = std::ffi::OsString::from(".");
  tmp_name.push(file_name);
  tmp_name.push(".shiplog-tmp");
  let tmp_path = path.with_file_name(tmp_name);

  fs::write(&tmp_path, contents).map_err(|e| ShipError::filesystem(&tmp_path, e))?;
  if let Err(e) = fs::rename(&tmp_path, path) {
    let _ = fs::remove_file(&tmp_path);
    return Err(ShipError::filesystem(path, e));
  }

  Ok(())
}

/// Lexically normalise a path (drops `.` and resolves `..` against prior components)
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}

/// True when `inner` is `outer` or lies beneath it
pub fn is_within(outer: &Path, inner: &Path) -> bool {
  normalize_path(inner).starts_with(normalize_path(outer))
}

/// Render an argv for messages
pub fn display_command(argv: &[String]) -> String {
  argv.join(" ")
}
