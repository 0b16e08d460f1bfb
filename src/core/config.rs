use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Default inclusion pattern: any named branch, or the main line
pub const DEFAULT_PATH_FILTER: &str = "branches/[^/]+|trunk";

/// Configuration for shiplog
/// Searched in order: shiplog.toml, .shiplog.toml, .config/shiplog.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
  pub package: PackageConfig,
  #[serde(default)]
  pub version: VersionConfig,
  #[serde(default)]
  pub changelog: ChangelogConfig,
  #[serde(default)]
  pub steps: StepsConfig,
  #[serde(default)]
  pub clean: CleanConfig,
}

/// Package identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
  pub name: String,
  /// Release version, e.g. "0.5"
  pub version: String,
  /// Suffix appended on distribution builds, e.g. "rc1" or a date
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub snapshot: Option<String>,
}

/// Version artifact location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConfig {
  /// File receiving the `version='...'` declaration
  #[serde(default = "default_version_file")]
  pub file: PathBuf,
}

fn default_version_file() -> PathBuf {
  PathBuf::from("version.py")
}

impl Default for VersionConfig {
  fn default() -> Self {
    Self {
      file: default_version_file(),
    }
  }
}

/// Changelog generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogConfig {
  /// Rendered changelog artifact
  #[serde(default = "default_changelog_file")]
  pub file: PathBuf,

  /// Inclusion pattern for changed paths
  #[serde(default = "default_path_filter")]
  pub path_filter: String,

  /// User map (`login: Display Name` per line)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub users: Option<PathBuf>,

  /// Read the log export from this file instead of running `log_command`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub log_export: Option<PathBuf>,

  /// Command printing the log export on stdout
  #[serde(default = "default_log_command")]
  pub log_command: Vec<String>,
}

fn default_changelog_file() -> PathBuf {
  PathBuf::from("ChangeLog")
}

fn default_path_filter() -> String {
  DEFAULT_PATH_FILTER.to_string()
}

fn default_log_command() -> Vec<String> {
  vec!["svn".to_string(), "log".to_string(), "-v".to_string(), "--xml".to_string()]
}

impl Default for ChangelogConfig {
  fn default() -> Self {
    Self {
      file: default_changelog_file(),
      path_filter: default_path_filter(),
      users: None,
      log_export: None,
      log_command: default_log_command(),
    }
  }
}

/// External step commands (argv arrays); unset steps are skipped
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StepsConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub test: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub install: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub doc: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub clean: Option<Vec<String>>,
}

/// Transient build outputs removed by `clean`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
  #[serde(default = "default_clean_paths")]
  pub paths: Vec<PathBuf>,
}

fn default_clean_paths() -> Vec<PathBuf> {
  vec![PathBuf::from("build")]
}

impl Default for CleanConfig {
  fn default() -> Self {
    Self {
      paths: default_clean_paths(),
    }
  }
}

/// Check a version fragment can be embedded in `version='...'`
pub fn validate_version_fragment(field: &str, value: &str, allow_empty: bool) -> ShipResult<()> {
  if value.is_empty() && !allow_empty {
    return Err(ShipError::Config(ConfigError::InvalidValue {
      field: field.to_string(),
      reason: "must not be empty".to_string(),
    }));
  }

  if let Some(bad) = value.chars().find(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\')) {
    return Err(ShipError::Config(ConfigError::InvalidValue {
      field: field.to_string(),
      reason: format!("must not contain {:?}", bad),
    }));
  }

  Ok(())
}

impl StepsConfig {
  /// Configured steps with their `steps.<name>` field
  fn configured(&self) -> impl Iterator<Item = (&'static str, &Vec<String>)> {
    [
      ("steps.build", &self.build),
      ("steps.test", &self.test),
      ("steps.install", &self.install),
      ("steps.doc", &self.doc),
      ("steps.package", &self.package),
      ("steps.clean", &self.clean),
    ]
    .into_iter()
    .filter_map(|(field, argv)| argv.as_ref().map(|argv| (field, argv)))
  }

  /// Reject configured steps without a program
  pub fn validate(&self) -> ShipResult<()> {
    for (field, argv) in self.configured() {
      if argv.first().is_none_or(|program| program.trim().is_empty()) {
        return Err(ShipError::Config(ConfigError::InvalidValue {
          field: field.to_string(),
          reason: "must name a command".to_string(),
        }));
      }
    }
    Ok(())
  }
}

impl CleanConfig {
  /// Reject paths that could reach outside the project root
  pub fn validate(&self) -> ShipResult<()> {
    for path in &self.paths {
      let escapes = path.as_os_str().is_empty()
        || path
          .components()
          .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
      if escapes {
        return Err(ShipError::Config(ConfigError::UnsafeCleanPath { path: path.clone() }));
      }
    }
    Ok(())
  }
}

impl ShipConfig {
  /// Find config file in search order: shiplog.toml, .shiplog.toml, .config/shiplog.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("shiplog.toml"),
      path.join(".shiplog.toml"),
      path.join(".config").join("shiplog.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from shiplog.toml (searches multiple locations)
  pub fn load(path: &Path) -> ShipResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      ShipError::Config(ConfigError::NotFound {
        project_root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path).map_err(|e| ShipError::filesystem(&config_path, e))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded configuration");
    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> ShipResult<Self> {
    let config: ShipConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate field values
  pub fn validate(&self) -> ShipResult<()> {
    validate_version_fragment("package.version", &self.package.version, false)?;
    if let Some(ref snapshot) = self.package.snapshot {
      validate_version_fragment("package.snapshot", snapshot, true)?;
    }
    if self.changelog.log_export.is_none() && self.changelog.log_command.is_empty() {
      return Err(ShipError::Config(ConfigError::InvalidValue {
        field: "changelog.log_command".to_string(),
        reason: "must name a command when changelog.log_export is not set".to_string(),
      }));
    }
    self.steps.validate()?;
    self.clean.validate()
  }

  /// Save config to shiplog.toml (default location)
  pub fn save(&self, path: &Path) -> ShipResult<PathBuf> {
    let config_path = path.join("shiplog.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).map_err(|e| ShipError::filesystem(&config_path, e))?;
    Ok(config_path)
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }

  /// Create a config with defaults for the given package
  pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      package: PackageConfig {
        name: name.into(),
        version: version.into(),
        snapshot: None,
      },
      version: VersionConfig::default(),
      changelog: ChangelogConfig::default(),
      steps: StepsConfig::default(),
      clean: CleanConfig::default(),
    }
  }
}
