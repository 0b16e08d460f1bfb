//! Error types for shiplog with contextual messages and exit codes
//!
//! Every pipeline failure is one of three kinds: an artifact could not be read
//! or written, the log export was malformed, or an external step failed. When
//! a failure happens inside a pipeline stage it is wrapped with that stage so
//! the user always learns where the run stopped.

use crate::pipeline::Stage;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for shiplog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (filesystem, I/O)
  System = 2,
  /// Malformed input (log export, rendered changelog)
  Parse = 3,
  /// An external step exited non-zero
  Step = 4,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for shiplog
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// Artifact read/write failure
  Filesystem { path: PathBuf, source: io::Error },

  /// Malformed log export or rendered changelog
  Parse(LogError),

  /// External step failure
  Subprocess(SubprocessError),

  /// Failure inside a pipeline stage
  Stage { stage: Stage, source: Box<ShipError> },

  /// I/O errors without a known path
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Filesystem failure on a specific artifact
  pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
    ShipError::Filesystem {
      path: path.into(),
      source,
    }
  }

  /// Attribute this error to a pipeline stage
  ///
  /// Already-attributed errors keep their original stage.
  pub fn in_stage(self, stage: Stage) -> Self {
    match self {
      ShipError::Stage { .. } => self,
      other => ShipError::Stage {
        stage,
        source: Box::new(other),
      },
    }
  }

  /// The stage this error was raised in, if any
  pub fn stage(&self) -> Option<Stage> {
    match self {
      ShipError::Stage { stage, .. } => Some(*stage),
      _ => None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ShipError::Io(source) => ShipError::Message {
        message: format!("{}: {}", ctx_str, source),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Filesystem { .. } => ExitCode::System,
      ShipError::Parse(_) => ExitCode::Parse,
      ShipError::Subprocess(_) => ExitCode::Step,
      ShipError::Stage { source, .. } => source.exit_code(),
      ShipError::Io(_) => ExitCode::System,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Parse(e) => e.help_message(),
      ShipError::Subprocess(e) => e.help_message(),
      ShipError::Stage { source, .. } => source.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Filesystem { path, source } => {
        write!(f, "Filesystem error on {}: {}", path.display(), source)
      }
      ShipError::Parse(e) => write!(f, "{}", e),
      ShipError::Subprocess(e) => write!(f, "{}", e),
      ShipError::Stage { stage, source } => write!(f, "Stage '{}' failed: {}", stage, source),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Filesystem { source, .. } => Some(source),
      ShipError::Stage { source, .. } => Some(source.as_ref()),
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<ConfigError> for ShipError {
  fn from(err: ConfigError) -> Self {
    ShipError::Config(err)
  }
}

impl From<LogError> for ShipError {
  fn from(err: LogError) -> Self {
    ShipError::Parse(err)
  }
}

impl From<SubprocessError> for ShipError {
  fn from(err: SubprocessError) -> Self {
    ShipError::Subprocess(err)
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for ShipError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ShipError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// shiplog.toml not found
  NotFound { project_root: PathBuf },

  /// A field holds a value shiplog cannot use
  InvalidValue { field: String, reason: String },

  /// Path filter pattern does not compile
  InvalidPathFilter { pattern: String, reason: String },

  /// Malformed line in the user map
  InvalidUserMap { line: usize, content: String },

  /// Clean path escapes the project root
  UnsafeCleanPath { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `shiplog init` to create a configuration file.".to_string()),
      ConfigError::InvalidPathFilter { .. } => Some(
        "The filter is a regular expression matched against the start of each changed path, e.g. `branches/[^/]+|trunk`."
          .to_string(),
      ),
      ConfigError::InvalidUserMap { .. } => Some("Each user map line has the form `login: Display Name <email>`.".to_string()),
      ConfigError::UnsafeCleanPath { .. } => {
        Some("Clean paths must be relative to the project root and may not contain `..`.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { project_root } => {
        write!(
          f,
          "No shiplog configuration found.\nExpected file: {}/shiplog.toml",
          project_root.display()
        )
      }
      ConfigError::InvalidValue { field, reason } => {
        write!(f, "Invalid value for '{}': {}", field, reason)
      }
      ConfigError::InvalidPathFilter { pattern, reason } => {
        write!(f, "Invalid path filter '{}': {}", pattern, reason)
      }
      ConfigError::InvalidUserMap { line, content } => {
        write!(f, "Malformed user map entry on line {}: '{}'", line, content)
      }
      ConfigError::UnsafeCleanPath { path } => {
        write!(f, "Refusing to clean path outside the project: {}", path.display())
      }
    }
  }
}

/// Log export and rendered changelog parse errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
  /// Input is not valid UTF-8
  InvalidUtf8 { offset: usize },

  /// Input is not well-formed
  Malformed { line: usize, reason: String },

  /// Root element is not `<log>`
  UnexpectedRoot { name: String },

  /// A revision attribute is not a revision number
  InvalidRevision { value: String },

  /// A log entry lacks a required field
  MissingField { revision: Option<String>, field: &'static str },

  /// A log entry date is not RFC 3339
  InvalidDate { revision: String, value: String },

  /// A rendered changelog header could not be read back
  InvalidHeader { line: usize, content: String },
}

impl LogError {
  fn help_message(&self) -> Option<String> {
    match self {
      LogError::UnexpectedRoot { .. } | LogError::Malformed { .. } => {
        Some("The log export must be produced by `svn log -v --xml`.".to_string())
      }
      LogError::MissingField { .. } => Some("Pass `-v` to `svn log` so that changed paths are included.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for LogError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LogError::InvalidUtf8 { offset } => write!(f, "Log export is not valid UTF-8 (byte {})", offset),
      LogError::Malformed { line, reason } => {
        write!(f, "Malformed log export at line {}", line)?;
        if !reason.is_empty() {
          write!(f, ": {}", reason)?;
        }
        Ok(())
      }
      LogError::UnexpectedRoot { name } => write!(f, "Expected <log> root element, found <{}>", name),
      LogError::InvalidRevision { value } => write!(f, "Log entry has an invalid revision: {:?}", value),
      LogError::MissingField { revision, field } => match revision {
        Some(rev) => write!(f, "Log entry r{} is missing '{}'", rev, field),
        None => write!(f, "Log entry is missing '{}'", field),
      },
      LogError::InvalidDate { revision, value } => {
        write!(f, "Log entry r{} has an invalid date: '{}'", revision, value)
      }
      LogError::InvalidHeader { line, content } => {
        write!(f, "Malformed changelog header on line {}: '{}'", line, content)
      }
    }
  }
}

/// External step failures
#[derive(Debug)]
pub enum SubprocessError {
  /// The command ran and exited unsuccessfully
  Exited { command: String, code: Option<i32> },

  /// The command could not be started
  Spawn { command: String, source: io::Error },
}

impl SubprocessError {
  fn help_message(&self) -> Option<String> {
    match self {
      SubprocessError::Spawn { .. } => {
        Some("Check that the command exists and is on PATH, or adjust the [steps] section of shiplog.toml.".to_string())
      }
      SubprocessError::Exited { .. } => None,
    }
  }
}

impl fmt::Display for SubprocessError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SubprocessError::Exited { command, code } => match code {
        Some(code) => write!(f, "`{}` exited with code {}", command, code),
        None => write!(f, "`{}` was terminated by a signal", command),
      },
      SubprocessError::Spawn { command, source } => {
        write!(f, "Failed to start `{}`: {}", command, source)
      }
    }
  }
}

/// Result type alias for shiplog
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
