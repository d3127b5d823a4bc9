//! Error types for dropgen with contextual messages and exit codes
//!
//! Every fatal condition is a `DropError`. Errors raised while normalizing a
//! single type are scoped to that type: the batch driver records them on the
//! type's outcome and keeps going. Member-level shape problems are not errors
//! at all, they surface as warning diagnostics (see `plan::normalize`).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for dropgen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, unreadable snapshot)
  User = 1,
  /// System error (I/O)
  System = 2,
  /// Validation failure (a type could not be planned, strict warnings)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for dropgen
#[derive(Debug)]
pub enum DropError {
  /// A type's declaration facts cannot be normalized
  Normalize(NormalizeError),

  /// Configuration errors
  Config(ConfigError),

  /// Metadata snapshot errors
  Snapshot(SnapshotError),

  /// I/O errors
  Io(io::Error),

  /// The batch ran but did not pass (`dropgen check`)
  Validation { message: String, help: Option<String> },

  /// A typed error with a line of context (usually the file involved)
  Context { context: String, source: Box<DropError> },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl DropError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    DropError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    DropError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error.
  ///
  /// Typed errors are wrapped so their exit code and help text survive.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      DropError::Message { message, context, help } => DropError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => DropError::Context {
        context: ctx_str,
        source: Box::new(other),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      DropError::Normalize(_) => ExitCode::Validation,
      DropError::Config(_) => ExitCode::User,
      DropError::Snapshot(_) => ExitCode::User,
      DropError::Io(_) => ExitCode::System,
      DropError::Validation { .. } => ExitCode::Validation,
      DropError::Context { source, .. } => source.exit_code(),
      DropError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      DropError::Normalize(e) => e.help_message(),
      DropError::Config(e) => e.help_message(),
      DropError::Snapshot(e) => e.help_message(),
      DropError::Validation { help, .. } => help.clone(),
      DropError::Context { source, .. } => source.help_message(),
      DropError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for DropError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DropError::Normalize(e) => write!(f, "{}", e),
      DropError::Config(e) => write!(f, "{}", e),
      DropError::Snapshot(e) => write!(f, "{}", e),
      DropError::Io(e) => write!(f, "I/O error: {}", e),
      DropError::Validation { message, .. } => write!(f, "{}", message),
      DropError::Context { context, source } => write!(f, "{}: {}", context, source),
      DropError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for DropError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      DropError::Io(e) => Some(e),
      DropError::Context { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for DropError {
  fn from(err: io::Error) -> Self {
    DropError::Io(err)
  }
}

impl From<NormalizeError> for DropError {
  fn from(err: NormalizeError) -> Self {
    DropError::Normalize(err)
  }
}

impl From<String> for DropError {
  fn from(msg: String) -> Self {
    DropError::message(msg)
  }
}

impl From<&str> for DropError {
  fn from(msg: &str) -> Self {
    DropError::message(msg)
  }
}

impl From<serde_json::Error> for DropError {
  fn from(err: serde_json::Error) -> Self {
    DropError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for DropError {
  fn from(err: toml_edit::de::Error) -> Self {
    DropError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<semver::Error> for DropError {
  fn from(err: semver::Error) -> Self {
    DropError::message(format!("Version parse error: {}", err))
  }
}

impl From<anyhow::Error> for DropError {
  fn from(err: anyhow::Error) -> Self {
    DropError::message(err.to_string())
  }
}

/// Errors that make a single type impossible to plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
  /// The declaration facts contradict each other (e.g. a value type with a base participant)
  ConfigurationConflict { type_name: String, reason: String },

  /// The base chain loops back onto itself
  InheritanceCycle { type_name: String, chain: Vec<String> },
}

impl NormalizeError {
  fn help_message(&self) -> Option<String> {
    match self {
      NormalizeError::ConfigurationConflict { .. } => Some(
        "Value types cannot chain a release protocol. Remove the base participant or make the type a class."
          .to_string(),
      ),
      NormalizeError::InheritanceCycle { .. } => {
        Some("Check the `base` entries in the metadata snapshot for a loop.".to_string())
      }
    }
  }
}

impl fmt::Display for NormalizeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NormalizeError::ConfigurationConflict { type_name, reason } => {
        write!(f, "Configuration conflict in '{}': {}", type_name, reason)
      }
      NormalizeError::InheritanceCycle { type_name, chain } => {
        write!(f, "Inheritance cycle at '{}': {}", type_name, chain.join(" -> "))
      }
    }
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicitly requested config file does not exist
  NotFound { path: PathBuf },

  /// Field holds a value dropgen cannot use
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Pass an existing file to --config, or drop the flag to use dropgen.toml discovery.".to_string())
      }
      ConfigError::InvalidField { field, .. } => Some(format!("Fix `{}` in dropgen.toml.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => write!(f, "Config file not found: {}", path.display()),
      ConfigError::InvalidField { field, reason } => write!(f, "Invalid config field '{}': {}", field, reason),
    }
  }
}

/// Metadata snapshot errors
#[derive(Debug)]
pub enum SnapshotError {
  /// Snapshot schema version is not one dropgen reads
  UnsupportedSchema { found: String, supported: String },

  /// Two types share a name
  DuplicateType { name: String },
}

impl SnapshotError {
  fn help_message(&self) -> Option<String> {
    match self {
      SnapshotError::UnsupportedSchema { supported, .. } => {
        Some(format!("Regenerate the snapshot with an extractor that writes schema {}.", supported))
      }
      SnapshotError::DuplicateType { .. } => Some("Type names must be fully qualified and unique.".to_string()),
    }
  }
}

impl fmt::Display for SnapshotError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SnapshotError::UnsupportedSchema { found, supported } => {
        write!(f, "Unsupported snapshot schema '{}' (expected {})", found, supported)
      }
      SnapshotError::DuplicateType { name } => write!(f, "Type '{}' appears more than once in the snapshot", name),
    }
  }
}

/// Result type alias for dropgen
pub type DropResult<T> = Result<T, DropError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> DropResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> DropResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<DropError>,
{
  fn context(self, ctx: impl Into<String>) -> DropResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> DropResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &DropError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
