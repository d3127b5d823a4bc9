use crate::core::error::{ConfigError, DropError, DropResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for dropgen
/// Searched in order: dropgen.toml, .dropgen.toml, .config/dropgen.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropConfig {
  #[serde(default)]
  pub protocol: ProtocolConfig,
  #[serde(default)]
  pub output: OutputConfig,
  #[serde(default)]
  pub driver: DriverConfig,
}

/// Host release-protocol naming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
  /// Name of the guarded hook looked up on unmarked ancestors (default: "Dispose")
  #[serde(default = "default_release_method")]
  pub release_method: String,
}

fn default_release_method() -> String {
  "Dispose".to_string()
}

impl Default for ProtocolConfig {
  fn default() -> Self {
    Self {
      release_method: default_release_method(),
    }
  }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
  #[serde(default)]
  pub format: OutputFormat,
  /// Treat warnings as errors in `dropgen check`
  #[serde(default)]
  pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
  /// Synthesize types on the rayon pool (default: true)
  #[serde(default = "default_parallel")]
  pub parallel: bool,
}

fn default_parallel() -> bool {
  true
}

impl Default for DriverConfig {
  fn default() -> Self {
    Self {
      parallel: default_parallel(),
    }
  }
}

impl ProtocolConfig {
  /// Validate protocol configuration
  pub fn validate(&self) -> DropResult<()> {
    let name = &self.release_method;
    let valid = name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
      && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    if !valid {
      return Err(DropError::Config(ConfigError::InvalidField {
        field: "protocol.release_method".to_string(),
        reason: format!("'{}' is not an identifier", name),
      }));
    }
    Ok(())
  }
}

impl DropConfig {
  /// Find config file in search order: dropgen.toml, .dropgen.toml, .config/dropgen.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("dropgen.toml"),
      path.join(".dropgen.toml"),
      path.join(".config").join("dropgen.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the search path, falling back to defaults when none exists
  pub fn discover(path: &Path) -> DropResult<Self> {
    match Self::find_config_path(path) {
      Some(config_path) => Self::load_file(&config_path),
      None => Ok(Self::default()),
    }
  }

  /// Load config from an explicit file
  pub fn load_file(config_path: &Path) -> DropResult<Self> {
    if !config_path.exists() {
      return Err(DropError::Config(ConfigError::NotFound {
        path: config_path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: DropConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.validate()?;

    Ok(config)
  }

  pub fn validate(&self) -> DropResult<()> {
    self.protocol.validate()
  }
}
