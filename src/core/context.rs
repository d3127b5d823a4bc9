//! Generation context - load once, pass everywhere
//!
//! # Architecture
//!
//! ```text
//! main.rs:
//!   GenerationContext::build() -> &GenerationContext
//!   |
//!   v
//! commands/plan.rs, actions.rs, check.rs:
//!   fn run_*(ctx: &GenerationContext, ...)
//! ```

use crate::core::config::DropConfig;
use crate::core::error::DropResult;
use crate::metadata::snapshot::MetadataSnapshot;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config and snapshot shared by every command in one invocation
#[derive(Clone)]
pub struct GenerationContext {
  /// Directory the config was discovered from
  pub root: PathBuf,

  /// Path of the snapshot being processed
  pub snapshot_path: PathBuf,

  pub config: Arc<DropConfig>,

  pub snapshot: Arc<MetadataSnapshot>,
}

impl GenerationContext {
  /// Load the config (explicit path, or discovery from `root`) and the snapshot.
  pub fn build(root: &Path, snapshot_path: &Path, config_path: Option<&Path>) -> DropResult<Self> {
    let config = match config_path {
      Some(path) => DropConfig::load_file(path)?,
      None => DropConfig::discover(root)?,
    };
    let snapshot = MetadataSnapshot::load(snapshot_path)?;

    Ok(Self::from_parts(root, snapshot_path, config, snapshot))
  }

  /// Assemble a context from already-loaded parts
  pub fn from_parts(root: &Path, snapshot_path: &Path, config: DropConfig, snapshot: MetadataSnapshot) -> Self {
    Self {
      root: root.to_path_buf(),
      snapshot_path: snapshot_path.to_path_buf(),
      config: Arc::new(config),
      snapshot: Arc::new(snapshot),
    }
  }
}
