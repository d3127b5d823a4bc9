//! Metadata snapshots: the JSON document an extractor hands to dropgen
//!
//! ```json
//! {
//!   "schema": "1.0.0",
//!   "types": [
//!     { "name": "Foo", "kind": "class", "dropping": {}, "members": [
//!       { "name": "Drop", "kind": "method", "drop": { "order": 0 } }
//!     ] }
//!   ]
//! }
//! ```

use crate::core::error::{DropError, DropResult, ResultExt, SnapshotError};
use crate::metadata::decl::TypeDecl;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Schema versions this build reads
pub const SUPPORTED_SCHEMA: &str = "^1";

fn default_schema() -> String {
  "1.0.0".to_string()
}

/// Every type declaration seen in one generation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
  #[serde(default = "default_schema")]
  pub schema: String,
  #[serde(default)]
  pub types: Vec<TypeDecl>,
}

impl MetadataSnapshot {
  pub fn new(types: Vec<TypeDecl>) -> Self {
    Self {
      schema: default_schema(),
      types,
    }
  }

  /// Load and validate a snapshot file
  pub fn load(path: &Path) -> DropResult<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
    let snapshot =
      Self::from_json(&content).with_context(|| format!("Failed to load snapshot from {}", path.display()))?;
    debug!(path = %path.display(), types = snapshot.types.len(), "loaded snapshot");
    Ok(snapshot)
  }

  /// Parse and validate a snapshot document
  pub fn from_json(json: &str) -> DropResult<Self> {
    let snapshot: MetadataSnapshot = serde_json::from_str(json)?;
    snapshot.validate()?;
    Ok(snapshot)
  }

  /// Check the schema version and type-name uniqueness
  pub fn validate(&self) -> DropResult<()> {
    let version = Version::parse(&self.schema)?;
    let supported = VersionReq::parse(SUPPORTED_SCHEMA)?;
    if !supported.matches(&version) {
      return Err(DropError::Snapshot(SnapshotError::UnsupportedSchema {
        found: self.schema.clone(),
        supported: SUPPORTED_SCHEMA.to_string(),
      }));
    }

    let mut seen = HashSet::new();
    for decl in &self.types {
      if !seen.insert(decl.name.as_str()) {
        return Err(DropError::Snapshot(SnapshotError::DuplicateType {
          name: decl.name.clone(),
        }));
      }
    }

    Ok(())
  }

  /// Look a type up by name
  pub fn find(&self, name: &str) -> Option<&TypeDecl> {
    self.types.iter().find(|t| t.name == name)
  }
}
