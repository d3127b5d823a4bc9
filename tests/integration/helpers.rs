//! Test helpers for integration tests

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch directory holding a snapshot and, optionally, a dropgen.toml
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Write `types` as `types.json` and return its file name
  pub fn write_snapshot(&self, types: Vec<Value>) -> Result<&'static str> {
    let snapshot = json!({ "schema": "1.0.0", "types": types });
    std::fs::write(self.path.join("types.json"), serde_json::to_string_pretty(&snapshot)?)?;
    Ok("types.json")
  }

  /// Write dropgen.toml at the workspace root
  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("dropgen.toml"), content)?;
    Ok(())
  }
}

/// A class with the marker and the given members
pub fn marked_class(name: &str, members: Vec<Value>) -> Value {
  json!({ "name": name, "kind": "class", "dropping": {}, "members": members })
}

/// A method carrying the drop marker
pub fn drop_method(name: &str, order: i32, parameters: &[&str]) -> Value {
  json!({ "name": name, "kind": "method", "parameters": parameters, "drop": { "order": order } })
}

/// An unmarked class declaring `protected virtual Dispose(bool)`
pub fn disposable_base(name: &str) -> Value {
  json!({
    "name": name,
    "kind": "class",
    "members": [
      { "name": "Dispose", "kind": "method", "accessibility": "protected", "overridable": true, "parameters": ["bool"] }
    ]
  })
}

/// Run dropgen and return its output whatever the exit status
pub fn run_dropgen_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let dropgen_bin = env!("CARGO_BIN_EXE_dropgen");

  Command::new(dropgen_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run dropgen")
}

/// Run dropgen and fail unless it exits successfully
pub fn run_dropgen(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_dropgen_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "dropgen command failed: dropgen {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stdout_json(output: &Output) -> Result<Value> {
  serde_json::from_slice(&output.stdout).context("stdout is not JSON")
}
