//! Tests for the `actions` command

use crate::helpers::*;
use anyhow::Result;
use serde_json::json;

#[test]
fn test_actions_inheritable_class() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![marked_class(
    "Foo",
    vec![
      drop_method("Drop", 0, &["bool"]),
      json!({ "name": "Close", "kind": "method", "static": true, "parameters": ["self"], "drop": { "order": 1 } }),
    ],
  )])?;

  let output = run_dropgen(&workspace.path, &["actions", snapshot])?;
  let text = stdout(&output);

  assert!(text.contains("📦 Foo"));
  assert!(text.contains("protected virtual guarded_release(bool deterministic) {"));
  assert!(text.contains("if deterministic: Drop(deterministic)"));
  assert!(text.contains("if deterministic: Close(self)"));
  assert!(text.contains("public release() {"));
  assert!(text.contains("guarded_release(true)"));
  assert!(text.contains("suppress_finalizer(self)"));
  assert!(text.contains("finalizer {"));
  assert!(text.contains("guarded_release(false)"));

  Ok(())
}

#[test]
fn test_actions_managed_leaf_passes_literal_true() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![json!({
    "name": "Foo", "kind": "class", "sealed": true, "dropping": {},
    "members": [ { "name": "Drop", "kind": "method", "parameters": ["bool"], "drop": {} } ]
  })])?;

  let output = run_dropgen(&workspace.path, &["actions", snapshot, "--json"])?;
  let actions = stdout_json(&output)?;
  let emissions = actions[0]["emissions"].as_array().unwrap();

  assert_eq!(emissions.len(), 1);
  assert_eq!(emissions[0]["method"], "public_release");
  let release = &emissions[0]["body"][0];
  assert_eq!(release["op"], "release_member");
  assert_eq!(release["guard"], "always");
  assert_eq!(release["arguments"], json!([ { "arg": "timing", "value": { "literal": true } } ]));

  Ok(())
}

#[test]
fn test_actions_descendant_chains_to_base() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    disposable_base("SomeBase"),
    json!({ "name": "Foo", "kind": "class", "base": "SomeBase", "dropping": {},
            "members": [ { "name": "Drop", "kind": "method", "drop": { "unmanaged": true } } ] }),
  ])?;

  let output = run_dropgen(&workspace.path, &["actions", snapshot, "--type", "Foo"])?;
  let text = stdout(&output);

  assert!(text.contains("protected override guarded_release(bool deterministic) {"));
  assert!(text.contains("     Drop()"));
  assert!(text.contains("base.guarded_release(deterministic)"));
  assert!(!text.contains("public release()"));
  assert!(!text.contains("finalizer {"));

  Ok(())
}

#[test]
fn test_actions_config_release_method() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_config("[protocol]\nrelease_method = \"Close\"\n")?;
  let snapshot = workspace.write_snapshot(vec![
    json!({ "name": "Stream", "kind": "class", "members": [
      { "name": "Close", "kind": "method", "accessibility": "protected_internal", "overridable": true, "parameters": ["bool"] }
    ] }),
    json!({ "name": "FileStream", "kind": "class", "base": "Stream", "dropping": {},
            "members": [ { "name": "Drop", "kind": "method", "drop": {} } ] }),
  ])?;

  let output = run_dropgen(&workspace.path, &["actions", snapshot])?;
  assert!(stdout(&output).contains("protected internal override guarded_release(bool deterministic)"));

  Ok(())
}
