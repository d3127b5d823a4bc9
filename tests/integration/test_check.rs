//! Tests for the `check` command

use crate::helpers::*;
use anyhow::Result;
use serde_json::json;

#[test]
fn test_check_passes() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    marked_class("Foo", vec![drop_method("Drop", 0, &[])]),
    json!({ "name": "Bar", "kind": "class", "base": "Foo", "dropping": {} }),
  ])?;

  let output = run_dropgen(&workspace.path, &["check", snapshot])?;
  assert!(stdout(&output).contains("✅ 2 type(s) planned, 0 warning(s)"));

  Ok(())
}

#[test]
fn test_check_fails_on_conflict() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    marked_class("Foo", vec![]),
    json!({ "name": "Bad", "kind": "record_struct", "base": "Foo", "dropping": {} }),
  ])?;

  let output = run_dropgen_raw(&workspace.path, &["check", snapshot, "--json"])?;
  assert_eq!(output.status.code(), Some(3));

  let summary = stdout_json(&output)?;
  assert_eq!(summary["passed"], false);
  assert_eq!(summary["failed"], json!(["Bad"]));

  Ok(())
}

#[test]
fn test_check_fails_on_cycle() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    json!({ "name": "A", "kind": "class", "base": "B", "dropping": {} }),
    json!({ "name": "B", "kind": "class", "base": "A", "dropping": {} }),
  ])?;

  let output = run_dropgen_raw(&workspace.path, &["check", snapshot])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stdout(&output).contains("Inheritance cycle at 'A': A -> B -> A"));

  Ok(())
}

#[test]
fn test_check_strict_warnings() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![marked_class(
    "Foo",
    vec![drop_method("Drop", 0, &[]), drop_method("Close", 1, &["int"])],
  )])?;

  // Warnings alone pass
  let output = run_dropgen(&workspace.path, &["check", snapshot])?;
  let text = stdout(&output);
  assert!(text.contains("[WARN] Foo::Close"));
  assert!(text.contains("1 warning(s)"));

  let output = run_dropgen_raw(&workspace.path, &["check", snapshot, "--strict"])?;
  assert_eq!(output.status.code(), Some(3));

  // Strict from dropgen.toml
  workspace.write_config("[output]\nstrict = true\n")?;
  let output = run_dropgen_raw(&workspace.path, &["check", snapshot])?;
  assert_eq!(output.status.code(), Some(3));

  Ok(())
}

#[test]
fn test_check_rejects_bad_config() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![marked_class("Foo", vec![])])?;
  workspace.write_config("[protocol]\nrelease_method = \"not valid\"\n")?;

  let output = run_dropgen_raw(&workspace.path, &["check", snapshot])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("protocol.release_method"));

  let output = run_dropgen_raw(&workspace.path, &["check", snapshot, "--config", "missing.toml"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_check_loop_does_not_leak_below() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    json!({ "name": "D", "kind": "class", "base": "A", "dropping": {} }),
    json!({ "name": "A", "kind": "class", "base": "B", "dropping": {} }),
    json!({ "name": "B", "kind": "class", "base": "A" }),
  ])?;

  let output = run_dropgen_raw(&workspace.path, &["check", snapshot, "--json"])?;
  assert_eq!(output.status.code(), Some(3));
  assert_eq!(stdout_json(&output)?["failed"], json!(["A"]));

  Ok(())
}
