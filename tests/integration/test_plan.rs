//! Tests for the `plan` command

use crate::helpers::*;
use anyhow::Result;
use serde_json::json;

#[test]
fn test_plan_inheritable_class() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![marked_class("Foo", vec![drop_method("Drop", 0, &[])])])?;

  let output = run_dropgen(&workspace.path, &["plan", snapshot])?;
  let text = stdout(&output);

  assert!(text.contains("📋 Foo (plan "));
  assert!(text.contains("guarded hook:   protected new"));
  assert!(text.contains("public release: yes"));
  assert!(text.contains("finalizer:      yes"));
  assert!(text.contains("1. method Drop [order 0, only if deterministic]"));

  Ok(())
}

#[test]
fn test_plan_json_decision_table() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    // Sealed, managed only: no hook, no finalizer
    json!({ "name": "Managed", "kind": "class", "sealed": true, "dropping": {},
            "members": [ { "name": "stream", "kind": "field", "drop": {} } ] }),
    // Sealed with an unmanaged member: private hook plus finalizer
    json!({ "name": "Handle", "kind": "class", "sealed": true, "dropping": { "unmanaged": true },
            "members": [ { "name": "Free", "kind": "method", "parameters": ["bool"], "drop": {} } ] }),
    // Value type: never a finalizer
    json!({ "name": "Buffer", "kind": "struct", "dropping": { "unmanaged": true },
            "members": [ { "name": "Free", "kind": "method", "drop": {} } ] }),
  ])?;

  let output = run_dropgen(&workspace.path, &["plan", snapshot, "--json"])?;
  let report = stdout_json(&output)?;
  let outcomes = report["outcomes"].as_array().unwrap();
  assert_eq!(outcomes.len(), 3);

  let managed = &outcomes[0]["plan"];
  assert!(managed["guarded_hook"].is_null());
  assert_eq!(managed["emit_finalizer"], false);
  assert_eq!(managed["emit_public_release"], true);

  let handle = &outcomes[1]["plan"];
  assert_eq!(handle["guarded_hook"]["accessibility"], "private");
  assert_eq!(handle["emit_finalizer"], true);
  assert_eq!(handle["ordered_actions"][0]["guard"], "always");

  let buffer = &outcomes[2]["plan"];
  assert_eq!(buffer["guarded_hook"]["accessibility"], "private");
  assert_eq!(buffer["emit_finalizer"], false);

  Ok(())
}

#[test]
fn test_plan_orders_members() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![marked_class(
    "Foo",
    vec![
      drop_method("Third", 2, &[]),
      drop_method("First", -1, &[]),
      drop_method("SecondA", 0, &[]),
      drop_method("SecondB", 0, &[]),
    ],
  )])?;

  let output = run_dropgen(&workspace.path, &["plan", snapshot, "--json"])?;
  let report = stdout_json(&output)?;
  let names: Vec<_> = report["outcomes"][0]["plan"]["ordered_actions"]
    .as_array()
    .unwrap()
    .iter()
    .map(|a| a["member"]["name"].as_str().unwrap().to_string())
    .collect();
  assert_eq!(names, vec!["First", "SecondA", "SecondB", "Third"]);

  Ok(())
}

#[test]
fn test_plan_single_type_and_stable_id() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    disposable_base("SomeBase"),
    json!({ "name": "Foo", "kind": "class", "base": "SomeBase", "dropping": {},
            "members": [ { "name": "Drop", "kind": "method", "drop": {} } ] }),
    marked_class("Bar", vec![]),
  ])?;

  let first = stdout_json(&run_dropgen(&workspace.path, &["plan", snapshot, "--type", "Foo", "--json"])?)?;
  let second = stdout_json(&run_dropgen(&workspace.path, &["plan", snapshot, "--type", "Foo", "--json"])?)?;

  let outcomes = first["outcomes"].as_array().unwrap();
  assert_eq!(outcomes.len(), 1);
  assert_eq!(outcomes[0]["type_name"], "Foo");
  assert_eq!(outcomes[0]["plan"]["guarded_hook"]["is_override"], true);
  assert_eq!(outcomes[0]["plan"]["chains_to_base"], true);
  assert_eq!(first["outcomes"][0]["plan_id"], second["outcomes"][0]["plan_id"]);

  Ok(())
}

#[test]
fn test_plan_unknown_type_is_user_error() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    marked_class("Foo", vec![]),
    json!({ "name": "Plain", "kind": "class" }),
  ])?;

  let output = run_dropgen_raw(&workspace.path, &["plan", snapshot, "--type", "Missing"])?;
  assert_eq!(output.status.code(), Some(1));

  let output = run_dropgen_raw(&workspace.path, &["plan", snapshot, "--type", "Plain"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("release-protocol marker"));

  Ok(())
}

#[test]
fn test_plan_reports_failed_type_inline() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    disposable_base("SomeBase"),
    json!({ "name": "Bad", "kind": "struct", "base": "SomeBase", "dropping": {} }),
    marked_class("Good", vec![]),
  ])?;

  let output = run_dropgen(&workspace.path, &["plan", snapshot])?;
  let text = stdout(&output);
  assert!(text.contains("❌ Bad: Configuration conflict"));
  assert!(text.contains("📋 Good"));

  Ok(())
}

#[test]
fn test_plan_missing_snapshot() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let output = run_dropgen_raw(&workspace.path, &["plan", "nope.json"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
  Ok(())
}

#[test]
fn test_plan_external_root_is_quiet_below_participant() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let snapshot = workspace.write_snapshot(vec![
    json!({ "name": "Leaf", "kind": "class", "base": "Base", "dropping": {} }),
    json!({ "name": "Base", "kind": "class", "base": "System.Object", "dropping": {} }),
  ])?;

  let output = run_dropgen(&workspace.path, &["plan", snapshot, "--type", "Leaf"])?;
  let text = stdout(&output);
  assert!(text.contains("guarded hook:   protected override"));
  assert!(!text.contains("System.Object"));

  Ok(())
}
