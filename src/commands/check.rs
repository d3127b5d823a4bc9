//! `dropgen check` - Plan every marked type and fail if any cannot be planned
//!
//! With `--strict` (or `output.strict`), warning diagnostics fail the check too.

use crate::commands::{build_report, print_diagnostics, print_failure, wants_json};
use crate::core::context::GenerationContext;
use crate::core::error::{DropError, DropResult};
use serde::Serialize;

#[derive(Serialize)]
struct CheckSummary<'a> {
  passed: bool,
  strict: bool,
  types: usize,
  failed: Vec<&'a str>,
  warnings: usize,
}

/// Run the check command
pub fn run_check(ctx: &GenerationContext, strict: bool, json: bool) -> DropResult<()> {
  let strict = strict || ctx.config.output.strict;
  let report = build_report(ctx, None)?;

  let failed: Vec<&str> = report.failures().map(|o| o.type_name.as_str()).collect();
  let warnings = report.warning_count();
  let passed = failed.is_empty() && !(strict && warnings > 0);

  if wants_json(ctx, json) {
    let summary = CheckSummary {
      passed,
      strict,
      types: report.outcomes.len(),
      failed: failed.clone(),
      warnings,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    for outcome in &report.outcomes {
      if !outcome.is_ok() {
        print_failure(outcome);
      } else if !outcome.diagnostics.is_empty() {
        println!("⚠️  {}", outcome.type_name);
      }
      print_diagnostics(outcome);
    }
    if passed {
      println!("✅ {} type(s) planned, {} warning(s)", report.outcomes.len(), warnings);
    }
  }

  if !failed.is_empty() {
    return Err(DropError::Validation {
      message: format!("{} of {} type(s) could not be planned", failed.len(), report.outcomes.len()),
      help: Some("Run `dropgen plan <SNAPSHOT> --type <NAME>` for details on a failed type.".to_string()),
    });
  }
  if strict && warnings > 0 {
    return Err(DropError::Validation {
      message: format!("{} warning(s) in strict mode", warnings),
      help: Some("Fix the flagged members or drop --strict.".to_string()),
    });
  }

  Ok(())
}
