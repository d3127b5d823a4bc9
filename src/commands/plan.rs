//! `dropgen plan` - Show the release plan for each marked type

use crate::commands::{build_report, print_diagnostics, print_failure, wants_json};
use crate::core::context::GenerationContext;
use crate::core::error::DropResult;

/// Run the plan command
pub fn run_plan(ctx: &GenerationContext, type_filter: Option<String>, json: bool) -> DropResult<()> {
  let report = build_report(ctx, type_filter.as_deref())?;

  if wants_json(ctx, json) {
    println!("{}", report.to_json()?);
    return Ok(());
  }

  if report.outcomes.is_empty() {
    println!("No marked types in {}", ctx.snapshot_path.display());
    return Ok(());
  }

  for outcome in &report.outcomes {
    match (&outcome.plan, &outcome.plan_id) {
      (Some(plan), Some(id)) => {
        println!("📋 {} (plan {})", outcome.type_name, id.short());
        print!("{}", plan.to_human_readable());
      }
      _ => print_failure(outcome),
    }
    print_diagnostics(outcome);
    println!();
  }

  Ok(())
}
