//! `dropgen actions` - Show the methods a renderer would emit for each marked type

use crate::commands::{build_report, print_diagnostics, print_failure, wants_json};
use crate::core::context::GenerationContext;
use crate::core::error::DropResult;
use crate::driver::TypeOutcome;
use serde::Serialize;

#[derive(Serialize)]
struct TypeActions<'a> {
  type_name: &'a str,
  emissions: &'a [crate::plan::project::Emission],
}

/// Run the actions command
pub fn run_actions(ctx: &GenerationContext, type_filter: Option<String>, json: bool) -> DropResult<()> {
  let report = build_report(ctx, type_filter.as_deref())?;

  if wants_json(ctx, json) {
    // Failed types have no emissions; their errors are in `dropgen plan --json`
    let actions: Vec<_> = report
      .outcomes
      .iter()
      .filter(|o| o.is_ok())
      .map(|o| TypeActions {
        type_name: &o.type_name,
        emissions: &o.emissions,
      })
      .collect();
    println!("{}", serde_json::to_string_pretty(&actions)?);
    return Ok(());
  }

  for outcome in &report.outcomes {
    if outcome.is_ok() {
      print_emissions(outcome);
    } else {
      print_failure(outcome);
    }
    print_diagnostics(outcome);
    println!();
  }

  Ok(())
}

fn print_emissions(outcome: &TypeOutcome) {
  println!("📦 {}", outcome.type_name);
  if outcome.emissions.is_empty() {
    println!("   (nothing to emit)");
    return;
  }
  for emission in &outcome.emissions {
    println!("   {} {{", emission.signature());
    for instruction in emission.body() {
      println!("     {}", instruction);
    }
    println!("   }}");
  }
}
