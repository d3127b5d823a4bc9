//! CLI commands for dropgen
//!
//! - **plan**: show the release plan synthesized for each marked type
//! - **actions**: show the methods and statements a renderer would emit
//! - **check**: run the whole batch and fail on any type that cannot be planned
//!
//! All commands accept `&GenerationContext` so the config and snapshot are
//! loaded once per invocation.

pub mod actions;
pub mod check;
pub mod plan;

pub use actions::run_actions;
pub use check::run_check;
pub use plan::run_plan;

use crate::core::config::OutputFormat;
use crate::core::context::GenerationContext;
use crate::core::error::{DropError, DropResult};
use crate::driver::{GenerationReport, TypeOutcome, generate};

/// Run the batch, optionally narrowed to one type
fn build_report(ctx: &GenerationContext, type_filter: Option<&str>) -> DropResult<GenerationReport> {
  let mut report = generate(&ctx.snapshot, &ctx.config);

  if let Some(name) = type_filter {
    if report.find(name).is_none() {
      let help = match ctx.snapshot.find(name) {
        Some(_) => format!("'{}' has no release-protocol marker; add `\"dropping\": {{}}` to it.", name),
        None => format!("No type named '{}' in {}.", name, ctx.snapshot_path.display()),
      };
      return Err(DropError::with_help(format!("Type '{}' is not a marked type", name), help));
    }
    report.retain_type(name);
  }

  Ok(report)
}

/// `--json` on the command line wins over `output.format`
fn wants_json(ctx: &GenerationContext, json: bool) -> bool {
  json || ctx.config.output.format == OutputFormat::Json
}

fn print_failure(outcome: &TypeOutcome) {
  if let Some(err) = &outcome.error {
    println!("❌ {}: {}", outcome.type_name, err.message);
    if let Some(help) = &err.help {
      println!("   💡 {}", help);
    }
  }
}

fn print_diagnostics(outcome: &TypeOutcome) {
  for diagnostic in &outcome.diagnostics {
    println!("   {}", diagnostic);
    if let Some(suggestion) = &diagnostic.suggestion {
      println!("      → {}", suggestion);
    }
  }
}
