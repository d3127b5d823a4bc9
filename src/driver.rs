//! Batch driver: plan every marked type in a snapshot
//!
//! Types are visited ancestors-first and planned independently, on the rayon
//! pool when `driver.parallel` is set. A type that fails to normalize gets an
//! error on its own outcome; the rest of the batch is unaffected.

use crate::core::config::DropConfig;
use crate::core::error::{DropError, DropResult};
use crate::metadata::decl::{TypeDecl, TypeFacts};
use crate::metadata::hierarchy::TypeHierarchy;
use crate::metadata::snapshot::MetadataSnapshot;
use crate::plan::diagnostic::Diagnostic;
use crate::plan::normalize::normalize;
use crate::plan::project::{Emission, project};
use crate::plan::release::{PlanId, ReleasePlan};
use crate::plan::synth::synthesize;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

/// Why a type could not be planned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeError {
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub help: Option<String>,
}

impl From<&DropError> for OutcomeError {
  fn from(err: &DropError) -> Self {
    Self {
      message: err.to_string(),
      help: err.help_message(),
    }
  }
}

/// Everything produced for one marked type
#[derive(Debug, Clone, Serialize)]
pub struct TypeOutcome {
  pub type_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub plan: Option<ReleasePlan>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub plan_id: Option<PlanId>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub emissions: Vec<Emission>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub diagnostics: Vec<Diagnostic>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<OutcomeError>,
}

impl TypeOutcome {
  fn failed(type_name: &str, err: DropError, diagnostics: Vec<Diagnostic>) -> Self {
    Self {
      type_name: type_name.to_string(),
      plan: None,
      plan_id: None,
      emissions: Vec::new(),
      diagnostics,
      error: Some(OutcomeError::from(&err)),
    }
  }

  pub fn is_ok(&self) -> bool {
    self.error.is_none()
  }

  pub fn warning_count(&self) -> usize {
    self.diagnostics.iter().filter(|d| d.is_warning()).count()
  }
}

/// Outcomes for a whole snapshot, in snapshot order
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
  pub outcomes: Vec<TypeOutcome>,
}

impl GenerationReport {
  /// Types that could not be planned
  pub fn failures(&self) -> impl Iterator<Item = &TypeOutcome> {
    self.outcomes.iter().filter(|o| !o.is_ok())
  }

  pub fn warning_count(&self) -> usize {
    self.outcomes.iter().map(TypeOutcome::warning_count).sum()
  }

  pub fn find(&self, type_name: &str) -> Option<&TypeOutcome> {
    self.outcomes.iter().find(|o| o.type_name == type_name)
  }

  /// Keep only the named type
  pub fn retain_type(&mut self, type_name: &str) {
    self.outcomes.retain(|o| o.type_name == type_name);
  }

  /// Convert to JSON
  pub fn to_json(&self) -> DropResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// Normalize, synthesize and project a single type.
pub fn plan_type(hierarchy: &TypeHierarchy<'_>, decl: &TypeDecl, release_method: &str) -> TypeOutcome {
  let chain = match hierarchy.ancestors(&decl.name, release_method) {
    Ok(chain) => chain,
    Err(err) => {
      warn!(type_name = %decl.name, "{}", err);
      return TypeOutcome::failed(&decl.name, err.into(), Vec::new());
    }
  };

  let mut diagnostics = chain.diagnostics;
  let normalized = match normalize(&TypeFacts::new(decl, chain.shapes)) {
    Ok(normalized) => normalized,
    Err(err) => {
      warn!(type_name = %decl.name, "{}", err);
      return TypeOutcome::failed(&decl.name, err.into(), diagnostics);
    }
  };
  diagnostics.extend(normalized.diagnostics);

  let plan = synthesize(&normalized.target);
  let plan_id = match plan.id() {
    Ok(id) => id,
    Err(err) => return TypeOutcome::failed(&decl.name, err, diagnostics),
  };
  let emissions = project(&plan);

  TypeOutcome {
    type_name: decl.name.clone(),
    plan: Some(plan),
    plan_id: Some(plan_id),
    emissions,
    diagnostics,
    error: None,
  }
}

/// Plan every marked type in the snapshot.
pub fn generate(snapshot: &MetadataSnapshot, config: &DropConfig) -> GenerationReport {
  let hierarchy = TypeHierarchy::build(snapshot);
  let release_method = config.protocol.release_method.as_str();

  let order: Vec<usize> = hierarchy
    .generation_order()
    .into_iter()
    .filter(|&idx| snapshot.types[idx].is_marked())
    .collect();

  let run = |&idx: &usize| (idx, plan_type(&hierarchy, &snapshot.types[idx], release_method));
  let mut planned: Vec<(usize, TypeOutcome)> = if config.driver.parallel {
    order.par_iter().map(run).collect()
  } else {
    order.iter().map(run).collect()
  };

  planned.sort_by_key(|(idx, _)| *idx);
  let report = GenerationReport {
    outcomes: planned.into_iter().map(|(_, outcome)| outcome).collect(),
  };

  info!(
    types = report.outcomes.len(),
    failed = report.failures().count(),
    warnings = report.warning_count(),
    "generation pass complete"
  );

  report
}
