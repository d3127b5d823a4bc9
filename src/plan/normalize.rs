//! Metadata Normalizer: raw declaration facts -> `TargetPlan`
//!
//! Deterministic and I/O free. The only fatal outcome is a
//! `ConfigurationConflict`; members whose signatures match no release shape
//! are dropped with a warning so one bad member never blocks the type.

use crate::core::error::NormalizeError;
use crate::metadata::decl::{ParamType, RawMember, TypeFacts};
use crate::plan::diagnostic::Diagnostic;
use crate::plan::target::{Member, MemberKind, TargetPlan};
use tracing::{debug, warn};

/// A normalized type plus the warnings collected on the way
#[derive(Debug, Clone)]
pub struct Normalized {
  pub target: TargetPlan,
  pub diagnostics: Vec<Diagnostic>,
}

/// Normalize one type's declaration facts.
pub fn normalize(facts: &TypeFacts<'_>) -> Result<Normalized, NormalizeError> {
  let decl = facts.decl;
  let marker = decl.dropping.clone().unwrap_or_default();
  let is_value_type = decl.is_value_type();

  // Closest ancestor wins
  let base = facts.ancestors.iter().find_map(|a| {
    let published = a.published();
    if let Some(base) = published {
      debug!(type_name = %decl.name, ancestor = %a.name, accessibility = %base.accessibility, "base guarded release found");
    }
    published
  });

  if is_value_type && base.is_some() {
    return Err(NormalizeError::ConfigurationConflict {
      type_name: decl.name.clone(),
      reason: "a value type cannot extend a release-protocol participant".to_string(),
    });
  }

  let mut allows_inherit = !is_value_type && !decl.sealed;
  if marker.allow_inherit == Some(false) {
    allows_inherit = false;
  }

  let mut members = Vec::new();
  let mut diagnostics = Vec::new();

  for raw in &decl.members {
    let Some(drop) = &raw.drop else {
      continue;
    };

    match release_shape(raw) {
      Ok(accepts_timing_flag) => {
        let unmanaged = drop.unmanaged.unwrap_or(marker.unmanaged);
        members.push(match raw.kind {
          MemberKind::Field => Member::field(&raw.name, drop.order, unmanaged),
          MemberKind::Property => Member::property(&raw.name, drop.order, unmanaged),
          MemberKind::Method => Member::method(&raw.name, raw.is_static, drop.order, unmanaged, accepts_timing_flag),
        });
      }
      Err(reason) => {
        warn!(type_name = %decl.name, member = %raw.name, "{}", reason);
        diagnostics.push(
          Diagnostic::unrecognized_member(&decl.name, &raw.name, reason).with_suggestion(suggestion_for(raw)),
        );
      }
    }
  }

  let target = TargetPlan::new(
    &decl.name,
    is_value_type,
    allows_inherit,
    marker.unmanaged,
    base,
    members,
  )
  .ok_or_else(|| NormalizeError::ConfigurationConflict {
    type_name: decl.name.clone(),
    reason: "a value type cannot extend a release-protocol participant".to_string(),
  })?;

  debug!(
    type_name = %decl.name,
    members = target.members().len(),
    dropped = diagnostics.len(),
    inherit = target.allows_inheritance_participation(),
    "normalized"
  );

  Ok(Normalized { target, diagnostics })
}

/// Match a member against the recognized release shapes.
///
/// `Ok(true)` means the release operation takes the timing flag.
fn release_shape(raw: &RawMember) -> Result<bool, String> {
  match raw.kind {
    MemberKind::Field | MemberKind::Property => {
      if raw.parameters.is_empty() {
        Ok(false)
      } else {
        Err(format!("{} with parameters has no release operation", raw.kind))
      }
    }
    MemberKind::Method if raw.is_static => match raw.parameters.as_slice() {
      [ParamType::Instance] => Ok(false),
      [ParamType::Instance, ParamType::Bool] => Ok(true),
      [ParamType::Instance, other] => Err(format!(
        "parameter of type `{}` in the timing-flag position, expected `bool`",
        other
      )),
      [] => Err("static release method must take the owning instance".to_string()),
      [first, ..] if *first != ParamType::Instance => Err(format!(
        "static release method takes `{}` first, expected the owning instance",
        first
      )),
      _ => Err("release method takes more than one non-instance parameter".to_string()),
    },
    MemberKind::Method => match raw.parameters.as_slice() {
      [] => Ok(false),
      [ParamType::Bool] => Ok(true),
      [other] => Err(format!(
        "parameter of type `{}` in the timing-flag position, expected `bool`",
        other
      )),
      _ => Err("release method takes more than one non-instance parameter".to_string()),
    },
  }
}

fn suggestion_for(raw: &RawMember) -> &'static str {
  match (raw.kind, raw.is_static) {
    (MemberKind::Method, true) => "Use `static void M(Self self)` or `static void M(Self self, bool disposing)`.",
    (MemberKind::Method, false) => "Use `void M()` or `void M(bool disposing)`.",
    _ => "Mark a field or property whose type exposes a parameterless release operation.",
  }
}
