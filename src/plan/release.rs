//! Release plans: the synthesizer's immutable output
//!
//! A `ReleasePlan` answers *how* a marked type releases its resources:
//!
//! - **Shape**: which of the guarded hook, public entry point and finalizer exist
//! - **Actions**: one per member, in release order, with timing argument and guard
//! - **Identity**: plans are JSON-serializable and hashed, so equal inputs give equal ids
//!
//! # Architecture
//!
//! ```text
//! TypeDecl + ancestor shapes
//!   ↓ normalize
//! TargetPlan
//!   ↓ synthesize
//! ReleasePlan
//!   ↓ project
//! Emission list (renderer input)
//! ```

use crate::core::error::DropResult;
use crate::plan::target::{Accessibility, Member};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Plan identifier (SHA256 hash of plan contents)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// Timing argument handed to a member's release operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingValue {
  /// Pass the guarded hook's own parameter through
  Forward,
  /// Pass a fixed value
  Literal(bool),
}

/// When an action runs relative to the hook's timing parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
  /// Runs on both the deterministic and the fallback path
  Always,
  /// Runs only on the deterministic path
  OnlyIfDeterministic,
}

impl fmt::Display for Guard {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Guard::Always => write!(f, "always"),
      Guard::OnlyIfDeterministic => write!(f, "only if deterministic"),
    }
  }
}

/// Release of a single member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseAction {
  pub member: Member,
  pub pass_timing_flag: bool,
  /// `None` exactly when `pass_timing_flag` is false
  pub literal_timing_value: Option<TimingValue>,
  pub guard: Guard,
}

impl ReleaseAction {
  /// Static methods get the owning instance ahead of any timing argument
  pub fn passes_instance(&self) -> bool {
    self.member.is_static
  }
}

/// The guarded hook as the plan wants it emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardedHook {
  pub accessibility: Accessibility,
  pub is_override: bool,
}

/// Synthesizer output for one type
///
/// Only `plan::synth` builds one; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReleasePlan {
  type_name: String,
  is_value_type: bool,
  /// `Some` when the guarded hook is emitted
  guarded_hook: Option<GuardedHook>,
  emit_finalizer: bool,
  emit_public_release: bool,
  /// Chain to the base's guarded hook at the end of ours
  chains_to_base: bool,
  ordered_actions: Vec<ReleaseAction>,
}

impl ReleasePlan {
  /// A type that chains to a base never emits its own public entry point.
  pub(crate) fn new(
    type_name: impl Into<String>,
    is_value_type: bool,
    guarded_hook: Option<GuardedHook>,
    emit_finalizer: bool,
    chains_to_base: bool,
    ordered_actions: Vec<ReleaseAction>,
  ) -> Self {
    Self {
      type_name: type_name.into(),
      is_value_type,
      guarded_hook,
      emit_finalizer,
      emit_public_release: !chains_to_base,
      chains_to_base,
      ordered_actions,
    }
  }

  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn is_value_type(&self) -> bool {
    self.is_value_type
  }

  pub fn guarded_hook(&self) -> Option<GuardedHook> {
    self.guarded_hook
  }

  pub fn emit_finalizer(&self) -> bool {
    self.emit_finalizer
  }

  pub fn emit_public_release(&self) -> bool {
    self.emit_public_release
  }

  pub fn chains_to_base(&self) -> bool {
    self.chains_to_base
  }

  /// Member releases in release order
  pub fn ordered_actions(&self) -> &[ReleaseAction] {
    &self.ordered_actions
  }

  pub fn emit_guarded_hook(&self) -> bool {
    self.guarded_hook.is_some()
  }

  pub fn guarded_hook_is_override(&self) -> bool {
    self.guarded_hook.is_some_and(|h| h.is_override)
  }

  pub fn guarded_hook_accessibility(&self) -> Option<Accessibility> {
    self.guarded_hook.map(|h| h.accessibility)
  }

  /// Content hash of this plan
  pub fn id(&self) -> DropResult<PlanId> {
    let json = serde_json::to_vec(self)?;
    Ok(PlanId::from_contents(&json))
  }

  /// Convert to JSON
  pub fn to_json(&self) -> DropResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Short multi-line summary for terminal output
  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("Release plan for {}\n", self.type_name()));

    match self.guarded_hook {
      Some(hook) => output.push_str(&format!(
        "  guarded hook:   {} {}\n",
        hook.accessibility,
        if hook.is_override { "override" } else { "new" }
      )),
      None => output.push_str("  guarded hook:   none\n"),
    }
    output.push_str(&format!(
      "  public release: {}\n",
      if self.emit_public_release { "yes" } else { "inherited" }
    ));
    output.push_str(&format!("  finalizer:      {}\n", if self.emit_finalizer { "yes" } else { "no" }));

    if self.ordered_actions.is_empty() {
      output.push_str("  actions:        none\n");
    } else {
      output.push_str("  actions:\n");
      for (i, action) in self.ordered_actions.iter().enumerate() {
        let timing = match action.literal_timing_value {
          Some(TimingValue::Forward) => " (forward timing)",
          Some(TimingValue::Literal(true)) => " (timing: true)",
          Some(TimingValue::Literal(false)) => " (timing: false)",
          None => "",
        };
        output.push_str(&format!(
          "    {}. {} {} [order {}, {}]{}\n",
          i + 1,
          action.member.kind,
          action.member.name,
          action.member.order,
          action.guard,
          timing
        ));
      }
    }

    if self.chains_to_base {
      output.push_str("  then: base guarded hook\n");
    }

    output
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::plan::target::Member;

  fn sample() -> ReleasePlan {
    ReleasePlan {
      type_name: "Foo".to_string(),
      is_value_type: false,
      guarded_hook: Some(GuardedHook {
        accessibility: Accessibility::Protected,
        is_override: false,
      }),
      emit_finalizer: true,
      emit_public_release: true,
      chains_to_base: false,
      ordered_actions: vec![ReleaseAction {
        member: Member::method("Drop", false, 0, false, true),
        pass_timing_flag: true,
        literal_timing_value: Some(TimingValue::Forward),
        guard: Guard::OnlyIfDeterministic,
      }],
    }
  }

  #[test]
  fn test_plan_id_stable() {
    let a = sample();
    let b = sample();
    assert_eq!(a.id().unwrap(), b.id().unwrap());
    assert_eq!(a.id().unwrap().short().len(), 12);
  }

  #[test]
  fn test_plan_id_changes_with_content() {
    let a = sample();
    let mut b = sample();
    b.emit_finalizer = false;
    assert_ne!(a.id().unwrap(), b.id().unwrap());
  }

  #[test]
  fn test_human_readable() {
    let text = sample().to_human_readable();
    assert!(text.contains("Release plan for Foo"));
    assert!(text.contains("guarded hook:   protected new"));
    assert!(text.contains("1. method Drop [order 0, only if deterministic] (forward timing)"));
  }

  #[test]
  fn test_json_shape() {
    let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
    assert_eq!(json["type_name"], "Foo");
    assert_eq!(json["guarded_hook"]["accessibility"], "protected");
    assert_eq!(json["ordered_actions"][0]["literal_timing_value"], "forward");
    assert_eq!(json["ordered_actions"][0]["guard"], "only_if_deterministic");
  }
}
