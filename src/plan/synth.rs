//! Release Plan Synthesizer: `TargetPlan` -> `ReleasePlan`
//!
//! Total over every `TargetPlan` (the normalizer already rejected the only
//! impossible input), pure, and free of shared state, so types can be
//! synthesized in any order or in parallel.
//!
//! The hook decision is an ordered match over [`ReleaseShape`]:
//!
//! | shape             | guarded hook        | finalizer            | public release |
//! |-------------------|---------------------|----------------------|----------------|
//! | `BaseParticipant` | override, base's    | no                   | no (inherited) |
//! | `Inheritable`     | `protected`, new    | reference types      | yes            |
//! | `UnmanagedLeaf`   | `private`, new      | reference types      | yes            |
//! | `ManagedLeaf`     | none                | no                   | yes            |

use crate::plan::release::{Guard, GuardedHook, ReleaseAction, ReleasePlan, TimingValue};
use crate::plan::target::{Accessibility, BaseGuardedRelease, Member, TargetPlan};
use tracing::debug;

/// Which release-protocol shape a type takes, evaluated top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseShape {
  /// An ancestor already supplies the public entry point and the hook
  BaseParticipant(BaseGuardedRelease),
  /// Originates the protocol for a chain of descendants
  Inheritable,
  /// Leaf with members that must also release from the fallback path
  UnmanagedLeaf,
  /// Leaf whose members only release deterministically
  ManagedLeaf,
}

impl ReleaseShape {
  pub fn of(target: &TargetPlan) -> Self {
    match (
      target.base_guarded_release(),
      target.allows_inheritance_participation(),
      target.any_unmanaged(),
    ) {
      (Some(base), _, _) => ReleaseShape::BaseParticipant(base),
      (None, true, _) => ReleaseShape::Inheritable,
      (None, false, true) => ReleaseShape::UnmanagedLeaf,
      (None, false, false) => ReleaseShape::ManagedLeaf,
    }
  }

  fn guarded_hook(self) -> Option<GuardedHook> {
    match self {
      ReleaseShape::BaseParticipant(base) => Some(GuardedHook {
        accessibility: base.accessibility,
        is_override: true,
      }),
      ReleaseShape::Inheritable => Some(GuardedHook {
        accessibility: Accessibility::Protected,
        is_override: false,
      }),
      ReleaseShape::UnmanagedLeaf => Some(GuardedHook {
        accessibility: Accessibility::Private,
        is_override: false,
      }),
      ReleaseShape::ManagedLeaf => None,
    }
  }
}

/// Where the ordered actions end up being replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionSite {
  GuardedHook,
  PublicRelease,
}

/// Synthesize the release plan for one normalized type.
pub fn synthesize(target: &TargetPlan) -> ReleasePlan {
  let shape = ReleaseShape::of(target);
  let guarded_hook = shape.guarded_hook();
  let no_base = target.base_guarded_release().is_none();

  let emit_finalizer =
    !target.is_value_type() && no_base && (target.allows_inheritance_participation() || target.any_unmanaged());

  let site = if guarded_hook.is_some() {
    ActionSite::GuardedHook
  } else {
    ActionSite::PublicRelease
  };

  let ordered_actions = target.members().iter().map(|m| action_for(m, site)).collect();

  debug!(
    type_name = target.type_name(),
    shape = ?shape,
    finalizer = emit_finalizer,
    "synthesized release plan"
  );

  ReleasePlan::new(
    target.type_name(),
    target.is_value_type(),
    guarded_hook,
    emit_finalizer,
    !no_base,
    ordered_actions,
  )
}

fn action_for(member: &Member, site: ActionSite) -> ReleaseAction {
  let guard = if member.is_unmanaged_timed {
    Guard::Always
  } else {
    Guard::OnlyIfDeterministic
  };

  // Storage members never take a timing argument
  let pass_timing_flag = !member.kind.is_storage() && member.accepts_timing_flag;

  let literal_timing_value = match (pass_timing_flag, site) {
    (false, _) => None,
    (true, ActionSite::GuardedHook) => Some(TimingValue::Forward),
    // A direct, non-inherited release is always deterministic
    (true, ActionSite::PublicRelease) => Some(TimingValue::Literal(true)),
  };

  ReleaseAction {
    member: member.clone(),
    pass_timing_flag,
    literal_timing_value,
    guard,
  }
}
