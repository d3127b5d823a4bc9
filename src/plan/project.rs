//! Plan-to-Actions Projection: `ReleasePlan` -> emission list
//!
//! Pure flattening with no decisions of its own. The output is what a
//! renderer walks to produce source text: up to three methods, each with an
//! ordered body of instructions.

use crate::plan::release::{Guard, ReleaseAction, ReleasePlan, TimingValue};
use crate::plan::target::{Accessibility, MemberKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Argument passed to a member's release operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "arg", content = "value", rename_all = "snake_case")]
pub enum Argument {
  /// The owning instance (static release methods)
  Instance,
  /// The timing flag
  Timing(TimingValue),
}

impl fmt::Display for Argument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Argument::Instance => write!(f, "self"),
      Argument::Timing(TimingValue::Forward) => write!(f, "deterministic"),
      Argument::Timing(TimingValue::Literal(v)) => write!(f, "{}", v),
    }
  }
}

/// One statement inside an emitted method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
  /// Call a member's release operation
  ReleaseMember {
    member: String,
    kind: MemberKind,
    arguments: Vec<Argument>,
    guard: Guard,
  },
  /// Call this type's guarded hook with a fixed timing value
  CallGuardedHook { deterministic: bool },
  /// Chain to the base's guarded hook, forwarding the timing parameter
  CallBaseGuardedHook,
  /// Call the public release entry point
  CallPublicRelease,
  /// Disarm the non-deterministic fallback for this instance
  SuppressFinalizer,
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Instruction::ReleaseMember {
        member,
        kind,
        arguments,
        guard,
      } => {
        if *guard == Guard::OnlyIfDeterministic {
          write!(f, "if deterministic: ")?;
        }
        let args: Vec<_> = arguments.iter().map(|a| a.to_string()).collect();
        if kind.is_storage() {
          write!(f, "release {}", member)
        } else {
          write!(f, "{}({})", member, args.join(", "))
        }
      }
      Instruction::CallGuardedHook { deterministic } => write!(f, "guarded_release({})", deterministic),
      Instruction::CallBaseGuardedHook => write!(f, "base.guarded_release(deterministic)"),
      Instruction::CallPublicRelease => write!(f, "release()"),
      Instruction::SuppressFinalizer => write!(f, "suppress_finalizer(self)"),
    }
  }
}

/// A method the renderer must emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Emission {
  /// `release(bool deterministic)`, overridable
  GuardedHook {
    accessibility: Accessibility,
    is_override: bool,
    body: Vec<Instruction>,
  },
  /// Public, parameterless release entry point
  PublicRelease { body: Vec<Instruction> },
  /// Non-deterministic fallback run by the host runtime
  Finalizer { body: Vec<Instruction> },
}

impl Emission {
  pub fn body(&self) -> &[Instruction] {
    match self {
      Emission::GuardedHook { body, .. } => body,
      Emission::PublicRelease { body } => body,
      Emission::Finalizer { body } => body,
    }
  }

  /// Signature line for terminal output
  pub fn signature(&self) -> String {
    match self {
      Emission::GuardedHook {
        accessibility,
        is_override,
        ..
      } => format!(
        "{} {} guarded_release(bool deterministic)",
        accessibility,
        if *is_override { "override" } else { "virtual" }
      ),
      Emission::PublicRelease { .. } => "public release()".to_string(),
      Emission::Finalizer { .. } => "finalizer".to_string(),
    }
  }
}

/// Flatten a plan into the methods to emit, in emission order.
pub fn project(plan: &ReleasePlan) -> Vec<Emission> {
  let mut emissions = Vec::with_capacity(3);

  if let Some(hook) = plan.guarded_hook() {
    let mut body: Vec<_> = plan.ordered_actions().iter().map(hook_release).collect();
    if plan.chains_to_base() {
      body.push(Instruction::CallBaseGuardedHook);
    }
    emissions.push(Emission::GuardedHook {
      accessibility: hook.accessibility,
      is_override: hook.is_override,
      body,
    });
  }

  if plan.emit_public_release() {
    let mut body = if plan.emit_guarded_hook() {
      vec![Instruction::CallGuardedHook { deterministic: true }]
    } else {
      plan.ordered_actions().iter().map(direct_release).collect()
    };
    if plan.emit_finalizer() {
      body.push(Instruction::SuppressFinalizer);
    }
    emissions.push(Emission::PublicRelease { body });
  }

  if plan.emit_finalizer() {
    let body = if plan.emit_guarded_hook() {
      vec![Instruction::CallGuardedHook { deterministic: false }]
    } else {
      vec![Instruction::CallPublicRelease]
    };
    emissions.push(Emission::Finalizer { body });
  }

  emissions
}

fn arguments(action: &ReleaseAction) -> Vec<Argument> {
  let mut args = Vec::with_capacity(2);
  if action.passes_instance() {
    args.push(Argument::Instance);
  }
  if let Some(timing) = action.literal_timing_value {
    args.push(Argument::Timing(timing));
  }
  args
}

fn hook_release(action: &ReleaseAction) -> Instruction {
  Instruction::ReleaseMember {
    member: action.member.name.clone(),
    kind: action.member.kind,
    arguments: arguments(action),
    guard: action.guard,
  }
}

/// The public entry point is deterministic by definition, so every guard holds.
fn direct_release(action: &ReleaseAction) -> Instruction {
  Instruction::ReleaseMember {
    member: action.member.name.clone(),
    kind: action.member.kind,
    arguments: arguments(action),
    guard: Guard::Always,
  }
}
