//! Normalized per-type facts consumed by the synthesizer
//!
//! A `TargetPlan` is built once per analyzed type by `plan::normalize` and is
//! never mutated afterwards. Constructors enforce the record's invariants, so
//! any `TargetPlan` that exists is well-formed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared accessibility of the guarded hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
  Private,
  PrivateProtected,
  Protected,
  Internal,
  ProtectedInternal,
  Public,
}

impl fmt::Display for Accessibility {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Accessibility::Private => write!(f, "private"),
      Accessibility::PrivateProtected => write!(f, "private protected"),
      Accessibility::Protected => write!(f, "protected"),
      Accessibility::Internal => write!(f, "internal"),
      Accessibility::ProtectedInternal => write!(f, "protected internal"),
      Accessibility::Public => write!(f, "public"),
    }
  }
}

/// What sort of declaration a release-capable member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
  Field,
  Property,
  Method,
}

impl MemberKind {
  /// Fields and properties expose their own parameterless release operation
  pub fn is_storage(self) -> bool {
    matches!(self, MemberKind::Field | MemberKind::Property)
  }
}

impl fmt::Display for MemberKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MemberKind::Field => write!(f, "field"),
      MemberKind::Property => write!(f, "property"),
      MemberKind::Method => write!(f, "method"),
    }
  }
}

/// One release-capable unit of a type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
  pub name: String,
  pub kind: MemberKind,
  /// Owning instance must be passed explicitly (methods only)
  pub is_static: bool,
  /// Members release in ascending order, ties by declaration order
  pub order: i32,
  /// Release must also run from the non-deterministic fallback path
  pub is_unmanaged_timed: bool,
  /// Method signature takes the boolean "is deterministic" argument
  pub accepts_timing_flag: bool,
}

impl Member {
  /// A field with a parameterless release operation
  pub fn field(name: impl Into<String>, order: i32, is_unmanaged_timed: bool) -> Self {
    Self::storage(name, MemberKind::Field, order, is_unmanaged_timed)
  }

  /// A property with a parameterless release operation
  pub fn property(name: impl Into<String>, order: i32, is_unmanaged_timed: bool) -> Self {
    Self::storage(name, MemberKind::Property, order, is_unmanaged_timed)
  }

  fn storage(name: impl Into<String>, kind: MemberKind, order: i32, is_unmanaged_timed: bool) -> Self {
    Self {
      name: name.into(),
      kind,
      is_static: false,
      order,
      is_unmanaged_timed,
      accepts_timing_flag: false,
    }
  }

  /// A release method
  pub fn method(
    name: impl Into<String>,
    is_static: bool,
    order: i32,
    is_unmanaged_timed: bool,
    accepts_timing_flag: bool,
  ) -> Self {
    Self {
      name: name.into(),
      kind: MemberKind::Method,
      is_static,
      order,
      is_unmanaged_timed,
      accepts_timing_flag,
    }
  }
}

/// Shape facts published by the closest participating ancestor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseGuardedRelease {
  pub accessibility: Accessibility,
}

/// Immutable, normalized facts about one analyzed type
///
/// # Invariants
///
/// 1. `members` is sorted by `order`, stable with respect to declaration order
/// 2. `allows_inheritance_participation` is false for value types
/// 3. `allows_inheritance_participation` is true whenever `base_guarded_release` is present
/// 4. a value type never has a `base_guarded_release`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetPlan {
  type_name: String,
  is_value_type: bool,
  allows_inheritance_participation: bool,
  default_unmanaged: bool,
  base_guarded_release: Option<BaseGuardedRelease>,
  members: Vec<Member>,
}

impl TargetPlan {
  /// Assemble a plan, sorting members and applying the inheritance invariants.
  ///
  /// Returns `None` for a value type with a base participant; callers that need
  /// a diagnostic go through `plan::normalize` instead.
  pub fn new(
    type_name: impl Into<String>,
    is_value_type: bool,
    allows_inheritance_participation: bool,
    default_unmanaged: bool,
    base_guarded_release: Option<BaseGuardedRelease>,
    mut members: Vec<Member>,
  ) -> Option<Self> {
    if is_value_type && base_guarded_release.is_some() {
      return None;
    }

    // Vec::sort_by_key is stable: equal orders keep declaration order
    members.sort_by_key(|m| m.order);

    let allows_inheritance_participation =
      !is_value_type && (allows_inheritance_participation || base_guarded_release.is_some());

    Some(Self {
      type_name: type_name.into(),
      is_value_type,
      allows_inheritance_participation,
      default_unmanaged,
      base_guarded_release,
      members,
    })
  }

  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn is_value_type(&self) -> bool {
    self.is_value_type
  }

  pub fn allows_inheritance_participation(&self) -> bool {
    self.allows_inheritance_participation
  }

  pub fn default_unmanaged(&self) -> bool {
    self.default_unmanaged
  }

  pub fn base_guarded_release(&self) -> Option<BaseGuardedRelease> {
    self.base_guarded_release
  }

  pub fn members(&self) -> &[Member] {
    &self.members
  }

  /// Whether any member must also release from the fallback path
  pub fn any_unmanaged(&self) -> bool {
    self.members.iter().any(|m| m.is_unmanaged_timed)
  }
}
