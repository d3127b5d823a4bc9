//! Raw host-type declaration facts (the input boundary)
//!
//! These records mirror what an external extractor pulls out of a host
//! type's declaration: the type's classification and markers, its base, and
//! every member that could matter for the release protocol. Nothing here is
//! validated; `plan::normalize` decides what is usable.

use crate::plan::target::{Accessibility, BaseGuardedRelease, MemberKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration form of a host type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
  Class,
  Struct,
  Record,
  RecordStruct,
}

impl TypeKind {
  /// Value types are copied, never extended, and have no finalizer
  pub fn is_value_type(self) -> bool {
    matches!(self, TypeKind::Struct | TypeKind::RecordStruct)
  }
}

/// Type-level marker opting a type into the release protocol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppingMarker {
  /// `Some(false)` turns inheritance participation off; `Some(true)` cannot turn it on
  #[serde(default)]
  pub allow_inherit: Option<bool>,
  /// Default classification for members that do not override it
  #[serde(default)]
  pub unmanaged: bool,
}

/// Member-level marker selecting a member for release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropMarker {
  #[serde(default)]
  pub order: i32,
  /// Overrides the type's default classification when set
  #[serde(default)]
  pub unmanaged: Option<bool>,
}

/// Parameter type as far as release shapes care
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
  /// `bool`
  Bool,
  /// The owning type itself (`self`)
  Instance,
  /// Anything else, kept for diagnostics
  Named(String),
}

impl From<String> for ParamType {
  fn from(s: String) -> Self {
    match s.as_str() {
      "bool" => ParamType::Bool,
      "self" => ParamType::Instance,
      _ => ParamType::Named(s),
    }
  }
}

impl From<ParamType> for String {
  fn from(p: ParamType) -> Self {
    p.to_string()
  }
}

impl fmt::Display for ParamType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParamType::Bool => write!(f, "bool"),
      ParamType::Instance => write!(f, "self"),
      ParamType::Named(name) => write!(f, "{}", name),
    }
  }
}

fn default_accessibility() -> Accessibility {
  Accessibility::Private
}

/// A member as declared on the host type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMember {
  pub name: String,
  pub kind: MemberKind,
  #[serde(default, rename = "static")]
  pub is_static: bool,
  #[serde(default = "default_accessibility")]
  pub accessibility: Accessibility,
  /// Virtual, abstract, or a non-sealed override
  #[serde(default)]
  pub overridable: bool,
  #[serde(default)]
  pub parameters: Vec<ParamType>,
  /// Present when the member is marked for release
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub drop: Option<DropMarker>,
}

impl RawMember {
  /// Whether this member declares the overridable guarded hook named `release_method`
  pub fn is_guarded_hook(&self, release_method: &str) -> bool {
    self.kind == MemberKind::Method
      && !self.is_static
      && self.name == release_method
      && self.overridable
      && self.accessibility != Accessibility::Private
      && self.parameters == [ParamType::Bool]
  }
}

/// A host type as declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
  pub name: String,
  pub kind: TypeKind,
  #[serde(default)]
  pub sealed: bool,
  /// Name of the direct base type
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub base: Option<String>,
  /// Present when the type is marked for the release protocol
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dropping: Option<DroppingMarker>,
  #[serde(default)]
  pub members: Vec<RawMember>,
}

impl TypeDecl {
  pub fn is_marked(&self) -> bool {
    self.dropping.is_some()
  }

  pub fn is_value_type(&self) -> bool {
    self.kind.is_value_type()
  }

  /// Accessibility of a declared guarded hook, if the type has one
  pub fn guarded_hook(&self, release_method: &str) -> Option<Accessibility> {
    self
      .members
      .iter()
      .find(|m| m.is_guarded_hook(release_method))
      .map(|m| m.accessibility)
  }

  /// The shape this type publishes to its descendants
  pub fn shape(&self, release_method: &str) -> AncestorShape {
    AncestorShape {
      name: self.name.clone(),
      participant: self.is_marked(),
      guarded_hook: self.guarded_hook(release_method),
    }
  }
}

/// The small record a descendant needs from each ancestor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorShape {
  pub name: String,
  /// Marked for the release protocol itself
  pub participant: bool,
  /// Declares the overridable guarded hook, with this accessibility
  pub guarded_hook: Option<Accessibility>,
}

impl AncestorShape {
  /// What a descendant inherits from this ancestor, if anything.
  ///
  /// A marked ancestor always generates a `protected` hook, whatever else it declares.
  pub fn published(&self) -> Option<BaseGuardedRelease> {
    if self.participant {
      return Some(BaseGuardedRelease {
        accessibility: Accessibility::Protected,
      });
    }
    self
      .guarded_hook
      .map(|accessibility| BaseGuardedRelease { accessibility })
  }
}

/// Everything the normalizer needs about one type
#[derive(Debug, Clone)]
pub struct TypeFacts<'a> {
  pub decl: &'a TypeDecl,
  /// Ancestor shapes, closest first
  pub ancestors: Vec<AncestorShape>,
}

impl<'a> TypeFacts<'a> {
  pub fn new(decl: &'a TypeDecl, ancestors: Vec<AncestorShape>) -> Self {
    Self { decl, ancestors }
  }

  /// A type with no known ancestors
  pub fn standalone(decl: &'a TypeDecl) -> Self {
    Self::new(decl, Vec::new())
  }
}
