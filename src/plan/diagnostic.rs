//! Non-fatal findings surfaced while planning a type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  /// Informational (not a problem)
  Info,
  /// Warning (the type was still planned)
  Warning,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Info => write!(f, "INFO"),
      Severity::Warning => write!(f, "WARN"),
    }
  }
}

/// What went wrong, by category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
  /// A marked member's signature matches no release shape; it was left out
  UnrecognizedMemberShape,
  /// The base chain leaves the snapshot; the walk stopped there
  UnresolvedAncestor,
}

/// A single diagnostic tied to a type (and usually a member)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
  pub severity: Severity,
  pub kind: DiagnosticKind,
  pub type_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub member_name: Option<String>,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub suggestion: Option<String>,
}

impl Diagnostic {
  /// Warning for a marked member that cannot be released
  pub fn unrecognized_member(type_name: impl Into<String>, member_name: impl Into<String>, reason: impl Into<String>) -> Self {
    Self {
      severity: Severity::Warning,
      kind: DiagnosticKind::UnrecognizedMemberShape,
      type_name: type_name.into(),
      member_name: Some(member_name.into()),
      message: reason.into(),
      suggestion: None,
    }
  }

  /// Note that an ancestor could not be looked up
  pub fn unresolved_ancestor(type_name: impl Into<String>, ancestor: &str) -> Self {
    Self {
      severity: Severity::Info,
      kind: DiagnosticKind::UnresolvedAncestor,
      type_name: type_name.into(),
      member_name: None,
      message: format!("base type '{}' is not in the snapshot; treated as a non-participant", ancestor),
      suggestion: None,
    }
  }

  /// Add a suggestion to this diagnostic
  pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
    self.suggestion = Some(suggestion.into());
    self
  }

  pub fn is_warning(&self) -> bool {
    self.severity == Severity::Warning
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.member_name {
      Some(member) => write!(f, "[{}] {}::{}: {}", self.severity, self.type_name, member, self.message),
      None => write!(f, "[{}] {}: {}", self.severity, self.type_name, self.message),
    }
  }
}
