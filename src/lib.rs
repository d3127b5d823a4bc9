//! dropgen: release-protocol synthesis for resource-owning types
//!
//! Given declaration facts about a type (its kind, its base chain, and which
//! members it marked as releasable), dropgen decides which release methods the
//! type needs and what each one does:
//!
//! ```text
//! MetadataSnapshot ──► TypeHierarchy ──► normalize ──► TargetPlan
//!                                                         │
//!                       Vec<Emission> ◄── project ◄── synthesize ──► ReleasePlan
//! ```
//!
//! - **core**: errors, `dropgen.toml` configuration, the per-invocation context
//! - **metadata**: the raw input boundary and the inheritance graph
//! - **plan**: normalizer, synthesizer and projection (pure functions)
//! - **driver**: batch generation over a whole snapshot
//! - **commands**: the `plan`, `actions` and `check` subcommands

pub mod commands;
pub mod core;
pub mod driver;
pub mod metadata;
pub mod plan;

pub use crate::core::error::{DropError, DropResult, ExitCode};
pub use crate::driver::{GenerationReport, TypeOutcome, generate};
pub use crate::plan::normalize::normalize;
pub use crate::plan::project::{Emission, Instruction, project};
pub use crate::plan::release::{ReleasePlan, TimingValue};
pub use crate::plan::synth::synthesize;
pub use crate::plan::target::TargetPlan;
