//! Planning pipeline
//!
//! `normalize` turns declaration facts into a `TargetPlan`, `synthesize`
//! applies the release decision table to produce a `ReleasePlan`, and
//! `project` flattens the plan into the methods a renderer emits. All three
//! are pure; the same input always yields an equal output.

pub mod diagnostic;
pub mod normalize;
pub mod project;
pub mod release;
pub mod synth;
pub mod target;
