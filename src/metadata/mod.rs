//! Input side: what the host compiler knows about each type
//!
//! - **decl**: serde model of one type declaration and its markers
//! - **snapshot**: the JSON document holding every declaration
//! - **hierarchy**: base-chain graph, ancestor shapes and generation order

pub mod decl;
pub mod hierarchy;
pub mod snapshot;
