//! CLI integration tests for dropgen

mod helpers;
mod test_actions;
mod test_check;
mod test_plan;
