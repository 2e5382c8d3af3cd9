//! Workspace-level integration test harness for tinkersan
pub use tinkersan_core::*;
