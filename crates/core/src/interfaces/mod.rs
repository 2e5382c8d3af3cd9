//! Interfaces to the collaborators the core depends on
//!
//! Detection and resolution only read the filesystem through
//! [`FileSystem`], and scripts only run through [`ScriptRunner`], so hosts
//! can swap either one. Writing a sample config with
//! [`create_sample_config`](crate::config::create_sample_config) is the
//! one place the core writes to disk itself.

pub mod file_system;
pub mod script_runner;

pub use file_system::FileSystem;
pub use script_runner::{RunOutput, ScriptRunner};
