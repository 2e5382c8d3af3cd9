//! tinkersan - run PHP snippets against a live WordPress, Laravel or plain PHP project
//!
//! This crate provides functionality to:
//! - Locate the project root inside a workspace with several installations
//! - Detect the framework and generate the PHP that boots it
//! - Compose a bootstrap fragment and user code into one executable script
//! - Run the script with a PHP binary and report its output
pub mod config;
pub mod error;
pub mod framework;
pub mod interfaces;
pub mod resolver;
pub mod script;
pub mod services;
pub mod tinker;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::{FrameworkSelection, LoadedConfig, ProjectConfig, Settings};
pub use framework::{BootstrapperRegistry, FrameworkBootstrapper, Priority};
pub use interfaces::{FileSystem, RunOutput, ScriptRunner};
pub use resolver::{ProjectRootResolver, Resolution, ResolutionStrategy, RootSignature};
pub use script::{ComposerOptions, ExecutionScript, ExecutionScriptComposer, PhpTemplate};
pub use services::{OsFileSystem, PhpProcessRunner};
pub use tinker::{
    Detection, ExecutionOutcome, ExecutionReport, PreparedExecution, Tinker,
    compose_execution_script, list_completions, resolve_project_root, select_bootstrapper,
};
