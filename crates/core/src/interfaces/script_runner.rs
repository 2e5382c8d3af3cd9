//! Script runner interface
//!
//! The runner receives the composed script and the project root and hands
//! back whatever text the PHP process produced.

use crate::error::Result;
use std::path::Path;

/// Raw output of a script run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Text to show the user
    pub text: String,

    /// Whether the process exited successfully
    pub success: bool,

    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
}

impl RunOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
            exit_code: Some(0),
        }
    }

    pub fn failure(text: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            text: text.into(),
            success: false,
            exit_code,
        }
    }
}

/// Executes a composed script
pub trait ScriptRunner: Send + Sync {
    /// Run `script` with `working_dir` as the current directory.
    ///
    /// A non-zero exit is not an error: its output is returned with
    /// `success == false`. `Err` is reserved for failing to run at all.
    fn run(&self, script: &str, working_dir: &Path) -> Result<RunOutput>;

    /// Get the name of this runner
    fn name(&self) -> &str;
}
