//! Generation of the PHP text handed to the runner
//!
//! - [`template`] renders bootstrap fragments with validated parameters
//! - [`statements`] splits user code into top-level statements
//! - [`composer`] wraps a fragment and user code into one executable script

pub mod composer;
pub mod statements;
pub mod template;

pub use composer::{
    BOOTSTRAP_ERROR_MARKER, ComposerOptions, ERROR_MARKER, EXCEPTION_MARKER, ExecutionScript,
    ExecutionScriptComposer, strip_markers,
};
pub use statements::{Statement, return_last_expression, split_statements};
pub use template::{PhpTemplate, php_path};
