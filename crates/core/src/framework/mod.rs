//! Framework bootstrappers
//!
//! A bootstrapper knows how to recognise one PHP framework on disk and how
//! to generate the PHP that boots it. The registry tries them in
//! [`Priority`] order; the generic PHP bootstrapper always matches and
//! always sorts last.

pub mod custom;
pub mod generic;
pub mod laravel;
pub mod registry;
pub mod wordpress;

use crate::{error::Result, interfaces::FileSystem, types::Completion};
use std::fmt;
use std::path::Path;

pub use custom::{CustomBootstrapper, DetectRules, LoadReport};
pub use generic::GenericPhpBootstrapper;
pub use laravel::LaravelBootstrapper;
pub use registry::BootstrapperRegistry;
pub use wordpress::WordPressBootstrapper;

/// Detection order of a bootstrapper; lower values are tried first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u16);

impl Priority {
    pub const LARAVEL: Priority = Priority(100);
    pub const WORDPRESS: Priority = Priority(200);
    /// Default for externally supplied bootstrappers
    pub const CUSTOM: Priority = Priority(500);
    /// Reserved for the catch-all generic bootstrapper
    pub const FALLBACK: Priority = Priority(u16::MAX);

    pub fn is_fallback(&self) -> bool {
        *self == Self::FALLBACK
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fallback() {
            write!(f, "fallback")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Detection and boot code generation for one framework
pub trait FrameworkBootstrapper: Send + Sync {
    /// Case-insensitively unique name used for explicit selection
    fn name(&self) -> &str;

    /// Position in the detection order
    fn priority(&self) -> Priority;

    /// Check if this framework is installed at `root`.
    ///
    /// Must not fail: any filesystem problem means "not detected".
    fn detect(&self, fs: &dyn FileSystem, root: &Path) -> bool;

    /// Generate the PHP that boots this framework from `root`.
    ///
    /// Pure: builds text only, the generated code does the actual loading
    /// when it is run.
    fn bootstrap_code(&self, root: &Path) -> Result<String>;

    /// Editor completions specific to this framework
    fn completions(&self) -> Vec<Completion>;
}

impl fmt::Debug for dyn FrameworkBootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkBootstrapper")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .finish()
    }
}
