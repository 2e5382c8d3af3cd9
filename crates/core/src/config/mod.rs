//! Configuration
//!
//! Two layers feed a request:
//! - [`Settings`] from defaults, environment and command-line flags;
//! - an optional [`ProjectConfig`] document found next to the project.

pub mod discovery;
pub mod project_config;
pub mod settings;

use std::path::{Component, Path, PathBuf};

pub use discovery::{
    CONFIG_FILE_NAMES, CandidateLocation, ConfigCandidate, PLUGIN_DIRS, TOOL_DIR, choose_candidate,
    discover_candidates, find_config_near,
};
pub use project_config::{ConfigSettings, LoadedConfig, ProjectConfig, create_sample_config};
pub use settings::{FrameworkSelection, Settings};

/// Lexically resolve `.` and `..` components
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            Component::CurDir => {}
            c => components.push(c),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("/a/.tinkersan/..")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    }
}
