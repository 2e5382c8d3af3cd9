//! Discovery of project config documents in a workspace

use crate::interfaces::FileSystem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file names, in lookup order
pub const CONFIG_FILE_NAMES: [&str; 2] = [".tinkersan.json", "tinkersan.json"];

/// Hidden directory that may hold a config document
pub const TOOL_DIR: &str = ".tinkersan";

/// WordPress plugin directories scanned for plugin-level configs
pub const PLUGIN_DIRS: [&str; 2] = ["wp-content/plugins", "wp-content/mu-plugins"];

/// Where a config document was found relative to its anchor directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateLocation {
    /// Inside `.tinkersan/` of the anchor
    ToolDirectory,
    /// Directly in the anchor
    Direct,
    /// Inside `.tinkersan/` of a WordPress plugin
    Plugin,
}

/// A config document that may decide the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCandidate {
    pub path: PathBuf,
    pub location: CandidateLocation,
    /// Directory the document speaks for: the one holding `.tinkersan/`
    /// or holding the file itself
    pub anchor: PathBuf,
}

impl ConfigCandidate {
    /// Number of path components from the anchor down to `file`, if it lies below the anchor
    pub fn distance_to(&self, file: &Path) -> Option<usize> {
        file.strip_prefix(&self.anchor)
            .ok()
            .map(|rest| rest.components().count())
    }
}

fn configs_in(
    fs: &dyn FileSystem,
    anchor: &Path,
    location: CandidateLocation,
    found: &mut Vec<ConfigCandidate>,
) {
    let dir = match location {
        CandidateLocation::Direct => anchor.to_path_buf(),
        CandidateLocation::ToolDirectory | CandidateLocation::Plugin => anchor.join(TOOL_DIR),
    };
    if !fs.is_dir(&dir) {
        return;
    }

    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if fs.is_file(&path) {
            debug!("Found config candidate {} ({:?})", path.display(), location);
            found.push(ConfigCandidate {
                path,
                location,
                anchor: anchor.to_path_buf(),
            });
        }
    }
}

/// Collect every config document in the workspace, in discovery order.
///
/// Per folder: `.tinkersan/` configs, then configs at the folder itself,
/// then `.tinkersan/` configs of each plugin in sorted order.
pub fn discover_candidates(fs: &dyn FileSystem, folders: &[PathBuf]) -> Vec<ConfigCandidate> {
    let mut found = Vec::new();

    for folder in folders {
        configs_in(fs, folder, CandidateLocation::ToolDirectory, &mut found);
        configs_in(fs, folder, CandidateLocation::Direct, &mut found);

        for plugin_dir in PLUGIN_DIRS {
            let base = folder.join(plugin_dir);
            if !fs.is_dir(&base) {
                continue;
            }
            for entry in fs.list_entries(&base) {
                let plugin = base.join(entry);
                if fs.is_dir(&plugin) {
                    configs_in(fs, &plugin, CandidateLocation::Plugin, &mut found);
                }
            }
        }
    }

    found
}

/// Pick exactly one candidate.
///
/// Preference order: the candidate whose anchor is the closest ancestor
/// of the active file, a plugin candidate containing the active file, a
/// `.tinkersan/` candidate, a candidate directly at a workspace root,
/// then the first one discovered.
pub fn choose_candidate<'a>(
    candidates: &'a [ConfigCandidate],
    active_file: Option<&Path>,
) -> Option<&'a ConfigCandidate> {
    if candidates.len() <= 1 {
        return candidates.first();
    }

    if let Some(active) = active_file {
        let closest = candidates
            .iter()
            .filter_map(|c| c.distance_to(active).map(|distance| (distance, c)))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, candidate)) = closest {
            debug!(
                "Using config closest to {} ({} components away): {}",
                active.display(),
                distance,
                candidate.path.display()
            );
            return Some(candidate);
        }

        if let Some(candidate) = candidates.iter().find(|c| {
            c.location == CandidateLocation::Plugin && active.starts_with(&c.anchor)
        }) {
            return Some(candidate);
        }
    }

    candidates
        .iter()
        .find(|c| c.location == CandidateLocation::ToolDirectory)
        .or_else(|| {
            candidates
                .iter()
                .find(|c| c.location == CandidateLocation::Direct)
        })
        .or_else(|| candidates.first())
}

/// Nearest config walking upward from the active file, staying inside `boundary`.
///
/// A file outside `boundary` has no nearby config.
pub fn find_config_near(
    fs: &dyn FileSystem,
    active_file: &Path,
    boundary: &Path,
) -> Option<ConfigCandidate> {
    let start = active_file.parent()?;

    for dir in start.ancestors() {
        if !dir.starts_with(boundary) {
            break;
        }

        let mut found = Vec::new();
        configs_in(fs, dir, CandidateLocation::ToolDirectory, &mut found);
        configs_in(fs, dir, CandidateLocation::Direct, &mut found);
        if let Some(candidate) = found.into_iter().next() {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::OsFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{}").unwrap();
        path
    }

    fn candidate(path: &str, location: CandidateLocation, anchor: &str) -> ConfigCandidate {
        ConfigCandidate {
            path: PathBuf::from(path),
            location,
            anchor: PathBuf::from(anchor),
        }
    }

    #[test]
    fn test_discovery_order() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path();
        let plugin_b = write(ws, "wp-content/plugins/b/.tinkersan/tinkersan.json");
        let plugin_a = write(ws, "wp-content/plugins/a/.tinkersan/.tinkersan.json");
        let mu = write(ws, "wp-content/mu-plugins/m/.tinkersan/.tinkersan.json");
        let direct = write(ws, "tinkersan.json");
        let tool = write(ws, ".tinkersan/.tinkersan.json");
        write(ws, "wp-content/plugins/c/.tinkersan.json");

        let found = discover_candidates(&OsFileSystem::new(), &[ws.to_path_buf()]);
        let paths: Vec<_> = found.iter().map(|c| c.path.clone()).collect();
        assert_eq!(paths, vec![tool, direct, plugin_a, plugin_b, mu]);
        assert_eq!(found[2].anchor, ws.join("wp-content/plugins/a"));
        assert_eq!(found[0].location, CandidateLocation::ToolDirectory);
        assert_eq!(found[1].location, CandidateLocation::Direct);
    }

    #[test]
    fn test_closest_anchor_wins() {
        let candidates = vec![
            candidate("/ws/.tinkersan/.tinkersan.json", CandidateLocation::ToolDirectory, "/ws"),
            candidate(
                "/ws/wp-content/plugins/shop/.tinkersan/.tinkersan.json",
                CandidateLocation::Plugin,
                "/ws/wp-content/plugins/shop",
            ),
        ];

        let in_plugin = Path::new("/ws/wp-content/plugins/shop/includes/cart.php");
        assert_eq!(choose_candidate(&candidates, Some(in_plugin)), Some(&candidates[1]));

        let in_theme = Path::new("/ws/wp-content/themes/x/functions.php");
        assert_eq!(choose_candidate(&candidates, Some(in_theme)), Some(&candidates[0]));
    }

    #[test]
    fn test_fallback_preferences() {
        let candidates = vec![
            candidate("/a/wp-content/plugins/p/.tinkersan/.tinkersan.json", CandidateLocation::Plugin, "/a/wp-content/plugins/p"),
            candidate("/b/tinkersan.json", CandidateLocation::Direct, "/b"),
            candidate("/c/.tinkersan/tinkersan.json", CandidateLocation::ToolDirectory, "/c"),
        ];
        assert_eq!(choose_candidate(&candidates, None), Some(&candidates[2]));
        assert_eq!(
            choose_candidate(&candidates, Some(Path::new("/elsewhere/x.php"))),
            Some(&candidates[2])
        );
        assert_eq!(choose_candidate(&candidates[..2], None), Some(&candidates[1]));
        assert_eq!(choose_candidate(&candidates[..1], None), Some(&candidates[0]));
        assert_eq!(choose_candidate(&[], None), None);
    }

    #[test]
    fn test_find_config_near_respects_boundary() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().join("ws");
        write(temp_dir.path(), ".tinkersan.json");
        let plugin_config = write(&ws, "plugins/shop/.tinkersan/tinkersan.json");
        let file = write(&ws, "plugins/shop/src/deep/file.php");
        let outside = write(&ws, "other/file.php");

        let fs_probe = OsFileSystem::new();
        let found = find_config_near(&fs_probe, &file, &ws).unwrap();
        assert_eq!(found.path, plugin_config);
        assert_eq!(found.anchor, ws.join("plugins/shop"));

        assert!(find_config_near(&fs_probe, &outside, &ws).is_none());
        assert_eq!(
            find_config_near(&fs_probe, &outside, temp_dir.path())
                .unwrap()
                .location,
            CandidateLocation::Direct
        );

        let stray = write(temp_dir.path(), "scratch/note.php");
        assert!(find_config_near(&fs_probe, &stray, &ws).is_none());
    }
}
