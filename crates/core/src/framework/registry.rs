//! Bootstrapper registry
//!
//! Holds the known bootstrappers in priority order and picks one per
//! execution, either by name or by detection.

use super::{
    FrameworkBootstrapper, GenericPhpBootstrapper, LaravelBootstrapper, LoadReport,
    WordPressBootstrapper, custom,
};
use crate::{config::FrameworkSelection, interfaces::FileSystem, types::Completion};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Priority-ordered collection of bootstrappers
#[derive(Clone, Default)]
pub struct BootstrapperRegistry {
    bootstrappers: Vec<Arc<dyn FrameworkBootstrapper>>,
    loaded: HashSet<(PathBuf, String)>,
}

impl std::fmt::Debug for BootstrapperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapperRegistry")
            .field("bootstrappers", &self.names())
            .finish()
    }
}

impl BootstrapperRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding Laravel, WordPress and the generic fallback
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LaravelBootstrapper::new()));
        registry.register(Arc::new(WordPressBootstrapper::new()));
        registry.register(Arc::new(GenericPhpBootstrapper::new()));
        registry
    }

    /// Insert a bootstrapper after every entry of equal or lower priority.
    ///
    /// The generic bootstrapper stays last whatever else is registered.
    pub fn register(&mut self, bootstrapper: Arc<dyn FrameworkBootstrapper>) {
        let priority = bootstrapper.priority();
        let index = self
            .bootstrappers
            .partition_point(|existing| existing.priority() <= priority && !is_generic(existing));
        debug!(
            "Registering bootstrapper '{}' (priority {}) at position {}",
            bootstrapper.name(),
            priority,
            index
        );
        self.bootstrappers.insert(index, bootstrapper);
    }

    /// Look up a bootstrapper by name, ignoring case
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn FrameworkBootstrapper>> {
        self.bootstrappers
            .iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// First bootstrapper in priority order that recognises `root`
    pub fn detect(
        &self,
        fs: &dyn FileSystem,
        root: &Path,
    ) -> Option<Arc<dyn FrameworkBootstrapper>> {
        self.bootstrappers
            .iter()
            .find(|b| {
                let found = b.detect(fs, root);
                debug!("Detecting {} at {}: {}", b.name(), root.display(), found);
                found
            })
            .cloned()
    }

    /// All bootstrappers in priority order
    pub fn all(&self) -> &[Arc<dyn FrameworkBootstrapper>] {
        &self.bootstrappers
    }

    pub fn names(&self) -> Vec<&str> {
        self.bootstrappers.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.bootstrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bootstrappers.is_empty()
    }

    /// The generic PHP bootstrapper, registered or not
    pub fn fallback(&self) -> Arc<dyn FrameworkBootstrapper> {
        self.bootstrappers
            .iter()
            .find(|b| is_generic(b))
            .cloned()
            .unwrap_or_else(|| Arc::new(GenericPhpBootstrapper::new()))
    }

    /// Pick the bootstrapper for one execution. Never fails.
    pub fn select(
        &self,
        fs: &dyn FileSystem,
        root: &Path,
        selection: &FrameworkSelection,
    ) -> Arc<dyn FrameworkBootstrapper> {
        match selection {
            FrameworkSelection::Named(name) => match self.get_by_name(name) {
                Some(bootstrapper) => {
                    info!("Using configured framework: {}", bootstrapper.name());
                    bootstrapper
                }
                None => {
                    let fallback = self.fallback();
                    warn!(
                        "Unknown framework '{}', falling back to {}",
                        name,
                        fallback.name()
                    );
                    fallback
                }
            },
            FrameworkSelection::Automatic => match self.detect(fs, root) {
                Some(bootstrapper) => {
                    info!("Detected framework: {}", bootstrapper.name());
                    bootstrapper
                }
                None => self.fallback(),
            },
        }
    }

    /// Completions for one bootstrapper, or for every registered one
    pub fn completions(&self, name: Option<&str>) -> Vec<Completion> {
        match name {
            Some(name) => self
                .get_by_name(name)
                .map(|b| b.completions())
                .unwrap_or_default(),
            None => self
                .bootstrappers
                .iter()
                .flat_map(|b| b.completions())
                .collect(),
        }
    }

    /// Load bootstrappers from external manifests.
    ///
    /// Problems with one manifest or one export never affect the others.
    /// Loading the same manifest again registers nothing new.
    pub fn load_custom(&mut self, fs: &dyn FileSystem, paths: &[PathBuf]) -> LoadReport {
        let mut report = LoadReport::default();

        for path in paths {
            let (accepted, rejected) = custom::load_manifest(fs, path);
            report.skipped.extend(rejected);

            for bootstrapper in accepted {
                let key = (
                    bootstrapper.source().to_path_buf(),
                    bootstrapper.name().to_lowercase(),
                );
                if !self.loaded.insert(key) {
                    debug!(
                        "Bootstrapper '{}' from {} already loaded",
                        bootstrapper.name(),
                        path.display()
                    );
                    report.already_loaded.push(bootstrapper.name().to_string());
                    continue;
                }

                info!(
                    "Loaded custom bootstrapper '{}' from {}",
                    bootstrapper.name(),
                    path.display()
                );
                report.registered.push(bootstrapper.name().to_string());
                self.register(Arc::new(bootstrapper));
            }
        }

        report
    }
}

fn is_generic(bootstrapper: &Arc<dyn FrameworkBootstrapper>) -> bool {
    bootstrapper.priority().is_fallback() && bootstrapper.name() == GenericPhpBootstrapper::NAME
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::framework::Priority;
    use crate::services::OsFileSystem;
    use std::fs;
    use tempfile::TempDir;

    struct Fixed {
        name: &'static str,
        priority: Priority,
        matches: bool,
    }

    impl FrameworkBootstrapper for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> Priority {
            self.priority
        }

        fn detect(&self, _fs: &dyn FileSystem, _root: &Path) -> bool {
            self.matches
        }

        fn bootstrap_code(&self, _root: &Path) -> Result<String> {
            Ok(String::new())
        }

        fn completions(&self) -> Vec<Completion> {
            Vec::new()
        }
    }

    fn fixed(name: &'static str, priority: u16, matches: bool) -> Arc<dyn FrameworkBootstrapper> {
        Arc::new(Fixed {
            name,
            priority: Priority(priority),
            matches,
        })
    }

    #[test]
    fn test_first_matching_bootstrapper_wins() {
        let mut registry = BootstrapperRegistry::new();
        registry.register(fixed("A", 10, false));
        registry.register(fixed("B", 20, true));
        registry.register(Arc::new(GenericPhpBootstrapper::new()));

        let selected = registry.detect(&OsFileSystem::new(), Path::new("/srv")).unwrap();
        assert_eq!(selected.name(), "B");
    }

    #[test]
    fn test_get_by_name_is_case_insensitive() {
        let registry = BootstrapperRegistry::with_builtins();
        assert_eq!(registry.get_by_name("wordpress").unwrap().name(), "WordPress");
        assert_eq!(registry.get_by_name("LARAVEL").unwrap().name(), "Laravel");
        assert_eq!(registry.get_by_name("php").unwrap().name(), "PHP");
        assert!(registry.get_by_name("symfony").is_none());
    }

    #[test]
    fn test_specific_frameworks_sort_before_fallback() {
        let mut registry = BootstrapperRegistry::new();
        registry.register(Arc::new(GenericPhpBootstrapper::new()));
        registry.register(Arc::new(WordPressBootstrapper::new()));
        registry.register(Arc::new(LaravelBootstrapper::new()));
        registry.register(fixed("Late", 900, false));

        assert_eq!(registry.names(), vec!["Laravel", "WordPress", "Late", "PHP"]);
        let last = registry.all().last().unwrap();
        assert!(last.priority().is_fallback());
        assert!(
            registry.all()[..registry.len() - 1]
                .iter()
                .all(|b| b.priority() < Priority::FALLBACK)
        );
    }

    #[test]
    fn test_equal_priorities_keep_registration_order() {
        let mut registry = BootstrapperRegistry::new();
        registry.register(fixed("First", 300, true));
        registry.register(fixed("Second", 300, true));
        registry.register(fixed("Earlier", 250, false));

        assert_eq!(registry.names(), vec!["Earlier", "First", "Second"]);
        assert_eq!(
            registry
                .detect(&OsFileSystem::new(), Path::new("/"))
                .unwrap()
                .name(),
            "First"
        );
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let mut registry = BootstrapperRegistry::new();
        registry.register(fixed("Dup", 10, false));
        registry.register(fixed("dup", 20, true));
        assert_eq!(registry.get_by_name("DUP").unwrap().priority(), Priority(10));
    }

    #[test]
    fn test_select_falls_back_to_generic() {
        let temp_dir = TempDir::new().unwrap();
        let fs_probe = OsFileSystem::new();
        let registry = BootstrapperRegistry::with_builtins();

        let named = registry.select(
            &fs_probe,
            temp_dir.path(),
            &FrameworkSelection::Named("Drupal".into()),
        );
        assert_eq!(named.name(), "PHP");

        let automatic = registry.select(&fs_probe, temp_dir.path(), &FrameworkSelection::Automatic);
        assert_eq!(automatic.name(), "PHP");

        let explicit = registry.select(
            &fs_probe,
            temp_dir.path(),
            &FrameworkSelection::Named("laravel".into()),
        );
        assert_eq!(explicit.name(), "Laravel");
    }

    #[test]
    fn test_custom_bootstrapper_cannot_replace_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("craft.json");
        fs::write(
            &manifest,
            r#"{ "name": "Craft", "priority": 65535, "detect": { "allOf": ["craft"] },
                 "bootstrap": "require '{{root}}/bootstrap.php';", "completions": [] }"#,
        )
        .unwrap();

        let fs_probe = OsFileSystem::new();
        let mut registry = BootstrapperRegistry::with_builtins();
        let report = registry.load_custom(&fs_probe, &[manifest]);
        assert!(report.registered.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(registry.names(), vec!["Laravel", "WordPress", "PHP"]);

        // A hand-registered entry at fallback priority still sorts before the generic one
        registry.register(fixed("Stray", u16::MAX, true));
        assert_eq!(registry.names(), vec!["Laravel", "WordPress", "Stray", "PHP"]);
        assert_eq!(registry.fallback().name(), "PHP");
        let selected = registry.select(
            &fs_probe,
            temp_dir.path(),
            &FrameworkSelection::Named("Drupal".into()),
        );
        assert_eq!(selected.name(), "PHP");
    }

    #[test]
    fn test_fallback_without_generic_registered() {
        let registry = BootstrapperRegistry::new();
        assert_eq!(registry.fallback().name(), "PHP");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_custom_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("craft.json");
        fs::write(
            &manifest,
            r#"{ "name": "Craft", "detect": { "allOf": ["craft"] },
                 "bootstrap": "require '{{root}}/bootstrap.php';", "completions": [] }"#,
        )
        .unwrap();
        let root = temp_dir.path().join("site");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("craft"), "").unwrap();

        let fs_probe = OsFileSystem::new();
        let mut registry = BootstrapperRegistry::with_builtins();
        let first = registry.load_custom(&fs_probe, std::slice::from_ref(&manifest));
        let second = registry.load_custom(&fs_probe, std::slice::from_ref(&manifest));

        assert_eq!(first.registered, vec!["Craft"]);
        assert!(second.registered.is_empty());
        assert_eq!(second.already_loaded, vec!["Craft"]);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.names(), vec!["Laravel", "WordPress", "Craft", "PHP"]);
        assert_eq!(registry.detect(&fs_probe, &root).unwrap().name(), "Craft");
    }

    #[test]
    fn test_load_custom_skips_bad_files() {
        let temp_dir = TempDir::new().unwrap();
        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "[1, 2").unwrap();

        let mut registry = BootstrapperRegistry::with_builtins();
        let report = registry.load_custom(
            &OsFileSystem::new(),
            &[broken, temp_dir.path().join("missing.json")],
        );
        assert!(report.registered.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_completions_by_name() {
        let registry = BootstrapperRegistry::with_builtins();
        let laravel = registry.completions(Some("laravel"));
        assert!(!laravel.is_empty());
        assert!(registry.completions(Some("unknown")).is_empty());
        assert!(registry.completions(None).len() > laravel.len());
    }
}
