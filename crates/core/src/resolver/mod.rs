//! Project root resolution
//!
//! Finds the directory a snippet should be executed against. A workspace
//! may hold several installations, nested plugins and config documents;
//! the resolver tries a fixed sequence of strategies and the first one
//! that yields a root wins.
//!
//! Nothing is cached between calls. Each call builds its own
//! [`RootValidator`], so signature checks are shared within a call only.

pub mod signature;

use crate::{
    config::{self, LoadedConfig},
    error::{Error, Result},
    interfaces::FileSystem,
    types::WorkspaceContext,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use signature::{RootSignature, RootValidator};

/// Subdirectories probed below each workspace folder, in order
pub const COMMON_SUBDIRS: [&str; 6] = ["public_html", "public", "www", "htdocs", "wordpress", "wp"];

/// Directories never entered by the recursive search
const SKIPPED_DIRS: [&str; 2] = ["vendor", "node_modules"];

/// Deepest level below a workspace folder the recursive search visits
const MAX_DEPTH: usize = 3;

/// Strategy that produced a root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStrategy {
    ExplicitRoot,
    ConfigFile,
    WorkspaceRoot,
    CommonSubdirectory,
    ActiveFileAncestor,
    ToolDirectoryAncestor,
    RecursiveSearch,
    ContainingInstallation,
    WorkspaceFallback,
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolutionStrategy::ExplicitRoot => "explicit root",
            ResolutionStrategy::ConfigFile => "config file",
            ResolutionStrategy::WorkspaceRoot => "workspace root",
            ResolutionStrategy::CommonSubdirectory => "common subdirectory",
            ResolutionStrategy::ActiveFileAncestor => "active file ancestor",
            ResolutionStrategy::ToolDirectoryAncestor => ".tinkersan ancestor",
            ResolutionStrategy::RecursiveSearch => "recursive search",
            ResolutionStrategy::ContainingInstallation => "installation containing active file",
            ResolutionStrategy::WorkspaceFallback => "first workspace folder",
        };
        f.write_str(label)
    }
}

/// Outcome of a resolution call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub root: PathBuf,
    pub strategy: ResolutionStrategy,
    /// Config document that applies to this request, if any
    pub config: Option<LoadedConfig>,
}

impl Resolution {
    fn new(root: PathBuf, strategy: ResolutionStrategy, config: Option<LoadedConfig>) -> Self {
        info!("Project root: {} (via {})", root.display(), strategy);
        Self {
            root,
            strategy,
            config,
        }
    }
}

/// Locates project roots inside a workspace
#[derive(Clone)]
pub struct ProjectRootResolver {
    fs: Arc<dyn FileSystem>,
    signatures: Vec<RootSignature>,
}

impl fmt::Debug for ProjectRootResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectRootResolver")
            .field(
                "signatures",
                &self.signatures.iter().map(|s| s.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ProjectRootResolver {
    /// Resolver accepting WordPress and Laravel roots
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_signatures(fs, vec![RootSignature::wordpress(), RootSignature::laravel()])
    }

    pub fn with_signatures(fs: Arc<dyn FileSystem>, signatures: Vec<RootSignature>) -> Self {
        Self { fs, signatures }
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn signatures(&self) -> &[RootSignature] {
        &self.signatures
    }

    fn validator(&self) -> RootValidator<'_> {
        RootValidator::new(self.fs.as_ref(), &self.signatures)
    }

    /// Resolve the project root using the standard strategy chain
    pub fn resolve(&self, ctx: &WorkspaceContext) -> Result<Resolution> {
        let validator = self.validator();
        self.resolve_with(&validator, ctx)
    }

    fn resolve_with(
        &self,
        validator: &RootValidator<'_>,
        ctx: &WorkspaceContext,
    ) -> Result<Resolution> {
        let config = self.discovered_config(ctx);

        if let Some(resolution) = self.explicit_root(ctx, &config)? {
            return Ok(resolution);
        }

        debug!("Step 2: config files");
        if let Some(loaded) = &config {
            if let Some(root) = self.root_from_config(validator, loaded) {
                return Ok(Resolution::new(root, ResolutionStrategy::ConfigFile, config));
            }
        }

        debug!("Step 3: workspace roots");
        if let Some(folder) = ctx
            .workspace_folders
            .iter()
            .find(|folder| validator.is_root(folder))
        {
            return Ok(Resolution::new(
                folder.clone(),
                ResolutionStrategy::WorkspaceRoot,
                config,
            ));
        }

        debug!("Step 4: common subdirectories");
        if let Some(root) = self.common_subdirectory_roots(validator, ctx).into_iter().next() {
            return Ok(Resolution::new(
                root,
                ResolutionStrategy::CommonSubdirectory,
                config,
            ));
        }

        debug!("Step 5: ancestors of the active file");
        if let Some(root) = ctx.active_dir().and_then(|dir| validator.find_upwards(dir)) {
            return Ok(Resolution::new(
                root,
                ResolutionStrategy::ActiveFileAncestor,
                config,
            ));
        }

        debug!("Step 6: ancestors of {}", config::TOOL_DIR);
        for folder in &ctx.workspace_folders {
            let tool_dir = folder.join(config::TOOL_DIR);
            if !self.fs.is_dir(&tool_dir) {
                continue;
            }
            if let Some(root) = validator.find_upwards(&tool_dir) {
                return Ok(Resolution::new(
                    root,
                    ResolutionStrategy::ToolDirectoryAncestor,
                    config,
                ));
            }
        }

        debug!("Step 7: recursive search");
        let found = self.search_roots(validator, &ctx.workspace_folders);
        let chosen = ctx
            .active_file
            .as_deref()
            .and_then(|active| closest_containing(&found, active))
            .or_else(|| found.first());
        if let Some(root) = chosen {
            return Ok(Resolution::new(
                root.clone(),
                ResolutionStrategy::RecursiveSearch,
                config,
            ));
        }

        debug!("Step 8: first workspace folder");
        match ctx.workspace_folders.first() {
            Some(folder) => Ok(Resolution::new(
                folder.clone(),
                ResolutionStrategy::WorkspaceFallback,
                config,
            )),
            None => Err(Error::ConfigError(
                "Could not determine project root: no workspace folder is open. Tried explicit \
                 root, config files, workspace roots, common subdirectories, active file \
                 ancestors, .tinkersan ancestors and recursive search"
                    .to_string(),
            )),
        }
    }

    /// Resolve the root for the file being edited.
    ///
    /// Prefers the config and installation closest to the active file, so
    /// that with sibling installations the one holding the file wins.
    pub fn resolve_for_current_context(&self, ctx: &WorkspaceContext) -> Result<Resolution> {
        let validator = self.validator();

        let Some(active) = ctx.active_file.as_deref() else {
            return self.resolve_with(&validator, ctx);
        };

        let near = ctx
            .folder_of_active_file()
            .and_then(|folder| config::find_config_near(self.fs.as_ref(), active, folder))
            .and_then(|candidate| self.load_config(&candidate.path));
        let config = near.clone().or_else(|| self.discovered_config(ctx));

        if let Some(resolution) = self.explicit_root(ctx, &config)? {
            return Ok(resolution);
        }

        if let Some(loaded) = &near {
            if let Some(root) = self.root_from_config(&validator, loaded) {
                return Ok(Resolution::new(root, ResolutionStrategy::ConfigFile, config));
            }
        }

        if let Some(root) = ctx.active_dir().and_then(|dir| validator.find_upwards(dir)) {
            return Ok(Resolution::new(
                root,
                ResolutionStrategy::ActiveFileAncestor,
                config,
            ));
        }

        let installations = self.installations(&validator, ctx);
        if let Some(root) = closest_containing(&installations, active) {
            return Ok(Resolution::new(
                root.clone(),
                ResolutionStrategy::ContainingInstallation,
                config,
            ));
        }

        debug!("No installation contains {}, using standard resolution", active.display());
        self.resolve_with(&validator, ctx)
    }

    /// Every installation in the workspace: folders, common subdirectories
    /// and the recursive search, without duplicates
    pub fn find_all_roots(&self, ctx: &WorkspaceContext) -> Vec<PathBuf> {
        let validator = self.validator();
        self.installations(&validator, ctx)
    }

    fn installations(&self, validator: &RootValidator<'_>, ctx: &WorkspaceContext) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = ctx
            .workspace_folders
            .iter()
            .filter(|folder| validator.is_root(folder))
            .cloned()
            .collect();
        roots.extend(self.common_subdirectory_roots(validator, ctx));
        roots.extend(self.search_roots(validator, &ctx.workspace_folders));

        let mut unique = Vec::with_capacity(roots.len());
        for root in roots {
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        debug!("Found {} installation(s) in workspace", unique.len());
        unique
    }

    fn explicit_root(
        &self,
        ctx: &WorkspaceContext,
        config: &Option<LoadedConfig>,
    ) -> Result<Option<Resolution>> {
        let Some(root) = ctx.explicit_root.as_deref() else {
            return Ok(None);
        };

        debug!("Step 1: explicit root {}", root.display());
        if self.fs.exists(root) {
            Ok(Some(Resolution::new(
                root.to_path_buf(),
                ResolutionStrategy::ExplicitRoot,
                config.clone(),
            )))
        } else {
            Err(Error::ConfigError(format!(
                "Configured project root does not exist: {}",
                root.display()
            )))
        }
    }

    fn discovered_config(&self, ctx: &WorkspaceContext) -> Option<LoadedConfig> {
        let candidates = config::discover_candidates(self.fs.as_ref(), &ctx.workspace_folders);
        let chosen = config::choose_candidate(&candidates, ctx.active_file.as_deref())?;
        if candidates.len() > 1 {
            debug!(
                "Chose {} out of {} config candidates",
                chosen.path.display(),
                candidates.len()
            );
        }
        self.load_config(&chosen.path)
    }

    fn load_config(&self, path: &Path) -> Option<LoadedConfig> {
        match LoadedConfig::load(self.fs.as_ref(), path) {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                warn!("Ignoring config {}: {e}", path.display());
                None
            }
        }
    }

    fn root_from_config(
        &self,
        validator: &RootValidator<'_>,
        loaded: &LoadedConfig,
    ) -> Option<PathBuf> {
        if let Some(declared) = loaded.declared_root() {
            if validator.is_root(&declared) {
                return Some(declared);
            }
            debug!(
                "Declared root {} in {} is not a project root",
                declared.display(),
                loaded.path.display()
            );
        }
        validator.find_upwards(loaded.dir())
    }

    fn common_subdirectory_roots(
        &self,
        validator: &RootValidator<'_>,
        ctx: &WorkspaceContext,
    ) -> Vec<PathBuf> {
        ctx.workspace_folders
            .iter()
            .flat_map(|folder| COMMON_SUBDIRS.iter().map(move |sub| folder.join(sub)))
            .filter(|dir| validator.is_root(dir))
            .collect()
    }

    /// Roots below the folders, at most [`MAX_DEPTH`] levels deep, sorted
    fn search_roots(&self, validator: &RootValidator<'_>, folders: &[PathBuf]) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for folder in folders {
            self.walk(validator, folder, 1, &mut found);
        }
        found.sort();
        found.dedup();
        found
    }

    fn walk(
        &self,
        validator: &RootValidator<'_>,
        dir: &Path,
        depth: usize,
        found: &mut Vec<PathBuf>,
    ) {
        if depth > MAX_DEPTH {
            return;
        }

        for entry in self.fs.list_entries(dir) {
            if entry.starts_with('.') || SKIPPED_DIRS.contains(&entry.as_str()) {
                continue;
            }
            let child = dir.join(&entry);
            if !self.fs.is_dir(&child) {
                continue;
            }
            if validator.is_root(&child) {
                debug!("Found root at depth {}: {}", depth, child.display());
                found.push(child);
            } else {
                self.walk(validator, &child, depth + 1, found);
            }
        }
    }
}

/// The root holding `file` with the fewest components between them
fn closest_containing<'a>(roots: &'a [PathBuf], file: &Path) -> Option<&'a PathBuf> {
    roots
        .iter()
        .filter_map(|root| {
            file.strip_prefix(root)
                .ok()
                .map(|rest| (rest.components().count(), root))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, root)| root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::OsFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<?php").unwrap();
    }

    fn make_wordpress(root: &Path) {
        for file in ["wp-config.php", "wp-load.php", "wp-settings.php"] {
            touch(&root.join(file));
        }
        for dir in ["wp-content/plugins", "wp-includes", "wp-admin"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
    }

    fn make_laravel(root: &Path) {
        touch(&root.join("artisan"));
        touch(&root.join("bootstrap/app.php"));
        touch(&root.join("composer.json"));
        for dir in ["app", "config", "routes"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
    }

    fn resolver() -> ProjectRootResolver {
        ProjectRootResolver::new(Arc::new(OsFileSystem::new()))
    }

    #[test]
    fn test_explicit_root() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(vec![temp_dir.path().to_path_buf()])
            .with_explicit_root(temp_dir.path().join("anything"));
        fs::create_dir(temp_dir.path().join("anything")).unwrap();

        let resolution = resolver().resolve(&ctx).unwrap();
        assert_eq!(resolution.root, temp_dir.path().join("anything"));
        assert_eq!(resolution.strategy, ResolutionStrategy::ExplicitRoot);
    }

    #[test]
    fn test_missing_explicit_root_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = WorkspaceContext::new(vec![temp_dir.path().to_path_buf()])
            .with_explicit_root(temp_dir.path().join("missing"));

        let err = resolver().resolve(&ctx).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_no_folders_is_config_error() {
        let err = resolver().resolve(&WorkspaceContext::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no workspace folder"));
        assert!(message.contains("recursive search"));
    }

    #[test]
    fn test_workspace_root_and_common_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let direct = temp_dir.path().join("direct");
        make_laravel(&direct);
        let hosted = temp_dir.path().join("hosted");
        make_wordpress(&hosted.join("public_html"));

        let resolution = resolver()
            .resolve(&WorkspaceContext::new(vec![direct.clone()]))
            .unwrap();
        assert_eq!(resolution.root, direct);
        assert_eq!(resolution.strategy, ResolutionStrategy::WorkspaceRoot);

        let resolution = resolver()
            .resolve(&WorkspaceContext::new(vec![hosted.clone()]))
            .unwrap();
        assert_eq!(resolution.root, hosted.join("public_html"));
        assert_eq!(resolution.strategy, ResolutionStrategy::CommonSubdirectory);
    }

    #[test]
    fn test_active_file_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let site = temp_dir.path().join("site");
        make_wordpress(&site);
        let ws = site.join("wp-content/plugins/shop");
        let file = ws.join("src/Cart.php");
        touch(&file);

        let ctx = WorkspaceContext::new(vec![ws]).with_active_file(&file);
        let resolution = resolver().resolve(&ctx).unwrap();
        assert_eq!(resolution.root, site);
        assert_eq!(resolution.strategy, ResolutionStrategy::ActiveFileAncestor);
    }

    #[test]
    fn test_tool_directory_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let site = temp_dir.path().join("site");
        make_wordpress(&site);
        let ws = site.join("wp-content/plugins/shop");
        fs::create_dir_all(ws.join(".tinkersan")).unwrap();

        let resolution = resolver()
            .resolve(&WorkspaceContext::new(vec![ws]))
            .unwrap();
        assert_eq!(resolution.root, site);
        assert_eq!(resolution.strategy, ResolutionStrategy::ToolDirectoryAncestor);
    }

    #[test]
    fn test_recursive_search_skips_vendor_and_dot_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().to_path_buf();
        make_wordpress(&ws.join("vendor/johnpbloch/wordpress"));
        make_wordpress(&ws.join(".cache/wp"));
        make_wordpress(&ws.join("sites/b/app"));
        make_wordpress(&ws.join("sites/a/app"));
        make_wordpress(&ws.join("too/deep/for/search"));

        let resolution = resolver().resolve(&WorkspaceContext::new(vec![ws.clone()])).unwrap();
        assert_eq!(resolution.root, ws.join("sites/a/app"));
        assert_eq!(resolution.strategy, ResolutionStrategy::RecursiveSearch);

        let roots = resolver().find_all_roots(&WorkspaceContext::new(vec![ws.clone()]));
        assert_eq!(roots, vec![ws.join("sites/a/app"), ws.join("sites/b/app")]);
    }

    #[test]
    fn test_recursive_search_does_not_descend_into_roots() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().to_path_buf();
        make_wordpress(&ws.join("site"));
        make_wordpress(&ws.join("site/nested"));

        let roots = resolver().find_all_roots(&WorkspaceContext::new(vec![ws.clone()]));
        assert_eq!(roots, vec![ws.join("site")]);
    }

    #[test]
    fn test_fallback_to_first_folder() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();

        let resolution = resolver()
            .resolve(&WorkspaceContext::new(vec![first.clone(), second]))
            .unwrap();
        assert_eq!(resolution.root, first);
        assert_eq!(resolution.strategy, ResolutionStrategy::WorkspaceFallback);
        assert!(resolution.config.is_none());
    }

    #[test]
    fn test_config_declared_root() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().to_path_buf();
        make_wordpress(&ws.join("web/cms"));
        fs::create_dir_all(ws.join(".tinkersan")).unwrap();
        fs::write(
            ws.join(".tinkersan/.tinkersan.json"),
            r#"{ "projectRoot": "../web/cms", "framework": "WordPress" }"#,
        )
        .unwrap();

        let resolution = resolver().resolve(&WorkspaceContext::new(vec![ws.clone()])).unwrap();
        assert_eq!(resolution.root, ws.join("web/cms"));
        assert_eq!(resolution.strategy, ResolutionStrategy::ConfigFile);
        let config = resolution.config.unwrap();
        assert_eq!(config.config.framework.as_deref(), Some("WordPress"));
    }

    #[test]
    fn test_invalid_declared_root_walks_up_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let site = temp_dir.path().join("site");
        make_wordpress(&site);
        let plugin = site.join("wp-content/plugins/shop");
        fs::create_dir_all(plugin.join(".tinkersan")).unwrap();
        fs::write(
            plugin.join(".tinkersan/tinkersan.json"),
            r#"{ "projectRoot": "./nowhere" }"#,
        )
        .unwrap();

        let resolution = resolver()
            .resolve(&WorkspaceContext::new(vec![plugin]))
            .unwrap();
        assert_eq!(resolution.root, site);
        assert_eq!(resolution.strategy, ResolutionStrategy::ConfigFile);
    }

    #[test]
    fn test_sibling_installations_follow_active_file() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().to_path_buf();
        let first = ws.join("sites/first");
        let second = ws.join("sites/second");
        make_wordpress(&first);
        make_wordpress(&second);
        let file = second.join("wp-content/plugins/shop/shop.php");
        touch(&file);

        let ctx = WorkspaceContext::new(vec![ws.clone()]).with_active_file(&file);
        let resolver = resolver();
        let resolution = resolver.resolve_for_current_context(&ctx).unwrap();
        assert_eq!(resolution.root, second);

        let again = resolver.resolve_for_current_context(&ctx).unwrap();
        assert_eq!(resolution, again);

        let without_file = resolver.resolve(&WorkspaceContext::new(vec![ws])).unwrap();
        assert_eq!(without_file.root, first);
    }

    #[test]
    fn test_current_context_prefers_config_near_file() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().to_path_buf();
        make_wordpress(&ws.join("one"));
        make_wordpress(&ws.join("two"));
        let tool = ws.join("tools/scripts/.tinkersan");
        fs::create_dir_all(&tool).unwrap();
        fs::write(tool.join(".tinkersan.json"), r#"{ "projectRoot": "../../../two" }"#).unwrap();
        let file = ws.join("tools/scripts/report.php");
        touch(&file);

        let ctx = WorkspaceContext::new(vec![ws.clone()]).with_active_file(&file);
        let resolution = resolver().resolve_for_current_context(&ctx).unwrap();
        assert_eq!(resolution.root, ws.join("two"));
        assert_eq!(resolution.strategy, ResolutionStrategy::ConfigFile);
    }

    #[test]
    fn test_config_outside_workspace_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().join("ws");
        make_wordpress(&ws);
        make_wordpress(&temp_dir.path().join("elsewhere/site"));
        let scratch = temp_dir.path().join("t");
        fs::create_dir_all(&scratch).unwrap();
        fs::write(
            scratch.join("tinkersan.json"),
            r#"{ "projectRoot": "../elsewhere/site" }"#,
        )
        .unwrap();
        let file = scratch.join("scratch/note.php");
        touch(&file);

        let ctx = WorkspaceContext::new(vec![ws.clone()]).with_active_file(&file);
        let resolution = resolver().resolve_for_current_context(&ctx).unwrap();
        assert_eq!(resolution.root, ws);
        assert_eq!(resolution.strategy, ResolutionStrategy::WorkspaceRoot);
        assert!(resolution.config.is_none());
    }

    #[test]
    fn test_config_tie_break_follows_active_file() {
        let temp_dir = TempDir::new().unwrap();
        let site = temp_dir.path().join("site");
        make_wordpress(&site);
        let other = temp_dir.path().join("other");
        make_laravel(&other);

        fs::create_dir_all(site.join(".tinkersan")).unwrap();
        fs::write(site.join(".tinkersan/.tinkersan.json"), r#"{ "projectRoot": ".." }"#).unwrap();
        let plugin = site.join("wp-content/plugins/bridge");
        fs::create_dir_all(plugin.join(".tinkersan")).unwrap();
        fs::write(
            plugin.join(".tinkersan/.tinkersan.json"),
            format!(r#"{{ "projectRoot": "{}" }}"#, other.display()),
        )
        .unwrap();
        let file = plugin.join("bridge.php");
        touch(&file);

        let resolver = resolver();
        let in_plugin = WorkspaceContext::new(vec![site.clone()]).with_active_file(&file);
        assert_eq!(resolver.resolve(&in_plugin).unwrap().root, other);

        let elsewhere = WorkspaceContext::new(vec![site.clone()])
            .with_active_file(site.join("wp-content/themes/t/functions.php"));
        assert_eq!(resolver.resolve(&elsewhere).unwrap().root, site);
    }

    #[test]
    fn test_invalid_config_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().to_path_buf();
        make_laravel(&ws);
        fs::write(ws.join("tinkersan.json"), "{ broken").unwrap();

        let resolution = resolver().resolve(&WorkspaceContext::new(vec![ws.clone()])).unwrap();
        assert_eq!(resolution.root, ws);
        assert_eq!(resolution.strategy, ResolutionStrategy::WorkspaceRoot);
        assert!(resolution.config.is_none());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let ws = temp_dir.path().to_path_buf();
        make_wordpress(&ws.join("b"));
        make_laravel(&ws.join("a"));

        let ctx = WorkspaceContext::new(vec![ws.clone()]);
        let resolver = resolver();
        let first = resolver.resolve(&ctx).unwrap();
        for _ in 0..3 {
            assert_eq!(resolver.resolve(&ctx).unwrap(), first);
        }
        assert_eq!(first.root, ws.join("a"));
    }
}
