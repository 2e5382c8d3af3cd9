//! High-level entry points
//!
//! [`Tinker`] wires the resolver, the registry, the composer and a script
//! runner together: resolve the root, pick a bootstrapper, compose the
//! script, run it.

use crate::{
    config::{FrameworkSelection, Settings},
    error::Result,
    framework::{BootstrapperRegistry, FrameworkBootstrapper, LoadReport},
    interfaces::{FileSystem, RunOutput, ScriptRunner},
    resolver::{ProjectRootResolver, Resolution, ResolutionStrategy},
    script::{
        BOOTSTRAP_ERROR_MARKER, ERROR_MARKER, EXCEPTION_MARKER, ExecutionScript,
        ExecutionScriptComposer,
    },
    services::{OsFileSystem, PhpProcessRunner},
    types::{Completion, WorkspaceContext},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Root and framework chosen for a request
#[derive(Debug, Clone)]
pub struct Detection {
    pub root: PathBuf,
    pub strategy: ResolutionStrategy,
    pub bootstrapper: Arc<dyn FrameworkBootstrapper>,
    /// Config document that took part in the decision
    pub config_path: Option<PathBuf>,
    /// Whether the project config asks for verbose logging
    pub verbose_logging: bool,
}

impl Detection {
    pub fn framework(&self) -> &str {
        self.bootstrapper.name()
    }
}

/// A composed script together with where and how it will run
#[derive(Debug, Clone)]
pub struct PreparedExecution {
    pub root: PathBuf,
    pub strategy: ResolutionStrategy,
    pub framework: String,
    pub script: ExecutionScript,
}

/// How a run ended, judged from the markers in its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Completed,
    /// The bootstrap fragment threw; user code never ran
    BootstrapFailed,
    /// User code threw an exception or error
    Raised,
    /// The PHP process failed for another reason
    ProcessFailed,
}

impl ExecutionOutcome {
    pub fn classify(output: &RunOutput) -> Self {
        if !output.success {
            // Kept bootstrap output may come before the marker line
            let bootstrap_prefix = format!("{BOOTSTRAP_ERROR_MARKER}: ");
            if output.text.lines().any(|line| line.starts_with(&bootstrap_prefix)) {
                return ExecutionOutcome::BootstrapFailed;
            }
            return ExecutionOutcome::ProcessFailed;
        }

        let raised = output.text.lines().last().is_some_and(|line| {
            line.starts_with(&format!("{EXCEPTION_MARKER}: "))
                || line.starts_with(&format!("{ERROR_MARKER}: "))
        });
        if raised {
            ExecutionOutcome::Raised
        } else {
            ExecutionOutcome::Completed
        }
    }
}

/// Result of running a prepared script
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub prepared: PreparedExecution,
    pub output: RunOutput,
    pub outcome: ExecutionOutcome,
}

/// Facade owning everything needed to run snippets against a project
pub struct Tinker {
    settings: Settings,
    fs: Arc<dyn FileSystem>,
    registry: BootstrapperRegistry,
    resolver: ProjectRootResolver,
    composer: ExecutionScriptComposer,
    runner: Arc<dyn ScriptRunner>,
}

impl std::fmt::Debug for Tinker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tinker")
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .field("runner", &self.runner.name())
            .finish()
    }
}

impl Tinker {
    /// Facade on the real filesystem running the configured PHP binary
    pub fn new(settings: Settings) -> Self {
        let runner = Arc::new(PhpProcessRunner::new(settings.php_binary.clone()));
        Self::with_parts(settings, Arc::new(OsFileSystem::new()), runner)
    }

    pub fn with_parts(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn ScriptRunner>,
    ) -> Self {
        let mut registry = BootstrapperRegistry::with_builtins();
        if !settings.custom_bootstrappers.is_empty() {
            registry.load_custom(fs.as_ref(), &settings.custom_bootstrappers);
        }

        Self {
            resolver: ProjectRootResolver::new(fs.clone()),
            composer: ExecutionScriptComposer::with_options(settings.composer),
            settings,
            fs,
            registry,
            runner,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &BootstrapperRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &ProjectRootResolver {
        &self.resolver
    }

    /// Load additional bootstrapper manifests
    pub fn load_custom(&mut self, paths: &[PathBuf]) -> LoadReport {
        self.registry.load_custom(self.fs.as_ref(), paths)
    }

    /// Resolve the root and choose the bootstrapper for `ctx`
    pub fn detect(&mut self, ctx: &WorkspaceContext) -> Result<Detection> {
        let mut ctx = ctx.clone();
        if ctx.explicit_root.is_none() {
            ctx.explicit_root = self.settings.explicit_root.clone();
        }

        let resolution = resolve_project_root(&self.resolver, &ctx)?;
        let Resolution {
            root,
            strategy,
            config,
        } = resolution;

        let mut selection = self.settings.framework.clone();
        if let Some(loaded) = &config {
            let report = self.load_custom(&loaded.custom_bootstrapper_paths());
            if !report.registered.is_empty() {
                debug!(
                    "Registered {} bootstrapper(s) from {}",
                    report.registered.len(),
                    loaded.path.display()
                );
            }
            if selection.is_automatic() {
                selection = loaded.config.framework_selection();
            }
        }

        let bootstrapper = select_bootstrapper(&self.registry, self.fs.as_ref(), &root, &selection);
        Ok(Detection {
            root,
            strategy,
            bootstrapper,
            verbose_logging: config
                .as_ref()
                .is_some_and(|c| c.config.settings.verbose_logging),
            config_path: config.map(|c| c.path),
        })
    }

    /// Build the script for `code` without running it
    pub fn prepare(&mut self, ctx: &WorkspaceContext, code: &str) -> Result<PreparedExecution> {
        let detection = self.detect(ctx)?;
        self.prepare_detected(detection, code)
    }

    /// Build the script for `code` against an earlier detection
    pub fn prepare_detected(&self, detection: Detection, code: &str) -> Result<PreparedExecution> {
        let fragment = detection.bootstrapper.bootstrap_code(&detection.root)?;
        let script = self.composer.compose(&fragment, code);
        info!(
            "Prepared {} script for {}",
            detection.framework(),
            detection.root.display()
        );

        Ok(PreparedExecution {
            framework: detection.framework().to_string(),
            root: detection.root,
            strategy: detection.strategy,
            script,
        })
    }

    /// Build and run the script for `code`
    pub fn execute(&mut self, ctx: &WorkspaceContext, code: &str) -> Result<ExecutionReport> {
        let prepared = self.prepare(ctx, code)?;
        let output = self.run(&prepared)?;
        let outcome = ExecutionOutcome::classify(&output);
        debug!("Execution finished: {:?}", outcome);

        Ok(ExecutionReport {
            prepared,
            output,
            outcome,
        })
    }

    pub fn run(&self, prepared: &PreparedExecution) -> Result<RunOutput> {
        debug!(
            "Running script with {} in {}",
            self.runner.name(),
            prepared.root.display()
        );
        self.runner.run(prepared.script.as_str(), &prepared.root)
    }

    /// Completions for one framework, or for all of them
    pub fn completions(&self, framework: Option<&str>) -> Vec<Completion> {
        list_completions(&self.registry, framework)
    }
}

/// Resolve the project root, preferring the active file's installation
pub fn resolve_project_root(
    resolver: &ProjectRootResolver,
    ctx: &WorkspaceContext,
) -> Result<Resolution> {
    if ctx.active_file.is_some() {
        resolver.resolve_for_current_context(ctx)
    } else {
        resolver.resolve(ctx)
    }
}

/// Pick the bootstrapper for `root`; never fails
pub fn select_bootstrapper(
    registry: &BootstrapperRegistry,
    fs: &dyn FileSystem,
    root: &Path,
    selection: &FrameworkSelection,
) -> Arc<dyn FrameworkBootstrapper> {
    registry.select(fs, root, selection)
}

/// Compose the script that boots `bootstrapper` from `root` and runs `user_code`
pub fn compose_execution_script(
    bootstrapper: &dyn FrameworkBootstrapper,
    root: &Path,
    user_code: &str,
) -> Result<ExecutionScript> {
    let fragment = bootstrapper.bootstrap_code(root)?;
    Ok(ExecutionScriptComposer::new().compose(&fragment, user_code))
}

pub fn list_completions(registry: &BootstrapperRegistry, framework: Option<&str>) -> Vec<Completion> {
    registry.completions(framework)
}
