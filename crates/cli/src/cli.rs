use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tinkersan_core::{FrameworkSelection, Settings, WorkspaceContext};

use crate::commands::{completions_command, detect_command, init_command, run_command};
use crate::logging::LogHandle;

#[derive(Parser, Debug)]
#[command(name = "tinkersan")]
#[command(version, about = "Run PHP snippets against a WordPress, Laravel or plain PHP project", long_about = None)]
#[command(after_help = "ENVIRONMENT:
    RUST_LOG=debug                    Enable debug logging
    TINKERSAN_PROJECT_ROOT            Project root overriding detection
    TINKERSAN_FRAMEWORK               Framework name (or 'auto')
    TINKERSAN_PHP                     PHP binary
    TINKERSAN_CUSTOM_BOOTSTRAPPERS    Bootstrapper manifests, path-separated")]
pub struct Tinkersan {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Workspace folder (repeatable, defaults to the current directory)
    #[arg(short, long = "workspace", global = true)]
    pub workspace: Vec<PathBuf>,

    /// File being edited, used to pick between several installations
    #[arg(short, long, global = true)]
    pub active_file: Option<PathBuf>,

    /// Project root, skipping detection
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Framework to bootstrap (e.g. Laravel, WordPress, PHP, auto)
    #[arg(short, long, global = true)]
    pub framework: Option<String>,

    /// PHP binary to run scripts with
    #[arg(long, global = true)]
    pub php: Option<String>,

    /// Custom bootstrapper manifest (repeatable)
    #[arg(short, long = "bootstrapper", global = true)]
    pub bootstrappers: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a PHP snippet in the detected project
    #[command(visible_alias = "r")]
    Run {
        /// PHP code to run
        #[arg(short = 'e', long = "eval", conflicts_with = "file")]
        code: Option<String>,

        /// File holding the PHP code to run ('-' reads stdin)
        file: Option<PathBuf>,

        /// Print the composed script without executing it
        #[arg(short, long)]
        dry_run: bool,

        /// Keep output printed while the framework boots
        #[arg(long)]
        keep_bootstrap_output: bool,
    },
    /// Show the detected project root and framework
    #[command(visible_alias = "d")]
    Detect {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a sample .tinkersan.json
    Init {
        /// Directory to initialize (defaults to the current directory)
        dir: Option<PathBuf>,

        /// Write the config next to the project instead of into .tinkersan/
        #[arg(long)]
        at_root: bool,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Print editor completions as JSON
    Completions {
        /// Completions of every registered framework instead of the detected one
        #[arg(long)]
        all: bool,
    },
}

impl Tinkersan {
    /// Execute the command
    pub fn execute(self, log: &LogHandle) -> Result<()> {
        let global = self.global;
        match self.command {
            Commands::Run {
                code,
                file,
                dry_run,
                keep_bootstrap_output,
            } => run_command(
                &global,
                code.as_deref(),
                file.as_deref(),
                dry_run,
                keep_bootstrap_output,
                log,
            ),
            Commands::Detect { json } => detect_command(&global, json, log),
            Commands::Init {
                dir,
                at_root,
                force,
            } => init_command(dir.as_deref(), at_root, force),
            Commands::Completions { all } => completions_command(&global, all, log),
        }
    }
}

impl GlobalArgs {
    /// Environment settings overlaid with the flags given on the command line
    pub fn settings(&self) -> Settings {
        self.apply(Settings::from_env())
    }

    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(root) = &self.root {
            settings = settings.with_explicit_root(absolute(root));
        }
        if let Some(framework) = &self.framework {
            settings = settings.with_framework(FrameworkSelection::parse(framework));
        }
        if let Some(php) = &self.php {
            settings = settings.with_php_binary(php.as_str());
        }
        for path in &self.bootstrappers {
            settings = settings.with_custom_bootstrapper(absolute(path));
        }
        settings
    }

    pub fn context(&self) -> Result<WorkspaceContext> {
        let folders = if self.workspace.is_empty() {
            vec![std::env::current_dir().context("Failed to get current directory")?]
        } else {
            self.workspace.iter().map(|p| absolute(p)).collect()
        };

        let mut ctx = WorkspaceContext::new(folders);
        if let Some(file) = &self.active_file {
            ctx = ctx.with_active_file(absolute(file));
        }
        Ok(ctx)
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
