use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tinkersan_core::config::{CONFIG_FILE_NAMES, TOOL_DIR, create_sample_config};
use tinkersan_core::OsFileSystem;
use tracing::info;

pub fn init_command(dir: Option<&Path>, at_root: bool, force: bool) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize {}", dir.display()))?;

    let target = config_target(&dir, at_root);
    if target.exists() && !force {
        println!("❌ Config already exists at: {}", target.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    info!("Writing sample config to {}", target.display());
    let config = create_sample_config(&OsFileSystem::new(), &target)
        .with_context(|| format!("Failed to write config to {}", target.display()))?;

    println!("✅ Created config: {}", target.display());
    println!(
        "   📁 projectRoot: {}",
        config.project_root.as_deref().unwrap_or(".")
    );
    if let Some(framework) = &config.framework {
        println!("   📦 framework: {framework}");
    }
    Ok(())
}

fn config_target(dir: &Path, at_root: bool) -> PathBuf {
    if at_root {
        dir.join(CONFIG_FILE_NAMES[0])
    } else {
        dir.join(TOOL_DIR).join(CONFIG_FILE_NAMES[0])
    }
}
