use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use super::detect;
use crate::cli::GlobalArgs;
use crate::logging::LogHandle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectReport {
    root: PathBuf,
    strategy: String,
    framework: String,
    priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PathBuf>,
}

pub fn detect_command(global: &GlobalArgs, json: bool, log: &LogHandle) -> Result<()> {
    let (_, detection) = detect(global, global.settings(), log)?;

    let report = DetectReport {
        strategy: detection.strategy.to_string(),
        framework: detection.framework().to_string(),
        priority: detection.bootstrapper.priority().to_string(),
        root: detection.root,
        config: detection.config_path,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("🔍 Project root: {}", report.root.display());
    println!("   📍 Found via: {}", report.strategy);
    println!("   📦 Framework: {} (priority {})", report.framework, report.priority);
    if let Some(config) = &report.config {
        println!("   ⚙️  Config: {}", config.display());
    }
    Ok(())
}
