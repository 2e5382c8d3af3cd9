use super::{FrameworkSelection, TOOL_DIR, normalize};
use crate::{
    error::{Error, Result},
    interfaces::FileSystem,
    resolver::{RootSignature, RootValidator},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-project configuration document (`.tinkersan.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Project root, relative to the directory holding this document
    #[serde(
        default,
        alias = "wordpressRoot",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_root: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    /// Bootstrapper manifests, relative to the directory holding this document
    #[serde(default)]
    pub custom_bootstrappers: Vec<String>,

    #[serde(default)]
    pub settings: ConfigSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSettings {
    #[serde(default = "enabled")]
    pub auto_detect: bool,
    #[serde(default = "enabled")]
    pub show_detection_notice: bool,
    #[serde(default)]
    pub verbose_logging: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ConfigSettings {
    fn default() -> Self {
        Self {
            auto_detect: true,
            show_detection_notice: true,
            verbose_logging: false,
        }
    }
}

impl ProjectConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs.read_text(path)?;
        Self::from_json(&content)
            .map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Framework selection declared by this document
    pub fn framework_selection(&self) -> FrameworkSelection {
        self.framework
            .as_deref()
            .map(FrameworkSelection::parse)
            .unwrap_or_default()
    }
}

/// A config document together with the file it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: ProjectConfig,
}

impl LoadedConfig {
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let config = ProjectConfig::load(fs, path)?;
        debug!("Loaded config from {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Directory holding the config file
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("/"))
    }

    /// Declared root resolved against the config file's directory
    pub fn declared_root(&self) -> Option<PathBuf> {
        self.config
            .project_root
            .as_deref()
            .filter(|root| !root.trim().is_empty())
            .map(|root| normalize(&self.dir().join(root)))
    }

    /// Custom bootstrapper manifests resolved against the config file's directory
    pub fn custom_bootstrapper_paths(&self) -> Vec<PathBuf> {
        self.config
            .custom_bootstrappers
            .iter()
            .map(|p| normalize(&self.dir().join(p)))
            .collect()
    }
}

/// Write a sample config document to `target`.
///
/// Inside a `.tinkersan` directory the root defaults to `..`, otherwise to
/// `.`; when a WordPress or Laravel installation is found above the target
/// the root points at it instead.
pub fn create_sample_config(fs: &dyn FileSystem, target: &Path) -> Result<ProjectConfig> {
    let dir = target
        .parent()
        .ok_or_else(|| Error::ConfigError(format!("Invalid config path: {}", target.display())))?;
    let in_tool_dir = dir.file_name().is_some_and(|name| name == TOOL_DIR);

    let signatures = [RootSignature::wordpress(), RootSignature::laravel()];
    let validator = RootValidator::new(fs, &signatures);
    let search_from = if in_tool_dir {
        dir.parent().unwrap_or(dir)
    } else {
        dir
    };

    let mut project_root = if in_tool_dir { ".." } else { "." }.to_string();
    let mut framework = None;
    if let Some(found) = validator.find_upwards(search_from) {
        let levels = dir.components().count() - found.components().count();
        project_root = if levels == 0 {
            ".".to_string()
        } else {
            vec![".."; levels].join("/")
        };
        framework = signatures
            .iter()
            .find(|signature| signature.matches(fs, &found))
            .map(|signature| signature.name.to_string());
        info!("Sample config points at {} installation {}", framework.as_deref().unwrap_or("PHP"), found.display());
    }

    let config = ProjectConfig {
        project_root: Some(project_root),
        framework,
        custom_bootstrappers: Vec::new(),
        settings: ConfigSettings::default(),
    };

    std::fs::create_dir_all(dir)?;
    std::fs::write(target, config.to_json()?)?;
    Ok(config)
}
