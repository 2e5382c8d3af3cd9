use crate::script::ComposerOptions;
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_PROJECT_ROOT: &str = "TINKERSAN_PROJECT_ROOT";
pub const ENV_FRAMEWORK: &str = "TINKERSAN_FRAMEWORK";
pub const ENV_PHP: &str = "TINKERSAN_PHP";
pub const ENV_CUSTOM_BOOTSTRAPPERS: &str = "TINKERSAN_CUSTOM_BOOTSTRAPPERS";

const DEFAULT_PHP: &str = "php";

/// How the bootstrapper for a request is chosen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FrameworkSelection {
    /// First bootstrapper whose detection matches
    #[default]
    Automatic,
    /// Bootstrapper with this name, case-insensitive
    Named(String),
}

impl FrameworkSelection {
    /// `auto`, `automatic` and the empty string select detection
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty()
            || value.eq_ignore_ascii_case("auto")
            || value.eq_ignore_ascii_case("automatic")
        {
            FrameworkSelection::Automatic
        } else {
            FrameworkSelection::Named(value.to_string())
        }
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, FrameworkSelection::Automatic)
    }
}

impl FromStr for FrameworkSelection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for FrameworkSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkSelection::Automatic => write!(f, "auto"),
            FrameworkSelection::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Host settings for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Project root that overrides every detection strategy
    pub explicit_root: Option<PathBuf>,
    pub framework: FrameworkSelection,
    /// Bootstrapper manifests loaded in addition to those named by the project config
    pub custom_bootstrappers: Vec<PathBuf>,
    pub php_binary: String,
    pub composer: ComposerOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            explicit_root: None,
            framework: FrameworkSelection::Automatic,
            custom_bootstrappers: Vec::new(),
            php_binary: DEFAULT_PHP.to_string(),
            composer: ComposerOptions::default(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with the `TINKERSAN_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`, keyed by environment variable name
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(root) = value(ENV_PROJECT_ROOT) {
            settings.explicit_root = Some(PathBuf::from(root));
        }
        if let Some(framework) = value(ENV_FRAMEWORK) {
            settings.framework = FrameworkSelection::parse(&framework);
        }
        if let Some(php) = value(ENV_PHP) {
            settings.php_binary = php;
        }
        if let Some(paths) = value(ENV_CUSTOM_BOOTSTRAPPERS) {
            settings.custom_bootstrappers = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }

        settings
    }

    pub fn with_explicit_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.explicit_root = Some(root.into());
        self
    }

    pub fn with_framework(mut self, framework: FrameworkSelection) -> Self {
        self.framework = framework;
        self
    }

    pub fn with_php_binary(mut self, binary: impl Into<String>) -> Self {
        self.php_binary = binary.into();
        self
    }

    pub fn with_custom_bootstrapper(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_bootstrappers.push(path.into());
        self
    }

    pub fn with_composer_options(mut self, options: ComposerOptions) -> Self {
        self.composer = options;
        self
    }
}
