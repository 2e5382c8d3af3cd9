//! User-supplied bootstrappers
//!
//! External bootstrappers are declared in JSON manifests rather than loaded
//! as code. A manifest exports one or more bootstrappers:
//!
//! ```json
//! {
//!   "bootstrappers": [
//!     {
//!       "name": "Symfony",
//!       "priority": 150,
//!       "detect": { "allOf": ["bin/console", "src/Kernel.php"] },
//!       "bootstrapFile": "symfony-bootstrap.php",
//!       "completions": []
//!     }
//!   ]
//! }
//! ```
//!
//! Every export is checked for the four required capabilities (`name`,
//! `detect`, `bootstrap`/`bootstrapFile`, `completions`) before it is
//! accepted. A malformed export is reported and skipped without affecting
//! its siblings.

use super::{FrameworkBootstrapper, Priority};
use crate::{
    error::{Error, Result},
    interfaces::FileSystem,
    script::PhpTemplate,
    types::Completion,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::warn;

static VALID_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9 _.\-]*$").expect("name pattern is valid")
});

/// Marker paths a custom bootstrapper looks for, relative to the root.
///
/// Entries ending in `/` must be directories; other entries just need to exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRules {
    #[serde(default)]
    pub all_of: Vec<String>,
    #[serde(default)]
    pub any_of: Vec<String>,
}

impl DetectRules {
    pub fn is_empty(&self) -> bool {
        self.all_of.is_empty() && self.any_of.is_empty()
    }

    pub fn matches(&self, fs: &dyn FileSystem, root: &Path) -> bool {
        let present = |marker: &String| match marker.strip_suffix('/') {
            Some(dir) => fs.is_dir(&root.join(dir)),
            None => fs.exists(&root.join(marker)),
        };

        self.all_of.iter().all(present)
            && (self.any_of.is_empty() || self.any_of.iter().any(present))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportDefinition {
    name: String,
    #[serde(default)]
    priority: Option<u16>,
    detect: DetectRules,
    #[serde(default)]
    bootstrap: Option<String>,
    #[serde(default)]
    bootstrap_file: Option<String>,
    completions: Vec<Completion>,
}

/// A bootstrapper built from a validated manifest export
#[derive(Debug, Clone)]
pub struct CustomBootstrapper {
    name: String,
    priority: Priority,
    detect: DetectRules,
    template: String,
    completions: Vec<Completion>,
    source: PathBuf,
}

impl CustomBootstrapper {
    /// Manifest this bootstrapper was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl FrameworkBootstrapper for CustomBootstrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn detect(&self, fs: &dyn FileSystem, root: &Path) -> bool {
        self.detect.matches(fs, root)
    }

    fn bootstrap_code(&self, root: &Path) -> Result<String> {
        PhpTemplate::new(self.template.as_str())
            .path_param("root", root)?
            .render()
    }

    fn completions(&self) -> Vec<Completion> {
        self.completions.clone()
    }
}

/// Outcome of loading custom bootstrapper manifests
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names of the bootstrappers that were registered
    pub registered: Vec<String>,

    /// Exports or manifests that were rejected
    pub skipped: Vec<Error>,

    /// Exports already registered from the same manifest
    pub already_loaded: Vec<String>,
}

/// Load every well-formed export of one manifest.
///
/// Returns the accepted bootstrappers and one error per rejected export.
/// A manifest that cannot be read or parsed yields a single error.
pub fn load_manifest(
    fs: &dyn FileSystem,
    path: &Path,
) -> (Vec<CustomBootstrapper>, Vec<Error>) {
    let content = match fs.read_text(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Custom bootstrapper not readable: {}: {e}", path.display());
            return (Vec::new(), vec![e]);
        }
    };

    let document: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!("Custom bootstrapper manifest is not valid JSON: {}: {e}", path.display());
            return (Vec::new(), vec![e.into()]);
        }
    };

    let exports = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("bootstrappers") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                let err = Error::ConfigError(format!(
                    "'bootstrappers' in {} must be a list",
                    path.display()
                ));
                warn!("{err}");
                return (Vec::new(), vec![err]);
            }
            None => vec![Value::Object(map)],
        },
        _ => {
            let err = Error::ConfigError(format!(
                "{} does not contain any bootstrapper definitions",
                path.display()
            ));
            warn!("{err}");
            return (Vec::new(), vec![err]);
        }
    };

    let base_dir = path.parent().unwrap_or(Path::new("."));
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for (index, export) in exports.into_iter().enumerate() {
        match build_export(fs, path, base_dir, index, export) {
            Ok(bootstrapper) => accepted.push(bootstrapper),
            Err(e) => {
                warn!("Skipping custom bootstrapper: {e}");
                rejected.push(e);
            }
        }
    }
    (accepted, rejected)
}

fn build_export(
    fs: &dyn FileSystem,
    path: &Path,
    base_dir: &Path,
    index: usize,
    export: Value,
) -> Result<CustomBootstrapper> {
    let label = export
        .get("name")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("#{index}"));
    let malformed = |missing: String| Error::MalformedVariant {
        path: path.to_path_buf(),
        export: label.clone(),
        missing,
    };

    let missing = missing_capabilities(&export);
    if !missing.is_empty() {
        return Err(malformed(missing.join(", ")));
    }

    let definition: ExportDefinition =
        serde_json::from_value(export).map_err(|e| malformed(format!("valid fields ({e})")))?;

    if !VALID_NAME.is_match(&definition.name) {
        return Err(malformed(format!("a valid name (got '{}')", definition.name)));
    }
    if definition.detect.is_empty() {
        return Err(malformed("detect rules (allOf or anyOf)".to_string()));
    }

    let template = match (definition.bootstrap, definition.bootstrap_file) {
        (Some(inline), _) => inline,
        (None, Some(file)) => fs.read_text(&base_dir.join(file))?,
        (None, None) => return Err(malformed("bootstrap".to_string())),
    };
    if let Some(unknown) = PhpTemplate::new(template.as_str())
        .placeholders()
        .into_iter()
        .find(|name| name != "root")
    {
        return Err(malformed(format!("known placeholders (found '{{{{{unknown}}}}}')")));
    }

    let priority = definition.priority.map(Priority).unwrap_or(Priority::CUSTOM);
    if priority >= Priority::FALLBACK {
        return Err(malformed(format!(
            "a priority below {} (got {})",
            Priority::FALLBACK.0,
            priority.0
        )));
    }

    Ok(CustomBootstrapper {
        name: definition.name,
        priority,
        detect: definition.detect,
        template,
        completions: definition.completions,
        source: path.to_path_buf(),
    })
}

fn missing_capabilities(export: &Value) -> Vec<String> {
    let Some(map) = export.as_object() else {
        return vec!["an object definition".to_string()];
    };

    let mut missing = Vec::new();
    if !map.get("name").is_some_and(Value::is_string) {
        missing.push("name".to_string());
    }
    if !map.get("detect").is_some_and(Value::is_object) {
        missing.push("detect".to_string());
    }
    let has_bootstrap = map.get("bootstrap").is_some_and(Value::is_string)
        || map.get("bootstrapFile").is_some_and(Value::is_string);
    if !has_bootstrap {
        missing.push("bootstrap".to_string());
    }
    if !map.get("completions").is_some_and(Value::is_array) {
        missing.push("completions".to_string());
    }
    missing
}
