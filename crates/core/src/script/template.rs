//! Named-parameter templating for generated PHP
//!
//! Placeholders look like `{{root}}` and are meant to sit inside PHP
//! single-quoted string literals. Every value is validated and escaped
//! before substitution, so an unusual path can never close the literal
//! early or smuggle a line break into the generated code.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// A PHP source template with named parameters
#[derive(Debug, Clone)]
pub struct PhpTemplate {
    source: String,
    params: BTreeMap<String, String>,
}

impl PhpTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            params: BTreeMap::new(),
        }
    }

    /// Bind a parameter, escaping it for a single-quoted PHP literal
    pub fn param(mut self, name: &str, value: &str) -> Result<Self> {
        let escaped = escape_single_quoted(name, value)?;
        self.params.insert(name.to_string(), escaped);
        Ok(self)
    }

    /// Bind a filesystem path parameter
    pub fn path_param(self, name: &str, path: &Path) -> Result<Self> {
        let value = php_path(path);
        self.param(name, &value)
    }

    /// Names of all placeholders used by the template, in order of first use
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.source) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Substitute every placeholder.
    ///
    /// Fails if the template references a parameter that was never bound.
    pub fn render(&self) -> Result<String> {
        if let Some(missing) = self
            .placeholders()
            .into_iter()
            .find(|name| !self.params.contains_key(name))
        {
            return Err(Error::TemplateError(format!(
                "no value bound for placeholder '{{{{{missing}}}}}'"
            )));
        }

        Ok(PLACEHOLDER
            .replace_all(&self.source, |caps: &regex::Captures<'_>| {
                self.params[&caps[1]].clone()
            })
            .into_owned())
    }
}

/// Convert a path to the form PHP expects (forward slashes on Windows)
pub fn php_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    }
}

fn escape_single_quoted(name: &str, value: &str) -> Result<String> {
    if let Some(bad) = value.chars().find(|c| matches!(c, '\0' | '\n' | '\r')) {
        return Err(Error::TemplateError(format!(
            "value for '{name}' contains forbidden character {bad:?}"
        )));
    }

    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            _ => escaped.push(c),
        }
    }
    Ok(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use std::path::PathBuf;

    #[test]
    fn test_render_escapes_quotes() {
        let rendered = PhpTemplate::new("require_once '{{root}}/wp-load.php';")
            .param("root", "/srv/it's")
            .unwrap()
            .render()
            .unwrap();
        assert_snapshot!(rendered, @r"require_once '/srv/it\'s/wp-load.php';");
    }

    #[test]
    fn test_render_escapes_backslashes() {
        let rendered = PhpTemplate::new("'{{value}}'")
            .param("value", r"a\b")
            .unwrap()
            .render()
            .unwrap();
        assert_eq!(rendered, r"'a\\b'");
    }

    #[test]
    fn test_repeated_placeholder() {
        let rendered = PhpTemplate::new("chdir('{{root}}'); echo '{{ root }}';")
            .path_param("root", &PathBuf::from("/var/www"))
            .unwrap()
            .render()
            .unwrap();
        assert_eq!(rendered, "chdir('/var/www'); echo '/var/www';");
    }

    #[test]
    fn test_newline_is_rejected() {
        let err = PhpTemplate::new("'{{root}}'")
            .param("root", "/srv/evil\n'; system('id'); //")
            .unwrap_err();
        assert!(matches!(err, Error::TemplateError(_)));
    }

    #[test]
    fn test_unbound_placeholder_is_an_error() {
        let err = PhpTemplate::new("'{{root}}' '{{vendor}}'")
            .param("root", "/srv")
            .unwrap()
            .render()
            .unwrap_err();
        assert!(err.to_string().contains("{{vendor}}"));
    }

    #[test]
    fn test_placeholders_in_order() {
        let template = PhpTemplate::new("{{b}} {{a}} {{b}}");
        assert_eq!(template.placeholders(), vec!["b", "a"]);
    }
}
