//! Composition of bootstrap fragment and user code into one script
//!
//! The composed script has two independent failure boundaries:
//!
//! 1. the bootstrap fragment runs inside `try/catch (\Throwable)`; a failure
//!    prints `Bootstrap Error: ...` and exits before user code is evaluated;
//! 2. the user code is evaluated from a nowdoc literal inside its own
//!    `try/catch`; a failure prints `Exception: ...` or `Error: ...` after
//!    whatever output the snippet already produced.
//!
//! Everything is written into a single output buffer that is flushed once,
//! at the very end.

use super::statements::return_last_expression;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static OPEN_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*<\?(?:php\b)?").expect("open marker pattern is valid"));

static CLOSE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?>\s*\z").expect("close marker pattern is valid"));

/// Prefix of the message printed when the bootstrap fragment fails
pub const BOOTSTRAP_ERROR_MARKER: &str = "Bootstrap Error";

/// Prefix of the message printed when user code throws an `\Exception`
pub const EXCEPTION_MARKER: &str = "Exception";

/// Prefix of the message printed when user code throws any other `\Throwable`
pub const ERROR_MARKER: &str = "Error";

const SNIPPET_LABEL: &str = "TINKERSAN_SNIPPET";

const PRELUDE: &str = r#"if (!function_exists('__tinkersan_format')) {
    function __tinkersan_format($value)
    {
        if ($value === null) {
            return '';
        }
        if (is_bool($value)) {
            return $value ? 'true' : 'false';
        }
        if (is_array($value) || is_object($value)) {
            return print_r($value, true);
        }
        if (is_resource($value)) {
            return 'resource(' . get_resource_type($value) . ')';
        }
        return (string) $value;
    }
}
if (!function_exists('__tinkersan_describe')) {
    function __tinkersan_describe($label, $error)
    {
        return $label . ': ' . $error->getMessage() . ' in ' . $error->getFile() . ':' . $error->getLine();
    }
}
"#;

/// Options controlling the shape of the composed script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerOptions {
    /// Drop anything the bootstrap fragment prints before user code runs
    pub discard_bootstrap_output: bool,

    /// Display the value of a trailing expression when the snippet printed nothing
    pub auto_display: bool,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            discard_bootstrap_output: true,
            auto_display: true,
        }
    }
}

/// A composed, ready-to-run script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionScript {
    text: String,
    returns_last_expression: bool,
}

impl ExecutionScript {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Whether the final statement of the snippet was rewritten into a `return`
    pub fn returns_last_expression(&self) -> bool {
        self.returns_last_expression
    }
}

impl fmt::Display for ExecutionScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Builds execution scripts; pure, no I/O
#[derive(Debug, Clone, Default)]
pub struct ExecutionScriptComposer {
    options: ComposerOptions,
}

impl ExecutionScriptComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ComposerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ComposerOptions {
        &self.options
    }

    /// Combine a bootstrap fragment and user code into one script
    pub fn compose(&self, bootstrap_fragment: &str, user_code: &str) -> ExecutionScript {
        let fragment = strip_markers(bootstrap_fragment);
        let code = strip_markers(user_code);

        let rewritten = if self.options.auto_display {
            return_last_expression(code)
        } else {
            None
        };
        let returns_last_expression = rewritten.is_some();
        let code = rewritten.as_deref().unwrap_or(code);
        debug!(
            "Composing script: {} bytes of bootstrap, {} bytes of user code, auto-display: {}",
            fragment.len(),
            code.len(),
            returns_last_expression
        );

        let label = snippet_label(code);
        let clean = if self.options.discard_bootstrap_output {
            "    ob_clean();\n"
        } else {
            ""
        };

        let mut script = String::with_capacity(PRELUDE.len() + fragment.len() + code.len() + 1024);
        script.push_str("<?php\n");
        script.push_str(PRELUDE);
        script.push('\n');

        script.push_str("ob_start();\n");
        script.push_str("try {\n");
        script.push_str(fragment);
        script.push_str("\n} catch (\\Throwable $__tinkersan_error) {\n");
        script.push_str(clean);
        script.push_str(&format!(
            "    echo __tinkersan_describe('{BOOTSTRAP_ERROR_MARKER}', $__tinkersan_error), PHP_EOL;\n"
        ));
        script.push_str("    ob_end_flush();\n");
        script.push_str("    exit(1);\n");
        script.push_str("}\n");
        if self.options.discard_bootstrap_output {
            script.push_str("ob_clean();\n");
        }
        script.push('\n');

        script.push_str(&format!("$__tinkersan_code = <<<'{label}'\n"));
        script.push_str(code);
        script.push_str(&format!("\n{label};\n"));
        script.push_str("$__tinkersan_mark = ob_get_length();\n");
        script.push_str("try {\n");
        script.push_str("    $__tinkersan_result = eval($__tinkersan_code);\n");
        script.push_str("    if (ob_get_length() === $__tinkersan_mark) {\n");
        script.push_str("        echo __tinkersan_format($__tinkersan_result);\n");
        script.push_str("    }\n");
        script.push_str("} catch (\\Throwable $__tinkersan_error) {\n");
        script.push_str("    if (ob_get_length() > $__tinkersan_mark) {\n");
        script.push_str("        echo PHP_EOL;\n");
        script.push_str("    }\n");
        script.push_str(&format!(
            "    echo __tinkersan_describe($__tinkersan_error instanceof \\Exception ? '{EXCEPTION_MARKER}' : '{ERROR_MARKER}', $__tinkersan_error), PHP_EOL;\n"
        ));
        script.push_str("}\n");
        script.push_str("ob_end_flush();\n");

        ExecutionScript {
            text: script,
            returns_last_expression,
        }
    }
}

/// Remove a leading `<?php` / `<?` marker, a trailing `?>` and surrounding whitespace
pub fn strip_markers(code: &str) -> &str {
    let start = OPEN_MARKER.find(code).map(|m| m.end()).unwrap_or(0);
    let code = &code[start..];
    let end = CLOSE_MARKER.find(code).map(|m| m.start()).unwrap_or(code.len());
    code[..end].trim()
}

/// Pick a nowdoc label that does not occur anywhere in the snippet
fn snippet_label(code: &str) -> String {
    if !code.contains(SNIPPET_LABEL) {
        return SNIPPET_LABEL.to_string();
    }
    (1..)
        .map(|n| format!("{SNIPPET_LABEL}_{n}"))
        .find(|label| !code.contains(label.as_str()))
        .unwrap_or_else(|| SNIPPET_LABEL.to_string())
}
