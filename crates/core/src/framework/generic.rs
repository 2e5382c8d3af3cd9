//! Catch-all bootstrapper for plain PHP projects

use super::{FrameworkBootstrapper, Priority};
use crate::{
    error::Result,
    interfaces::FileSystem,
    script::PhpTemplate,
    types::Completion,
};
use std::path::Path;

const BOOTSTRAP: &str = r#"// Generic PHP
if (is_dir('{{root}}')) {
    chdir('{{root}}');
}

if (file_exists('{{root}}/vendor/autoload.php')) {
    require_once '{{root}}/vendor/autoload.php';
}

global $tinkersan;
$tinkersan = new \stdClass();
$tinkersan->framework = 'Generic PHP';
$tinkersan->php_version = PHP_VERSION;
$tinkersan->extensions = get_loaded_extensions();

if (!function_exists('get_declared_classes_by_namespace')) {
    function get_declared_classes_by_namespace($namespace)
    {
        $classes = [];
        foreach (get_declared_classes() as $class) {
            if (strpos($class, $namespace) === 0) {
                $classes[] = $class;
            }
        }
        return $classes;
    }
}

if (!function_exists('list_files')) {
    function list_files($dir, $pattern = '*.php')
    {
        return glob(rtrim($dir, '/') . '/' . $pattern);
    }
}

if (!function_exists('include_dir')) {
    function include_dir($dir, $pattern = '*.php')
    {
        $files = list_files($dir, $pattern);
        foreach ($files as $file) {
            include_once $file;
        }
        return $files;
    }
}"#;

/// Matches any directory; loads the Composer autoloader when there is one
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericPhpBootstrapper;

impl GenericPhpBootstrapper {
    pub const NAME: &'static str = "PHP";

    pub fn new() -> Self {
        Self
    }
}

impl FrameworkBootstrapper for GenericPhpBootstrapper {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        Priority::FALLBACK
    }

    fn detect(&self, _fs: &dyn FileSystem, _root: &Path) -> bool {
        true
    }

    fn bootstrap_code(&self, root: &Path) -> Result<String> {
        PhpTemplate::new(BOOTSTRAP).path_param("root", root)?.render()
    }

    fn completions(&self) -> Vec<Completion> {
        vec![
            Completion::function(
                "var_dump",
                "var_dump(${1:$var})",
                "Dumps information about a variable",
            ),
            Completion::function(
                "print_r",
                "print_r(${1:$var}, ${2:true})",
                "Prints human-readable information about a variable",
            ),
            Completion::function(
                "get_class",
                "get_class(${1:$object})",
                "Returns the name of the class of an object",
            ),
            Completion::function(
                "get_class_methods",
                "get_class_methods(${1:$class_name})",
                "Gets the class methods names",
            ),
            Completion::function(
                "get_class_vars",
                "get_class_vars(${1:$class_name})",
                "Get the default properties of the class",
            ),
            Completion::function(
                "include_dir",
                "include_dir('${1:directory}', '${2:*.php}')",
                "Include all PHP files in a directory",
            ),
        ]
    }
}
