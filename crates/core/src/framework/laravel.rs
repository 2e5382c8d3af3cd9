//! Laravel bootstrapper

use super::{FrameworkBootstrapper, Priority};
use crate::{
    error::Result,
    interfaces::FileSystem,
    script::PhpTemplate,
    types::Completion,
};
use std::path::Path;

const BOOTSTRAP: &str = r#"// Laravel
chdir('{{root}}');

if (!defined('LARAVEL_START')) {
    define('LARAVEL_START', microtime(true));
}

if (!file_exists('{{root}}/vendor/autoload.php')) {
    throw new \RuntimeException('Composer autoloader not found at {{root}}/vendor/autoload.php. Run composer install in your Laravel project.');
}
require '{{root}}/vendor/autoload.php';

if (!file_exists('{{root}}/bootstrap/app.php')) {
    throw new \RuntimeException('Laravel bootstrap/app.php not found at {{root}}/bootstrap/app.php. Check your path configuration.');
}
$app = require_once '{{root}}/bootstrap/app.php';

$kernel = $app->make(\Illuminate\Contracts\Console\Kernel::class);
$kernel->bootstrap();

foreach ([
    'DB' => \Illuminate\Support\Facades\DB::class,
    'Auth' => \Illuminate\Support\Facades\Auth::class,
    'Cache' => \Illuminate\Support\Facades\Cache::class,
    'Log' => \Illuminate\Support\Facades\Log::class,
    'Route' => \Illuminate\Support\Facades\Route::class,
    'Schema' => \Illuminate\Support\Facades\Schema::class,
] as $__tinkersan_alias => $__tinkersan_facade) {
    if (!class_exists($__tinkersan_alias, false) && class_exists($__tinkersan_facade)) {
        class_alias($__tinkersan_facade, $__tinkersan_alias);
    }
}

global $tinkersan;
$tinkersan = new \stdClass();
$tinkersan->framework = 'Laravel';
$tinkersan->app = $app;
$tinkersan->version = \Illuminate\Foundation\Application::VERSION;
$tinkersan->environment = $app->environment();"#;

/// Boots a Laravel application through its console kernel
#[derive(Debug, Clone, Copy, Default)]
pub struct LaravelBootstrapper;

impl LaravelBootstrapper {
    pub const NAME: &'static str = "Laravel";

    pub fn new() -> Self {
        Self
    }
}

impl FrameworkBootstrapper for LaravelBootstrapper {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        Priority::LARAVEL
    }

    fn detect(&self, fs: &dyn FileSystem, root: &Path) -> bool {
        fs.is_file(&root.join("artisan")) && fs.is_file(&root.join("bootstrap").join("app.php"))
    }

    fn bootstrap_code(&self, root: &Path) -> Result<String> {
        PhpTemplate::new(BOOTSTRAP).path_param("root", root)?.render()
    }

    fn completions(&self) -> Vec<Completion> {
        vec![
            Completion::function(
                "app",
                "app(${1:$abstract})",
                "Get the application instance or a service container instance",
            ),
            Completion::function(
                "Auth::user",
                "Auth::user()",
                "Get the currently authenticated user",
            ),
            Completion::function(
                "DB::table",
                "DB::table('${1:table_name}')",
                "Create a query builder for a database table",
            ),
            Completion::function(
                "Model::find",
                "${1:Model}::find(${2:$id})",
                "Find a model by its primary key",
            ),
            Completion::function(
                "Route::list",
                "Route::getRoutes()",
                "Get all registered routes",
            ),
            Completion::function(
                "Schema::getColumnListing",
                "Schema::getColumnListing('${1:table_name}')",
                "Get the column listing for a given table",
            ),
        ]
    }
}
