//! WordPress bootstrapper

use super::{FrameworkBootstrapper, Priority};
use crate::{
    error::Result,
    interfaces::FileSystem,
    resolver::RootSignature,
    script::PhpTemplate,
    types::Completion,
};
use std::path::Path;

const BOOTSTRAP: &str = r#"// WordPress
if (!defined('WP_USE_THEMES')) {
    define('WP_USE_THEMES', false);
}

if (!file_exists('{{root}}/wp-load.php')) {
    throw new \RuntimeException('WordPress wp-load.php not found at {{root}}/wp-load.php. Check your path configuration.');
}
chdir('{{root}}');
require_once '{{root}}/wp-load.php';

if (!class_exists('Tinkersan_Property_Accessor', false)) {
    class Tinkersan_Property_Accessor
    {
        public static function get_private_property($obj, $prop)
        {
            $reflection = new \ReflectionClass($obj);
            $property = $reflection->getProperty($prop);
            $property->setAccessible(true);
            return $property->getValue($obj);
        }

        public static function set_private_property($obj, $prop, $value)
        {
            $reflection = new \ReflectionClass($obj);
            $property = $reflection->getProperty($prop);
            $property->setAccessible(true);
            $property->setValue($obj, $value);
            return $obj;
        }
    }
}

global $tinkersan;
$tinkersan = new \stdClass();
$tinkersan->framework = 'WordPress';
$tinkersan->version = get_bloginfo('version');
$tinkersan->is_multisite = is_multisite();
$tinkersan->user = wp_get_current_user();"#;

/// Boots WordPress through `wp-load.php`
#[derive(Debug, Clone)]
pub struct WordPressBootstrapper {
    signature: RootSignature,
}

impl WordPressBootstrapper {
    pub const NAME: &'static str = "WordPress";

    pub fn new() -> Self {
        Self {
            signature: RootSignature::wordpress(),
        }
    }
}

impl Default for WordPressBootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkBootstrapper for WordPressBootstrapper {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        Priority::WORDPRESS
    }

    fn detect(&self, fs: &dyn FileSystem, root: &Path) -> bool {
        self.signature.matches(fs, root)
    }

    fn bootstrap_code(&self, root: &Path) -> Result<String> {
        PhpTemplate::new(BOOTSTRAP).path_param("root", root)?.render()
    }

    fn completions(&self) -> Vec<Completion> {
        vec![
            Completion::function(
                "get_post",
                "get_post(${1:$post_id})",
                "Get post data given a post ID or post object",
            ),
            Completion::function(
                "wp_get_current_user",
                "wp_get_current_user()",
                "Get the current user object",
            ),
            Completion::class("WP_Query", "new WP_Query(${1:$args})", "WordPress Query class"),
            Completion::function(
                "get_option",
                "get_option('${1:option_name}')",
                "Retrieve an option value by name",
            ),
            Completion::function(
                "wc_get_product",
                "wc_get_product(${1:$product_id})",
                "Get a WooCommerce product",
            ),
            Completion::function(
                "wc_get_order",
                "wc_get_order(${1:$order_id})",
                "Get a WooCommerce order",
            ),
        ]
    }
}
