//! Signature-based project root validation
//!
//! A directory is accepted as a project root when enough of the
//! framework's characteristic files and directories are present.

use crate::interfaces::FileSystem;
use lru::LruCache;
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Marker files and directories characteristic of one project type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSignature {
    pub name: &'static str,
    pub files: &'static [&'static str],
    pub dirs: &'static [&'static str],
    pub min_files: usize,
    pub min_dirs: usize,
}

impl RootSignature {
    /// WordPress core layout
    pub const fn wordpress() -> Self {
        Self {
            name: "WordPress",
            files: &["wp-config.php", "wp-load.php", "wp-settings.php"],
            dirs: &["wp-content", "wp-includes", "wp-admin"],
            min_files: 2,
            min_dirs: 2,
        }
    }

    /// Laravel application layout
    pub const fn laravel() -> Self {
        Self {
            name: "Laravel",
            files: &["artisan", "bootstrap/app.php", "composer.json"],
            dirs: &["app", "bootstrap", "config", "routes"],
            min_files: 2,
            min_dirs: 2,
        }
    }

    /// Check whether `dir` carries this signature
    pub fn matches(&self, fs: &dyn FileSystem, dir: &Path) -> bool {
        let found_files = self
            .files
            .iter()
            .filter(|file| fs.is_file(&dir.join(file)))
            .count();
        if found_files < self.min_files {
            return false;
        }

        let found_dirs = self
            .dirs
            .iter()
            .filter(|sub| fs.is_dir(&dir.join(sub)))
            .count();
        found_dirs >= self.min_dirs
    }
}

const MEMO_CAPACITY: usize = 512;

/// Request-scoped root validator.
///
/// Remembers the verdict for every directory it has checked. A validator
/// lives for one resolution call only; results never leak into the next
/// request.
pub struct RootValidator<'a> {
    fs: &'a dyn FileSystem,
    signatures: &'a [RootSignature],
    memo: RefCell<LruCache<PathBuf, bool>>,
}

impl<'a> RootValidator<'a> {
    pub fn new(fs: &'a dyn FileSystem, signatures: &'a [RootSignature]) -> Self {
        let capacity = NonZeroUsize::new(MEMO_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            fs,
            signatures,
            memo: RefCell::new(LruCache::new(capacity)),
        }
    }

    pub fn fs(&self) -> &'a dyn FileSystem {
        self.fs
    }

    /// Whether `dir` matches any of the configured signatures
    pub fn is_root(&self, dir: &Path) -> bool {
        if let Some(&known) = self.memo.borrow_mut().get(dir) {
            return known;
        }

        let verdict = self.fs.is_dir(dir)
            && self
                .signatures
                .iter()
                .any(|signature| signature.matches(self.fs, dir));
        self.memo.borrow_mut().put(dir.to_path_buf(), verdict);
        verdict
    }

    /// Walk from `start` up to the filesystem root, returning the first root found
    pub fn find_upwards(&self, start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| self.is_root(dir))
            .map(|dir| dir.to_path_buf())
    }
}
