//! Shared test utilities for the asset-library test suite.
//!
//! Provides a fixture library on disk, an equivalent in-memory manifest,
//! lookup helpers that panic with a clear message on miss, and clipboard
//! doubles.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_library();
//! let manifest = scan(tmp.path(), &LibraryConfig::default()).unwrap();
//!
//! let icons = find_category(&manifest, "icons");
//! assert_eq!(group_paths(icons, "brands"), vec!["icons/brands/github.svg"]);
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::clipboard::{Clipboard, CopyError};
use crate::types::{Category, Manifest};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create an empty file, including parent directories.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"fake image").unwrap();
}

/// A project root matching [`sample_manifest`], plus noise the scan must skip.
///
/// ```text
/// avatars/ avatar-1.png avatar-2.png avatar-10.png .DS_Store
/// icons/   a.png b.svg notes.txt brands/github.svg
/// (no photos/)
/// ```
pub fn setup_library() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    for name in ["avatar-10.png", "avatar-2.png", "avatar-1.png", ".DS_Store"] {
        touch(&root.join("avatars").join(name));
    }
    for name in ["b.svg", "a.png", "notes.txt", "brands/github.svg"] {
        touch(&root.join("icons").join(name));
    }
    tmp
}

/// Sorted `(relative path, size)` listing of a directory tree.
pub fn snapshot_tree(dir: &Path) -> Vec<(String, u64)> {
    let mut out: Vec<(String, u64)> = WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_string_lossy().to_string();
            let len = e.metadata().unwrap().len();
            (rel, len)
        })
        .collect();
    out.sort();
    out
}

// =========================================================================
// Manifests
// =========================================================================

pub fn default_order() -> Vec<String> {
    ["avatars", "icons", "photos"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Parse manifest JSON, panicking on invalid JSON.
pub fn manifest_from(json: &str) -> Manifest {
    Manifest::from_json(json)
        .unwrap_or_else(|e| panic!("invalid manifest JSON in test: {e}"))
        .manifest
}

/// The manifest a scan of [`setup_library`] produces (minus the timestamp).
pub fn sample_manifest() -> Manifest {
    manifest_from(
        r#"{
            "generatedAt": "2026-01-01T00:00:00.000Z",
            "categories": {
                "avatars": {"total": 3, "groups": {"root": [
                    "avatars/avatar-1.png", "avatars/avatar-2.png", "avatars/avatar-10.png"
                ]}},
                "icons": {"total": 3, "groups": {
                    "root": ["icons/a.png", "icons/b.svg"],
                    "brands": ["icons/brands/github.svg"]
                }},
                "photos": {"total": 0, "groups": {}}
            }
        }"#,
    )
}

/// Find a category by name. Panics if not found.
pub fn find_category<'a>(manifest: &'a Manifest, name: &str) -> &'a Category {
    manifest.category(name).unwrap_or_else(|| {
        let names: Vec<&str> = manifest.categories.iter().map(|c| c.name.as_str()).collect();
        panic!("category '{name}' not found. Available: {names:?}")
    })
}

/// Paths of a group. Panics if the group is missing.
pub fn group_paths<'a>(category: &'a Category, group: &str) -> Vec<&'a str> {
    category
        .group(group)
        .unwrap_or_else(|| {
            let names: Vec<&str> = category.group_names().collect();
            panic!(
                "group '{group}' not found in '{}'. Available: {names:?}",
                category.name
            )
        })
        .paths
        .iter()
        .map(String::as_str)
        .collect()
}

// =========================================================================
// Clipboard doubles
// =========================================================================

/// Records every copied string.
#[derive(Default)]
pub struct RecordingClipboard {
    copied: RefCell<Vec<String>>,
}

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.copied.borrow().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn copy(&self, text: &str) -> Result<(), CopyError> {
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Always fails.
pub struct FailingClipboard;

impl Clipboard for FailingClipboard {
    fn copy(&self, _text: &str) -> Result<(), CopyError> {
        Err(CopyError::Failed("denied".into()))
    }
}
