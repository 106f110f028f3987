//! Filesystem scanning and manifest generation.
//!
//! Walks the configured category folders under the project root and produces
//! the [`Manifest`] consumed by the index and the renderer.
//!
//! ## Directory Structure
//!
//! ```text
//! ./                               # Project root
//! ├── library.toml                 # Configuration (optional)
//! ├── avatars/                     # Category
//! │   ├── avatar-1.png             # → group "root"
//! │   ├── avatar-2.png
//! │   └── avatar-10.png
//! ├── icons/
//! │   ├── logo.svg                 # → group "root"
//! │   └── brands/                  # → group "brands"
//! │       └── github.svg
//! ├── photos/                      # Missing folders are fine: empty category
//! └── data/
//!     └── manifest.json            # Output
//! ```
//!
//! ## Rules
//!
//! - Hidden entries (leading `.`) are skipped, files and folders alike.
//! - Only files whose extension is in the allow-list are listed (case-insensitive).
//! - With `grouping = "subdirectories"` each immediate sub-folder is a group;
//!   deeper folders are ignored. With `grouping = "flat"` sub-folders are skipped.
//! - Empty groups are omitted. `root` comes first, other groups in natural order.
//! - Paths inside a group are sorted with [`natural_cmp`].
//!
//! ## Failure Semantics
//!
//! A category folder that does not exist yields an empty category. Any other
//! filesystem error aborts the scan. The manifest is written to a temporary
//! sibling file and renamed into place, so a failed build never leaves a
//! partial manifest behind.

use crate::config::{Grouping, LibraryConfig};
use crate::naming::{has_allowed_extension, is_hidden, natural_cmp};
use crate::types::{Category, Group, Manifest, ROOT_GROUP};
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScanError {
    fn io(path: &Path, source: io::Error) -> Self {
        ScanError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn walk(dir: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(dir).to_path_buf();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("filesystem loop"));
        ScanError::Io { path, source }
    }
}

/// What a completed build produced.
#[derive(Debug)]
pub struct BuildOutput {
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
}

/// Scan every configured category under `root`.
pub fn scan(root: &Path, config: &LibraryConfig) -> Result<Manifest, ScanError> {
    let mut categories = Vec::with_capacity(config.categories.len());
    for name in &config.categories {
        categories.push(scan_category(root, name, config)?);
    }

    Ok(Manifest {
        generated_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        categories,
    })
}

/// Scan and write the manifest to the configured output path.
pub fn build_manifest(root: &Path, config: &LibraryConfig) -> Result<BuildOutput, ScanError> {
    let manifest = scan(root, config)?;
    let manifest_path = root.join(&config.output);
    write_manifest(&manifest, &manifest_path)?;
    Ok(BuildOutput {
        manifest,
        manifest_path,
    })
}

fn scan_category(root: &Path, name: &str, config: &LibraryConfig) -> Result<Category, ScanError> {
    let dir = root.join(name);
    match fs::metadata(&dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            log::warn!("{} is not a directory, treating as empty", dir.display());
            return Ok(Category::empty(name));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} does not exist, treating as empty", dir.display());
            return Ok(Category::empty(name));
        }
        Err(e) => return Err(ScanError::io(&dir, e)),
    }

    let mut root_paths = Vec::new();
    let mut subgroups: Vec<Group> = Vec::new();

    for entry in list_dir(&dir)? {
        let Some(file_name) = entry_name(&entry) else {
            continue;
        };
        let file_type = entry.file_type();
        if file_type.is_dir() {
            if config.grouping == Grouping::Flat {
                continue;
            }
            let prefix = format!("{name}/{file_name}");
            let paths = list_images(entry.path(), &prefix, &config.extensions)?;
            if paths.is_empty() {
                continue;
            }
            if file_name == ROOT_GROUP {
                // a folder literally named "root" shares the loose-file bucket
                root_paths.extend(paths);
            } else {
                subgroups.push(Group {
                    name: file_name.to_string(),
                    paths,
                });
            }
        } else if file_type.is_file() && has_allowed_extension(file_name, &config.extensions) {
            root_paths.push(format!("{name}/{file_name}"));
        }
    }

    root_paths.sort_by(|a, b| natural_cmp(a, b));
    subgroups.sort_by(|a, b| natural_cmp(&a.name, &b.name));

    let mut groups = Vec::with_capacity(subgroups.len() + 1);
    if !root_paths.is_empty() {
        groups.push(Group {
            name: ROOT_GROUP.to_string(),
            paths: root_paths,
        });
    }
    groups.extend(subgroups);

    let total = groups.iter().map(|g| g.paths.len() as u64).sum();
    log::debug!("{name}: {total} files in {} groups", groups.len());

    Ok(Category {
        name: name.to_string(),
        total,
        groups,
    })
}

/// Immediate, non-hidden children of `dir`.
fn list_dir(dir: &Path) -> Result<Vec<walkdir::DirEntry>, ScanError> {
    let mut out = Vec::new();
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    for entry in walker.into_iter().filter_entry(|e| !is_hidden_entry(e)) {
        out.push(entry.map_err(|e| ScanError::walk(dir, e))?);
    }
    Ok(out)
}

/// Allowed image files directly inside a group folder, sorted.
fn list_images(dir: &Path, prefix: &str, extensions: &[String]) -> Result<Vec<String>, ScanError> {
    let mut paths: Vec<String> = list_dir(dir)?
        .iter()
        .filter(|e| e.file_type().is_file())
        .filter_map(entry_name)
        .filter(|n| has_allowed_extension(n, extensions))
        .map(|n| format!("{prefix}/{n}"))
        .collect();
    paths.sort_by(|a, b| natural_cmp(a, b));
    Ok(paths)
}

fn is_hidden_entry(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_str().map(is_hidden).unwrap_or(false)
}

/// UTF-8 file name, or `None` (with a warning) for names a URL cannot carry.
fn entry_name(entry: &walkdir::DirEntry) -> Option<&str> {
    let name = entry.file_name().to_str();
    if name.is_none() {
        log::warn!("skipping non UTF-8 name: {}", entry.path().display());
    }
    name
}

/// Write the manifest as pretty JSON with a trailing newline.
///
/// Creates the parent directory if needed. The file is replaced atomically.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), ScanError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ScanError::io(parent, e))?;
    }
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| ScanError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ScanError::io(path, e));
    }
    Ok(())
}
