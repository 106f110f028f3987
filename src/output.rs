//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines, for testability,
//! and a `print_*` wrapper that writes them to stdout. Format functions are
//! pure: no I/O, no side effects.
//!
//! ## Scan
//!
//! ```text
//! Categories
//! 001 avatars (3 files)
//!     root (3)
//! 002 icons (3 files)
//!     root (2)
//!     brands (1)
//! 003 photos (empty)
//!
//! Manifest: data/manifest.json
//! avatars=3, icons=3, photos=0
//! ```
//!
//! ## Search
//!
//! ```text
//! 001 icons › root › b.svg
//!     URL: /assets/icons/b.svg
//!
//! 1 match
//! ```

use crate::index::FlatItem;
use crate::scan::BuildOutput;
use crate::session::{CopyOutcome, LoadStatus};
use crate::types::Manifest;
use crate::view::PageView;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Category/group tree of a manifest.
pub fn format_manifest_tree(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for (i, category) in manifest.categories.iter().enumerate() {
        let count = category.item_count();
        if count == 0 {
            lines.push(format!("{} {} (empty)", format_index(i + 1), category.name));
            continue;
        }
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            category.name,
            plural(count, "file", "files")
        ));
        for group in &category.groups {
            lines.push(format!("    {} ({})", group.name, group.paths.len()));
        }
    }
    lines
}

/// One-line `name=total` summary, in manifest order.
pub fn format_totals(manifest: &Manifest) -> String {
    manifest
        .categories
        .iter()
        .map(|c| format!("{}={}", c.name, c.total))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Scan output: tree, manifest location relative to the root, totals.
pub fn format_scan_output(output: &BuildOutput, root: &Path) -> Vec<String> {
    let mut lines = format_manifest_tree(&output.manifest);
    let shown = output
        .manifest_path
        .strip_prefix(root)
        .unwrap_or(&output.manifest_path);
    lines.push(String::new());
    lines.push(format!("Manifest: {}", shown.display()));
    lines.push(format_totals(&output.manifest));
    lines
}

pub fn print_scan_output(output: &BuildOutput, root: &Path) {
    for line in format_scan_output(output, root) {
        println!("{}", line);
    }
}

/// Search results, one entry per item with its URL as context.
pub fn format_search_results(items: &[FlatItem]) -> Vec<String> {
    let mut lines = Vec::with_capacity(items.len() * 2 + 2);
    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "{} {} › {} › {}",
            format_index(i + 1),
            item.category,
            item.group,
            item.name
        ));
        lines.push(format!("    URL: {}", item.url));
    }
    if !items.is_empty() {
        lines.push(String::new());
    }
    lines.push(plural(items.len(), "match", "matches"));
    lines
}

pub fn print_search_results(items: &[FlatItem]) {
    for line in format_search_results(items) {
        println!("{}", line);
    }
}

/// Render summary: per-card visible counts, status, destination.
pub fn format_render_output(page: &PageView, status: &LoadStatus, out: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    if let LoadStatus::Failed(msg) = status {
        lines.push(format!("Load failed: {msg}"));
    }
    for category in &page.categories {
        let shown = category.body.items().len();
        lines.push(format!(
            "{} [{}]: {}",
            category.name,
            category.active_group,
            if shown == 0 {
                "empty".to_string()
            } else {
                plural(shown, "item", "items")
            }
        ));
    }
    lines.push(format!(
        "Rendered {}, {} → {}",
        plural(page.categories.len(), "category", "categories"),
        plural(page.visible_count(), "thumbnail", "thumbnails"),
        out.display()
    ));
    lines
}

pub fn print_render_output(page: &PageView, status: &LoadStatus, out: &Path) {
    for line in format_render_output(page, status, out) {
        println!("{}", line);
    }
}

/// Result line for `link --copy`.
pub fn format_copy_outcome(outcome: &CopyOutcome) -> String {
    match outcome {
        CopyOutcome::NothingToCopy => "Nothing to copy".to_string(),
        CopyOutcome::Copied(url) => format!("Link copied: {url}"),
        CopyOutcome::Failed(err) => format!("Copy failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::CopyError;
    use crate::index::{CatalogIndex, filter, flatten};
    use crate::test_helpers::*;
    use crate::view::{ViewState, project};
    use std::path::PathBuf;

    #[test]
    fn scan_output_lists_categories_and_totals() {
        let output = BuildOutput {
            manifest: sample_manifest(),
            manifest_path: PathBuf::from("/site/data/manifest.json"),
        };
        let lines = format_scan_output(&output, Path::new("/site"));
        assert_eq!(
            lines,
            vec![
                "Categories",
                "001 avatars (3 files)",
                "    root (3)",
                "002 icons (3 files)",
                "    root (2)",
                "    brands (1)",
                "003 photos (empty)",
                "",
                "Manifest: data/manifest.json",
                "avatars=3, icons=3, photos=0",
            ]
        );
    }

    #[test]
    fn search_results_show_urls() {
        let items = flatten(&sample_manifest(), "/assets/", &default_order());
        let lines = format_search_results(&filter(&items, "b.svg"));
        assert_eq!(lines[0], "001 icons › root › b.svg");
        assert_eq!(lines[1], "    URL: /assets/icons/b.svg");
        assert_eq!(lines.last().unwrap(), "2 matches");
    }

    #[test]
    fn no_search_results() {
        assert_eq!(format_search_results(&[]), vec!["0 matches"]);
    }

    #[test]
    fn render_output_summarizes_cards() {
        let index = CatalogIndex::build(sample_manifest(), "/", &default_order());
        let page = project(&index, &ViewState::new());
        let lines = format_render_output(&page, &LoadStatus::Ready, Path::new("dist/index.html"));
        assert_eq!(
            lines,
            vec![
                "avatars [root]: 3 items",
                "icons [root]: 2 items",
                "photos [root]: empty",
                "Rendered 3 categories, 5 thumbnails → dist/index.html",
            ]
        );
    }

    #[test]
    fn render_output_reports_failure() {
        let page = project(&CatalogIndex::default(), &ViewState::new());
        let status = LoadStatus::Failed("HTTP 404".into());
        let lines = format_render_output(&page, &status, Path::new("index.html"));
        assert_eq!(lines[0], "Load failed: HTTP 404");
        assert_eq!(lines[1], "Rendered 0 categories, 0 thumbnails → index.html");
    }

    #[test]
    fn copy_outcome_lines() {
        assert_eq!(
            format_copy_outcome(&CopyOutcome::Copied("/a.png".into())),
            "Link copied: /a.png"
        );
        assert_eq!(
            format_copy_outcome(&CopyOutcome::Failed(CopyError::Unavailable)),
            "Copy failed: no clipboard tool available"
        );
    }
}
