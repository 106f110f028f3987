//! The flat, searchable catalog built from a manifest.
//!
//! A [`Manifest`] is nested (category → group → paths). Search and rendering
//! want a flat list, so [`flatten`] denormalizes every path into a
//! [`FlatItem`] carrying its category, group, display name and absolute URL.
//! The flat list is never edited: a new manifest means a new [`CatalogIndex`].
//!
//! ## Ordering
//!
//! - Categories: the configured display order first, then any other manifest
//!   categories in manifest order (see [`ordered_categories`]).
//! - Groups: manifest key order.
//! - Items: manifest list order.
//!
//! [`filter`] and [`group_by_category`] both preserve the incoming order.

use crate::naming::display_name;
use crate::types::{Category, Manifest};
use serde::Serialize;

/// One asset, denormalized for search and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatItem {
    pub category: String,
    pub group: String,
    /// Path relative to the site base, as listed in the manifest.
    pub path: String,
    /// Last path segment.
    pub name: String,
    /// `resolve(base, path)`.
    pub url: String,
}

/// Join a deployment base and a manifest path into one URL.
///
/// Runs of `/` are collapsed to one, except for the `//` that follows a
/// scheme in `base` (`https://`) or starts a protocol-relative base
/// (`//cdn.example/`).
///
/// ```text
/// resolve("/assets/", "icons/a.png")              → "/assets/icons/a.png"
/// resolve("https://cdn.example/x/", "/icons/a.png") → "https://cdn.example/x/icons/a.png"
/// ```
pub fn resolve(base: &str, relative: &str) -> String {
    let joined = format!("{base}/{relative}");
    let keep = match base.find("://") {
        Some(i) => i + 3,
        None if base.starts_with("//") => 2,
        None => 0,
    };
    let (prefix, rest) = joined.split_at(keep);

    let mut out = String::with_capacity(joined.len());
    out.push_str(prefix);
    let mut prev_slash = !prefix.is_empty();
    for c in rest.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    out
}

/// Manifest categories in display order: `order` first, then the rest.
///
/// Names in `order` that the manifest does not contain are skipped.
pub fn ordered_categories<'a>(manifest: &'a Manifest, order: &[String]) -> Vec<&'a Category> {
    let mut out: Vec<&Category> = order
        .iter()
        .filter_map(|name| manifest.category(name))
        .collect();
    out.extend(
        manifest
            .categories
            .iter()
            .filter(|c| !order.iter().any(|o| *o == c.name)),
    );
    out
}

/// One [`FlatItem`] per manifest path, in display order.
pub fn flatten(manifest: &Manifest, base: &str, order: &[String]) -> Vec<FlatItem> {
    let mut items = Vec::with_capacity(manifest.item_count());
    for category in ordered_categories(manifest, order) {
        for group in &category.groups {
            for path in &group.paths {
                items.push(FlatItem {
                    category: category.name.clone(),
                    group: group.name.clone(),
                    path: path.clone(),
                    name: display_name(path).to_string(),
                    url: resolve(base, path),
                });
            }
        }
    }
    items
}

/// Lowercase and collapse whitespace runs to single spaces, trimming the ends.
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A normalized free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Self {
        Query(normalize_query(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring match against `"<category> <group> <file name>"`.
    pub fn matches(&self, item: &FlatItem) -> bool {
        if self.is_empty() {
            return true;
        }
        let key = normalize_query(&format!("{} {} {}", item.category, item.group, item.name));
        key.contains(self.0.as_str())
    }
}

/// Items matching `query`, as an order-preserving subsequence of `items`.
pub fn filter(items: &[FlatItem], query: &str) -> Vec<FlatItem> {
    let query = Query::new(query);
    items.iter().filter(|i| query.matches(i)).cloned().collect()
}

/// Items of one category, partitioned by group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedCategory {
    pub name: String,
    pub groups: Vec<GroupedItems>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedItems {
    pub name: String,
    pub items: Vec<FlatItem>,
}

/// Partition a flat list back into category → group, keeping first-seen order.
pub fn group_by_category(items: &[FlatItem]) -> Vec<GroupedCategory> {
    let mut out: Vec<GroupedCategory> = Vec::new();
    for item in items {
        let pos = match out.iter().position(|c| c.name == item.category) {
            Some(pos) => pos,
            None => {
                out.push(GroupedCategory {
                    name: item.category.clone(),
                    groups: Vec::new(),
                });
                out.len() - 1
            }
        };
        let category = &mut out[pos];
        match category.groups.iter_mut().find(|g| g.name == item.group) {
            Some(group) => group.items.push(item.clone()),
            None => category.groups.push(GroupedItems {
                name: item.group.clone(),
                items: vec![item.clone()],
            }),
        }
    }
    out
}

/// A manifest together with its flattened items.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    manifest: Manifest,
    items: Vec<FlatItem>,
    order: Vec<String>,
}

impl CatalogIndex {
    pub fn build(manifest: Manifest, base: &str, order: &[String]) -> Self {
        let items = flatten(&manifest, base, order);
        Self {
            manifest,
            items,
            order: order.to_vec(),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn items(&self) -> &[FlatItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Categories in display order.
    pub fn categories(&self) -> Vec<&Category> {
        ordered_categories(&self.manifest, &self.order)
    }

    pub fn search(&self, query: &str) -> Vec<FlatItem> {
        filter(&self.items, query)
    }

    /// Items of one group, in manifest order.
    pub fn group_items<'a>(
        &'a self,
        category: &'a str,
        group: &'a str,
    ) -> impl Iterator<Item = &'a FlatItem> + 'a {
        self.items
            .iter()
            .filter(move |i| i.category == category && i.group == group)
    }

    /// Look up an item by its manifest path.
    pub fn find(&self, path: &str) -> Option<&FlatItem> {
        self.items.iter().find(|i| i.path == path)
    }
}
