//! The manifest data model shared by the builder, the index and the renderer.
//!
//! ## JSON Shape
//!
//! ```json
//! {
//!   "generatedAt": "2026-01-01T00:00:00.000Z",
//!   "categories": {
//!     "icons": { "total": 2, "groups": { "root": ["icons/a.png", "icons/b.svg"] } }
//!   }
//! }
//! ```
//!
//! Category and group order is the JSON key order, which is why these types
//! are vectors rather than maps.
//!
//! ## Tolerant Reading
//!
//! A manifest that is valid JSON but has the wrong shape is never an error.
//! [`normalize`] is the one place that decides what a missing or mistyped key
//! means (always: empty), and it reports every substitution as a
//! [`ManifestIssue`] so callers can log it.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Conventional bucket for files directly inside a category folder.
pub const ROOT_GROUP: &str = "root";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Informational build timestamp (ISO-8601).
    pub generated_at: Option<String>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    /// Advisory count shown as a badge; see [`Category::item_count`].
    pub total: u64,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// Paths relative to the site base, forward slashes, in display order.
    pub paths: Vec<String>,
}

impl Manifest {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Authoritative item count over all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(Category::item_count).sum()
    }

    /// Parse manifest JSON, tolerating shape problems.
    ///
    /// Only invalid JSON is an error; see [`normalize`].
    pub fn from_json(json: &str) -> Result<Normalized, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(normalize(&value))
    }
}

impl Category {
    /// An empty category, as produced for a missing folder.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: 0,
            groups: Vec::new(),
        }
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Number of paths actually listed, regardless of `total`.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.paths.len()).sum()
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// A shape problem found (and papered over) while reading a manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestIssue {
    /// The document root is not a JSON object.
    NotAnObject,
    /// No `categories` key, or it is not an object.
    MissingCategories,
    /// A category value is not an object.
    CategoryNotAnObject { category: String },
    /// A category has no `groups` key, or it is not an object.
    MissingGroups { category: String },
    /// A group value is not an array.
    GroupNotAnArray { category: String, group: String },
    /// A group list contains a non-string entry, which was skipped.
    NonStringPath { category: String, group: String },
    /// `total` is present but not a non-negative integer.
    InvalidTotal { category: String },
}

impl fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestIssue::NotAnObject => write!(f, "manifest root is not an object"),
            ManifestIssue::MissingCategories => write!(f, "manifest has no categories object"),
            ManifestIssue::CategoryNotAnObject { category } => {
                write!(f, "category '{category}' is not an object")
            }
            ManifestIssue::MissingGroups { category } => {
                write!(f, "category '{category}' has no groups object")
            }
            ManifestIssue::GroupNotAnArray { category, group } => {
                write!(f, "group '{category}/{group}' is not an array")
            }
            ManifestIssue::NonStringPath { category, group } => {
                write!(f, "group '{category}/{group}' contains a non-string path")
            }
            ManifestIssue::InvalidTotal { category } => {
                write!(f, "category '{category}' has an invalid total")
            }
        }
    }
}

/// Result of [`normalize`]: the usable manifest plus what had to be substituted.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub manifest: Manifest,
    pub issues: Vec<ManifestIssue>,
}

impl Normalized {
    /// Log every issue at warn level and return the manifest.
    pub fn into_manifest_logged(self) -> Manifest {
        for issue in &self.issues {
            log::warn!("malformed manifest: {issue}");
        }
        self.manifest
    }
}

/// Turn any JSON value into a [`Manifest`], substituting empty structures for
/// anything missing or mistyped.
pub fn normalize(value: &Value) -> Normalized {
    let mut issues = Vec::new();

    let Some(root) = value.as_object() else {
        issues.push(ManifestIssue::NotAnObject);
        return Normalized {
            manifest: Manifest::default(),
            issues,
        };
    };

    let generated_at = root
        .get("generatedAt")
        .and_then(Value::as_str)
        .map(str::to_string);

    let categories = match root.get("categories").and_then(Value::as_object) {
        Some(map) => map
            .iter()
            .map(|(name, v)| normalize_category(name, v, &mut issues))
            .collect(),
        None => {
            issues.push(ManifestIssue::MissingCategories);
            Vec::new()
        }
    };

    Normalized {
        manifest: Manifest {
            generated_at,
            categories,
        },
        issues,
    }
}

fn normalize_category(name: &str, value: &Value, issues: &mut Vec<ManifestIssue>) -> Category {
    let Some(obj) = value.as_object() else {
        issues.push(ManifestIssue::CategoryNotAnObject {
            category: name.to_string(),
        });
        return Category::empty(name);
    };

    let total = match obj.get("total") {
        None | Some(Value::Null) => 0,
        Some(v) => v.as_u64().unwrap_or_else(|| {
            issues.push(ManifestIssue::InvalidTotal {
                category: name.to_string(),
            });
            0
        }),
    };

    let groups = match obj.get("groups").and_then(Value::as_object) {
        Some(map) => normalize_groups(name, map, issues),
        None => {
            issues.push(ManifestIssue::MissingGroups {
                category: name.to_string(),
            });
            Vec::new()
        }
    };

    Category {
        name: name.to_string(),
        total,
        groups,
    }
}

fn normalize_groups(
    category: &str,
    map: &Map<String, Value>,
    issues: &mut Vec<ManifestIssue>,
) -> Vec<Group> {
    map.iter()
        .map(|(group, v)| {
            let paths = match v.as_array() {
                Some(list) => {
                    let paths: Vec<String> = list
                        .iter()
                        .filter_map(|p| p.as_str().map(str::to_string))
                        .collect();
                    if paths.len() != list.len() {
                        issues.push(ManifestIssue::NonStringPath {
                            category: category.to_string(),
                            group: group.clone(),
                        });
                    }
                    paths
                }
                None => {
                    issues.push(ManifestIssue::GroupNotAnArray {
                        category: category.to_string(),
                        group: group.clone(),
                    });
                    Vec::new()
                }
            };
            Group {
                name: group.clone(),
                paths,
            }
        })
        .collect()
}

// ============================================================================
// Serde
// ============================================================================

struct CategoriesMap<'a>(&'a [Category]);
struct CategoryBody<'a>(&'a Category);
struct GroupsMap<'a>(&'a [Group]);

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Manifest", 2)?;
        s.serialize_field("generatedAt", &self.generated_at)?;
        s.serialize_field("categories", &CategoriesMap(&self.categories))?;
        s.end()
    }
}

impl Serialize for CategoriesMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for category in self.0 {
            map.serialize_entry(&category.name, &CategoryBody(category))?;
        }
        map.end()
    }
}

impl Serialize for CategoryBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Category", 2)?;
        s.serialize_field("total", &self.0.total)?;
        s.serialize_field("groups", &GroupsMap(&self.0.groups))?;
        s.end()
    }
}

impl Serialize for GroupsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in self.0 {
            map.serialize_entry(&group.name, &group.paths)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(normalize(&value).into_manifest_logged())
    }
}
