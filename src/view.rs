//! Grouped view projection.
//!
//! Rendering is a pure function of `(catalog, view state)`: [`project`] takes
//! a [`CatalogIndex`] and a [`ViewState`] and returns a [`PageView`] that the
//! renderer turns into HTML. There is no other state.
//!
//! ## State
//!
//! [`ViewState`] holds two independent variables plus the preview:
//!
//! - the query, shared by every category;
//! - an explicit active group per category (absent = use the default rule);
//! - the previewed item, if any.
//!
//! Transitions consume the state and return the next one. Changing the query
//! never touches group selections and vice versa, so transitions commute.
//!
//! ## Default Group
//!
//! `root` if the category has it, else its first group, else a synthetic empty
//! `root`. An explicit selection that names a group the category no longer has
//! is ignored by [`project`] and dropped by [`ViewState::reconcile`].

use crate::index::{CatalogIndex, FlatItem, Query};
use crate::types::{Category, ROOT_GROUP};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    query: Query,
    active: BTreeMap<String, String>,
    preview: Option<FlatItem>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn preview(&self) -> Option<&FlatItem> {
        self.preview.as_ref()
    }

    /// Explicitly selected group for `category`, if any.
    pub fn selected_group(&self, category: &str) -> Option<&str> {
        self.active.get(category).map(String::as_str)
    }

    pub fn set_query(mut self, raw: &str) -> Self {
        self.query = Query::new(raw);
        self
    }

    /// Select `group` for `category` only. Other categories are unaffected.
    pub fn set_active_group(mut self, category: &str, group: &str) -> Self {
        self.active.insert(category.to_string(), group.to_string());
        self
    }

    pub fn open_preview(mut self, item: FlatItem) -> Self {
        self.preview = Some(item);
        self
    }

    pub fn close_preview(mut self) -> Self {
        self.preview = None;
        self
    }

    /// Drop selections that no longer exist in `index`, and re-read the
    /// previewed item from it (dropping the preview if its path is gone).
    ///
    /// Called after every manifest reload.
    pub fn reconcile(mut self, index: &CatalogIndex) -> Self {
        self.active.retain(|category, group| {
            index
                .manifest()
                .category(category)
                .is_some_and(|c| c.group(group).is_some())
        });
        self.preview = self
            .preview
            .take()
            .and_then(|item| index.find(&item.path).cloned());
        self
    }

    /// Group shown for `category`: a still-valid explicit choice, else the default.
    pub fn active_group(&self, category: &Category) -> String {
        match self.selected_group(&category.name) {
            Some(group) if category.group(group).is_some() => group.to_string(),
            _ => default_group(category),
        }
    }
}

/// `root` if present, else the first group, else a synthetic `root`.
pub fn default_group(category: &Category) -> String {
    if category.group(ROOT_GROUP).is_some() {
        return ROOT_GROUP.to_string();
    }
    category
        .groups
        .first()
        .map(|g| g.name.clone())
        .unwrap_or_else(|| ROOT_GROUP.to_string())
}

/// A group switcher entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTab {
    pub name: String,
    pub count: usize,
    pub active: bool,
}

/// What a category card shows below its header.
#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    Items(Vec<FlatItem>),
    /// Nothing in the active group matches (or it has no files).
    Empty,
}

impl CardBody {
    pub fn items(&self) -> &[FlatItem] {
        match self {
            CardBody::Items(items) => items,
            CardBody::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CardBody::Empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryView {
    pub name: String,
    /// Advisory badge value from the manifest.
    pub total: u64,
    pub groups: Vec<GroupTab>,
    pub active_group: String,
    pub body: CardBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub query: String,
    pub categories: Vec<CategoryView>,
    pub preview: Option<FlatItem>,
}

impl PageView {
    pub fn category(&self, name: &str) -> Option<&CategoryView> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Number of thumbnails across all cards.
    pub fn visible_count(&self) -> usize {
        self.categories.iter().map(|c| c.body.items().len()).sum()
    }
}

/// Project one category: its active group's items filtered by the query.
pub fn project_category(index: &CatalogIndex, category: &Category, state: &ViewState) -> CategoryView {
    let active_group = state.active_group(category);
    let items: Vec<FlatItem> = index
        .group_items(&category.name, &active_group)
        .filter(|item| state.query.matches(item))
        .cloned()
        .collect();

    let groups = category
        .groups
        .iter()
        .map(|g| GroupTab {
            name: g.name.clone(),
            count: g.paths.len(),
            active: g.name == active_group,
        })
        .collect();

    CategoryView {
        name: category.name.clone(),
        total: category.total,
        groups,
        body: if items.is_empty() {
            CardBody::Empty
        } else {
            CardBody::Items(items)
        },
        active_group,
    }
}

/// Project every category of the index, in display order.
pub fn project(index: &CatalogIndex, state: &ViewState) -> PageView {
    PageView {
        query: state.query.as_str().to_string(),
        categories: index
            .categories()
            .into_iter()
            .map(|c| project_category(index, c, state))
            .collect(),
        preview: state.preview.clone(),
    }
}
