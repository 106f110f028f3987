//! # Asset Library
//!
//! A static asset library: a few image folders become a JSON manifest, and
//! the manifest becomes a searchable, categorized gallery page with a preview
//! and a copy-link action.
//!
//! # Architecture: Two Stages
//!
//! ```text
//! 1. Scan    avatars/ icons/ photos/  →  data/manifest.json   (filesystem → data)
//! 2. Render  manifest.json            →  dist/index.html      (data → page)
//! ```
//!
//! The manifest is the single source of truth between the two. It is plain
//! JSON, so it can also be consumed by anything else (a CDN listing, another
//! front end) and inspected by hand.
//!
//! Rendering is itself split in two: a pure projection from
//! `(catalog, view state)` to a [`view::PageView`], and the HTML for that
//! view. Everything up to the HTML is testable without a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks category folders, writes the manifest atomically |
//! | [`types`] | Manifest data model and tolerant normalization of malformed input |
//! | [`source`] | Loads a manifest from a file or an HTTP(S) URL |
//! | [`index`] | Flat item list: `resolve`, `flatten`, `filter`, `group_by_category` |
//! | [`view`] | Active-group rule, view-state transitions, page projection |
//! | [`session`] | Load lifecycle: status, last-good retention, most-recent-load-wins |
//! | [`render`] | Stage 2: HTML for a projected page, via Maud |
//! | [`config`] | `library.toml` loading, merging and validation |
//! | [`naming`] | Natural ordering, display names, extension checks |
//! | [`i18n`] | English and Chinese interface strings |
//! | [`clipboard`] | Clipboard trait and system implementation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Tolerant Manifests
//!
//! A page must always render *something*. A manifest that is valid JSON but
//! has missing or mistyped keys is normalized once, in [`types::normalize`],
//! into empty structures; the substitutions are logged, never raised. Only a
//! failed transport or invalid JSON is a [`source::LoadError`].
//!
//! ## Groups
//!
//! Immediate sub-folders of a category are groups; loose files are the `root`
//! group. `grouping = "flat"` in `library.toml` turns sub-folders off. Either
//! way the manifest format is the same, so the index and renderer never care.
//!
//! ## Deployment-Relative URLs
//!
//! Manifest paths are relative. They are resolved against `site.base_url` at
//! index time ([`index::resolve`]), so one manifest works under any sub-path.

pub mod clipboard;
pub mod config;
pub mod i18n;
pub mod index;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod session;
pub mod source;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
