//! The load lifecycle around a catalog.
//!
//! A [`Session`] owns everything a rendered page depends on: the current
//! [`CatalogIndex`], the [`ViewState`], the load status and the latest notice.
//! It is driven by discrete events and is never shared across threads.
//!
//! ## Loads
//!
//! Every load starts with [`Session::begin_load`], which hands out a
//! [`LoadTicket`]. [`Session::finish_load`] applies a result only if its ticket
//! is the most recently issued one, so a slow early load can never overwrite
//! a newer one. A failed load keeps the last good catalog.

use crate::clipboard::{Clipboard, CopyError};
use crate::index::CatalogIndex;
use crate::source::{self, LoadError, ManifestSource};
use crate::types::Manifest;
use crate::view::{PageView, ViewState, project};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    /// Carries the error message of the failed load.
    Failed(String),
}

impl LoadStatus {
    /// i18n key for the status pill.
    pub fn label_key(&self) -> &'static str {
        match self {
            LoadStatus::Idle | LoadStatus::Ready => "ready",
            LoadStatus::Loading => "loading",
            LoadStatus::Failed(_) => "load_failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadStatus::Failed(_))
    }
}

/// Transient user-facing message (toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Copied,
    CopyFailed,
    LoadFailed,
}

impl Notice {
    pub fn label_key(self) -> &'static str {
        match self {
            Notice::Copied => "copied",
            Notice::CopyFailed => "copy_failed",
            Notice::LoadFailed => "load_failed",
        }
    }
}

/// Identifies one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub enum CopyOutcome {
    /// No item is being previewed.
    NothingToCopy,
    Copied(String),
    Failed(CopyError),
}

#[derive(Debug)]
pub struct Session {
    base_url: String,
    order: Vec<String>,
    index: CatalogIndex,
    view: ViewState,
    status: LoadStatus,
    last_error: Option<LoadError>,
    notice: Option<Notice>,
    issued: u64,
}

impl Session {
    /// A session with nothing loaded yet.
    pub fn new(base_url: &str, order: &[String]) -> Self {
        Self {
            base_url: base_url.to_string(),
            order: order.to_vec(),
            index: CatalogIndex::default(),
            view: ViewState::new(),
            status: LoadStatus::Idle,
            last_error: None,
            notice: None,
            issued: 0,
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.status = LoadStatus::Loading;
        LoadTicket(self.issued)
    }

    /// Apply a load result. Returns `false` if the ticket is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Manifest, LoadError>) -> bool {
        if ticket.0 != self.issued {
            log::warn!(
                "dropping result of load #{} (latest is #{})",
                ticket.0,
                self.issued
            );
            return false;
        }

        match result {
            Ok(manifest) => {
                self.index = CatalogIndex::build(manifest, &self.base_url, &self.order);
                self.view = std::mem::take(&mut self.view).reconcile(&self.index);
                self.status = LoadStatus::Ready;
                self.last_error = None;
                if self.notice == Some(Notice::LoadFailed) {
                    self.notice = None;
                }
                log::info!("catalog loaded: {} items", self.index.items().len());
            }
            Err(err) => {
                log::warn!("manifest load failed: {err}");
                self.status = LoadStatus::Failed(err.to_string());
                self.last_error = Some(err);
                self.notice = Some(Notice::LoadFailed);
            }
        }
        true
    }

    /// Load from `source` and apply the result. Also used for retries.
    pub fn reload(&mut self, source: &ManifestSource) -> bool {
        let ticket = self.begin_load();
        let result = source::load(source);
        self.finish_load(ticket, result)
    }

    pub fn set_query(&mut self, raw: &str) {
        self.view = std::mem::take(&mut self.view).set_query(raw);
    }

    pub fn set_active_group(&mut self, category: &str, group: &str) {
        self.view = std::mem::take(&mut self.view).set_active_group(category, group);
    }

    /// Preview the item at `path`. Returns `false` if no such item is loaded.
    pub fn open_preview(&mut self, path: &str) -> bool {
        let Some(item) = self.index.find(path).cloned() else {
            return false;
        };
        self.view = std::mem::take(&mut self.view).open_preview(item);
        true
    }

    pub fn close_preview(&mut self) {
        self.view = std::mem::take(&mut self.view).close_preview();
    }

    /// Copy the previewed item's URL. Failure only sets a notice.
    pub fn copy_link(&mut self, clipboard: &dyn Clipboard) -> CopyOutcome {
        let Some(url) = self.view.preview().map(|i| i.url.clone()) else {
            return CopyOutcome::NothingToCopy;
        };
        match clipboard.copy(&url) {
            Ok(()) => {
                self.notice = Some(Notice::Copied);
                CopyOutcome::Copied(url)
            }
            Err(err) => {
                log::warn!("copy failed: {err}");
                self.notice = Some(Notice::CopyFailed);
                CopyOutcome::Failed(err)
            }
        }
    }

    /// The current page, as a pure projection of catalog and view state.
    pub fn page(&self) -> PageView {
        project(&self.index, &self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    fn session() -> Session {
        Session::new("/assets/", &default_order())
    }

    #[test]
    fn starts_idle_and_empty() {
        let s = session();
        assert_eq!(s.status(), &LoadStatus::Idle);
        assert!(s.page().categories.is_empty());
        assert!(s.notice().is_none());
    }

    #[test]
    fn successful_load_builds_index() {
        let mut s = session();
        let t = s.begin_load();
        assert_eq!(s.status(), &LoadStatus::Loading);
        assert!(s.finish_load(t, Ok(sample_manifest())));
        assert_eq!(s.status(), &LoadStatus::Ready);
        assert_eq!(s.index().items().len(), sample_manifest().item_count());
        assert_eq!(
            s.index().find("icons/a.png").unwrap().url,
            "/assets/icons/a.png"
        );
    }

    #[test]
    fn scenario_404_then_successful_retry() {
        let mut s = session();
        let t = s.begin_load();
        s.finish_load(t, Err(LoadError::Status(404)));

        assert!(s.index().items().is_empty());
        assert!(matches!(s.last_error(), Some(LoadError::Status(404))));
        assert!(s.status().is_failed());
        assert_eq!(s.status().label_key(), "load_failed");
        assert_eq!(s.notice(), Some(Notice::LoadFailed));

        let t = s.begin_load();
        s.finish_load(t, Ok(sample_manifest()));
        assert_eq!(s.status(), &LoadStatus::Ready);
        assert!(s.last_error().is_none());
        assert!(s.notice().is_none());
        assert!(!s.index().items().is_empty());
    }

    #[test]
    fn successful_load_keeps_copy_notice() {
        let mut s = session();
        let t = s.begin_load();
        s.finish_load(t, Ok(sample_manifest()));
        assert!(s.open_preview("icons/a.png"));
        s.copy_link(&RecordingClipboard::default());

        let t = s.begin_load();
        s.finish_load(t, Ok(sample_manifest()));
        assert_eq!(s.notice(), Some(Notice::Copied));
    }

    #[test]
    fn failure_keeps_last_good_catalog() {
        let mut s = session();
        let t = s.begin_load();
        s.finish_load(t, Ok(sample_manifest()));
        let before = s.index().items().to_vec();

        let t = s.begin_load();
        s.finish_load(t, Err(LoadError::Transport("connection reset".into())));
        assert_eq!(s.index().items(), before.as_slice());
        assert!(s.status().is_failed());
    }

    #[test]
    fn most_recent_load_wins() {
        let mut s = session();
        let first = s.begin_load();
        let second = s.begin_load();

        let newer = manifest_from(
            r#"{"categories":{"icons":{"total":1,"groups":{"root":["icons/new.png"]}}}}"#,
        );
        assert!(s.finish_load(second, Ok(newer)));
        assert!(!s.finish_load(first, Ok(sample_manifest())));

        let paths: Vec<&str> = s.index().items().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["icons/new.png"]);
        assert_eq!(s.status(), &LoadStatus::Ready);
    }

    #[test]
    fn stale_failure_does_not_clobber_newer_success() {
        let mut s = session();
        let first = s.begin_load();
        let second = s.begin_load();
        s.finish_load(second, Ok(sample_manifest()));
        s.finish_load(first, Err(LoadError::Status(500)));

        assert_eq!(s.status(), &LoadStatus::Ready);
        assert!(s.last_error().is_none());
        assert!(s.notice().is_none());
    }

    #[test]
    fn reload_reads_source() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");
        fs::write(&path, serde_json::to_string(&sample_manifest()).unwrap()).unwrap();

        let mut s = session();
        assert!(s.reload(&ManifestSource::file(&path)));
        assert_eq!(s.status(), &LoadStatus::Ready);

        fs::remove_file(&path).unwrap();
        s.reload(&ManifestSource::file(&path));
        assert!(s.status().is_failed());
        assert!(!s.index().items().is_empty());
    }

    #[test]
    fn reload_reconciles_selection() {
        let mut s = session();
        let t = s.begin_load();
        s.finish_load(t, Ok(sample_manifest()));
        s.set_active_group("icons", "brands");
        assert_eq!(s.page().category("icons").unwrap().active_group, "brands");

        let t = s.begin_load();
        s.finish_load(
            t,
            Ok(manifest_from(
                r#"{"categories":{"icons":{"total":1,"groups":{"root":["icons/a.png"]}}}}"#,
            )),
        );
        assert_eq!(s.view().selected_group("icons"), None);
        assert_eq!(s.page().category("icons").unwrap().active_group, "root");
    }

    #[test]
    fn query_survives_reload() {
        let mut s = session();
        s.set_query("GitHub");
        let t = s.begin_load();
        s.finish_load(t, Ok(sample_manifest()));
        s.set_active_group("icons", "brands");
        assert_eq!(s.page().query, "github");
        assert_eq!(s.page().visible_count(), 1);
    }

    #[test]
    fn copy_link_success_and_failure() {
        let mut s = session();
        let t = s.begin_load();
        s.finish_load(t, Ok(sample_manifest()));

        assert!(matches!(
            s.copy_link(&RecordingClipboard::default()),
            CopyOutcome::NothingToCopy
        ));

        assert!(s.open_preview("icons/b.svg"));
        let clipboard = RecordingClipboard::default();
        match s.copy_link(&clipboard) {
            CopyOutcome::Copied(url) => assert_eq!(url, "/assets/icons/b.svg"),
            other => panic!("expected copy, got {other:?}"),
        }
        assert_eq!(clipboard.copied(), vec!["/assets/icons/b.svg"]);
        assert_eq!(s.notice(), Some(Notice::Copied));

        assert!(matches!(s.copy_link(&FailingClipboard), CopyOutcome::Failed(_)));
        assert_eq!(s.notice(), Some(Notice::CopyFailed));
        // failure leaves everything else alone
        assert_eq!(s.view().preview().unwrap().path, "icons/b.svg");
        assert_eq!(s.status(), &LoadStatus::Ready);
    }

    #[test]
    fn preview_unknown_path_is_rejected() {
        let mut s = session();
        assert!(!s.open_preview("icons/a.png"));
        let t = s.begin_load();
        s.finish_load(t, Ok(sample_manifest()));
        assert!(s.open_preview("icons/a.png"));
        s.close_preview();
        assert!(s.view().preview().is_none());
    }
}
