//! HTML rendering of a projected page.
//!
//! Takes a [`PageView`] (see [`crate::view`]) plus page chrome and produces a
//! single self-contained HTML document:
//!
//! - a header with title, subtitle, the current query and a status pill;
//! - one card per category with a total badge, group chips and either a
//!   thumbnail grid or an explicit empty box;
//! - the preview modal when an item is selected;
//! - a toast for the latest notice.
//!
//! Uses [maud](https://maud.lambda.xyz/) so every interpolated value is
//! escaped.

use crate::config::SiteConfig;
use crate::i18n::{Lang, category_label, t};
use crate::index::FlatItem;
use crate::session::{LoadStatus, Notice, Session};
use crate::view::{CardBody, CategoryView, PageView};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::io;
use std::path::Path;

const CSS: &str = include_str!("../static/style.css");

/// Page chrome that is not part of the projection.
#[derive(Debug, Clone)]
pub struct Chrome<'a> {
    pub lang: Lang,
    /// Title override; empty means the localized default.
    pub title: &'a str,
    pub repository: &'a str,
    pub status: &'a LoadStatus,
    pub notice: Option<Notice>,
}

impl<'a> Chrome<'a> {
    pub fn new(site: &'a SiteConfig, status: &'a LoadStatus) -> Self {
        Self {
            lang: site.lang,
            title: &site.title,
            repository: &site.repository,
            status,
            notice: None,
        }
    }

    fn title(&self) -> String {
        if self.title.is_empty() {
            t(self.lang, "title")
        } else {
            self.title.to_string()
        }
    }
}

/// Render the whole document.
pub fn render_page(page: &PageView, chrome: &Chrome) -> Markup {
    let lang = chrome.lang;
    let title = chrome.title();

    html! {
        (DOCTYPE)
        html lang=(lang.html_tag()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (render_header(page, chrome, &title))
                main #cards .cards {
                    @for category in &page.categories {
                        (render_category(category, lang))
                    }
                }
                @if let Some(item) = &page.preview {
                    (render_modal(item, lang))
                }
                @if let Some(notice) = chrome.notice {
                    div #toast .toast.show role="status" { (t(lang, notice.label_key())) }
                }
            }
        }
    }
}

/// Render a session's current page.
pub fn render_session(session: &Session, site: &SiteConfig) -> Markup {
    let mut chrome = Chrome::new(site, session.status());
    chrome.notice = session.notice();
    render_page(&session.page(), &chrome)
}

fn render_header(page: &PageView, chrome: &Chrome, title: &str) -> Markup {
    let lang = chrome.lang;
    html! {
        header.site-header {
            div.brand {
                h1 #title { (title) }
                p #subtitle { (t(lang, "subtitle")) }
            }
            div.toolbar {
                input #searchInput .search type="search"
                    aria-label=(t(lang, "search"))
                    placeholder=(t(lang, "search_placeholder"))
                    value=(page.query);
                span #statusPill .status-pill.failed[chrome.status.is_failed()]
                    title=[failure_detail(chrome.status)] {
                    (t(lang, chrome.status.label_key()))
                }
                span #langBtn .lang { (lang.label()) }
                @if !chrome.repository.is_empty() {
                    a #repoBtn .repo href=(chrome.repository) target="_blank" rel="noopener" {
                        (t(lang, "repository"))
                    }
                }
            }
        }
    }
}

fn failure_detail(status: &LoadStatus) -> Option<&str> {
    match status {
        LoadStatus::Failed(msg) => Some(msg),
        _ => None,
    }
}

fn render_category(category: &CategoryView, lang: Lang) -> Markup {
    let title = category_label(lang, &category.name);
    html! {
        article.card data-cat=(category.name) {
            div.card-head {
                div {
                    div.card-title { (title) }
                    div.card-meta { (category.active_group) }
                }
                div.badge { (category.total) }
            }
            div.group-chips {
                @if category.groups.is_empty() {
                    span.group-chip.active { (category.active_group) }
                }
                @for tab in &category.groups {
                    span.group-chip.active[tab.active] data-group=(tab.name) {
                        (tab.name) " " span.count { (tab.count) }
                    }
                }
            }
            div.card-body {
                @match &category.body {
                    CardBody::Items(items) => {
                        div.grid {
                            @for item in items {
                                (render_thumb(item))
                            }
                        }
                    },
                    CardBody::Empty => {
                        div.empty-box { (t(lang, "empty_group")) }
                    },
                }
            }
        }
    }
}

fn render_thumb(item: &FlatItem) -> Markup {
    html! {
        a.thumb href=(item.url) title=(item.path)
            data-path=(item.path)
            data-name=(item.name)
            data-cat=(item.category)
            data-group=(item.group) {
            img loading="lazy" src=(item.url) alt=(item.name);
        }
    }
}

fn render_modal(item: &FlatItem, lang: Lang) -> Markup {
    html! {
        div #modal .modal.show aria-hidden="false" {
            div.modal-backdrop {}
            div.modal-panel role="dialog" aria-modal="true" aria-labelledby="modalName" {
                img #modalImg src=(item.url) alt=(item.name);
                div.modal-info {
                    div #modalName .modal-name { (item.name) }
                    div #modalPath .modal-path { (item.path) }
                    input.modal-url type="text" readonly value=(item.url);
                }
                div.modal-actions {
                    button #copyBtn type="button" data-url=(item.url) { (t(lang, "copy")) }
                    a #openBtn href=(item.url) target="_blank" rel="noopener" { (t(lang, "open")) }
                    a #doneBtn href="./" { (t(lang, "done")) }
                }
            }
        }
    }
}

/// Write a rendered page, creating the parent directory.
pub fn write_page(markup: Markup, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())
}
