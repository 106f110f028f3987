//! Interface strings for the rendered page.
//!
//! Lookups fall back from the active language to English, and from English to
//! the key itself, so a new category folder always gets *some* label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Zh,
}

impl Lang {
    /// Value for the `lang` attribute of the `<html>` element.
    pub fn html_tag(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh-CN",
        }
    }

    /// Short label for the language toggle.
    pub fn label(self) -> &'static str {
        match self {
            Lang::En => "EN",
            Lang::Zh => "中文",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lang::En => "en",
            Lang::Zh => "zh",
        })
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "zh" | "zh-cn" => Ok(Lang::Zh),
            other => Err(format!("unsupported language '{other}' (expected en or zh)")),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("title", "Asset Library"),
    ("subtitle", "Search, preview, and copy direct links."),
    ("search_placeholder", "Search: category / group / filename"),
    ("search", "Search"),
    ("ready", "Ready"),
    ("loading", "Loading…"),
    ("load_failed", "Load failed"),
    ("empty_group", "No files in this group."),
    ("copy", "Copy link"),
    ("open", "Open"),
    ("done", "Done"),
    ("copied", "Link copied"),
    ("copy_failed", "Copy failed"),
    ("repository", "Repository"),
    ("category.avatars", "Avatars"),
    ("category.icons", "Icons"),
    ("category.photos", "Photos"),
];

const ZH: &[(&str, &str)] = &[
    ("title", "资源库"),
    ("subtitle", "搜索、预览并复制直链。"),
    ("search_placeholder", "搜索：分类 / 分组 / 文件名"),
    ("search", "搜索"),
    ("ready", "就绪"),
    ("loading", "加载中…"),
    ("load_failed", "加载失败"),
    ("empty_group", "该分组暂无文件。"),
    ("copy", "复制链接"),
    ("open", "打开"),
    ("done", "完成"),
    ("copied", "已复制链接"),
    ("copy_failed", "复制失败"),
    ("repository", "仓库"),
    ("category.avatars", "头像"),
    ("category.icons", "图标"),
    ("category.photos", "图片"),
];

fn table(lang: Lang) -> &'static [(&'static str, &'static str)] {
    match lang {
        Lang::En => EN,
        Lang::Zh => ZH,
    }
}

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    table(lang)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Translate `key`, falling back to English and then to the key itself.
pub fn t(lang: Lang, key: &str) -> String {
    lookup(lang, key)
        .or_else(|| lookup(Lang::En, key))
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

/// Card title for a category folder. Unknown folders show their own name.
pub fn category_label(lang: Lang, category: &str) -> String {
    let key = format!("category.{category}");
    lookup(lang, &key)
        .or_else(|| lookup(Lang::En, &key))
        .map(str::to_string)
        .unwrap_or_else(|| category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_keys() {
        assert_eq!(t(Lang::En, "ready"), "Ready");
        assert_eq!(t(Lang::Zh, "ready"), "就绪");
    }

    #[test]
    fn unknown_category_falls_back_to_folder_name() {
        assert_eq!(category_label(Lang::Zh, "wallpapers"), "wallpapers");
        assert_eq!(category_label(Lang::Zh, "photos"), "图片");
    }

    #[test]
    fn category_names_do_not_collide_with_interface_strings() {
        assert_eq!(category_label(Lang::En, "title"), "title");
        assert_eq!(category_label(Lang::En, "copy"), "copy");
        assert_eq!(t(Lang::En, "title"), "Asset Library");
    }

    #[test]
    fn every_english_key_has_a_chinese_entry() {
        for (key, _) in EN {
            assert!(lookup(Lang::Zh, key).is_some(), "missing zh entry for {key}");
        }
    }

    #[test]
    fn parses_language_codes() {
        assert_eq!("EN".parse::<Lang>(), Ok(Lang::En));
        assert_eq!("zh-CN".parse::<Lang>(), Ok(Lang::Zh));
        assert!("fr".parse::<Lang>().is_err());
    }
}
