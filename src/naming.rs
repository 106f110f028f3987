//! File-name conventions shared by the builder and the index.
//!
//! ## Natural Ordering
//!
//! Asset folders are usually filled with names like `avatar-1.png` …
//! `avatar-12.png`. Plain byte ordering would put `avatar-10` before
//! `avatar-2`, so group lists are sorted with [`natural_cmp`], which compares
//! runs of digits by numeric value and everything else case-insensitively:
//!
//! ```text
//! avatar-1.png, avatar-2.png, avatar-10.png, Avatar-11.png
//! ```
//!
//! Ties (`a.png` vs `A.png`) fall back to byte order so the output is fully
//! deterministic across runs and platforms.

use std::cmp::Ordering;

/// A maximal run of either ASCII digits or non-digit characters.
#[derive(Debug, PartialEq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(make_chunk(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(last) = in_digits {
        out.push(make_chunk(&s[start..], last));
    }
    out
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}

/// Compare two digit runs by numeric value without parsing (no overflow).
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numeric-aware, case-insensitive ordering for file names and paths.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ca = chunks(a);
    let cb = chunks(b);
    for (x, y) in ca.iter().zip(cb.iter()) {
        let ord = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            // digits sort before letters, same as most locale collations
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ca.len().cmp(&cb.len()).then_with(|| a.cmp(b))
}

/// Last `/`-separated segment of a manifest path (`"icons/a.png"` → `"a.png"`).
pub fn display_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether a file or directory name is hidden (`.DS_Store`, `.gitkeep`, …).
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Case-insensitive extension check against an allow-list of bare extensions.
///
/// Names without an extension, and dot-files such as `.png`, never match.
pub fn has_allowed_extension(name: &str, allowed: &[String]) -> bool {
    if is_hidden(name) {
        return false;
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
        }
        _ => false,
    }
}
