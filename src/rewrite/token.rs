//! Asset reference token grammar.
//!
//! Compiled stylesheets refer to assets with `asset-url(...)` and
//! `asset-path(...)` function calls. Function names are case-sensitive
//! literals; the argument may be bare or wrapped in single or double
//! quotes and may carry a query string. Paths never contain raw
//! parentheses or quote characters, so a token that would need them
//! simply does not parse.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::split_query;

/// Which reference form was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// `asset-url(...)` - rewritten to a `url(...)` wrapper.
    Url,
    /// `asset-path(...)` - rewritten to the bare path.
    Path,
}

/// One reference token found in a file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference<'a> {
    pub kind: RefKind,
    /// Byte range of the full token in the scanned text.
    pub range: Range<usize>,
    /// Path portion, query string split off.
    pub asset_path: &'a str,
    /// Query string without its leading `?`, preserved verbatim.
    pub query: Option<&'a str>,
}

/// Token pattern. Quote handling is spelled out as alternation because
/// the regex engine has no backreferences; group 2/3/4 is the quoted or
/// bare argument.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"asset-(url|path)\(\s*(?:'([^']*)'|"([^"]*)"|([^'"()\s]+))\s*\)"#).unwrap()
});

/// Scan text for every non-overlapping reference token, in order.
pub fn scan_references(text: &str) -> Vec<AssetReference<'_>> {
    TOKEN
        .captures_iter(text)
        .map(|cap| {
            let full = cap.get(0).expect("match always has group 0");
            let kind = match cap.get(1).map(|g| g.as_str()) {
                Some("url") => RefKind::Url,
                _ => RefKind::Path,
            };
            let argument = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map(|g| g.as_str())
                .unwrap_or_default();
            let (asset_path, query) = split_query(argument);
            AssetReference {
                kind,
                range: full.range(),
                asset_path,
                query,
            }
        })
        .collect()
}

/// Find `asset-url(`/`asset-path(` occurrences the grammar did not match
/// (unbalanced quotes, stray parens). Returns a short snippet per
/// occurrence for the warning report.
pub fn scan_malformed(text: &str, tokens: &[AssetReference<'_>]) -> Vec<String> {
    let mut snippets = Vec::new();
    for needle in ["asset-url(", "asset-path("] {
        for (offset, _) in text.match_indices(needle) {
            let covered = tokens
                .iter()
                .any(|t| t.range.start <= offset && offset < t.range.end);
            if covered {
                continue;
            }

            let mut snippet = String::new();
            for c in text[offset..].chars().take(48) {
                snippet.push(c);
                if c == ')' {
                    break;
                }
            }
            snippets.push(snippet);
        }
    }
    snippets
}
