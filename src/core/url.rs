//! URL and path string utilities.
//!
//! Asset references are URL-like strings; these helpers split off query
//! strings and convert on-disk destinations to web-root-relative paths.

use std::path::Path;

/// Split a reference path into pathname and query string.
///
/// The query is returned without its leading `?` and must be re-appended
/// verbatim by the caller; no decoding or normalization happens here.
///
/// # Examples
/// ```ignore
/// assert_eq!(split_query("img/a.png?v=2"), ("img/a.png", Some("v=2")));
/// assert_eq!(split_query("img/a.png"), ("img/a.png", None));
/// ```
#[inline]
pub fn split_query(value: &str) -> (&str, Option<&str>) {
    match value.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (value, None),
    }
}

/// Strip leading slash from a URL path
///
/// # Examples
/// ```ignore
/// assert_eq!(strip_leading_slash("/images/logo.png"), "images/logo.png");
/// assert_eq!(strip_leading_slash("images/logo.png"), "images/logo.png");
/// ```
#[inline]
pub fn strip_leading_slash(url: &str) -> &str {
    url.trim_start_matches('/')
}

/// Convert an on-disk destination path to a web-root-relative URL path.
///
/// The public root prefix is stripped and a leading slash added, so
/// `public/images/logo-abc.png` becomes `/images/logo-abc.png`. Works for
/// both absolute destinations (under an absolute public root) and relative
/// ones that carry the public root's directory name as their first
/// component.
pub fn web_path(destination: &Path, public_root: &Path) -> String {
    let rel = destination
        .strip_prefix(public_root)
        .ok()
        .or_else(|| {
            public_root
                .file_name()
                .and_then(|name| destination.strip_prefix(name).ok())
        })
        .unwrap_or(destination);

    let rel = rel.display().to_string();
    format!("/{}", strip_leading_slash(&rel))
}
