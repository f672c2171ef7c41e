//! URL rewrite grammar.
//!
//! One rewrite policy for every surface: a URL is rewritten iff it ends in
//! `.svg` (ASCII case-insensitive), optionally followed by a `?query`. The
//! match anchors to the end of the string, so a `.svg` path component that is
//! not the trailing extension is never touched, and rewriting is idempotent.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static SVG_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<stem>.*)\.svg(?P<query>\?.*)?$").expect("svg suffix pattern")
});

static CSS_URL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\((?P<open>['"]?)(?P<inner>[^'"()\s]*)(?P<close>['"]?)\)"#)
        .expect("css url token pattern")
});

/// Whether a URL ends in `.svg` (optionally with a query string).
pub fn is_svg_url(url: &str) -> bool {
    SVG_SUFFIX.is_match(url)
}

/// Rewrite a `.svg`-suffixed URL to the fallback extension.
///
/// Non-matching input (including the empty string) is returned unchanged;
/// the query component, if any, is preserved.
pub fn fallback_url<'a>(url: &'a str, ext: &str) -> Cow<'a, str> {
    match SVG_SUFFIX.captures(url) {
        Some(caps) => {
            let stem = caps.name("stem").map(|m| m.as_str()).unwrap_or("");
            let query = caps.name("query").map(|m| m.as_str()).unwrap_or("");
            Cow::Owned(format!("{stem}.{ext}{query}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Rewrite every `url(...)` token in a CSS value.
///
/// Quote characters inside the token are preserved verbatim: neither added
/// nor stripped. Returns `None` when nothing changed.
pub fn rewrite_css_value(value: &str, ext: &str) -> Option<String> {
    let rewritten = CSS_URL_TOKEN.replace_all(value, |caps: &Captures| {
        let open = &caps["open"];
        let inner = &caps["inner"];
        let close = &caps["close"];
        format!("url({open}{}{close})", fallback_url(inner, ext))
    });

    match rewritten {
        Cow::Borrowed(_) => None,
        Cow::Owned(s) if s == value => None,
        Cow::Owned(s) => Some(s),
    }
}

/// Whether a CSS value contains a `url(...)` token pointing at an SVG.
pub fn has_svg_css_value(value: &str) -> bool {
    CSS_URL_TOKEN
        .captures_iter(value)
        .any(|caps| is_svg_url(&caps["inner"]))
}
