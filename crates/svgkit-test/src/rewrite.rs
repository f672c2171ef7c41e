//! # Rewrite Scenarios
//!
//! Observable properties of the URL rewrite grammar, exercised through the
//! engine facade.

use crate::legacy_engine;

/// Strings not ending in `.svg` pass through untouched.
#[test]
fn test_non_svg_urls_are_identity() {
    let engine = legacy_engine("<html></html>");

    for url in ["logo.png", "photo.jpeg", "", "svg", "a.svgz", "x.svg.bak"] {
        assert_eq!(engine.fallback_url(url, None), url);
    }
}

/// `prefix + ".svg"` becomes `prefix + "." + ext`.
#[test]
fn test_suffix_replacement() {
    let engine = legacy_engine("<html></html>");

    assert_eq!(engine.fallback_url("logo.svg", None), "logo.png");
    assert_eq!(engine.fallback_url("logo.svg", Some("webp")), "logo.webp");
    assert_eq!(
        engine.fallback_url("/deep/path/logo.svg", None),
        "/deep/path/logo.png"
    );
}

/// The query component survives the rewrite.
#[test]
fn test_query_preserved() {
    let engine = legacy_engine("<html></html>");

    assert_eq!(
        engine.fallback_url("hero.svg?v=2&w=100", Some("webp")),
        "hero.webp?v=2&w=100"
    );
}

/// Applying the rewrite twice equals applying it once.
#[test]
fn test_idempotence() {
    let engine = legacy_engine("<html></html>");

    for url in ["logo.svg", "hero.svg?v=2", "logo.png", "assets.svg/icon.svg"] {
        let once = engine.fallback_url(url, None).into_owned();
        let twice = engine.fallback_url(&once, None).into_owned();
        assert_eq!(once, twice, "rewrite of {url:?} must be idempotent");
    }
}

/// Only the trailing extension is treated as the extension.
#[test]
fn test_embedded_svg_component_untouched() {
    let engine = legacy_engine("<html></html>");

    assert_eq!(
        engine.fallback_url("icons.svg/arrow.gif", None),
        "icons.svg/arrow.gif"
    );
    assert_eq!(
        engine.fallback_url("icons.svg/arrow.svg", None),
        "icons.svg/arrow.png"
    );
}
