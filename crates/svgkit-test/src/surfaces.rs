//! # Surface Scenarios
//!
//! Full-document passes over the three rewrite surfaces.

use crate::{attach_same_origin_sheet, legacy_engine};

/// A document image with an SVG source gets its `src` rewritten in place.
#[test]
fn test_image_source_scenario() {
    let engine = legacy_engine(r#"<html><body><img src="logo.svg"></body></html>"#);
    engine.run_fallback(Some("png"));

    let img = &engine.document().get_elements_by_tag_name("img")[0];
    assert_eq!(img.get_attribute("src").as_deref(), Some("logo.png"));
}

/// A stylesheet rule's background-image is rewritten with query and quotes
/// preserved.
#[test]
fn test_stylesheet_rule_scenario() {
    let engine = legacy_engine(
        r#"<html><head>
<style>.hero { background-image: url('hero.svg?v=2'); }</style>
</head><body></body></html>"#,
    );
    engine.run_fallback(Some("webp"));

    let sheets = engine.document().stylesheets();
    let rules = sheets[0].rules().unwrap();
    assert_eq!(
        rules[0].declaration("background-image").unwrap().value,
        "url('hero.webp?v=2')"
    );
}

/// Quotes in inline `url(...)` values are neither added nor stripped.
#[test]
fn test_inline_quote_preservation() {
    let engine = legacy_engine(
        r#"<html><body>
<div id="q" style='background-image: url("icon.svg")'></div>
<div id="n" style="background-image: url(icon.svg)"></div>
</body></html>"#,
    );
    engine.run_fallback(None);

    let doc = engine.document();
    assert_eq!(
        doc.get_element_by_id("q")
            .unwrap()
            .inline_style_property("background-image")
            .as_deref(),
        Some(r#"url("icon.png")"#)
    );
    assert_eq!(
        doc.get_element_by_id("n")
            .unwrap()
            .inline_style_property("background-image")
            .as_deref(),
        Some("url(icon.png)")
    );
}

/// Two consecutive passes leave the same final DOM state as one.
#[test]
fn test_double_pass_no_corruption() {
    let engine = legacy_engine(
        r#"<html><head>
<style>.a { background: url(a.svg) no-repeat; }</style>
</head><body>
<img src="b.svg?r=1">
<div style="background-image: url('c.svg')"></div>
</body></html>"#,
    );

    engine.run_fallback(None);
    let doc = engine.document();
    let img_once = doc.get_elements_by_tag_name("img")[0]
        .get_attribute("src")
        .unwrap();
    let div_once = doc.get_elements_by_tag_name("div")[0]
        .inline_style_property("background-image")
        .unwrap();
    let rule_once = doc.stylesheets()[0].rules().unwrap()[0]
        .declaration("background")
        .unwrap()
        .value
        .clone();

    engine.run_fallback(None);
    assert_eq!(
        doc.get_elements_by_tag_name("img")[0]
            .get_attribute("src")
            .unwrap(),
        img_once
    );
    assert_eq!(
        doc.get_elements_by_tag_name("div")[0]
            .inline_style_property("background-image")
            .unwrap(),
        div_once
    );
    assert_eq!(
        doc.stylesheets()[0].rules().unwrap()[0]
            .declaration("background")
            .unwrap()
            .value,
        rule_once
    );

    assert_eq!(img_once, "b.png?r=1");
    assert_eq!(div_once, "url('c.png')");
    assert_eq!(rule_once, "url(a.png) no-repeat");
}

/// Per-element rewrite handles both surfaces of a single node.
#[test]
fn test_rewrite_single_element() {
    let engine = legacy_engine(
        r#"<html><body>
<img id="x" src="pic.svg" style="background-image: url(frame.svg)">
<img id="y" src="other.svg">
</body></html>"#,
    );

    let doc = engine.document();
    let x = doc.get_element_by_id("x").unwrap();
    engine.rewrite_element(&x, None);

    assert_eq!(x.get_attribute("src").as_deref(), Some("pic.png"));
    assert_eq!(
        x.inline_style_property("background-image").as_deref(),
        Some("url(frame.png)")
    );

    // Untouched sibling: the per-element operation is scoped.
    let y = doc.get_element_by_id("y").unwrap();
    assert_eq!(y.get_attribute("src").as_deref(), Some("other.svg"));
}

/// Backgrounds coming from the cascade are rewritten into inline style when
/// the host exposes a computed-style accessor.
#[test]
fn test_computed_background_rewrite() {
    use svgkit_dom::HostCapabilities;
    use svgkit_engine::{FallbackConfig, SvgFallback};

    let engine = SvgFallback::from_html(
        r#"<html><body><div class="hero"></div></body></html>"#,
        HostCapabilities::legacy_with_computed_style(),
        FallbackConfig::default(),
    )
    .unwrap();
    attach_same_origin_sheet(
        engine.document(),
        ".hero { background-image: url(hero.svg); }",
    );

    let doc = engine.document();
    let div = doc.get_elements_by_tag_name("div")[0].clone();
    engine.rewrite_element_background(&div, None);

    assert_eq!(
        div.inline_style_property("background-image").as_deref(),
        Some("url(hero.png)")
    );
}
