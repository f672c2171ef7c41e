//! # Security Scenarios
//!
//! Cross-origin stylesheet access during a fallback pass.

use crate::{attach_cross_origin_sheet, attach_same_origin_sheet, legacy_engine};
use svgkit_dom::DomError;

/// A cross-origin sheet is skipped; every accessible sheet is still
/// rewritten and the pass returns normally.
#[test]
fn test_cross_origin_sheet_skipped() {
    let engine = legacy_engine("<html><body></body></html>");
    let doc = engine.document();

    attach_same_origin_sheet(doc, ".a { background-image: url(a.svg); }");
    attach_cross_origin_sheet(
        doc,
        "https://cdn.example/site.css",
        ".b { background-image: url(b.svg); }",
    );
    attach_same_origin_sheet(doc, ".c { background-image: url(c.svg); }");

    engine.run_fallback(None);

    let sheets = doc.stylesheets();
    assert_eq!(
        sheets[0].rules().unwrap()[0]
            .declaration("background-image")
            .unwrap()
            .value,
        "url(a.png)"
    );
    // The sheet after the denied one was still processed.
    assert_eq!(
        sheets[2].rules().unwrap()[0]
            .declaration("background-image")
            .unwrap()
            .value,
        "url(c.png)"
    );
    // The denied sheet itself remains unreadable.
    assert!(matches!(sheets[1].rules(), Err(DomError::Security(_))));
}

/// A document whose only sheets are cross-origin still completes its pass.
#[test]
fn test_all_sheets_denied_is_not_fatal() {
    let engine = legacy_engine(r#"<html><body><img src="logo.svg"></body></html>"#);
    attach_cross_origin_sheet(
        engine.document(),
        "https://cdn.example/a.css",
        ".a { background: url(a.svg); }",
    );

    engine.run_fallback(None);

    // Image surface was unaffected by the stylesheet denials.
    let img = &engine.document().get_elements_by_tag_name("img")[0];
    assert_eq!(img.get_attribute("src").as_deref(), Some("logo.png"));
}
