//! Surface walker.
//!
//! Applies the URL rewrite across the three surfaces the engine knows about:
//! image `src` attributes, inline background styles, and stylesheet rules.
//! Every operation re-queries the live document and is idempotent, so passes
//! may be repeated freely.

use svgkit_dom::{Document, Node};
use tracing::{debug, trace, warn};

use crate::rewrite::{fallback_url, has_svg_css_value, is_svg_url, rewrite_css_value};

/// Properties a background reference can live under.
const BACKGROUND_PROPERTIES: [&str; 2] = ["background-image", "background"];

/// Whether the node is an `<img>` whose `src` points at an SVG.
pub fn is_svg_image(node: &Node) -> bool {
    node.is_tag("img")
        && node
            .get_attribute("src")
            .map(|src| is_svg_url(&src))
            .unwrap_or(false)
}

/// The element's effective background-image value.
///
/// Reads the inline declaration first (the legacy current-style accessor),
/// then falls back to the computed value when the host exposes a
/// computed-style accessor. `none` and empty values yield `None`.
pub fn background_image_style(document: &Document, node: &Node) -> Option<String> {
    let value = node
        .inline_style_property("background-image")
        .or_else(|| node.inline_style_property("background"))
        .or_else(|| document.computed_property(node, "background-image"))
        .or_else(|| document.computed_property(node, "background"))?;

    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(value)
}

/// Whether the element's effective background references an SVG.
pub fn has_svg_background(document: &Document, node: &Node) -> bool {
    background_image_style(document, node)
        .map(|value| has_svg_css_value(&value))
        .unwrap_or(false)
}

/// Rewrite one image element's `src` in place, if it points at an SVG.
pub fn rewrite_image_src(node: &Node, ext: &str) {
    let Some(src) = node.get_attribute("src") else {
        return;
    };
    if let std::borrow::Cow::Owned(new_src) = fallback_url(&src, ext) {
        trace!(from = %src, to = %new_src, "rewriting image source");
        node.set_attribute("src", new_src);
    }
}

/// Rewrite the `src` of every image element in the document.
///
/// Queries the document afresh each call, so images inserted between passes
/// are picked up.
pub fn rewrite_image_sources(document: &Document, ext: &str) {
    for img in document.get_elements_by_tag_name("img") {
        rewrite_image_src(&img, ext);
    }
}

/// Rewrite one element's effective background to the fallback extension.
///
/// The rewritten value is written back as an inline `background-image`
/// declaration, with any quote characters inside `url(...)` preserved.
pub fn rewrite_element_background(document: &Document, node: &Node, ext: &str) {
    let Some(value) = background_image_style(document, node) else {
        return;
    };
    if let Some(rewritten) = rewrite_css_value(&value, ext) {
        trace!(from = %value, to = %rewritten, "rewriting element background");
        node.set_inline_style_property("background-image", &rewritten);
    }
}

/// Rewrite one element completely: image source and background.
pub fn rewrite_element(document: &Document, node: &Node, ext: &str) {
    if node.is_tag("img") {
        rewrite_image_src(node, ext);
    }
    rewrite_element_background(document, node, ext);
}

/// Rewrite inline background declarations on one element, if any.
fn rewrite_inline_background(node: &Node, ext: &str) {
    for property in BACKGROUND_PROPERTIES {
        let Some(value) = node.inline_style_property(property) else {
            continue;
        };
        if let Some(rewritten) = rewrite_css_value(&value, ext) {
            trace!(property, from = %value, to = %rewritten, "rewriting inline background");
            node.set_inline_style_property(property, &rewritten);
        }
    }
}

/// Rewrite `background` / `background-image` declarations in every accessible
/// stylesheet rule.
///
/// Cross-origin stylesheets whose rule access raises a security error are
/// skipped with a warning; the remaining sheets are still processed.
pub fn rewrite_stylesheets(document: &Document, ext: &str) {
    for sheet in document.stylesheets() {
        let mut rules = match sheet.rules_mut() {
            Ok(rules) => rules,
            Err(e) => {
                warn!(error = %e, "skipping inaccessible stylesheet");
                continue;
            }
        };

        for rule in rules.iter_mut() {
            for property in BACKGROUND_PROPERTIES {
                let Some(value) = rule.declaration(property).map(|d| d.value.clone()) else {
                    continue;
                };
                if let Some(rewritten) = rewrite_css_value(&value, ext) {
                    trace!(selector = %rule.selector, property, "rewriting stylesheet rule");
                    rule.set_value(property, rewritten);
                }
            }
        }
    }
}

/// One full document pass: image sources, inline backgrounds, stylesheets.
///
/// Inline backgrounds are found through the `style` attribute rather than an
/// all-elements scan. Safe to call any number of times.
pub fn run_fallback(document: &Document, ext: &str) {
    debug!(ext, "running fallback pass");

    rewrite_image_sources(document, ext);

    for node in document.elements() {
        if node.has_attribute("style") {
            rewrite_inline_background(&node, ext);
        }
    }

    rewrite_stylesheets(document, ext);
}
