//! # SvgKit Test
//!
//! Scenario test suite for the SvgKit fallback engine.
//!
//! ## Test Types
//!
//! 1. **Rewrite scenarios**: the URL rewrite grammar's observable properties
//! 2. **Surface scenarios**: image, inline-style, and stylesheet passes over
//!    parsed documents
//! 3. **Security scenarios**: cross-origin stylesheet handling
//! 4. **Scheduling scenarios**: activation, polling, and settling

use std::rc::Rc;

use svgkit_cssparser::parse_stylesheet;
use svgkit_dom::{Document, HostCapabilities, Stylesheet, StylesheetOrigin};
use svgkit_engine::{FallbackConfig, SvgFallback};

#[cfg(test)]
mod rewrite;
#[cfg(test)]
mod schedule;
#[cfg(test)]
mod security;
#[cfg(test)]
mod surfaces;

/// Build an engine over `html` for a legacy (SVG-less) host.
pub fn legacy_engine(html: &str) -> SvgFallback {
    SvgFallback::from_html(html, HostCapabilities::legacy(), FallbackConfig::default())
        .expect("test document should parse")
}

/// Build an engine over `html` for a modern host.
pub fn modern_engine(html: &str) -> SvgFallback {
    SvgFallback::from_html(html, HostCapabilities::modern(), FallbackConfig::default())
        .expect("test document should parse")
}

/// Attach a same-origin stylesheet parsed from `css`.
pub fn attach_same_origin_sheet(document: &Document, css: &str) {
    let parsed = parse_stylesheet(css).expect("test css should parse");
    document.add_stylesheet(Rc::new(Stylesheet::inline(parsed)));
}

/// Attach a cross-origin stylesheet parsed from `css`; its rules will be
/// inaccessible to the engine.
pub fn attach_cross_origin_sheet(document: &Document, href: &str, css: &str) {
    let parsed = parse_stylesheet(css).expect("test css should parse");
    document.add_stylesheet(Rc::new(Stylesheet::linked(
        href,
        StylesheetOrigin::CrossOrigin,
        parsed,
    )));
}
