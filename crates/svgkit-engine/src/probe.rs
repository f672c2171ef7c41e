//! SVG capability probe.

use svgkit_dom::{Document, SVG_NAMESPACE};
use tracing::debug;

/// Probe whether the host can render SVG natively.
///
/// Mirrors the classic check: construct an SVG-namespaced element through the
/// namespace-aware constructor and test for bounding-box geometry support on
/// it. A missing constructor or geometry API means "not supported", never an
/// error. Callers memoize the result; it cannot change during a page
/// lifetime.
pub fn probe_svg_support(document: &Document) -> bool {
    let Some(svg) = document.create_element_ns(SVG_NAMESPACE, "svg") else {
        debug!("no namespaced element constructor; SVG unsupported");
        return false;
    };

    let supported = document.element_supports_bbox(&svg);
    debug!(supported, "probed SVG rendering support");
    supported
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgkit_dom::HostCapabilities;

    #[test]
    fn modern_host_supports_svg() {
        let doc = Document::new();
        assert!(probe_svg_support(&doc));
    }

    #[test]
    fn legacy_host_does_not() {
        let doc = Document::with_capabilities(HostCapabilities::legacy());
        assert!(!probe_svg_support(&doc));
    }

    #[test]
    fn namespaced_constructor_without_geometry_is_unsupported() {
        let caps = HostCapabilities {
            namespaced_elements: true,
            svg_geometry: false,
            computed_style: true,
        };
        let doc = Document::with_capabilities(caps);
        assert!(!probe_svg_support(&doc));
    }
}
