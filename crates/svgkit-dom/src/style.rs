//! Stylesheet list and computed-style lookup.
//!
//! Mirrors the CSSOM surfaces the fallback engine rewrites: a document-ordered
//! stylesheet list whose rule access is origin-gated, and a computed-property
//! lookup over simple selectors.

use std::cell::{Ref, RefCell, RefMut};
use svgkit_cssparser::{ParsedStylesheet, StyleRule};

use crate::{Document, DomError, Node};

/// Origin of a stylesheet relative to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylesheetOrigin {
    /// Same-origin: rules are readable and writable.
    SameOrigin,
    /// Cross-origin: rule access raises a security error.
    CrossOrigin,
}

/// A stylesheet attached to a document.
///
/// Rule access goes through [`Stylesheet::rules`] / [`Stylesheet::rules_mut`],
/// which enforce the origin check the way `CSSStyleSheet.cssRules` does.
pub struct Stylesheet {
    href: Option<String>,
    origin: StylesheetOrigin,
    rules: RefCell<Vec<StyleRule>>,
}

impl Stylesheet {
    /// A stylesheet from a `<style>` element (always same-origin).
    pub fn inline(parsed: ParsedStylesheet) -> Self {
        Self {
            href: None,
            origin: StylesheetOrigin::SameOrigin,
            rules: RefCell::new(parsed.rules),
        }
    }

    /// A stylesheet loaded from a URL.
    pub fn linked(
        href: impl Into<String>,
        origin: StylesheetOrigin,
        parsed: ParsedStylesheet,
    ) -> Self {
        Self {
            href: Some(href.into()),
            origin,
            rules: RefCell::new(parsed.rules),
        }
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn origin(&self) -> StylesheetOrigin {
        self.origin
    }

    fn check_access(&self) -> Result<(), DomError> {
        match self.origin {
            StylesheetOrigin::SameOrigin => Ok(()),
            StylesheetOrigin::CrossOrigin => Err(DomError::Security(format!(
                "cannot access rules of cross-origin stylesheet {}",
                self.href.as_deref().unwrap_or("(inline)")
            ))),
        }
    }

    /// Read the rule list. Fails for cross-origin sheets.
    pub fn rules(&self) -> Result<Ref<'_, Vec<StyleRule>>, DomError> {
        self.check_access()?;
        Ok(self.rules.borrow())
    }

    /// Mutably access the rule list. Fails for cross-origin sheets.
    pub fn rules_mut(&self) -> Result<RefMut<'_, Vec<StyleRule>>, DomError> {
        self.check_access()?;
        Ok(self.rules.borrow_mut())
    }
}

/// Match a node against a simple selector: `tag`, `#id`, `.class`, or `*`.
pub fn selector_matches(node: &Node, selector: &str) -> bool {
    let selector = selector.trim();
    if !node.is_element() {
        return false;
    }

    if selector == "*" {
        true
    } else if let Some(id) = selector.strip_prefix('#') {
        node.get_attribute("id").as_deref() == Some(id)
    } else if let Some(class) = selector.strip_prefix('.') {
        node.get_attribute("class")
            .map(|c| c.split_whitespace().any(|cls| cls == class))
            .unwrap_or(false)
    } else {
        node.is_tag(selector)
    }
}

impl Document {
    /// Resolve a property the way a computed-style accessor would: stylesheet
    /// rules in document order (later matches win), inline style last.
    ///
    /// Returns `None` when the host exposes no computed-style accessor, or
    /// when nothing matches. Inaccessible stylesheets are silently skipped;
    /// that surface cannot be read on this host.
    pub fn computed_property(&self, node: &Node, property: &str) -> Option<String> {
        if !self.capabilities().computed_style {
            return None;
        }

        let mut result = None;
        for sheet in self.stylesheets() {
            let rules = match sheet.rules() {
                Ok(rules) => rules,
                Err(_) => continue,
            };
            for rule in rules.iter() {
                if selector_matches(node, &rule.selector) {
                    if let Some(decl) = rule.declaration(property) {
                        result = Some(decl.value.clone());
                    }
                }
            }
        }

        if let Some(inline) = node.inline_style_property(property) {
            result = Some(inline);
        }

        result
    }
}
