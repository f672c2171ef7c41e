//! # SvgKit Engine
//!
//! The SVG fallback engine: detects whether the host can render SVG natively
//! and, when it cannot, rewrites `.svg` image and stylesheet references to a
//! configured raster fallback extension.
//!
//! ## Design Goals
//!
//! 1. **No globals**: an engine is constructed around an injected document
//!    and configuration; multiple independent instances are fine
//! 2. **One rewrite grammar**: every surface goes through the same
//!    end-anchored, query-preserving, idempotent URL rewrite
//! 3. **Silent degradation**: missing host APIs and inaccessible stylesheets
//!    are skipped, never raised
//! 4. **Visible scheduling**: the repeat-until-complete loop is an explicit
//!    state machine, not a timer side effect
//!
//! ## Usage
//!
//! ```rust,ignore
//! use svgkit_dom::Document;
//! use svgkit_engine::{FallbackConfig, SvgFallback};
//!
//! let doc = Rc::new(Document::parse_html(html)?);
//! let engine = SvgFallback::new(doc, FallbackConfig::new("png"));
//! engine.activate().await; // inert on hosts with native SVG support
//! ```

pub mod config;
pub mod probe;
pub mod rewrite;
pub mod schedule;
pub mod walker;

pub use config::{FallbackConfig, DEFAULT_FALLBACK_EXTENSION};
pub use schedule::{FallbackScheduler, SchedulerState, Step};

use std::borrow::Cow;
use std::cell::OnceCell;
use std::rc::Rc;

use svgkit_common::SvgKitError;
use svgkit_dom::{Document, HostCapabilities, Node};
use tracing::debug;

/// A fallback engine bound to one document.
pub struct SvgFallback {
    document: Rc<Document>,
    config: FallbackConfig,
    svg_supported: OnceCell<bool>,
}

impl SvgFallback {
    /// Create an engine around an existing document.
    pub fn new(document: Rc<Document>, config: FallbackConfig) -> Self {
        Self {
            document,
            config,
            svg_supported: OnceCell::new(),
        }
    }

    /// Create an engine with the default configuration.
    pub fn with_defaults(document: Rc<Document>) -> Self {
        Self::new(document, FallbackConfig::default())
    }

    /// Parse HTML and build an engine around the resulting document.
    pub fn from_html(
        html: &str,
        capabilities: HostCapabilities,
        config: FallbackConfig,
    ) -> svgkit_common::Result<Self> {
        let document = Document::parse_html_with(html, capabilities)
            .map_err(|e| SvgKitError::dom_with_source("parsing host document", e))?;
        Ok(Self::new(Rc::new(document), config))
    }

    /// The engine's document.
    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }

    /// The engine's configuration.
    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Whether the host renders SVG natively. Probed once, then cached for
    /// the engine's lifetime.
    pub fn is_svg_supported(&self) -> bool {
        *self
            .svg_supported
            .get_or_init(|| probe::probe_svg_support(&self.document))
    }

    fn extension<'a>(&'a self, ext: Option<&'a str>) -> &'a str {
        ext.unwrap_or(&self.config.fallback_extension)
    }

    /// Rewrite a single URL with the configured (or overridden) extension.
    pub fn fallback_url<'a>(&self, url: &'a str, ext: Option<&str>) -> Cow<'a, str> {
        rewrite::fallback_url(url, self.extension(ext))
    }

    /// Rewrite the `src` of every image element.
    pub fn rewrite_image_sources(&self, ext: Option<&str>) {
        walker::rewrite_image_sources(&self.document, self.extension(ext));
    }

    /// Rewrite one element's effective background.
    pub fn rewrite_element_background(&self, node: &Node, ext: Option<&str>) {
        walker::rewrite_element_background(&self.document, node, self.extension(ext));
    }

    /// Rewrite one element completely: image source and background.
    pub fn rewrite_element(&self, node: &Node, ext: Option<&str>) {
        walker::rewrite_element(&self.document, node, self.extension(ext));
    }

    /// Rewrite background declarations in every accessible stylesheet.
    pub fn rewrite_stylesheets(&self, ext: Option<&str>) {
        walker::rewrite_stylesheets(&self.document, self.extension(ext));
    }

    /// One full document pass over all surfaces. Idempotent.
    pub fn run_fallback(&self, ext: Option<&str>) {
        walker::run_fallback(&self.document, self.extension(ext));
    }

    /// Run the fallback loop to completion.
    ///
    /// On hosts with native SVG support this returns immediately and the
    /// document is never touched. Otherwise passes repeat (with backoff)
    /// until the document reports `complete`, followed by one trailing pass
    /// after the configured settle delay.
    pub async fn activate(&self) {
        let mut scheduler = FallbackScheduler::new(&self.config);
        if !scheduler.begin(self.is_svg_supported()) {
            debug!("native SVG support; fallback engine is inert");
            return;
        }

        loop {
            match scheduler.next(self.document.ready_state()) {
                Step::Pass { next_in } => {
                    self.run_fallback(None);
                    tokio::time::sleep(next_in).await;
                }
                Step::FinalPass { after } => {
                    self.run_fallback(None);
                    tokio::time::sleep(after).await;
                    self.run_fallback(None);
                }
                Step::Done => break,
            }
        }

        debug!(passes = scheduler.passes(), "fallback loop settled");
    }
}
