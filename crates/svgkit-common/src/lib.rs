//! # SvgKit Common
//!
//! Common utilities, error types, and logging configuration for the SvgKit
//! fallback engine.
//!
//! ## Features
//!
//! - Unified error type with category reporting
//! - Logging configuration and setup
//! - Poll backoff policy for repeated document passes
//! - Result extension traits

use thiserror::Error;

pub mod backoff;
pub mod logging;

pub use backoff::BackoffConfig;
pub use logging::{init_logging, LogConfig, LogFormat};

/// Unified error type for SvgKit.
#[derive(Error, Debug)]
pub enum SvgKitError {
    /// Document/DOM errors.
    #[error("DOM error: {message}")]
    Dom {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stylesheet/CSS errors.
    #[error("CSS error: {message}")]
    Css {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Access to a restricted resource was denied.
    #[error("Security error: {message}")]
    Security { message: String },

    /// Configuration errors.
    #[error("Config error: {message}")]
    Config { message: String },

    /// I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal error (unexpected).
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        backtrace: Option<backtrace::Backtrace>,
    },
}

impl SvgKitError {
    /// Create a DOM error.
    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom {
            message: message.into(),
            source: None,
        }
    }

    /// Create a DOM error with source.
    pub fn dom_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Dom {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a CSS error.
    pub fn css(message: impl Into<String>) -> Self {
        Self::Css {
            message: message.into(),
            source: None,
        }
    }

    /// Create a CSS error with source.
    pub fn css_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Css {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a security error.
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error with backtrace.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            backtrace: Some(backtrace::Backtrace::new()),
        }
    }

    /// Check if this error may be skipped without aborting a document pass.
    ///
    /// Security denials and malformed CSS affect only the surface that raised
    /// them; the remaining surfaces must still be processed.
    pub fn is_skippable(&self) -> bool {
        matches!(self, SvgKitError::Security { .. } | SvgKitError::Css { .. })
    }

    /// Get the error category for diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            SvgKitError::Dom { .. } => "dom",
            SvgKitError::Css { .. } => "css",
            SvgKitError::Security { .. } => "security",
            SvgKitError::Config { .. } => "config",
            SvgKitError::Io(_) => "io",
            SvgKitError::NotFound(_) => "not_found",
            SvgKitError::Internal { .. } => "internal",
        }
    }
}

/// Result type alias for SvgKit operations.
pub type Result<T> = std::result::Result<T, SvgKitError>;

/// Extension trait for Result.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| SvgKitError::Internal {
            message: format!("{}: {}", message.into(), e),
            backtrace: Some(backtrace::Backtrace::new()),
        })
    }
}

/// Extension trait for Option.
pub trait OptionExt<T> {
    /// Convert None to a NotFound error.
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SvgKitError::NotFound(resource.into()))
    }
}
