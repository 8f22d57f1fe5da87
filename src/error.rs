//! Error types for the export walker
//!
//! This module provides the error hierarchy for the traversal engine using
//! `thiserror`. The split matters to the traversal loop: `StaleCandidate` is
//! the only recoverable variant (the candidate is dropped from the current
//! scan), everything else aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for export walker operations
#[derive(Error, Debug)]
pub enum Error {
    /// An element handle was invalidated before it could be inspected.
    /// Recoverable: the candidate is dropped from the current scan.
    #[error("stale candidate: {0}")]
    StaleCandidate(String),

    /// Both the native click and the script-click fallback failed
    #[error("interaction failed for {label:?}: {reason}")]
    Interaction {
        /// Label of the link being clicked
        label: String,
        /// Underlying failure from the last attempt
        reason: String,
    },

    /// The export control never became clickable within the bounded wait
    #[error("export control not clickable within {timeout_secs}s for {label:?}")]
    ExportTimeout {
        /// Label of the link whose export timed out
        label: String,
        /// Configured wait in seconds
        timeout_secs: u64,
    },

    /// In-progress download markers persisted past the bounded wait
    #[error("downloads did not settle within {timeout_secs}s in {dir:?}")]
    DownloadTimeout {
        /// Directory that was polled
        dir: PathBuf,
        /// Configured wait in seconds
        timeout_secs: u64,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Browser lifecycle errors
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file is absent
    #[error("configuration file not found at {0:?}; copy the example config to create it")]
    NotFound(PathBuf),

    /// A required key is absent or empty
    #[error("missing configuration key: {0}")]
    MissingKey(&'static str),

    /// Start URL failed validation
    #[error("invalid start URL {url:?}: {reason}")]
    InvalidStartUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Unsupported export-control locator kind. A configuration error, not a
    /// runtime condition; surfaced before the browser launches.
    #[error("unsupported locator kind: {0:?}")]
    UnsupportedLocator(String),

    /// Config file could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("failed to create page: {0}")]
    PageCreationFailed(String),
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Page load failed
    #[error("page load failed: {0}")]
    LoadFailed(String),

    /// Page never reported document.readyState == "complete"
    #[error("page not ready after {0}s")]
    ReadyTimeout(u64),
}

/// Result type alias for export walker operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Create a stale-candidate error from a string
    pub fn stale<S: Into<String>>(msg: S) -> Self {
        Error::StaleCandidate(msg.into())
    }

    /// Whether this error is recoverable by dropping the current candidate
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleCandidate(_))
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}
