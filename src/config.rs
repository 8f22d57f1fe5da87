//! Run configuration
//!
//! Configuration is a JSON file so a packaged binary can be re-pointed at a
//! different page without rebuilding. Required keys are the start URL, the
//! link-candidate selector, and the export control locator; everything else
//! has a default.

use crate::error::{ConfigError, Result};
use crate::locator::{Locator, LocatorKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default bounded-wait length in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent presented by the browser session
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36";

/// The full run configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// URL of the page holding the link list
    pub start_url: String,

    /// CSS selector enumerating the link candidates
    pub link_selector: String,

    /// Locator for the per-item export control
    pub export_button: ExportButtonSpec,

    /// Optional explicit processing order. When present, only these labels
    /// are ever selected, in this order.
    #[serde(default)]
    pub link_targets: Option<Vec<String>>,

    /// Bounded wait for document.readyState == "complete"
    #[serde(default = "default_timeout_secs")]
    pub page_ready_timeout_secs: u64,

    /// Unconditional pause after clicking a link; zero skips it. A stand-in
    /// for a real content-ready signal.
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,

    /// Bounded wait for the export control to become clickable
    #[serde(default = "default_timeout_secs")]
    pub export_timeout_secs: u64,

    /// Bounded wait for the download directory to settle; zero skips the wait
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Navigate back one step after each export
    #[serde(default)]
    pub navigate_back: bool,

    /// Directory the browser downloads into
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Browser launch options
    #[serde(default)]
    pub browser: BrowserOptions,
}

/// Export control locator as it appears in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct ExportButtonSpec {
    /// Locator kind (`"css"`, `"xpath"`, `"id"`, ...)
    #[serde(default = "default_locator_by")]
    pub by: String,
    /// Locator value
    pub value: String,
}

/// Browser launch options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    /// Run without a visible window
    pub headless: bool,
    /// Path to the Chrome/Chromium executable (auto-detect when absent)
    pub chrome_path: Option<String>,
    /// User agent override; `None` keeps [`DEFAULT_USER_AGENT`]
    pub user_agent: Option<String>,
    /// Extra request headers merged over the defaults
    pub request_headers: HashMap<String, String>,
    /// Viewport width
    pub window_width: u32,
    /// Viewport height
    pub window_height: u32,
    /// Additional Chrome arguments
    pub extra_args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: false,
            chrome_path: None,
            user_agent: None,
            request_headers: HashMap::new(),
            window_width: 1920,
            window_height: 1080,
            extra_args: Vec::new(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_settle_secs() -> u64 {
    10
}

fn default_download_timeout_secs() -> u64 {
    60
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_locator_by() -> String {
    "css".to_string()
}

impl RunConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and validate a configuration from a JSON string
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: RunConfig = serde_json::from_str(raw)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Trim target labels and drop empties; an empty list means no targets
    fn normalize(&mut self) {
        if let Some(targets) = self.link_targets.take() {
            let cleaned: Vec<String> = targets
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if !cleaned.is_empty() {
                self.link_targets = Some(cleaned);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.start_url.trim().is_empty() {
            return Err(ConfigError::MissingKey("start_url").into());
        }
        if self.link_selector.trim().is_empty() {
            return Err(ConfigError::MissingKey("link_selector").into());
        }
        if self.export_button.value.trim().is_empty() {
            return Err(ConfigError::MissingKey("export_button.value").into());
        }
        url::Url::parse(&self.start_url).map_err(|e| ConfigError::InvalidStartUrl {
            url: self.start_url.clone(),
            reason: e.to_string(),
        })?;
        // Fail on an unsupported locator kind before the browser launches
        self.export_locator()?;
        Ok(())
    }

    /// The parsed export-control locator
    pub fn export_locator(&self) -> Result<Locator> {
        let kind = LocatorKind::parse(&self.export_button.by)?;
        Ok(Locator::new(kind, self.export_button.value.clone()))
    }

    /// Normalized target list, if one was configured
    pub fn targets(&self) -> Option<&[String]> {
        self.link_targets.as_deref()
    }

    /// Page-ready wait bound
    pub fn page_ready_timeout(&self) -> Duration {
        Duration::from_secs(self.page_ready_timeout_secs)
    }

    /// Post-click settle pause
    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    /// Export-control wait bound
    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }

    /// Download-settle wait bound
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r##"{
        "start_url": "https://example.com/reports",
        "link_selector": "ul.reports a",
        "export_button": { "value": "#export" }
    }"##;

    #[test]
    fn test_minimal_config_defaults() {
        let config = RunConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.page_ready_timeout_secs, 30);
        assert_eq!(config.settle_secs, 10);
        assert_eq!(config.export_timeout_secs, 30);
        assert_eq!(config.download_timeout_secs, 60);
        assert!(!config.navigate_back);
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert!(config.targets().is_none());
        assert!(!config.browser.headless);
        assert_eq!(config.browser.window_width, 1920);
    }

    #[test]
    fn test_export_button_defaults_to_css() {
        let config = RunConfig::from_json(MINIMAL).unwrap();
        let locator = config.export_locator().unwrap();
        assert_eq!(locator.kind, LocatorKind::Css);
        assert_eq!(locator.value, "#export");
    }

    #[test]
    fn test_missing_required_key() {
        let raw = r#"{ "start_url": "https://example.com" }"#;
        let err = RunConfig::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("configuration"));
    }

    #[test]
    fn test_empty_start_url_rejected() {
        let raw = r##"{
            "start_url": "  ",
            "link_selector": "a",
            "export_button": { "value": "#export" }
        }"##;
        let err = RunConfig::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("start_url"));
    }

    #[test]
    fn test_invalid_start_url_rejected() {
        let raw = r##"{
            "start_url": "not a url",
            "link_selector": "a",
            "export_button": { "value": "#export" }
        }"##;
        let err = RunConfig::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("invalid start URL"));
    }

    #[test]
    fn test_unsupported_locator_kind_fails_at_load() {
        let raw = r#"{
            "start_url": "https://example.com",
            "link_selector": "a",
            "export_button": { "by": "magic", "value": "x" }
        }"#;
        let err = RunConfig::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("unsupported locator kind"));
    }

    #[test]
    fn test_target_normalization() {
        let raw = r##"{
            "start_url": "https://example.com",
            "link_selector": "a",
            "export_button": { "value": "#export" },
            "link_targets": ["  Report A ", "", "Report B", "   "]
        }"##;
        let config = RunConfig::from_json(raw).unwrap();
        assert_eq!(
            config.targets().unwrap(),
            &["Report A".to_string(), "Report B".to_string()]
        );
    }

    #[test]
    fn test_all_blank_targets_collapse_to_none() {
        let raw = r##"{
            "start_url": "https://example.com",
            "link_selector": "a",
            "export_button": { "value": "#export" },
            "link_targets": ["", "  "]
        }"##;
        let config = RunConfig::from_json(raw).unwrap();
        assert!(config.targets().is_none());
    }

    #[test]
    fn test_full_config_round_trip() {
        let raw = r#"{
            "start_url": "https://example.com/reports",
            "link_selector": "ul a",
            "export_button": { "by": "xpath", "value": "//button[@id='dl']" },
            "link_targets": ["A", "B"],
            "page_ready_timeout_secs": 15,
            "settle_secs": 0,
            "export_timeout_secs": 5,
            "download_timeout_secs": 120,
            "navigate_back": true,
            "download_dir": "/tmp/exports",
            "browser": {
                "headless": true,
                "user_agent": "TestBot/1.0",
                "window_width": 1280,
                "window_height": 720,
                "request_headers": { "Accept-Language": "en" },
                "extra_args": ["--disable-gpu"]
            }
        }"#;
        let config = RunConfig::from_json(raw).unwrap();
        assert_eq!(config.settle(), Duration::ZERO);
        assert_eq!(config.export_timeout(), Duration::from_secs(5));
        assert!(config.navigate_back);
        assert!(config.browser.headless);
        assert_eq!(config.browser.extra_args, vec!["--disable-gpu"]);
        let locator = config.export_locator().unwrap();
        assert_eq!(locator.kind, LocatorKind::XPath);
    }
}
