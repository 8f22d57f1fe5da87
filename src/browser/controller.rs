//! Browser lifecycle management
//!
//! This module handles browser launch and shutdown, points the session's
//! download manager at the configured directory, and registers the default
//! request headers on the page.

use crate::config::{BrowserOptions, DEFAULT_USER_AGENT};
use crate::error::{BrowserError, Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::network;
use chromiumoxide::Page;
use futures::StreamExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Request headers applied to every page unless overridden in config
const DEFAULT_REQUEST_HEADERS: [(&str, &str); 5] = [
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,\
         image/avif,image/webp,image/apng,*/*;q=0.8,\
         application/signed-exchange;v=b3;q=0.7",
    ),
    ("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8"),
    ("Cache-Control", "no-cache"),
    ("Pragma", "no-cache"),
    ("Upgrade-Insecure-Requests", "1"),
];

/// High-level browser controller
///
/// Owns the browser process and its event-handler task. The caller is
/// responsible for calling [`close`](Self::close) on every exit path.
pub struct BrowserController {
    browser: Browser,
    handler: JoinHandle<()>,
    options: BrowserOptions,
    download_dir: PathBuf,
}

impl BrowserController {
    /// Launch a browser session configured for unattended downloads.
    ///
    /// Creates `download_dir` if it does not exist.
    #[instrument(skip(options))]
    pub async fn launch(options: BrowserOptions, download_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(download_dir)?;
        debug!("Downloads will be saved to: {}", download_dir.display());

        let mut builder = CdpBrowserConfig::builder();

        builder = builder.viewport(chromiumoxide::handler::viewport::Viewport {
            width: options.window_width,
            height: options.window_height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        });

        // ChromiumOxide defaults to headless; ask for a window otherwise
        if !options.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = options.chrome_path {
            builder = builder.chrome_executable(path);
        }

        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        builder = builder
            .arg(format!("--user-agent={}", user_agent))
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");

        for arg in &options.extra_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| BrowserError::ConfigError(e.to_string()))?;

        info!("Launching browser (headless={})", options.headless);
        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    warn!("Browser handler event error");
                    break;
                }
            }
            debug!("Browser handler finished");
        });

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            handler: handler_task,
            options,
            download_dir: download_dir.to_path_buf(),
        })
    }

    /// Open the page the traversal will run on.
    ///
    /// The page is created blank; navigation to the start URL is the
    /// engine's first step. Download routing and request headers are
    /// registered before the page is handed out.
    #[instrument(skip(self))]
    pub async fn start_page(&self) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        self.allow_downloads(&page).await?;
        self.apply_request_headers(&page).await;

        debug!("Created start page");
        Ok(page)
    }

    /// Route downloads into the configured directory
    async fn allow_downloads(&self, page: &Page) -> Result<()> {
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(self.download_dir.to_string_lossy().to_string())
            .build()
            .map_err(Error::cdp)?;

        page.execute(params).await?;
        Ok(())
    }

    /// Register the default request headers merged with any configured
    /// extras. Header failures are logged and ignored; the run can proceed
    /// without them.
    async fn apply_request_headers(&self, page: &Page) {
        let mut headers: HashMap<String, String> = DEFAULT_REQUEST_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let user_agent = self
            .options
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        headers.insert("User-Agent".to_string(), user_agent);
        headers.extend(self.options.request_headers.clone());

        let result = async {
            page.execute(network::EnableParams::default()).await?;
            let value = serde_json::to_value(&headers)?;
            page.execute(network::SetExtraHttpHeadersParams::new(
                network::Headers::new(value),
            ))
            .await?;
            Ok::<_, Error>(())
        }
        .await;

        match result {
            Ok(()) => debug!("Applied custom request headers to browser session"),
            Err(e) => warn!("Failed to configure extra request headers: {}", e),
        }
    }

    /// The directory the session downloads into
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Close the browser and join the handler task.
    ///
    /// Must run on every exit path, success or fatal error.
    #[instrument(skip(self))]
    pub async fn close(mut self) -> Result<()> {
        info!("Closing browser");

        self.browser
            .close()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        let _ = tokio::time::timeout(Duration::from_secs(5), self.handler).await;

        info!("Browser closed");
        Ok(())
    }
}
