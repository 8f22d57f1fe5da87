//! Page capability surface
//!
//! The traversal engine never touches ChromiumOxide directly; it consumes the
//! [`PageDriver`] trait, which covers exactly the page inspection and
//! interaction primitives the engine needs. [`CdpDriver`] implements it over
//! a live CDP page; tests implement it over canned data.

use crate::error::{Error, NavigationError, Result};
use crate::locator::{Locator, Query};
use crate::wait::poll_until;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use std::cell::RefCell;
use std::time::Duration;
use tracing::{debug, instrument};

/// Poll interval for page-ready and clickability waits
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Upper bound on a navigation commit before it is treated as failed
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Bounded wait for link candidates to render during a scan
const SCAN_TIMEOUT: Duration = Duration::from_secs(30);

/// The page primitives the traversal engine consumes.
///
/// Element handles are opaque to the engine and valid only until the page
/// re-renders; per-element operations fail with a stale-candidate error once
/// the underlying node is gone, and the engine drops such candidates from the
/// current scan.
#[allow(async_fn_in_trait)]
pub trait PageDriver {
    /// Opaque element handle
    type Element;

    /// Navigate to a URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// Navigate back one step in history
    async fn back(&self) -> Result<()>;

    /// Block until the document reports ready, bounded by `timeout`
    async fn wait_page_ready(&self, timeout: Duration) -> Result<()>;

    /// Enumerate elements matching a CSS selector, waiting briefly for the
    /// list to become non-empty. May return an empty list.
    async fn find_links(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// Trimmed visible text content of an element
    async fn element_text(&self, el: &Self::Element) -> Result<String>;

    /// A named attribute of an element, if present
    async fn element_attribute(&self, el: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Lowercase tag name of an element
    async fn element_tag(&self, el: &Self::Element) -> Result<String>;

    /// Scroll an element to the viewport center
    async fn scroll_into_view(&self, el: &Self::Element) -> Result<()>;

    /// Native interaction click
    async fn click(&self, el: &Self::Element) -> Result<()>;

    /// Script-driven forced click on the same element
    async fn script_click(&self, el: &Self::Element) -> Result<()>;

    /// Wait for an element matching `locator` to become clickable.
    ///
    /// Returns `Ok(None)` when the bounded wait elapses without a clickable
    /// match; the caller decides what kind of timeout that is.
    async fn wait_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<Self::Element>>;
}

/// [`PageDriver`] implementation over a ChromiumOxide page
pub struct CdpDriver {
    page: Page,
}

impl CdpDriver {
    /// Wrap a page in the capability surface
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// The underlying page
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Whether the document currently reports readyState == "complete".
    /// Script failures during a load are treated as not-ready.
    async fn is_ready(&self) -> bool {
        match self.page.evaluate("document.readyState").await {
            Ok(result) => matches!(
                result.into_value::<String>(),
                Ok(state) if state == "complete"
            ),
            Err(_) => false,
        }
    }

    /// Enumerate elements for a compiled query. Lookup failures while a page
    /// is mid-render are reported as "no matches", not as run errors.
    async fn query_elements(&self, query: &Query) -> Vec<Element> {
        let found = match query {
            Query::Css(selector) => self.page.find_elements(selector.as_str()).await,
            Query::XPath(expression) => self.page.find_xpaths(expression.as_str()).await,
        };
        match found {
            Ok(elements) => elements,
            Err(e) => {
                debug!("Element query produced no matches: {}", e);
                Vec::new()
            }
        }
    }

    /// Whether an element is attached, has a nonzero box, is visible, and is
    /// not disabled
    async fn is_clickable(&self, el: &Element) -> bool {
        let script = r#"function() {
            if (this.disabled) return false;
            const rect = this.getBoundingClientRect();
            if (rect.width <= 0 || rect.height <= 0) return false;
            const style = window.getComputedStyle(this);
            return style.visibility !== 'hidden' && style.display !== 'none';
        }"#;
        match el.call_js_fn(script, false).await {
            Ok(ret) => ret
                .result
                .value
                .as_ref()
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

/// Per-element CDP failures mean the node is detached or the document was
/// replaced underneath us; either way the handle is dead.
fn stale(e: chromiumoxide::error::CdpError) -> Error {
    Error::stale(e.to_string())
}

impl PageDriver for CdpDriver {
    type Element = Element;

    #[instrument(skip(self))]
    async fn goto(&self, url: &str) -> Result<()> {
        let nav = self.page.goto(url);
        tokio::time::timeout(NAVIGATION_TIMEOUT, nav)
            .await
            .map_err(|_| NavigationError::LoadFailed(format!("navigation to {url} timed out")))?
            .map_err(|e| NavigationError::LoadFailed(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn back(&self) -> Result<()> {
        self.page
            .evaluate("window.history.back()")
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;
        // Give the history navigation a moment to start before the caller
        // polls for readiness again
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn wait_page_ready(&self, timeout: Duration) -> Result<()> {
        let ready = poll_until(
            move || async move { Ok(self.is_ready().await) },
            POLL_INTERVAL,
            timeout,
        )
        .await?;
        if ready {
            Ok(())
        } else {
            Err(NavigationError::ReadyTimeout(timeout.as_secs()).into())
        }
    }

    #[instrument(skip(self))]
    async fn find_links(&self, selector: &str) -> Result<Vec<Element>> {
        let query = Query::Css(selector.to_string());
        let found: RefCell<Vec<Element>> = RefCell::new(Vec::new());

        // Wait briefly for the candidate list to render; an empty page after
        // the bounded wait is a legitimate "nothing to do" answer
        {
            let query = &query;
            let found = &found;
            poll_until(
                move || async move {
                    let elements = self.query_elements(query).await;
                    if elements.is_empty() {
                        return Ok(false);
                    }
                    *found.borrow_mut() = elements;
                    Ok(true)
                },
                POLL_INTERVAL,
                SCAN_TIMEOUT,
            )
            .await?;
        }

        let elements = found.into_inner();
        debug!("Scan found {} candidate(s) for {:?}", elements.len(), selector);
        Ok(elements)
    }

    async fn element_text(&self, el: &Element) -> Result<String> {
        let text = el.inner_text().await.map_err(stale)?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn element_attribute(&self, el: &Element, name: &str) -> Result<Option<String>> {
        el.attribute(name).await.map_err(stale)
    }

    async fn element_tag(&self, el: &Element) -> Result<String> {
        let ret = el
            .call_js_fn("function() { return this.tagName.toLowerCase(); }", false)
            .await
            .map_err(stale)?;
        Ok(ret
            .result
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string())
    }

    async fn scroll_into_view(&self, el: &Element) -> Result<()> {
        el.call_js_fn(
            "function() { this.scrollIntoView({block: 'center'}); }",
            false,
        )
        .await
        .map_err(stale)?;
        Ok(())
    }

    async fn click(&self, el: &Element) -> Result<()> {
        el.click().await.map_err(|e| Error::cdp(e.to_string()))?;
        Ok(())
    }

    async fn script_click(&self, el: &Element) -> Result<()> {
        el.call_js_fn("function() { this.click(); }", false)
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn wait_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<Element>> {
        let query = locator.to_query();
        let found: RefCell<Option<Element>> = RefCell::new(None);

        let matched = {
            let query = &query;
            let found = &found;
            poll_until(
                move || async move {
                    for el in self.query_elements(query).await {
                        if self.is_clickable(&el).await {
                            *found.borrow_mut() = Some(el);
                            return Ok(true);
                        }
                    }
                    Ok(false)
                },
                POLL_INTERVAL,
                timeout,
            )
            .await?
        };

        if matched {
            Ok(found.into_inner())
        } else {
            Ok(None)
        }
    }
}
