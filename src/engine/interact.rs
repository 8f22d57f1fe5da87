//! Link clicking and export triggering
//!
//! The click is a two-step ordered attempt: scroll to center, native click,
//! and only if the native interaction fails, a script-driven click on the
//! same element. The script click's outcome is final. The export trigger is
//! stricter: once the control reports clickable it gets one direct click,
//! no scroll and no fallback.

use crate::browser::PageDriver;
use crate::error::{Error, Result};
use crate::locator::Locator;
use std::time::Duration;
use tracing::{debug, info};

/// Click a selected link, falling back to a script click.
///
/// Ordinary interaction failures never escape this boundary; only the
/// fallback also failing (the element vanished entirely) is fatal.
pub async fn click_link<D: PageDriver>(driver: &D, el: &D::Element, label: &str) -> Result<()> {
    driver.scroll_into_view(el).await?;

    if let Err(native_err) = driver.click(el).await {
        debug!(
            "Native click failed for {:?} ({}); falling back to script click",
            label, native_err
        );
        driver
            .script_click(el)
            .await
            .map_err(|e| Error::Interaction {
                label: label.to_string(),
                reason: e.to_string(),
            })?;
    }

    Ok(())
}

/// Wait for the export control to become clickable and activate it.
///
/// A control that never becomes clickable within `timeout` is fatal; there
/// is no automatic retry. Once clickable the control is assumed reliably
/// interactive, so the click is direct.
pub async fn trigger_export<D: PageDriver>(
    driver: &D,
    locator: &Locator,
    timeout: Duration,
    label: &str,
) -> Result<()> {
    info!("Waiting for export control ({}) on {:?}", locator, label);

    let control = driver
        .wait_clickable(locator, timeout)
        .await?
        .ok_or_else(|| Error::ExportTimeout {
            label: label.to_string(),
            timeout_secs: timeout.as_secs(),
        })?;

    driver.click(&control).await?;
    info!("Export triggered for {:?}", label);
    Ok(())
}
