//! Download settling
//!
//! The browser's own download manager writes into the configured directory;
//! completion is observed purely through the filesystem. An in-progress
//! download leaves a marker file (`.crdownload` for Chromium, `.part` for
//! Firefox-family); the directory has settled once no markers remain.

use crate::error::{Error, Result};
use crate::wait::poll_until;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fixed poll interval for the settle check
const DOWNLOAD_POLL: Duration = Duration::from_secs(1);

/// Extensions that mark an in-progress download
const MARKER_EXTENSIONS: [&str; 2] = ["crdownload", "part"];

/// Block until the directory holds no in-progress download markers.
///
/// Returns as soon as no markers exist, which cannot distinguish "download
/// finished" from "download never started", so a slow-starting download may
/// race the first check and be reported settled. Known weak point, kept as
/// observed. Markers persisting past `timeout` fail with a download-timeout
/// error. The directory is shared with the browser without locking; the 1 s
/// interval is assumed coarser than filesystem write latency.
#[instrument]
pub async fn await_downloads(dir: &Path, timeout: Duration) -> Result<()> {
    let settled = poll_until(
        move || async move { has_no_pending_markers(dir) },
        DOWNLOAD_POLL,
        timeout,
    )
    .await?;

    if settled {
        debug!("Downloads settled in {}", dir.display());
        Ok(())
    } else {
        Err(Error::DownloadTimeout {
            dir: dir.to_path_buf(),
            timeout_secs: timeout.as_secs(),
        })
    }
}

/// Whether the directory currently holds no marker files
fn has_no_pending_markers(dir: &Path) -> Result<bool> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_marker = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| MARKER_EXTENSIONS.contains(&ext));
        if is_marker {
            return Ok(false);
        }
    }
    Ok(true)
}
