//! Bounded polling primitive
//!
//! Every wait in the engine (page ready, export control clickable, download
//! settle) is the same shape: evaluate a predicate, sleep a fixed interval,
//! give up at a deadline. This module provides that shape once.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Poll `check` until it returns `Ok(true)` or `timeout` elapses.
///
/// Returns `Ok(true)` when the predicate was satisfied, `Ok(false)` when the
/// deadline passed first; callers map `false` to their own timeout error. The
/// predicate runs once immediately, so an already-satisfied condition never
/// sleeps. Predicate errors propagate and end the wait.
pub async fn poll_until<F, Fut>(mut check: F, interval: Duration, timeout: Duration) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check().await? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(interval).await;
    }
}
