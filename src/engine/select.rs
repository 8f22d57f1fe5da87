//! Next-link selection
//!
//! Selection runs in two layers: [`resolve_candidates`] turns raw element
//! handles into `(element, label)` pairs through the driver, and
//! [`pick_next`] is the pure policy over that list. Keeping the policy pure
//! lets the ordering rules be tested without a session.

use crate::browser::PageDriver;
use crate::engine::label::extract_label;
use std::collections::HashSet;
use tracing::debug;

/// Extract labels for all candidates.
///
/// Candidates whose extraction fails are dropped from this call only; a
/// re-render may bring them back with valid handles on the next scan.
pub async fn resolve_candidates<D: PageDriver>(
    driver: &D,
    candidates: Vec<D::Element>,
) -> Vec<(D::Element, String)> {
    let mut available = Vec::with_capacity(candidates.len());
    for el in candidates {
        match extract_label(driver, &el).await {
            Ok(label) => available.push((el, label)),
            Err(e) => debug!("Dropping candidate from this scan: {}", e),
        }
    }
    available
}

/// Pick the next link to process, returning its index into `available`, or
/// `None` when none remain.
///
/// With a target list, targets are scanned in order and the first unvisited
/// one is looked up among the candidates in discovery order; an unvisited
/// target with no matching candidate ends selection rather than falling
/// through to later targets, so a target whose element has not rendered yet
/// stalls selection until a rescan produces it. Without targets, the first
/// unvisited candidate in discovery order wins.
///
/// Two elements rendering the same label are one logical link here: once the
/// label is visited, every element carrying it is skipped.
pub fn pick_next<E>(
    available: &[(E, String)],
    visited: &HashSet<String>,
    targets: Option<&[String]>,
) -> Option<usize> {
    if available.is_empty() {
        return None;
    }

    if let Some(targets) = targets.filter(|t| !t.is_empty()) {
        let target = targets.iter().find(|t| !visited.contains(*t))?;
        return available.iter().position(|(_, label)| label == target);
    }

    available
        .iter()
        .position(|(_, label)| !visited.contains(label))
}
