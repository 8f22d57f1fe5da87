//! Label derivation
//!
//! Every candidate gets a stable identifying string for dedup and targeting.
//! The fallback chain, first non-empty wins: visible text, the `href`
//! attribute, the `data-id` attribute, and finally a synthesized
//! `{tag}-{token}` where the token is unique for the process lifetime.

use crate::browser::PageDriver;
use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the synthesized-fallback uniqueness token
static NEXT_FALLBACK_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Derive the label for a candidate element.
///
/// Fails with a stale-candidate error when the element handle has been
/// invalidated; callers skip the candidate rather than failing the run.
pub async fn extract_label<D: PageDriver>(driver: &D, el: &D::Element) -> Result<String> {
    let text = driver.element_text(el).await?;
    let href = driver.element_attribute(el, "href").await?;
    let data_id = driver.element_attribute(el, "data-id").await?;
    let tag = driver.element_tag(el).await?;
    Ok(compose_label(&text, href.as_deref(), data_id.as_deref(), &tag))
}

/// Pure fallback chain over the already-gathered signals
fn compose_label(text: &str, href: Option<&str>, data_id: Option<&str>, tag: &str) -> String {
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    if let Some(href) = href.filter(|h| !h.is_empty()) {
        return href.to_string();
    }
    if let Some(data_id) = data_id.filter(|d| !d.is_empty()) {
        return data_id.to_string();
    }
    let tag = if tag.is_empty() { "link" } else { tag };
    let token = NEXT_FALLBACK_TOKEN.fetch_add(1, Ordering::Relaxed);
    format!("{tag}-{token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_takes_priority_over_href() {
        let label = compose_label("Report Q1", Some("/item/7"), None, "a");
        assert_eq!(label, "Report Q1");
    }

    #[test]
    fn test_empty_text_falls_back_to_href() {
        let label = compose_label("", Some("/item/7"), None, "a");
        assert_eq!(label, "/item/7");
    }

    #[test]
    fn test_whitespace_text_falls_back_to_href() {
        let label = compose_label("   \n ", Some("/item/7"), None, "a");
        assert_eq!(label, "/item/7");
    }

    #[test]
    fn test_data_id_fallback() {
        let label = compose_label("", None, Some("row-42"), "a");
        assert_eq!(label, "row-42");
    }

    #[test]
    fn test_empty_href_is_skipped() {
        let label = compose_label("", Some(""), Some("row-42"), "a");
        assert_eq!(label, "row-42");
    }

    #[test]
    fn test_synthesized_fallback_uses_tag_and_is_unique() {
        let first = compose_label("", None, None, "a");
        let second = compose_label("", None, None, "a");
        assert!(first.starts_with("a-"));
        assert!(second.starts_with("a-"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_synthesized_fallback_without_tag() {
        let label = compose_label("", None, None, "");
        assert!(label.starts_with("link-"));
    }
}
