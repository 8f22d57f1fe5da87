//! Export-control locator kinds
//!
//! The export control is described in configuration as a `(kind, value)`
//! pair. Each kind compiles to either a CSS selector or an XPath expression,
//! which is what the CDP driver can actually query.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported locator kinds for the export control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Element id attribute
    Id,
    /// Element name attribute
    Name,
    /// Single class name
    ClassName,
    /// Tag name
    TagName,
    /// Exact anchor text
    LinkText,
    /// Anchor text substring
    PartialLinkText,
}

impl LocatorKind {
    /// Parse a configuration string into a kind.
    ///
    /// Accepts the same aliases the config format has always used
    /// (`"css"`/`"css_selector"`, `"class"`/`"class_name"`, ...). An unknown
    /// kind is a fatal configuration error.
    pub fn parse(raw: &str) -> Result<Self> {
        let kind = match raw.trim().to_ascii_lowercase().as_str() {
            "css" | "css_selector" => LocatorKind::Css,
            "xpath" => LocatorKind::XPath,
            "id" => LocatorKind::Id,
            "name" => LocatorKind::Name,
            "class" | "class_name" => LocatorKind::ClassName,
            "tag" | "tag_name" => LocatorKind::TagName,
            "link_text" => LocatorKind::LinkText,
            "partial_link_text" => LocatorKind::PartialLinkText,
            other => return Err(ConfigError::UnsupportedLocator(other.to_string()).into()),
        };
        Ok(kind)
    }
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocatorKind::Css => "css",
            LocatorKind::XPath => "xpath",
            LocatorKind::Id => "id",
            LocatorKind::Name => "name",
            LocatorKind::ClassName => "class_name",
            LocatorKind::TagName => "tag_name",
            LocatorKind::LinkText => "link_text",
            LocatorKind::PartialLinkText => "partial_link_text",
        };
        f.write_str(name)
    }
}

/// A `(kind, value)` pair identifying the export control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// How to interpret `value`
    pub kind: LocatorKind,
    /// Selector, expression, attribute value, or text, per `kind`
    pub value: String,
}

/// A locator compiled into something the page can be queried with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Query via `document.querySelectorAll`
    Css(String),
    /// Query via `document.evaluate`
    XPath(String),
}

impl Locator {
    /// Create a locator
    pub fn new<S: Into<String>>(kind: LocatorKind, value: S) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Compile this locator into a concrete page query.
    ///
    /// Attribute-based kinds use attribute selectors rather than `#`/`.`
    /// shorthand so values containing CSS metacharacters still match.
    pub fn to_query(&self) -> Query {
        match self.kind {
            LocatorKind::Css => Query::Css(self.value.clone()),
            LocatorKind::XPath => Query::XPath(self.value.clone()),
            LocatorKind::Id => Query::Css(format!("[id={}]", css_string(&self.value))),
            LocatorKind::Name => Query::Css(format!("[name={}]", css_string(&self.value))),
            LocatorKind::ClassName => Query::Css(format!(
                "[class~={}]",
                css_string(self.value.trim())
            )),
            LocatorKind::TagName => Query::Css(self.value.clone()),
            LocatorKind::LinkText => Query::XPath(format!(
                "//a[normalize-space(.)={}]",
                xpath_string(self.value.trim())
            )),
            LocatorKind::PartialLinkText => Query::XPath(format!(
                "//a[contains(normalize-space(.), {})]",
                xpath_string(self.value.trim())
            )),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.kind, self.value)
    }
}

/// Quote a value as a CSS attribute-selector string
fn css_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Quote a value as an XPath string literal.
///
/// XPath 1.0 has no escape sequences, so a value containing both quote kinds
/// must be assembled with `concat()`.
fn xpath_string(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(LocatorKind::parse("css").unwrap(), LocatorKind::Css);
        assert_eq!(LocatorKind::parse("css_selector").unwrap(), LocatorKind::Css);
        assert_eq!(LocatorKind::parse("XPATH").unwrap(), LocatorKind::XPath);
        assert_eq!(LocatorKind::parse("id").unwrap(), LocatorKind::Id);
        assert_eq!(LocatorKind::parse("name").unwrap(), LocatorKind::Name);
        assert_eq!(LocatorKind::parse("class").unwrap(), LocatorKind::ClassName);
        assert_eq!(
            LocatorKind::parse("class_name").unwrap(),
            LocatorKind::ClassName
        );
        assert_eq!(LocatorKind::parse("tag").unwrap(), LocatorKind::TagName);
        assert_eq!(
            LocatorKind::parse("link_text").unwrap(),
            LocatorKind::LinkText
        );
        assert_eq!(
            LocatorKind::parse("partial_link_text").unwrap(),
            LocatorKind::PartialLinkText
        );
    }

    #[test]
    fn test_parse_unknown_kind_is_config_error() {
        let err = LocatorKind::parse("magic").unwrap_err();
        assert!(err.to_string().contains("unsupported locator kind"));
    }

    #[test]
    fn test_css_kind_passes_through() {
        let q = Locator::new(LocatorKind::Css, "button.export").to_query();
        assert_eq!(q, Query::Css("button.export".to_string()));
    }

    #[test]
    fn test_id_compiles_to_attribute_selector() {
        let q = Locator::new(LocatorKind::Id, "export-btn").to_query();
        assert_eq!(q, Query::Css("[id=\"export-btn\"]".to_string()));
    }

    #[test]
    fn test_link_text_compiles_to_xpath() {
        let q = Locator::new(LocatorKind::LinkText, "Export CSV").to_query();
        assert_eq!(
            q,
            Query::XPath("//a[normalize-space(.)='Export CSV']".to_string())
        );
    }

    #[test]
    fn test_partial_link_text_compiles_to_contains() {
        let q = Locator::new(LocatorKind::PartialLinkText, "Export").to_query();
        assert_eq!(
            q,
            Query::XPath("//a[contains(normalize-space(.), 'Export')]".to_string())
        );
    }

    #[test]
    fn test_xpath_string_with_single_quote() {
        assert_eq!(xpath_string("it's"), "\"it's\"");
    }

    #[test]
    fn test_xpath_string_with_both_quotes() {
        assert_eq!(
            xpath_string("a'b\"c"),
            "concat('a', \"'\", 'b\"c')"
        );
    }

    #[test]
    fn test_locator_display() {
        let loc = Locator::new(LocatorKind::XPath, "//button");
        assert_eq!(loc.to_string(), "xpath=\"//button\"");
    }
}
