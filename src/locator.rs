use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque selector resolving zero or more elements in the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locator {
    Id(String),
    ClassName(String),
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Locator::ClassName(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    /// The equivalent CSS selector, when one exists.
    pub fn as_css(&self) -> Option<String> {
        match self {
            Locator::Id(value) => Some(format!("#{}", value)),
            Locator::ClassName(value) => Some(format!(".{}", value)),
            Locator::Css(value) => Some(value.clone()),
            Locator::XPath(_) => None,
        }
    }

    /// JavaScript expression evaluating to the first matching element or null.
    pub fn resolve_js(&self) -> String {
        match self.as_css() {
            Some(css) => format!(
                "document.querySelector('{}')",
                css.replace('\'', "\\'")
            ),
            None => {
                let Locator::XPath(xpath) = self else {
                    unreachable!("non-css locators are xpath");
                };
                format!(
                    "document.evaluate('{}', document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                    xpath.replace('\'', "\\'")
                )
            }
        }
    }

    /// JavaScript expression evaluating to the number of matching elements.
    pub fn count_js(&self) -> String {
        match self.as_css() {
            Some(css) => format!(
                "document.querySelectorAll('{}').length",
                css.replace('\'', "\\'")
            ),
            None => {
                let Locator::XPath(xpath) = self else {
                    unreachable!("non-css locators are xpath");
                };
                format!(
                    "document.evaluate('{}', document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
                    xpath.replace('\'', "\\'")
                )
            }
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::XPath(xpath) => write!(f, "{}", xpath),
            other => write!(f, "{}", other.as_css().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_and_class_convert_to_css() {
        assert_eq!(Locator::id("scpl1").as_css().as_deref(), Some("#scpl1"));
        assert_eq!(
            Locator::class_name("b_searchbox").as_css().as_deref(),
            Some(".b_searchbox")
        );
        assert!(Locator::xpath("//img").as_css().is_none());
    }

    #[test]
    fn css_locators_count_with_query_selector_all() {
        let js = Locator::class_name("mimg").count_js();
        assert_eq!(js, "document.querySelectorAll('.mimg').length");
    }

    #[test]
    fn xpath_locators_count_with_snapshot_length() {
        let js = Locator::xpath("//div[@id='dg_c']//img").count_js();
        assert!(js.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
        assert!(js.contains("snapshotLength"));
        // embedded quotes must be escaped for the surrounding JS literal
        assert!(js.contains("\\'dg_c\\'"));
    }

    #[test]
    fn resolver_targets_first_match() {
        let js = Locator::id("scpl1").resolve_js();
        assert_eq!(js, "document.querySelector('#scpl1')");
        let js = Locator::xpath("//span").resolve_js();
        assert!(js.contains("FIRST_ORDERED_NODE_TYPE"));
        assert!(js.contains("singleNodeValue"));
    }
}
