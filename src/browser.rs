use crate::errors::{Result, SuiteError};
use crate::locator::Locator;
use crate::types::BrowserConfig;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use tracing::debug;

/// Exclusive handle on one live Chrome tab. The session only queries and
/// commands the page; all waiting is done by the caller through the poller.
pub struct BrowserSession {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserSession {
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        // Keep the argument strings alive for the launch call
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );
        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];
        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }
        if config.disable_images {
            args.push(OsStr::new("--blink-settings=imagesEnabled=false"));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .args(args)
            .build()
            .map_err(|e| SuiteError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| SuiteError::LaunchFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| SuiteError::LaunchFailed(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!(url, "navigate");
        self.tab
            .navigate_to(url)
            .map_err(|e| SuiteError::NavigationFailed(e.to_string()))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| SuiteError::NavigationFailed(e.to_string()))?;
        Ok(())
    }

    pub async fn page_title(&self) -> Result<String> {
        let value = self.eval("document.title")?;
        Ok(value
            .as_str()
            .map(|title| title.to_string())
            .unwrap_or_default())
    }

    /// True once `document.readyState` reports a fully loaded page.
    pub async fn document_ready(&self) -> Result<bool> {
        let value = self.eval("document.readyState === 'complete'")?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub async fn count_elements(&self, locator: &Locator) -> Result<usize> {
        let value = self.eval(&locator.count_js())?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    pub async fn click(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "click");
        self.find(locator)?
            .click()
            .map_err(|e| SuiteError::JavaScriptFailed(e.to_string()))?;
        Ok(())
    }

    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        debug!(%locator, text, "type text");
        let element = self.find(locator)?;
        element
            .click()
            .map_err(|e| SuiteError::JavaScriptFailed(e.to_string()))?;
        element
            .type_into(text)
            .map_err(|e| SuiteError::JavaScriptFailed(e.to_string()))?;
        Ok(())
    }

    /// Moves pointer focus onto the element, once. The resulting page state
    /// is observed separately by the caller.
    pub async fn hover(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "hover");
        self.find(locator)?
            .move_mouse_over()
            .map_err(|e| SuiteError::JavaScriptFailed(e.to_string()))?;
        Ok(())
    }

    pub async fn input_value(&self, locator: &Locator) -> Result<String> {
        let script = format!(
            r#"
            (function() {{
                const element = {};
                return element ? element.value : null;
            }})()
            "#,
            locator.resolve_js()
        );
        let value = self.eval(&script)?;
        value
            .as_str()
            .map(|v| v.to_string())
            .ok_or_else(|| SuiteError::ElementNotFound(locator.to_string()))
    }

    pub async fn clear_input(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "clear input");
        let script = format!(
            r#"
            (function() {{
                const element = {};
                if (element) {{
                    element.value = '';
                    element.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    element.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return true;
                }}
                return false;
            }})()
            "#,
            locator.resolve_js()
        );
        let value = self.eval(&script)?;
        if value.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(SuiteError::ElementNotFound(locator.to_string()))
        }
    }

    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let script = format!(
            r#"
            (function() {{
                const element = {};
                if (!element) return false;

                const rect = element.getBoundingClientRect();
                const style = window.getComputedStyle(element);

                return rect.width > 0 &&
                       rect.height > 0 &&
                       style.visibility !== 'hidden' &&
                       style.display !== 'none' &&
                       parseFloat(style.opacity) > 0;
            }})()
            "#,
            locator.resolve_js()
        );
        let value = self.eval(&script)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub async fn scroll_to_bottom(&self) -> Result<()> {
        debug!("scroll to the bottom of the page");
        self.eval("window.scrollTo(0, document.body.scrollHeight)")?;
        Ok(())
    }

    pub async fn scroll_to_top(&self) -> Result<()> {
        debug!("scroll to the top of the page");
        self.eval("window.scrollTo(0, 0)")?;
        Ok(())
    }

    fn find(&self, locator: &Locator) -> Result<Element<'_>> {
        let found = match locator.as_css() {
            Some(css) => self.tab.find_element(&css),
            None => {
                let Locator::XPath(xpath) = locator else {
                    unreachable!("non-css locators are xpath");
                };
                self.tab.find_element_by_xpath(xpath)
            }
        };
        found.map_err(|e| SuiteError::ElementNotFound(format!("{}: {}", locator, e)))
    }

    fn eval(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| SuiteError::JavaScriptFailed(e.to_string()))?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a local Chrome install and network access"]
    async fn launches_navigates_and_queries() {
        let session = BrowserSession::new(&BrowserConfig::default()).await.unwrap();
        session.navigate("https://example.com").await.unwrap();

        let title = session.page_title().await.unwrap();
        assert!(!title.is_empty());

        let links = session
            .count_elements(&Locator::css("a"))
            .await
            .unwrap();
        assert!(links >= 1);

        let heading_visible = session
            .is_visible(&Locator::css("h1"))
            .await
            .unwrap();
        assert!(heading_visible);
    }

    #[tokio::test]
    #[ignore = "requires a local Chrome install and network access"]
    async fn missing_elements_are_reported_not_hung() {
        let session = BrowserSession::new(&BrowserConfig::default()).await.unwrap();
        session.navigate("https://example.com").await.unwrap();

        let count = session
            .count_elements(&Locator::id("definitely-not-present"))
            .await
            .unwrap();
        assert_eq!(count, 0);

        let err = session
            .input_value(&Locator::id("definitely-not-present"))
            .await
            .unwrap_err();
        assert!(matches!(err, SuiteError::ElementNotFound(_)));
    }
}
