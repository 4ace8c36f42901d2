use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub disable_images: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            user_agent: None,
            disable_images: false,
        }
    }
}

/// Everything the suite is parameterized on. All wait tuning is explicit
/// here rather than hard-coded at the call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub browser: BrowserConfig,
    pub home_url: String,
    /// Exact title of the image-feed page for the configured locale.
    pub expected_feed_title: String,
    pub keywords_path: PathBuf,
    /// Lower bound on the "other images" thumbnail count.
    pub min_image_count: usize,
    pub scroll_rounds: usize,
    pub wait_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl SuiteConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            home_url: "https://www.bing.com/".to_string(),
            expected_feed_title: "Лента изображений Bing".to_string(),
            keywords_path: PathBuf::from("data/keywords.txt"),
            min_image_count: 25,
            scroll_rounds: 3,
            wait_timeout_ms: 10_000,
            poll_interval_ms: 250,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_bing_flow() {
        let config = SuiteConfig::default();
        assert_eq!(config.home_url, "https://www.bing.com/");
        assert_eq!(config.scroll_rounds, 3);
        assert!(config.browser.headless);
        assert_eq!(config.wait_timeout(), Duration::from_secs(10));
    }
}
