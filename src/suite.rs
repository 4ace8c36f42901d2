use crate::browser::BrowserSession;
use crate::data::load_keywords;
use crate::errors::{Result, SuiteError};
use crate::locator::Locator;
use crate::poll::Poller;
use crate::report::{StepLog, StepOutcome, SuiteReport};
use crate::types::SuiteConfig;

/// Locators for the pieces of Bing's image-search DOM the suite touches.
pub(crate) mod locators {
    use crate::locator::Locator;

    pub fn images_link() -> Locator {
        Locator::id("scpl1")
    }

    pub fn feed_thumbnails() -> Locator {
        Locator::xpath("//div[@class='img_cont hoff']/img")
    }

    pub fn search_box() -> Locator {
        Locator::class_name("b_searchbox")
    }

    pub fn search_submit() -> Locator {
        Locator::class_name("b_searchboxSubmit")
    }

    pub fn result_images() -> Locator {
        Locator::xpath("//div[@id='dg_c']//img")
    }

    pub fn enlarged_preview() -> Locator {
        Locator::class_name("irhc")
    }

    pub fn add_to_collection() -> Locator {
        Locator::xpath("//span//*[@class='fav_active active_line']")
    }

    pub fn search_by_image_icon() -> Locator {
        Locator::xpath("//span[@class='irhcsb']/img[1]")
    }

    pub fn adult_marker_icon() -> Locator {
        Locator::xpath("//span[@class='irhcsb']/img[2]")
    }

    pub fn slideshow_main_image() -> Locator {
        Locator::xpath("//img[@class='mainImage accessible nofocus']")
    }

    pub fn other_images_expander() -> Locator {
        Locator::xpath("//div[@class='expandButton clickable active']/span")
    }

    pub fn matched_thumbnails() -> Locator {
        Locator::class_name("mimg")
    }
}

/// The image-search flow as an explicit linear pipeline of named steps.
/// Each step requires every earlier step to have passed; the first failure
/// marks all remaining steps as skipped. There are no retries.
pub struct ImageSearchSuite {
    session: BrowserSession,
    poller: Poller,
    config: SuiteConfig,
    log: StepLog,
}

fn step_outcome(chain_ok: &mut bool, result: Result<()>) -> StepOutcome {
    match result {
        Ok(()) => StepOutcome::Passed,
        Err(err) => {
            *chain_ok = false;
            StepOutcome::Failed(err.to_string())
        }
    }
}

impl ImageSearchSuite {
    pub async fn new(config: SuiteConfig) -> Result<Self> {
        let session = BrowserSession::new(&config.browser).await?;
        let poller = Poller::new(config.wait_timeout(), config.poll_interval());
        Ok(Self {
            session,
            poller,
            config,
            log: StepLog::new(),
        })
    }

    /// Runs the whole pipeline and returns the per-step report. A keyword
    /// file that cannot be read aborts the run before any browser step.
    pub async fn run(&mut self) -> SuiteReport {
        let mut report = SuiteReport::new();

        let keywords = match load_keywords(&self.config.keywords_path) {
            Ok(keywords) => keywords,
            Err(err) => {
                report.record("load keyword file", StepOutcome::Failed(err.to_string()));
                report.log = std::mem::take(&mut self.log).into_entries();
                return report;
            }
        };

        let mut chain_ok = true;

        let outcome = if chain_ok {
            step_outcome(&mut chain_ok, self.open_image_feed().await)
        } else {
            StepOutcome::Skipped
        };
        report.record("open image feed", outcome);

        let outcome = if chain_ok {
            step_outcome(&mut chain_ok, self.verify_lazy_loading().await)
        } else {
            StepOutcome::Skipped
        };
        report.record("lazy-load scroll", outcome);

        for keyword in &keywords {
            let outcome = if chain_ok {
                step_outcome(&mut chain_ok, self.search_keyword(keyword).await)
            } else {
                StepOutcome::Skipped
            };
            report.record(format!("keyword search [{keyword}]"), outcome);
        }

        let outcome = if chain_ok {
            step_outcome(&mut chain_ok, self.verify_match_count().await)
        } else {
            StepOutcome::Skipped
        };
        report.record("reverse-image match count", outcome);

        report.log = std::mem::take(&mut self.log).into_entries();
        report
    }

    /// Opens the homepage, follows the images link and checks the feed title.
    async fn open_image_feed(&mut self) -> Result<()> {
        self.log.log("open main page");
        self.session.navigate(&self.config.home_url).await?;

        let images_link = locators::images_link();
        self.wait_for_presence("the images section link", &images_link)
            .await?;

        self.log.log("click the images link");
        self.session.click(&images_link).await?;
        self.wait_for_ready().await?;

        let title = self.session.page_title().await?;
        self.log.log(format!("page title is '{title}'"));
        if title != self.config.expected_feed_title {
            return Err(SuiteError::AssertionFailed(format!(
                "unexpected page title '{}', expected '{}'",
                title, self.config.expected_feed_title
            )));
        }
        Ok(())
    }

    /// Scrolls to the bottom repeatedly and checks that each scroll loads
    /// strictly more thumbnails than were present before it.
    async fn verify_lazy_loading(&mut self) -> Result<()> {
        self.log.log("check lazy-loading while scrolling");
        let thumbnails = locators::feed_thumbnails();

        for round in 0..self.config.scroll_rounds {
            let before = self.session.count_elements(&thumbnails).await?;

            self.log.log("scroll to the bottom of the page");
            self.session.scroll_to_bottom().await?;

            let session = &self.session;
            let loc = &thumbnails;
            self.poller
                .wait_until("new thumbnails to load", || async move {
                    Ok(session.count_elements(loc).await? > before)
                })
                .await?;

            let after = self.session.count_elements(&thumbnails).await?;
            self.log.log(format!(
                "round {}: thumbnail count grew from {} to {}",
                round + 1,
                before,
                after
            ));
            if after <= before {
                return Err(SuiteError::AssertionFailed(format!(
                    "no new thumbnails loaded (before {}, after {})",
                    before, after
                )));
            }
        }

        self.log.log("scroll back to the top of the page");
        self.session.scroll_to_top().await?;
        Ok(())
    }

    /// Submits one keyword and checks the enlarged preview and its controls.
    async fn search_keyword(&mut self, keyword: &str) -> Result<()> {
        self.log.log(format!("search images for '{keyword}'"));

        let search_box = locators::search_box();
        self.wait_for_presence("the search box", &search_box).await?;
        if !self.session.input_value(&search_box).await?.is_empty() {
            self.session.clear_input(&search_box).await?;
        }

        self.log.log(format!("fill the search box with '{keyword}'"));
        self.session.type_text(&search_box, keyword).await?;

        self.log.log("submit the search");
        self.session.click(&locators::search_submit()).await?;

        let results = locators::result_images();
        self.wait_for_presence("result images", &results).await?;

        // Hover once; the poll below only observes the resulting state.
        self.log.log("focus on the first image");
        self.session.hover(&results).await?;

        let preview = locators::enlarged_preview();
        let session = &self.session;
        let loc = &preview;
        self.poller
            .wait_until("the enlarged preview to appear", || async move {
                session.is_visible(loc).await
            })
            .await?;

        self.log.log("check the enlarged preview and its controls");
        self.assert_count(&preview, 1, "enlarged preview").await?;

        let favorites = self
            .session
            .count_elements(&locators::add_to_collection())
            .await?;
        if favorites == 0 {
            return Err(SuiteError::AssertionFailed(
                "the 'Add to collection' control is not displayed".to_string(),
            ));
        }

        self.assert_count(&locators::search_by_image_icon(), 1, "search-by-image icon")
            .await?;
        self.assert_count(&locators::adult_marker_icon(), 1, "adult marker icon")
            .await?;
        Ok(())
    }

    /// Opens the search-by-image view and checks the matched thumbnail count.
    async fn verify_match_count(&mut self) -> Result<()> {
        self.log.log("open the search-by-image view");
        self.session
            .click(&locators::search_by_image_icon())
            .await?;

        let main_image = locators::slideshow_main_image();
        self.wait_for_presence("the slideshow main image", &main_image)
            .await?;
        self.assert_count(&main_image, 1, "slideshow main image")
            .await?;

        self.log.log("expand the other images list");
        self.session
            .click(&locators::other_images_expander())
            .await?;

        let matched = self
            .session
            .count_elements(&locators::matched_thumbnails())
            .await?;
        self.log.log(format!("counted {matched} matched thumbnails"));
        if matched < self.config.min_image_count {
            return Err(SuiteError::AssertionFailed(format!(
                "the quantity of images is {}, expected no less than {}",
                matched, self.config.min_image_count
            )));
        }
        Ok(())
    }

    async fn wait_for_presence(&self, what: &str, locator: &Locator) -> Result<()> {
        let session = &self.session;
        self.poller
            .wait_until(what, || async move {
                Ok(session.count_elements(locator).await? >= 1)
            })
            .await
    }

    async fn wait_for_ready(&self) -> Result<()> {
        let session = &self.session;
        self.poller
            .wait_until("the page to finish loading", || async move {
                session.document_ready().await
            })
            .await
    }

    async fn assert_count(&self, locator: &Locator, expected: usize, what: &str) -> Result<()> {
        let count = self.session.count_elements(locator).await?;
        if count == expected {
            Ok(())
        } else {
            Err(SuiteError::AssertionFailed(format!(
                "expected exactly {expected} {what}, found {count}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locators_target_the_bing_image_dom() {
        assert_eq!(locators::images_link().to_string(), "#scpl1");
        assert_eq!(
            locators::feed_thumbnails().to_string(),
            "//div[@class='img_cont hoff']/img"
        );
        assert_eq!(locators::search_box().to_string(), ".b_searchbox");
        assert_eq!(locators::search_submit().to_string(), ".b_searchboxSubmit");
        assert_eq!(
            locators::result_images().to_string(),
            "//div[@id='dg_c']//img"
        );
        assert_eq!(locators::enlarged_preview().to_string(), ".irhc");
        assert_eq!(
            locators::slideshow_main_image().to_string(),
            "//img[@class='mainImage accessible nofocus']"
        );
        assert_eq!(locators::matched_thumbnails().to_string(), ".mimg");
    }

    #[tokio::test]
    #[ignore = "drives live bing.com; requires a Chrome install and network access"]
    async fn full_image_search_flow() {
        let mut suite = ImageSearchSuite::new(SuiteConfig::default()).await.unwrap();
        let report = suite.run().await;
        eprintln!("{}", report.render());
        assert!(report.passed());
    }
}
