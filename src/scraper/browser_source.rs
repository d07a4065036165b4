// browser_source.rs
use scraper::Html;
use std::time::Duration;
use url::Url;

use crate::browser::Browser;
use crate::domain::extract::PRICE;
use crate::domain::ListingRef;
use crate::scraper::pagination::ListingSource;
use crate::scraper::results_page::enumerate_listings;
use crate::scraper::ScraperError;

#[derive(Debug, Clone, Copy)]
pub struct BrowserTimings {
    /// Upper bound for the next-page control to appear and become clickable.
    pub next_page_timeout: Duration,
    /// Pause after clicking "next"; the portal gives no signal when the new
    /// results have rendered.
    pub settle_delay: Duration,
    /// Upper bound for a listing tab to show its price block.
    pub listing_settle_timeout: Duration,
}

/// Interactive retrieval: results are paged by clicking in a live browser
/// and every listing is rendered in its own tab.
pub struct BrowserSource<B: Browser> {
    browser: B,
    results_view: B::Handle,
    base_url: Url,
    next_page_xpath: String,
    timings: BrowserTimings,
}

impl<B: Browser> BrowserSource<B> {
    pub fn open(
        mut browser: B,
        start_url: &Url,
        next_page_xpath: impl Into<String>,
        timings: BrowserTimings,
    ) -> Result<Self, ScraperError> {
        browser.goto(start_url.as_str())?;
        let results_view = browser.current_view()?;

        Ok(Self {
            browser,
            results_view,
            base_url: start_url.clone(),
            next_page_xpath: next_page_xpath.into(),
            timings,
        })
    }

    pub fn results_view(&self) -> &B::Handle {
        &self.results_view
    }

    pub fn into_browser(self) -> B {
        self.browser
    }
}

/// Renders one listing in a new tab and returns its page source, parsed.
///
/// The tab is closed and focus handed back to `results_view` whether or not
/// the capture succeeded; the returned handle is the view focused afterwards.
pub fn visit_listing<B: Browser>(
    browser: &mut B,
    results_view: B::Handle,
    listing: &ListingRef,
    settle_timeout: Duration,
) -> Result<(Html, B::Handle), ScraperError> {
    let listing_view = match browser.open_view(listing.as_str()) {
        Ok(view) => view,
        Err(e) => {
            if let Err(switch_err) = browser.switch_to(&results_view) {
                log::warn!("Could not refocus results page: {switch_err}");
            }
            return Err(e);
        }
    };

    if listing_view == results_view {
        return Err(ScraperError::Browser(format!(
            "listing {} did not open in a new tab",
            listing.as_str()
        )));
    }

    let captured = capture_listing(browser, settle_timeout);
    let closed = browser.close_current();
    browser.switch_to(&results_view)?;
    closed?;

    let source = captured?;
    Ok((Html::parse_document(&source), results_view))
}

fn capture_listing<B: Browser>(
    browser: &mut B,
    settle_timeout: Duration,
) -> Result<String, ScraperError> {
    if !browser.wait_for_css(PRICE, settle_timeout)? {
        log::debug!("Listing did not render {PRICE} within {settle_timeout:?}");
    }
    browser.page_source()
}

impl<B: Browser> ListingSource for BrowserSource<B> {
    fn listing_refs(&mut self) -> Result<Vec<ListingRef>, ScraperError> {
        self.browser.switch_to(&self.results_view)?;
        let source = self.browser.page_source()?;
        Ok(enumerate_listings(&Html::parse_document(&source), &self.base_url))
    }

    fn fetch_listing(&mut self, listing: &ListingRef) -> Result<Html, ScraperError> {
        let (doc, view) = visit_listing(
            &mut self.browser,
            self.results_view.clone(),
            listing,
            self.timings.listing_settle_timeout,
        )?;
        self.results_view = view;
        Ok(doc)
    }

    fn next_page(&mut self) -> Result<bool, ScraperError> {
        self.browser
            .activate_xpath(&self.next_page_xpath, self.timings.next_page_timeout)?;
        std::thread::sleep(self.timings.settle_delay);
        self.results_view = self.browser.current_view()?;
        Ok(true)
    }
}
