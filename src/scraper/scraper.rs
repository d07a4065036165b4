// scraper.rs
use crate::domain::ListingRef;
use crate::scraper::pagination::ListingSource;
use crate::scraper::results_page::{enumerate_listings, find_next_page};
use crate::scraper::ScraperError;
use reqwest::blocking::Client;
use scraper::Html;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Static retrieval: results pages and listings are fetched with plain GET
/// requests and parsed as served, without running any JavaScript.
pub struct PortalScraper {
    client: Client,
    page_url: Url,
    page: Option<Html>,
    next_page_label: String,
    page_delay: Duration,
    visited: HashSet<Url>,
}

impl PortalScraper {
    pub fn new(
        start_url: Url,
        next_page_label: impl Into<String>,
        request_timeout: Duration,
        page_delay: Duration,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()?;

        Ok(Self::with_client(client, start_url, next_page_label, page_delay))
    }

    pub fn with_client(
        client: Client,
        start_url: Url,
        next_page_label: impl Into<String>,
        page_delay: Duration,
    ) -> Self {
        let visited = HashSet::from([without_fragment(&start_url)]);
        Self {
            client,
            page_url: start_url,
            page: None,
            next_page_label: next_page_label.into(),
            page_delay,
            visited,
        }
    }

    pub fn fetch_html(&self, url: &Url) -> Result<String, ScraperError> {
        let resp = self.client.get(url.as_str()).send()?;

        let status = resp.status();
        let text = resp.text()?;

        if !status.is_success() {
            return Err(ScraperError::Network(format!("HTTP {status} for {url}")));
        }

        Ok(text)
    }

    fn current_page(&mut self) -> Result<&Html, ScraperError> {
        if self.page.is_none() {
            log::debug!("Fetching results page {}", self.page_url);
            let html = self.fetch_html(&self.page_url)?;
            self.page = Some(Html::parse_document(&html));
        }
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::HtmlParse("results page not loaded".into()))
    }
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

impl ListingSource for PortalScraper {
    fn listing_refs(&mut self) -> Result<Vec<ListingRef>, ScraperError> {
        let base = self.page_url.clone();
        let page = self.current_page()?;
        Ok(enumerate_listings(page, &base))
    }

    fn fetch_listing(&mut self, listing: &ListingRef) -> Result<Html, ScraperError> {
        let html = self.fetch_html(&listing.url)?;
        Ok(Html::parse_document(&html))
    }

    fn next_page(&mut self) -> Result<bool, ScraperError> {
        let base = self.page_url.clone();
        let label = self.next_page_label.clone();
        let page = self.current_page()?;

        let Some(next_url) = find_next_page(page, &label, &base) else {
            return Ok(false);
        };

        if !self.visited.insert(without_fragment(&next_url)) {
            log::info!("Next page {next_url} was already scraped, stopping");
            return Ok(false);
        }

        std::thread::sleep(self.page_delay);
        self.page_url = next_url;
        self.page = None;
        Ok(true)
    }
}
