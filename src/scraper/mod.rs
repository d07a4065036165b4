mod browser_source;
mod pagination;
mod results_page;
mod scraper;
mod scraper_error;

pub use browser_source::{visit_listing, BrowserSource, BrowserTimings};
pub use pagination::{collect_listings, scrape_and_flush, ListingSource, PaginationOptions};
pub use self::scraper::PortalScraper;
pub use scraper_error::ScraperError;
