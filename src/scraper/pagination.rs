// pagination.rs
use scraper::Html;

use crate::domain::{assemble_listing, ListingRecord, ListingRef, UnmatchedDetails};
use crate::scraper::ScraperError;

/// A results page plus the listings it points to. Implemented once over
/// plain HTTP and once over a live browser session.
pub trait ListingSource {
    /// Listing links on the current results page.
    fn listing_refs(&mut self) -> Result<Vec<ListingRef>, ScraperError>;

    /// Fetches and parses one listing page.
    fn fetch_listing(&mut self, listing: &ListingRef) -> Result<Html, ScraperError>;

    /// Moves to the next results page. `Ok(false)` means there is none.
    fn next_page(&mut self) -> Result<bool, ScraperError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// The given (1-based) results page is current and still to be scraped.
    HasMore(usize),
    Exhausted,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationOptions {
    pub unmatched: UnmatchedDetails,
    pub max_pages: Option<usize>,
}

/// Walks results pages until no next page is reachable, collecting one
/// record per listing, then hands the whole result set to `flush` once.
pub fn scrape_and_flush<S, F, T, E>(
    source: &mut S,
    options: &PaginationOptions,
    flush: F,
) -> Result<T, E>
where
    S: ListingSource,
    F: FnOnce(Vec<ListingRecord>) -> Result<T, E>,
{
    let records = collect_listings(source, options);
    log::info!("📦 Collected {} listings", records.len());
    flush(records)
}

pub fn collect_listings<S: ListingSource>(
    source: &mut S,
    options: &PaginationOptions,
) -> Vec<ListingRecord> {
    let mut records = Vec::new();
    let mut state = PageState::HasMore(1);

    while let PageState::HasMore(page) = state {
        scrape_page(source, page, options.unmatched, &mut records);
        state = advance(source, page, options.max_pages);
    }

    records
}

fn scrape_page<S: ListingSource>(
    source: &mut S,
    page: usize,
    unmatched: UnmatchedDetails,
    records: &mut Vec<ListingRecord>,
) {
    let refs = match source.listing_refs() {
        Ok(refs) => refs,
        Err(e) => {
            log::warn!("⚠️ Could not read listings on page {page}: {e}");
            Vec::new()
        }
    };

    log::info!("📄 Page {page}: {} listings", refs.len());

    for listing in &refs {
        match source.fetch_listing(listing) {
            Ok(doc) => {
                log::debug!("Parsed {}", listing.as_str());
                records.push(assemble_listing(&doc, unmatched));
            }
            Err(e) => log::warn!("⚠️ Skipping {}: {e}", listing.as_str()),
        }
    }
}

fn advance<S: ListingSource>(source: &mut S, page: usize, max_pages: Option<usize>) -> PageState {
    if max_pages.is_some_and(|max| page >= max) {
        log::info!("🏁 Reached page limit ({page}), stopping");
        return PageState::Exhausted;
    }

    match source.next_page() {
        Ok(true) => PageState::HasMore(page + 1),
        Ok(false) => {
            log::info!("🏁 No page after {page}, stopping");
            PageState::Exhausted
        }
        Err(e) => {
            log::info!("🏁 Next page unavailable after page {page} ({e}), stopping");
            PageState::Exhausted
        }
    }
}
