use crate::browser::{Browser, WebDriverSession};
use crate::configuration::{get_configuration, Retrieval, Settings};
use crate::errors::AppError;
use crate::scraper::{
    scrape_and_flush, BrowserSource, BrowserTimings, PaginationOptions, PortalScraper,
};
use crate::spreadsheets::{CsvExporter, WriteSummary};
use env_logger::Env;
use std::time::Instant;
use url::Url;

mod browser;
mod configuration;
mod domain;
mod errors;
mod scraper;
mod spreadsheets;


fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = match get_configuration() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("❌ Failed to read configuration: {e}");
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let result = run(&settings);
    log::info!("Executed in {:?}", start.elapsed());

    if let Err(e) = result {
        log::error!("❌ Scrape failed: {e}");
        std::process::exit(1);
    }
}

fn run(settings: &Settings) -> Result<Option<WriteSummary>, AppError> {
    let start_url = Url::parse(&settings.base_url)
        .and_then(|base| base.join(&settings.results_path))
        .map_err(crate::scraper::ScraperError::from)?;

    let options = PaginationOptions {
        unmatched: settings.unmatched_details,
        max_pages: settings.max_pages,
    };
    let exporter = CsvExporter::new(&settings.output_path)
        .with_extra_columns(settings.extra_columns.clone());

    log::info!(
        "Scraping {start_url} ({:?} retrieval) into {}",
        settings.retrieval,
        exporter.path().display()
    );

    match settings.retrieval {
        Retrieval::Static => {
            let mut source = PortalScraper::new(
                start_url,
                settings.next_page_label.clone(),
                settings.request_timeout(),
                settings.page_delay(),
            )?;
            scrape_and_flush(&mut source, &options, |records| exporter.export(&records))
        }
        Retrieval::Interactive => {
            let session = WebDriverSession::connect(&settings.webdriver_url)?;
            let timings = BrowserTimings {
                next_page_timeout: settings.next_page_timeout(),
                settle_delay: settings.settle_delay(),
                listing_settle_timeout: settings.listing_settle_timeout(),
            };
            let mut source =
                BrowserSource::open(session, &start_url, settings.next_page_xpath(), timings)?;

            let result = scrape_and_flush(&mut source, &options, |records| exporter.export(&records));

            if let Err(e) = source.into_browser().quit() {
                log::warn!("Browser did not shut down cleanly: {e}");
            }
            result
        }
    }
}
