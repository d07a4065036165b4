// errors.rs
use crate::scraper::ScraperError;
use thiserror::Error;

/// Errors that end a run. Everything recoverable (missing fragments,
/// unreachable listings, malformed rows) is handled where it happens.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
