use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTML parse error: {0}")]
    HtmlParse(String),
    #[error("Invalid URL: {0}")]
    Url(String),
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("Timed out waiting for {0}")]
    Timeout(String),
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        ScraperError::Network(e.to_string())
    }
}

impl From<url::ParseError> for ScraperError {
    fn from(e: url::ParseError) -> Self {
        ScraperError::Url(e.to_string())
    }
}
