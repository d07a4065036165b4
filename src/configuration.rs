// configuration.rs
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::UnmatchedDetails;

/// How listing documents are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retrieval {
    /// Plain HTTP GET; works when the portal renders listings server side.
    Static,
    /// Live browser session through a WebDriver endpoint.
    Interactive,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub results_path: String,
    pub retrieval: Retrieval,
    pub webdriver_url: String,
    pub output_path: PathBuf,
    pub next_page_label: String,
    pub next_page_timeout_secs: u64,
    pub settle_delay_secs: u64,
    pub listing_settle_timeout_secs: u64,
    pub page_delay_secs: u64,
    pub request_timeout_secs: u64,
    pub max_pages: Option<usize>,
    pub unmatched_details: UnmatchedDetails,
    pub extra_columns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://www.properati.com.ar".to_string(),
            results_path: "/s/venta".to_string(),
            retrieval: Retrieval::Static,
            webdriver_url: "http://localhost:9515".to_string(),
            output_path: PathBuf::from("properati/realstate.csv"),
            next_page_label: "Siguiente".to_string(),
            next_page_timeout_secs: 30,
            settle_delay_secs: 5,
            listing_settle_timeout_secs: 2,
            page_delay_secs: 2,
            request_timeout_secs: 60,
            max_pages: None,
            unmatched_details: UnmatchedDetails::Drop,
            extra_columns: Vec::new(),
        }
    }
}

impl Settings {
    pub fn next_page_timeout(&self) -> Duration {
        Duration::from_secs(self.next_page_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn listing_settle_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_settle_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// XPath of the "next page" control in the live results page.
    pub fn next_page_xpath(&self) -> String {
        format!("//span[text()='{}']", self.next_page_label)
    }
}

/// Reads an optional `configuration.{toml,yaml,json}` from the working
/// directory, then `SCRAPER__*` environment variables on top.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("SCRAPER")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extra_columns"),
        )
        .build()?
        .try_deserialize::<Settings>()
}
