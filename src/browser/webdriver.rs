use std::time::Duration;

use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use thirtyfour::WindowHandle;
use tokio::runtime::{Builder, Runtime};

use super::Browser;
use crate::scraper::ScraperError;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

fn browser_err(e: WebDriverError) -> ScraperError {
    ScraperError::Browser(e.to_string())
}

/// Chrome driven over WebDriver (chromedriver or a Selenium hub).
///
/// The client is async; the session owns a single-threaded runtime and
/// blocks on every command so callers stay sequential.
pub struct WebDriverSession {
    runtime: Runtime,
    driver: WebDriver,
}

impl WebDriverSession {
    pub fn connect(server_url: &str) -> Result<Self, ScraperError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ScraperError::Browser(format!("runtime: {e}")))?;

        let driver = runtime
            .block_on(async {
                let caps = DesiredCapabilities::chrome();
                let driver = WebDriver::new(server_url, caps).await?;
                driver.maximize_window().await?;
                Ok::<_, WebDriverError>(driver)
            })
            .map_err(browser_err)?;

        log::info!("Connected to WebDriver at {server_url}");
        Ok(Self { runtime, driver })
    }
}

impl Browser for WebDriverSession {
    type Handle = WindowHandle;

    fn goto(&mut self, url: &str) -> Result<(), ScraperError> {
        self.runtime
            .block_on(self.driver.goto(url))
            .map_err(browser_err)
    }

    fn current_view(&mut self) -> Result<WindowHandle, ScraperError> {
        self.runtime
            .block_on(self.driver.window())
            .map_err(browser_err)
    }

    fn open_view(&mut self, url: &str) -> Result<WindowHandle, ScraperError> {
        let driver = &self.driver;
        self.runtime
            .block_on(async {
                let handle = driver.new_tab().await?;
                driver.switch_to_window(handle.clone()).await?;
                driver.goto(url).await?;
                Ok::<_, WebDriverError>(handle)
            })
            .map_err(browser_err)
    }

    fn switch_to(&mut self, view: &WindowHandle) -> Result<(), ScraperError> {
        self.runtime
            .block_on(self.driver.switch_to_window(view.clone()))
            .map_err(browser_err)
    }

    fn close_current(&mut self) -> Result<(), ScraperError> {
        self.runtime
            .block_on(self.driver.close_window())
            .map_err(browser_err)
    }

    fn page_source(&mut self) -> Result<String, ScraperError> {
        self.runtime
            .block_on(self.driver.source())
            .map_err(browser_err)
    }

    fn wait_for_css(&mut self, css: &str, timeout: Duration) -> Result<bool, ScraperError> {
        self.runtime
            .block_on(
                self.driver
                    .query(By::Css(css))
                    .wait(timeout, POLL_INTERVAL)
                    .exists(),
            )
            .map_err(browser_err)
    }

    fn activate_xpath(&mut self, xpath: &str, timeout: Duration) -> Result<(), ScraperError> {
        let driver = &self.driver;
        self.runtime
            .block_on(async {
                let element = driver
                    .query(By::XPath(xpath))
                    .wait(timeout, POLL_INTERVAL)
                    .first()
                    .await?;
                element.scroll_into_view().await?;
                element
                    .wait_until()
                    .wait(timeout, POLL_INTERVAL)
                    .clickable()
                    .await?;
                element.click().await?;
                Ok::<_, WebDriverError>(())
            })
            .map_err(|e| ScraperError::Timeout(format!("{xpath}: {e}")))
    }

    fn quit(self) -> Result<(), ScraperError> {
        let Self { runtime, driver } = self;
        runtime.block_on(driver.quit()).map_err(browser_err)
    }
}
