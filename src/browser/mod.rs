mod webdriver;

pub use webdriver::WebDriverSession;

use crate::scraper::ScraperError;
use std::fmt::Debug;
use std::time::Duration;

/// The slice of a live browser session the interactive scraper needs.
///
/// Window focus is never implicit: operations that change it either take the
/// handle to switch to or return the handle that is now current.
pub trait Browser {
    type Handle: Clone + PartialEq + Debug;

    fn goto(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Handle of the window/tab commands currently go to.
    fn current_view(&mut self) -> Result<Self::Handle, ScraperError>;

    /// Opens `url` in a new tab and focuses it.
    fn open_view(&mut self, url: &str) -> Result<Self::Handle, ScraperError>;

    fn switch_to(&mut self, view: &Self::Handle) -> Result<(), ScraperError>;

    /// Closes the focused tab. Focus must be switched explicitly afterwards.
    fn close_current(&mut self) -> Result<(), ScraperError>;

    fn page_source(&mut self) -> Result<String, ScraperError>;

    /// Polls until an element matching `css` exists. `Ok(false)` on timeout.
    fn wait_for_css(&mut self, css: &str, timeout: Duration) -> Result<bool, ScraperError>;

    /// Waits for the element at `xpath` to exist, scrolls it into view, waits
    /// until it is clickable and clicks it. Fails if any step times out.
    fn activate_xpath(&mut self, xpath: &str, timeout: Duration) -> Result<(), ScraperError>;

    fn quit(self) -> Result<(), ScraperError>;
}
