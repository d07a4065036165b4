// src/tests/utils.rs
use crate::browser::Browser;
use crate::domain::ListingRef;
use crate::scraper::{ListingSource, ScraperError};
use scraper::Html;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Field values rendered into a listing page.
#[derive(Debug, Clone)]
pub struct ListingFixture {
    pub bedrooms: String,
    pub bathrooms: String,
    pub total_area: String,
    pub location: String,
    pub property_type: String,
    pub floor: String,
    pub covered_area: String,
    pub price: String,
    pub extra_details: Vec<String>,
}

impl Default for ListingFixture {
    fn default() -> Self {
        Self {
            bedrooms: "3".into(),
            bathrooms: "2".into(),
            total_area: "80".into(),
            location: "Palermo, Capital Federal".into(),
            property_type: "Departamento".into(),
            floor: "4".into(),
            covered_area: "72 m²".into(),
            price: "USD 150.000".into(),
            extra_details: Vec::new(),
        }
    }
}

impl ListingFixture {
    pub fn priced(price: &str) -> Self {
        Self {
            price: price.into(),
            ..Self::default()
        }
    }
}

/// A listing page shaped like the portal's detail view.
pub fn listing_html(f: &ListingFixture) -> String {
    let extras: String = f
        .extra_details
        .iter()
        .map(|d| format!(r#"<div class="details-item"><div class="details-item-value">{d}</div></div>"#))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <div class="prices-and-fees">
    <div class="prices-and-fees__price">
      {price}
    </div>
  </div>
  <div class="location">
    {location}
  </div>
  <div class="place-details">
    <div class="details-item"><div class="details-item-value">{bedrooms} dormitorios</div></div>
    <div class="details-item"><div class="details-item-value">{bathrooms} baños</div></div>
    <div class="details-item"><div class="details-item-value">{total_area} m²</div></div>
    {extras}
  </div>
  <div class="place-features">
    <div class="property-type"><span>Tipo de propiedad</span><span>{property_type}</span></div>
    <div class="floor"><span>Piso</span><span class="place-features__values">{floor}</span></div>
    <div class="floor-area"><span>Superficie cubierta</span><span>{covered_area}</span></div>
  </div>
</body>
</html>"#,
        price = f.price,
        location = f.location,
        bedrooms = f.bedrooms,
        bathrooms = f.bathrooms,
        total_area = f.total_area,
        property_type = f.property_type,
        floor = f.floor,
        covered_area = f.covered_area,
    )
}

/// A listing page with none of the expected fragments.
pub fn empty_listing_html() -> String {
    "<!DOCTYPE html><html><body><h1>Propiedad</h1><p>Sin datos</p></body></html>".to_string()
}

/// A results page with the given listing links and an optional "Siguiente" link.
pub fn results_page_html(hrefs: &[&str], next: Option<&str>) -> String {
    let cards: String = hrefs
        .iter()
        .map(|href| format!(r#"<div class="listing-card"><a href="{href}">Ver propiedad</a></div>"#))
        .collect();

    let next_link = next
        .map(|href| format!(r#"<a href="{href}"><span>Siguiente</span></a>"#))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <div id="listings-content">{cards}</div>
  <nav class="pagination">
    <a href="/s/venta"><span>Anterior</span></a>
    {next_link}
  </nav>
</body>
</html>"#
    )
}

pub fn listing_url(path: &str) -> Url {
    Url::parse("https://www.properati.com.ar")
        .and_then(|base| base.join(path))
        .unwrap()
}

/// Unique scratch path under the system temp dir.
pub fn temp_csv_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("properati_scraper_{}", std::process::id()))
        .join(format!("{name}.csv"))
}

/// In-memory results pages. `pages[i]` lists the listing paths on page i.
pub struct FakeSource {
    pages: Vec<Vec<String>>,
    listings: HashMap<String, String>,
    current: usize,
    next_fails: bool,
    pub next_calls: usize,
    pub fetched: Vec<String>,
}

impl FakeSource {
    pub fn new(pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|p| p.into_iter().map(|path| listing_url(path).to_string()).collect())
                .collect(),
            listings: HashMap::new(),
            current: 0,
            next_fails: false,
            next_calls: 0,
            fetched: Vec::new(),
        }
    }

    pub fn with_listing(mut self, path: &str, html: String) -> Self {
        self.listings.insert(listing_url(path).to_string(), html);
        self
    }

    /// The last page reports a failure instead of "no next page".
    pub fn failing_next(mut self) -> Self {
        self.next_fails = true;
        self
    }
}

impl ListingSource for FakeSource {
    fn listing_refs(&mut self) -> Result<Vec<ListingRef>, ScraperError> {
        Ok(self.pages[self.current]
            .iter()
            .map(|u| ListingRef::new(Url::parse(u).unwrap()))
            .collect())
    }

    fn fetch_listing(&mut self, listing: &ListingRef) -> Result<Html, ScraperError> {
        self.fetched.push(listing.as_str().to_string());
        self.listings
            .get(listing.as_str())
            .map(|html| Html::parse_document(html))
            .ok_or_else(|| ScraperError::Network(format!("HTTP 404 for {}", listing.as_str())))
    }

    fn next_page(&mut self) -> Result<bool, ScraperError> {
        self.next_calls += 1;
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            Ok(true)
        } else if self.next_fails {
            Err(ScraperError::Timeout("//span[text()='Siguiente']".into()))
        } else {
            Ok(false)
        }
    }
}

pub const RESULTS_VIEW: u32 = 1;

/// A browser with one results tab that can open listing tabs.
///
/// Results pages are served in order; "clicking next" moves to the following
/// one and fails on the last.
pub struct FakeBrowser {
    results: Vec<String>,
    listings: HashMap<String, String>,
    broken: HashSet<String>,
    page: usize,
    views: Vec<(u32, String)>,
    focused: Option<u32>,
    next_id: u32,
    open_fails: bool,
    opens_in_place: bool,
    pub clicks: usize,
    pub opened: Vec<String>,
}

impl FakeBrowser {
    pub fn new(results: Vec<String>) -> Self {
        Self {
            results,
            listings: HashMap::new(),
            broken: HashSet::new(),
            page: 0,
            views: vec![(RESULTS_VIEW, "about:blank".to_string())],
            focused: Some(RESULTS_VIEW),
            next_id: RESULTS_VIEW + 1,
            open_fails: false,
            opens_in_place: false,
            clicks: 0,
            opened: Vec::new(),
        }
    }

    pub fn with_listing(mut self, path: &str, html: String) -> Self {
        self.listings.insert(listing_url(path).to_string(), html);
        self
    }

    /// Listing whose tab opens but whose page source cannot be read.
    pub fn with_broken_listing(mut self, path: &str) -> Self {
        self.broken.insert(listing_url(path).to_string());
        self
    }

    /// Opening a tab fails after focus has already moved off the results.
    pub fn failing_open(mut self) -> Self {
        self.open_fails = true;
        self
    }

    /// Listings load in the focused tab instead of a new one.
    pub fn opening_in_place(mut self) -> Self {
        self.opens_in_place = true;
        self
    }

    pub fn open_views(&self) -> Vec<u32> {
        self.views.iter().map(|(id, _)| *id).collect()
    }

    pub fn focused(&self) -> Option<u32> {
        self.focused
    }

    fn focused_url(&self) -> Result<String, ScraperError> {
        let id = self
            .focused
            .ok_or_else(|| ScraperError::Browser("no such window".into()))?;
        self.views
            .iter()
            .find(|(v, _)| *v == id)
            .map(|(_, url)| url.clone())
            .ok_or_else(|| ScraperError::Browser("no such window".into()))
    }
}

impl Browser for FakeBrowser {
    type Handle = u32;

    fn goto(&mut self, url: &str) -> Result<(), ScraperError> {
        let id = self
            .focused
            .ok_or_else(|| ScraperError::Browser("no such window".into()))?;
        if let Some(view) = self.views.iter_mut().find(|view| view.0 == id) {
            view.1 = url.to_string();
        }
        Ok(())
    }

    fn current_view(&mut self) -> Result<u32, ScraperError> {
        self.focused
            .ok_or_else(|| ScraperError::Browser("no such window".into()))
    }

    fn open_view(&mut self, url: &str) -> Result<u32, ScraperError> {
        self.opened.push(url.to_string());
        if self.open_fails {
            self.focused = None;
            return Err(ScraperError::Browser(format!("could not open {url}")));
        }
        if self.opens_in_place {
            return self.current_view();
        }

        let id = self.next_id;
        self.next_id += 1;
        self.views.push((id, url.to_string()));
        self.focused = Some(id);
        Ok(id)
    }

    fn switch_to(&mut self, view: &u32) -> Result<(), ScraperError> {
        if !self.views.iter().any(|(v, _)| v == view) {
            return Err(ScraperError::Browser(format!("no such window {view}")));
        }
        self.focused = Some(*view);
        Ok(())
    }

    fn close_current(&mut self) -> Result<(), ScraperError> {
        let id = self
            .focused
            .take()
            .ok_or_else(|| ScraperError::Browser("no such window".into()))?;
        self.views.retain(|(v, _)| *v != id);
        Ok(())
    }

    fn page_source(&mut self) -> Result<String, ScraperError> {
        if self.focused == Some(RESULTS_VIEW) {
            return Ok(self.results[self.page].clone());
        }
        let url = self.focused_url()?;
        if self.broken.contains(&url) {
            return Err(ScraperError::Browser(format!("renderer crashed on {url}")));
        }
        Ok(self
            .listings
            .get(&url)
            .cloned()
            .unwrap_or_else(empty_listing_html))
    }

    fn wait_for_css(&mut self, _css: &str, _timeout: Duration) -> Result<bool, ScraperError> {
        let url = self.focused_url()?;
        Ok(self.listings.contains_key(&url))
    }

    fn activate_xpath(&mut self, xpath: &str, _timeout: Duration) -> Result<(), ScraperError> {
        if self.focused != Some(RESULTS_VIEW) {
            return Err(ScraperError::Browser("next page clicked outside results".into()));
        }
        if self.page + 1 < self.results.len() {
            self.page += 1;
            self.clicks += 1;
            Ok(())
        } else {
            Err(ScraperError::Timeout(xpath.to_string()))
        }
    }

    fn quit(self) -> Result<(), ScraperError> {
        Ok(())
    }
}

/// Serves fixed bodies by path on a local port, one request per connection.
/// Unknown paths get a 404. Returns the base URL.
pub fn serve_pages(pages: Vec<(&str, String)>) -> Url {
    let routes: HashMap<String, String> = pages
        .into_iter()
        .map(|(path, body)| (path.to_string(), body))
        .collect();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) if line == "\r\n" || line == "\n" => break,
                    Ok(_) => {}
                    Err(_) => break,
                }
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let (status, body) = match routes.get(path) {
                Some(body) => ("200 OK", body.as_str()),
                None => ("404 Not Found", "not found"),
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}
