// results_page.rs
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::ListingRef;

const LISTINGS_CONTAINER: &str = "div#listings-content";

/// Every link inside the listings container, in page order, resolved
/// against `base`. A page without the container (or without links) simply
/// has no listings.
pub fn enumerate_listings(doc: &Html, base: &Url) -> Vec<ListingRef> {
    let (Ok(container_sel), Ok(anchor_sel)) =
        (Selector::parse(LISTINGS_CONTAINER), Selector::parse("a"))
    else {
        return Vec::new();
    };

    let Some(container) = doc.select(&container_sel).next() else {
        log::debug!("No {LISTINGS_CONTAINER} on results page");
        return Vec::new();
    };

    let mut refs = Vec::new();
    for a in container.select(&anchor_sel) {
        let Some(href) = a.value().attr("href") else {
            log::debug!("Skipping listing link without href: {:?}", a.html());
            continue;
        };
        match base.join(href) {
            Ok(url) => refs.push(ListingRef::new(url)),
            Err(e) => log::debug!("Skipping listing link {href:?}: {e}"),
        }
    }
    refs
}

fn text_is(el: ElementRef, label: &str) -> bool {
    el.text().collect::<String>().trim() == label
}

/// The first link labelled `label` ("Siguiente"), if the results page has
/// one. The label may be the link's whole text or the text of one of its
/// spans, so icons next to the label do not hide it.
pub fn find_next_page(doc: &Html, label: &str, base: &Url) -> Option<Url> {
    let (Ok(anchors), Ok(spans)) = (Selector::parse("a[href]"), Selector::parse("span")) else {
        return None;
    };

    for a in doc.select(&anchors) {
        if text_is(a, label) || a.select(&spans).any(|span| text_is(span, label)) {
            let href = a.value().attr("href")?;
            return base.join(href).ok();
        }
    }
    None
}
