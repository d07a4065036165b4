// src/domain/extract.rs
//
// One function per listing field. Each reads the parsed listing page and
// returns the field's text, or the field's placeholder when the fragment is
// missing. None of them fail.

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::listing::Field;

const PROPERTY_TYPE: &str = "div.property-type";
const FLOOR: &str = "div.floor";
const FLOOR_VALUE: &str = "span.place-features__values";
const FLOOR_AREA: &str = "div.floor-area";
const LOCATION: &str = "div.location";
pub(crate) const PRICE: &str = "div.prices-and-fees__price";
const DETAIL_VALUE: &str = "div.details-item-value";

/// What to do with a detail entry whose unit is not one of the known ones
/// (bedrooms, bathrooms, m²).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedDetails {
    #[default]
    Drop,
    /// Keep it under a key derived from the unit word ("ambientes" -> "Ambientes").
    Preserve,
}

/// Room counts and total surface, plus any extra detail entries kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDetails {
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub total_area: Option<String>,
    pub extras: BTreeMap<String, String>,
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_match<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    selector(css).and_then(|sel| doc.select(&sel).next())
}

fn nth_span_text(container: ElementRef, n: usize) -> Option<String> {
    selector("span").and_then(|span| container.select(&span).nth(n).map(element_text))
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn or_default(value: Option<String>, field: Field) -> String {
    value.unwrap_or_else(|| field.default_value().to_string())
}

/// "Departamento", "Casa", ... : the second label inside the property-type box.
pub fn property_type(doc: &Html) -> String {
    let value = first_match(doc, PROPERTY_TYPE)
        .and_then(|div| nth_span_text(div, 1))
        .and_then(non_empty);
    or_default(value, Field::PropertyType)
}

pub fn floor(doc: &Html) -> String {
    let value = first_match(doc, FLOOR)
        .and_then(|div| selector(FLOOR_VALUE).and_then(|sel| div.select(&sel).next()))
        .map(element_text)
        .and_then(non_empty);
    or_default(value, Field::Floor)
}

pub fn covered_area(doc: &Html) -> String {
    let value = first_match(doc, FLOOR_AREA)
        .and_then(|div| nth_span_text(div, 1))
        .and_then(non_empty);
    or_default(value, Field::CoveredArea)
}

pub fn location(doc: &Html) -> String {
    let value = first_match(doc, LOCATION)
        .map(element_text)
        .and_then(non_empty);
    or_default(value, Field::Location)
}

/// Every listing is expected to show a price; a missing one is worth a warning.
pub fn price(doc: &Html) -> String {
    let value = first_match(doc, PRICE).map(element_text).and_then(non_empty);
    if value.is_none() {
        log::warn!("Listing has no price container ({PRICE})");
    }
    or_default(value, Field::Price)
}

/// Splits "3 dormitorios" into ("3", "dormitorios").
fn split_detail(text: &str) -> Option<(&str, &str)> {
    let mut tokens = text.split_whitespace();
    let amount = tokens.next()?;
    let unit = tokens.next()?;
    Some((amount, unit))
}

fn derived_key(unit: &str) -> String {
    let mut chars = unit.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn room_details(doc: &Html, unmatched: UnmatchedDetails) -> RoomDetails {
    let mut details = RoomDetails::default();

    let Some(sel) = selector(DETAIL_VALUE) else {
        return details;
    };

    for fragment in doc.select(&sel) {
        let text = element_text(fragment);
        let Some((amount, unit)) = split_detail(&text) else {
            log::debug!("Ignoring detail without unit: {text:?}");
            continue;
        };

        match unit.to_lowercase().as_str() {
            "baño" | "baños" => details.bathrooms = Some(amount.to_string()),
            "dormitorio" | "dormitorios" => details.bedrooms = Some(amount.to_string()),
            "m²" => details.total_area = Some(amount.to_string()),
            _ => match unmatched {
                UnmatchedDetails::Drop => {}
                UnmatchedDetails::Preserve => {
                    let key = derived_key(unit);
                    if Field::from_column(&key).is_some() {
                        log::warn!("Detail key {key:?} collides with a listing column, dropped");
                    } else {
                        details.extras.insert(key, amount.to_string());
                    }
                }
            },
        }
    }

    details
}
