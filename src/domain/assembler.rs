// src/domain/assembler.rs

use scraper::Html;

use super::extract::{self, UnmatchedDetails};
use super::listing::{Field, ListingRecord};

/// Runs every field extractor against one listing page and merges the
/// results into a fully populated record.
pub fn assemble_listing(doc: &Html, unmatched: UnmatchedDetails) -> ListingRecord {
    let details = extract::room_details(doc, unmatched);

    let mut record = ListingRecord::default();
    if let Some(bedrooms) = details.bedrooms {
        record.set(Field::Bedrooms, bedrooms);
    }
    if let Some(bathrooms) = details.bathrooms {
        record.set(Field::Bathrooms, bathrooms);
    }
    if let Some(total_area) = details.total_area {
        record.set(Field::TotalArea, total_area);
    }

    record.location = extract::location(doc);
    record.property_type = extract::property_type(doc);
    record.floor = extract::floor(doc);
    record.covered_area = extract::covered_area(doc);
    record.price = extract::price(doc);
    record.extras = details.extras;

    record
}
