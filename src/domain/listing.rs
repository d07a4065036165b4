// src/domain/listing.rs

use std::collections::BTreeMap;
use url::Url;

/// Placeholder for text fields the listing page did not provide.
pub const NAN: &str = "Nan";
/// Placeholder for listings without a floor entry (ground level / houses).
pub const NO_FLOOR: &str = "0";

/// The fixed set of columns every listing row carries, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Bedrooms,
    Bathrooms,
    TotalArea,
    Location,
    PropertyType,
    Floor,
    CoveredArea,
    Price,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Bedrooms,
        Field::Bathrooms,
        Field::TotalArea,
        Field::Location,
        Field::PropertyType,
        Field::Floor,
        Field::CoveredArea,
        Field::Price,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Field::Bedrooms => "Bedrooms",
            Field::Bathrooms => "Bathrooms",
            Field::TotalArea => "m²",
            Field::Location => "Location",
            Field::PropertyType => "Property type",
            Field::Floor => "Floor",
            Field::CoveredArea => "Covered m²",
            Field::Price => "Price",
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            Field::Floor => NO_FLOOR,
            _ => NAN,
        }
    }

    /// Case-insensitive lookup by column name.
    pub fn from_column(name: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.column().to_lowercase() == name.to_lowercase())
    }
}

/// One scraped listing. Every canonical field is always populated, either
/// with the extracted text or with the field's placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub bedrooms: String,
    pub bathrooms: String,
    pub total_area: String,
    pub location: String,
    pub property_type: String,
    pub floor: String,
    pub covered_area: String,
    pub price: String,

    /// Detail entries outside the fixed schema, keyed by a name derived from
    /// their unit word. Only filled when unmatched details are preserved.
    pub extras: BTreeMap<String, String>,
}

impl Default for ListingRecord {
    fn default() -> Self {
        Self {
            bedrooms: Field::Bedrooms.default_value().to_string(),
            bathrooms: Field::Bathrooms.default_value().to_string(),
            total_area: Field::TotalArea.default_value().to_string(),
            location: Field::Location.default_value().to_string(),
            property_type: Field::PropertyType.default_value().to_string(),
            floor: Field::Floor.default_value().to_string(),
            covered_area: Field::CoveredArea.default_value().to_string(),
            price: Field::Price.default_value().to_string(),
            extras: BTreeMap::new(),
        }
    }
}

impl ListingRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Bedrooms => &self.bedrooms,
            Field::Bathrooms => &self.bathrooms,
            Field::TotalArea => &self.total_area,
            Field::Location => &self.location,
            Field::PropertyType => &self.property_type,
            Field::Floor => &self.floor,
            Field::CoveredArea => &self.covered_area,
            Field::Price => &self.price,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Bedrooms => &mut self.bedrooms,
            Field::Bathrooms => &mut self.bathrooms,
            Field::TotalArea => &mut self.total_area,
            Field::Location => &mut self.location,
            Field::PropertyType => &mut self.property_type,
            Field::Floor => &mut self.floor,
            Field::CoveredArea => &mut self.covered_area,
            Field::Price => &mut self.price,
        };
        *slot = value;
    }

    /// Value for an output column: canonical fields first, then extras.
    pub fn value(&self, column: &str) -> Option<&str> {
        match Field::from_column(column) {
            Some(field) => Some(self.get(field)),
            None => self.extras.get(column).map(String::as_str),
        }
    }
}

/// Where one listing can be fetched from, resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRef {
    pub url: Url,
}

impl ListingRef {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}
