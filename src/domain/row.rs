use crate::constants::{PLACEHOLDER_IMAGE_URL, UNKNOWN_LOCATION};
use crate::domain::listing::{ListingId, ListingKind, ListingRecord};
use crate::domain::price::try_parse_price;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// One untyped row as returned by the upstream table. Unknown columns are
/// carried along and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingRow(pub Value);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row is not a JSON object")]
    NotAnObject,
    #[error("row has no id")]
    MissingId,
    #[error("row {id} has no name")]
    MissingName { id: String },
}

/// Which documented defaults were substituted while building a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultsApplied {
    pub price: bool,
    pub rating: bool,
    pub location: bool,
    pub image: bool,
}

impl ListingRow {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn into_record(self, kind: ListingKind) -> Result<ListingRecord, RowError> {
        self.normalize(kind).map(|(record, _)| record)
    }

    /// Builds a record, reporting which fields fell back to defaults.
    pub fn normalize(&self, kind: ListingKind) -> Result<(ListingRecord, DefaultsApplied), RowError> {
        if !self.0.is_object() {
            return Err(RowError::NotAnObject);
        }
        let mut defaults = DefaultsApplied::default();

        let id = self.id().ok_or(RowError::MissingId)?;
        let name = self
            .text(&["name", "title"])
            .ok_or_else(|| RowError::MissingName { id: id.to_string() })?;

        let (numeric_price, price_label, price_defaulted) = self.price();
        defaults.price = price_defaulted;

        let rating = self
            .number(&["rating", "avg_rating"])
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 5.0));
        defaults.rating = rating.is_none();

        let review_count = self
            .number(&["review_count", "reviewCount", "reviews"])
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.min(u32::MAX as f64) as u32)
            .unwrap_or(0);

        let (location_city, location_region, location_defaulted) = self.location();
        defaults.location = location_defaulted;

        let image_url = match self.text(&["image_url", "imageUrl", "image"]) {
            Some(url) => url,
            None => {
                defaults.image = true;
                PLACEHOLDER_IMAGE_URL.to_string()
            }
        };

        let record = ListingRecord {
            id,
            kind,
            name,
            location_city,
            location_region,
            numeric_price,
            price_label,
            rating,
            review_count,
            duration_label: self.text(&["duration", "duration_label", "durationLabel"]).unwrap_or_default(),
            image_url,
            amenities: self.amenities(),
        };
        Ok((record, defaults))
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    fn id(&self) -> Option<ListingId> {
        match self.field("id")? {
            Value::String(s) if !s.trim().is_empty() => Some(ListingId::new(s.trim())),
            Value::Number(n) => Some(ListingId::new(n.to_string())),
            _ => None,
        }
    }

    /// First non-blank string among `keys`; numbers are accepted as text.
    fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.field(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// First numeric value among `keys`; numeric strings are accepted.
    fn number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| match self.field(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    /// Numeric price, display label, and whether the 0 default was used.
    fn price(&self) -> (f64, Option<String>, bool) {
        const PRICE_KEYS: [&str; 4] = ["price", "price_range", "price_per_night", "priceRange"];
        for key in PRICE_KEYS {
            match self.field(key) {
                Some(Value::Number(n)) => {
                    let value = n.as_f64().filter(|v| v.is_finite() && *v >= 0.0);
                    return (value.unwrap_or(0.0), Some(n.to_string()), value.is_none());
                }
                Some(Value::String(s)) if !s.trim().is_empty() => {
                    let value = try_parse_price(s);
                    return (value.unwrap_or(0.0), Some(s.trim().to_string()), value.is_none());
                }
                _ => continue,
            }
        }
        (0.0, None, true)
    }

    /// City and region. A combined `location` column ("Aspen, Colorado") is
    /// split at its first comma; a city column keeps its full text and only
    /// lends its tail to the region when the row has no region column.
    fn location(&self) -> (String, String, bool) {
        let non_blank = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());

        let (city, inferred_region) = match self.text(&["city", "location_city", "locationCity"]) {
            Some(city) => {
                let tail = city.split_once(',').and_then(|(_, r)| non_blank(r));
                (Some(city), tail)
            }
            None => match self.text(&["location"]) {
                Some(combined) => match combined.split_once(',') {
                    Some((c, r)) => (non_blank(c), non_blank(r)),
                    None => (Some(combined), None),
                },
                None => (None, None),
            },
        };
        let region = self
            .text(&["state", "region", "location_region", "locationRegion"])
            .or(inferred_region);

        match (city, region) {
            (Some(city), Some(region)) => (city, region, false),
            (Some(city), None) => (city, UNKNOWN_LOCATION.to_string(), true),
            (None, Some(region)) => (UNKNOWN_LOCATION.to_string(), region, true),
            (None, None) => (UNKNOWN_LOCATION.to_string(), UNKNOWN_LOCATION.to_string(), true),
        }
    }

    /// Amenities arrive as an array, a comma-separated string, or an object of
    /// flags; anything else is treated as none.
    fn amenities(&self) -> Vec<String> {
        let clean = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        match self.field("amenities") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().and_then(clean))
                .collect(),
            Some(Value::String(s)) => s.split(',').filter_map(clean).collect(),
            Some(Value::Object(flags)) => flags
                .iter()
                .filter(|(_, enabled)| enabled.as_bool().unwrap_or(false))
                .filter_map(|(name, _)| clean(name.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub index: usize,
    pub error: RowError,
}

/// Result of converting one fetch worth of rows.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub records: Vec<ListingRecord>,
    pub rejected: Vec<RejectedRow>,
    pub duplicate_ids: Vec<ListingId>,
    pub defaulted_prices: usize,
    pub defaulted_ratings: usize,
    pub defaulted_locations: usize,
    pub defaulted_images: usize,
}

/// Converts rows into records in their original order. Bad rows are collected
/// rather than failing the batch, and only the first row per id is kept.
pub fn normalize_rows(kind: ListingKind, rows: Vec<Value>) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    let mut seen: HashSet<ListingId> = HashSet::with_capacity(rows.len());

    for (index, value) in rows.into_iter().enumerate() {
        match ListingRow::new(value).normalize(kind) {
            Ok((record, defaults)) => {
                if !seen.insert(record.id.clone()) {
                    warn!(kind = %kind, id = %record.id, "Dropping duplicate listing id");
                    batch.duplicate_ids.push(record.id);
                    continue;
                }
                batch.defaulted_prices += defaults.price as usize;
                batch.defaulted_ratings += defaults.rating as usize;
                batch.defaulted_locations += defaults.location as usize;
                batch.defaulted_images += defaults.image as usize;
                batch.records.push(record);
            }
            Err(error) => {
                warn!(kind = %kind, index, %error, "Skipping listing row");
                batch.rejected.push(RejectedRow { index, error });
            }
        }
    }

    debug!(
        kind = %kind,
        records = batch.records.len(),
        rejected = batch.rejected.len(),
        "Normalized listing rows"
    );
    batch
}
