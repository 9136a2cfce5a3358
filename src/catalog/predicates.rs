//! The individual matching rules behind the listing filters. Each rule is a
//! named function so it can be replaced without touching the engine.

use crate::catalog::criteria::{DurationFilter, FilterCriteria, LocationField, LocationFilter};
use crate::domain::ListingRecord;

/// Criteria prepared once per engine pass.
#[derive(Debug, Clone)]
pub(crate) struct PreparedCriteria<'a> {
    query: Option<String>,
    location: &'a LocationFilter,
    location_field: LocationField,
    max_price: f64,
    duration: &'a DurationFilter,
}

impl<'a> From<&'a FilterCriteria> for PreparedCriteria<'a> {
    fn from(criteria: &'a FilterCriteria) -> Self {
        let query = criteria.search_text().trim();
        Self {
            query: (!query.is_empty()).then(|| query.to_lowercase()),
            location: criteria.location(),
            location_field: criteria.location_field(),
            max_price: criteria.max_price(),
            duration: criteria.duration(),
        }
    }
}

impl PreparedCriteria<'_> {
    pub(crate) fn matches(&self, record: &ListingRecord) -> bool {
        if let Some(query) = self.query.as_deref() {
            if !matches_search(record, query) {
                return false;
            }
        }
        matches_location(record, self.location, self.location_field)
            && within_price(record, self.max_price)
            && matches_duration(record, self.duration)
    }
}

/// `query` must already be lowercased.
pub fn matches_search(record: &ListingRecord, query: &str) -> bool {
    record.name.to_lowercase().contains(query)
        || record.location_city.to_lowercase().contains(query)
}

pub fn matches_location(record: &ListingRecord, filter: &LocationFilter, field: LocationField) -> bool {
    match filter {
        LocationFilter::All => true,
        LocationFilter::Only(expected) => field.value(record) == expected,
    }
}

pub fn within_price(record: &ListingRecord, max_price: f64) -> bool {
    record.numeric_price <= max_price
}

pub fn matches_duration(record: &ListingRecord, filter: &DurationFilter) -> bool {
    match filter {
        DurationFilter::All => true,
        DurationFilter::Containing(bucket) => matches_duration_bucket(&record.duration_label, bucket),
    }
}

/// Duration labels are free text ("2 hours", "Half day"), so a bucket is a
/// plain substring of the label.
pub fn matches_duration_bucket(label: &str, bucket: &str) -> bool {
    label.contains(bucket)
}

/// Whether `record` passes every filter in `criteria`.
pub fn matches_all(record: &ListingRecord, criteria: &FilterCriteria) -> bool {
    PreparedCriteria::from(criteria).matches(record)
}
