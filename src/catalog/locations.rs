use crate::catalog::criteria::LocationField;
use crate::domain::ListingRecord;
use std::collections::BTreeSet;

/// Sorted, de-duplicated values of `field`, for the location selector.
///
/// Recompute whenever the records are replaced; rows can arrive after the
/// selector has first been drawn.
pub fn unique_locations(records: &[ListingRecord], field: LocationField) -> Vec<String> {
    records
        .iter()
        .map(|r| field.value(r))
        .filter(|v| !v.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
