use crate::catalog::criteria::{FilterCriteria, SortKey};
use crate::catalog::predicates::PreparedCriteria;
use crate::domain::ListingRecord;
use serde::Serialize;

/// One page of listings plus what the pager needs to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage<'a> {
    pub items: Vec<&'a ListingRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    /// Whether a "clear filters" control should be offered.
    pub has_reset_capability: bool,
}

/// Every record passing `criteria`, in display order.
///
/// Sorting is stable, so listings with equal keys keep their upstream order.
pub fn filter_and_sort<'a>(records: &'a [ListingRecord], criteria: &FilterCriteria) -> Vec<&'a ListingRecord> {
    let prepared = PreparedCriteria::from(criteria);
    let mut matched: Vec<&ListingRecord> = records.iter().filter(|r| prepared.matches(r)).collect();

    match criteria.sort() {
        SortKey::Recommended => {}
        SortKey::PriceAscending => {
            matched.sort_by(|a, b| a.numeric_price.total_cmp(&b.numeric_price));
        }
        SortKey::PriceDescending => {
            matched.sort_by(|a, b| b.numeric_price.total_cmp(&a.numeric_price));
        }
        SortKey::RatingDescending => {
            matched.sort_by(|a, b| b.rating_for_sort().total_cmp(&a.rating_for_sort()));
        }
    }

    matched
}

pub fn total_pages(total_matches: usize, page_size: usize) -> usize {
    total_matches.div_ceil(page_size.max(1))
}

/// Filters, sorts and slices `records` for the page `criteria` points at.
///
/// A page past the end yields an empty `items` rather than an error; callers
/// repair the cursor with [`FilterCriteria::clamp_page`]. A `page_size` of 0
/// is treated as 1.
pub fn compute_visible_page<'a>(
    records: &'a [ListingRecord],
    criteria: &FilterCriteria,
    page_size: usize,
) -> CatalogPage<'a> {
    let page_size = page_size.max(1);
    let matched = filter_and_sort(records, criteria);
    let total_matches = matched.len();
    let page = criteria.page();

    let items = match page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) {
        Some(start) if start < total_matches => {
            let end = (start + page_size).min(total_matches);
            matched[start..end].to_vec()
        }
        _ => Vec::new(),
    };

    CatalogPage {
        items,
        page,
        total_pages: total_pages(total_matches, page_size),
        total_matches,
        has_reset_capability: criteria.has_active_filters(),
    }
}
