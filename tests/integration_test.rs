use anyhow::Result;
use listing_catalog::catalog::{
    compute_visible_page, filter_and_sort, matches_all, reset_criteria, DurationFilter,
    FilterCriteria, LocationField, LocationFilter, SortKey,
};
use listing_catalog::domain::{normalize_rows, ListingKind, ListingRecord};
use serde_json::{json, Value};

const PAGE_SIZE: usize = 9;

fn tour_rows() -> Vec<Value> {
    vec![
        json!({"id": 101, "name": "Denver Dab Tour", "city": "Denver, Colorado", "price": "$45.00", "rating": 4.8, "review_count": 212, "duration": "3 hours"}),
        json!({"id": 102, "name": "Emerald City Sips", "city": "Seattle, Washington", "price": "$25.00", "rating": 4.1, "duration": "2 hours"}),
        json!({"id": 103, "name": "Portland Puff Pass", "city": "Portland, Oregon", "price": "$80.00", "rating": 4.1, "duration": "Half day"}),
        json!({"id": 104, "name": "Red Rocks Ride", "city": "Denver, Colorado", "price": "$120.00", "duration": "5 hours"}),
        json!({"id": 105, "name": "LA Lounge Crawl", "city": "Los Angeles, California", "price": "$60", "rating": "3.9", "duration": "4 hours"}),
        json!({"id": 106, "name": "Vegas Vape Walk", "city": "Las Vegas, Nevada", "price": "$150.00", "rating": 4.5, "duration": "2 hours"}),
        json!({"id": 107, "name": "Mile High Cooking Class", "city": "Denver, Colorado", "price": "$95.00", "rating": 5, "duration": "90 minutes"}),
        json!({"id": 108, "name": "Boston Buds", "city": "Boston, Massachusetts", "price": "$35.00", "rating": 4.1, "duration": "1 hour"}),
        json!({"id": 109, "name": "Detroit Grow Visit", "city": "Detroit, Michigan", "price": "$55.00", "duration": "3 hours", "image_url": "https://cdn.example.com/detroit.jpg"}),
        json!({"id": 110, "name": "Aurora Night Session", "city": "Anchorage, Alaska", "price": "$180.00", "rating": 3.2, "duration": "Full day", "amenities": ["transport"]}),
    ]
}

fn tours() -> Vec<ListingRecord> {
    let batch = normalize_rows(ListingKind::Tour, tour_rows());
    assert!(batch.rejected.is_empty());
    batch.records
}

fn ids(records: &[&ListingRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.to_string()).collect()
}

/// A spread of criteria used by the property checks below.
fn criteria_samples() -> Vec<FilterCriteria> {
    let mut samples = vec![FilterCriteria::default()];
    for sort in [SortKey::PriceAscending, SortKey::PriceDescending, SortKey::RatingDescending] {
        let mut c = FilterCriteria::default();
        c.set_sort(sort);
        samples.push(c);
    }

    let mut c = FilterCriteria::default();
    c.set_search_text("de");
    samples.push(c);

    let mut c = FilterCriteria::default().with_location_field(LocationField::Region);
    c.set_location(LocationFilter::Only("Colorado".to_string()));
    c.set_sort(SortKey::RatingDescending);
    samples.push(c);

    let mut c = FilterCriteria::default();
    c.set_duration(DurationFilter::Containing("hour".to_string()));
    c.set_max_price(100.0);
    c.set_sort(SortKey::PriceDescending);
    samples.push(c);

    let mut c = FilterCriteria::default();
    c.set_max_price(0.0);
    samples.push(c);

    samples
}

#[test]
fn default_criteria_show_two_pages_in_original_order() -> Result<()> {
    let records = tours();
    let mut criteria = FilterCriteria::default();
    assert_eq!(criteria.max_price(), 200.0);

    let page = compute_visible_page(&records, &criteria, PAGE_SIZE);
    assert_eq!(page.total_pages, 2);
    assert_eq!(
        ids(&page.items),
        (101..=109).map(|i| i.to_string()).collect::<Vec<_>>()
    );

    criteria.set_page(2);
    let page = compute_visible_page(&records, &criteria, PAGE_SIZE);
    assert_eq!(ids(&page.items), vec!["110"]);
    Ok(())
}

#[test]
fn switching_to_price_ascending_sorts_and_returns_to_page_one() -> Result<()> {
    let records = tours();
    let mut criteria = FilterCriteria::default();
    criteria.set_page(2);

    criteria.set_sort("price-low".parse::<SortKey>().map_err(anyhow::Error::msg)?);
    assert_eq!(criteria.page(), 1);

    let ordered = filter_and_sort(&records, &criteria);
    assert_eq!(ordered.len(), 10);
    assert!(ordered.windows(2).all(|w| w[0].numeric_price <= w[1].numeric_price));
    assert_eq!(ordered[0].name, "Emerald City Sips");
    Ok(())
}

#[test]
fn search_matches_city_in_any_case() -> Result<()> {
    let records = tours();
    for query in ["denver", "DENVER", "Denver"] {
        let mut criteria = FilterCriteria::default();
        criteria.set_search_text(query);
        let matched = filter_and_sort(&records, &criteria);
        assert_eq!(ids(&matched), vec!["101", "104", "107"], "query {query}");
    }
    Ok(())
}

#[test]
fn ceiling_below_cheapest_tour_is_empty_without_error() -> Result<()> {
    let records = tours();
    let mut criteria = FilterCriteria::default();
    criteria.set_max_price(10.0);

    let page = compute_visible_page(&records, &criteria, PAGE_SIZE);
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.total_matches, 0);
    assert!(page.items.is_empty());
    Ok(())
}

#[test]
fn repeated_calls_give_identical_pages() {
    let records = tours();
    for criteria in criteria_samples() {
        let first = compute_visible_page(&records, &criteria, PAGE_SIZE);
        let second = compute_visible_page(&records, &criteria, PAGE_SIZE);
        assert_eq!(first, second);
    }
}

/// Each filter written out directly, independent of the engine's predicates.
fn passes_each_filter(record: &ListingRecord, criteria: &FilterCriteria) -> [bool; 4] {
    let query = criteria.search_text().trim().to_lowercase();
    let search = query.is_empty()
        || record.name.to_lowercase().contains(&query)
        || record.location_city.to_lowercase().contains(&query);
    let location = match criteria.location() {
        LocationFilter::All => true,
        LocationFilter::Only(expected) => match criteria.location_field() {
            LocationField::City => &record.location_city == expected,
            LocationField::Region => &record.location_region == expected,
        },
    };
    let price = record.numeric_price <= criteria.max_price();
    let duration = match criteria.duration() {
        DurationFilter::All => true,
        DurationFilter::Containing(bucket) => record.duration_label.contains(bucket.as_str()),
    };
    [search, location, price, duration]
}

#[test]
fn kept_records_pass_every_filter_and_dropped_ones_fail_one() {
    let records = tours();
    for criteria in criteria_samples() {
        let kept = filter_and_sort(&records, &criteria);
        for record in &records {
            let in_result = kept.iter().any(|k| k.id == record.id);
            let checks = passes_each_filter(record, &criteria);
            if in_result {
                assert!(checks.iter().all(|ok| *ok), "record {} kept but failed {:?}", record.id, checks);
            } else {
                assert!(checks.iter().any(|ok| !*ok), "record {} dropped but passed every filter", record.id);
            }
            assert_eq!(in_result, matches_all(record, &criteria), "record {}", record.id);
        }
    }
}

#[test]
fn search_sample_keeps_only_name_or_city_hits() {
    let records = tours();
    let mut criteria = FilterCriteria::default();
    criteria.set_search_text("  DE ");
    let kept = filter_and_sort(&records, &criteria);
    // "de" hits Denver (city) and Detroit (name and city)
    assert_eq!(ids(&kept), vec!["101", "104", "107", "109"]);
}

#[test]
fn equal_sort_keys_keep_upstream_order() {
    let records = tours();
    for sort in [SortKey::PriceAscending, SortKey::PriceDescending, SortKey::RatingDescending] {
        let mut criteria = FilterCriteria::default();
        criteria.set_sort(sort);
        let ordered = filter_and_sort(&records, &criteria);
        let position = |id: &str| records.iter().position(|r| r.id.as_str() == id).unwrap();

        for pair in ordered.windows(2) {
            let same_key = match sort {
                SortKey::RatingDescending => pair[0].rating_for_sort() == pair[1].rating_for_sort(),
                _ => pair[0].numeric_price == pair[1].numeric_price,
            };
            if same_key {
                assert!(position(pair[0].id.as_str()) < position(pair[1].id.as_str()));
            }
        }
    }

    // three tours are rated 4.1 and must stay in input order
    let mut criteria = FilterCriteria::default();
    criteria.set_sort(SortKey::RatingDescending);
    let tied: Vec<String> = filter_and_sort(&records, &criteria)
        .into_iter()
        .filter(|r| r.rating == Some(4.1))
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(tied, vec!["102", "103", "108"]);
}

#[test]
fn concatenated_pages_reproduce_the_full_result() {
    let records = tours();
    for page_size in [1, 3, 4, 9, 25] {
        for base in criteria_samples() {
            let expected = ids(&filter_and_sort(&records, &base));
            let total_pages = compute_visible_page(&records, &base, page_size).total_pages;

            let mut stitched = Vec::new();
            let mut criteria = base.clone();
            for page in 1..=total_pages {
                criteria.set_page(page);
                let visible = compute_visible_page(&records, &criteria, page_size);
                assert!(!visible.items.is_empty());
                stitched.extend(ids(&visible.items));
            }
            assert_eq!(stitched, expected, "page size {page_size}");
        }
    }
}

#[test]
fn reset_matches_fresh_defaults_from_any_state() {
    let records = tours();
    let defaults = reset_criteria(200.0, LocationField::City);
    let expected = compute_visible_page(&records, &defaults, PAGE_SIZE);

    for mut criteria in criteria_samples() {
        criteria.set_page(3);
        criteria.reset();
        let after = compute_visible_page(
            &records,
            &criteria.clone().with_location_field(LocationField::City),
            PAGE_SIZE,
        );
        assert_eq!(after, expected);
        assert!(!after.has_reset_capability);
    }
}
