use crate::constants::{ALL_SENTINEL, DEFAULT_MAX_PRICE};
use crate::domain::{ListingKind, ListingRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Upstream order, i.e. what the editors ranked first.
    #[default]
    Recommended,
    PriceAscending,
    PriceDescending,
    RatingDescending,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recommended => "recommended",
            SortKey::PriceAscending => "price-ascending",
            SortKey::PriceDescending => "price-descending",
            SortKey::RatingDescending => "rating-descending",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "recommended" | "relevance" | "default" => Ok(SortKey::Recommended),
            "price-low" | "price-ascending" | "price-asc" => Ok(SortKey::PriceAscending),
            "price-high" | "price-descending" | "price-desc" => Ok(SortKey::PriceDescending),
            "rating" | "rating-descending" | "rating-desc" => Ok(SortKey::RatingDescending),
            other => Err(format!("unknown sort '{}'", other)),
        }
    }
}

/// Which record field the location selector works on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationField {
    #[default]
    City,
    Region,
}

impl LocationField {
    /// Tour pages pick a city; dispensary and hotel pages pick a state.
    pub fn default_for(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Tour => LocationField::City,
            ListingKind::Dispensary | ListingKind::Hotel => LocationField::Region,
        }
    }

    pub fn value<'a>(&self, record: &'a ListingRecord) -> &'a str {
        match self {
            LocationField::City => &record.location_city,
            LocationField::Region => &record.location_region,
        }
    }
}

impl FromStr for LocationField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "city" => Ok(LocationField::City),
            "region" | "state" => Ok(LocationField::Region),
            other => Err(format!("unknown location field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocationFilter {
    #[default]
    All,
    Only(String),
}

impl LocationFilter {
    /// Maps a selector value to a filter; blank and "all" mean no restriction.
    pub fn from_selection(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
            LocationFilter::All
        } else {
            LocationFilter::Only(trimmed.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DurationFilter {
    #[default]
    All,
    Containing(String),
}

impl DurationFilter {
    pub fn from_selection(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
            DurationFilter::All
        } else {
            DurationFilter::Containing(trimmed.to_string())
        }
    }
}

/// The visitor's current filter, sort and page selection.
///
/// Fields are only reachable through setters: every setter except
/// [`FilterCriteria::set_page`] moves the cursor back to page 1, so a shrunk
/// result set can never be viewed through a stale page number.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    search_text: String,
    location: LocationFilter,
    location_field: LocationField,
    max_price: f64,
    duration: DurationFilter,
    sort: SortKey,
    page: usize,
    price_ceiling: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PRICE)
    }
}

impl FilterCriteria {
    /// Defaults with the price slider starting at `price_ceiling`.
    pub fn new(price_ceiling: f64) -> Self {
        let price_ceiling = if price_ceiling.is_nan() {
            DEFAULT_MAX_PRICE
        } else {
            price_ceiling.max(0.0)
        };
        Self {
            search_text: String::new(),
            location: LocationFilter::All,
            location_field: LocationField::default(),
            max_price: price_ceiling,
            duration: DurationFilter::All,
            sort: SortKey::Recommended,
            page: 1,
            price_ceiling,
        }
    }

    pub fn with_location_field(mut self, field: LocationField) -> Self {
        self.location_field = field;
        self
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn location(&self) -> &LocationFilter {
        &self.location
    }

    pub fn location_field(&self) -> LocationField {
        self.location_field
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    pub fn duration(&self) -> &DurationFilter {
        &self.duration
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    pub fn set_location(&mut self, location: LocationFilter) {
        self.location = location;
        self.page = 1;
    }

    /// Also clears the location selection: a value picked for one field is
    /// not a value of the other.
    pub fn set_location_field(&mut self, field: LocationField) {
        if field != self.location_field {
            self.location = LocationFilter::All;
        }
        self.location_field = field;
        self.page = 1;
    }

    /// NaN falls back to the ceiling; negatives become 0.
    pub fn set_max_price(&mut self, max_price: f64) {
        self.max_price = if max_price.is_nan() {
            self.price_ceiling
        } else {
            max_price.max(0.0)
        };
        self.page = 1;
    }

    pub fn set_duration(&mut self, duration: DurationFilter) {
        self.duration = duration;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Moves the cursor only. Page numbers are 1-based; 0 is treated as 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Pulls a cursor that points past the last page back onto it.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }

    /// Back to defaults, keeping the configured ceiling and location field.
    pub fn reset(&mut self) {
        *self = reset_criteria(self.price_ceiling, self.location_field);
    }

    /// True when any filter or the sort differs from its default; drives the
    /// "clear filters" control. The page cursor alone does not count.
    pub fn has_active_filters(&self) -> bool {
        let defaults = reset_criteria(self.price_ceiling, self.location_field);
        self.search_text.trim() != defaults.search_text
            || self.location != defaults.location
            || self.max_price != defaults.max_price
            || self.duration != defaults.duration
            || self.sort != defaults.sort
    }
}

/// Fresh default criteria for a page.
pub fn reset_criteria(price_ceiling: f64, location_field: LocationField) -> FilterCriteria {
    FilterCriteria::new(price_ceiling).with_location_field(location_field)
}
