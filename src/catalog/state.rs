use crate::catalog::criteria::{FilterCriteria, LocationField};
use crate::catalog::engine::{compute_visible_page, filter_and_sort, total_pages, CatalogPage};
use crate::catalog::locations::unique_locations;
use crate::config::CatalogConfig;
use crate::domain::{ListingKind, ListingRecord};
use crate::error::CatalogError;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready { loaded_at: DateTime<Utc>, count: usize },
    Failed { message: String },
}

/// Issued by [`CatalogState::begin_fetch`]; only the newest ticket may apply
/// its result.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied { count: usize },
    /// A newer fetch started before this one finished; its result was dropped.
    Stale,
    /// The fetch failed; the previous records are still in place.
    Failed { message: String },
}

/// Everything one listing page holds while it is open: the catalog, the
/// visitor's criteria and the load bookkeeping. Created when the page mounts,
/// records replaced wholesale on each successful fetch.
#[derive(Debug, Clone)]
pub struct CatalogState {
    kind: ListingKind,
    records: Vec<ListingRecord>,
    locations: Vec<String>,
    criteria: FilterCriteria,
    page_size: usize,
    status: LoadStatus,
    generation: u64,
}

impl CatalogState {
    pub fn new(kind: ListingKind, criteria: FilterCriteria, page_size: usize) -> Self {
        Self {
            kind,
            records: Vec::new(),
            locations: Vec::new(),
            criteria,
            page_size: page_size.max(1),
            status: LoadStatus::Idle,
            generation: 0,
        }
    }

    pub fn from_config(kind: ListingKind, config: &CatalogConfig) -> Self {
        let criteria =
            FilterCriteria::new(config.max_price).with_location_field(LocationField::default_for(kind));
        Self::new(kind, criteria, config.page_size)
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    /// Location selector values for the current records and location field.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Applies a criteria change. The location list follows the criteria's
    /// location field, so it is rebuilt if that changed.
    pub fn update_criteria<F>(&mut self, update: F)
    where
        F: FnOnce(&mut FilterCriteria),
    {
        let field_before = self.criteria.location_field();
        update(&mut self.criteria);
        if self.criteria.location_field() != field_before {
            self.locations = unique_locations(&self.records, self.criteria.location_field());
        }
    }

    pub fn reset_criteria(&mut self) {
        self.update_criteria(FilterCriteria::reset);
    }

    pub fn visible_page(&self) -> CatalogPage<'_> {
        compute_visible_page(&self.records, &self.criteria, self.page_size)
    }

    /// Starts a fetch. Any ticket issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        debug!(kind = %self.kind, generation = self.generation, "Catalog fetch started");
        FetchTicket { generation: self.generation }
    }

    /// Applies the result of the fetch `ticket` belongs to, unless a newer
    /// fetch has started since.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<ListingRecord>, CatalogError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            debug!(
                kind = %self.kind,
                ticket = ticket.generation,
                latest = self.generation,
                "Discarding stale catalog fetch"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(records) => {
                let count = records.len();
                self.replace_records(records);
                self.status = LoadStatus::Ready { loaded_at: Utc::now(), count };
                info!(kind = %self.kind, count, "Catalog loaded");
                FetchOutcome::Applied { count }
            }
            Err(e) => {
                let message = e.to_string();
                warn!(kind = %self.kind, error = %message, kept = self.records.len(), "Catalog load failed");
                self.status = LoadStatus::Failed { message: message.clone() };
                FetchOutcome::Failed { message }
            }
        }
    }

    /// Marks the fetch with `generation` as abandoned when it was dropped
    /// before completing. Has no effect once a newer fetch has started or the
    /// fetch already completed.
    pub fn abandon_fetch(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.status != LoadStatus::Loading {
            return false;
        }
        warn!(kind = %self.kind, generation, kept = self.records.len(), "Catalog fetch abandoned");
        self.status = LoadStatus::Failed { message: "load cancelled".to_string() };
        true
    }

    fn replace_records(&mut self, records: Vec<ListingRecord>) {
        self.records = records;
        self.locations = unique_locations(&self.records, self.criteria.location_field());
        let matches = filter_and_sort(&self.records, &self.criteria).len();
        self.criteria.clamp_page(total_pages(matches, self.page_size));
    }
}
