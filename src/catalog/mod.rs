//! Filtering, sorting and paging of one catalog of listings.
//!
//! The engine functions are pure: they borrow the records and criteria and
//! never keep state between calls. [`state::CatalogState`] is the explicit
//! per-page context that owns both.

pub mod criteria;
pub mod engine;
pub mod locations;
pub mod predicates;
pub mod state;

pub use criteria::{reset_criteria, DurationFilter, FilterCriteria, LocationField, LocationFilter, SortKey};
pub use engine::{compute_visible_page, filter_and_sort, total_pages, CatalogPage};
pub use locations::unique_locations;
pub use predicates::{matches_all, matches_duration_bucket};
pub use state::{CatalogState, FetchOutcome, FetchTicket, LoadStatus};
