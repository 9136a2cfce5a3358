pub mod agent;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod source;

pub use catalog::{
    compute_visible_page, reset_criteria, unique_locations, CatalogPage, CatalogState, FetchOutcome,
    FilterCriteria, SortKey,
};
pub use domain::{ListingKind, ListingRecord};
pub use error::{CatalogError, Result};
pub use loader::CatalogLoader;
