//! Catalog load counters.
//!
//! Recorded through the `metrics` facade; without an installed recorder they
//! are no-ops, so library users opt in by installing an exporter.

use crate::catalog::FetchOutcome;
use crate::domain::{ListingKind, NormalizedBatch};

pub const FETCHES_APPLIED: &str = "catalog_fetches_applied_total";
pub const FETCHES_STALE: &str = "catalog_fetches_stale_total";
pub const FETCHES_FAILED: &str = "catalog_fetches_failed_total";
pub const ROWS_LOADED: &str = "catalog_rows_loaded_total";
pub const ROWS_REJECTED: &str = "catalog_rows_rejected_total";
pub const ROWS_DUPLICATE: &str = "catalog_rows_duplicate_total";

/// Registers help text for every catalog metric.
pub fn describe() {
    metrics::describe_counter!(FETCHES_APPLIED, "Catalog fetches whose rows replaced the page's records");
    metrics::describe_counter!(FETCHES_STALE, "Catalog fetches discarded because a newer fetch had started");
    metrics::describe_counter!(FETCHES_FAILED, "Catalog fetches that failed upstream");
    metrics::describe_counter!(ROWS_LOADED, "Listing rows converted into records");
    metrics::describe_counter!(ROWS_REJECTED, "Listing rows skipped for a missing id or name");
    metrics::describe_counter!(ROWS_DUPLICATE, "Listing rows dropped for repeating an earlier id");
}

pub fn record_batch(kind: ListingKind, batch: &NormalizedBatch) {
    let kind = kind.as_str();
    metrics::counter!(ROWS_LOADED, "kind" => kind).increment(batch.records.len() as u64);
    metrics::counter!(ROWS_REJECTED, "kind" => kind).increment(batch.rejected.len() as u64);
    metrics::counter!(ROWS_DUPLICATE, "kind" => kind).increment(batch.duplicate_ids.len() as u64);
}

pub fn record_outcome(kind: ListingKind, outcome: &FetchOutcome) {
    let name = match outcome {
        FetchOutcome::Applied { .. } => FETCHES_APPLIED,
        FetchOutcome::Stale => FETCHES_STALE,
        FetchOutcome::Failed { .. } => FETCHES_FAILED,
    };
    metrics::counter!(name, "kind" => kind.as_str()).increment(1);
}
