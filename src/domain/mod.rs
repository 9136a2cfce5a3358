//! Listing data shapes and the conversion of upstream rows into them.

pub mod listing;
pub mod price;
pub mod row;

pub use listing::{ListingId, ListingKind, ListingRecord};
pub use price::{parse_price, try_parse_price};
pub use row::{normalize_rows, ListingRow, NormalizedBatch, RejectedRow, RowError};
