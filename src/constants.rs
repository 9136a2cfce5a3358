/// Listing pages show a 3x3 grid of cards.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Starting position of the price slider; also the "no price limit" value.
pub const DEFAULT_MAX_PRICE: f64 = 200.0;

/// Seconds before an upstream fetch is abandoned.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Sentinel the selection controls use for "no restriction".
pub const ALL_SENTINEL: &str = "all";

/// Location value used when a row carries neither a city nor a region.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Card image shown when a listing has no photo of its own.
pub const PLACEHOLDER_IMAGE_URL: &str = "/images/listing-placeholder.jpg";

// Upstream table names, one per catalog
pub const TOURS_TABLE: &str = "tours";
pub const DISPENSARIES_TABLE: &str = "dispensaries";
pub const HOTELS_TABLE: &str = "hotels";

/// Configuration file read from the working directory when present.
pub const CONFIG_FILE: &str = "catalog.toml";
