use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three directories the site renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Tour,
    Dispensary,
    Hotel,
}

impl ListingKind {
    pub const ALL: [ListingKind; 3] = [ListingKind::Tour, ListingKind::Dispensary, ListingKind::Hotel];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Tour => "tour",
            ListingKind::Dispensary => "dispensary",
            ListingKind::Hotel => "hotel",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ListingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tour" | "tours" => Ok(ListingKind::Tour),
            "dispensary" | "dispensaries" => Ok(ListingKind::Dispensary),
            "hotel" | "hotels" => Ok(ListingKind::Hotel),
            other => Err(format!(
                "unknown listing kind '{}' (expected tours, dispensaries or hotels)",
                other
            )),
        }
    }
}

/// Upstream primary key in string form. Numeric keys are stringified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A listing ready for the query engine. Every field has already been
/// normalized, so nothing downstream deals with missing or untyped data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: ListingId,
    pub kind: ListingKind,
    pub name: String,
    pub location_city: String,
    pub location_region: String,
    pub numeric_price: f64,
    pub price_label: Option<String>,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub duration_label: String,
    pub image_url: String,
    pub amenities: Vec<String>,
}

impl ListingRecord {
    /// Rating used for ordering; unrated listings rank alongside a true zero.
    pub fn rating_for_sort(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accepts_plural_table_names() {
        assert_eq!("Tours".parse::<ListingKind>().unwrap(), ListingKind::Tour);
        assert_eq!("dispensaries".parse::<ListingKind>().unwrap(), ListingKind::Dispensary);
        assert_eq!("hotel".parse::<ListingKind>().unwrap(), ListingKind::Hotel);
        assert!("lounges".parse::<ListingKind>().is_err());
    }

    #[test]
    fn every_kind_parses_from_its_display_name() {
        for kind in ListingKind::ALL {
            assert_eq!(kind.to_string().parse::<ListingKind>().unwrap(), kind);
        }
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ListingId::new("42")).unwrap();
        assert_eq!(json, "\"42\"");
    }
}
