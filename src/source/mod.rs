//! Read-only access to the upstream listing tables.

pub mod in_memory;
pub mod json_file;
pub mod supabase;

use crate::config::Config;
use crate::domain::ListingKind;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub use in_memory::{InMemorySource, ScriptedResponse};
pub use json_file::JsonFileSource;
pub use supabase::SupabaseSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: true }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: false }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.column, if self.ascending { "asc" } else { "desc" })
    }
}

/// Parses `column`, `column.asc` or `column.desc`. Column names are limited
/// to letters, digits and underscores since they end up in a query string.
impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (column, direction) = match s.trim().rsplit_once('.') {
            Some((column, direction)) => (column, direction),
            None => (s.trim(), "asc"),
        };
        if column.is_empty() || !column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("invalid order column '{}'", column));
        }
        match direction.to_ascii_lowercase().as_str() {
            "asc" => Ok(OrderBy::asc(column)),
            "desc" => Ok(OrderBy::desc(column)),
            other => Err(format!("invalid order direction '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: ListingKind,
    pub order_by: Option<OrderBy>,
}

impl FetchRequest {
    pub fn all(kind: ListingKind) -> Self {
        Self { kind, order_by: None }
    }

    pub fn ordered(kind: ListingKind, order_by: OrderBy) -> Self {
        Self { kind, order_by: Some(order_by) }
    }
}

/// "Fetch every row of one catalog, optionally ordered by a column."
///
/// Rows come back untyped; conversion into records happens in
/// [`crate::domain::normalize_rows`].
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Value>>;

    fn name(&self) -> &str;
}

/// Snapshot directory when given, otherwise the configured Supabase project.
pub fn build_source(config: &Config, snapshot_dir: Option<PathBuf>) -> Result<Arc<dyn CatalogSource>> {
    match snapshot_dir {
        Some(dir) => Ok(Arc::new(JsonFileSource::new(dir, config.supabase.tables.clone()))),
        None => Ok(Arc::new(SupabaseSource::from_config(config)?)),
    }
}

/// Stable in-process ordering for sources that cannot sort server-side.
/// Numbers compare numerically, strings lexically, and missing or null
/// values go last in both directions.
pub fn order_rows(rows: &mut [Value], order_by: &OrderBy) {
    rows.sort_by(|a, b| {
        let a = a.get(&order_by.column).filter(|v| !v.is_null());
        let b = b.get(&order_by.column).filter(|v| !v.is_null());
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ord = compare_values(a, b);
                if order_by.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    });
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_by_parses_postgrest_style() {
        assert_eq!("rating.desc".parse::<OrderBy>().unwrap(), OrderBy::desc("rating"));
        assert_eq!("name".parse::<OrderBy>().unwrap(), OrderBy::asc("name"));
        assert_eq!(OrderBy::desc("created_at").to_string(), "created_at.desc");
        assert!("name;drop.asc".parse::<OrderBy>().is_err());
        assert!("name.sideways".parse::<OrderBy>().is_err());
    }

    #[test]
    fn order_rows_puts_missing_values_last() {
        let mut rows = vec![
            json!({"id": 1, "rating": 3.5}),
            json!({"id": 2}),
            json!({"id": 3, "rating": 4.8}),
            json!({"id": 4, "rating": null}),
            json!({"id": 5, "rating": 3.5}),
        ];
        order_rows(&mut rows, &OrderBy::desc("rating"));
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 1, 5, 2, 4]);
    }
}
