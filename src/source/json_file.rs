use crate::config::TableNames;
use crate::error::{CatalogError, Result};
use crate::source::{order_rows, CatalogSource, FetchRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Reads `{dir}/{table}.json` snapshots, each a JSON array of rows.
pub struct JsonFileSource {
    dir: PathBuf,
    tables: TableNames,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>, tables: TableNames) -> Self {
        Self { dir: dir.into(), tables }
    }

    pub fn path_for(&self, request: &FetchRequest) -> PathBuf {
        self.dir.join(format!("{}.json", self.tables.table_for(request.kind)))
    }
}

#[async_trait]
impl CatalogSource for JsonFileSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Value>> {
        let path = self.path_for(request);
        debug!(path = %path.display(), "Reading listing snapshot");

        let content = tokio::fs::read_to_string(&path).await?;
        let mut rows = match serde_json::from_str::<Value>(&content)? {
            Value::Array(rows) => rows,
            _ => {
                return Err(CatalogError::Config(format!(
                    "{} does not contain a JSON array",
                    path.display()
                )))
            }
        };

        if let Some(order_by) = &request.order_by {
            order_rows(&mut rows, order_by);
        }
        Ok(rows)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingKind;
    use crate::source::OrderBy;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_and_orders_snapshot() {
        let dir = tempdir().unwrap();
        let rows = json!([
            {"id": 1, "name": "B", "price": "$20"},
            {"id": 2, "name": "A", "price": "$10"}
        ]);
        std::fs::write(dir.path().join("hotels.json"), rows.to_string()).unwrap();

        let source = JsonFileSource::new(dir.path(), TableNames::default());
        let fetched = source
            .fetch(&FetchRequest::ordered(ListingKind::Hotel, OrderBy::asc("name")))
            .await
            .unwrap();
        assert_eq!(fetched[0]["name"], "A");
        assert_eq!(fetched.len(), 2);
    }

    #[tokio::test]
    async fn missing_or_malformed_snapshot_is_an_error() {
        let dir = tempdir().unwrap();
        let source = JsonFileSource::new(dir.path(), TableNames::default());
        let missing = source.fetch(&FetchRequest::all(ListingKind::Tour)).await;
        assert!(matches!(missing, Err(CatalogError::Io(_))));

        std::fs::write(dir.path().join("tours.json"), r#"{"id": 1}"#).unwrap();
        let not_array = source.fetch(&FetchRequest::all(ListingKind::Tour)).await;
        assert!(matches!(not_array, Err(CatalogError::Config(_))));
    }
}
