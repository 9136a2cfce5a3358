use crate::config::{Config, TableNames};
use crate::error::{CatalogError, Result};
use crate::source::{CatalogSource, FetchRequest};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Reads listing tables through the project's PostgREST endpoint.
///
/// Only the anon key is needed: listing tables are publicly readable and this
/// source never writes.
pub struct SupabaseSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    tables: TableNames,
}

impl SupabaseSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        tables: TableNames,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            tables,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.supabase_url()?,
            config.supabase_key()?,
            config.supabase.tables.clone(),
            Duration::from_secs(config.supabase.timeout_seconds),
        )
    }

    pub fn endpoint(&self, request: &FetchRequest) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.tables.table_for(request.kind))
    }

    pub fn query_params(request: &FetchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", "*".to_string())];
        if let Some(order_by) = &request.order_by {
            params.push(("order", order_by.to_string()));
        }
        params
    }
}

#[async_trait]
impl CatalogSource for SupabaseSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Value>> {
        let endpoint = self.endpoint(request);
        debug!(endpoint = %endpoint, kind = %request.kind, "Fetching listing rows");

        let resp = self
            .client
            .get(&endpoint)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, "application/json")
            .query(&Self::query_params(request))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        let rows: Vec<Value> = resp.json().await?;
        debug!(kind = %request.kind, rows = rows.len(), "Fetched listing rows");
        Ok(rows)
    }

    fn name(&self) -> &str {
        "supabase"
    }
}
