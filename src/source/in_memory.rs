use crate::domain::ListingKind;
use crate::error::{CatalogError, Result};
use crate::source::{order_rows, CatalogSource, FetchRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A canned answer for the next fetch, used to simulate slow or failing
/// upstreams.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    pub delay: Duration,
    pub result: std::result::Result<Vec<Value>, String>,
}

impl ScriptedResponse {
    pub fn rows_after(delay: Duration, rows: Vec<Value>) -> Self {
        Self { delay, result: Ok(rows) }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { delay: Duration::ZERO, result: Err(message.into()) }
    }
}

/// In-memory source for development and testing. Scripted responses are
/// consumed first, in order; after that the stored rows are served.
#[derive(Default, Clone)]
pub struct InMemorySource {
    rows: Arc<Mutex<HashMap<ListingKind, Vec<Value>>>>,
    script: Arc<Mutex<VecDeque<ScriptedResponse>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(kind: ListingKind, rows: Vec<Value>) -> Self {
        let source = Self::new();
        source.set_rows(kind, rows);
        source
    }

    pub fn set_rows(&self, kind: ListingKind, rows: Vec<Value>) {
        let mut stored = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        stored.insert(kind, rows);
    }

    pub fn push_response(&self, response: ScriptedResponse) {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        script.push_back(response);
    }

    fn stored_rows(&self, kind: ListingKind) -> Vec<Value> {
        let stored = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        stored.get(&kind).cloned().unwrap_or_default()
    }

    fn next_scripted(&self) -> Option<ScriptedResponse> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

#[async_trait]
impl CatalogSource for InMemorySource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Value>> {
        let mut rows = match self.next_scripted() {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                scripted.result.map_err(|message| CatalogError::Upstream {
                    status: 500,
                    message,
                })?
            }
            None => self.stored_rows(request.kind),
        };

        if let Some(order_by) = &request.order_by {
            order_rows(&mut rows, order_by);
        }
        Ok(rows)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
