//! Record fetch: the source of per-card employee/card/custom-field records.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{CardError, Result};

/// Fetches one raw record by id.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Value>;

    /// Fetch several records in order, stopping at the first failure.
    async fn fetch_many(&self, ids: &[String]) -> Result<Vec<Value>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            out.push(self.fetch(id).await?);
        }
        Ok(out)
    }
}

/// Records served by the record API at `{base}/records/{id}`.
pub struct HttpRecordSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn record_url(&self, id: &str) -> String {
        format!("{}/records/{}", self.base_url, id)
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self, id: &str) -> Result<Value> {
        let url = self.record_url(id);
        debug!(url = %url, "fetching record");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CardError::Record(format!("Failed to fetch {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(CardError::Record(format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| CardError::Record(format!("Invalid record JSON from {}: {}", url, e)))
    }
}

/// Fixed set of records, for tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordSource {
    records: HashMap<String, Value>,
}

impl MemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, record: Value) {
        self.records.insert(id.into(), record);
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn fetch(&self, id: &str) -> Result<Value> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| CardError::Record(format!("Unknown record: {}", id)))
    }
}
