//! Append-only persistence of canonical records.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use cmm_model::{CanonicalRecord, PlanRow, StoredRow};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};

use crate::config::{ENV_STORE_KEY, ENV_STORE_URL, StoreConfig};
use crate::error::{Result, ServiceError};

/// A table that canonical records are appended to and read back from.
pub trait RecordStore {
    /// Append one record.
    fn insert(&self, record: &CanonicalRecord) -> impl Future<Output = Result<()>> + Send;

    /// Read every stored row.
    fn select_all(&self) -> impl Future<Output = Result<Vec<StoredRow>>> + Send;

    /// Read the roof plan. The plan is never written through this trait.
    fn select_plan(&self) -> impl Future<Output = Result<Vec<PlanRow>>> + Send;
}

/// Supabase (PostgREST) table client.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    table_url: String,
    plan_url: String,
}

impl SupabaseStore {
    /// Build a client from the store settings. URL and key are required.
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or(ServiceError::MissingConfig(ENV_STORE_URL))?;
        let key = config
            .key
            .as_deref()
            .ok_or(ServiceError::MissingConfig(ENV_STORE_KEY))?;

        let headers = auth_headers(key)
            .map_err(|e| ServiceError::InvalidConfig(format!("{ENV_STORE_KEY}: {e}")))?;
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let rest = format!("{}/rest/v1", url.trim_end_matches('/'));
        Ok(Self {
            client,
            table_url: format!("{rest}/{}", config.table),
            plan_url: format!("{rest}/{}", config.plan_table),
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn auth_headers(key: &str) -> std::result::Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(key)?);
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
    Ok(headers)
}

impl RecordStore for SupabaseStore {
    async fn insert(&self, record: &CanonicalRecord) -> Result<()> {
        tracing::debug!(url = %self.table_url, "Inserting record");
        let response = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;
        Self::check(response).await?;
        tracing::info!(process = %record.process, "Record inserted");
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<StoredRow>> {
        let url = format!("{}?select=*", self.table_url);
        tracing::debug!(%url, "Fetching all records");
        let response = self.client.get(&url).send().await?;
        let rows: Vec<StoredRow> = Self::check(response).await?.json().await?;
        tracing::info!(rows = rows.len(), "Records fetched");
        Ok(rows)
    }

    async fn select_plan(&self) -> Result<Vec<PlanRow>> {
        let url = format!("{}?select=*", self.plan_url);
        tracing::debug!(%url, "Fetching roof plan");
        let response = self.client.get(&url).send().await?;
        let plan: Vec<PlanRow> = Self::check(response).await?.json().await?;
        tracing::info!(members = plan.len(), "Roof plan fetched");
        Ok(plan)
    }
}

/// In-process store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredRow>>,
    plan: Vec<PlanRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<StoredRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            plan: Vec::new(),
        }
    }

    /// Serve `plan` from [`RecordStore::select_plan`].
    #[must_use]
    pub fn with_plan(mut self, plan: Vec<PlanRow>) -> Self {
        self.plan = plan;
        self
    }

    /// Snapshot of the stored rows.
    pub fn rows(&self) -> Vec<StoredRow> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RecordStore for MemoryStore {
    async fn insert(&self, record: &CanonicalRecord) -> Result<()> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StoredRow::from(record));
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<StoredRow>> {
        Ok(self.rows())
    }

    async fn select_plan(&self) -> Result<Vec<PlanRow>> {
        Ok(self.plan.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_url_and_key() {
        let mut config = StoreConfig::default();
        let err = SupabaseStore::new(&config, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ServiceError::MissingConfig(ENV_STORE_URL)));

        config.url = Some("https://example.supabase.co".to_string());
        let err = SupabaseStore::new(&config, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ServiceError::MissingConfig(ENV_STORE_KEY)));
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let config = StoreConfig {
            url: Some("https://example.supabase.co/".to_string()),
            key: Some("anon".to_string()),
            ..StoreConfig::default()
        };
        let store = SupabaseStore::new(&config, Duration::from_secs(1)).unwrap();
        assert_eq!(
            store.table_url,
            "https://example.supabase.co/rest/v1/case_database"
        );
        assert_eq!(store.plan_url, "https://example.supabase.co/rest/v1/RoofList");
    }
}
