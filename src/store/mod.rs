pub mod live;
pub mod models;
pub mod query;

use std::sync::Arc;
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::StoreConfig;
use query::Query;

static STORE: OnceCell<Arc<Store>> = OnceCell::new();

/// Failures talking to the remote store. The backend's own message is kept
/// verbatim because the admin surface displays it as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),
    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode store response: {0}")]
    Decode(String),
}

/// One configured handle to the hosted data store. Every call is a fresh
/// request against the REST surface; there is no pooling or retry layer.
#[derive(Debug, Clone)]
pub struct Store {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Store {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{collection}", self.base_url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Read rows from a collection under a declarative query.
    pub async fn select<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .authed(self.client.get(self.collection_url(collection)))
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::decode_rows(response).await
    }

    /// Insert one or many rows and return the stored representation.
    pub async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        collection: &str,
        rows: &B,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .authed(self.client.post(self.collection_url(collection)))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::decode_rows(response).await
    }

    /// Insert without asking the store to echo the rows back.
    pub async fn insert_only<B: Serialize + ?Sized>(
        &self,
        collection: &str,
        rows: &B,
    ) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.post(self.collection_url(collection)))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::expect_success(response).await
    }

    /// Update by primary key and return the stored representation.
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        collection: &str,
        id: i64,
        patch: &B,
    ) -> Result<Vec<T>, StoreError> {
        self.update_where(collection, &[("id", id.to_string())], patch)
            .await
    }

    /// Update rows matched by equality filters.
    pub async fn update_where<T: DeserializeOwned, B: Serialize>(
        &self,
        collection: &str,
        filters: &[(&str, String)],
        patch: &B,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .authed(self.client.patch(self.collection_url(collection)))
            .query(&Self::eq_params(filters))
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::decode_rows(response).await
    }

    /// Delete by primary key.
    pub async fn delete(&self, collection: &str, id: i64) -> Result<(), StoreError> {
        self.delete_where(collection, &[("id", id.to_string())]).await
    }

    /// Delete rows matched by equality filters.
    pub async fn delete_where(
        &self,
        collection: &str,
        filters: &[(&str, String)],
    ) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.delete(self.collection_url(collection)))
            .query(&Self::eq_params(filters))
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::expect_success(response).await
    }

    /// Count-only query, used for dashboard statistics. No row bodies are
    /// transferred; the total rides on the Content-Range header.
    pub async fn count(
        &self,
        collection: &str,
        filters: &[(&str, String)],
    ) -> Result<u64, StoreError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(Self::eq_params(filters));
        let response = self
            .authed(self.client.head(self.collection_url(collection)))
            .query(&params)
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                message: String::new(),
            });
        }
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| StoreError::Decode("missing count in Content-Range".to_string()))
    }

    /// Cheap reachability probe for health checks.
    pub async fn ping(&self) -> Result<Duration, StoreError> {
        let start = Instant::now();
        self.count("personal_info", &[]).await?;
        Ok(start.elapsed())
    }

    fn eq_params(filters: &[(&str, String)]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|(field, value)| (field.to_string(), format!("eq.{value}")))
            .collect()
    }

    async fn decode_rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn expect_success(response: reqwest::Response) -> Result<(), StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

/// Parse the total out of a `Content-Range` value like `0-24/3573` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

/// Register the process-wide store handle. First caller wins.
pub fn init_store(config: &StoreConfig) -> Arc<Store> {
    let store = Arc::new(Store::new(config));
    let _ = STORE.set(store.clone());
    store
}

pub fn get_store() -> Option<Arc<Store>> {
    STORE.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Store {
        Store::new(&StoreConfig {
            base_url: "https://example.supabase.co".to_string(),
            api_key: "anon-key".to_string(),
        })
    }

    #[test]
    fn test_collection_url_shape() {
        let store = test_store();
        assert_eq!(
            store.collection_url("content_blocks"),
            "https://example.supabase.co/rest/v1/content_blocks"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url_is_tolerated() {
        let store = Store::new(&StoreConfig {
            base_url: "https://example.supabase.co/".to_string(),
            api_key: "anon-key".to_string(),
        });
        assert_eq!(
            store.collection_url("skills"),
            "https://example.supabase.co/rest/v1/skills"
        );
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_eq_params_wrap_values() {
        let params = Store::eq_params(&[("project_id", "9".to_string())]);
        assert_eq!(params, vec![("project_id".to_string(), "eq.9".to_string())]);
    }
}
