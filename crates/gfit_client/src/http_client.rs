//! HTTP client implementation for the Fitness REST API.
//!
//! This module provides a reqwest-based implementation of the [`FitClient`](crate::FitClient) trait.

use crate::date_range::DateRange;
use crate::normalize::{self, NormalizedBatch, RawDataset};
use crate::retry::RetryPolicy;
use crate::{DataSource, FitClient, GfitError, observability};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Client for the Fitness REST API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestFitClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ReqwestFitClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The API root (e.g., "https://www.googleapis.com")
    /// * `access_token` - An already issued OAuth access token
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client: reqwest::Client::new(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Dataset identifier for a range: `"{start_ns}-{end_ns}"`.
    pub fn dataset_id(range: &DateRange<DateTime<Utc>>) -> Result<String, GfitError> {
        let nanos = |t: DateTime<Utc>| {
            t.timestamp_nanos_opt()
                .ok_or(GfitError::InvalidTimestamp(t.timestamp() as f64))
        };
        Ok(format!("{}-{}", nanos(range.start())?, nanos(range.end())?))
    }

    fn dataset_url(
        &self,
        source: DataSource,
        range: &DateRange<DateTime<Utc>>,
    ) -> Result<String, GfitError> {
        Ok(format!(
            "{}/fitness/v1/users/me/dataSources/{}/datasets/{}",
            self.base_url,
            source.id(),
            Self::dataset_id(range)?
        ))
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// Execute a request and decode the JSON body.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GfitError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        // Decode from text so malformed payloads surface as `Decode` errors.
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> GfitError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        GfitError::from_status(status, body_snippet)
    }

    async fn fetch_batch(
        &self,
        source: DataSource,
        range: &DateRange<DateTime<Utc>>,
    ) -> Result<NormalizedBatch<DateTime<Utc>>, GfitError> {
        let raw = self.get_dataset(source, range).await?;
        match normalize::normalize_batch(&raw, source.value_key(), normalize::utc_from_seconds) {
            Ok(batch) => {
                tracing::debug!(
                    source = source.label(),
                    points = batch.len(),
                    "normalized dataset"
                );
                observability::record_fetch(source, batch.len());
                Ok(batch)
            }
            Err(e) => {
                observability::record_fetch_error(source, &e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl FitClient for ReqwestFitClient {
    async fn get_dataset(
        &self,
        source: DataSource,
        range: &DateRange<DateTime<Utc>>,
    ) -> Result<RawDataset, GfitError> {
        let url = self.dataset_url(source, range)?;
        tracing::debug!(source = source.label(), %url, "fetching dataset");
        let url = url.as_str();
        let result = self
            .retry
            .retry_async_when(
                move || self.execute_json::<RawDataset>(self.get_request(url)),
                GfitError::is_transient,
            )
            .await;
        if let Err(e) = &result {
            tracing::warn!(source = source.label(), error = %e, "dataset fetch failed");
            observability::record_fetch_error(source, e);
        }
        result
    }

    async fn get_calorie_data(
        &self,
        range: &DateRange<DateTime<Utc>>,
    ) -> Result<NormalizedBatch<DateTime<Utc>>, GfitError> {
        self.fetch_batch(DataSource::Calories, range).await
    }

    async fn get_activity_data(
        &self,
        range: &DateRange<DateTime<Utc>>,
    ) -> Result<NormalizedBatch<DateTime<Utc>>, GfitError> {
        self.fetch_batch(DataSource::Activity, range).await
    }
}
