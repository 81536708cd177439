//! Google Fit dataset client with an interval model for normalized samples.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod activities;
pub mod config;
pub mod date_range;
pub mod http_client;
pub mod normalize;
pub mod observability;
pub mod retry;

pub use activities::Activity;
pub use date_range::{DateRange, Moment, Timeline};
pub use normalize::{DataPoint, NormalizedBatch, RawDataset, RawPoint, Scalar};

#[derive(Debug, Error)]
pub enum GfitError {
    #[error("invalid range: start {start} is not before end {end}")]
    InvalidRange { start: String, end: String },
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    #[error("malformed sample: {0}")]
    MalformedSample(#[from] MalformedSample),
    #[error("timestamp out of range: {0}s")]
    InvalidTimestamp(f64),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a raw point sample could not be normalized.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MalformedSample {
    #[error("expected exactly one value, got {0}")]
    ValueCount(usize),
    #[error("value key `{0}` not found")]
    MissingKey(String),
    #[error("value under `{key}` is not a scalar: {found}")]
    NonScalar { key: String, found: String },
}

impl GfitError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => GfitError::Auth(body),
            404 => GfitError::NotFound(body),
            _ => GfitError::Api { status, body },
        }
    }

    /// Whether a retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            GfitError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            GfitError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GfitError::InvalidRange { .. } => "invalid_range",
            GfitError::UnsupportedType(_) => "unsupported_type",
            GfitError::MalformedSample(_) => "malformed_sample",
            GfitError::InvalidTimestamp(_) => "invalid_timestamp",
            GfitError::Http(_) => "http",
            GfitError::Auth(_) => "auth",
            GfitError::NotFound(_) => "not_found",
            GfitError::Api { .. } => "api",
            GfitError::Decode(_) => "decode",
            GfitError::Config(_) => "config",
        }
    }
}

/// Derived data sources exposed by the Fitness REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataSource {
    Calories,
    Activity,
}

impl DataSource {
    pub fn id(&self) -> &'static str {
        match self {
            DataSource::Calories => {
                "derived:com.google.calories.expended:com.google.android.gms:from_activities"
            }
            DataSource::Activity => {
                "derived:com.google.activity.segment:com.google.android.gms:merge_activity_segments"
            }
        }
    }

    /// Key of the scalar inside each point's value entry.
    pub fn value_key(&self) -> &'static str {
        match self {
            DataSource::Calories => "fpVal",
            DataSource::Activity => "intVal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Calories => "calories",
            DataSource::Activity => "activity",
        }
    }
}

#[async_trait]
pub trait FitClient: Send + Sync + 'static {
    /// Fetch the raw dataset of `source` covering `range`.
    async fn get_dataset(
        &self,
        source: DataSource,
        range: &DateRange<DateTime<Utc>>,
    ) -> Result<RawDataset, GfitError>;

    /// Calories expended, one point per sample with a float value.
    async fn get_calorie_data(
        &self,
        range: &DateRange<DateTime<Utc>>,
    ) -> Result<NormalizedBatch<DateTime<Utc>>, GfitError>;

    /// Merged activity segments, one point per segment with the activity code.
    async fn get_activity_data(
        &self,
        range: &DateRange<DateTime<Utc>>,
    ) -> Result<NormalizedBatch<DateTime<Utc>>, GfitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_maps_auth_and_not_found() {
        assert!(matches!(
            GfitError::from_status(401, "no".into()),
            GfitError::Auth(_)
        ));
        assert!(matches!(
            GfitError::from_status(403, "no".into()),
            GfitError::Auth(_)
        ));
        assert!(matches!(
            GfitError::from_status(404, "gone".into()),
            GfitError::NotFound(_)
        ));
        assert!(matches!(
            GfitError::from_status(500, "boom".into()),
            GfitError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn only_throttling_and_server_errors_are_transient() {
        assert!(GfitError::from_status(429, String::new()).is_transient());
        assert!(GfitError::from_status(503, String::new()).is_transient());
        assert!(!GfitError::from_status(400, String::new()).is_transient());
        assert!(!GfitError::from_status(401, String::new()).is_transient());
        assert!(!GfitError::MalformedSample(MalformedSample::ValueCount(0)).is_transient());
    }

    #[test]
    fn data_source_value_keys() {
        assert_eq!(DataSource::Calories.value_key(), "fpVal");
        assert_eq!(DataSource::Activity.value_key(), "intVal");
        assert!(DataSource::Activity.id().contains("activity.segment"));
    }
}
