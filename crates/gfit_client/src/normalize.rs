//! Conversion of raw dataset responses into interval-keyed data points.
//!
//! The raw types mirror the Fitness REST dataset shape (`minStartTimeNs`,
//! `point[].startTimeNanos`, `point[].value[]`, ...). Timestamps are turned
//! into the caller's time domain by a conversion function taking epoch
//! seconds, so the pipeline itself has no time zone policy.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::date_range::{DateRange, Timeline};
use crate::{GfitError, MalformedSample};

/// One dataset response.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawDataset {
    #[serde(
        rename = "minStartTimeNs",
        alias = "min_start_time_ns",
        deserialize_with = "deserialize_nanos"
    )]
    pub min_start_time_ns: i64,
    #[serde(
        rename = "maxEndTimeNs",
        alias = "max_end_time_ns",
        deserialize_with = "deserialize_nanos"
    )]
    pub max_end_time_ns: i64,
    #[serde(rename = "point", alias = "points", default)]
    pub points: Option<Vec<RawPoint>>,
    #[serde(rename = "dataSourceId", default)]
    pub data_source_id: Option<String>,
}

/// One sample inside a dataset.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawPoint {
    #[serde(
        rename = "startTimeNanos",
        alias = "start_time_ns",
        deserialize_with = "deserialize_nanos"
    )]
    pub start_time_ns: i64,
    #[serde(
        rename = "endTimeNanos",
        alias = "end_time_ns",
        deserialize_with = "deserialize_nanos"
    )]
    pub end_time_ns: i64,
    #[serde(rename = "value", alias = "values", default)]
    pub values: Vec<Map<String, Value>>,
    #[serde(rename = "dataTypeName", default)]
    pub data_type_name: Option<String>,
}

/// The API encodes int64 as strings; plain numbers are accepted too.
fn deserialize_nanos<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|e| D::Error::custom(format!("invalid nanosecond timestamp {s:?}: {e}"))),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole_nanos))
            .ok_or_else(|| D::Error::custom(format!("invalid nanosecond timestamp {n}"))),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Floats are only accepted when they hold an exact in-range integer.
fn whole_nanos(f: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// A single sample value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn from_json(key: &str, value: &Value) -> Result<Self, MalformedSample> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_f64().map(Scalar::Float))
                .ok_or_else(|| MalformedSample::NonScalar {
                    key: key.to_string(),
                    found: n.to_string(),
                }),
            Value::String(s) => Ok(Scalar::Text(s.clone())),
            other => Err(MalformedSample::NonScalar {
                key: key.to_string(),
                found: other.to_string(),
            }),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint<T> {
    pub interval: DateRange<T>,
    pub value: Scalar,
}

/// A normalized dataset: the covering interval of the request plus its
/// points in response order.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedBatch<T> {
    pub interval: DateRange<T>,
    pub points: Vec<DataPoint<T>>,
}

impl<T: Timeline> NormalizedBatch<T> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of all numeric values; text values are ignored.
    pub fn total(&self) -> f64 {
        self.points.iter().filter_map(|p| p.value.as_f64()).sum()
    }

    pub fn points_overlapping<'a>(
        &'a self,
        range: &'a DateRange<T>,
    ) -> impl Iterator<Item = &'a DataPoint<T>> + 'a {
        self.points.iter().filter(move |p| range.contains(&p.interval))
    }
}

pub fn nanos_to_seconds(ns: i64) -> f64 {
    ns as f64 / 1e9
}

/// Epoch seconds to a UTC timestamp, `None` when non-finite or out of range.
pub fn utc_from_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let mut nanos = ((secs - whole) * 1e9).round() as i64;
    let mut whole = whole as i64;
    if nanos >= 1_000_000_000 {
        whole = whole.checked_add(1)?;
        nanos -= 1_000_000_000;
    }
    DateTime::from_timestamp(whole, nanos as u32)
}

/// Like [`utc_from_seconds`] but in the host's local time zone.
pub fn local_from_seconds(secs: f64) -> Option<DateTime<Local>> {
    utc_from_seconds(secs).map(|t| t.with_timezone(&Local))
}

fn to_timestamp<T, F>(ns: i64, convert: &F) -> Result<T, GfitError>
where
    F: Fn(f64) -> Option<T>,
{
    let secs = nanos_to_seconds(ns);
    convert(secs).ok_or(GfitError::InvalidTimestamp(secs))
}

/// Turn one raw sample into a [`DataPoint`].
///
/// The sample must carry exactly one value entry, and that entry must hold
/// `value_key`. Zero-length samples fail like any other invalid range.
pub fn normalize_point<T, F>(
    raw: &RawPoint,
    value_key: &str,
    convert: F,
) -> Result<DataPoint<T>, GfitError>
where
    T: Timeline,
    F: Fn(f64) -> Option<T>,
{
    let [entry] = raw.values.as_slice() else {
        return Err(MalformedSample::ValueCount(raw.values.len()).into());
    };

    let interval = DateRange::new(
        to_timestamp(raw.start_time_ns, &convert)?,
        to_timestamp(raw.end_time_ns, &convert)?,
    )?;

    let value = entry
        .get(value_key)
        .ok_or_else(|| MalformedSample::MissingKey(value_key.to_string()))?;

    Ok(DataPoint {
        interval,
        value: Scalar::from_json(value_key, value)?,
    })
}

/// Normalize a whole dataset. Any malformed point fails the batch.
pub fn normalize_batch<T, F>(
    raw: &RawDataset,
    value_key: &str,
    convert: F,
) -> Result<NormalizedBatch<T>, GfitError>
where
    T: Timeline,
    F: Fn(f64) -> Option<T>,
{
    let interval = DateRange::new(
        to_timestamp(raw.min_start_time_ns, &convert)?,
        to_timestamp(raw.max_end_time_ns, &convert)?,
    )?;

    let points = raw
        .points
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|point| normalize_point(point, value_key, &convert))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NormalizedBatch { interval, points })
}
