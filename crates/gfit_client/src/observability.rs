//! Counters emitted by the fetch path. Without an installed recorder these
//! are no-ops.

use crate::{DataSource, GfitError};

pub const POINTS_FETCHED: &str = "gfit_points_fetched_total";
pub const FETCH_ERRORS: &str = "gfit_fetch_errors_total";

pub fn record_fetch(source: DataSource, points: usize) {
    metrics::counter!(POINTS_FETCHED, "source" => source.label()).increment(points as u64);
}

pub fn record_fetch_error(source: DataSource, err: &GfitError) {
    metrics::counter!(FETCH_ERRORS, "source" => source.label(), "kind" => err.kind()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_harmless() {
        record_fetch(DataSource::Calories, 3);
        record_fetch_error(DataSource::Activity, &GfitError::from_status(500, String::new()));
    }

    #[test]
    fn error_kinds_are_stable_labels() {
        assert_eq!(GfitError::from_status(404, String::new()).kind(), "not_found");
        assert_eq!(GfitError::InvalidTimestamp(0.0).kind(), "invalid_timestamp");
    }
}
