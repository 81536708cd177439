//! Closed time spans and the relations between them.
//!
//! A [`DateRange`] is an immutable `[start, end]` pair with `start < end`.
//! Ranges can be tested against a single instant or another range through
//! [`Moment`], ordered by start then end, and merged into covering spans.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde_json::Value;

use crate::GfitError;
use crate::normalize::utc_from_seconds;

/// Default proximity window used by [`DateRange::near`], in seconds.
pub const DEFAULT_NEAR_SECS: i64 = 10 * 60;

/// A point on a linear, ordered time axis.
pub trait Timeline: Copy + Ord + Hash + fmt::Debug {
    /// Difference between two points.
    type Span: Copy + Ord + fmt::Debug;

    fn since(self, earlier: Self) -> Self::Span;

    /// Move earlier by `span`, saturating at the earliest representable point.
    fn shift_back(self, span: Self::Span) -> Self;

    /// Move later by `span`, saturating at the latest representable point.
    fn shift_forward(self, span: Self::Span) -> Self;

    fn zero_span() -> Self::Span;

    fn default_tolerance() -> Self::Span;

    /// Drop anything finer than a whole second.
    fn truncate_span(span: Self::Span) -> Self::Span;
}

/// Plain second ticks.
impl Timeline for i64 {
    type Span = i64;

    fn since(self, earlier: Self) -> i64 {
        self.saturating_sub(earlier)
    }

    fn shift_back(self, span: i64) -> Self {
        self.saturating_sub(span)
    }

    fn shift_forward(self, span: i64) -> Self {
        self.saturating_add(span)
    }

    fn zero_span() -> i64 {
        0
    }

    fn default_tolerance() -> i64 {
        DEFAULT_NEAR_SECS
    }

    fn truncate_span(span: i64) -> i64 {
        span
    }
}

impl<Tz> Timeline for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    type Span = TimeDelta;

    fn since(self, earlier: Self) -> TimeDelta {
        self.signed_duration_since(earlier)
    }

    fn shift_back(self, span: TimeDelta) -> Self {
        self.checked_sub_signed(span).unwrap_or_else(|| {
            self.timezone()
                .from_utc_datetime(&DateTime::<Utc>::MIN_UTC.naive_utc())
        })
    }

    fn shift_forward(self, span: TimeDelta) -> Self {
        self.checked_add_signed(span).unwrap_or_else(|| {
            self.timezone()
                .from_utc_datetime(&DateTime::<Utc>::MAX_UTC.naive_utc())
        })
    }

    fn zero_span() -> TimeDelta {
        TimeDelta::zero()
    }

    fn default_tolerance() -> TimeDelta {
        TimeDelta::seconds(DEFAULT_NEAR_SECS)
    }

    fn truncate_span(span: TimeDelta) -> TimeDelta {
        TimeDelta::seconds(span.num_seconds())
    }
}

impl Timeline for NaiveDateTime {
    type Span = TimeDelta;

    fn since(self, earlier: Self) -> TimeDelta {
        self.signed_duration_since(earlier)
    }

    fn shift_back(self, span: TimeDelta) -> Self {
        self.checked_sub_signed(span).unwrap_or(NaiveDateTime::MIN)
    }

    fn shift_forward(self, span: TimeDelta) -> Self {
        self.checked_add_signed(span).unwrap_or(NaiveDateTime::MAX)
    }

    fn zero_span() -> TimeDelta {
        TimeDelta::zero()
    }

    fn default_tolerance() -> TimeDelta {
        TimeDelta::seconds(DEFAULT_NEAR_SECS)
    }

    fn truncate_span(span: TimeDelta) -> TimeDelta {
        TimeDelta::seconds(span.num_seconds())
    }
}

/// Closed span `[start, end]` with `start < end`.
///
/// Ordering is by `start`, then by `end`: of two ranges starting together
/// the one ending first sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateRange<T> {
    start: T,
    end: T,
}

/// What a range can be tested against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Moment<T> {
    Instant(T),
    Range(DateRange<T>),
}

impl<T: Timeline> DateRange<T> {
    pub fn new(start: T, end: T) -> Result<Self, GfitError> {
        if start >= end {
            return Err(GfitError::InvalidRange {
                start: format!("{start:?}"),
                end: format!("{end:?}"),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn end(&self) -> T {
        self.end
    }

    pub fn duration(&self) -> T::Span {
        self.end.since(self.start)
    }

    /// True if an instant lies inside the range (both bounds inclusive), or
    /// if another range overlaps it. Ranges sharing only a boundary overlap.
    pub fn contains(&self, other: impl Into<Moment<T>>) -> bool {
        match other.into() {
            Moment::Instant(at) => self.start <= at && at <= self.end,
            Moment::Range(r) => self.start <= r.end && r.start <= self.end,
        }
    }

    /// [`DateRange::contains`] against this range widened by the default
    /// tolerance on both sides.
    pub fn near(&self, other: impl Into<Moment<T>>) -> bool {
        self.near_within(other, T::default_tolerance())
    }

    pub fn near_within(&self, other: impl Into<Moment<T>>, tolerance: T::Span) -> bool {
        self.widened(tolerance).contains(other)
    }

    /// `[start - tolerance, end + tolerance]`. Negative tolerances count as zero.
    pub fn widened(&self, tolerance: T::Span) -> Self {
        let tolerance = tolerance.max(T::zero_span());
        Self {
            start: self.start.shift_back(tolerance),
            end: self.end.shift_forward(tolerance),
        }
    }

    /// Smallest range covering both, gap included when they are disjoint.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Map both bounds into another timeline, e.g. a different time zone.
    pub fn map<U: Timeline>(&self, f: impl Fn(T) -> U) -> Result<DateRange<U>, GfitError> {
        DateRange::new(f(self.start), f(self.end))
    }
}

impl<T> fmt::Display for DateRange<T>
where
    T: Timeline + fmt::Display,
    T::Span: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DateRange s={} d={}",
            self.start,
            T::truncate_span(self.duration())
        )
    }
}

impl<T: Timeline> From<DateRange<T>> for Moment<T> {
    fn from(range: DateRange<T>) -> Self {
        Moment::Range(range)
    }
}

impl<T: Timeline> From<&DateRange<T>> for Moment<T> {
    fn from(range: &DateRange<T>) -> Self {
        Moment::Range(*range)
    }
}

impl From<i64> for Moment<i64> {
    fn from(at: i64) -> Self {
        Moment::Instant(at)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Moment<DateTime<Tz>> {
    fn from(at: DateTime<Tz>) -> Self {
        Moment::Instant(at)
    }
}

impl From<NaiveDateTime> for Moment<NaiveDateTime> {
    fn from(at: NaiveDateTime) -> Self {
        Moment::Instant(at)
    }
}

/// Accepts an RFC 3339 string or epoch seconds as an instant, and an object
/// with `start` and `end` as a range. Everything else is rejected.
impl TryFrom<&Value> for Moment<DateTime<Utc>> {
    type Error = GfitError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => match (map.get("start"), map.get("end")) {
                (Some(start), Some(end)) => {
                    let range =
                        DateRange::new(instant_from_value(start)?, instant_from_value(end)?)?;
                    Ok(Moment::Range(range))
                }
                _ => Err(GfitError::UnsupportedType(
                    "object without `start` and `end`".into(),
                )),
            },
            other => instant_from_value(other).map(Moment::Instant),
        }
    }
}

fn instant_from_value(value: &Value) -> Result<DateTime<Utc>, GfitError> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| GfitError::UnsupportedType(format!("string `{s}`: {e}"))),
        Value::Number(n) => {
            let secs = n
                .as_f64()
                .ok_or_else(|| GfitError::UnsupportedType(format!("number {n}")))?;
            utc_from_seconds(secs).ok_or(GfitError::InvalidTimestamp(secs))
        }
        Value::Null => Err(GfitError::UnsupportedType("null".into())),
        Value::Bool(b) => Err(GfitError::UnsupportedType(format!("bool {b}"))),
        Value::Array(_) => Err(GfitError::UnsupportedType("array".into())),
        Value::Object(_) => Err(GfitError::UnsupportedType("nested object".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;

    fn r(start: i64, end: i64) -> DateRange<i64> {
        DateRange::new(start, end).expect("valid range")
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 5)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid time")
    }

    fn hash_of<T: Hash>(v: &T) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn create_keeps_bounds() {
        let range = r(1, 2);
        assert_eq!(range.start(), 1);
        assert_eq!(range.end(), 2);
        assert_eq!(range.duration(), 1);
    }

    #[test]
    fn inverted_and_empty_ranges_are_rejected() {
        assert!(matches!(
            DateRange::new(2_i64, 1),
            Err(GfitError::InvalidRange { .. })
        ));
        assert!(matches!(
            DateRange::new(3_i64, 3),
            Err(GfitError::InvalidRange { .. })
        ));
    }

    #[test]
    fn overlapping_ranges_intersect() {
        let range = r(2, 4);
        for (s, e) in [(3, 5), (1, 3), (1, 5), (1, 2), (4, 5)] {
            assert!(range.contains(r(s, e)), "[{s}, {e}] should intersect [2, 4]");
        }
        assert!(range.contains(&range));
    }

    #[test]
    fn separated_ranges_do_not_intersect() {
        let range = r(2, 4);
        assert!(!range.contains(r(5, 6)));
        assert!(!range.contains(r(0, 1)));
    }

    #[test]
    fn instants_on_either_bound_are_contained() {
        let range = r(5, 10);
        assert!(range.contains(5_i64));
        assert!(range.contains(7_i64));
        assert!(range.contains(10_i64));
        assert!(!range.contains(4_i64));
        assert!(!range.contains(11_i64));
    }

    #[test]
    fn near_ranges_clip_the_widened_window() {
        let range = DateRange::new(at(12, 10, 0), at(13, 10, 0)).unwrap();
        let five_minutes = TimeDelta::seconds(300);

        let clips_start = DateRange::new(at(12, 0, 0), at(12, 5, 0)).unwrap();
        let clips_end = DateRange::new(at(13, 15, 0), at(13, 20, 0)).unwrap();
        assert!(range.near_within(clips_start, five_minutes));
        assert!(range.near_within(clips_end, five_minutes));

        let misses_start = DateRange::new(at(12, 0, 0), at(12, 4, 59)).unwrap();
        let misses_end = DateRange::new(at(13, 15, 1), at(13, 20, 0)).unwrap();
        assert!(!range.near_within(misses_start, five_minutes));
        assert!(!range.near_within(misses_end, five_minutes));
    }

    #[test]
    fn near_instants_respect_tolerance_boundary() {
        let range = DateRange::new(at(12, 10, 0), at(13, 10, 0)).unwrap();
        let five_minutes = TimeDelta::seconds(300);
        assert!(range.near_within(at(12, 5, 0), five_minutes));
        assert!(range.near_within(at(13, 15, 0), five_minutes));
        assert!(!range.near_within(at(12, 4, 59), five_minutes));
        assert!(!range.near_within(at(13, 15, 1), five_minutes));
    }

    #[test]
    fn near_uses_ten_minute_default() {
        let range = r(1_000, 2_000);
        assert!(range.near(400_i64));
        assert!(range.near(2_600_i64));
        assert!(!range.near(399_i64));
        assert!(!range.near(2_601_i64));
        assert_eq!(range.near(r(2_500, 3_000)), range.widened(600).contains(r(2_500, 3_000)));
    }

    #[test]
    fn negative_tolerance_does_not_shrink() {
        let range = r(10, 20);
        assert_eq!(range.widened(-5), range);
        assert!(range.near_within(10_i64, -5));
    }

    #[test]
    fn ordering_is_start_then_end() {
        assert!(r(2, 4) < r(2, 5));
        assert!(r(1, 4) < r(2, 4));
        assert!(r(1, 5) < r(2, 4));
        assert!(r(1, 3) < r(2, 4));
        assert!(!(r(2, 4) < r(2, 4)));
        assert!(!(r(2, 4) < r(2, 3)));
        assert!(!(r(3, 4) < r(2, 4)));
        assert!(!(r(3, 5) < r(2, 4)));
        assert!(!(r(3, 4) < r(2, 5)));
        assert_eq!(r(2, 4).cmp(&r(2, 4)), std::cmp::Ordering::Equal);

        let mut ranges = vec![r(3, 4), r(2, 5), r(2, 3), r(1, 9)];
        ranges.sort();
        assert_eq!(ranges, vec![r(1, 9), r(2, 3), r(2, 5), r(3, 4)]);
    }

    #[test]
    fn equal_ranges_hash_identically() {
        let a = DateRange::new(at(12, 0, 0), at(13, 0, 0)).unwrap();
        let b = DateRange::new(at(12, 0, 0), at(13, 0, 0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn combine_produces_covering_span() {
        assert_eq!(r(1, 2).combine(&r(4, 5)), r(1, 5));
        assert_eq!(r(4, 5).combine(&r(1, 2)), r(1, 5));
        assert_eq!(r(1, 3).combine(&r(2, 4)), r(1, 4));
        assert_eq!(r(1, 10).combine(&r(2, 4)), r(1, 10));
    }

    #[test]
    fn display_shows_start_and_whole_seconds() {
        let start = DateTime::from_timestamp(0, 0).unwrap();
        let end = DateTime::from_timestamp(90, 500_000_000).unwrap();
        let text = DateRange::new(start, end).unwrap().to_string();
        assert!(text.contains("1970-01-01"));
        assert!(text.contains("90"));
        assert!(!text.contains("90.5"));
    }

    #[test]
    fn json_moments_are_parsed_or_rejected() {
        let instant =
            Moment::<DateTime<Utc>>::try_from(&serde_json::json!("2000-01-05T12:00:00Z")).unwrap();
        assert!(matches!(instant, Moment::Instant(_)));

        let range =
            Moment::<DateTime<Utc>>::try_from(&serde_json::json!({"start": 1.0, "end": 2.0}))
                .unwrap();
        assert!(matches!(range, Moment::Range(_)));

        for bad in [
            serde_json::json!(null),
            serde_json::json!(true),
            serde_json::json!([1, 2]),
            serde_json::json!({"start": 1.0}),
            serde_json::json!("yesterday"),
        ] {
            let res = Moment::<DateTime<Utc>>::try_from(&bad);
            assert!(
                matches!(res, Err(GfitError::UnsupportedType(_))),
                "{bad} should be unsupported"
            );
        }

        let inverted =
            Moment::<DateTime<Utc>>::try_from(&serde_json::json!({"start": 2.0, "end": 1.0}));
        assert!(matches!(inverted, Err(GfitError::InvalidRange { .. })));
    }

    #[test]
    fn widening_saturates_at_representable_limits() {
        let lo = DateTime::<Utc>::MIN_UTC;
        let hi = DateTime::<Utc>::MAX_UTC;
        let early = DateRange::new(lo + TimeDelta::minutes(1), lo + TimeDelta::hours(1)).unwrap();
        let widened = early.widened(TimeDelta::days(1));
        assert_eq!(widened.start(), lo);
        assert_eq!(widened.end(), lo + TimeDelta::hours(1) + TimeDelta::days(1));
        assert!(early.near_within(lo, TimeDelta::days(1)));

        let late = DateRange::new(hi - TimeDelta::hours(1), hi - TimeDelta::minutes(1)).unwrap();
        assert_eq!(late.widened(TimeDelta::days(1)).end(), hi);
        assert!(late.near_within(hi, TimeDelta::days(1)));

        let naive = DateRange::new(
            NaiveDateTime::MIN + TimeDelta::minutes(1),
            NaiveDateTime::MAX - TimeDelta::minutes(1),
        )
        .unwrap();
        let widened = naive.widened(TimeDelta::days(1));
        assert_eq!(widened.start(), NaiveDateTime::MIN);
        assert_eq!(widened.end(), NaiveDateTime::MAX);
    }

    #[test]
    fn map_converts_time_zone() {
        let utc = DateRange::new(
            DateTime::from_timestamp(0, 0).unwrap(),
            DateTime::from_timestamp(60, 0).unwrap(),
        )
        .unwrap();
        let naive = utc.map(|t| t.naive_utc()).unwrap();
        assert_eq!(naive.duration(), TimeDelta::seconds(60));
    }
}
