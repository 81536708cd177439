//! Activity sessions and the calories burnt during each.

use chrono::{DateTime, Local, Utc};
use gfit_client::{Activity, DateRange, Moment, NormalizedBatch, Timeline};

#[derive(Clone, Debug, PartialEq)]
pub struct Session<T> {
    pub activity: Activity,
    pub range: DateRange<T>,
    pub calories: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report<T> {
    pub range: DateRange<T>,
    pub sessions: Vec<Session<T>>,
    pub total_calories: f64,
    /// Calories burnt outside any session.
    pub unattributed_calories: f64,
}

/// Merge activity segments into sessions.
///
/// Segments are taken in range order. A segment joins the previous session
/// when both have the same activity and the session is near the segment.
pub fn sessions<T: Timeline>(
    activity: &NormalizedBatch<T>,
    tolerance: T::Span,
) -> Vec<Session<T>> {
    let mut segments: Vec<(DateRange<T>, Activity)> = activity
        .points
        .iter()
        .filter_map(|point| {
            let code = point.value.as_i64()?;
            let Some(activity) = Activity::from_code(code) else {
                tracing::debug!(code, "skipping unknown activity code");
                return None;
            };
            Some((point.interval, activity))
        })
        .collect();
    segments.sort();

    let mut merged: Vec<Session<T>> = Vec::new();
    for (range, activity) in segments {
        match merged.last_mut() {
            Some(last)
                if last.activity == activity && last.range.near_within(range, tolerance) =>
            {
                last.range = last.range.combine(&range);
            }
            _ => merged.push(Session {
                activity,
                range,
                calories: 0.0,
            }),
        }
    }
    merged
}

/// Add each calorie point to the first session holding its start instant.
/// A point starting exactly at a session's end belongs to the next one.
/// Returns the calories that matched no session.
pub fn attribute_calories<T: Timeline>(
    sessions: &mut [Session<T>],
    calories: &NormalizedBatch<T>,
) -> f64 {
    let mut unattributed = 0.0;
    for point in &calories.points {
        let Some(kcal) = point.value.as_f64() else {
            continue;
        };
        let start = point.interval.start();
        let owner = sessions
            .iter_mut()
            .find(|s| s.range.contains(Moment::Instant(start)) && start < s.range.end());
        match owner {
            Some(session) => session.calories += kcal,
            None => unattributed += kcal,
        }
    }
    unattributed
}

pub fn build_report<T: Timeline>(
    calories: &NormalizedBatch<T>,
    activity: &NormalizedBatch<T>,
    tolerance: T::Span,
) -> Report<T> {
    let mut sessions = sessions(activity, tolerance);
    let unattributed_calories = attribute_calories(&mut sessions, calories);
    Report {
        range: calories.interval.combine(&activity.interval),
        sessions,
        total_calories: calories.total(),
        unattributed_calories,
    }
}

/// One line per session, in local time.
pub fn render(report: &Report<DateTime<Utc>>) -> Vec<String> {
    report
        .sessions
        .iter()
        .map(|s| {
            let start = s.range.start().with_timezone(&Local);
            let mfp = s
                .activity
                .mfp_id()
                .map(|id| format!("  mfp {id}"))
                .unwrap_or_default();
            format!(
                "{}  {:>4} min  {:<24} {:>8.1} kcal{}",
                start.format("%Y-%m-%d %H:%M"),
                s.range.duration().num_minutes(),
                s.activity.name(),
                s.calories,
                mfp
            )
        })
        .collect()
}
