//! Summary and trend aggregation over entry streams.
//!
//! Every report is a reduce: records are pushed into an accumulator, grouped
//! by an optional bucket key, then finalized. Nothing here touches the store,
//! so both backends feed the same code.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::exercise::{ExerciseEntry, ExerciseType};
use crate::models::mood::{MoodEntry, MoodType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl TrendPeriod {
    /// `weekly` when absent; unrecognised values fall back to `daily`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("weekly") => TrendPeriod::Weekly,
            Some("monthly") => TrendPeriod::Monthly,
            Some(_) => TrendPeriod::Daily,
        }
    }

    pub fn key(&self, at: DateTime<Utc>) -> BucketKey {
        match self {
            TrendPeriod::Daily => BucketKey::Day(at.format("%Y-%m-%d").to_string()),
            TrendPeriod::Weekly => BucketKey::Number(at.iso_week().week()),
            TrendPeriod::Monthly => BucketKey::Number(at.month()),
        }
    }
}

/// Daily buckets are keyed `YYYY-MM-DD`; weekly and monthly buckets by the
/// ISO week number or calendar month number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum BucketKey {
    Day(String),
    Number(u32),
}

pub trait Accumulate: Default {
    type Item;
    type Output;

    fn push(&mut self, item: &Self::Item);
    fn finish(self) -> Self::Output;
}

/// Mean over the values that are present; zero when none are.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSummary {
    pub total_entries: u64,
    pub average_mood: f64,
    pub average_stress: f64,
    pub average_energy: f64,
    pub average_sleep: f64,
    pub mood_types: Vec<MoodType>,
}

#[derive(Debug, Default)]
pub struct MoodAccumulator {
    count: u64,
    mood: Mean,
    stress: Mean,
    energy: Mean,
    sleep: Mean,
    types: BTreeSet<MoodType>,
}

impl Accumulate for MoodAccumulator {
    type Item = MoodEntry;
    type Output = MoodSummary;

    fn push(&mut self, entry: &MoodEntry) {
        self.count += 1;
        self.mood.push(Some(entry.mood_level as f64));
        self.stress.push(entry.stress_level.map(f64::from));
        self.energy.push(entry.energy_level.map(f64::from));
        self.sleep.push(entry.sleep_hours);
        self.types.insert(entry.mood_type);
    }

    fn finish(self) -> MoodSummary {
        MoodSummary {
            total_entries: self.count,
            average_mood: self.mood.value(),
            average_stress: self.stress.value(),
            average_energy: self.energy.value(),
            average_sleep: self.sleep.value(),
            mood_types: self.types.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummary {
    pub total_sessions: u64,
    pub total_duration: i64,
    pub average_duration: f64,
    pub total_calories: f64,
    pub total_distance: f64,
    pub total_steps: i64,
    pub average_mood_before: f64,
    pub average_mood_after: f64,
    pub average_mood_improvement: f64,
}

#[derive(Debug, Default)]
pub struct ExerciseAccumulator {
    count: u64,
    duration: i64,
    calories: f64,
    distance: f64,
    steps: i64,
    mood_before: Mean,
    mood_after: Mean,
    improvement: Mean,
}

impl Accumulate for ExerciseAccumulator {
    type Item = ExerciseEntry;
    type Output = ExerciseSummary;

    fn push(&mut self, entry: &ExerciseEntry) {
        self.count += 1;
        // steps and duration have no upper bound
        self.duration = self.duration.saturating_add(i64::from(entry.duration));
        self.calories += entry.calories_burned.unwrap_or(0.0);
        self.distance += entry.distance.unwrap_or(0.0);
        self.steps = self.steps.saturating_add(entry.steps.unwrap_or(0));
        self.mood_before.push(entry.mood_before.map(f64::from));
        self.mood_after.push(entry.mood_after.map(f64::from));
        self.improvement.push(entry.mood_improvement().map(f64::from));
    }

    fn finish(self) -> ExerciseSummary {
        let average_duration = if self.count == 0 {
            0.0
        } else {
            self.duration as f64 / self.count as f64
        };
        ExerciseSummary {
            total_sessions: self.count,
            total_duration: self.duration,
            average_duration,
            total_calories: self.calories,
            total_distance: self.distance,
            total_steps: self.steps,
            average_mood_before: self.mood_before.value(),
            average_mood_after: self.mood_after.value(),
            average_mood_improvement: self.improvement.value(),
        }
    }
}

fn reduce<'a, A, I>(items: I) -> A::Output
where
    A: Accumulate,
    A::Item: 'a,
    I: IntoIterator<Item = &'a A::Item>,
{
    let mut acc = A::default();
    for item in items {
        acc.push(item);
    }
    acc.finish()
}

fn group_by<'a, K, A, I, F>(items: I, key: F) -> BTreeMap<K, A>
where
    K: Ord,
    A: Accumulate,
    A::Item: 'a,
    I: IntoIterator<Item = &'a A::Item>,
    F: Fn(&A::Item) -> K,
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTypeCount {
    pub mood_type: MoodType,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodReport {
    pub summary: MoodSummary,
    pub mood_type_stats: Vec<MoodTypeCount>,
}

pub fn summarize_moods(entries: &[MoodEntry]) -> MoodReport {
    let summary = reduce::<MoodAccumulator, _>(entries);

    let mut mood_type_stats: Vec<MoodTypeCount> =
        group_by::<_, MoodAccumulator, _, _>(entries, |e| e.mood_type)
            .into_iter()
            .map(|(mood_type, acc)| MoodTypeCount {
                mood_type,
                count: acc.count,
            })
            .collect();
    // stable: ties keep enum order
    mood_type_stats.sort_by(|a, b| b.count.cmp(&a.count));

    MoodReport {
        summary,
        mood_type_stats,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTypeStat {
    pub exercise_type: ExerciseType,
    pub count: u64,
    pub total_duration: i64,
    pub average_mood_improvement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseReport {
    pub summary: ExerciseSummary,
    pub exercise_type_stats: Vec<ExerciseTypeStat>,
}

pub fn summarize_exercise(entries: &[ExerciseEntry]) -> ExerciseReport {
    let summary = reduce::<ExerciseAccumulator, _>(entries);

    let mut exercise_type_stats: Vec<ExerciseTypeStat> =
        group_by::<_, ExerciseAccumulator, _, _>(entries, |e| e.exercise_type)
            .into_iter()
            .map(|(exercise_type, acc)| {
                let s = acc.finish();
                ExerciseTypeStat {
                    exercise_type,
                    count: s.total_sessions,
                    total_duration: s.total_duration,
                    average_mood_improvement: s.average_mood_improvement,
                }
            })
            .collect();
    exercise_type_stats.sort_by(|a, b| b.count.cmp(&a.count));

    ExerciseReport {
        summary,
        exercise_type_stats,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend<S> {
    pub period: BucketKey,
    #[serde(flatten)]
    pub summary: S,
}

fn trends<'a, A, I, F>(items: I, period: TrendPeriod, date_of: F) -> Vec<Trend<A::Output>>
where
    A: Accumulate,
    A::Item: 'a,
    I: IntoIterator<Item = &'a A::Item>,
    F: Fn(&A::Item) -> DateTime<Utc>,
{
    group_by::<_, A, _, _>(items, |item| period.key(date_of(item)))
        .into_iter()
        .map(|(key, acc)| Trend {
            period: key,
            summary: acc.finish(),
        })
        .collect()
}

pub fn mood_trends(entries: &[MoodEntry], period: TrendPeriod) -> Vec<Trend<MoodSummary>> {
    trends::<MoodAccumulator, _, _>(entries, period, |e| e.date)
}

pub fn exercise_trends(
    entries: &[ExerciseEntry],
    period: TrendPeriod,
) -> Vec<Trend<ExerciseSummary>> {
    trends::<ExerciseAccumulator, _, _>(entries, period, |e| e.date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn mood(level: i32, kind: &str, stress: Option<i32>, at: DateTime<Utc>) -> MoodEntry {
        let mut entry = MoodEntry::new(
            "u",
            serde_json::from_value(json!({ "moodLevel": level, "moodType": kind })).unwrap(),
        );
        entry.stress_level = stress;
        entry.date = at;
        entry
    }

    fn workout(kind: &str, minutes: i32, before: Option<i32>, after: Option<i32>) -> ExerciseEntry {
        let mut entry = ExerciseEntry::new(
            "u",
            serde_json::from_value(json!({
                "exerciseType": kind,
                "duration": minutes,
                "intensity": "moderate",
            }))
            .unwrap(),
        );
        entry.mood_before = before;
        entry.mood_after = after;
        entry
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_summaries_are_zero() {
        let moods = summarize_moods(&[]);
        assert_eq!(moods.summary.total_entries, 0);
        assert_eq!(moods.summary.average_mood, 0.0);
        assert!(moods.mood_type_stats.is_empty());

        let exercise = summarize_exercise(&[]);
        assert_eq!(exercise.summary.total_sessions, 0);
        assert_eq!(exercise.summary.total_duration, 0);
        assert_eq!(exercise.summary.average_mood_improvement, 0.0);

        let body = serde_json::to_value(&exercise).unwrap();
        assert!(body["summary"]
            .as_object()
            .unwrap()
            .values()
            .all(|v| !v.is_null()));
    }

    #[test]
    fn test_exercise_totals_saturate() {
        let mut big = workout("walking", i32::MAX, None, None);
        big.steps = Some(i64::MAX);
        let entries = vec![big.clone(), big];

        let report = summarize_exercise(&entries);
        assert_eq!(report.summary.total_sessions, 2);
        assert_eq!(report.summary.total_steps, i64::MAX);
        assert_eq!(report.summary.total_duration, 2 * i64::from(i32::MAX));

        let trends = exercise_trends(&entries, TrendPeriod::Daily);
        assert_eq!(trends[0].summary.total_steps, i64::MAX);
    }

    #[test]
    fn test_mood_averages_skip_missing_values() {
        let entries = vec![
            mood(4, "sad", Some(8), at(2024, 1, 1)),
            mood(8, "happy", None, at(2024, 1, 2)),
            mood(6, "happy", Some(4), at(2024, 1, 3)),
        ];
        let report = summarize_moods(&entries);
        assert_eq!(report.summary.total_entries, 3);
        assert_eq!(report.summary.average_mood, 6.0);
        assert_eq!(report.summary.average_stress, 6.0);
        assert_eq!(report.summary.average_energy, 0.0);
        assert_eq!(report.summary.mood_types, vec![MoodType::Happy, MoodType::Sad]);
        assert_eq!(report.mood_type_stats[0].mood_type, MoodType::Happy);
        assert_eq!(report.mood_type_stats[0].count, 2);
    }

    #[test]
    fn test_exercise_type_grouping() {
        let entries = vec![
            workout("yoga", 30, Some(4), Some(7)),
            workout("running", 20, Some(5), Some(6)),
            workout("yoga", 45, Some(3), Some(8)),
            workout("yoga", 15, None, Some(9)),
        ];
        let report = summarize_exercise(&entries);
        assert_eq!(report.summary.total_sessions, 4);
        assert_eq!(report.summary.total_duration, 110);
        assert_eq!(report.summary.average_duration, 27.5);

        let yoga = &report.exercise_type_stats[0];
        assert_eq!(yoga.exercise_type, ExerciseType::Yoga);
        assert_eq!(yoga.count, 3);
        assert_eq!(yoga.total_duration, 90);
        assert_eq!(yoga.average_mood_improvement, 4.0);

        let running = &report.exercise_type_stats[1];
        assert_eq!(running.average_mood_improvement, 1.0);
    }

    #[test]
    fn test_period_keys() {
        let day = at(2024, 1, 1);
        assert_eq!(TrendPeriod::Daily.key(day), BucketKey::Day("2024-01-01".into()));
        assert_eq!(TrendPeriod::Weekly.key(day), BucketKey::Number(1));
        assert_eq!(TrendPeriod::Monthly.key(at(2024, 7, 31)), BucketKey::Number(7));

        assert_eq!(TrendPeriod::parse(None), TrendPeriod::Weekly);
        assert_eq!(TrendPeriod::parse(Some("monthly")), TrendPeriod::Monthly);
        assert_eq!(TrendPeriod::parse(Some("hourly")), TrendPeriod::Daily);
    }

    #[test]
    fn test_trends_are_sorted_by_key() {
        let entries = vec![
            mood(2, "sad", None, at(2024, 3, 10)),
            mood(9, "excited", None, at(2024, 1, 5)),
            mood(7, "calm", None, at(2024, 1, 20)),
        ];
        let buckets = mood_trends(&entries, TrendPeriod::Monthly);
        let keys: Vec<_> = buckets.iter().map(|b| b.period.clone()).collect();
        assert_eq!(keys, vec![BucketKey::Number(1), BucketKey::Number(3)]);
        assert_eq!(buckets[0].summary.total_entries, 2);
        assert_eq!(buckets[0].summary.average_mood, 8.0);

        let body = serde_json::to_value(&buckets[1]).unwrap();
        assert_eq!(body["period"], json!(3));
        assert_eq!(body["averageMood"], json!(2.0));
    }
}
