pub mod exercise;
pub mod mood;
pub mod professional;
pub mod resource;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dto::RatingOutcome;
use crate::error::{AppError, AppResult};

/// Inclusive time window used by entry listings and statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse `startDate` / `endDate` query values. A date-only end bound
    /// covers the whole of that day.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> AppResult<Self> {
        let start = start
            .map(|raw| parse_instant(raw, NaiveTime::MIN).ok_or_else(|| bad_date("startDate", raw)))
            .transpose()?;
        let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap_or(NaiveTime::MIN);
        let end = end
            .map(|raw| parse_instant(raw, end_of_day).ok_or_else(|| bad_date("endDate", raw)))
            .transpose()?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::Validation(
                    "startDate must not be after endDate".into(),
                ));
            }
        }

        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }
}

fn bad_date(field: &str, raw: &str) -> AppError {
    AppError::Validation(format!("{} is not a valid date: {}", field, raw))
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (UTC).
pub fn parse_instant(raw: &str, time_of_day: NaiveTime) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(time_of_day).and_utc())
}

/// Serde helper for optional entry dates in request bodies.
pub fn deserialize_optional_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| {
        parse_instant(&s, NaiveTime::MIN)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s)))
    })
    .transpose()
}

/// The wire name of a unit enum variant, e.g. `Profession::SocialWorker` → `social-worker`.
pub fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

/// Fold one rating submission into a running mean kept at one decimal.
/// Exact only while every earlier submission is counted in `review_count`,
/// so stores must apply it atomically per record.
pub fn fold_rating(rating: f64, review_count: i64, score: f64) -> RatingOutcome {
    let n = review_count as f64;
    let mean = (rating * n + score) / (n + 1.0);
    RatingOutcome {
        new_rating: (mean * 10.0).round() / 10.0,
        review_count: review_count + 1,
    }
}

/// Case-insensitive literal substring match.
pub fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
