use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{deserialize_optional_instant, DateRange};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: String,
    pub date: DateTime<Utc>,
    #[validate(range(min = 1, max = 10, message = "Mood level must be between 1 and 10"))]
    pub mood_level: i32,
    pub mood_type: MoodType,
    #[validate(length(max = 1000, message = "Notes must be under 1000 characters"))]
    pub notes: Option<String>,
    pub activities: Vec<MoodActivity>,
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: Option<f64>,
    #[validate(range(min = 1, max = 10, message = "Stress level must be between 1 and 10"))]
    pub stress_level: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Energy level must be between 1 and 10"))]
    pub energy_level: Option<i32>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[sqlx(type_name = "mood_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MoodType {
    Happy,
    Sad,
    Angry,
    Anxious,
    Calm,
    Excited,
    Tired,
    Stressed,
    Peaceful,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "mood_activity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MoodActivity {
    Exercise,
    Meditation,
    Social,
    Work,
    Sleep,
    Eating,
    Hobby,
    Other,
}

impl sqlx::postgres::PgHasArrayType for MoodActivity {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_mood_activity")
    }
}

/// POST /mood. Any owner id in the body is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMoodRequest {
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    pub mood_level: i32,
    pub mood_type: MoodType,
    pub notes: Option<String>,
    pub activities: Option<Vec<MoodActivity>>,
    pub sleep_hours: Option<f64>,
    pub stress_level: Option<i32>,
    pub energy_level: Option<i32>,
    pub tags: Option<Vec<String>>,
}

/// PUT /mood/:id. Fields that are present replace the stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMoodRequest {
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    pub mood_level: Option<i32>,
    pub mood_type: Option<MoodType>,
    pub notes: Option<String>,
    pub activities: Option<Vec<MoodActivity>>,
    pub sleep_hours: Option<f64>,
    pub stress_level: Option<i32>,
    pub energy_level: Option<i32>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub mood_type: Option<MoodType>,
}

/// Owner-scoped selection of mood entries.
#[derive(Debug, Clone)]
pub struct MoodFilter {
    pub user_id: String,
    pub range: DateRange,
    pub mood_type: Option<MoodType>,
}

impl MoodEntry {
    pub fn new(user_id: &str, req: CreateMoodRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            date: req.date.unwrap_or(now),
            mood_level: req.mood_level,
            mood_type: req.mood_type,
            notes: req.notes,
            activities: req.activities.unwrap_or_default(),
            sleep_hours: req.sleep_hours,
            stress_level: req.stress_level,
            energy_level: req.energy_level,
            tags: req.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateMoodRequest) {
        if let Some(date) = req.date {
            self.date = date;
        }
        if let Some(level) = req.mood_level {
            self.mood_level = level;
        }
        if let Some(kind) = req.mood_type {
            self.mood_type = kind;
        }
        if req.notes.is_some() {
            self.notes = req.notes;
        }
        if let Some(activities) = req.activities {
            self.activities = activities;
        }
        if req.sleep_hours.is_some() {
            self.sleep_hours = req.sleep_hours;
        }
        if req.stress_level.is_some() {
            self.stress_level = req.stress_level;
        }
        if req.energy_level.is_some() {
            self.energy_level = req.energy_level;
        }
        if let Some(tags) = req.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }
}

impl MoodFilter {
    pub fn for_user(user_id: &str, range: DateRange) -> Self {
        Self {
            user_id: user_id.to_string(),
            range,
            mood_type: None,
        }
    }

    pub fn matches(&self, entry: &MoodEntry) -> bool {
        entry.user_id == self.user_id
            && self.range.contains(entry.date)
            && self.mood_type.map_or(true, |t| entry.mood_type == t)
    }
}
