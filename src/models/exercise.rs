use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{deserialize_optional_instant, DateRange};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub id: Uuid,
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub exercise_type: ExerciseType,
    /// Minutes.
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration: i32,
    pub intensity: Intensity,
    #[validate(range(min = 0.0, message = "Calories burned cannot be negative"))]
    pub calories_burned: Option<f64>,
    #[validate(range(min = 1, max = 10, message = "Mood before must be between 1 and 10"))]
    pub mood_before: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Mood after must be between 1 and 10"))]
    pub mood_after: Option<i32>,
    #[validate(length(max = 500, message = "Notes must be under 500 characters"))]
    pub notes: Option<String>,
    pub location: Option<ExerciseLocation>,
    pub equipment: Vec<String>,
    #[sqlx(flatten)]
    #[validate]
    pub heart_rate: HeartRate,
    /// Kilometres.
    #[validate(range(min = 0.0, message = "Distance cannot be negative"))]
    pub distance: Option<f64>,
    #[validate(range(min = 0, message = "Steps cannot be negative"))]
    pub steps: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct HeartRate {
    #[sqlx(rename = "heart_rate_average")]
    #[validate(range(min = 0, message = "Heart rate cannot be negative"))]
    pub average: Option<i32>,
    #[sqlx(rename = "heart_rate_max")]
    #[validate(range(min = 0, message = "Heart rate cannot be negative"))]
    pub max: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[sqlx(type_name = "exercise_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Cardio,
    Strength,
    Yoga,
    Pilates,
    Walking,
    Running,
    Cycling,
    Swimming,
    Dancing,
    Meditation,
    Stretching,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "exercise_intensity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "exercise_location", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExerciseLocation {
    Home,
    Gym,
    Outdoor,
    Studio,
    Other,
}

/// POST /exercise. Any owner id in the body is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    pub exercise_type: ExerciseType,
    pub duration: i32,
    pub intensity: Intensity,
    pub calories_burned: Option<f64>,
    pub mood_before: Option<i32>,
    pub mood_after: Option<i32>,
    pub notes: Option<String>,
    pub location: Option<ExerciseLocation>,
    pub equipment: Option<Vec<String>>,
    pub heart_rate: Option<HeartRate>,
    pub distance: Option<f64>,
    pub steps: Option<i64>,
}

/// PUT /exercise/:id. Fields that are present replace the stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    pub exercise_type: Option<ExerciseType>,
    pub duration: Option<i32>,
    pub intensity: Option<Intensity>,
    pub calories_burned: Option<f64>,
    pub mood_before: Option<i32>,
    pub mood_after: Option<i32>,
    pub notes: Option<String>,
    pub location: Option<ExerciseLocation>,
    pub equipment: Option<Vec<String>>,
    pub heart_rate: Option<HeartRate>,
    pub distance: Option<f64>,
    pub steps: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub exercise_type: Option<ExerciseType>,
}

#[derive(Debug, Clone)]
pub struct ExerciseFilter {
    pub user_id: String,
    pub range: DateRange,
    pub exercise_type: Option<ExerciseType>,
}

impl ExerciseEntry {
    pub fn new(user_id: &str, req: CreateExerciseRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            date: req.date.unwrap_or(now),
            exercise_type: req.exercise_type,
            duration: req.duration,
            intensity: req.intensity,
            calories_burned: req.calories_burned,
            mood_before: req.mood_before,
            mood_after: req.mood_after,
            notes: req.notes,
            location: req.location,
            equipment: req.equipment.unwrap_or_default(),
            heart_rate: req.heart_rate.unwrap_or_default(),
            distance: req.distance,
            steps: req.steps,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateExerciseRequest) {
        if let Some(date) = req.date {
            self.date = date;
        }
        if let Some(kind) = req.exercise_type {
            self.exercise_type = kind;
        }
        if let Some(duration) = req.duration {
            self.duration = duration;
        }
        if let Some(intensity) = req.intensity {
            self.intensity = intensity;
        }
        if req.calories_burned.is_some() {
            self.calories_burned = req.calories_burned;
        }
        if req.mood_before.is_some() {
            self.mood_before = req.mood_before;
        }
        if req.mood_after.is_some() {
            self.mood_after = req.mood_after;
        }
        if req.notes.is_some() {
            self.notes = req.notes;
        }
        if req.location.is_some() {
            self.location = req.location;
        }
        if let Some(equipment) = req.equipment {
            self.equipment = equipment;
        }
        if let Some(heart_rate) = req.heart_rate {
            self.heart_rate = heart_rate;
        }
        if req.distance.is_some() {
            self.distance = req.distance;
        }
        if req.steps.is_some() {
            self.steps = req.steps;
        }
        self.updated_at = Utc::now();
    }

    /// `moodAfter - moodBefore`, when both were recorded.
    pub fn mood_improvement(&self) -> Option<i32> {
        Some(self.mood_after? - self.mood_before?)
    }
}

impl ExerciseFilter {
    pub fn for_user(user_id: &str, range: DateRange) -> Self {
        Self {
            user_id: user_id.to_string(),
            range,
            exercise_type: None,
        }
    }

    pub fn matches(&self, entry: &ExerciseEntry) -> bool {
        entry.user_id == self.user_id
            && self.range.contains(entry.date)
            && self.exercise_type.map_or(true, |t| entry.exercise_type == t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    fn request(duration: i32) -> CreateExerciseRequest {
        serde_json::from_value(serde_json::json!({
            "exerciseType": "running",
            "duration": duration,
            "intensity": "high",
            "moodBefore": 4,
            "moodAfter": 7,
        }))
        .unwrap()
    }

    #[test]
    fn test_zero_duration_is_invalid() {
        let entry = ExerciseEntry::new("u", request(0));
        let violations = check(&entry).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "duration");
    }

    #[test]
    fn test_nested_heart_rate_violation_is_reported() {
        let mut entry = ExerciseEntry::new("u", request(30));
        entry.heart_rate.average = Some(-5);
        let violations = check(&entry).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "heartRate.average");
    }

    #[test]
    fn test_mood_improvement_needs_both_sides() {
        let mut entry = ExerciseEntry::new("u", request(30));
        assert_eq!(entry.mood_improvement(), Some(3));
        entry.mood_before = None;
        assert_eq!(entry.mood_improvement(), None);
    }

    #[test]
    fn test_update_can_invalidate_merged_record() {
        let mut entry = ExerciseEntry::new("u", request(30));
        entry.apply(UpdateExerciseRequest {
            mood_after: Some(12),
            ..Default::default()
        });
        assert_eq!(entry.duration, 30);
        assert!(check(&entry).is_err());
    }
}
