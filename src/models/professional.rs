use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::contains_ci;

/// Curated directory entry. Created out-of-band (seed file or SQL); only the
/// rating pair is mutated through the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    /// Curator-assigned; never generated here.
    pub id: Uuid,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub profession: Profession,
    #[serde(default)]
    pub specialization: Vec<Specialization>,
    #[sqlx(flatten)]
    #[serde(default)]
    pub contact: Contact,
    #[sqlx(flatten)]
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub insurance: Vec<String>,
    #[serde(default)]
    pub sliding_scale: bool,
    pub cost: Option<CostTier>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Review count cannot be negative"))]
    pub review_count: i64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub emergency: bool,
    #[validate(length(max = 1000, message = "Description must be under 1000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub credentials: Vec<String>,
    /// Years of practice.
    pub experience: Option<i32>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "profession", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Profession {
    Psychiatrist,
    Psychologist,
    Therapist,
    Counselor,
    SocialWorker,
    LifeCoach,
    Nutritionist,
    FitnessTrainer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "specialization", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Specialization {
    Anxiety,
    Depression,
    Trauma,
    Addiction,
    Relationships,
    Grief,
    Stress,
    EatingDisorders,
    Sleep,
    Adhd,
    Autism,
    General,
}

impl sqlx::postgres::PgHasArrayType for Specialization {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_specialization")
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "availability", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    InPerson,
    Virtual,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "cost_tier", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CostTier {
    Free,
    LowCost,
    Moderate,
    High,
    Varies,
}

/// GET /professionals query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalQuery {
    pub profession: Option<Profession>,
    pub specialization: Option<Specialization>,
    pub availability: Option<Availability>,
    pub cost: Option<CostTier>,
    pub emergency: Option<bool>,
    pub sliding_scale: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Selection over verified professionals. The verification gate is not
/// optional: every listing goes through it.
#[derive(Debug, Clone, Default)]
pub struct ProfessionalFilter {
    pub profession: Option<Profession>,
    pub specialization: Option<Specialization>,
    pub availability: Option<Availability>,
    pub cost: Option<CostTier>,
    pub emergency_only: bool,
    pub sliding_scale_only: bool,
    /// Lower-cased search term over name, description, city and state.
    pub search: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Categorical fields offered as filter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfessionalField {
    Profession,
    Specialization,
}

impl From<ProfessionalQuery> for ProfessionalFilter {
    fn from(q: ProfessionalQuery) -> Self {
        Self {
            profession: q.profession,
            specialization: q.specialization,
            availability: q.availability,
            cost: q.cost,
            emergency_only: q.emergency.unwrap_or(false),
            sliding_scale_only: q.sliding_scale.unwrap_or(false),
            search: normalize_term(q.search),
            ..Default::default()
        }
    }
}

/// Trim and lower-case a user search term; blank terms mean "no search".
pub fn normalize_term(term: Option<String>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

impl ProfessionalFilter {
    pub fn matches(&self, p: &Professional) -> bool {
        if !p.verified {
            return false;
        }
        if self.profession.map_or(false, |v| p.profession != v)
            || self.specialization.map_or(false, |v| !p.specialization.contains(&v))
            || self.availability.map_or(false, |v| p.availability != v)
            || self.cost.map_or(false, |v| p.cost != Some(v))
            || (self.emergency_only && !p.emergency)
            || (self.sliding_scale_only && !p.sliding_scale)
        {
            return false;
        }
        let field_has = |field: &Option<String>, term: &str| {
            field.as_deref().map_or(false, |f| contains_ci(f, term))
        };
        if let Some(city) = &self.city {
            if !field_has(&p.location.city, city) {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if !field_has(&p.location.state, state) {
                return false;
            }
        }
        match &self.search {
            None => true,
            Some(term) => {
                contains_ci(&p.name, term)
                    || field_has(&p.description, term)
                    || field_has(&p.location.city, term)
                    || field_has(&p.location.state, term)
            }
        }
    }
}

/// Listing order: emergency first, then rating, then experience (unknown
/// experience last). Later keys only break ties.
pub fn listing_order(a: &Professional, b: &Professional) -> std::cmp::Ordering {
    b.emergency
        .cmp(&a.emergency)
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| b.experience.cmp(&a.experience))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
