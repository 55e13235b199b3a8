use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::contains_ci;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Curator-assigned; never generated here.
    pub id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub category: ResourceCategory,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Review count cannot be negative"))]
    pub review_count: i64,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "resource_category", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ResourceCategory {
    Anxiety,
    Depression,
    Stress,
    Trauma,
    Addiction,
    Relationships,
    Grief,
    Sleep,
    Mindfulness,
    SelfCare,
    Crisis,
    General,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "resource_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Article,
    Video,
    Podcast,
    Book,
    App,
    Worksheet,
    Exercise,
    Hotline,
    Website,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "resource_difficulty", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// GET /resources query string.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    pub category: Option<ResourceCategory>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub difficulty: Option<Difficulty>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Selection over approved resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub category: Option<ResourceCategory>,
    pub resource_type: Option<ResourceType>,
    pub difficulty: Option<Difficulty>,
    pub featured_only: bool,
    /// Lower-cased search term over title, description, tags and author.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceField {
    Category,
    Type,
}

impl From<ResourceQuery> for ResourceFilter {
    fn from(q: ResourceQuery) -> Self {
        Self {
            category: q.category,
            resource_type: q.resource_type,
            difficulty: q.difficulty,
            featured_only: q.featured.unwrap_or(false),
            search: super::professional::normalize_term(q.search),
        }
    }
}

impl ResourceFilter {
    pub fn matches(&self, r: &Resource) -> bool {
        if !r.approved {
            return false;
        }
        if self.category.map_or(false, |v| r.category != v)
            || self.resource_type.map_or(false, |v| r.resource_type != v)
            || self.difficulty.map_or(false, |v| r.difficulty != Some(v))
            || (self.featured_only && !r.featured)
        {
            return false;
        }
        match &self.search {
            None => true,
            Some(term) => {
                contains_ci(&r.title, term)
                    || r.description.as_deref().map_or(false, |d| contains_ci(d, term))
                    || r.tags.iter().any(|t| contains_ci(t, term))
                    || r.author.as_deref().map_or(false, |a| contains_ci(a, term))
            }
        }
    }
}

/// Featured first, then rating, then newest.
pub fn listing_order(a: &Resource, b: &Resource) -> std::cmp::Ordering {
    b.featured
        .cmp(&a.featured)
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
