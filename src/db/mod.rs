//! Repository seams over the document store.
//!
//! Handlers only see the traits below; [`Store`] wires them to either the
//! PostgreSQL backend or the in-process one. Entry repositories always take
//! the caller's identity explicitly, so ownership scoping happens in the
//! query itself rather than after the fact.

pub mod memory;
pub mod pool;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::{PageRequest, RatingOutcome};
use crate::error::AppResult;
use crate::models::exercise::{ExerciseEntry, ExerciseFilter};
use crate::models::mood::{MoodEntry, MoodFilter};
use crate::models::professional::{Professional, ProfessionalField, ProfessionalFilter};
use crate::models::resource::{Resource, ResourceField, ResourceFilter};

/// One page of results plus the total number of matches.
pub type Page<T> = (Vec<T>, i64);

#[async_trait]
pub trait MoodRepository: Send + Sync {
    async fn insert(&self, entry: &MoodEntry) -> AppResult<()>;

    /// Newest first.
    async fn list(&self, filter: &MoodFilter, page: PageRequest) -> AppResult<Page<MoodEntry>>;

    async fn find(&self, user_id: &str, id: Uuid) -> AppResult<Option<MoodEntry>>;

    /// Overwrite the stored entry with the same id and owner. Returns false
    /// when no such entry exists.
    async fn replace(&self, entry: &MoodEntry) -> AppResult<bool>;

    async fn delete(&self, user_id: &str, id: Uuid) -> AppResult<bool>;

    /// Every matching entry, for aggregation.
    async fn matching(&self, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>>;
}

#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    async fn insert(&self, entry: &ExerciseEntry) -> AppResult<()>;
    async fn list(
        &self,
        filter: &ExerciseFilter,
        page: PageRequest,
    ) -> AppResult<Page<ExerciseEntry>>;
    async fn find(&self, user_id: &str, id: Uuid) -> AppResult<Option<ExerciseEntry>>;
    async fn replace(&self, entry: &ExerciseEntry) -> AppResult<bool>;
    async fn delete(&self, user_id: &str, id: Uuid) -> AppResult<bool>;
    async fn matching(&self, filter: &ExerciseFilter) -> AppResult<Vec<ExerciseEntry>>;
}

#[async_trait]
pub trait ProfessionalRepository: Send + Sync {
    /// Curation path; existing ids are left untouched.
    async fn insert(&self, professional: &Professional) -> AppResult<()>;

    async fn list(
        &self,
        filter: &ProfessionalFilter,
        page: PageRequest,
    ) -> AppResult<Page<Professional>>;

    /// Direct lookup, not gated on verification.
    async fn find(&self, id: Uuid) -> AppResult<Option<Professional>>;

    /// Sorted distinct values among verified records.
    async fn distinct(&self, field: ProfessionalField) -> AppResult<Vec<String>>;

    /// Fold a rating in as one atomic step. `None` when the record is absent.
    async fn rate(&self, id: Uuid, score: f64) -> AppResult<Option<RatingOutcome>>;
}

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn insert(&self, resource: &Resource) -> AppResult<()>;
    async fn list(&self, filter: &ResourceFilter, page: PageRequest) -> AppResult<Page<Resource>>;
    async fn find(&self, id: Uuid) -> AppResult<Option<Resource>>;
    async fn distinct(&self, field: ResourceField) -> AppResult<Vec<String>>;
    async fn rate(&self, id: Uuid, score: f64) -> AppResult<Option<RatingOutcome>>;
}

#[derive(Clone)]
pub struct Store {
    pub moods: Arc<dyn MoodRepository>,
    pub exercises: Arc<dyn ExerciseRepository>,
    pub professionals: Arc<dyn ProfessionalRepository>,
    pub resources: Arc<dyn ResourceRepository>,
    pool: Option<PgPool>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            moods: Arc::new(memory::MemoryMoods::default()),
            exercises: Arc::new(memory::MemoryExercises::default()),
            professionals: Arc::new(memory::MemoryProfessionals::default()),
            resources: Arc::new(memory::MemoryResources::default()),
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            moods: Arc::new(postgres::PgMoods::new(pool.clone())),
            exercises: Arc::new(postgres::PgExercises::new(pool.clone())),
            professionals: Arc::new(postgres::PgProfessionals::new(pool.clone())),
            resources: Arc::new(postgres::PgResources::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Whether the backing store answers.
    pub async fn ping(&self) -> bool {
        match &self.pool {
            Some(pool) => sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(pool)
                .await
                .is_ok(),
            None => true,
        }
    }
}
