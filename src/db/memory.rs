//! In-process store used when no database is configured, and by tests.
//!
//! Each collection sits behind a single `RwLock`, which makes every write
//! (including the rating read-modify-write) atomic per collection.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    ExerciseRepository, MoodRepository, Page, ProfessionalRepository, ResourceRepository,
};
use crate::dto::{PageRequest, RatingOutcome};
use crate::error::AppResult;
use crate::models::exercise::{ExerciseEntry, ExerciseFilter};
use crate::models::mood::{MoodEntry, MoodFilter};
use crate::models::professional::{self, Professional, ProfessionalField, ProfessionalFilter};
use crate::models::resource::{self, Resource, ResourceField, ResourceFilter};
use crate::models::{fold_rating, wire_name};

type Collection<T> = RwLock<HashMap<Uuid, T>>;

fn select<T, P, O>(rows: &HashMap<Uuid, T>, keep: P, order: O) -> Vec<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
    O: FnMut(&T, &T) -> Ordering,
{
    let mut hits: Vec<T> = rows.values().filter(|r| keep(*r)).cloned().collect();
    hits.sort_by(order);
    hits
}

fn paginate<T>(hits: Vec<T>, page: PageRequest) -> Page<T> {
    let total = hits.len() as i64;
    let items = hits
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    (items, total)
}

#[derive(Default)]
pub struct MemoryMoods {
    rows: Collection<MoodEntry>,
}

#[async_trait]
impl MoodRepository for MemoryMoods {
    async fn insert(&self, entry: &MoodEntry) -> AppResult<()> {
        self.rows.write().await.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn list(&self, filter: &MoodFilter, page: PageRequest) -> AppResult<Page<MoodEntry>> {
        let rows = self.rows.read().await;
        let hits = select(&*rows, |e| filter.matches(e), |a, b| {
            b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id))
        });
        Ok(paginate(hits, page))
    }

    async fn find(&self, user_id: &str, id: Uuid) -> AppResult<Option<MoodEntry>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|e| e.user_id == user_id).cloned())
    }

    async fn replace(&self, entry: &MoodEntry) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&entry.id) {
            Some(existing) if existing.user_id == entry.user_id => {
                *existing = entry.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        if rows.get(&id).map_or(false, |e| e.user_id == user_id) {
            rows.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn matching(&self, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|e| filter.matches(e)).cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryExercises {
    rows: Collection<ExerciseEntry>,
}

#[async_trait]
impl ExerciseRepository for MemoryExercises {
    async fn insert(&self, entry: &ExerciseEntry) -> AppResult<()> {
        self.rows.write().await.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &ExerciseFilter,
        page: PageRequest,
    ) -> AppResult<Page<ExerciseEntry>> {
        let rows = self.rows.read().await;
        let hits = select(&*rows, |e| filter.matches(e), |a, b| {
            b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id))
        });
        Ok(paginate(hits, page))
    }

    async fn find(&self, user_id: &str, id: Uuid) -> AppResult<Option<ExerciseEntry>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|e| e.user_id == user_id).cloned())
    }

    async fn replace(&self, entry: &ExerciseEntry) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&entry.id) {
            Some(existing) if existing.user_id == entry.user_id => {
                *existing = entry.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        if rows.get(&id).map_or(false, |e| e.user_id == user_id) {
            rows.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn matching(&self, filter: &ExerciseFilter) -> AppResult<Vec<ExerciseEntry>> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|e| filter.matches(e)).cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryProfessionals {
    rows: Collection<Professional>,
}

#[async_trait]
impl ProfessionalRepository for MemoryProfessionals {
    async fn insert(&self, professional: &Professional) -> AppResult<()> {
        self.rows
            .write()
            .await
            .entry(professional.id)
            .or_insert_with(|| professional.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &ProfessionalFilter,
        page: PageRequest,
    ) -> AppResult<Page<Professional>> {
        let rows = self.rows.read().await;
        let hits = select(&*rows, |p| filter.matches(p), professional::listing_order);
        Ok(paginate(hits, page))
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Professional>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn distinct(&self, field: ProfessionalField) -> AppResult<Vec<String>> {
        let rows = self.rows.read().await;
        let mut values = BTreeSet::new();
        for p in rows.values().filter(|p| p.verified) {
            match field {
                ProfessionalField::Profession => {
                    values.insert(wire_name(&p.profession));
                }
                ProfessionalField::Specialization => {
                    values.extend(p.specialization.iter().map(wire_name));
                }
            }
        }
        Ok(values.into_iter().collect())
    }

    async fn rate(&self, id: Uuid, score: f64) -> AppResult<Option<RatingOutcome>> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).map(|p| {
            let outcome = fold_rating(p.rating, p.review_count, score);
            p.rating = outcome.new_rating;
            p.review_count = outcome.review_count;
            p.updated_at = chrono::Utc::now();
            outcome
        }))
    }
}

#[derive(Default)]
pub struct MemoryResources {
    rows: Collection<Resource>,
}

#[async_trait]
impl ResourceRepository for MemoryResources {
    async fn insert(&self, resource: &Resource) -> AppResult<()> {
        self.rows
            .write()
            .await
            .entry(resource.id)
            .or_insert_with(|| resource.clone());
        Ok(())
    }

    async fn list(&self, filter: &ResourceFilter, page: PageRequest) -> AppResult<Page<Resource>> {
        let rows = self.rows.read().await;
        let hits = select(&*rows, |r| filter.matches(r), resource::listing_order);
        Ok(paginate(hits, page))
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Resource>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn distinct(&self, field: ResourceField) -> AppResult<Vec<String>> {
        let rows = self.rows.read().await;
        let values: BTreeSet<String> = rows
            .values()
            .filter(|r| r.approved)
            .map(|r| match field {
                ResourceField::Category => wire_name(&r.category),
                ResourceField::Type => wire_name(&r.resource_type),
            })
            .collect();
        Ok(values.into_iter().collect())
    }

    async fn rate(&self, id: Uuid, score: f64) -> AppResult<Option<RatingOutcome>> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).map(|r| {
            let outcome = fold_rating(r.rating, r.review_count, score);
            r.rating = outcome.new_rating;
            r.review_count = outcome.review_count;
            r.updated_at = chrono::Utc::now();
            outcome
        }))
    }
}
