//! PostgreSQL backend. Filters are built with `QueryBuilder` so the count and
//! page queries always share one WHERE clause.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{
    ExerciseRepository, MoodRepository, Page, ProfessionalRepository, ResourceRepository,
};
use crate::dto::{PageRequest, RatingOutcome};
use crate::error::AppResult;
use crate::models::exercise::{ExerciseEntry, ExerciseFilter};
use crate::models::mood::{MoodEntry, MoodFilter};
use crate::models::professional::{Professional, ProfessionalField, ProfessionalFilter};
use crate::models::resource::{Resource, ResourceField, ResourceFilter};
use crate::models::DateRange;

/// `%term%` for ILIKE, with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_range(qb: &mut QueryBuilder<'_, Postgres>, range: &DateRange) {
    if let Some(start) = range.start {
        qb.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = range.end {
        qb.push(" AND date <= ").push_bind(end);
    }
}

fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    qb.push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());
}

/// Appends `(col1 ILIKE $n OR col2 ILIKE $n+1 ...)`.
fn push_search(qb: &mut QueryBuilder<'_, Postgres>, columns: &[&str], term: &str) {
    let pattern = like_pattern(term);
    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
    }
    qb.push(")");
}

fn push_rate(qb: &mut QueryBuilder<'_, Postgres>, table: &str, id: Uuid, score: f64) {
    qb.push("UPDATE ")
        .push(table)
        .push(
            " SET rating = ROUND(((rating * review_count + ",
        )
        .push_bind(score)
        .push(
            ") / (review_count + 1))::numeric, 1)::float8, \
             review_count = review_count + 1, updated_at = NOW() WHERE id = ",
        )
        .push_bind(id)
        .push(" RETURNING rating, review_count");
}

// ============================================================================
// Mood
// ============================================================================

pub struct PgMoods {
    pool: PgPool,
}

impl PgMoods {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_mood_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &MoodFilter) {
    qb.push(" WHERE user_id = ").push_bind(filter.user_id.clone());
    push_range(qb, &filter.range);
    if let Some(kind) = filter.mood_type {
        qb.push(" AND mood_type = ").push_bind(kind);
    }
}

#[async_trait]
impl MoodRepository for PgMoods {
    async fn insert(&self, entry: &MoodEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mood_entries (id, user_id, date, mood_level, mood_type, notes, activities,
                sleep_hours, stress_level, energy_level, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.user_id)
        .bind(entry.date)
        .bind(entry.mood_level)
        .bind(entry.mood_type)
        .bind(&entry.notes)
        .bind(&entry.activities)
        .bind(entry.sleep_hours)
        .bind(entry.stress_level)
        .bind(entry.energy_level)
        .bind(&entry.tags)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self, filter: &MoodFilter, page: PageRequest) -> AppResult<Page<MoodEntry>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM mood_entries");
        push_mood_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM mood_entries");
        push_mood_filter(&mut select, filter);
        select.push(" ORDER BY date DESC, id");
        push_page(&mut select, page);
        let items = select
            .build_query_as::<MoodEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn find(&self, user_id: &str, id: Uuid) -> AppResult<Option<MoodEntry>> {
        let entry = sqlx::query_as::<_, MoodEntry>(
            "SELECT * FROM mood_entries WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn replace(&self, entry: &MoodEntry) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE mood_entries SET
                date = $3,
                mood_level = $4,
                mood_type = $5,
                notes = $6,
                activities = $7,
                sleep_hours = $8,
                stress_level = $9,
                energy_level = $10,
                tags = $11,
                updated_at = $12
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(entry.id)
        .bind(&entry.user_id)
        .bind(entry.date)
        .bind(entry.mood_level)
        .bind(entry.mood_type)
        .bind(&entry.notes)
        .bind(&entry.activities)
        .bind(entry.sleep_hours)
        .bind(entry.stress_level)
        .bind(entry.energy_level)
        .bind(&entry.tags)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM mood_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn matching(&self, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>> {
        let mut select = QueryBuilder::new("SELECT * FROM mood_entries");
        push_mood_filter(&mut select, filter);
        let entries = select
            .build_query_as::<MoodEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}

// ============================================================================
// Exercise
// ============================================================================

pub struct PgExercises {
    pool: PgPool,
}

impl PgExercises {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_exercise_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ExerciseFilter) {
    qb.push(" WHERE user_id = ").push_bind(filter.user_id.clone());
    push_range(qb, &filter.range);
    if let Some(kind) = filter.exercise_type {
        qb.push(" AND exercise_type = ").push_bind(kind);
    }
}

#[async_trait]
impl ExerciseRepository for PgExercises {
    async fn insert(&self, entry: &ExerciseEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO exercise_entries (id, user_id, date, exercise_type, duration, intensity,
                calories_burned, mood_before, mood_after, notes, location, equipment,
                heart_rate_average, heart_rate_max, distance, steps, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.user_id)
        .bind(entry.date)
        .bind(entry.exercise_type)
        .bind(entry.duration)
        .bind(entry.intensity)
        .bind(entry.calories_burned)
        .bind(entry.mood_before)
        .bind(entry.mood_after)
        .bind(&entry.notes)
        .bind(entry.location)
        .bind(&entry.equipment)
        .bind(entry.heart_rate.average)
        .bind(entry.heart_rate.max)
        .bind(entry.distance)
        .bind(entry.steps)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &ExerciseFilter,
        page: PageRequest,
    ) -> AppResult<Page<ExerciseEntry>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM exercise_entries");
        push_exercise_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM exercise_entries");
        push_exercise_filter(&mut select, filter);
        select.push(" ORDER BY date DESC, id");
        push_page(&mut select, page);
        let items = select
            .build_query_as::<ExerciseEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn find(&self, user_id: &str, id: Uuid) -> AppResult<Option<ExerciseEntry>> {
        let entry = sqlx::query_as::<_, ExerciseEntry>(
            "SELECT * FROM exercise_entries WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn replace(&self, entry: &ExerciseEntry) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE exercise_entries SET
                date = $3,
                exercise_type = $4,
                duration = $5,
                intensity = $6,
                calories_burned = $7,
                mood_before = $8,
                mood_after = $9,
                notes = $10,
                location = $11,
                equipment = $12,
                heart_rate_average = $13,
                heart_rate_max = $14,
                distance = $15,
                steps = $16,
                updated_at = $17
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(entry.id)
        .bind(&entry.user_id)
        .bind(entry.date)
        .bind(entry.exercise_type)
        .bind(entry.duration)
        .bind(entry.intensity)
        .bind(entry.calories_burned)
        .bind(entry.mood_before)
        .bind(entry.mood_after)
        .bind(&entry.notes)
        .bind(entry.location)
        .bind(&entry.equipment)
        .bind(entry.heart_rate.average)
        .bind(entry.heart_rate.max)
        .bind(entry.distance)
        .bind(entry.steps)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM exercise_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn matching(&self, filter: &ExerciseFilter) -> AppResult<Vec<ExerciseEntry>> {
        let mut select = QueryBuilder::new("SELECT * FROM exercise_entries");
        push_exercise_filter(&mut select, filter);
        let entries = select
            .build_query_as::<ExerciseEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}

// ============================================================================
// Professionals
// ============================================================================

pub struct PgProfessionals {
    pool: PgPool,
}

impl PgProfessionals {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_professional_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProfessionalFilter) {
    qb.push(" WHERE verified = TRUE");
    if let Some(v) = filter.profession {
        qb.push(" AND profession = ").push_bind(v);
    }
    if let Some(v) = filter.specialization {
        qb.push(" AND ").push_bind(v).push(" = ANY(specialization)");
    }
    if let Some(v) = filter.availability {
        qb.push(" AND availability = ").push_bind(v);
    }
    if let Some(v) = filter.cost {
        qb.push(" AND cost = ").push_bind(v);
    }
    if filter.emergency_only {
        qb.push(" AND emergency = TRUE");
    }
    if filter.sliding_scale_only {
        qb.push(" AND sliding_scale = TRUE");
    }
    if let Some(city) = &filter.city {
        qb.push(" AND city ILIKE ").push_bind(like_pattern(city));
    }
    if let Some(state) = &filter.state {
        qb.push(" AND state ILIKE ").push_bind(like_pattern(state));
    }
    if let Some(term) = &filter.search {
        push_search(qb, &["name", "description", "city", "state"], term);
    }
}

#[async_trait]
impl ProfessionalRepository for PgProfessionals {
    async fn insert(&self, p: &Professional) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO professionals (id, name, profession, specialization, phone, email, website,
                address, city, state, zip_code, country, availability, languages, insurance,
                sliding_scale, cost, rating, review_count, verified, emergency, description,
                credentials, experience, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25, $26)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(p.profession)
        .bind(&p.specialization)
        .bind(&p.contact.phone)
        .bind(&p.contact.email)
        .bind(&p.contact.website)
        .bind(&p.location.address)
        .bind(&p.location.city)
        .bind(&p.location.state)
        .bind(&p.location.zip_code)
        .bind(&p.location.country)
        .bind(p.availability)
        .bind(&p.languages)
        .bind(&p.insurance)
        .bind(p.sliding_scale)
        .bind(p.cost)
        .bind(p.rating)
        .bind(p.review_count)
        .bind(p.verified)
        .bind(p.emergency)
        .bind(&p.description)
        .bind(&p.credentials)
        .bind(p.experience)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &ProfessionalFilter,
        page: PageRequest,
    ) -> AppResult<Page<Professional>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM professionals");
        push_professional_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM professionals");
        push_professional_filter(&mut select, filter);
        select.push(
            " ORDER BY emergency DESC, rating DESC, experience DESC NULLS LAST, created_at DESC, id",
        );
        push_page(&mut select, page);
        let items = select
            .build_query_as::<Professional>()
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Professional>> {
        let p = sqlx::query_as::<_, Professional>("SELECT * FROM professionals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(p)
    }

    async fn distinct(&self, field: ProfessionalField) -> AppResult<Vec<String>> {
        let sql = match field {
            ProfessionalField::Profession => {
                "SELECT DISTINCT profession::text FROM professionals WHERE verified = TRUE ORDER BY 1"
            }
            ProfessionalField::Specialization => {
                r#"
                SELECT DISTINCT s::text FROM professionals, unnest(specialization) AS s
                WHERE verified = TRUE
                ORDER BY 1
                "#
            }
        };
        let values = sqlx::query_scalar::<_, String>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(values)
    }

    async fn rate(&self, id: Uuid, score: f64) -> AppResult<Option<RatingOutcome>> {
        let mut update = QueryBuilder::new("");
        push_rate(&mut update, "professionals", id, score);
        let row = update
            .build_query_as::<(f64, i64)>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(new_rating, review_count)| RatingOutcome {
            new_rating,
            review_count,
        }))
    }
}

// ============================================================================
// Resources
// ============================================================================

pub struct PgResources {
    pool: PgPool,
}

impl PgResources {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_resource_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ResourceFilter) {
    qb.push(" WHERE approved = TRUE");
    if let Some(v) = filter.category {
        qb.push(" AND category = ").push_bind(v);
    }
    if let Some(v) = filter.resource_type {
        qb.push(" AND resource_type = ").push_bind(v);
    }
    if let Some(v) = filter.difficulty {
        qb.push(" AND difficulty = ").push_bind(v);
    }
    if filter.featured_only {
        qb.push(" AND featured = TRUE");
    }
    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR author ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE t ILIKE ")
            .push_bind(pattern)
            .push("))");
    }
}

#[async_trait]
impl ResourceRepository for PgResources {
    async fn insert(&self, r: &Resource) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO resources (id, title, description, content, url, category, resource_type,
                difficulty, tags, author, rating, review_count, approved, featured,
                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(r.id)
        .bind(&r.title)
        .bind(&r.description)
        .bind(&r.content)
        .bind(&r.url)
        .bind(r.category)
        .bind(r.resource_type)
        .bind(r.difficulty)
        .bind(&r.tags)
        .bind(&r.author)
        .bind(r.rating)
        .bind(r.review_count)
        .bind(r.approved)
        .bind(r.featured)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self, filter: &ResourceFilter, page: PageRequest) -> AppResult<Page<Resource>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM resources");
        push_resource_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new("SELECT * FROM resources");
        push_resource_filter(&mut select, filter);
        select.push(" ORDER BY featured DESC, rating DESC, created_at DESC, id");
        push_page(&mut select, page);
        let items = select
            .build_query_as::<Resource>()
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Resource>> {
        let r = sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(r)
    }

    async fn distinct(&self, field: ResourceField) -> AppResult<Vec<String>> {
        let sql = match field {
            ResourceField::Category => {
                "SELECT DISTINCT category::text FROM resources WHERE approved = TRUE ORDER BY 1"
            }
            ResourceField::Type => {
                "SELECT DISTINCT resource_type::text FROM resources WHERE approved = TRUE ORDER BY 1"
            }
        };
        let values = sqlx::query_scalar::<_, String>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(values)
    }

    async fn rate(&self, id: Uuid, score: f64) -> AppResult<Option<RatingOutcome>> {
        let mut update = QueryBuilder::new("");
        push_rate(&mut update, "resources", id, score);
        let row = update
            .build_query_as::<(f64, i64)>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(new_rating, review_count)| RatingOutcome {
            new_rating,
            review_count,
        }))
    }
}
