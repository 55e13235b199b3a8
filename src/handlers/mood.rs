use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::dto::{MessageResponse, PageQuery, Paginated, TrendQuery};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::parse_id;
use crate::models::mood::{CreateMoodRequest, MoodEntry, MoodFilter, MoodQuery, UpdateMoodRequest};
use crate::models::DateRange;
use crate::stats::{self, MoodReport, MoodSummary, Trend, TrendPeriod};
use crate::validation::ensure_valid;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MoodResponse {
    pub message: String,
    pub mood: MoodEntry,
}

fn filter_for(user: &AuthUser, query: &MoodQuery) -> AppResult<MoodFilter> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
    Ok(MoodFilter {
        mood_type: query.mood_type,
        ..MoodFilter::for_user(&user.id, range)
    })
}

pub async fn create_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateMoodRequest>,
) -> AppResult<(StatusCode, Json<MoodResponse>)> {
    let entry = MoodEntry::new(&auth_user.id, body);
    ensure_valid(&entry)?;

    state.store.moods.insert(&entry).await?;
    tracing::info!(user_id = %auth_user.id, id = %entry.id, "Mood entry created");

    Ok((
        StatusCode::CREATED,
        Json(MoodResponse {
            message: "Mood entry created successfully".into(),
            mood: entry,
        }),
    ))
}

pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(page): AppQuery<PageQuery>,
    AppQuery(query): AppQuery<MoodQuery>,
) -> AppResult<Json<Paginated<MoodEntry>>> {
    let page = page.resolve()?;
    let filter = filter_for(&auth_user, &query)?;

    let (items, total) = state.store.moods.list(&filter, page).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn get_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(raw_id): AppPath<String>,
) -> AppResult<Json<MoodEntry>> {
    let id = parse_id(&raw_id, "Mood entry")?;
    let entry = state
        .store
        .moods
        .find(&auth_user.id, id)
        .await?
        .ok_or(AppError::NotFound("Mood entry not found".into()))?;

    Ok(Json(entry))
}

pub async fn update_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(raw_id): AppPath<String>,
    AppJson(body): AppJson<UpdateMoodRequest>,
) -> AppResult<Json<MoodResponse>> {
    let id = parse_id(&raw_id, "Mood entry")?;
    let mut entry = state
        .store
        .moods
        .find(&auth_user.id, id)
        .await?
        .ok_or(AppError::NotFound("Mood entry not found".into()))?;

    entry.apply(body);
    ensure_valid(&entry)?;

    if !state.store.moods.replace(&entry).await? {
        return Err(AppError::NotFound("Mood entry not found".into()));
    }
    tracing::info!(user_id = %auth_user.id, id = %entry.id, "Mood entry updated");

    Ok(Json(MoodResponse {
        message: "Mood entry updated successfully".into(),
        mood: entry,
    }))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(raw_id): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&raw_id, "Mood entry")?;
    if !state.store.moods.delete(&auth_user.id, id).await? {
        return Err(AppError::NotFound("Mood entry not found".into()));
    }
    tracing::info!(user_id = %auth_user.id, id = %id, "Mood entry deleted");

    Ok(Json(MessageResponse {
        message: "Mood entry deleted successfully".into(),
    }))
}

pub async fn mood_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<MoodQuery>,
) -> AppResult<Json<MoodReport>> {
    let filter = filter_for(&auth_user, &query)?;
    let entries = state.store.moods.matching(&filter).await?;
    Ok(Json(stats::summarize_moods(&entries)))
}

pub async fn mood_trends(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(trend): AppQuery<TrendQuery>,
    AppQuery(query): AppQuery<MoodQuery>,
) -> AppResult<Json<Vec<Trend<MoodSummary>>>> {
    let period = TrendPeriod::parse(trend.period.as_deref());
    let filter = filter_for(&auth_user, &query)?;
    let entries = state.store.moods.matching(&filter).await?;
    Ok(Json(stats::mood_trends(&entries, period)))
}
