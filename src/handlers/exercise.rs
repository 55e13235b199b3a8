use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::dto::{MessageResponse, PageQuery, Paginated, TrendQuery};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::parse_id;
use crate::models::exercise::{
    CreateExerciseRequest, ExerciseEntry, ExerciseFilter, ExerciseQuery, UpdateExerciseRequest,
};
use crate::models::DateRange;
use crate::recommendations::{recommend, Recommendation, RecommendationInput};
use crate::stats::{self, ExerciseReport, ExerciseSummary, Trend, TrendPeriod};
use crate::validation::ensure_valid;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub message: String,
    pub exercise: ExerciseEntry,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

fn filter_for(user: &AuthUser, query: &ExerciseQuery) -> AppResult<ExerciseFilter> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
    Ok(ExerciseFilter {
        exercise_type: query.exercise_type,
        ..ExerciseFilter::for_user(&user.id, range)
    })
}

pub async fn create_exercise(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateExerciseRequest>,
) -> AppResult<(StatusCode, Json<ExerciseResponse>)> {
    let entry = ExerciseEntry::new(&auth_user.id, body);
    ensure_valid(&entry)?;

    state.store.exercises.insert(&entry).await?;
    tracing::info!(
        user_id = %auth_user.id,
        id = %entry.id,
        duration = entry.duration,
        "Exercise entry created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ExerciseResponse {
            message: "Exercise entry created successfully".into(),
            exercise: entry,
        }),
    ))
}

pub async fn list_exercises(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(page): AppQuery<PageQuery>,
    AppQuery(query): AppQuery<ExerciseQuery>,
) -> AppResult<Json<Paginated<ExerciseEntry>>> {
    let page = page.resolve()?;
    let filter = filter_for(&auth_user, &query)?;

    let (items, total) = state.store.exercises.list(&filter, page).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn get_exercise(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(raw_id): AppPath<String>,
) -> AppResult<Json<ExerciseEntry>> {
    let id = parse_id(&raw_id, "Exercise entry")?;
    let entry = state
        .store
        .exercises
        .find(&auth_user.id, id)
        .await?
        .ok_or(AppError::NotFound("Exercise entry not found".into()))?;

    Ok(Json(entry))
}

pub async fn update_exercise(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(raw_id): AppPath<String>,
    AppJson(body): AppJson<UpdateExerciseRequest>,
) -> AppResult<Json<ExerciseResponse>> {
    let id = parse_id(&raw_id, "Exercise entry")?;
    let mut entry = state
        .store
        .exercises
        .find(&auth_user.id, id)
        .await?
        .ok_or(AppError::NotFound("Exercise entry not found".into()))?;

    entry.apply(body);
    ensure_valid(&entry)?;

    if !state.store.exercises.replace(&entry).await? {
        return Err(AppError::NotFound("Exercise entry not found".into()));
    }
    tracing::info!(user_id = %auth_user.id, id = %entry.id, "Exercise entry updated");

    Ok(Json(ExerciseResponse {
        message: "Exercise entry updated successfully".into(),
        exercise: entry,
    }))
}

pub async fn delete_exercise(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(raw_id): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&raw_id, "Exercise entry")?;
    if !state.store.exercises.delete(&auth_user.id, id).await? {
        return Err(AppError::NotFound("Exercise entry not found".into()));
    }
    tracing::info!(user_id = %auth_user.id, id = %id, "Exercise entry deleted");

    Ok(Json(MessageResponse {
        message: "Exercise entry deleted successfully".into(),
    }))
}

pub async fn exercise_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<ExerciseQuery>,
) -> AppResult<Json<ExerciseReport>> {
    let filter = filter_for(&auth_user, &query)?;
    let entries = state.store.exercises.matching(&filter).await?;
    Ok(Json(stats::summarize_exercise(&entries)))
}

pub async fn exercise_trends(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(trend): AppQuery<TrendQuery>,
    AppQuery(query): AppQuery<ExerciseQuery>,
) -> AppResult<Json<Vec<Trend<ExerciseSummary>>>> {
    let period = TrendPeriod::parse(trend.period.as_deref());
    let filter = filter_for(&auth_user, &query)?;
    let entries = state.store.exercises.matching(&filter).await?;
    Ok(Json(stats::exercise_trends(&entries, period)))
}

pub async fn recommendations(
    AppQuery(input): AppQuery<RecommendationInput>,
) -> Json<RecommendationsResponse> {
    Json(RecommendationsResponse {
        recommendations: recommend(&input),
    })
}
