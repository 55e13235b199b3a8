//! Public professional directory. Listings only ever show verified records;
//! a direct lookup by id does not.

use axum::{extract::State, Json};

use crate::dto::{PageQuery, PageRequest, Paginated, RateRequest, RatingResponse};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::parse_id;
use crate::models::professional::{
    normalize_term, CostTier, LocationQuery, Profession, Professional, ProfessionalField,
    ProfessionalFilter, ProfessionalQuery, Specialization,
};
use crate::AppState;

const EMERGENCY_LIST_LIMIT: i64 = 20;

async fn page_of(
    state: &AppState,
    filter: ProfessionalFilter,
    page: PageRequest,
) -> AppResult<Json<Paginated<Professional>>> {
    let (items, total) = state.store.professionals.list(&filter, page).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn list_professionals(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageQuery>,
    AppQuery(query): AppQuery<ProfessionalQuery>,
) -> AppResult<Json<Paginated<Professional>>> {
    page_of(&state, query.into(), page.resolve()?).await
}

pub async fn get_professional(
    State(state): State<AppState>,
    AppPath(raw_id): AppPath<String>,
) -> AppResult<Json<Professional>> {
    let id = parse_id(&raw_id, "Professional")?;
    let professional = state
        .store
        .professionals
        .find(id)
        .await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;

    Ok(Json(professional))
}

pub async fn by_profession(
    State(state): State<AppState>,
    AppPath(profession): AppPath<Profession>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Paginated<Professional>>> {
    let filter = ProfessionalFilter {
        profession: Some(profession),
        ..Default::default()
    };
    page_of(&state, filter, page.resolve()?).await
}

pub async fn by_specialization(
    State(state): State<AppState>,
    AppPath(specialization): AppPath<Specialization>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Paginated<Professional>>> {
    let filter = ProfessionalFilter {
        specialization: Some(specialization),
        ..Default::default()
    };
    page_of(&state, filter, page.resolve()?).await
}

pub async fn by_cost(
    State(state): State<AppState>,
    AppPath(cost): AppPath<CostTier>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Paginated<Professional>>> {
    let filter = ProfessionalFilter {
        cost: Some(cost),
        ..Default::default()
    };
    page_of(&state, filter, page.resolve()?).await
}

pub async fn sliding_scale(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Paginated<Professional>>> {
    let filter = ProfessionalFilter {
        sliding_scale_only: true,
        ..Default::default()
    };
    page_of(&state, filter, page.resolve()?).await
}

/// Emergency-capable professionals, best rated first. Not paginated.
pub async fn emergency(State(state): State<AppState>) -> AppResult<Json<Vec<Professional>>> {
    let filter = ProfessionalFilter {
        emergency_only: true,
        ..Default::default()
    };
    let (items, _) = state
        .store
        .professionals
        .list(&filter, PageRequest::first(EMERGENCY_LIST_LIMIT))
        .await?;
    Ok(Json(items))
}

pub async fn by_location(
    State(state): State<AppState>,
    AppQuery(location): AppQuery<LocationQuery>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Paginated<Professional>>> {
    let city = normalize_term(location.city);
    let state_name = normalize_term(location.state);
    if city.is_none() && state_name.is_none() {
        return Err(AppError::Validation("City or state is required".into()));
    }

    let filter = ProfessionalFilter {
        city,
        state: state_name,
        ..Default::default()
    };
    page_of(&state, filter, page.resolve()?).await
}

pub async fn rate_professional(
    State(state): State<AppState>,
    AppPath(raw_id): AppPath<String>,
    AppJson(body): AppJson<RateRequest>,
) -> AppResult<Json<RatingResponse>> {
    let score = body.score()?;
    let id = parse_id(&raw_id, "Professional")?;

    let outcome = state
        .store
        .professionals
        .rate(id, score)
        .await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;
    tracing::info!(
        id = %id,
        new_rating = outcome.new_rating,
        review_count = outcome.review_count,
        "Professional rated"
    );

    Ok(Json(RatingResponse {
        message: "Rating submitted successfully".into(),
        outcome,
    }))
}

pub async fn list_professions(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let values = state
        .store
        .professionals
        .distinct(ProfessionalField::Profession)
        .await?;
    Ok(Json(values))
}

pub async fn list_specializations(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let values = state
        .store
        .professionals
        .distinct(ProfessionalField::Specialization)
        .await?;
    Ok(Json(values))
}
