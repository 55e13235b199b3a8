use axum::{extract::State, Json};

use crate::dto::{PageQuery, PageRequest, Paginated, RateRequest, RatingResponse};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::parse_id;
use crate::models::professional::normalize_term;
use crate::models::resource::{
    Resource, ResourceCategory, ResourceField, ResourceFilter, ResourceQuery, SearchQuery,
};
use crate::AppState;

const FEATURED_LIST_LIMIT: i64 = 10;

async fn page_of(
    state: &AppState,
    filter: ResourceFilter,
    page: PageRequest,
) -> AppResult<Json<Paginated<Resource>>> {
    let (items, total) = state.store.resources.list(&filter, page).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn list_resources(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageQuery>,
    AppQuery(query): AppQuery<ResourceQuery>,
) -> AppResult<Json<Paginated<Resource>>> {
    page_of(&state, query.into(), page.resolve()?).await
}

pub async fn get_resource(
    State(state): State<AppState>,
    AppPath(raw_id): AppPath<String>,
) -> AppResult<Json<Resource>> {
    let id = parse_id(&raw_id, "Resource")?;
    let resource = state
        .store
        .resources
        .find(id)
        .await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;

    Ok(Json(resource))
}

/// Serves both `/category/:category` and `/condition/:condition`; a
/// condition is looked up as a category.
pub async fn by_category(
    State(state): State<AppState>,
    AppPath(category): AppPath<ResourceCategory>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Paginated<Resource>>> {
    let filter = ResourceFilter {
        category: Some(category),
        ..Default::default()
    };
    page_of(&state, filter, page.resolve()?).await
}

pub async fn featured(State(state): State<AppState>) -> AppResult<Json<Vec<Resource>>> {
    let filter = ResourceFilter {
        featured_only: true,
        ..Default::default()
    };
    let (items, _) = state
        .store
        .resources
        .list(&filter, PageRequest::first(FEATURED_LIST_LIMIT))
        .await?;
    Ok(Json(items))
}

pub async fn search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Paginated<Resource>>> {
    let term = normalize_term(query.q)
        .ok_or_else(|| AppError::Validation("Search query is required".into()))?;

    let filter = ResourceFilter {
        search: Some(term),
        ..Default::default()
    };
    page_of(&state, filter, page.resolve()?).await
}

pub async fn rate_resource(
    State(state): State<AppState>,
    AppPath(raw_id): AppPath<String>,
    AppJson(body): AppJson<RateRequest>,
) -> AppResult<Json<RatingResponse>> {
    let score = body.score()?;
    let id = parse_id(&raw_id, "Resource")?;

    let outcome = state
        .store
        .resources
        .rate(id, score)
        .await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;
    tracing::info!(
        id = %id,
        new_rating = outcome.new_rating,
        review_count = outcome.review_count,
        "Resource rated"
    );

    Ok(Json(RatingResponse {
        message: "Rating submitted successfully".into(),
        outcome,
    }))
}

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let values = state.store.resources.distinct(ResourceField::Category).await?;
    Ok(Json(values))
}

pub async fn list_types(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let values = state.store.resources.distinct(ResourceField::Type).await?;
    Ok(Json(values))
}
