//! Wellness tracking API: private mood and exercise journals plus a public,
//! curated directory of professionals and resources.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod recommendations;
pub mod seed;
pub mod stats;
pub mod validation;

use auth::rate_limit::RateLimitState;
use config::Config;
use db::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        let rate_limiter =
            RateLimitState::new(config.rate_limit_max, config.rate_limit_window_secs);
        Self {
            store,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}

/// All routes, without CORS. The binary adds CORS on top.
pub fn build_router(state: AppState) -> Router {
    let rating_routes = Router::new()
        .route(
            "/professionals/:id/rate",
            post(handlers::professionals::rate_professional),
        )
        .route("/resources/:id/rate", post(handlers::resources::rate_resource))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_ratings,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        // Professionals
        .route("/professionals", get(handlers::professionals::list_professionals))
        .route("/professionals/:id", get(handlers::professionals::get_professional))
        .route(
            "/professionals/profession/:profession",
            get(handlers::professionals::by_profession),
        )
        .route(
            "/professionals/specialization/:specialization",
            get(handlers::professionals::by_specialization),
        )
        .route("/professionals/cost/:cost", get(handlers::professionals::by_cost))
        .route(
            "/professionals/sliding-scale/list",
            get(handlers::professionals::sliding_scale),
        )
        .route(
            "/professionals/emergency/list",
            get(handlers::professionals::emergency),
        )
        .route(
            "/professionals/location/search",
            get(handlers::professionals::by_location),
        )
        .route(
            "/professionals/professions/list",
            get(handlers::professionals::list_professions),
        )
        .route(
            "/professionals/specializations/list",
            get(handlers::professionals::list_specializations),
        )
        // Resources
        .route("/resources", get(handlers::resources::list_resources))
        .route("/resources/:id", get(handlers::resources::get_resource))
        .route(
            "/resources/category/:category",
            get(handlers::resources::by_category),
        )
        .route(
            "/resources/condition/:condition",
            get(handlers::resources::by_category),
        )
        .route("/resources/featured/list", get(handlers::resources::featured))
        .route(
            "/resources/categories/list",
            get(handlers::resources::list_categories),
        )
        .route("/resources/types/list", get(handlers::resources::list_types))
        .route("/resources/search/query", get(handlers::resources::search))
        .merge(rating_routes);

    let protected_routes = Router::new()
        // Mood
        .route(
            "/mood",
            get(handlers::mood::list_moods).post(handlers::mood::create_mood),
        )
        .route("/mood/stats/summary", get(handlers::mood::mood_summary))
        .route("/mood/stats/trends", get(handlers::mood::mood_trends))
        .route(
            "/mood/:id",
            get(handlers::mood::get_mood)
                .put(handlers::mood::update_mood)
                .delete(handlers::mood::delete_mood),
        )
        // Exercise
        .route(
            "/exercise",
            get(handlers::exercise::list_exercises).post(handlers::exercise::create_exercise),
        )
        .route(
            "/exercise/recommendations",
            get(handlers::exercise::recommendations),
        )
        .route(
            "/exercise/stats/summary",
            get(handlers::exercise::exercise_summary),
        )
        .route(
            "/exercise/stats/trends",
            get(handlers::exercise::exercise_trends),
        )
        .route(
            "/exercise/:id",
            get(handlers::exercise::get_exercise)
                .put(handlers::exercise::update_exercise)
                .delete(handlers::exercise::delete_exercise),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
