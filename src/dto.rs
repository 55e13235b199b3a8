//! Request/response shapes shared by several route groups.
//!
//! Conventions:
//! - `*Query`   → deserialized from the query string
//! - `*Request` → deserialized from a JSON body
//! - `*Response` / envelopes → serialized to the client, camelCase

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// `?page=&limit=` on every paginated listing.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// A validated page window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub const fn first(limit: i64) -> Self {
        Self { page: 1, limit }
    }

    /// Rows to skip. `PageQuery::resolve` guarantees this fits in an `i64`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl PageQuery {
    pub fn resolve(&self) -> AppResult<PageRequest> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        if (page - 1).checked_mul(limit).is_none() {
            return Err(AppError::Validation("page is out of range".into()));
        }
        Ok(PageRequest { page, limit })
    }
}

/// Uniform envelope for paginated listings.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: PageRequest) -> Self {
        Self {
            items,
            total_pages: (total + page.limit - 1) / page.limit,
            current_page: page.page,
            total,
        }
    }
}

/// `?period=` on the trend routes; interpreted by `TrendPeriod::parse`.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub period: Option<String>,
}

/// Standard success message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /professionals/:id/rate and POST /resources/:id/rate
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: Option<f64>,
}

impl RateRequest {
    pub fn score(&self) -> AppResult<f64> {
        match self.rating {
            Some(r) if (1.0..=5.0).contains(&r) => Ok(r),
            _ => Err(AppError::Validation("Rating must be between 1 and 5".into())),
        }
    }
}

/// Rating after a submission has been folded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOutcome {
    pub new_rating: f64,
    pub review_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: RatingOutcome,
}
