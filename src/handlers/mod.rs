pub mod exercise;
pub mod health;
pub mod mood;
pub mod professionals;
pub mod resources;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Record ids arrive as raw path segments; anything that is not a UUID
/// cannot name a record, so it reads as not found.
pub(crate) fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{} not found", what)))
}
