//! Badge catalog API endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::{ApiResult, JsonBody};
use crate::db::BadgeRepository;
use crate::errors::AppError;
use crate::models::{Badge, CreateBadgeRequest};

/// GET /badges - List all badges.
pub async fn list_badges(State(repo): State<Arc<BadgeRepository>>) -> ApiResult<Vec<Badge>> {
    Ok(Json(repo.list_badges().await?))
}

/// POST /badges - Add a badge to the catalog.
pub async fn create_badge(
    State(repo): State<Arc<BadgeRepository>>,
    JsonBody(request): JsonBody<CreateBadgeRequest>,
) -> Result<(StatusCode, Json<Badge>), AppError> {
    let badge = request
        .to_badge()
        .ok_or_else(|| AppError::BadRequest("id and title required".to_string()))?;

    let created = repo.create_badge(badge).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
