//! Teacher API endpoints.

use axum::{extract::State, Json};

use super::{ApiResult, JsonBody};
use crate::errors::AppError;
use crate::models::{CreateTeacherRequest, Teacher};
use crate::TeacherState;

/// GET /teachers - List all teachers.
pub async fn list_teachers(State(state): State<TeacherState>) -> ApiResult<Vec<Teacher>> {
    Ok(Json(state.teachers.list_teachers().await?))
}

/// POST /teachers - Create a teacher, or return the existing one with that login.
pub async fn create_teacher(
    State(state): State<TeacherState>,
    JsonBody(request): JsonBody<CreateTeacherRequest>,
) -> ApiResult<Teacher> {
    let login = request
        .login()
        .ok_or_else(|| AppError::BadRequest("login required".to_string()))?;

    Ok(Json(state.teachers.create_or_get_teacher(login).await?))
}
