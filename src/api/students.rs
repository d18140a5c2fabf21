//! Student API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResult, JsonBody};
use crate::db::StudentRepository;
use crate::errors::AppError;
use crate::models::{AddBadgeRequest, CreateStudentRequest, Student, UpdateStudentRequest};

/// GET /students - List all students.
pub async fn list_students(State(repo): State<Arc<StudentRepository>>) -> ApiResult<Vec<Student>> {
    Ok(Json(repo.list_students().await?))
}

/// GET /students/:login - Get a single student.
pub async fn get_student(
    State(repo): State<Arc<StudentRepository>>,
    Path(login): Path<String>,
) -> ApiResult<Student> {
    Ok(Json(repo.get_student(&login).await?))
}

/// POST /students - Create a student, or return the existing one with that login.
pub async fn create_student(
    State(repo): State<Arc<StudentRepository>>,
    JsonBody(request): JsonBody<CreateStudentRequest>,
) -> ApiResult<Student> {
    let login = request
        .login()
        .ok_or_else(|| AppError::BadRequest("login required".to_string()))?;

    Ok(Json(repo.create_or_get_student(login).await?))
}

/// PUT /students/:login - Replace xp, badges and completed tasks where provided.
pub async fn update_student(
    State(repo): State<Arc<StudentRepository>>,
    Path(login): Path<String>,
    JsonBody(request): JsonBody<UpdateStudentRequest>,
) -> ApiResult<Student> {
    Ok(Json(repo.update_student(&login, request).await?))
}

/// POST /students/:login/badges - Award a badge.
pub async fn add_student_badge(
    State(repo): State<Arc<StudentRepository>>,
    Path(login): Path<String>,
    JsonBody(request): JsonBody<AddBadgeRequest>,
) -> ApiResult<Student> {
    let badge = request
        .badge()
        .ok_or_else(|| AppError::BadRequest("badge required".to_string()))?;

    Ok(Json(repo.add_badge(&login, badge).await?))
}
