//! Teacher-service endpoints forwarded to the student and badges services.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::JsonBody;
use crate::errors::AppError;
use crate::models::AddBadgeRequest;
use crate::proxy::Relayed;
use crate::TeacherState;

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// GET /students - Relayed from the student service.
pub async fn proxy_list_students(State(state): State<TeacherState>) -> Result<Relayed, AppError> {
    state.students.get(&["students"]).await
}

/// POST /students/:login/badges - Validated here, then relayed to the student service.
pub async fn proxy_add_student_badge(
    State(state): State<TeacherState>,
    Path(login): Path<String>,
    JsonBody(request): JsonBody<AddBadgeRequest>,
) -> Result<Relayed, AppError> {
    let badge = request
        .badge()
        .ok_or_else(|| AppError::BadRequest("badge required".to_string()))?;

    let forwarded = AddBadgeRequest {
        badge: Some(badge.to_string()),
    };
    state
        .students
        .post(&["students", login.as_str(), "badges"], &forwarded)
        .await
}

/// GET /badges - Relayed from the badges service.
pub async fn proxy_list_badges(State(state): State<TeacherState>) -> Result<Relayed, AppError> {
    state.badges.get(&["badges"]).await
}

/// POST /badges - The caller's body is relayed to the badges service unchanged.
pub async fn proxy_create_badge(
    State(state): State<TeacherState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Relayed, AppError> {
    state.badges.post(&["badges"], &body).await
}
