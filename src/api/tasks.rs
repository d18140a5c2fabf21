//! Task catalog API endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use super::ApiResult;
use crate::db::TaskCatalog;
use crate::models::Task;

/// GET /tasks - List the task catalog as stored.
pub async fn list_tasks(State(catalog): State<Arc<TaskCatalog>>) -> ApiResult<Vec<Task>> {
    Ok(Json(catalog.list_tasks().await?))
}
