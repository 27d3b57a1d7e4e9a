/// Task endpoints
///
/// - `POST /tasks` - Assign a task to an employee (admin)
/// - `GET /tasks` - Admins see every task, employees only their own
/// - `PATCH /tasks/:id/status` - Body `{"status": "IN_PROGRESS"}`; employees may
///   only move their own tasks

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{parse_id, ValidatedJson},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use minicrm_shared::{
    auth::principal::Principal,
    models::task::Task,
    services::tasks::{self, CreateTaskInput, UpdateStatusInput, TASK_NOT_FOUND},
};

pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTaskInput>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = tasks::create(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = tasks::find_all(state.store.as_ref(), &principal).await?;
    Ok(Json(tasks))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusInput>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id, TASK_NOT_FOUND)?;
    let Json(req) = payload?;
    let task = tasks::update_status(state.store.as_ref(), id, req.status, &principal).await?;
    Ok(Json(task))
}
