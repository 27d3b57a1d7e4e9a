/// User administration endpoints (admin only)
///
/// - `GET /users` - List users
/// - `GET /users/:id` - Get one user
/// - `PATCH /users/:id` - Change a user's role, body `{"role": "ADMIN"}`

use crate::{app::AppState, error::ApiResult, routes::parse_id};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use minicrm_shared::{
    models::user::SafeUser,
    services::users::{self, UpdateRoleInput, USER_NOT_FOUND},
};

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<SafeUser>>> {
    let users = users::find_all(state.store.as_ref()).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SafeUser>> {
    let id = parse_id(&id, USER_NOT_FOUND)?;
    let user = users::find_by_id(state.store.as_ref(), id).await?;
    Ok(Json(user))
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRoleInput>, JsonRejection>,
) -> ApiResult<Json<SafeUser>> {
    let id = parse_id(&id, USER_NOT_FOUND)?;
    let Json(req) = payload?;
    let user = users::update_role(state.store.as_ref(), id, req.role).await?;
    Ok(Json(user))
}
