/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a new user
/// - `POST /auth/login` - Login and get a token
///
/// Both answer with the user's safe projection and an access token:
///
/// ```json
/// {
///   "user": {
///     "id": "uuid",
///     "name": "Jane Doe",
///     "email": "jane@example.com",
///     "role": "EMPLOYEE",
///     "createdAt": "2026-01-03T12:00:00Z",
///     "updatedAt": "2026-01-03T12:00:00Z"
///   },
///   "accessToken": "eyJ..."
/// }
/// ```

use crate::{app::AppState, error::ApiResult, routes::ValidatedJson};
use axum::{extract::State, http::StatusCode, Json};
use minicrm_shared::services::auth::{self, AuthSession, LoginInput, RegisterInput};

/// Register a new user
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "password": "SecureP@ss123",
///   "role": "EMPLOYEE"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterInput>,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let session = auth::register(state.store.as_ref(), &state.tokens, req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Login endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginInput>,
) -> ApiResult<Json<AuthSession>> {
    let session = auth::login(state.store.as_ref(), &state.tokens, req).await?;
    Ok(Json(session))
}
