/// Registration and login
///
/// Both operations end in a freshly issued bearer token and the caller's safe
/// user projection. No session state is kept server side.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{CreateUser, Role, SafeUser};
use crate::store::{StoreError, UserStore};

/// Returned for an unknown email and for a wrong password alike
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub const EMAIL_TAKEN: &str = "Email is already registered";

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: String,

    #[validate(email(message = "email must be an email"))]
    pub email: String,

    #[validate(length(min = 8, message = "password must be longer than or equal to 8 characters"))]
    pub password: String,

    /// Defaults to `EMPLOYEE`
    #[serde(default)]
    pub role: Role,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "email must be an email"))]
    pub email: String,

    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
}

/// A signed-in user and their token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: SafeUser,
    pub access_token: String,
}

/// Creates an account and signs it in
///
/// # Errors
///
/// - `Conflict` if the email is already registered, including when a
///   concurrent registration wins the race at insert time
pub async fn register<S>(
    store: &S,
    tokens: &TokenIssuer,
    input: RegisterInput,
) -> ServiceResult<AuthSession>
where
    S: UserStore + ?Sized,
{
    if store.find_user_by_email(&input.email).await?.is_some() {
        return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = hash_password_blocking(input.password).await?;

    let user = store
        .insert_user(CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: input.role,
        })
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation { .. } => ServiceError::Conflict(EMAIL_TAKEN.to_string()),
            other => other.into(),
        })?;

    let access_token = tokens.issue(&user)?;
    info!(user_id = %user.id, role = %user.role, "User registered");

    Ok(AuthSession {
        user: user.into(),
        access_token,
    })
}

/// Signs in with email and password
///
/// # Errors
///
/// - `Authentication` with [`INVALID_CREDENTIALS`] if the email is unknown or
///   the password is wrong
pub async fn login<S>(store: &S, tokens: &TokenIssuer, input: LoginInput) -> ServiceResult<AuthSession>
where
    S: UserStore + ?Sized,
{
    let Some(user) = store.find_user_by_email(&input.email).await? else {
        warn!("Login rejected: unknown email");
        return Err(ServiceError::Authentication(INVALID_CREDENTIALS.to_string()));
    };

    let valid = verify_password_blocking(input.password, user.password_hash.clone()).await?;
    if !valid {
        warn!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ServiceError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    let access_token = tokens.issue(&user)?;
    info!(user_id = %user.id, "User logged in");

    Ok(AuthSession {
        user: user.into(),
        access_token,
    })
}
