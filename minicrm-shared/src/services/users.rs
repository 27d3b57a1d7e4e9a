/// User administration
///
/// Listing, lookup and role changes. Only admins reach these operations; the
/// route table enforces that before any of them run.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{Role, SafeUser};
use crate::store::UserStore;

pub const USER_NOT_FOUND: &str = "User not found";

/// Body of a role change
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateRoleInput {
    pub role: Role,
}

/// Every user, newest first
pub async fn find_all<S>(store: &S) -> ServiceResult<Vec<SafeUser>>
where
    S: UserStore + ?Sized,
{
    let users = store.list_users().await?;
    Ok(users.into_iter().map(SafeUser::from).collect())
}

pub async fn find_by_id<S>(store: &S, id: Uuid) -> ServiceResult<SafeUser>
where
    S: UserStore + ?Sized,
{
    store
        .find_user_by_id(id)
        .await?
        .map(SafeUser::from)
        .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))
}

/// Changes a user's role
///
/// Tokens already issued keep the old role until they expire.
pub async fn update_role<S>(store: &S, id: Uuid, role: Role) -> ServiceResult<SafeUser>
where
    S: UserStore + ?Sized,
{
    let user = store
        .update_user_role(id, role)
        .await?
        .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))?;

    info!(user_id = %user.id, role = %user.role, "User role updated");
    Ok(user.into())
}
