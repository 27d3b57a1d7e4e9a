/// Role and ownership checks
///
/// Everything here is pure: no I/O, no database. Checks take an already
/// authenticated [`Principal`], so they must only run after authentication.
///
/// # Permission Model
///
/// 1. **Role gate**: each protected route declares the set of roles allowed to call it
/// 2. **Ownership**: for tasks, an `EMPLOYEE` may only act on tasks assigned to them,
///    while an `ADMIN` may act on any task
///
/// # Example
///
/// ```
/// use minicrm_shared::auth::authorization::{authorize, require_owner_or_admin};
/// use minicrm_shared::auth::principal::Principal;
/// use minicrm_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let employee = Principal::new(Uuid::new_v4(), Role::Employee, "e@example.com");
///
/// assert!(authorize(&employee, &[Role::Admin, Role::Employee]).is_ok());
/// assert!(authorize(&employee, &[Role::Admin]).is_err());
/// assert!(require_owner_or_admin(&employee, employee.id).is_ok());
/// assert!(require_owner_or_admin(&employee, Uuid::new_v4()).is_err());
/// ```

use uuid::Uuid;

use super::principal::Principal;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Principal's role is not in the allowed set
    #[error("Insufficient permissions: role {actual} is not allowed")]
    InsufficientRole { actual: Role },

    /// Principal does not own the resource
    #[error("Not authorized to access this resource")]
    NotOwner,
}

/// Accepts the principal if its role is in `allowed`
///
/// An empty `allowed` set rejects everyone.
pub fn authorize(principal: &Principal, allowed: &[Role]) -> Result<(), AuthzError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            actual: principal.role,
        })
    }
}

/// Accepts any admin, or an employee acting on a resource they own
pub fn require_owner_or_admin(principal: &Principal, owner_id: Uuid) -> Result<(), AuthzError> {
    match principal.role {
        Role::Admin => Ok(()),
        Role::Employee if principal.id == owner_id => Ok(()),
        Role::Employee => Err(AuthzError::NotOwner),
    }
}
