/// Service error taxonomy
///
/// Every service operation fails with a [`ServiceError`]. The variants map
/// one-to-one onto HTTP statuses in the API crate:
///
/// | Variant          | Status |
/// |------------------|--------|
/// | `Validation`     | 400    |
/// | `Authentication` | 401    |
/// | `Authorization`  | 403    |
/// | `NotFound`       | 404    |
/// | `Conflict`       | 409    |
/// | `Store`, `Internal` | 500 |
///
/// Storage signals that carry meaning (unique violations, missing rows) are
/// translated into the first five variants inside each service. Anything left
/// over propagates as `Store` and is treated as a server fault.

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input is well-formed but semantically invalid
    #[error("{0}")]
    Validation(String),

    /// Credentials are missing or wrong
    #[error("{0}")]
    Authentication(String),

    /// Caller is authenticated but not allowed
    #[error("{0}")]
    Authorization(String),

    /// A referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule was violated
    #[error("{0}")]
    Conflict(String),

    /// Unclassified storage failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Hashing or token signing failed
    #[error("{0}")]
    Internal(String),
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        ServiceError::Authorization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    #[test]
    fn test_display_is_the_message() {
        assert_eq!(
            ServiceError::NotFound("Customer not found".to_string()).to_string(),
            "Customer not found"
        );
    }

    #[test]
    fn test_authz_error_becomes_authorization() {
        let err: ServiceError = AuthzError::InsufficientRole {
            actual: Role::Employee,
        }
        .into();
        assert!(matches!(err, ServiceError::Authorization(_)));
    }

    #[test]
    fn test_store_error_passes_through() {
        let err: ServiceError = StoreError::NotFound.into();
        assert!(matches!(err, ServiceError::Store(StoreError::NotFound)));
    }
}
