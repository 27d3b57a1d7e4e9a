/// The authenticated caller of a request
///
/// A `Principal` exists only for the lifetime of one request. It is built from
/// verified token claims and handed explicitly to every service operation that
/// needs to know who is asking.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::user::Role;

/// Identity and role proven by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User ID (the token subject)
    pub id: Uuid,

    /// Role carried by the token
    pub role: Role,

    /// Email carried by the token
    pub email: String,
}

impl Principal {
    pub fn new(id: Uuid, role: Role, email: impl Into<String>) -> Self {
        Self {
            id,
            role,
            email: email.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            email: claims.email,
        }
    }
}
