/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `root`: Welcome document
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `users`: User administration
/// - `customers`: Customer directory
/// - `tasks`: Task assignment

pub mod auth;
pub mod customers;
pub mod health;
pub mod root;
pub mod tasks;
pub mod users;

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

/// JSON body that has passed `validator` checks
///
/// Malformed JSON is a `BAD_REQUEST`; a body that parses but fails validation
/// is a `VALIDATION_ERROR` with per-field details.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Parses a path id; an id that is not a UUID names no record
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Customer not found").unwrap(), id);

        match parse_id("123", "Customer not found") {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Customer not found"),
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
