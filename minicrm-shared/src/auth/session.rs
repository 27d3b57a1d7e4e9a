/// Request authentication from bearer tokens
///
/// Turns the `Authorization: Bearer <token>` header of an inbound request into a
/// [`Principal`], or explains why it cannot. The API's auth layer calls
/// [`authenticate`] before any route-level authorization runs.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use chrono::Duration;
/// use minicrm_shared::auth::jwt::{create_token, Claims, TokenIssuer};
/// use minicrm_shared::auth::session::authenticate;
/// use minicrm_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes-long";
/// let issuer = TokenIssuer::new(secret, Duration::hours(1));
/// let token = create_token(&Claims::new(Uuid::new_v4(), Role::Admin, "a@example.com"), secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
///
/// let principal = authenticate(&headers, &issuer)?;
/// assert_eq!(principal.role, Role::Admin);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};

use super::jwt::{JwtError, TokenIssuer};
use super::principal::Principal;

/// Why a request could not be authenticated
///
/// Every variant is an authentication failure (HTTP 401).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("{0}")]
    InvalidToken(String),
}

/// Extracts the token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Authorization header is not valid ASCII".to_string()))?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    Ok(token)
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// Returns `AuthError` if the header is absent or malformed, or the token is
/// expired, wrongly signed or otherwise invalid.
pub fn authenticate(headers: &HeaderMap, issuer: &TokenIssuer) -> Result<Principal, AuthError> {
    let token = bearer_token(headers)?;

    let claims = issuer.verify(token).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    Ok(Principal::from(claims))
}
