/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 bearer token issuing and validation
/// - [`principal`]: the identity a verified token proves
/// - [`session`]: bearer token extraction and request authentication
/// - [`authorization`]: pure role and ownership checks
///
/// # Example
///
/// ```no_run
/// use minicrm_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod session;
