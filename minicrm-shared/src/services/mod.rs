/// Business operations
///
/// Each service is a set of async functions generic over the store traits they
/// need. Callers pass the store and, where identity matters, the [`Principal`]
/// explicitly; nothing here reads ambient request state.
///
/// # Services
///
/// - [`auth`]: registration and login
/// - [`users`]: admin user listing and role changes
/// - [`customers`]: the customer directory
/// - [`tasks`]: task assignment with ownership rules
///
/// [`Principal`]: crate::auth::principal::Principal

pub mod auth;
pub mod customers;
pub mod tasks;
pub mod users;
