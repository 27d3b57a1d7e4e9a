/// Database models for the CRM
///
/// Each model owns its SQL and exposes async CRUD functions over a `PgPool`.
/// Services never call these directly; they go through the `store` traits,
/// whose Postgres implementation delegates here.
///
/// # Models
///
/// - `user`: accounts, roles and the safe user projection
/// - `customer`: the customer directory with search and pagination queries
/// - `task`: tasks joined with assignee and customer projections

pub mod customer;
pub mod task;
pub mod user;
