//! # Mini CRM Shared Library
//!
//! Domain types, storage and business rules behind the Mini CRM API.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, tokens, principals and role checks
//! - `db`: connection pool and migrations
//! - `models`: database rows and their SQL
//! - `store`: storage traits with Postgres and in-memory implementations
//! - `services`: registration, login, user administration, customers, tasks
//! - `pagination`: page window arithmetic for list endpoints
//! - `error`: the service error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod services;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
