//! # Mini CRM API Server Library
//!
//! HTTP surface of the Mini CRM: routing, authentication layers, request
//! validation and error mapping over the services in `minicrm-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and auth layers
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `policy`: Role requirements per route
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod policy;
pub mod routes;
