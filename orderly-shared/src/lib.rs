//! # Orderly Shared Library
//!
//! Persistence, auth primitives and shared types used by the Orderly API
//! server.
//!
//! ## Module Organization
//!
//! - `db`: connection pool, migrations and entity-generic queries
//! - `models`: user, company, item and order records with their CRUD
//! - `auth`: password hashing, JWT and bearer-token checks
//! - `codec`: text encoding for list-valued columns
//! - `error`: persistence error taxonomy

pub mod auth;
pub mod codec;
pub mod db;
pub mod error;
pub mod models;

/// Current version of the Orderly shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
