//! Database layer
//!
//! - `pool`: connection pool creation, health checks and statistics
//! - `migrations`: embedded schema migrations
//! - `gateway`: entity-generic primitives (existence, delete-by-id)
//!
//! Entity records and their column-specific queries are in
//! [`crate::models`].

pub mod gateway;
pub mod migrations;
pub mod pool;
