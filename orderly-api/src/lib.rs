//! # Orderly API Server Library
//!
//! HTTP surface of the Orderly back office: users, items, orders and
//! merchant companies over Axum and PostgreSQL.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request body binding (JSON, enveloped JSON, forms)
//! - `validators`: Request validation and binding into model records
//! - `serializers`: Response views
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod serializers;
pub mod validators;
