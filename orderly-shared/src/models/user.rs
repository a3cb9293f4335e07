//! User model and database operations
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(255) NOT NULL,
//!     phone VARCHAR(64) NOT NULL,
//!     role VARCHAR(64) NOT NULL,
//!     status VARCHAR(64) NOT NULL,
//!     location VARCHAR(255) NOT NULL,
//!     email VARCHAR(255) NOT NULL UNIQUE,
//!     password_hash VARCHAR(255) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::ListParams;
use crate::db::gateway::{self, Record};
use crate::error::{StoreError, StoreResult};

const COLUMNS: &str =
    "id, name, phone, role, status, location, email, password_hash, created_at, updated_at";

/// User model representing a back-office account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The hash is
/// not `Serialize`d; responses go through the user view instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Free-form role label
    pub role: String,

    /// Free-form account status label
    pub status: String,

    /// Location description
    pub location: String,

    /// Email address, unique across users; the login identity
    pub email: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl Record for User {
    const TABLE: &'static str = "users";
    const ENTITY: &'static str = "user";
}

/// Input for creating a new user
///
/// `password_hash` must already be hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub phone: String,
    pub role: String,
    pub status: String,
    pub location: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update for a user
///
/// Only `Some` fields are written. A patch whose every `Some` field equals
/// the stored value is a no-op and is reported as
/// [`StoreError::NoRowsAffected`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// Whether the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint database error if the email is taken.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users (name, phone, role, status, location, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.name)
            .bind(data.phone)
            .bind(data.role)
            .bind(data.status)
            .bind(data.location)
            .bind(data.email)
            .bind(data.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Loads a user by ID, failing with [`StoreError::NotFound`] if absent
    pub async fn get(pool: &PgPool, id: Uuid) -> StoreResult<Self> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: Self::ENTITY,
                id,
            })
    }

    /// Finds a user by email address (exact match)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Loads every user whose id is in `ids`, in no particular order
    pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1)");

        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Lists users, oldest first
    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// Applies a patch
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the user does not exist
    /// - [`StoreError::NoRowsAffected`] if the patch is empty or changes nothing
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateUser) -> StoreResult<Self> {
        if data.is_empty() {
            return Err(gateway::classify_missed_update::<Self>(pool, id).await);
        }

        let query = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                role = COALESCE($4, role),
                status = COALESCE($5, status),
                location = COALESCE($6, location),
                email = COALESCE($7, email),
                password_hash = COALESCE($8, password_hash),
                updated_at = NOW()
            WHERE id = $1
              AND (name, phone, role, status, location, email, password_hash)
                  IS DISTINCT FROM
                  (COALESCE($2, name), COALESCE($3, phone), COALESCE($4, role),
                   COALESCE($5, status), COALESCE($6, location), COALESCE($7, email),
                   COALESCE($8, password_hash))
            RETURNING {COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.phone)
            .bind(data.role)
            .bind(data.status)
            .bind(data.location)
            .bind(data.email)
            .bind(data.password_hash)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(user) => Ok(user),
            None => Err(gateway::classify_missed_update::<Self>(pool, id).await),
        }
    }

    /// Permanently deletes a user
    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<()> {
        gateway::delete::<Self>(pool, id).await
    }
}
