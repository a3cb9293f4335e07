//! User request validation and binding

use orderly_shared::auth::password::{self, HashingParams};
use orderly_shared::models::user::{CreateUser, UpdateUser, User};
use serde::Deserialize;
use validator::Validate;

use super::FieldCheck;
use crate::error::{ApiError, ApiResult};
use crate::extract::Envelope;

/// Password value meaning "keep the stored password"
///
/// Clients that echo a user record back for editing send this instead of a
/// real password.
pub const UNCHANGED_PASSWORD: &str = "SJSKKSKSFIKDKDFLWWOWO1873300";

/// Body of `POST /users/create`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 4, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "must be a valid email address"), length(max = 255))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 10, max = 64))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 4, message = "must be at least 4 characters"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub role: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub status: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub location: String,
}

impl Envelope for CreateUserRequest {
    const KEYS: &'static [&'static str] = &["user", "User"];
}

impl CreateUserRequest {
    /// Validates the request and hashes the password
    pub async fn bind(self, params: HashingParams) -> ApiResult<CreateUser> {
        let mut check = FieldCheck::of(&self);
        check.filled("role", &self.role);
        check.filled("status", &self.status);
        check.filled("location", &self.location);
        if self.password == UNCHANGED_PASSWORD {
            check.add("password", "must be a real password");
        }
        check.finish()?;

        let password_hash = hash_off_runtime(self.password, params).await?;

        Ok(CreateUser {
            name: self.name,
            phone: self.phone,
            role: self.role,
            status: self.status,
            location: self.location,
            email: self.email,
            password_hash,
        })
    }
}

/// Body of `PUT /users/update/:id`
///
/// Every field is optional; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 4, max = 255))]
    pub name: Option<String>,

    #[validate(email(message = "must be a valid email address"), length(max = 255))]
    pub email: Option<String>,

    #[validate(length(min = 10, max = 64))]
    pub phone: Option<String>,

    #[validate(length(min = 4, message = "must be at least 4 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub role: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub status: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
}

impl Envelope for UpdateUserRequest {
    const KEYS: &'static [&'static str] = &["user", "User"];
}

impl UpdateUserRequest {
    /// Checks field rules without touching the store
    pub fn check(&self) -> ApiResult<()> {
        FieldCheck::of(self).finish()
    }

    /// Builds the patch for `current`
    ///
    /// The password is rehashed only when it is neither the
    /// [`UNCHANGED_PASSWORD`] marker nor the password already stored.
    pub async fn bind(self, current: &User, params: HashingParams) -> ApiResult<UpdateUser> {
        self.check()?;

        let password_hash = match self.password {
            None => None,
            Some(p) if p == UNCHANGED_PASSWORD => None,
            Some(p) => {
                if verify_off_runtime(p.clone(), current.password_hash.clone()).await? {
                    None
                } else {
                    Some(hash_off_runtime(p, params).await?)
                }
            }
        };

        Ok(UpdateUser {
            name: self.name,
            phone: self.phone,
            role: self.role,
            status: self.status,
            location: self.location,
            email: self.email,
            password_hash,
        })
    }
}

/// Body of `POST /users/login`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 4, message = "must be at least 4 characters"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub password: String,
}

impl Envelope for LoginRequest {
    const KEYS: &'static [&'static str] = &["user", "User", "login"];
}

impl LoginRequest {
    pub fn check(&self) -> ApiResult<()> {
        FieldCheck::of(self).finish()
    }
}

// Argon2 at production cost takes long enough to stall a runtime worker
async fn hash_off_runtime(password: String, params: HashingParams) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password_with(&password, &params))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

async fn verify_off_runtime(password: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(ApiError::from)
}
