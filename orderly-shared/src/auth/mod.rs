/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token issuance and validation
/// - [`middleware`]: Bearer-token extraction into an [`middleware::AuthContext`]
///
/// # Example
///
/// ```
/// use orderly_shared::auth::jwt::{create_token, validate_token, Claims};
/// use orderly_shared::auth::password::{hash_password_with, verify_password, HashingParams};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = HashingParams { memory_kib: 1024, iterations: 1, parallelism: 1 };
/// let hash = hash_password_with("user_password", &params)?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string());
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validate_token(&token, "secret-key-at-least-32-bytes-long")?.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
