/// Bearer-token authentication primitives for Axum
///
/// [`authenticate`] turns request headers into an [`AuthContext`] or an
/// [`AuthError`]. The API crate wraps it in a middleware layer that inserts
/// the context into request extensions; handlers read it back with
/// `Extension<AuthContext>`.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use orderly_shared::auth::jwt::{create_token, Claims};
/// use orderly_shared::auth::middleware::authenticate;
/// use uuid::Uuid;
///
/// let secret = "your-secret-key-at-least-32-bytes";
/// let claims = Claims::new(Uuid::new_v4(), "jane@example.com".to_string());
/// let token = create_token(&claims, secret).unwrap();
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::AUTHORIZATION,
///     HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
/// );
///
/// let auth = authenticate(&headers, secret).unwrap();
/// assert_eq!(auth.user_id, claims.sub);
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims};

/// Authentication context added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Email carried by the token
    pub email: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Reasons a request fails the bearer check
///
/// The display strings are the messages returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Authorization header is required")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization token format")]
    InvalidFormat,

    /// Token failed verification; carries the verifier's reason
    #[error("Invalid or expired token")]
    InvalidToken(String),
}

impl AuthError {
    /// Extra detail for the response body, if any
    pub fn details(&self) -> Option<&str> {
        match self {
            AuthError::InvalidToken(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Extracts and verifies the bearer token in `headers`
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] if there is no `Authorization` header
/// - [`AuthError::InvalidFormat`] if it is not `Bearer <token>` or not ASCII
/// - [`AuthError::InvalidToken`] if the token does not verify
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?;

    let value = value.to_str().map_err(|_| AuthError::InvalidFormat)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, secret).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(AuthContext::from(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header() {
        let err = authenticate(&HeaderMap::new(), SECRET).unwrap_err();
        assert_eq!(err, AuthError::MissingCredentials);
        assert_eq!(err.to_string(), "Authorization header is required");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_wrong_scheme() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc", "Bearer ", "Token abc"] {
            let err = authenticate(&headers_with(value), SECRET).unwrap_err();
            assert_eq!(err, AuthError::InvalidFormat, "value {:?}", value);
            assert_eq!(err.to_string(), "Invalid authorization token format");
        }
    }

    #[test]
    fn test_invalid_token_has_details() {
        let err = authenticate(&headers_with("Bearer garbage"), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert_eq!(err.to_string(), "Invalid or expired token");
        assert!(err.details().is_some());
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "a@example.com".to_string(),
            Duration::hours(-2),
        );
        let token = create_token(&claims, SECRET).unwrap();

        let err = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap_err();
        assert_eq!(err.details(), Some("Token has expired"));
    }

    #[test]
    fn test_valid_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "a@example.com".to_string());
        let token = create_token(&claims, SECRET).unwrap();

        let auth = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(
            auth,
            AuthContext {
                user_id,
                email: "a@example.com".to_string()
            }
        );
    }
}
