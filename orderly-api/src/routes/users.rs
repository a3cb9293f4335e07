/// User endpoints
///
/// # Endpoints
///
/// - `POST /Api/users/create` - Create a user (public)
/// - `POST /Api/users/login` - Exchange credentials for a token (public)
/// - `GET /Api/users/reset/:email` - Issue a password reset code (public)
/// - `GET /Api/users/read/:id` - Read a user
/// - `GET /Api/users/list` - List users
/// - `PUT /Api/users/update/:id` - Update a user
/// - `DELETE /Api/users/delete/:id` - Delete a user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Payload,
    routes::{parse_id, Created},
    serializers::UserView,
    validators::user::{CreateUserRequest, LoginRequest, UpdateUserRequest},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use orderly_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::{user::User, ListParams},
};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

/// Same answer for an unknown email and a wrong password
const LOGIN_FAILED: &str = "not registered email or invalid password";

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct UsersBody {
    pub users: Vec<UserView>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserView,

    /// Bearer token for the gated routes
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /Api/users/create
/// Content-Type: application/json
///
/// {
///   "user": {
///     "name": "Jane Doe",
///     "email": "jane@example.com",
///     "phone": "08012345678",
///     "password": "secret123",
///     "role": "admin",
///     "status": "active",
///     "location": "Lagos"
///   }
/// }
/// ```
///
/// The body may also be sent bare or form-encoded.
///
/// # Errors
///
/// - `400 Bad Request`: Body could not be parsed
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Payload(req): Payload<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<Created<UserBody>>)> {
    let record = req.bind(state.hashing_params()).await?;
    let user = User::create(&state.db, record).await?;

    info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "User created successfully".to_string(),
            record: UserBody {
                user: UserView::from(&user),
            },
        }),
    ))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /Api/users/login
/// Content-Type: application/json
///
/// { "email": "jane@example.com", "password": "secret123" }
/// ```
///
/// # Response
///
/// ```json
/// { "user": { "id": "uuid", ... }, "token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Unknown email or wrong password
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Payload(req): Payload<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.check()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Forbidden(LOGIN_FAILED.to_string()))?;

    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&req.password, &stored_hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))??;

    if !valid {
        warn!(user_id = %user.id, "Login failed: invalid password");
        return Err(ApiError::Forbidden(LOGIN_FAILED.to_string()));
    }

    let token = jwt::issue(
        user.id,
        &user.email,
        state.jwt_secret(),
        state.config.jwt.expiration(),
    )?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: UserView::from(&user),
        token,
    }))
}

/// Issue a password reset code
///
/// Generates a six-digit one-time code for the user with this email. The
/// code is not logged and not returned.
///
/// # Errors
///
/// - `404 Not Found`: No user with this email
pub async fn reset_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    let user = User::find_by_email(&state.db, email.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // TODO: deliver the code by email and persist it with an expiry once a mail transport exists
    let _code: u32 = rand::thread_rng().gen_range(100_000..=999_999);

    info!(user_id = %user.id, "Password reset code issued");

    Ok(Json(MessageBody {
        message: "Password reset code issued".to_string(),
    }))
}

pub async fn read_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserBody>> {
    let id = parse_id("user", &id)?;
    let user = User::get(&state.db, id).await?;

    Ok(Json(UserBody {
        user: UserView::from(&user),
    }))
}

/// List users, oldest first
///
/// Accepts `?limit=` (default 100, max 1000) and `?offset=`.
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<UsersBody>> {
    let users = User::list(&state.db, params).await?;

    Ok(Json(UsersBody {
        users: users.iter().map(UserView::from).collect(),
    }))
}

/// Update a user
///
/// Only the fields present in the body change. Sending the current values
/// back, or the unchanged-password marker alone, is a 422.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id or body
/// - `404 Not Found`: No such user
/// - `409 Conflict`: Email taken by another user
/// - `422 Unprocessable Entity`: Validation failed or nothing changed
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Payload(req): Payload<UpdateUserRequest>,
) -> ApiResult<Json<UserBody>> {
    let id = parse_id("user", &id)?;
    req.check()?;

    let current = User::get(&state.db, id).await?;
    let patch = req.bind(&current, state.hashing_params()).await?;
    let user = User::update(&state.db, id, patch).await?;

    info!(user_id = %user.id, updated_by = %auth.user_id, "User updated");

    Ok(Json(UserBody {
        user: UserView::from(&user),
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("user", &id)?;
    User::delete(&state.db, id).await?;

    info!(user_id = %id, deleted_by = %auth.user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
