/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use orderly_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = orderly_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use orderly_shared::auth::{middleware::authenticate, password::HashingParams};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Argon2 cost for new password hashes
    pub fn hashing_params(&self) -> HashingParams {
        self.config.password.into()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /Api/
///     ├── /users/
///     │   ├── POST   /create         # public
///     │   ├── POST   /login          # public
///     │   ├── GET    /reset/:email   # public
///     │   ├── GET    /read/:id
///     │   ├── GET    /list
///     │   ├── PUT    /update/:id
///     │   └── DELETE /delete/:id
///     ├── /items/                    # create, read, list, update, delete
///     │   ├── GET    /category/:category
///     │   └── GET    /list/merchant/:merchant
///     ├── /orders/                   # create, read, list, update, delete
///     └── /company/                  # create, read, list, update, delete
/// ```
///
/// Everything except the routes marked public goes through the JWT gate.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-router basis)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_user_routes = Router::new()
        .route("/create", post(routes::users::create_user))
        .route("/login", post(routes::users::login))
        .route("/reset/:email", get(routes::users::reset_password));

    let gated_user_routes = Router::new()
        .route("/read/:id", get(routes::users::read_user))
        .route("/list", get(routes::users::list_users))
        .route("/update/:id", put(routes::users::update_user))
        .route("/delete/:id", delete(routes::users::delete_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let item_routes = Router::new()
        .route("/create", post(routes::items::create_item))
        .route("/read/:id", get(routes::items::read_item))
        .route("/list", get(routes::items::list_items))
        .route("/category/:category", get(routes::items::list_by_category))
        .route("/list/merchant/:merchant", get(routes::items::list_by_merchant))
        .route("/update/:id", put(routes::items::update_item))
        .route("/delete/:id", delete(routes::items::delete_item));

    let order_routes = Router::new()
        .route("/create", post(routes::orders::create_order))
        .route("/read/:id", get(routes::orders::read_order))
        .route("/list", get(routes::orders::list_orders))
        .route("/update/:id", put(routes::orders::update_order))
        .route("/delete/:id", delete(routes::orders::delete_order));

    let company_routes = Router::new()
        .route("/create", post(routes::company::create_company))
        .route("/read/:id", get(routes::company::read_company))
        .route("/list", get(routes::company::list_companies))
        .route("/update/:id", put(routes::company::update_company))
        .route("/delete/:id", delete(routes::company::delete_company));

    let gated_routes = Router::new()
        .nest("/items", item_routes)
        .nest("/orders", order_routes)
        .nest("/company", company_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/users", public_user_routes.merge(gated_user_routes))
        .merge(gated_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/Api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Verifies the bearer token and injects the resulting
/// [`AuthContext`](orderly_shared::auth::middleware::AuthContext) into
/// request extensions. Rejected requests never reach a handler.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(req.headers(), state.jwt_secret()).map_err(|e| {
        tracing::debug!(reason = %e, path = %req.uri().path(), "Request rejected by auth gate");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
