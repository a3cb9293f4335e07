/// Order endpoints
///
/// All order endpoints require JWT authentication. Responses embed the
/// ordering user's contact details and the full item.
///
/// # Endpoints
///
/// - `POST /Api/orders/create` - Place an order
/// - `GET /Api/orders/read/:id` - Read an order
/// - `GET /Api/orders/list` - List orders
/// - `PUT /Api/orders/update/:id` - Update quantity, total or status
/// - `DELETE /Api/orders/delete/:id` - Delete an order

use crate::{
    app::AppState,
    error::ApiResult,
    extract::Payload,
    routes::{parse_id, Created},
    serializers::OrderView,
    validators::order::{CreateOrderRequest, UpdateOrderRequest},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use orderly_shared::{
    auth::middleware::AuthContext,
    models::{
        order::{Order, OrderRelations},
        ListParams,
    },
};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct OrderBody {
    pub order: OrderView,
}

#[derive(Debug, Serialize)]
pub struct OrdersBody {
    pub orders: Vec<OrderView>,
}

async fn view_of(pool: &PgPool, order: Order) -> ApiResult<OrderView> {
    let relations = OrderRelations::load(pool, std::slice::from_ref(&order)).await?;
    Ok(OrderView::new(&order, &relations))
}

/// Place an order
///
/// # Endpoint
///
/// ```text
/// POST /Api/orders/create
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "order": {
///     "user_id": "uuid",
///     "item_id": "uuid",
///     "quantity": 3
///   }
/// }
/// ```
///
/// `total_price` defaults to `quantity × unit_price` of the item and
/// `status` to `pending`.
///
/// # Errors
///
/// - `400 Bad Request`: Body could not be parsed
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `422 Unprocessable Entity`: Validation failed, or the user or item does not exist
pub async fn create_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Payload(req): Payload<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<Created<OrderBody>>)> {
    let record = req.bind(&state.db).await?;
    let order = Order::create(&state.db, record).await?;

    info!(
        order_id = %order.id,
        user_id = %order.user_id,
        item_id = %order.item_id,
        created_by = %auth.user_id,
        "Order created"
    );

    let order = view_of(&state.db, order).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "Order created successfully".to_string(),
            record: OrderBody { order },
        }),
    ))
}

pub async fn read_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderBody>> {
    let id = parse_id("order", &id)?;
    let order = Order::get(&state.db, id).await?;

    Ok(Json(OrderBody {
        order: view_of(&state.db, order).await?,
    }))
}

/// List orders, oldest first
///
/// Users and items for the whole page are loaded with one query each.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<OrdersBody>> {
    let orders = Order::list(&state.db, params).await?;
    let relations = OrderRelations::load(&state.db, &orders).await?;

    Ok(Json(OrdersBody {
        orders: OrderView::many(&orders, &relations),
    }))
}

/// Update an order
///
/// The user and item are fixed; only quantity, total price and status
/// change. Fields absent from the body keep their values.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id or body
/// - `404 Not Found`: No such order
/// - `422 Unprocessable Entity`: Validation failed or nothing changed
pub async fn update_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Payload(req): Payload<UpdateOrderRequest>,
) -> ApiResult<Json<OrderBody>> {
    let id = parse_id("order", &id)?;
    let patch = req.bind()?;
    let order = Order::update(&state.db, id, patch).await?;

    info!(order_id = %order.id, status = %order.status, updated_by = %auth.user_id, "Order updated");

    Ok(Json(OrderBody {
        order: view_of(&state.db, order).await?,
    }))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("order", &id)?;
    Order::delete(&state.db, id).await?;

    info!(order_id = %id, deleted_by = %auth.user_id, "Order deleted");

    Ok(StatusCode::NO_CONTENT)
}
