/// Item endpoints
///
/// All item endpoints require JWT authentication.
///
/// # Endpoints
///
/// - `POST /Api/items/create` - Create an item
/// - `GET /Api/items/read/:id` - Read an item
/// - `GET /Api/items/list` - List items
/// - `GET /Api/items/category/:category` - List items in a category
/// - `GET /Api/items/list/merchant/:merchant` - List items with this exact name
/// - `PUT /Api/items/update/:id` - Update an item
/// - `DELETE /Api/items/delete/:id` - Delete an item

use crate::{
    app::AppState,
    error::ApiResult,
    extract::Payload,
    routes::{parse_id, Created},
    serializers::ItemView,
    validators::item::{CreateItemRequest, UpdateItemRequest},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use orderly_shared::{
    auth::middleware::AuthContext,
    models::{
        item::{Item, ItemFilter},
        ListParams,
    },
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ItemBody {
    pub item: ItemView,
}

#[derive(Debug, Serialize)]
pub struct ItemsBody {
    pub items: Vec<ItemView>,
}

impl ItemsBody {
    fn from_records(items: &[Item]) -> Self {
        Self {
            items: items.iter().map(ItemView::from).collect(),
        }
    }
}

/// Create an item
///
/// # Endpoint
///
/// ```text
/// POST /Api/items/create
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "item": {
///     "name": "Rice",
///     "unit": "kg",
///     "unit_price": "19.99",
///     "status": "available",
///     "category": "grain"
///   }
/// }
/// ```
///
/// `status` defaults to `available` and `category` to `any`.
///
/// # Errors
///
/// - `400 Bad Request`: Body could not be parsed
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Payload(req): Payload<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<Created<ItemBody>>)> {
    let record = req.bind()?;
    let item = Item::create(&state.db, record).await?;

    info!(item_id = %item.id, created_by = %auth.user_id, "Item created");

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "Item created successfully".to_string(),
            record: ItemBody {
                item: ItemView::from(&item),
            },
        }),
    ))
}

pub async fn read_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemBody>> {
    let id = parse_id("item", &id)?;
    let item = Item::get(&state.db, id).await?;

    Ok(Json(ItemBody {
        item: ItemView::from(&item),
    }))
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ItemsBody>> {
    let items = Item::list(&state.db, params).await?;
    Ok(Json(ItemsBody::from_records(&items)))
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ItemsBody>> {
    let filter = ItemFilter {
        category: Some(category),
        ..Default::default()
    };
    let items = Item::find_by(&state.db, &filter, params).await?;

    Ok(Json(ItemsBody::from_records(&items)))
}

/// List items whose name equals the merchant path segment
pub async fn list_by_merchant(
    State(state): State<AppState>,
    Path(merchant): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ItemsBody>> {
    let filter = ItemFilter {
        name: Some(merchant),
        ..Default::default()
    };
    let items = Item::find_by(&state.db, &filter, params).await?;

    Ok(Json(ItemsBody::from_records(&items)))
}

/// Update an item
///
/// # Errors
///
/// - `400 Bad Request`: Malformed id or body
/// - `404 Not Found`: No such item
/// - `422 Unprocessable Entity`: Validation failed or nothing changed
pub async fn update_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Payload(req): Payload<UpdateItemRequest>,
) -> ApiResult<Json<ItemBody>> {
    let id = parse_id("item", &id)?;
    let patch = req.bind()?;
    let item = Item::update(&state.db, id, patch).await?;

    info!(item_id = %item.id, updated_by = %auth.user_id, "Item updated");

    Ok(Json(ItemBody {
        item: ItemView::from(&item),
    }))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("item", &id)?;
    Item::delete(&state.db, id).await?;

    info!(item_id = %id, deleted_by = %auth.user_id, "Item deleted");

    Ok(StatusCode::NO_CONTENT)
}
