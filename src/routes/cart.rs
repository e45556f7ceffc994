use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        cart::{CartItemRequest, CartView, UpdateQuantityRequest},
        orders::CheckoutRequest,
    },
    error::AppResult,
    models::{CartItem, Order},
    response::ApiResponse,
    services::{cart_service, order_service},
    state::AppState,
};

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_cart))
        .route("/{cart_id}", get(get_cart).delete(close_cart))
        .route("/{cart_id}/items", post(add_item).delete(clear_cart))
        .route(
            "/{cart_id}/items/{item_id}",
            put(replace_item).delete(remove_item),
        )
        .route("/{cart_id}/items/{item_id}/quantity", patch(update_quantity))
        .route("/{cart_id}/checkout", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/carts",
    responses(
        (status = 200, description = "Open a cart session", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn open_cart(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::open_cart(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/carts/{cart_id}",
    params(("cart_id" = Uuid, Path, description = "Cart session ID")),
    responses(
        (status = 200, description = "Cart with totals", body = ApiResponse<CartView>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, cart_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{cart_id}",
    params(("cart_id" = Uuid, Path, description = "Cart session ID")),
    responses(
        (status = 200, description = "Cart session closed", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn close_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::close_cart(&state, cart_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{cart_id}/items",
    params(("cart_id" = Uuid, Path, description = "Cart session ID")),
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Priced cart item", body = ApiResponse<CartItem>),
        (status = 404, description = "Cart or menu entry not found"),
        (status = 422, description = "Invalid selection or quantity"),
    ),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::add_item(&state, cart_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{cart_id}/items",
    params(("cart_id" = Uuid, Path, description = "Cart session ID")),
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartView>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::clear_cart(&state, cart_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/carts/{cart_id}/items/{item_id}",
    params(
        ("cart_id" = Uuid, Path, description = "Cart session ID"),
        ("item_id" = Uuid, Path, description = "Cart item ID")
    ),
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Cart item recomposed", body = ApiResponse<CartItem>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Invalid selection or quantity"),
    ),
    tag = "Cart"
)]
pub async fn replace_item(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CartItemRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::replace_item(&state, cart_id, item_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{cart_id}/items/{item_id}",
    params(
        ("cart_id" = Uuid, Path, description = "Cart session ID"),
        ("item_id" = Uuid, Path, description = "Cart item ID")
    ),
    responses(
        (status = 200, description = "Item removed (no-op when absent)", body = ApiResponse<CartView>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_item(&state, cart_id, item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/carts/{cart_id}/items/{item_id}/quantity",
    params(
        ("cart_id" = Uuid, Path, description = "Cart session ID"),
        ("item_id" = Uuid, Path, description = "Cart item ID")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartItem>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Invalid quantity"),
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::update_quantity(&state, cart_id, item_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{cart_id}/checkout",
    params(
        ("cart_id" = Uuid, Path, description = "Cart session ID"),
        ("Idempotency-Key" = Option<String>, Header, description = "Makes retries return the first order")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order created", body = ApiResponse<Order>),
        (status = 404, description = "Cart not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "Cart"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let resp = order_service::checkout(&state, cart_id, payload, idempotency_key).await?;
    Ok(Json(resp))
}
