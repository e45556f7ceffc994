use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        menu::{PizzaExtraRequest, PizzaFlavorRequest, PizzaTypeRequest},
        orders::{OrderList, UpdateOrderStatusRequest},
    },
    error::AppResult,
    middleware::auth::AuthAdmin,
    models::{DashboardStats, Order, PizzaExtra, PizzaFlavor, PizzaType},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{admin_service, catalog_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/dashboard", get(dashboard))
        .route("/menu/types", post(create_type))
        .route("/menu/types/{id}", put(update_type).delete(delete_type))
        .route("/menu/flavors", post(create_flavor))
        .route("/menu/flavors/{id}", put(update_flavor).delete(delete_flavor))
        .route("/menu/extras", post(create_extra))
        .route("/menu/extras/{id}", put(update_extra).delete(delete_extra))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<u64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<u64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders (admin only)", body = ApiResponse<OrderList>),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Unknown status filter"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthAdmin,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Any order (admin only)", body = ApiResponse<Order>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthAdmin,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status", body = ApiResponse<Order>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Invalid status or transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Order and revenue statistics", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthAdmin,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = admin_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/types",
    request_body = PizzaTypeRequest,
    responses(
        (status = 200, description = "Pizza type created", body = ApiResponse<PizzaType>),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn create_type(
    State(state): State<AppState>,
    user: AuthAdmin,
    Json(payload): Json<PizzaTypeRequest>,
) -> AppResult<Json<ApiResponse<PizzaType>>> {
    let resp = catalog_service::create_type(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/types/{id}",
    params(("id" = Uuid, Path, description = "Pizza type ID")),
    request_body = PizzaTypeRequest,
    responses(
        (status = 200, description = "Pizza type updated", body = ApiResponse<PizzaType>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn update_type(
    State(state): State<AppState>,
    user: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<PizzaTypeRequest>,
) -> AppResult<Json<ApiResponse<PizzaType>>> {
    let resp = catalog_service::update_type(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/types/{id}",
    params(("id" = Uuid, Path, description = "Pizza type ID")),
    responses(
        (status = 200, description = "Pizza type deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn delete_type(
    State(state): State<AppState>,
    user: AuthAdmin,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_type(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/flavors",
    request_body = PizzaFlavorRequest,
    responses(
        (status = 200, description = "Flavor created", body = ApiResponse<PizzaFlavor>),
        (status = 422, description = "Validation failed or unknown type"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn create_flavor(
    State(state): State<AppState>,
    user: AuthAdmin,
    Json(payload): Json<PizzaFlavorRequest>,
) -> AppResult<Json<ApiResponse<PizzaFlavor>>> {
    let resp = catalog_service::create_flavor(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/flavors/{id}",
    params(("id" = Uuid, Path, description = "Flavor ID")),
    request_body = PizzaFlavorRequest,
    responses(
        (status = 200, description = "Flavor updated", body = ApiResponse<PizzaFlavor>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation failed or unknown type"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn update_flavor(
    State(state): State<AppState>,
    user: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<PizzaFlavorRequest>,
) -> AppResult<Json<ApiResponse<PizzaFlavor>>> {
    let resp = catalog_service::update_flavor(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/flavors/{id}",
    params(("id" = Uuid, Path, description = "Flavor ID")),
    responses(
        (status = 200, description = "Flavor deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn delete_flavor(
    State(state): State<AppState>,
    user: AuthAdmin,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_flavor(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/extras",
    request_body = PizzaExtraRequest,
    responses(
        (status = 200, description = "Extra created", body = ApiResponse<PizzaExtra>),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn create_extra(
    State(state): State<AppState>,
    user: AuthAdmin,
    Json(payload): Json<PizzaExtraRequest>,
) -> AppResult<Json<ApiResponse<PizzaExtra>>> {
    let resp = catalog_service::create_extra(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/extras/{id}",
    params(("id" = Uuid, Path, description = "Extra ID")),
    request_body = PizzaExtraRequest,
    responses(
        (status = 200, description = "Extra updated", body = ApiResponse<PizzaExtra>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn update_extra(
    State(state): State<AppState>,
    user: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<PizzaExtraRequest>,
) -> AppResult<Json<ApiResponse<PizzaExtra>>> {
    let resp = catalog_service::update_extra(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/extras/{id}",
    params(("id" = Uuid, Path, description = "Extra ID")),
    responses(
        (status = 200, description = "Extra deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Menu"
)]
pub async fn delete_extra(
    State(state): State<AppState>,
    user: AuthAdmin,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_extra(&state, &user, id).await?;
    Ok(Json(resp))
}
