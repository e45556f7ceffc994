use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit,
    config::StatusPolicy,
    dto::orders::{OrderList, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthAdmin, ensure_admin},
    models::{DashboardStats, Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::dashboard_service::compute_stats,
    state::AppState,
    store::OrderStore,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthAdmin,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<OrderStatus>().map_err(AppError::Validation)?),
        None => None,
    };

    let mut orders: Vec<Order> = state
        .orders
        .list_orders()
        .await?
        .into_iter()
        .filter(|order| status.is_none_or(|s| order.status == s))
        .collect();

    match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => orders.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Desc => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    let total = orders.len() as u64;
    let items = orders
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthAdmin,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Order found", order, Some(Meta::empty())))
}

/// Decides whether `from -> to` is acceptable under `policy`.
pub fn check_transition(from: OrderStatus, to: OrderStatus, policy: StatusPolicy) -> AppResult<()> {
    if from == to || from.can_advance_to(to) {
        return Ok(());
    }
    match policy {
        StatusPolicy::Strict => Err(AppError::validation(format!(
            "cannot move order from {from} to {to}"
        ))),
        StatusPolicy::Lenient => {
            tracing::warn!(%from, %to, "non-adjacent order status change accepted");
            Ok(())
        }
    }
}

/// Sets an order's status. Setting the current status changes nothing.
///
/// The check and the write happen while the store holds the order, so
/// concurrent updates of one order serialize.
pub async fn update_status(
    store: &dyn OrderStore,
    id: Uuid,
    new_status: OrderStatus,
    policy: StatusPolicy,
) -> AppResult<Order> {
    store
        .update_order(id, &|order: &mut Order| {
            if order.status == new_status {
                return Ok(());
            }
            check_transition(order.status, new_status, policy)?;
            order.status = new_status;
            order.updated_at = Utc::now();
            Ok(())
        })
        .await
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthAdmin,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let new_status = payload
        .status
        .trim()
        .parse::<OrderStatus>()
        .map_err(AppError::Validation)?;

    let order = update_status(state.orders.as_ref(), id, new_status, state.status_policy()).await?;

    audit::record(
        Some(user.admin_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    );

    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

pub async fn dashboard(
    state: &AppState,
    user: &AuthAdmin,
) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;
    let orders = state.orders.list_orders().await?;
    let stats = compute_stats(&orders, Utc::now(), state.config.store_offset);
    Ok(ApiResponse::success("Dashboard", stats, Some(Meta::empty())))
}
