use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::CheckoutRequest,
    error::{AppError, AppResult},
    models::{CartItem, Customer, DeliveryAddress, DeliveryType, Order, OrderStatus, Payment},
    response::ApiResponse,
    services::cart_service::Cart,
    state::AppState,
    store::{AppendOutcome, OrderStore},
};

/// Subtotal from which delivery is free (inclusive).
pub fn free_delivery_threshold() -> Decimal {
    Decimal::new(4000, 2)
}

pub fn standard_delivery_fee() -> Decimal {
    Decimal::new(500, 2)
}

pub fn delivery_fee(subtotal: Decimal) -> Decimal {
    if subtotal >= free_delivery_threshold() {
        Decimal::ZERO
    } else {
        standard_delivery_fee()
    }
}

pub fn estimated_delivery_time(delivery_type: DeliveryType, now: DateTime<Utc>) -> DateTime<Utc> {
    let minutes = match delivery_type {
        DeliveryType::Delivery => 45,
        DeliveryType::Pickup => 30,
    };
    now + Duration::minutes(minutes)
}

/// Checkout input that passed validation.
#[derive(Debug, Clone)]
pub struct ValidCheckout {
    pub customer: Customer,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<DeliveryAddress>,
    pub payment: Payment,
    pub observations: Option<String>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require(missing: &mut Vec<&'static str>, field: &'static str, value: &str) {
    if is_blank(value) {
        missing.push(field);
    }
}

pub fn validate_checkout(payload: CheckoutRequest) -> AppResult<ValidCheckout> {
    let CheckoutRequest {
        customer,
        delivery_type,
        delivery_address,
        payment,
        observations,
    } = payload;

    let mut missing = Vec::new();
    require(&mut missing, "customer.name", &customer.name);
    require(&mut missing, "customer.whatsapp", &customer.whatsapp);
    require(&mut missing, "customer.cpf", &customer.cpf);
    require(&mut missing, "customer.email", &customer.email);

    let delivery_address = match delivery_type {
        DeliveryType::Delivery => match delivery_address {
            Some(address) => {
                require(&mut missing, "delivery_address.street", &address.street);
                require(&mut missing, "delivery_address.number", &address.number);
                require(
                    &mut missing,
                    "delivery_address.neighborhood",
                    &address.neighborhood,
                );
                require(&mut missing, "delivery_address.city", &address.city);
                require(&mut missing, "delivery_address.zip_code", &address.zip_code);
                Some(DeliveryAddress {
                    complement: address.complement.filter(|c| !is_blank(c)),
                    ..address
                })
            }
            None => {
                missing.push("delivery_address");
                None
            }
        },
        // Pickup orders never carry an address, even if one was sent.
        DeliveryType::Pickup => None,
    };

    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let payment = Payment::try_from(payment)?;

    Ok(ValidCheckout {
        customer,
        delivery_type,
        delivery_address,
        payment,
        observations: observations.filter(|o| !is_blank(o)),
    })
}

/// Prices the items and builds a `received` order stamped at `now`.
pub fn build_order(items: &[CartItem], checkout: ValidCheckout, now: DateTime<Utc>) -> AppResult<Order> {
    if items.is_empty() {
        return Err(AppError::validation("cart is empty"));
    }

    let subtotal: Decimal = items.iter().map(|item| item.total_price).sum();
    let delivery_fee = delivery_fee(subtotal);

    Ok(Order {
        id: Uuid::new_v4(),
        items: items.to_vec(),
        customer: checkout.customer,
        delivery_type: checkout.delivery_type,
        delivery_address: checkout.delivery_address,
        payment: checkout.payment,
        status: OrderStatus::Received,
        created_at: now,
        updated_at: now,
        estimated_delivery_time: Some(estimated_delivery_time(checkout.delivery_type, now)),
        subtotal,
        delivery_fee,
        total_amount: subtotal + delivery_fee,
        observations: checkout.observations,
    })
}

/// Creates an order from the cart and appends it to the store.
///
/// A retry carrying an already used `idempotency_key` returns the first
/// order without validating again, so it also succeeds after the cart was
/// cleared by the first attempt. Keys are scoped to the cart: the same key
/// sent for another cart never replays this cart's order. Nothing is
/// appended on failure.
pub async fn create_order(
    store: &dyn OrderStore,
    cart: &Cart,
    payload: CheckoutRequest,
    idempotency_key: Option<String>,
    now: DateTime<Utc>,
) -> AppResult<AppendOutcome> {
    let idempotency_key = idempotency_key.map(|key| scoped_key(cart.id(), &key));
    if let Some(key) = idempotency_key.as_deref() {
        if let Some(existing) = store.find_by_idempotency_key(key).await? {
            return Ok(AppendOutcome::Replayed(existing));
        }
    }

    if cart.is_empty() {
        return Err(AppError::validation("cart is empty"));
    }
    let checkout = validate_checkout(payload)?;
    let order = build_order(cart.items(), checkout, now)?;

    store.append_order(order, idempotency_key).await
}

fn scoped_key(cart_id: Uuid, key: &str) -> String {
    format!("{cart_id}:{key}")
}

pub async fn get_order_by_id(store: &dyn OrderStore, id: Uuid) -> AppResult<Option<Order>> {
    store.get_order(id).await
}

/// Checks out a cart session: the cart is cleared only when the order was
/// created.
pub async fn checkout(
    state: &AppState,
    cart_id: Uuid,
    payload: CheckoutRequest,
    idempotency_key: Option<String>,
) -> AppResult<ApiResponse<Order>> {
    let idempotency_key = idempotency_key.filter(|key| !is_blank(key));
    let mut cart = state.carts.lock(cart_id).await?;

    let outcome = create_order(
        state.orders.as_ref(),
        &cart,
        payload,
        idempotency_key,
        Utc::now(),
    )
    .await?;

    match outcome {
        AppendOutcome::Created(order) => {
            cart.clear();
            tracing::info!(
                order_id = %order.id,
                total = %order.total_amount,
                items = order.items.len(),
                "order created"
            );
            audit::record(
                None,
                "checkout",
                "orders",
                serde_json::json!({ "order_id": order.id, "cart_id": cart_id }),
            );
            Ok(ApiResponse::success("Order created", order, None))
        }
        AppendOutcome::Replayed(order) => {
            tracing::info!(order_id = %order.id, "checkout replayed");
            Ok(ApiResponse::success("Order already created", order, None))
        }
    }
}

/// Public order tracking.
pub async fn track_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = get_order_by_id(state.orders.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok(order))
}
