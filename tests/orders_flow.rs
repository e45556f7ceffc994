mod common;

use chrono::{Duration, Utc};
use common::{
    Fixture, admin_principal, delivery_checkout, money, pickup_checkout, setup_state,
};
use pizzaria_api::{
    config::StatusPolicy,
    dto::{
        cart::CartItemRequest,
        orders::{PaymentMethod, PaymentRequest, UpdateOrderStatusRequest},
    },
    error::AppError,
    models::{CardBrand, CardType, DeliveryType, OrderStatus, Payment},
    routes::params::OrderListQuery,
    services::{
        admin_service,
        cart_service::{self, Cart},
        order_service,
    },
    state::AppState,
    store::{AppendOutcome, MemoryOrderStore, OrderStore},
};
use uuid::Uuid;

async fn cart_with_grande(state: &AppState, fx: &Fixture, quantity: i64) -> anyhow::Result<Uuid> {
    let cart_id = cart_service::open_cart(state).await?.data.expect("cart").id;
    cart_service::add_item(
        state,
        cart_id,
        CartItemRequest {
            pizza_type_id: fx.grande.id,
            flavor_id: fx.calabresa.id,
            extra_ids: vec![fx.bacon.id, fx.borda.id],
            quantity,
            observations: String::new(),
        },
    )
    .await?;
    Ok(cart_id)
}

// Storefront checks out a cart, tracks the order; admin moves it along and reads the dashboard.
#[tokio::test]
async fn checkout_track_and_admin_status_flow() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Strict).await?;
    let admin = admin_principal();
    let cart_id = cart_with_grande(&state, &fx, 2).await?;

    let order = order_service::checkout(&state, cart_id, delivery_checkout(), None)
        .await?
        .data
        .expect("order");

    assert_eq!(order.status, OrderStatus::Received);
    assert_eq!(order.subtotal, money(8000));
    assert_eq!(order.delivery_fee, money(0));
    assert_eq!(order.total_amount, money(8000));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.created_at, order.updated_at);

    let cart = cart_service::get_cart(&state, cart_id).await?.data.expect("cart");
    assert!(cart.items.is_empty(), "checkout empties the cart");

    let tracked = order_service::track_order(&state, order.id)
        .await?
        .data
        .expect("tracked");
    assert_eq!(tracked, order);

    for next in ["preparing", "out_for_delivery", "completed"] {
        let updated = admin_service::update_order_status(
            &state,
            &admin,
            order.id,
            UpdateOrderStatusRequest {
                status: next.into(),
            },
        )
        .await?
        .data
        .expect("order");
        assert_eq!(updated.status.as_str(), next);
        assert!(updated.updated_at >= order.updated_at);
    }

    let stats = admin_service::dashboard(&state, &admin)
        .await?
        .data
        .expect("stats");
    assert_eq!(stats.today_orders, 1);
    assert_eq!(stats.pending_orders, 0);
    assert_eq!(stats.revenue.today, money(8000));

    let listed = admin_service::list_all_orders(&state, &admin, OrderListQuery::default())
        .await?
        .data
        .expect("list");
    assert_eq!(listed.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_cart_checkout_appends_nothing() -> anyhow::Result<()> {
    let (state, _fx) = setup_state(StatusPolicy::Lenient).await?;
    let cart_id = cart_service::open_cart(&state).await?.data.expect("cart").id;

    let err = order_service::checkout(&state, cart_id, delivery_checkout(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(state.orders.list_orders().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn free_delivery_starts_at_exactly_forty() -> anyhow::Result<()> {
    let fx = Fixture::new();
    let store = MemoryOrderStore::new();
    let mut cart = Cart::new();
    cart.add_item(fx.grande.clone(), fx.calabresa.clone(), vec![fx.bacon.clone(), fx.borda.clone()], 1, "")?;

    let order = order_service::create_order(&store, &cart, delivery_checkout(), None, Utc::now())
        .await?
        .into_order();

    assert_eq!(order.subtotal, money(4000));
    assert_eq!(order.delivery_fee, money(0));
    assert_eq!(order.total_amount, money(4000));
    Ok(())
}

#[tokio::test]
async fn small_orders_pay_the_delivery_fee() -> anyhow::Result<()> {
    let fx = Fixture::new();
    let store = MemoryOrderStore::new();
    let mut cart = Cart::new();
    cart.add_item(fx.broto.clone(), fx.mussarela_broto.clone(), vec![], 1, "")?;

    let order = order_service::create_order(&store, &cart, pickup_checkout(), None, Utc::now())
        .await?
        .into_order();

    assert_eq!(order.subtotal, money(2000));
    assert_eq!(order.delivery_fee, money(500));
    assert_eq!(order.total_amount, money(2500));
    Ok(())
}

#[test]
fn delivery_fee_boundary() {
    assert_eq!(order_service::delivery_fee(money(3999)), money(500));
    assert_eq!(order_service::delivery_fee(money(4000)), money(0));
    assert_eq!(order_service::delivery_fee(money(4001)), money(0));
}

#[tokio::test]
async fn estimated_time_depends_on_delivery_type() -> anyhow::Result<()> {
    let fx = Fixture::new();
    let store = MemoryOrderStore::new();
    let mut cart = Cart::new();
    cart.add_item(fx.grande.clone(), fx.calabresa.clone(), vec![], 1, "")?;
    let now = Utc::now();

    let delivery = order_service::create_order(&store, &cart, delivery_checkout(), None, now)
        .await?
        .into_order();
    let pickup = order_service::create_order(&store, &cart, pickup_checkout(), None, now)
        .await?
        .into_order();

    assert_eq!(delivery.created_at, now);
    assert_eq!(delivery.estimated_delivery_time, Some(now + Duration::minutes(45)));
    assert_eq!(pickup.estimated_delivery_time, Some(now + Duration::minutes(30)));
    assert_ne!(delivery.id, pickup.id);
    Ok(())
}

#[tokio::test]
async fn pickup_drops_any_address() -> anyhow::Result<()> {
    let fx = Fixture::new();
    let store = MemoryOrderStore::new();
    let mut cart = Cart::new();
    cart.add_item(fx.grande.clone(), fx.calabresa.clone(), vec![], 1, "")?;

    let mut payload = pickup_checkout();
    payload.delivery_address = Some(common::address());

    let order = order_service::create_order(&store, &cart, payload, None, Utc::now())
        .await?
        .into_order();

    assert_eq!(order.delivery_type, DeliveryType::Pickup);
    assert!(order.delivery_address.is_none());
    Ok(())
}

#[tokio::test]
async fn delivery_without_address_keeps_the_cart() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let cart_id = cart_with_grande(&state, &fx, 1).await?;

    let mut payload = delivery_checkout();
    payload.delivery_address = None;
    let err = order_service::checkout(&state, cart_id, payload, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut payload = delivery_checkout();
    payload.customer.cpf = "   ".into();
    let err = order_service::checkout(&state, cart_id, payload, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("customer.cpf")));

    let cart = cart_service::get_cart(&state, cart_id).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert!(state.orders.list_orders().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn card_payment_needs_brand_and_type() -> anyhow::Result<()> {
    let fx = Fixture::new();
    let store = MemoryOrderStore::new();
    let mut cart = Cart::new();
    cart.add_item(fx.grande.clone(), fx.calabresa.clone(), vec![], 1, "")?;

    let mut payload = delivery_checkout();
    payload.payment = PaymentRequest {
        method: PaymentMethod::Card,
        card_brand: Some(CardBrand::Visa),
        card_type: None,
    };
    let err = order_service::create_order(&store, &cart, payload, None, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut payload = delivery_checkout();
    payload.payment = PaymentRequest {
        method: PaymentMethod::Card,
        card_brand: Some(CardBrand::Elo),
        card_type: Some(CardType::Debit),
    };
    let order = order_service::create_order(&store, &cart, payload, None, Utc::now())
        .await?
        .into_order();
    assert_eq!(
        order.payment,
        Payment::Card {
            card_brand: CardBrand::Elo,
            card_type: CardType::Debit
        }
    );
    assert_eq!(store.list_orders().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn retried_checkout_returns_the_first_order() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let cart_id = cart_with_grande(&state, &fx, 1).await?;
    let key = Some("checkout-7f3a".to_string());

    let first = order_service::checkout(&state, cart_id, delivery_checkout(), key.clone())
        .await?
        .data
        .expect("order");
    let retry = order_service::checkout(&state, cart_id, delivery_checkout(), key)
        .await?
        .data
        .expect("order");

    assert_eq!(first.id, retry.id);
    assert_eq!(state.orders.list_orders().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn replayed_append_writes_nothing() -> anyhow::Result<()> {
    let fx = Fixture::new();
    let store = MemoryOrderStore::new();
    let mut cart = Cart::new();
    cart.add_item(fx.grande.clone(), fx.calabresa.clone(), vec![], 1, "")?;
    let key = Some("same-key".to_string());

    let first = order_service::create_order(&store, &cart, delivery_checkout(), key.clone(), Utc::now()).await?;
    let second = order_service::create_order(&store, &cart, delivery_checkout(), key, Utc::now()).await?;

    let AppendOutcome::Created(created) = first else {
        panic!("first append must create");
    };
    let AppendOutcome::Replayed(replayed) = second else {
        panic!("second append must replay");
    };
    assert_eq!(created.id, replayed.id);
    assert_eq!(store.list_orders().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn unknown_order_is_not_found() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let cart_id = cart_with_grande(&state, &fx, 1).await?;
    order_service::checkout(&state, cart_id, delivery_checkout(), None).await?;
    let before = state.orders.list_orders().await?;

    let err = admin_service::update_status(
        state.orders.as_ref(),
        Uuid::new_v4(),
        OrderStatus::Preparing,
        StatusPolicy::Lenient,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(state.orders.list_orders().await?, before);

    let err = order_service::track_order(&state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn strict_policy_rejects_skipping_statuses() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Strict).await?;
    let cart_id = cart_with_grande(&state, &fx, 1).await?;
    let order = order_service::checkout(&state, cart_id, delivery_checkout(), None)
        .await?
        .data
        .expect("order");

    let err = admin_service::update_status(
        state.orders.as_ref(),
        order.id,
        OrderStatus::Completed,
        StatusPolicy::Strict,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let stored = state.orders.get_order(order.id).await?.expect("stored");
    assert_eq!(stored.status, OrderStatus::Received);
    assert_eq!(stored.updated_at, order.updated_at);

    let cancelled = admin_service::update_status(
        state.orders.as_ref(),
        order.id,
        OrderStatus::Cancelled,
        StatusPolicy::Strict,
    )
    .await?;
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let err = admin_service::update_status(
        state.orders.as_ref(),
        order.id,
        OrderStatus::Preparing,
        StatusPolicy::Strict,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn lenient_policy_accepts_any_change() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let cart_id = cart_with_grande(&state, &fx, 1).await?;
    let order = order_service::checkout(&state, cart_id, delivery_checkout(), None)
        .await?
        .data
        .expect("order");

    let completed = admin_service::update_status(
        state.orders.as_ref(),
        order.id,
        OrderStatus::Completed,
        StatusPolicy::Lenient,
    )
    .await?;
    assert_eq!(completed.status, OrderStatus::Completed);

    let reopened = admin_service::update_status(
        state.orders.as_ref(),
        order.id,
        OrderStatus::Preparing,
        StatusPolicy::Lenient,
    )
    .await?;
    assert_eq!(reopened.status, OrderStatus::Preparing);
    Ok(())
}

#[tokio::test]
async fn setting_the_same_status_changes_nothing() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Strict).await?;
    let cart_id = cart_with_grande(&state, &fx, 1).await?;
    let order = order_service::checkout(&state, cart_id, delivery_checkout(), None)
        .await?
        .data
        .expect("order");

    let same = admin_service::update_status(
        state.orders.as_ref(),
        order.id,
        OrderStatus::Received,
        StatusPolicy::Strict,
    )
    .await?;

    assert_eq!(same, order);
    Ok(())
}

#[tokio::test]
async fn unknown_status_name_is_rejected() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let cart_id = cart_with_grande(&state, &fx, 1).await?;
    let order = order_service::checkout(&state, cart_id, delivery_checkout(), None)
        .await?
        .data
        .expect("order");

    let err = admin_service::update_order_status(
        &state,
        &admin_principal(),
        order.id,
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn admin_listing_filters_by_status() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let admin = admin_principal();
    for _ in 0..3 {
        let cart_id = cart_with_grande(&state, &fx, 1).await?;
        order_service::checkout(&state, cart_id, delivery_checkout(), None).await?;
    }
    let first = state.orders.list_orders().await?[0].id;
    admin_service::update_status(state.orders.as_ref(), first, OrderStatus::Cancelled, StatusPolicy::Lenient).await?;

    let query = OrderListQuery {
        status: Some("cancelled".into()),
        ..Default::default()
    };
    let resp = admin_service::list_all_orders(&state, &admin, query).await?;
    let listed = resp.data.expect("list");
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].id, first);
    assert_eq!(resp.meta.and_then(|m| m.total), Some(1));
    Ok(())
}

#[tokio::test]
async fn idempotency_key_does_not_cross_carts() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let key = Some("k1".to_string());

    let cart_a = cart_with_grande(&state, &fx, 1).await?;
    let first = order_service::checkout(&state, cart_a, delivery_checkout(), key.clone())
        .await?
        .data
        .expect("order");

    let cart_b = cart_with_grande(&state, &fx, 3).await?;
    let mut payload = delivery_checkout();
    payload.customer.name = "Bruno Lima".into();
    let second = order_service::checkout(&state, cart_b, payload, key)
        .await?
        .data
        .expect("order");

    assert_ne!(first.id, second.id);
    assert_eq!(second.customer.name, "Bruno Lima");
    assert_eq!(second.items[0].quantity, 3);
    let cart = cart_service::get_cart(&state, cart_b).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    assert_eq!(state.orders.list_orders().await?.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_status_updates_serialize() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let cart_id = cart_with_grande(&state, &fx, 2).await?;
    let order = order_service::checkout(&state, cart_id, delivery_checkout(), None)
        .await?
        .data
        .expect("order");

    let targets = [
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];
    let order_id = order.id;
    let mut handles = Vec::new();
    for round in 0..8 {
        let store = state.orders.clone();
        let target = targets[round % targets.len()];
        handles.push(tokio::spawn(async move {
            admin_service::update_status(store.as_ref(), order_id, target, StatusPolicy::Lenient)
                .await
        }));
    }
    for handle in handles {
        let updated = handle.await??;
        assert_eq!(updated.id, order_id);
    }

    let stored = state.orders.get_order(order.id).await?.expect("stored");
    assert!(targets.contains(&stored.status));
    assert_eq!(stored.items, order.items);
    assert_eq!(stored.customer, order.customer);
    assert_eq!(stored.total_amount, order.total_amount);
    assert_eq!(stored.created_at, order.created_at);
    assert_eq!(state.orders.list_orders().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn joined_status_updates_leave_one_written_state() -> anyhow::Result<()> {
    let (state, fx) = setup_state(StatusPolicy::Lenient).await?;
    let cart_id = cart_with_grande(&state, &fx, 1).await?;
    let order = order_service::checkout(&state, cart_id, delivery_checkout(), None)
        .await?
        .data
        .expect("order");

    let (a, b) = tokio::join!(
        admin_service::update_status(
            state.orders.as_ref(),
            order.id,
            OrderStatus::Preparing,
            StatusPolicy::Lenient
        ),
        admin_service::update_status(
            state.orders.as_ref(),
            order.id,
            OrderStatus::Cancelled,
            StatusPolicy::Lenient
        ),
    );
    a?;
    b?;

    let stored = state.orders.get_order(order.id).await?.expect("stored");
    assert!(matches!(
        stored.status,
        OrderStatus::Preparing | OrderStatus::Cancelled
    ));
    assert_eq!(stored.subtotal, order.subtotal);
    Ok(())
}
