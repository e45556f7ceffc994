use std::{collections::HashMap, sync::Arc};

use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::{
    audit,
    dto::cart::{CartItemRequest, CartView, UpdateQuantityRequest},
    error::{AppError, AppResult},
    models::{CartItem, PizzaExtra, PizzaFlavor, PizzaType, unit_price},
    response::ApiResponse,
    state::AppState,
    store::CatalogStore,
};

/// Largest quantity a single cart line accepts.
pub const MAX_LINE_QUANTITY: u32 = 100;

fn check_quantity(quantity: u32) -> AppResult<()> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(AppError::InvalidQuantity);
    }
    Ok(())
}

/// Priced pizza selections for one customer session.
///
/// Lines are keyed by their generated id, never by composition: adding the
/// same pizza twice yields two lines.
#[derive(Debug, Clone)]
pub struct Cart {
    id: Uuid,
    items: Vec<CartItem>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Prices a new line and appends it.
    ///
    /// Fails with [`AppError::InvalidSelection`] when the flavor belongs to
    /// another pizza type and [`AppError::InvalidQuantity`] when `quantity`
    /// is zero or above [`MAX_LINE_QUANTITY`].
    pub fn add_item(
        &mut self,
        pizza_type: PizzaType,
        flavor: PizzaFlavor,
        extras: Vec<PizzaExtra>,
        quantity: u32,
        observations: impl Into<String>,
    ) -> AppResult<CartItem> {
        let item = compose(
            Uuid::new_v4(),
            pizza_type,
            flavor,
            extras,
            quantity,
            observations.into(),
        )?;
        self.items.push(item.clone());
        Ok(item)
    }

    /// Replaces the composition of an existing line, keeping its id and
    /// position.
    pub fn replace_item(
        &mut self,
        item_id: Uuid,
        pizza_type: PizzaType,
        flavor: PizzaFlavor,
        extras: Vec<PizzaExtra>,
        quantity: u32,
        observations: impl Into<String>,
    ) -> AppResult<CartItem> {
        let slot = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(AppError::NotFound)?;
        let item = compose(
            item_id,
            pizza_type,
            flavor,
            extras,
            quantity,
            observations.into(),
        )?;
        *slot = item.clone();
        Ok(item)
    }

    pub fn update_quantity(&mut self, item_id: Uuid, quantity: u32) -> AppResult<CartItem> {
        let slot = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(AppError::NotFound)?;
        check_quantity(quantity)?;
        let total_price = line_total(slot.unit_price(), quantity)?;
        slot.quantity = quantity;
        slot.total_price = total_price;
        Ok(slot.clone())
    }

    /// Removing an unknown line is a no-op. Returns whether a line was removed.
    pub fn remove_item(&mut self, item_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.items.len() != before
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn view(&self) -> CartView {
        CartView {
            id: self.id,
            items: self.items.clone(),
            total_items: self.total_items(),
            total_price: self.total_price(),
        }
    }
}

fn compose(
    id: Uuid,
    pizza_type: PizzaType,
    flavor: PizzaFlavor,
    extras: Vec<PizzaExtra>,
    quantity: u32,
    observations: String,
) -> AppResult<CartItem> {
    if flavor.type_id != pizza_type.id {
        return Err(AppError::InvalidSelection);
    }
    check_quantity(quantity)?;

    let total_price = line_total(unit_price(&pizza_type, &flavor, &extras), quantity)?;
    Ok(CartItem {
        id,
        pizza_type,
        flavor,
        extras,
        observations,
        quantity,
        total_price,
    })
}

fn line_total(unit_price: Decimal, quantity: u32) -> AppResult<Decimal> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| AppError::validation("line total is out of range"))
}

/// Open carts, one per customer session.
///
/// Each cart sits behind its own mutex so checkout can hold it across the
/// order store call without blocking other sessions.
#[derive(Default)]
pub struct CartSessions {
    carts: RwLock<HashMap<Uuid, Arc<Mutex<Cart>>>>,
}

impl CartSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self) -> Cart {
        let cart = Cart::new();
        self.carts
            .write()
            .await
            .insert(cart.id(), Arc::new(Mutex::new(cart.clone())));
        cart
    }

    async fn handle(&self, cart_id: Uuid) -> AppResult<Arc<Mutex<Cart>>> {
        self.carts
            .read()
            .await
            .get(&cart_id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    pub async fn snapshot(&self, cart_id: Uuid) -> AppResult<Cart> {
        let cart = self.handle(cart_id).await?;
        let guard = cart.lock().await;
        Ok(guard.clone())
    }

    /// Runs `f` with exclusive access to the cart.
    pub async fn with_cart<R>(
        &self,
        cart_id: Uuid,
        f: impl FnOnce(&mut Cart) -> AppResult<R>,
    ) -> AppResult<R> {
        let cart = self.handle(cart_id).await?;
        let mut guard = cart.lock().await;
        f(&mut *guard)
    }

    /// Exclusive access that can be held across awaits.
    pub async fn lock(&self, cart_id: Uuid) -> AppResult<OwnedMutexGuard<Cart>> {
        let cart = self.handle(cart_id).await?;
        Ok(cart.lock_owned().await)
    }

    pub async fn close(&self, cart_id: Uuid) -> AppResult<()> {
        self.carts
            .write()
            .await
            .remove(&cart_id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    pub async fn open_sessions(&self) -> usize {
        self.carts.read().await.len()
    }
}

/// Narrows a requested quantity without judging it; the cart rejects
/// out-of-range values after the line lookup.
pub fn requested_quantity(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// Looks up the snapshots a cart line is priced from.
pub async fn resolve_selection(
    catalog: &dyn CatalogStore,
    pizza_type_id: Uuid,
    flavor_id: Uuid,
    extra_ids: &[Uuid],
) -> AppResult<(PizzaType, PizzaFlavor, Vec<PizzaExtra>)> {
    let pizza_type = catalog
        .get_type(pizza_type_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let flavor = catalog
        .get_flavor(flavor_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut extras = Vec::with_capacity(extra_ids.len());
    for (idx, extra_id) in extra_ids.iter().enumerate() {
        if extra_ids[..idx].contains(extra_id) {
            return Err(AppError::validation(format!(
                "extra {extra_id} is listed more than once"
            )));
        }
        let extra = catalog
            .get_extra(*extra_id)
            .await?
            .ok_or(AppError::NotFound)?;
        extras.push(extra);
    }

    Ok((pizza_type, flavor, extras))
}

pub async fn open_cart(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    let cart = state.carts.open().await;
    tracing::debug!(cart_id = %cart.id(), "cart session opened");
    Ok(ApiResponse::success("Cart opened", cart.view(), None))
}

pub async fn get_cart(state: &AppState, cart_id: Uuid) -> AppResult<ApiResponse<CartView>> {
    let cart = state.carts.snapshot(cart_id).await?;
    Ok(ApiResponse::ok(cart.view()))
}

pub async fn close_cart(
    state: &AppState,
    cart_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.carts.close(cart_id).await?;
    tracing::debug!(%cart_id, "cart session closed");
    Ok(ApiResponse::ok(serde_json::json!({})))
}

pub async fn add_item(
    state: &AppState,
    cart_id: Uuid,
    payload: CartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let quantity = requested_quantity(payload.quantity);
    let (pizza_type, flavor, extras) = resolve_selection(
        state.catalog.as_ref(),
        payload.pizza_type_id,
        payload.flavor_id,
        &payload.extra_ids,
    )
    .await?;

    let item = state
        .carts
        .with_cart(cart_id, |cart| {
            cart.add_item(pizza_type, flavor, extras, quantity, payload.observations)
        })
        .await?;

    audit::record(
        None,
        "cart_add",
        "carts",
        serde_json::json!({ "cart_id": cart_id, "item_id": item.id, "total_price": item.total_price }),
    );
    Ok(ApiResponse::success("Added to cart", item, None))
}

pub async fn replace_item(
    state: &AppState,
    cart_id: Uuid,
    item_id: Uuid,
    payload: CartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let quantity = requested_quantity(payload.quantity);
    let (pizza_type, flavor, extras) = resolve_selection(
        state.catalog.as_ref(),
        payload.pizza_type_id,
        payload.flavor_id,
        &payload.extra_ids,
    )
    .await?;

    let item = state
        .carts
        .with_cart(cart_id, |cart| {
            cart.replace_item(
                item_id,
                pizza_type,
                flavor,
                extras,
                quantity,
                payload.observations,
            )
        })
        .await?;

    Ok(ApiResponse::success("Cart item updated", item, None))
}

pub async fn update_quantity(
    state: &AppState,
    cart_id: Uuid,
    item_id: Uuid,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let quantity = requested_quantity(payload.quantity);
    let item = state
        .carts
        .with_cart(cart_id, |cart| cart.update_quantity(item_id, quantity))
        .await?;
    Ok(ApiResponse::success("Quantity updated", item, None))
}

pub async fn remove_item(
    state: &AppState,
    cart_id: Uuid,
    item_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let view = state
        .carts
        .with_cart(cart_id, |cart| {
            cart.remove_item(item_id);
            Ok(cart.view())
        })
        .await?;
    Ok(ApiResponse::success("Removed from cart", view, None))
}

pub async fn clear_cart(state: &AppState, cart_id: Uuid) -> AppResult<ApiResponse<CartView>> {
    let view = state
        .carts
        .with_cart(cart_id, |cart| {
            cart.clear();
            Ok(cart.view())
        })
        .await?;
    Ok(ApiResponse::success("Cart cleared", view, None))
}
