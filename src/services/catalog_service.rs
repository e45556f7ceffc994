use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    audit,
    dto::menu::{Menu, MenuFlavor, PizzaExtraRequest, PizzaFlavorRequest, PizzaTypeRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthAdmin, ensure_admin},
    models::{PizzaExtra, PizzaFlavor, PizzaType},
    response::{ApiResponse, Meta},
    state::AppState,
    store::CatalogStore,
};

pub const MISSING_TYPE_LABEL: &str = "type not found";

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    Ok(name.to_string())
}

/// Highest price a menu entry may carry.
pub fn max_menu_price() -> Decimal {
    Decimal::new(1_000_000, 2)
}

fn clean_price(price: Decimal) -> AppResult<Decimal> {
    if price < Decimal::ZERO {
        return Err(AppError::validation("price must not be negative"));
    }
    if price > max_menu_price() {
        return Err(AppError::validation(format!(
            "price must not exceed {}",
            max_menu_price()
        )));
    }
    if price.normalize().scale() > 2 {
        return Err(AppError::validation("price must have at most 2 decimal places"));
    }
    Ok(price)
}

async fn ensure_type_exists(catalog: &dyn CatalogStore, type_id: Uuid) -> AppResult<()> {
    if catalog.get_type(type_id).await?.is_none() {
        return Err(AppError::validation(format!(
            "pizza type {type_id} does not exist"
        )));
    }
    Ok(())
}

/// Builds the public menu; flavors whose type was deleted are labelled
/// instead of dropped.
pub async fn menu(catalog: &dyn CatalogStore) -> AppResult<Menu> {
    let types = catalog.list_types().await?;
    let flavors = catalog
        .list_flavors()
        .await?
        .into_iter()
        .map(|flavor| {
            let type_name = types
                .iter()
                .find(|t| t.id == flavor.type_id)
                .map_or_else(|| MISSING_TYPE_LABEL.to_string(), |t| t.name.clone());
            MenuFlavor {
                id: flavor.id,
                name: flavor.name,
                description: flavor.description,
                type_id: flavor.type_id,
                type_name,
                price: flavor.price,
            }
        })
        .collect();
    let extras = catalog.list_extras().await?;

    Ok(Menu {
        types,
        flavors,
        extras,
    })
}

pub async fn get_menu(state: &AppState) -> AppResult<ApiResponse<Menu>> {
    let menu = menu(state.catalog.as_ref()).await?;
    Ok(ApiResponse::ok(menu))
}

pub async fn create_type(
    state: &AppState,
    user: &AuthAdmin,
    payload: PizzaTypeRequest,
) -> AppResult<ApiResponse<PizzaType>> {
    ensure_admin(user)?;
    let pizza_type = PizzaType {
        id: Uuid::new_v4(),
        name: clean_name(&payload.name)?,
        description: payload.description,
        base_price: clean_price(payload.base_price)?,
    };
    let created = state.catalog.insert_type(pizza_type).await?;
    audit::record(
        Some(user.admin_id),
        "menu_type_create",
        "pizza_types",
        serde_json::json!({ "id": created.id }),
    );
    Ok(ApiResponse::success("Pizza type created", created, Some(Meta::empty())))
}

pub async fn update_type(
    state: &AppState,
    user: &AuthAdmin,
    id: Uuid,
    payload: PizzaTypeRequest,
) -> AppResult<ApiResponse<PizzaType>> {
    ensure_admin(user)?;
    let pizza_type = PizzaType {
        id,
        name: clean_name(&payload.name)?,
        description: payload.description,
        base_price: clean_price(payload.base_price)?,
    };
    let updated = state.catalog.update_type(pizza_type).await?;
    audit::record(
        Some(user.admin_id),
        "menu_type_update",
        "pizza_types",
        serde_json::json!({ "id": id }),
    );
    Ok(ApiResponse::success("Pizza type updated", updated, Some(Meta::empty())))
}

pub async fn delete_type(
    state: &AppState,
    user: &AuthAdmin,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    state.catalog.delete_type(id).await?;
    audit::record(
        Some(user.admin_id),
        "menu_type_delete",
        "pizza_types",
        serde_json::json!({ "id": id }),
    );
    Ok(ApiResponse::success(
        "Pizza type deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn create_flavor(
    state: &AppState,
    user: &AuthAdmin,
    payload: PizzaFlavorRequest,
) -> AppResult<ApiResponse<PizzaFlavor>> {
    ensure_admin(user)?;
    ensure_type_exists(state.catalog.as_ref(), payload.type_id).await?;
    let flavor = PizzaFlavor {
        id: Uuid::new_v4(),
        name: clean_name(&payload.name)?,
        description: payload.description,
        type_id: payload.type_id,
        price: clean_price(payload.price)?,
    };
    let created = state.catalog.insert_flavor(flavor).await?;
    audit::record(
        Some(user.admin_id),
        "menu_flavor_create",
        "pizza_flavors",
        serde_json::json!({ "id": created.id, "type_id": created.type_id }),
    );
    Ok(ApiResponse::success("Flavor created", created, Some(Meta::empty())))
}

pub async fn update_flavor(
    state: &AppState,
    user: &AuthAdmin,
    id: Uuid,
    payload: PizzaFlavorRequest,
) -> AppResult<ApiResponse<PizzaFlavor>> {
    ensure_admin(user)?;
    ensure_type_exists(state.catalog.as_ref(), payload.type_id).await?;
    let flavor = PizzaFlavor {
        id,
        name: clean_name(&payload.name)?,
        description: payload.description,
        type_id: payload.type_id,
        price: clean_price(payload.price)?,
    };
    let updated = state.catalog.update_flavor(flavor).await?;
    audit::record(
        Some(user.admin_id),
        "menu_flavor_update",
        "pizza_flavors",
        serde_json::json!({ "id": id }),
    );
    Ok(ApiResponse::success("Flavor updated", updated, Some(Meta::empty())))
}

pub async fn delete_flavor(
    state: &AppState,
    user: &AuthAdmin,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    state.catalog.delete_flavor(id).await?;
    audit::record(
        Some(user.admin_id),
        "menu_flavor_delete",
        "pizza_flavors",
        serde_json::json!({ "id": id }),
    );
    Ok(ApiResponse::success(
        "Flavor deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn create_extra(
    state: &AppState,
    user: &AuthAdmin,
    payload: PizzaExtraRequest,
) -> AppResult<ApiResponse<PizzaExtra>> {
    ensure_admin(user)?;
    let extra = PizzaExtra {
        id: Uuid::new_v4(),
        name: clean_name(&payload.name)?,
        description: payload.description,
        price: clean_price(payload.price)?,
    };
    let created = state.catalog.insert_extra(extra).await?;
    audit::record(
        Some(user.admin_id),
        "menu_extra_create",
        "pizza_extras",
        serde_json::json!({ "id": created.id }),
    );
    Ok(ApiResponse::success("Extra created", created, Some(Meta::empty())))
}

pub async fn update_extra(
    state: &AppState,
    user: &AuthAdmin,
    id: Uuid,
    payload: PizzaExtraRequest,
) -> AppResult<ApiResponse<PizzaExtra>> {
    ensure_admin(user)?;
    let extra = PizzaExtra {
        id,
        name: clean_name(&payload.name)?,
        description: payload.description,
        price: clean_price(payload.price)?,
    };
    let updated = state.catalog.update_extra(extra).await?;
    audit::record(
        Some(user.admin_id),
        "menu_extra_update",
        "pizza_extras",
        serde_json::json!({ "id": id }),
    );
    Ok(ApiResponse::success("Extra updated", updated, Some(Meta::empty())))
}

pub async fn delete_extra(
    state: &AppState,
    user: &AuthAdmin,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    state.catalog.delete_extra(id).await?;
    audit::record(
        Some(user.admin_id),
        "menu_extra_delete",
        "pizza_extras",
        serde_json::json!({ "id": id }),
    );
    Ok(ApiResponse::success(
        "Extra deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
