use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::CartItem;

/// A pizza composition as sent by the storefront.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartItemRequest {
    pub pizza_type_id: Uuid,
    pub flavor_id: Uuid,
    #[serde(default)]
    pub extra_ids: Vec<Uuid>,
    pub quantity: i64,
    #[serde(default)]
    pub observations: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub id: Uuid,
    pub items: Vec<CartItem>,
    pub total_items: u64,
    #[schema(value_type = String, example = "80.00")]
    pub total_price: Decimal,
}
