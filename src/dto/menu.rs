use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{PizzaExtra, PizzaType};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PizzaTypeRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "30.00")]
    pub base_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PizzaFlavorRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub type_id: Uuid,
    #[schema(value_type = String, example = "5.00")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PizzaExtraRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "3.00")]
    pub price: Decimal,
}

/// Flavor as shown on the menu, with its type resolved for display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MenuFlavor {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub type_id: Uuid,
    pub type_name: String,
    #[schema(value_type = String)]
    pub price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Menu {
    pub types: Vec<PizzaType>,
    pub flavors: Vec<MenuFlavor>,
    pub extras: Vec<PizzaExtra>,
}
